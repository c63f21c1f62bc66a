//! Mapping from `hickory_proto::rr::RecordType` to `delirium_domain::RecordType`.

use delirium_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Convert hickory RecordType → domain RecordType (for incoming queries)
    ///
    /// Types the domain does not name are carried as `RecordType::Other`
    /// with their wire code, so they can still be logged and refused.
    pub fn from_hickory(hickory_type: HickoryRecordType) -> RecordType {
        match hickory_type {
            HickoryRecordType::A => RecordType::A,
            HickoryRecordType::AAAA => RecordType::AAAA,
            HickoryRecordType::CNAME => RecordType::CNAME,
            HickoryRecordType::MX => RecordType::MX,
            HickoryRecordType::NS => RecordType::NS,
            HickoryRecordType::PTR => RecordType::PTR,
            HickoryRecordType::SOA => RecordType::SOA,
            HickoryRecordType::SRV => RecordType::SRV,
            HickoryRecordType::TXT => RecordType::TXT,
            other => RecordType::Other(u16::from(other)),
        }
    }
}
