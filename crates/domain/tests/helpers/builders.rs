#![allow(dead_code)]
use chrono::{DateTime, Duration, TimeZone, Utc};
use delirium_domain::Record;
use std::net::Ipv4Addr;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub struct RecordBuilder {
    id: i64,
    name: String,
    address: Ipv4Addr,
    expires_at: DateTime<Utc>,
    expired: bool,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self {
            id: 1,
            name: "www.somedomain.tld".to_string(),
            address: Ipv4Addr::new(10, 0, 0, 1),
            expires_at: fixed_now() + Duration::seconds(900),
            expired: false,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn address(mut self, address: Ipv4Addr) -> Self {
        self.address = address;
        self
    }

    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn expired(mut self, expired: bool) -> Self {
        self.expired = expired;
        self
    }

    pub fn build(self) -> Record {
        let mut record = Record::new(self.id, self.name.as_str(), self.address, self.expires_at);
        record.expired = self.expired;
        record
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
