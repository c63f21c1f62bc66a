mod eviction_policy;
mod record;
mod record_type;

pub use eviction_policy::EvictionPolicy;
pub use record::Record;
pub use record_type::RecordType;
