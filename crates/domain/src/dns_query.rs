use super::RecordType;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DnsQuery {
    pub name: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    /// Trailing root dots are dropped so `a.test.` and `a.test` share a binding.
    pub fn new(name: &str, record_type: RecordType) -> Self {
        let name = name.strip_suffix('.').unwrap_or(name);
        Self {
            name: Arc::from(name),
            record_type,
        }
    }
}
