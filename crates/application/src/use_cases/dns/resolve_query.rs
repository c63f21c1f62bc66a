use crate::ports::{Allocation, BindingCache, Clock};
use delirium_domain::reverse_pointer::parse_reverse_pointer;
use delirium_domain::{
    Answer, AnswerData, DnsQuery, DomainError, RecordType, Resolution,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Turns one parsed query into a fabricated answer.
pub struct ResolveQueryUseCase {
    cache: Arc<dyn BindingCache>,
    clock: Arc<dyn Clock>,
}

impl ResolveQueryUseCase {
    pub fn new(cache: Arc<dyn BindingCache>, clock: Arc<dyn Clock>) -> Self {
        Self { cache, clock }
    }

    /// Store faults propagate; depletion and malformed reverse names become
    /// SERVFAIL and NXDOMAIN respectively.
    #[instrument(skip(self, query), fields(domain = %query.name, record_type = %query.record_type))]
    pub async fn execute(&self, query: &DnsQuery) -> Result<Resolution, DomainError> {
        self.cache.prune().await?;

        match query.record_type {
            RecordType::A => self.resolve_forward(query).await,
            RecordType::PTR => self.resolve_reverse(query).await,
            other => {
                debug!(record_type = %other, "Unsupported query type");
                Ok(Resolution::nx_domain())
            }
        }
    }

    async fn resolve_forward(&self, query: &DnsQuery) -> Result<Resolution, DomainError> {
        // The root has no address to fake.
        if query.name.is_empty() {
            return Ok(Resolution::nx_domain());
        }

        let record = match self.cache.resolve_name(&query.name).await? {
            Allocation::Allocated(record) | Allocation::Refreshed(record) => record,
            Allocation::Depleted => return Ok(Resolution::serv_fail()),
        };

        let answer = Answer {
            name: Arc::clone(&query.name),
            ttl: record.remaining_ttl(self.clock.now()),
            data: AnswerData::A(record.address),
        };
        Ok(Resolution::answered(vec![answer]))
    }

    async fn resolve_reverse(&self, query: &DnsQuery) -> Result<Resolution, DomainError> {
        let address = match parse_reverse_pointer(&query.name) {
            Ok(address) => address,
            Err(e) => {
                warn!(error = %e, "Rejected reverse lookup");
                return Ok(Resolution::nx_domain());
            }
        };

        let records = self.cache.resolve_address(address).await?;
        let now = self.clock.now();
        let answers = records
            .into_iter()
            .map(|record| Answer {
                name: Arc::clone(&query.name),
                ttl: record.remaining_ttl(now),
                data: AnswerData::Ptr(record.name),
            })
            .collect();

        Ok(Resolution::answered(answers))
    }
}
