use crate::dns::RecordTypeMapper;
use delirium_application::use_cases::ResolveQueryUseCase;
use delirium_domain::{AnswerData, DnsQuery, Resolution, ResponseStatus};
use hickory_proto::op::{Header, ResponseCode};
use hickory_proto::rr::{rdata, Name, RData, Record};
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Adapts hickory's request/response plumbing to [`ResolveQueryUseCase`].
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<ResolveQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<ResolveQueryUseCase>) -> Self {
        Self { use_case }
    }

    fn normalize_domain(domain: &str) -> String {
        domain.trim_end_matches('.').to_string()
    }
}

/// Wire response code for a resolution outcome.
pub fn response_code_for(status: ResponseStatus) -> ResponseCode {
    match status {
        ResponseStatus::NoError => ResponseCode::NoError,
        ResponseStatus::NxDomain => ResponseCode::NXDomain,
        ResponseStatus::ServFail => ResponseCode::ServFail,
    }
}

/// Builds answer records owned by `owner` from a resolution.
///
/// PTR targets that do not parse as DNS names are dropped with a warning.
pub fn answer_records(owner: &Name, resolution: &Resolution) -> Vec<Record> {
    resolution
        .answers
        .iter()
        .filter_map(|answer| {
            let rdata = match &answer.data {
                AnswerData::A(address) => RData::A(rdata::A(*address)),
                AnswerData::Ptr(target) => match Name::from_str(target) {
                    Ok(mut name) => {
                        name.set_fqdn(true);
                        RData::PTR(rdata::PTR(name))
                    }
                    Err(e) => {
                        warn!(target = %target, error = %e, "Skipping unencodable PTR target");
                        return None;
                    }
                },
            };
            Some(Record::from_rdata(owner.clone(), answer.ttl, rdata))
        })
        .collect()
}

/// Short form of what a reply carried: the answer types on NOERROR,
/// otherwise the response code name.
pub fn reply_summary(resolution: &Resolution, answers: &[Record]) -> String {
    match resolution.status {
        ResponseStatus::NoError => answers
            .iter()
            .map(|record| record.record_type().to_string())
            .collect::<Vec<_>>()
            .join(","),
        status => status.as_str().to_string(),
    }
}

#[async_trait::async_trait]
impl RequestHandler for DnsServerHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        let request_info = match request.request_info() {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Failed to parse request info");
                return send_error_response(request, &mut response_handle, ResponseCode::FormErr)
                    .await;
            }
        };

        let query = &request_info.query;
        let domain = Self::normalize_domain(&query.name().to_string());
        let hickory_record_type = query.query_type();
        let client = request.src();
        let protocol = request.protocol();

        info!(
            client = %client,
            protocol = ?protocol,
            domain = %domain,
            record_type = %hickory_record_type,
            "Request"
        );

        let record_type = RecordTypeMapper::from_hickory(hickory_record_type);
        let dns_query = DnsQuery::new(&domain, record_type);

        let resolution = match self.use_case.execute(&dns_query).await {
            Ok(resolution) => resolution,
            Err(e) => {
                error!(domain = %domain, error = %e, "Query resolution failed");
                return send_error_response(request, &mut response_handle, ResponseCode::ServFail)
                    .await;
            }
        };

        let owner = query.original().name().clone();
        let answers = answer_records(&owner, &resolution);

        info!(
            client = %client,
            protocol = ?protocol,
            domain = %domain,
            record_type = %hickory_record_type,
            rcode = %resolution.status,
            reply = %reply_summary(&resolution, &answers),
            "Reply"
        );

        let builder = MessageResponseBuilder::from_message_request(request);
        let mut header = Header::response_from_request(request.header());
        header.set_response_code(response_code_for(resolution.status));
        header.set_authoritative(true);
        header.set_recursion_available(true);
        let response = builder.build(header, answers.iter(), &[], &[], &[]);

        match response_handle.send_response(response).await {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Failed to send response");
                ResponseInfo::from(*request.header())
            }
        }
    }
}

async fn send_error_response<R: ResponseHandler>(
    request: &Request,
    response_handle: &mut R,
    code: ResponseCode,
) -> ResponseInfo {
    debug!(code = ?code, "Sending error response");
    let builder = MessageResponseBuilder::from_message_request(request);
    let mut header = Header::response_from_request(request.header());
    header.set_response_code(code);
    header.set_recursion_available(true);
    let response = builder.build(header, &[], &[], &[], &[]);

    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "Failed to send error response");
            ResponseInfo::from(*request.header())
        }
    }
}
