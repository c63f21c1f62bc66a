use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    NoError,
    NxDomain,
    ServFail,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::NoError => "NOERROR",
            ResponseStatus::NxDomain => "NXDOMAIN",
            ResponseStatus::ServFail => "SERVFAIL",
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerData {
    A(Ipv4Addr),
    Ptr(Arc<str>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub name: Arc<str>,
    pub ttl: u32,
    pub data: AnswerData,
}

/// Outcome of one query, ready for the transport to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub status: ResponseStatus,
    pub answers: Vec<Answer>,
}

impl Resolution {
    pub fn answered(answers: Vec<Answer>) -> Self {
        let status = if answers.is_empty() {
            ResponseStatus::NxDomain
        } else {
            ResponseStatus::NoError
        };
        Self { status, answers }
    }

    pub fn nx_domain() -> Self {
        Self {
            status: ResponseStatus::NxDomain,
            answers: Vec::new(),
        }
    }

    pub fn serv_fail() -> Self {
        Self {
            status: ResponseStatus::ServFail,
            answers: Vec::new(),
        }
    }

    pub fn addresses(&self) -> Vec<Ipv4Addr> {
        self.answers
            .iter()
            .filter_map(|answer| match answer.data {
                AnswerData::A(address) => Some(address),
                AnswerData::Ptr(_) => None,
            })
            .collect()
    }
}
