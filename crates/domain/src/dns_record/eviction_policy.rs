use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a sweep does with a binding whose expiry has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Flag the record expired and keep it for audit and reverse lookups.
    #[default]
    Mark,
    /// Remove the record for good.
    Delete,
}

impl EvictionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::Mark => "mark",
            EvictionPolicy::Delete => "delete",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mark" => Ok(EvictionPolicy::Mark),
            "delete" => Ok(EvictionPolicy::Delete),
            _ => Err(format!("Unknown eviction policy: {} (expected mark or delete)", s)),
        }
    }
}
