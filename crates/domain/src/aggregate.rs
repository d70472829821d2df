use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity requested from the allocation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateLevel {
    Cluster,
    Node,
    Namespace,
    Pod,
    Container,
}

impl AggregateLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::Node => "node",
            Self::Namespace => "namespace",
            Self::Pod => "pod",
            Self::Container => "container",
        }
    }
}

impl fmt::Display for AggregateLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cluster" => Ok(Self::Cluster),
            "node" => Ok(Self::Node),
            "namespace" => Ok(Self::Namespace),
            "pod" => Ok(Self::Pod),
            "container" => Ok(Self::Container),
            other => Err(DomainError::InvalidAggregateLevel(other.to_string())),
        }
    }
}
