//! CAIP-2 chain identifiers and chain-provider capability traits.
//!
//! A [`ChainId`] is the core's only opinion about network identifiers: a
//! `"<namespace>:<reference>"` pair (e.g. `"eip155:8453"`, `"solana:mainnet"`).
//! Everything past the namespace is opaque to this crate; mechanisms
//! interpret the reference.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A CAIP-2 chain identifier, e.g. `eip155:8453` or `solana:mainnet`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainId {
    namespace: String,
    reference: String,
}

impl ChainId {
    /// Builds a chain id from its namespace and reference parts.
    pub fn new(namespace: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            reference: reference.into(),
        }
    }

    /// The chain family, e.g. `"eip155"`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The family-specific reference, e.g. `"8453"`.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Consumes `self`, returning the `(namespace, reference)` parts.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.namespace, self.reference)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

/// Error returned when a string does not parse as a CAIP-2 chain id.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid CAIP-2 chain id {0:?}: expected \"namespace:reference\"")]
pub struct ChainIdFormatError(String);

impl FromStr for ChainId {
    type Err = ChainIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ':');
        let namespace = parts.next().filter(|s| !s.is_empty());
        let reference = parts.next().filter(|s| !s.is_empty());
        match (namespace, reference) {
            (Some(namespace), Some(reference)) => Ok(Self::new(namespace, reference)),
            _ => Err(ChainIdFormatError(s.to_owned())),
        }
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A registration-time pattern over chain ids: either an exact chain, a
/// family wildcard (`"eip155:*"`), or an explicit set of references sharing
/// one namespace.
///
/// Wildcards are valid only in registration patterns, never in a payload or
/// a set of requirements.
#[derive(Debug, Clone)]
pub enum ChainIdPattern {
    /// Matches any reference within `namespace`.
    Wildcard {
        /// The chain namespace, e.g. `"eip155"`.
        namespace: String,
    },
    /// Matches exactly one chain id.
    Exact(ChainId),
    /// Matches any of a fixed set of references within one namespace.
    Set {
        /// The shared chain namespace.
        namespace: String,
        /// The set of acceptable references.
        references: HashSet<String>,
    },
}

impl ChainIdPattern {
    /// Returns `true` if `id` is matched by this pattern.
    #[must_use]
    pub fn matches(&self, id: &ChainId) -> bool {
        match self {
            Self::Wildcard { namespace } => namespace == id.namespace(),
            Self::Exact(exact) => exact == id,
            Self::Set {
                namespace,
                references,
            } => namespace == id.namespace() && references.contains(id.reference()),
        }
    }

    /// The namespace this pattern is scoped to.
    #[must_use]
    pub fn namespace(&self) -> &str {
        match self {
            Self::Wildcard { namespace } | Self::Set { namespace, .. } => namespace,
            Self::Exact(id) => id.namespace(),
        }
    }
}

impl fmt::Display for ChainIdPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard { namespace } => write!(f, "{namespace}:*"),
            Self::Exact(id) => write!(f, "{id}"),
            Self::Set {
                namespace,
                references,
            } => {
                let mut refs: Vec<&str> = references.iter().map(String::as_str).collect();
                refs.sort_unstable();
                write!(f, "{namespace}:{{{}}}", refs.join(","))
            }
        }
    }
}

impl FromStr for ChainIdPattern {
    type Err = ChainIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, rest) = s.split_once(':').ok_or_else(|| ChainIdFormatError(s.to_owned()))?;
        if rest == "*" {
            return Ok(Self::Wildcard {
                namespace: namespace.to_owned(),
            });
        }
        if let Some(set) = rest.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            let references = set.split(',').map(str::to_owned).collect();
            return Ok(Self::Set {
                namespace: namespace.to_owned(),
                references,
            });
        }
        Ok(Self::Exact(ChainId::new(namespace, rest)))
    }
}

/// Capability a chain provider exposes to the scheme registry: which chain
/// it serves, and which addresses it can sign settlements from.
pub trait ChainProviderOps: Send + Sync {
    /// The chain this provider is bound to.
    fn chain_id(&self) -> ChainId;

    /// Addresses this provider can sign on-chain operations from.
    fn signer_addresses(&self) -> Vec<String>;
}

impl<T: ChainProviderOps> ChainProviderOps for Arc<T> {
    fn chain_id(&self) -> ChainId {
        (**self).chain_id()
    }

    fn signer_addresses(&self) -> Vec<String> {
        (**self).signer_addresses()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_chain_id() {
        let id: ChainId = "eip155:8453".parse().unwrap();
        assert_eq!(id.namespace(), "eip155");
        assert_eq!(id.reference(), "8453");
        assert_eq!(id.to_string(), "eip155:8453");
    }

    #[test]
    fn rejects_malformed_chain_id() {
        assert!("eip155".parse::<ChainId>().is_err());
        assert!(":8453".parse::<ChainId>().is_err());
    }

    #[test]
    fn wildcard_pattern_matches_any_reference() {
        let pattern: ChainIdPattern = "eip155:*".parse().unwrap();
        assert!(pattern.matches(&ChainId::new("eip155", "8453")));
        assert!(!pattern.matches(&ChainId::new("solana", "mainnet")));
    }

    #[test]
    fn exact_pattern_matches_only_one_chain() {
        let pattern: ChainIdPattern = "eip155:8453".parse().unwrap();
        assert!(pattern.matches(&ChainId::new("eip155", "8453")));
        assert!(!pattern.matches(&ChainId::new("eip155", "84532")));
    }
}
