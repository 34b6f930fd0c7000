//! Solana chain primitives.
//!
//! Provides core types for working with Solana clusters, including an
//! `Address` wrapper around [`Pubkey`] and known-asset metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;

/// A Solana public key, newtyped so it can implement the serde shape the
/// wire format expects (a base58 string) and carry convenience methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Pubkey);

impl Address {
    /// Wraps a [`Pubkey`].
    #[must_use]
    pub const fn new(pubkey: Pubkey) -> Self {
        Self(pubkey)
    }

    /// Returns the inner [`Pubkey`].
    #[must_use]
    pub const fn pubkey(&self) -> &Pubkey {
        &self.0
    }
}

impl From<Pubkey> for Address {
    fn from(pubkey: Pubkey) -> Self {
        Self(pubkey)
    }
}

impl From<Address> for Pubkey {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = solana_pubkey::ParsePubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Formats a Solana cluster genesis hash (or well-known alias) as a CAIP-2
/// identifier, e.g. `caip2("mainnet")` returns `"solana:mainnet"`.
#[must_use]
pub fn caip2(reference: &str) -> String {
    format!("solana:{reference}")
}

/// Parses a CAIP-2 identifier into its Solana cluster reference.
///
/// Returns `None` if the input is not a `solana:`-prefixed string.
#[must_use]
pub fn parse_caip2(caip: &str) -> Option<&str> {
    caip.strip_prefix("solana:").filter(|s| !s.is_empty())
}

/// A token mint deployment on a Solana cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDeployment {
    /// Mint address.
    pub address: Address,
    /// Number of decimals (e.g., 6 for USDC).
    pub decimals: u8,
}

/// Asset information for a token mint on a specific cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Mint address.
    pub address: Address,
    /// Number of decimals.
    pub decimals: u8,
}

/// Configuration for a known Solana cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// CAIP-2 network identifier (e.g., `"solana:mainnet"`).
    pub network: String,
    /// Map of mint addresses to their info.
    pub assets: Vec<AssetInfo>,
}

impl NetworkConfig {
    /// Finds an asset by its mint address.
    #[must_use]
    pub fn find_asset(&self, address: Address) -> Option<&AssetInfo> {
        self.assets.iter().find(|a| a.address == address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_caip2() {
        assert_eq!(caip2("mainnet"), "solana:mainnet");
        assert_eq!(parse_caip2("solana:mainnet"), Some("mainnet"));
        assert_eq!(parse_caip2("eip155:8453"), None);
    }
}
