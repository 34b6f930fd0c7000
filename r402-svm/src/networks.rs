//! Known Solana cluster configurations and USDC mint deployments.
//!
//! CAIP-2 Solana references are cluster genesis hashes, not names, so
//! `"solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp"` identifies mainnet-beta.

use solana_pubkey::pubkey;

use crate::chain::{Address, AssetInfo, NetworkConfig};

/// CAIP-2 reference (genesis hash) for Solana mainnet-beta.
pub const SOLANA_MAINNET_REFERENCE: &str = "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";

/// CAIP-2 reference (genesis hash) for Solana devnet.
pub const SOLANA_DEVNET_REFERENCE: &str = "EtWTRABZaYq6iMfeYKouRu166VU2xqa1";

/// USDC mint address on Solana mainnet-beta.
pub const USDC_SOLANA_MAINNET: Address =
    Address::new(pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"));

/// USDC mint address on Solana devnet.
pub const USDC_SOLANA_DEVNET: Address =
    Address::new(pubkey!("4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU"));

/// Default token decimals for USDC.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 6;

/// Returns network configurations for all known Solana clusters.
#[must_use]
pub fn known_networks() -> Vec<NetworkConfig> {
    vec![
        NetworkConfig {
            network: format!("solana:{SOLANA_MAINNET_REFERENCE}"),
            assets: vec![AssetInfo {
                address: USDC_SOLANA_MAINNET,
                decimals: DEFAULT_TOKEN_DECIMALS,
            }],
        },
        NetworkConfig {
            network: format!("solana:{SOLANA_DEVNET_REFERENCE}"),
            assets: vec![AssetInfo {
                address: USDC_SOLANA_DEVNET,
                decimals: DEFAULT_TOKEN_DECIMALS,
            }],
        },
    ]
}

/// Returns all CAIP-2 network identifiers for known Solana clusters.
#[must_use]
pub fn known_network_ids() -> Vec<String> {
    known_networks().into_iter().map(|n| n.network).collect()
}
