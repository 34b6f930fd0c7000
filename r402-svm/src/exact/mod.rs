//! Solana "exact" payment scheme implementation.
//!
//! Implements the "exact" payment scheme for Solana using SPL Token
//! `TransferChecked` instructions for token transfers.
//!
//! # Transaction structure
//!
//! The expected transaction layout is:
//! - Index 0: `SetComputeUnitLimit` instruction
//! - Index 1: `SetComputeUnitPrice` instruction
//! - Index 2: `TransferChecked` instruction (SPL Token or Token-2022)
//! - Index 3+: additional instructions, if allowed by facilitator configuration

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "facilitator")]
pub mod facilitator;

#[cfg(feature = "client")]
pub mod client;

pub mod error;
pub use error::*;

pub mod types;
pub use types::*;
