#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Solana chain support for the t402 payment protocol.
//!
//! This crate provides the "exact" payment scheme for Solana, based on SPL
//! Token `TransferChecked` instructions with a facilitator-paid fee payer.
//!
//! # Architecture
//!
//! - [`chain`] - Core Solana chain types (CAIP-2 ids, known assets)
//! - [`provider`] - Facilitator-side chain provider abstraction
//! - [`rpc`] - Client-side RPC abstraction used to build and simulate transactions
//! - [`exact`] - The "exact" payment scheme (client, server, facilitator)
//!
//! # Feature Flags
//!
//! - `server` - Server-side price tag generation
//! - `client` - Client-side payment signing
//! - `facilitator` - Facilitator-side payment verification and settlement
//! - `telemetry` - `OpenTelemetry` tracing support

pub mod chain;
pub mod exact;

#[cfg(feature = "facilitator")]
pub mod provider;

#[cfg(feature = "client")]
pub mod rpc;

mod networks;
pub use networks::*;
