#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the t402 payment protocol.
//!
//! This crate provides the foundational, blockchain-agnostic pieces of the
//! protocol: the scheme registry, the client/resource-server/facilitator
//! orchestrators, lifecycle hooks, CAIP-2 chain identifiers, and the money
//! parser chain. Wire format types live in the separate [`r402_proto`]
//! crate and are re-exported here as [`proto`]; chain-specific mechanisms
//! (EVM, SVM) live in their own crates.
//!
//! # Modules
//!
//! - [`amount`] - Human-readable price parsing chain
//! - [`chain`] - CAIP-2 chain identifiers and provider abstractions
//! - [`client`] - Client-side payment payload orchestrator
//! - [`config`] - Resource configuration types
//! - [`encoding`] - Base64 framing for protocol headers
//! - [`error`] - Error types for orchestrator-level failures
//! - [`facilitator`] - Core trait for payment verification and settlement
//! - [`hooks`] - Lifecycle hooks for client, server, and facilitator phases
//! - [`networks`] - Registry of well-known blockchain networks
//! - [`proto`] - Wire format types (re-exported from `r402-proto`)
//! - [`scheme`] - Payment scheme traits for the extensible mechanism system
//! - [`server`] - Resource-server orchestrator
//! - [`timestamp`] - Unix timestamp type for authorization windows
//!
//! # Feature Flags
//!
//! - `cli` - Enables `clap`-derived configuration types
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod amount;
pub mod chain;
pub mod client;
pub mod config;
pub mod encoding;
pub mod error;
pub mod facilitator;
pub mod hooks;
pub mod networks;
pub mod scheme;
pub mod server;
pub mod timestamp;

/// Wire format types, re-exported from the standalone [`r402_proto`] crate.
///
/// Kept as a module (rather than a flat re-export at the crate root) so
/// existing call sites can keep writing `r402::proto::PaymentRequirements`.
pub mod proto {
    pub use r402_proto::*;
}
