#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! x402 Facilitator Server
//!
//! A production-ready HTTP server implementing the [x402](https://www.x402.org) payment protocol.
//!
//! This crate provides a complete, runnable facilitator that supports multiple blockchain
//! networks (EVM/EIP-155 and Solana) and can verify and settle payments on-chain.
//!
//! # Modules
//!
//! - [`config`] — Configuration types and loading
//! - [`handlers`] — HTTP endpoint handlers for verify, settle, supported
//! - [`run`] — Main server initialization and runtime
//! - [`util`] — Utilities for graceful shutdown and telemetry

pub mod config;
pub mod error;
pub mod handlers;
pub mod run;
pub mod util;

pub use run::run;
