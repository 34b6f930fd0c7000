#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP transport layer for the x402 payment protocol.
//!
//! This crate provides HTTP middleware for both client and server roles
//! in the x402 payment protocol.
//!
//! # Feature Flags
//!
//! - `server` — Axum/Tower middleware for payment gating (from x402-axum)
//! - `client` — reqwest-middleware for automatic 402 handling (from x402-reqwest)
//! - `telemetry` — Tracing instrumentation

pub mod constants;
pub mod error;
pub mod headers;
pub mod types;

pub use error::HttpError;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "server")]
pub mod paygate;

#[cfg(feature = "server")]
pub mod facilitator;

#[cfg(feature = "client")]
pub mod client;
