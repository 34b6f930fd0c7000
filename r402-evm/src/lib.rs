#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! EIP-155 (EVM) chain support for the t402 payment protocol.
//!
//! This crate provides the "exact" payment scheme for EVM-compatible
//! blockchains, addressed via CAIP-2 `eip155:<chainId>` network identifiers,
//! based on ERC-3009 `transferWithAuthorization`.
//!
//! # Features
//!
//! - **ERC-3009 payments**: gasless token transfers using `transferWithAuthorization`
//! - **Smart wallet support**: EIP-1271 for deployed wallets, EIP-6492 for counterfactual wallets
//! - **Multiple signers**: round-robin signer selection for load distribution
//! - **Nonce management**: automatic nonce tracking with pending-transaction awareness
//!
//! # Architecture
//!
//! - [`chain`] - EVM chain metadata (CAIP-2 ids, known assets)
//! - [`provider`] - alloy-backed chain provider used for settlement
//! - [`exact`] - the "exact" payment scheme (client, server, facilitator)
//!
//! # Feature Flags
//!
//! - `server` - server-side price tag generation
//! - `client` - client-side payment signing
//! - `facilitator` - facilitator-side payment verification and settlement
//! - `telemetry` - `OpenTelemetry` tracing support
//!
//! # Usage Examples
//!
//! ## Server: building payment requirements
//!
//! ```ignore
//! use r402_evm::exact::server::ExactEvmServer;
//! use r402::scheme::SchemeServer;
//!
//! let server = ExactEvmServer::new();
//! let amount = server.parse_price(&serde_json::json!("1.50"), "eip155:8453")?;
//! ```
//!
//! ## Client: signing a payment
//!
//! ```ignore
//! use r402_evm::exact::client::Eip155ExactClient;
//! use alloy_signer_local::PrivateKeySigner;
//!
//! let signer = PrivateKeySigner::random();
//! let client = Eip155ExactClient::new(signer);
//! let payload = client.create_payment_payload(&requirements).await?;
//! ```
//!
//! ## Facilitator: verifying and settling
//!
//! ```ignore
//! use r402_evm::exact::facilitator::ExactEvmFacilitator;
//! use r402::scheme::SchemeFacilitator;
//!
//! let facilitator = ExactEvmFacilitator::new(provider, signer_address);
//! let verify_response = facilitator.verify(&payload, &requirements).await;
//! let settle_response = facilitator.settle(&payload, &requirements).await;
//! ```

pub mod chain;
pub mod exact;

#[cfg(feature = "facilitator")]
pub mod provider;

mod networks;
pub use networks::*;
