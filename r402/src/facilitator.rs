//! Core trait and error type for t402 payment facilitators.
//!
//! This module provides the unified [`Facilitator`] trait for verifying and
//! settling payments, along with the [`FacilitatorError`] enum covering
//! structural failure modes. It is dyn-compatible, allowing heterogeneous
//! facilitator instances (local scheme handlers, remote HTTP clients) to be
//! stored in registries and passed around as trait objects.
//!
//! Per the error handling design: *structural* failures (malformed input,
//! RPC transport errors, misconfiguration) are returned as `Err`; *protocol*
//! failures (invalid signature, insufficient balance, and so on) are
//! returned as `Ok` values carrying `isValid: false` / `success: false`.
//! This trait never collapses the two into one channel.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use r402_proto::helpers::find_schemes_by_network;
use r402_proto::{Network, SupportedResponseV1};

use crate::error::SchemeNotFoundError;
use crate::proto;
use crate::scheme::{SchemeFacilitator, SchemeFacilitatorV1};

/// Boxed future type alias for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Structural errors that can occur during facilitator operations.
///
/// These never represent a failed payment — a failed payment is a
/// successfully-computed `VerifyResponse`/`SettleResponse` with
/// `isValid`/`success` set to `false`.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FacilitatorError {
    /// The requested `(scheme, network)` has no registered mechanism.
    #[error("unsupported mechanism: scheme {scheme:?} on network {network:?}")]
    UnsupportedMechanism {
        /// The requested scheme.
        scheme: String,
        /// The requested network.
        network: String,
    },
    /// The `t402Version` field was missing or not one of the supported values.
    #[error(transparent)]
    UnsupportedVersion(#[from] proto::ProtocolError),
    /// A blockchain RPC call failed (transport error, malformed response).
    #[error("RPC error: {0}")]
    Rpc(String),
    /// Any other structural failure not covered by the specific variants.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Trait defining the asynchronous interface for t402 payment facilitators.
///
/// This is the unified trait for both local scheme handlers (EVM/SVM) and
/// remote facilitator clients reached over HTTP.
pub trait Facilitator: Send + Sync {
    /// Verifies a proposed payment payload against a [`proto::VerifyRequest`].
    ///
    /// Checks payload integrity, signature validity, balance sufficiency,
    /// network compatibility, and compliance with the declared requirements.
    /// A failed check yields `Ok(VerifyResponse::invalid(..))`, never `Err`.
    fn verify(
        &self,
        request: proto::VerifyRequest,
    ) -> BoxFuture<'_, Result<proto::VerifyResponse, FacilitatorError>>;

    /// Executes an on-chain settlement for a valid [`proto::SettleRequest`].
    ///
    /// Implementations re-validate the payment before transacting.
    fn settle(
        &self,
        request: proto::SettleRequest,
    ) -> BoxFuture<'_, Result<proto::SettleResponse, FacilitatorError>>;

    /// Returns the payment kinds supported by this facilitator.
    fn supported(&self) -> BoxFuture<'_, Result<proto::SupportedResponse, FacilitatorError>>;
}

impl<T: Facilitator> Facilitator for Arc<T> {
    fn verify(
        &self,
        request: proto::VerifyRequest,
    ) -> BoxFuture<'_, Result<proto::VerifyResponse, FacilitatorError>> {
        self.as_ref().verify(request)
    }

    fn settle(
        &self,
        request: proto::SettleRequest,
    ) -> BoxFuture<'_, Result<proto::SettleResponse, FacilitatorError>> {
        self.as_ref().settle(request)
    }

    fn supported(&self) -> BoxFuture<'_, Result<proto::SupportedResponse, FacilitatorError>> {
        self.as_ref().supported()
    }
}

/// Scheme registry and dispatch orchestrator for a local facilitator.
///
/// Holds a `(network, scheme) -> handler` table for both protocol versions,
/// built up via [`Self::register`]/[`Self::register_v1`], and dispatches
/// `verify`/`settle` calls to whichever handler matches. Mirrors the
/// registration shape of [`crate::client::X402ClientBase`] on the other side
/// of the wire.
#[derive(Default)]
pub struct X402Facilitator {
    schemes_v2: HashMap<Network, HashMap<String, Arc<dyn SchemeFacilitator>>>,
    schemes_v1: HashMap<Network, HashMap<String, Arc<dyn SchemeFacilitatorV1>>>,
}

impl X402Facilitator {
    /// Creates an empty facilitator with no registered schemes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schemes_v2: HashMap::new(),
            schemes_v1: HashMap::new(),
        }
    }

    /// Registers a V2 scheme handler for one or more CAIP-2 networks (or
    /// wildcard patterns such as `"eip155:*"`). The same handler instance is
    /// shared across every listed network.
    pub fn register(&mut self, networks: Vec<Network>, handler: Box<dyn SchemeFacilitator>) -> &mut Self {
        let handler: Arc<dyn SchemeFacilitator> = Arc::from(handler);
        let scheme = handler.scheme().to_owned();
        for network in networks {
            self.schemes_v2
                .entry(network)
                .or_default()
                .insert(scheme.clone(), Arc::clone(&handler));
        }
        self
    }

    /// Registers a V1 (legacy) scheme handler for one or more networks.
    pub fn register_v1(
        &mut self,
        networks: Vec<Network>,
        handler: Box<dyn SchemeFacilitatorV1>,
    ) -> &mut Self {
        let handler: Arc<dyn SchemeFacilitatorV1> = Arc::from(handler);
        let scheme = handler.scheme().to_owned();
        for network in networks {
            self.schemes_v1
                .entry(network)
                .or_default()
                .insert(scheme.clone(), Arc::clone(&handler));
        }
        self
    }

    fn lookup_v2(
        &self,
        scheme: &str,
        network: &str,
    ) -> Result<&Arc<dyn SchemeFacilitator>, SchemeNotFoundError> {
        find_schemes_by_network(&self.schemes_v2, network)
            .and_then(|handlers| handlers.get(scheme))
            .ok_or_else(|| SchemeNotFoundError::new(scheme, network))
    }

    fn lookup_v1(
        &self,
        scheme: &str,
        network: &str,
    ) -> Result<&Arc<dyn SchemeFacilitatorV1>, SchemeNotFoundError> {
        find_schemes_by_network(&self.schemes_v1, network)
            .and_then(|handlers| handlers.get(scheme))
            .ok_or_else(|| SchemeNotFoundError::new(scheme, network))
    }

    /// Verifies a V2 payment payload, dispatching to the registered handler
    /// for its `(scheme, network)` pair.
    ///
    /// # Errors
    ///
    /// Returns an error if no handler is registered for the pair. A
    /// registered handler's own verification failure is returned as `Ok`
    /// with `isValid: false`, never as `Err`.
    pub async fn verify(
        &self,
        payload: &proto::PaymentPayload,
        requirements: &proto::PaymentRequirements,
    ) -> Result<proto::VerifyResponse, Box<dyn std::error::Error + Send + Sync>> {
        let handler = self.lookup_v2(&requirements.scheme, &requirements.network)?;
        Ok(handler.verify(payload, requirements).await)
    }

    /// Settles a V2 payment on-chain, dispatching to the registered handler.
    ///
    /// # Errors
    ///
    /// Returns an error if no handler is registered for the pair.
    pub async fn settle(
        &self,
        payload: &proto::PaymentPayload,
        requirements: &proto::PaymentRequirements,
    ) -> Result<proto::SettleResponse, Box<dyn std::error::Error + Send + Sync>> {
        let handler = self.lookup_v2(&requirements.scheme, &requirements.network)?;
        Ok(handler.settle(payload, requirements).await)
    }

    /// Verifies a V1 (legacy) payment payload.
    ///
    /// # Errors
    ///
    /// Returns an error if no handler is registered for the pair.
    pub async fn verify_v1(
        &self,
        payload: &proto::PaymentPayloadV1,
        requirements: &proto::PaymentRequirementsV1,
    ) -> Result<proto::VerifyResponse, Box<dyn std::error::Error + Send + Sync>> {
        let handler = self.lookup_v1(&requirements.scheme, &requirements.network)?;
        Ok(handler.verify(payload, requirements).await)
    }

    /// Settles a V1 (legacy) payment on-chain.
    ///
    /// # Errors
    ///
    /// Returns an error if no handler is registered for the pair.
    pub async fn settle_v1(
        &self,
        payload: &proto::PaymentPayloadV1,
        requirements: &proto::PaymentRequirementsV1,
    ) -> Result<proto::SettleResponse, Box<dyn std::error::Error + Send + Sync>> {
        let handler = self.lookup_v1(&requirements.scheme, &requirements.network)?;
        Ok(handler.settle(payload, requirements).await)
    }

    /// Aggregates the supported payment kinds across every registered
    /// handler, deduplicated by `(scheme, network)`.
    #[must_use]
    pub fn get_supported(&self) -> proto::SupportedResponse {
        let mut kinds = Vec::new();
        let mut signers: HashMap<String, Vec<String>> = HashMap::new();

        for (network, handlers) in &self.schemes_v2 {
            for handler in handlers.values() {
                kinds.push(proto::SupportedKind {
                    x402_version: 2,
                    scheme: handler.scheme().to_owned(),
                    network: network.clone(),
                    extra: handler.get_extra(network),
                });
                signers
                    .entry(handler.caip_family().to_owned())
                    .or_insert_with(|| handler.get_signers(network));
            }
        }
        for (network, handlers) in &self.schemes_v1 {
            for handler in handlers.values() {
                kinds.push(proto::SupportedKind {
                    x402_version: 1,
                    scheme: handler.scheme().to_owned(),
                    network: network.clone(),
                    extra: handler.get_extra(network),
                });
                signers
                    .entry(handler.caip_family().to_owned())
                    .or_insert_with(|| handler.get_signers(network));
            }
        }

        proto::SupportedResponse {
            kinds,
            extensions: Vec::new(),
            signers,
        }
    }

    /// Returns the legacy V1-shaped supported response (no extensions/signers).
    #[must_use]
    pub fn get_supported_v1(&self) -> SupportedResponseV1 {
        let kinds = self
            .schemes_v1
            .iter()
            .flat_map(|(network, handlers)| {
                handlers.values().map(move |handler| proto::SupportedKind {
                    x402_version: 1,
                    scheme: handler.scheme().to_owned(),
                    network: network.clone(),
                    extra: handler.get_extra(network),
                })
            })
            .collect();
        SupportedResponseV1 { kinds }
    }
}
