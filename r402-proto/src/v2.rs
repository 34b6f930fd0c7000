//! Protocol version 2 (V2) types for the x402 protocol.
//!
//! V2 uses CAIP-2 network identifiers (e.g. `"eip155:8453"`) and nests the
//! accepted requirements inside the payment payload rather than lifting
//! `scheme`/`network` to the top level as V1 does.

use serde::{Deserialize, Serialize};

use crate::Network;

/// Metadata about the resource being paid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    /// Human-readable description of the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the resource content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// URL of the resource.
    pub url: String,
}

/// Payment requirements set by the seller (V2 format).
///
/// An immutable declaration of one acceptable payment. `amount` is always in
/// the token's smallest unit at the wire layer; decimal-to-smallest
/// conversion happens server-side when building requirements from a
/// human-readable price, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    /// The payment scheme (e.g. `"exact"`).
    pub scheme: String,
    /// The CAIP-2 network identifier (e.g. `"eip155:8453"`).
    pub network: Network,
    /// The payment amount, as a decimal string in the token's smallest unit.
    pub amount: String,
    /// The recipient address for payment, mechanism-interpreted.
    pub pay_to: String,
    /// Maximum time in seconds for payment validity. Defaults to 300.
    #[serde(default = "default_timeout_seconds")]
    pub max_timeout_seconds: u64,
    /// The token asset identifier, mechanism-interpreted.
    pub asset: String,
    /// Scheme-specific extra data. Must round-trip byte-identical through
    /// verify; the facilitator treats it as opaque input. Defaults to an
    /// empty object so mechanism code can always treat it as present.
    #[serde(default)]
    pub extra: serde_json::Value,
}

const fn default_timeout_seconds() -> u64 {
    300
}

/// HTTP 402 Payment Required response body for V2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequired {
    /// Protocol version (always 2 for this type).
    #[serde(default = "default_v2")]
    pub x402_version: u32,
    /// Optional error message if the request was malformed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Information about the resource being paid for.
    pub resource: ResourceInfo,
    /// Non-empty ordered list of acceptable payment methods.
    #[serde(default)]
    pub accepts: Vec<PaymentRequirements>,
    /// Optional protocol extensions, keyed by extension id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<crate::Extensions>,
}

/// A signed payment authorization from the buyer (V2 format).
///
/// `accepted` is a byte-exact copy of the single requirement the client
/// selected from `PaymentRequired::accepts`; the facilitator rejects any
/// payload whose `accepted` field does not equal a requirement it itself
/// emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// Protocol version (always 2 for this type).
    #[serde(default = "default_v2")]
    pub x402_version: u32,
    /// The payment requirements the buyer accepted.
    pub accepted: PaymentRequirements,
    /// The mechanism-specific signed payload.
    pub payload: serde_json::Value,
    /// Information about the resource being paid for, copied from the 402.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceInfo>,
    /// Protocol extensions, copied verbatim from `PaymentRequired`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<crate::Extensions>,
}

impl PaymentRequirements {
    /// Returns the payment amount (V2 stores it directly as `amount`).
    #[must_use]
    pub fn amount(&self) -> &str {
        &self.amount
    }
}

impl PaymentPayload {
    /// Returns the payment scheme (nested under `accepted` in V2).
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.accepted.scheme
    }

    /// Returns the network (nested under `accepted` in V2).
    #[must_use]
    pub fn network(&self) -> &str {
        &self.accepted.network
    }
}

/// Request body for `POST /verify` and `POST /settle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// The payment payload to verify.
    pub payment_payload: PaymentPayload,
    /// The requirements to verify against.
    pub payment_requirements: PaymentRequirements,
}

/// Request body for `POST /settle`. Structurally identical to
/// [`VerifyRequest`] but kept as a distinct type since the two evolve
/// independently.
pub type SettleRequest = VerifyRequest;

const fn default_v2() -> u32 {
    2
}
