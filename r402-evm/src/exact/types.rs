//! Type definitions for the EIP-155 "exact" payment scheme.
//!
//! EIP-3009 `transferWithAuthorization` is the only on-chain transfer
//! mechanism this scheme supports. Wire values that move through JSON
//! (amounts, timestamps, nonces) are kept as decimal/hex strings so the
//! payload round-trips byte-identical through verify, matching how the
//! rest of the protocol treats signed payloads as opaque.

#[cfg(any(feature = "facilitator", feature = "client"))]
use alloy_sol_types::sol;
use serde::{Deserialize, Serialize};

/// The scheme identifier used in `PaymentRequirements.scheme` / `PaymentPayload.accepted.scheme`.
pub const SCHEME_EXACT: &str = "exact";

/// EIP-3009 `transferWithAuthorization` payment payload.
///
/// Contains both the EIP-712 signature and the structured authorization
/// data that was signed. Together they are everything needed to submit a
/// `transferWithAuthorization` call on an EIP-3009 compliant token contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactPayload {
    /// Hex-encoded signature (`0x`-prefixed). May be a plain 65-byte EOA
    /// signature, a 64-byte ERC-2098 compact signature, an EIP-1271
    /// arbitrary-length signature, or an ERC-6492 wrapped signature.
    pub signature: String,

    /// The structured authorization data that was signed.
    pub authorization: ExactAuthorization,
}

/// EIP-712 structured data for an EIP-3009 transfer authorization.
///
/// Every field is carried as a string at the wire layer (hex for addresses
/// and the nonce, decimal for amount/timestamps) so payloads survive JSON
/// round-tripping without precision loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactAuthorization {
    /// The address authorizing the transfer (token owner), hex-encoded.
    pub from: String,

    /// The recipient address for the transfer, hex-encoded.
    pub to: String,

    /// The amount of tokens to transfer, in the token's smallest unit, as
    /// a decimal string.
    pub value: String,

    /// The authorization is not valid before this unix timestamp
    /// (inclusive), as a decimal string.
    pub valid_after: String,

    /// The authorization expires at this unix timestamp (exclusive), as a
    /// decimal string.
    pub valid_before: String,

    /// A unique 32-byte nonce (`0x`-prefixed hex) to prevent replay.
    pub nonce: String,
}

/// Extra payment requirements data for the EVM exact scheme: the EIP-712
/// domain parameters needed to reconstruct the typed-data hash the client
/// signed over.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactRequirementsExtra {
    /// The token name as used in the EIP-712 domain.
    pub name: String,

    /// The token version as used in the EIP-712 domain.
    pub version: String,
}

#[cfg(any(feature = "facilitator", feature = "client"))]
sol!(
    /// Solidity-compatible struct definition for EIP-3009 `transferWithAuthorization`.
    ///
    /// Matches the EIP-712 typed-data layout signed by the payer; used to
    /// reconstruct the domain/message hash during verification.
    #[derive(Serialize, Deserialize)]
    struct TransferWithAuthorization {
        address from;
        address to;
        uint256 value;
        uint256 validAfter;
        uint256 validBefore;
        bytes32 nonce;
    }
);

#[cfg(any(feature = "facilitator", feature = "client"))]
sol!(
    #[sol(rpc)]
    interface IEip3009Token {
        function transferWithAuthorization(address from, address to, uint256 value, uint256 validAfter, uint256 validBefore, bytes32 nonce, bytes signature) external;
        function transferWithAuthorization(address from, address to, uint256 value, uint256 validAfter, uint256 validBefore, bytes32 nonce, uint8 v, bytes32 r, bytes32 s) external;
        function authorizationState(address authorizer, bytes32 nonce) external view returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function isValidSignature(bytes32 hash, bytes signature) external view returns (bytes4);
    }
);

#[cfg(any(feature = "facilitator", feature = "client"))]
pub use IEip3009Token::{
    authorizationStateCall, balanceOfCall, isValidSignatureCall,
    transferWithAuthorization_0Call as transferWithAuthorizationCall,
    transferWithAuthorization_1Call as transferWithAuthorizationVRSCall,
};
