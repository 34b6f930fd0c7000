//! Client-side payment signing for the EIP-155 "exact" scheme.
//!
//! Provides [`Eip155ExactClient`] for signing ERC-3009
//! `transferWithAuthorization` payments on EVM chains.

use std::future::Future;
use std::sync::Arc;

use alloy_primitives::{Address, FixedBytes, Signature, U256};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolStruct, eip712_domain};
use r402::proto::{PaymentRequirements, UnixTimestamp};
use r402::scheme::{BoxFuture, SchemeClient, SchemeError};
use rand::Rng;
use serde_json::Value;

use crate::exact::types::{
    ExactAuthorization, ExactPayload, ExactRequirementsExtra, SCHEME_EXACT,
    TransferWithAuthorization,
};

/// Abstracts signing so both owned signers and `Arc`-wrapped signers work.
///
/// Alloy's `Signer` trait is not implemented for `Arc<T>`, but callers often
/// want to share a signer across multiple client instances.
pub trait SignerLike: Send + Sync {
    /// Returns the address of the signer.
    fn address(&self) -> Address;

    /// Signs the given hash.
    fn sign_hash(
        &self,
        hash: &FixedBytes<32>,
    ) -> impl Future<Output = Result<Signature, alloy_signer::Error>> + Send;
}

impl SignerLike for PrivateKeySigner {
    fn address(&self) -> Address {
        Self::address(self)
    }

    async fn sign_hash(&self, hash: &FixedBytes<32>) -> Result<Signature, alloy_signer::Error> {
        alloy_signer::Signer::sign_hash(self, hash).await
    }
}

impl<T: SignerLike + Send + Sync> SignerLike for Arc<T> {
    fn address(&self) -> Address {
        (**self).address()
    }

    async fn sign_hash(&self, hash: &FixedBytes<32>) -> Result<Signature, alloy_signer::Error> {
        (**self).sign_hash(hash).await
    }
}

/// The `validAfter` backdate applied to V1 authorizations, matching the
/// historical client behavior so V1 facilitators built against it keep
/// working. V2 uses `now` with no backdate.
const V1_VALID_AFTER_BACKDATE_SECS: u64 = 10 * 60;

/// Computes `validAfter` for an authorization, version-gated.
///
/// V1 backdates by [`V1_VALID_AFTER_BACKDATE_SECS`] to tolerate clock skew
/// between client and facilitator on the legacy wire format. V2 uses `now`
/// exactly, since the facilitator independently enforces a small forward
/// skew allowance at verify time.
fn valid_after_for_version(now: UnixTimestamp, x402_version: u32) -> UnixTimestamp {
    if x402_version == 1 {
        UnixTimestamp::from_secs(now.as_secs().saturating_sub(V1_VALID_AFTER_BACKDATE_SECS))
    } else {
        now
    }
}

/// Parameters needed to sign an ERC-3009 `transferWithAuthorization`.
#[derive(Debug, Clone)]
pub struct Eip3009SigningParams {
    /// The EIP-155 chain ID (numeric).
    pub chain_id: u64,
    /// The token contract address (EIP-712 verifying contract).
    pub asset_address: Address,
    /// The recipient address for the transfer.
    pub pay_to: Address,
    /// The amount to transfer, in the token's smallest unit.
    pub amount: U256,
    /// Maximum timeout in seconds for the authorization validity window.
    pub max_timeout_seconds: u64,
    /// EIP-712 domain name/version, taken from requirements `extra`.
    pub extra: ExactRequirementsExtra,
    /// Protocol version, to select the `validAfter` backdate policy.
    pub x402_version: u32,
}

/// Signs an ERC-3009 `TransferWithAuthorization` via EIP-712.
///
/// Builds the EIP-712 domain and authorization struct, computes the
/// signing hash, and returns the resulting [`ExactPayload`].
///
/// # Errors
///
/// Returns an error if EIP-712 signing fails.
pub async fn sign_erc3009_authorization<S: SignerLike + Sync>(
    signer: &S,
    params: &Eip3009SigningParams,
) -> Result<ExactPayload, SchemeError> {
    let domain = eip712_domain! {
        name: params.extra.name.clone(),
        version: params.extra.version.clone(),
        chain_id: params.chain_id,
        verifying_contract: params.asset_address,
    };

    let now = UnixTimestamp::now();
    let valid_after = valid_after_for_version(now, params.x402_version);
    let valid_before = now + params.max_timeout_seconds;
    let nonce_bytes: [u8; 32] = rand::rng().random();
    let nonce = FixedBytes(nonce_bytes);

    let typed_data = TransferWithAuthorization {
        from: signer.address(),
        to: params.pay_to,
        value: params.amount,
        validAfter: U256::from(valid_after.as_secs()),
        validBefore: U256::from(valid_before.as_secs()),
        nonce,
    };

    let eip712_hash = typed_data.eip712_signing_hash(&domain);
    let signature = signer
        .sign_hash(&eip712_hash)
        .await
        .map_err(|e| -> SchemeError { format!("signing failed: {e:?}").into() })?;

    Ok(ExactPayload {
        signature: format!("0x{}", alloy_primitives::hex::encode(signature.as_bytes())),
        authorization: ExactAuthorization {
            from: signer.address().to_string(),
            to: params.pay_to.to_string(),
            value: params.amount.to_string(),
            valid_after: valid_after.as_secs().to_string(),
            valid_before: valid_before.as_secs().to_string(),
            nonce: format!("0x{}", alloy_primitives::hex::encode(nonce_bytes)),
        },
    })
}

/// Client for signing EIP-155 "exact" scheme payments.
///
/// Handles the creation and signing of ERC-3009 `transferWithAuthorization`
/// payments for EVM chains addressed via CAIP-2 chain IDs.
#[derive(Debug)]
pub struct Eip155ExactClient<S> {
    signer: S,
}

impl<S> Eip155ExactClient<S> {
    /// Creates a new client wrapping the given signer.
    pub const fn new(signer: S) -> Self {
        Self { signer }
    }
}

impl<S> SchemeClient for Eip155ExactClient<S>
where
    S: SignerLike + Sync,
{
    fn scheme(&self) -> &str {
        SCHEME_EXACT
    }

    fn create_payment_payload<'a>(
        &'a self,
        requirements: &'a PaymentRequirements,
    ) -> BoxFuture<'a, Result<Value, SchemeError>> {
        Box::pin(async move {
            let chain_id = crate::chain::parse_caip2(&requirements.network)
                .ok_or_else(|| -> SchemeError {
                    format!("cannot parse CAIP-2 network: {}", requirements.network).into()
                })?;

            let asset_address: Address = requirements
                .asset
                .parse()
                .map_err(|e| -> SchemeError { format!("invalid asset address: {e}").into() })?;
            let pay_to: Address = requirements
                .pay_to
                .parse()
                .map_err(|e| -> SchemeError { format!("invalid pay_to address: {e}").into() })?;
            let amount: U256 = requirements
                .amount
                .parse()
                .map_err(|e| -> SchemeError { format!("invalid amount: {e}").into() })?;
            let extra: ExactRequirementsExtra = serde_json::from_value(requirements.extra.clone())
                .map_err(|e| -> SchemeError {
                    format!("missing EIP-712 domain params in extra: {e}").into()
                })?;

            let params = Eip3009SigningParams {
                chain_id,
                asset_address,
                pay_to,
                amount,
                max_timeout_seconds: requirements.max_timeout_seconds,
                extra,
                x402_version: 2,
            };

            let payload = sign_erc3009_authorization(&self.signer, &params).await?;
            serde_json::to_value(payload)
                .map_err(|e| -> SchemeError { format!("failed to serialize payload: {e}").into() })
        })
    }
}
