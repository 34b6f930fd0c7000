//! Facilitator-side "exact" scheme implementation for Solana.
//!
//! Implements [`SchemeFacilitator`] for the `exact` scheme. Verifies and
//! settles SPL Token `TransferChecked` payments on Solana clusters using a
//! facilitator-paid fee payer.

mod config;
mod verify;

pub use config::SolanaExactFacilitatorConfig;
pub use verify::{
    TransferCheckedInstruction, TransferRequirement, VerifyTransferError, VerifyTransferResult,
    settle_transaction, validate_instructions, verify_compute_limit_instruction,
    verify_compute_price_instruction, verify_transaction, verify_transfer,
    verify_transfer_instruction,
};

use r402::chain::ChainProviderOps;
use r402::proto::{PaymentPayload, PaymentRequirements, SettleResponse, VerifyResponse};
use r402::scheme::{BoxFuture, SchemeFacilitator};
use serde_json::Value;

use crate::exact::error::SolanaExactError;
use crate::exact::types::{ExactRequirementsExtra, SCHEME_EXACT};
use crate::provider::SolanaChainProviderLike;

/// Facilitator implementation for the "exact" payment scheme on Solana.
///
/// Verifies that a client-built, partially-signed `TransferChecked`
/// transaction satisfies the payment requirements, then co-signs and
/// submits it as the fee payer.
pub struct SolanaExactFacilitator<P> {
    provider: P,
    config: SolanaExactFacilitatorConfig,
}

impl<P> std::fmt::Debug for SolanaExactFacilitator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaExactFacilitator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P> SolanaExactFacilitator<P> {
    /// Creates a new facilitator with the given provider and default config.
    pub fn new(provider: P, config: SolanaExactFacilitatorConfig) -> Self {
        Self { provider, config }
    }
}

impl<P> SolanaExactFacilitator<P>
where
    P: SolanaChainProviderLike + ChainProviderOps + Send + Sync,
{
    async fn verify_inner(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> VerifyResponse {
        match verify_transfer(&self.provider, payload, requirements, &self.config).await {
            Ok(result) => VerifyResponse::valid(result.payer.to_string()),
            Err(e) => VerifyResponse::invalid(verify_error_reason(&e), e.to_string()),
        }
    }

    async fn settle_inner(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> SettleResponse {
        let network = self.provider.chain_id().to_string();
        let verification =
            match verify_transfer(&self.provider, payload, requirements, &self.config).await {
                Ok(v) => v,
                Err(e) => {
                    return SettleResponse::error(verify_error_reason(&e), e.to_string(), &network);
                }
            };
        let payer = verification.payer.to_string();
        match settle_transaction(&self.provider, verification).await {
            Ok(signature) => SettleResponse::success(signature.to_string(), &network, &payer),
            Err(e) => SettleResponse::error("transaction_failed", e.to_string(), &network),
        }
    }
}

/// Maps a [`VerifyTransferError`] to its reason code from the SVM exact
/// mechanism's taxonomy.
fn verify_error_reason(error: &VerifyTransferError) -> &'static str {
    match error {
        VerifyTransferError::Exact(e) => exact_error_reason(e),
        VerifyTransferError::RequirementsMismatch | VerifyTransferError::InvalidPayload(_) => {
            "invalid_payload"
        }
        VerifyTransferError::UnsupportedNetwork(_) => "network_mismatch",
        VerifyTransferError::InvalidRequirements(_) => "invalid_payload",
        VerifyTransferError::MissingFeePayer => "invalid_exact_svm_payload_missing_fee_payer",
        VerifyTransferError::FeePayerNotManaged => "fee_payer_not_managed_by_facilitator",
        VerifyTransferError::Provider(_) => "transaction_simulation_failed",
        VerifyTransferError::MintMismatch => "invalid_exact_svm_payload_mint_mismatch",
        VerifyTransferError::RecipientMismatch => "invalid_exact_svm_payload_recipient_mismatch",
        VerifyTransferError::AmountInsufficient => "invalid_exact_svm_payload_amount_insufficient",
    }
}

/// Maps a [`SolanaExactError`] (raised during transaction decoding and
/// instruction-level validation) to its SVM exact mechanism reason code.
fn exact_error_reason(error: &SolanaExactError) -> &'static str {
    match error {
        SolanaExactError::TransactionDecoding(_) | SolanaExactError::NoAccountAtIndex(_) => {
            "invalid_exact_svm_payload_transaction_could_not_be_decoded"
        }
        SolanaExactError::TooFewInstructions
        | SolanaExactError::AdditionalInstructionsNotAllowed
        | SolanaExactError::InstructionCountExceedsMax(_)
        | SolanaExactError::BlockedProgram(_)
        | SolanaExactError::ProgramNotAllowed(_)
        | SolanaExactError::NoInstructionAtIndex(_)
        | SolanaExactError::EmptyInstructionAtIndex(_) => {
            "invalid_exact_svm_payload_instructions_length"
        }
        SolanaExactError::MaxComputeUnitLimitExceeded
        | SolanaExactError::InvalidComputeLimitInstruction => {
            "invalid_exact_svm_payload_compute_limit_instruction"
        }
        SolanaExactError::InvalidComputePriceInstruction => {
            "invalid_exact_svm_payload_compute_price_instruction"
        }
        SolanaExactError::MaxComputeUnitPriceExceeded => {
            "invalid_exact_svm_payload_compute_price_too_high"
        }
        SolanaExactError::InvalidTokenInstruction => {
            "invalid_exact_svm_payload_no_transfer_instruction"
        }
        SolanaExactError::CreateATANotSupported => "invalid_exact_svm_payload_recipient_mismatch",
        SolanaExactError::FeePayerIncludedInInstructionAccounts
        | SolanaExactError::FeePayerTransferringFunds => {
            "invalid_exact_svm_payload_transaction_fee_payer_transferring_funds"
        }
        SolanaExactError::MissingSenderAccount => "invalid_payload",
    }
}

impl<P> SchemeFacilitator for SolanaExactFacilitator<P>
where
    P: SolanaChainProviderLike + ChainProviderOps + Send + Sync + 'static,
{
    fn scheme(&self) -> &str {
        SCHEME_EXACT
    }

    fn caip_family(&self) -> &str {
        "solana:*"
    }

    fn get_extra(&self, _network: &str) -> Option<Value> {
        let extra = ExactRequirementsExtra {
            fee_payer: self.provider.pubkey().into(),
        };
        serde_json::to_value(extra).ok()
    }

    fn get_signers(&self, _network: &str) -> Vec<String> {
        vec![self.provider.pubkey().to_string()]
    }

    fn verify<'a>(
        &'a self,
        payload: &'a PaymentPayload,
        requirements: &'a PaymentRequirements,
    ) -> BoxFuture<'a, VerifyResponse> {
        Box::pin(self.verify_inner(payload, requirements))
    }

    fn settle<'a>(
        &'a self,
        payload: &'a PaymentPayload,
        requirements: &'a PaymentRequirements,
    ) -> BoxFuture<'a, SettleResponse> {
        Box::pin(self.settle_inner(payload, requirements))
    }
}
