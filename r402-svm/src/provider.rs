//! Solana chain provider used for facilitator-side verification and settlement.
//!
//! Wraps a non-blocking RPC client together with the facilitator's fee-payer
//! keypair and the compute-budget ceilings it is willing to accept.

use std::future::Future;

use solana_account::Account;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSimulateTransactionConfig;
use solana_client::rpc_response::RpcSimulateTransactionResult;
use solana_commitment_config::CommitmentConfig;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::versioned::VersionedTransaction;

/// Errors surfaced by [`SolanaChainProviderLike`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SolanaChainProviderError {
    /// The RPC client returned an error.
    #[error("RPC error: {0}")]
    Rpc(#[from] ClientError),
    /// The transaction could not be signed or is missing required signatures.
    #[error("invalid transaction: {0:?}")]
    InvalidTransaction(solana_client::rpc_response::UiTransactionError),
}

/// Capabilities a Solana chain provider must expose to the "exact" scheme
/// facilitator: account lookups, simulation, signing, and submission.
pub trait SolanaChainProviderLike: Send + Sync {
    /// The fee-payer public key this provider signs settlements from.
    fn pubkey(&self) -> Pubkey;

    /// The maximum compute unit limit this facilitator will accept.
    fn max_compute_unit_limit(&self) -> u32;

    /// The maximum compute unit price (in micro-lamports) this facilitator
    /// will accept.
    fn max_compute_unit_price(&self) -> u64;

    /// Fetches multiple accounts, preserving `None` for accounts that don't exist.
    fn get_multiple_accounts(
        &self,
        pubkeys: &[Pubkey],
    ) -> impl Future<Output = Result<Vec<Option<Account>>, SolanaChainProviderError>> + Send;

    /// Simulates a transaction without submitting it.
    fn simulate_transaction_with_config(
        &self,
        transaction: &VersionedTransaction,
        config: RpcSimulateTransactionConfig,
    ) -> impl Future<Output = Result<RpcSimulateTransactionResult, SolanaChainProviderError>> + Send;

    /// Signs the transaction's fee-payer signature slot with the provider's keypair.
    fn sign(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, SolanaChainProviderError>;

    /// Submits a fully-signed transaction and waits for confirmation.
    fn send_and_confirm(
        &self,
        transaction: &VersionedTransaction,
        commitment: CommitmentConfig,
    ) -> impl Future<Output = Result<Signature, SolanaChainProviderError>> + Send;
}

/// Production Solana chain provider backed by a non-blocking RPC client and
/// a single fee-payer keypair.
pub struct SolanaChainProvider {
    rpc_client: RpcClient,
    fee_payer: Keypair,
    chain_reference: String,
    max_compute_unit_limit: u32,
    max_compute_unit_price: u64,
}

impl std::fmt::Debug for SolanaChainProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaChainProvider")
            .field("fee_payer", &self.fee_payer.pubkey())
            .field("chain_reference", &self.chain_reference)
            .finish_non_exhaustive()
    }
}

impl SolanaChainProvider {
    /// Creates a new provider for the given cluster RPC endpoint, signing
    /// with `fee_payer` and bounding simulated compute budgets.
    #[must_use]
    pub fn new(
        rpc_url: impl Into<String>,
        fee_payer: Keypair,
        chain_reference: impl Into<String>,
        max_compute_unit_limit: u32,
        max_compute_unit_price: u64,
    ) -> Self {
        Self {
            rpc_client: RpcClient::new(rpc_url.into()),
            fee_payer,
            chain_reference: chain_reference.into(),
            max_compute_unit_limit,
            max_compute_unit_price,
        }
    }
}

impl SolanaChainProviderLike for SolanaChainProvider {
    fn pubkey(&self) -> Pubkey {
        self.fee_payer.pubkey()
    }

    fn max_compute_unit_limit(&self) -> u32 {
        self.max_compute_unit_limit
    }

    fn max_compute_unit_price(&self) -> u64 {
        self.max_compute_unit_price
    }

    async fn get_multiple_accounts(
        &self,
        pubkeys: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, SolanaChainProviderError> {
        Ok(self.rpc_client.get_multiple_accounts(pubkeys).await?)
    }

    async fn simulate_transaction_with_config(
        &self,
        transaction: &VersionedTransaction,
        config: RpcSimulateTransactionConfig,
    ) -> Result<RpcSimulateTransactionResult, SolanaChainProviderError> {
        Ok(self
            .rpc_client
            .simulate_transaction_with_config(transaction, config)
            .await?
            .value)
    }

    fn sign(
        &self,
        mut transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, SolanaChainProviderError> {
        let message_bytes = transaction.message.serialize();
        let signature = self.fee_payer.sign_message(&message_bytes);
        let static_keys = transaction.message.static_account_keys();
        let num_required = transaction.message.header().num_required_signatures as usize;
        if transaction.signatures.len() < num_required {
            transaction
                .signatures
                .resize(num_required, Signature::default());
        }
        if let Some(pos) = static_keys[..num_required]
            .iter()
            .position(|k| *k == self.fee_payer.pubkey())
        {
            transaction.signatures[pos] = signature;
        }
        Ok(transaction)
    }

    async fn send_and_confirm(
        &self,
        transaction: &VersionedTransaction,
        commitment: CommitmentConfig,
    ) -> Result<Signature, SolanaChainProviderError> {
        let config = solana_client::rpc_config::RpcSendTransactionConfig {
            preflight_commitment: Some(commitment.commitment),
            ..Default::default()
        };
        let signature = self
            .rpc_client
            .send_transaction_with_config(transaction, config)
            .await?;
        self.rpc_client
            .confirm_transaction_with_commitment(&signature, commitment)
            .await?;
        Ok(signature)
    }
}

impl r402::chain::ChainProviderOps for SolanaChainProvider {
    fn chain_id(&self) -> r402::chain::ChainId {
        r402::chain::ChainId::new("solana", self.chain_reference.clone())
    }

    fn signer_addresses(&self) -> Vec<String> {
        vec![self.fee_payer.pubkey().to_string()]
    }
}
