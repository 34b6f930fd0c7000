//! Solana RPC abstraction used to build and simulate client-side transactions.
//!
//! Mirrors [`crate::provider::SolanaChainProviderLike`] but for the read-only,
//! unauthenticated calls a payer needs before it has signed anything.

use std::future::Future;

use solana_account::Account;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSimulateTransactionConfig;
use solana_client::rpc_response::{RpcPrioritizationFee, RpcSimulateTransactionResult};
use solana_message::Hash;
use solana_pubkey::Pubkey;
use solana_transaction::versioned::VersionedTransaction;

/// Capabilities a Solana RPC endpoint must expose to build and simulate a
/// payment transaction client-side.
pub trait RpcClientLike: Send + Sync {
    /// Fetches a single account, erroring if it does not exist.
    fn get_account(
        &self,
        pubkey: &Pubkey,
    ) -> impl Future<Output = Result<Account, ClientError>> + Send;

    /// Simulates a transaction without submitting it.
    fn simulate_transaction_with_config(
        &self,
        transaction: &VersionedTransaction,
        config: RpcSimulateTransactionConfig,
    ) -> impl Future<Output = Result<RpcSimulateTransactionResult, ClientError>> + Send;

    /// Returns recent prioritization fees observed for the given accounts.
    fn get_recent_prioritization_fees(
        &self,
        addresses: &[Pubkey],
    ) -> impl Future<Output = Result<Vec<RpcPrioritizationFee>, ClientError>> + Send;

    /// Returns a recent blockhash suitable for a new transaction.
    fn get_latest_blockhash(&self) -> impl Future<Output = Result<Hash, ClientError>> + Send;
}

impl RpcClientLike for RpcClient {
    async fn get_account(&self, pubkey: &Pubkey) -> Result<Account, ClientError> {
        self.get_account(pubkey).await
    }

    async fn simulate_transaction_with_config(
        &self,
        transaction: &VersionedTransaction,
        config: RpcSimulateTransactionConfig,
    ) -> Result<RpcSimulateTransactionResult, ClientError> {
        Ok(self
            .simulate_transaction_with_config(transaction, config)
            .await?
            .value)
    }

    async fn get_recent_prioritization_fees(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<RpcPrioritizationFee>, ClientError> {
        self.get_recent_prioritization_fees(addresses).await
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, ClientError> {
        self.get_latest_blockhash().await
    }
}
