//! Server initialization and runtime for the facilitator daemon.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::{Json, Router};
use r402::facilitator::X402Facilitator;
use tower_http::cors;

use crate::config::FacilitatorConfig;
use crate::handlers::{FacilitatorState, facilitator_router};

#[cfg(feature = "chain-eip155")]
fn register_eip155(
    facilitator: &mut X402Facilitator,
    config: &FacilitatorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    use alloy_network::EthereumWallet;
    use alloy_provider::ProviderBuilder;
    use alloy_signer_local::PrivateKeySigner;
    use alloy_transport_http::reqwest::Url;
    use r402_evm::chain::parse_caip2;
    use r402_evm::exact::facilitator::{ExactEvmConfig, ExactEvmFacilitator};
    use r402_evm::networks::known_networks;

    let evm_config = ExactEvmConfig {
        deploy_erc4337_with_eip6492: config.deploy_erc4337_with_eip6492,
    };
    let known = known_networks();

    for (network_id, chain_cfg) in &config.chains {
        let chain_id = match parse_caip2(network_id) {
            Some(id) => id,
            None => {
                tracing::warn!(network = %network_id, "Skipping chain: invalid CAIP-2 identifier");
                continue;
            }
        };

        let key_str = chain_cfg.signer_private_key.trim();
        if key_str.is_empty() || key_str.starts_with('$') {
            tracing::warn!(
                network = %network_id,
                "Skipping chain: signer_private_key not resolved (missing env var?)"
            );
            continue;
        }

        let signer: PrivateKeySigner = key_str
            .parse()
            .map_err(|e| format!("Invalid signer key for {network_id}: {e}"))?;
        let signer_address = signer.address();

        let wallet = EthereumWallet::from(signer);
        let rpc_url: Url = chain_cfg
            .rpc_url
            .parse()
            .map_err(|e| format!("Invalid RPC URL for {network_id}: {e}"))?;

        let provider = ProviderBuilder::new().wallet(wallet).connect_http(rpc_url);

        let networks_for_chain: Vec<_> = known
            .iter()
            .filter(|n| n.chain_id == chain_id)
            .cloned()
            .collect();

        let network_ids: Vec<String> = networks_for_chain
            .iter()
            .map(|n| n.network.clone())
            .collect();

        if network_ids.is_empty() {
            tracing::warn!(
                network = %network_id,
                "No known network config found — registering with provided network ID"
            );
            let evm_fac = ExactEvmFacilitator::with_config(provider, signer_address, evm_config);
            facilitator.register(vec![network_id.clone()], Box::new(evm_fac));
        } else {
            tracing::info!(
                network = %network_id,
                signer = %signer_address,
                networks = ?network_ids,
                "Registered EVM exact scheme"
            );
            let evm_fac = ExactEvmFacilitator::with_networks(
                provider,
                signer_address,
                evm_config,
                networks_for_chain,
            );
            facilitator.register(network_ids, Box::new(evm_fac));
        }
    }

    Ok(())
}

#[cfg(feature = "chain-solana")]
fn register_solana(
    facilitator: &mut X402Facilitator,
    config: &FacilitatorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    use r402_svm::chain::parse_caip2;
    use r402_svm::exact::facilitator::{SolanaExactFacilitator, SolanaExactFacilitatorConfig};
    use r402_svm::provider::SolanaChainProvider;
    use solana_keypair::Keypair;

    for (network_id, chain_cfg) in &config.chains {
        let Some(reference) = parse_caip2(network_id) else {
            continue;
        };

        let key_str = chain_cfg.signer_private_key.trim();
        if key_str.is_empty() || key_str.starts_with('$') {
            tracing::warn!(
                network = %network_id,
                "Skipping chain: signer_private_key not resolved (missing env var?)"
            );
            continue;
        }

        let key_bytes = bs58::decode(key_str)
            .into_vec()
            .map_err(|e| format!("Invalid signer key for {network_id}: {e}"))?;
        let fee_payer = Keypair::from_bytes(&key_bytes)
            .map_err(|e| format!("Invalid signer key for {network_id}: {e}"))?;
        let fee_payer_pubkey = solana_signer::Signer::pubkey(&fee_payer);

        let provider = SolanaChainProvider::new(
            chain_cfg.rpc_url.clone(),
            fee_payer,
            reference,
            chain_cfg.max_compute_unit_limit,
            chain_cfg.max_compute_unit_price,
        );

        tracing::info!(
            network = %network_id,
            signer = %fee_payer_pubkey,
            "Registered Solana exact scheme"
        );

        let svm_fac = SolanaExactFacilitator::new(provider, SolanaExactFacilitatorConfig::default());
        facilitator.register(vec![network_id.clone()], Box::new(svm_fac));
    }

    Ok(())
}

/// Loads configuration, wires up the chain providers for every configured
/// network, and serves the facilitator HTTP API until shutdown.
///
/// # Errors
///
/// Returns an error if configuration fails to load, a signer key or RPC URL
/// is malformed, or the HTTP listener cannot bind.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = FacilitatorConfig::load()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        chains = config.chains.len(),
        "Loaded configuration"
    );

    if config.chains.is_empty() {
        tracing::warn!("No chains configured — facilitator will report no supported schemes");
    }

    let mut facilitator = X402Facilitator::new();

    #[cfg(feature = "chain-eip155")]
    register_eip155(&mut facilitator, &config)?;

    #[cfg(feature = "chain-solana")]
    register_solana(&mut facilitator, &config)?;

    let state: FacilitatorState = Arc::new(facilitator);

    let app = Router::new()
        .merge(facilitator_router(Arc::clone(&state)))
        .route("/health", axum::routing::get(health))
        .layer(
            cors::CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Facilitator listening on http://{addr}");

    let sig_down = crate::util::SigDown::try_new()?;
    let shutdown = sig_down.cancellation_token();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Facilitator shut down gracefully");
    Ok(())
}

/// Health check endpoint.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
