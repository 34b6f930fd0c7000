//! EVM server-side "exact" scheme implementation.
//!
//! Implements [`SchemeServer`] for the `exact` scheme using ERC-3009
//! `transferWithAuthorization`. Handles price parsing (money → atomic USDC)
//! and requirement enhancement (adding EIP-712 domain parameters).
//!
//! Corresponds to Python SDK's `mechanisms/evm/exact/server.py`.

use r402::amount::{decimal_amount, to_smallest_unit};
use r402::proto::{PaymentRequirements, SupportedKind};
use r402::scheme::{AssetAmount, SchemeError, SchemeServer};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::chain::{AssetInfo, NetworkConfig};
use crate::exact::types::SCHEME_EXACT;
use crate::networks::known_networks;

/// EVM server implementation for the "exact" payment scheme.
///
/// Parses prices and enhances payment requirements with EIP-712 domain
/// parameters needed by EVM clients to construct valid signatures.
///
/// Corresponds to Python SDK's `ExactEvmScheme` in `exact/server.py`.
pub struct ExactEvmServer {
    networks: Vec<NetworkConfig>,
}

impl ExactEvmServer {
    /// Creates a new server scheme with all known EVM networks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            networks: known_networks(),
        }
    }

    /// Creates a server scheme with custom network configurations.
    #[must_use]
    pub const fn with_networks(networks: Vec<NetworkConfig>) -> Self {
        Self { networks }
    }

    /// Finds the network config for a CAIP-2 identifier.
    fn find_network(&self, network: &str) -> Option<&NetworkConfig> {
        self.networks.iter().find(|n| n.network == network)
    }

    /// Finds asset info by address within a network config.
    fn find_asset<'a>(config: &'a NetworkConfig, asset_address: &str) -> Option<&'a AssetInfo> {
        let addr = asset_address.parse().ok()?;
        config.find_asset(addr)
    }

    /// Default money-to-USDC conversion.
    ///
    /// Converts a decimal amount (e.g., `1.50`) to the atomic USDC amount
    /// (e.g., `"1500000"`) using the first asset on the network.
    fn default_money_conversion(
        &self,
        amount: Decimal,
        network: &str,
    ) -> Result<AssetAmount, SchemeError> {
        let config = self
            .find_network(network)
            .ok_or_else(|| -> SchemeError { format!("Unknown network: {network}").into() })?;

        let asset = config
            .assets
            .first()
            .ok_or_else(|| -> SchemeError { format!("No default asset for {network}").into() })?;

        let token_amount = to_smallest_unit(amount, u32::from(asset.decimals));

        Ok(AssetAmount {
            amount: token_amount.to_string(),
            asset: format!("{:?}", asset.address),
            extra: Some(serde_json::json!({
                "name": asset.name,
                "version": asset.version,
            })),
        })
    }
}

impl Default for ExactEvmServer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExactEvmServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExactEvmServer")
            .field("networks_count", &self.networks.len())
            .finish_non_exhaustive()
    }
}

impl SchemeServer for ExactEvmServer {
    fn scheme(&self) -> &str {
        SCHEME_EXACT
    }

    fn parse_price(&self, price: &Value, network: &str) -> Result<AssetAmount, SchemeError> {
        // Already an AssetAmount (object with "amount" key)
        if let Some(obj) = price.as_object()
            && let Some(amount) = obj.get("amount")
        {
            let asset =
                obj.get("asset")
                    .and_then(Value::as_str)
                    .ok_or_else(|| -> SchemeError {
                        format!("Asset address required for AssetAmount on {network}").into()
                    })?;

            return Ok(AssetAmount {
                amount: amount
                    .as_str()
                    .map_or_else(|| amount.to_string(), String::from),
                asset: asset.to_owned(),
                extra: obj.get("extra").cloned(),
            });
        }

        // Money string or number (e.g., "1.50", "$1.50", 1.5)
        let cleaned = match price {
            Value::String(s) => Value::String(s.trim().trim_start_matches('$').trim().to_owned()),
            other => other.clone(),
        };
        let amount = decimal_amount(&cleaned)?;

        self.default_money_conversion(amount, network)
    }

    fn enhance_payment_requirements(
        &self,
        mut requirements: PaymentRequirements,
        _supported_kind: &SupportedKind,
        _extensions: &[String],
    ) -> PaymentRequirements {
        let Some(config) = self.find_network(&requirements.network) else {
            return requirements;
        };

        // Default asset if empty
        if requirements.asset.is_empty()
            && let Some(default_asset) = config.assets.first()
        {
            requirements.asset = format!("{:?}", default_asset.address);
        }

        // Find asset info for EIP-712 domain params
        let asset_info = Self::find_asset(config, &requirements.asset);

        // Convert decimal amount to smallest unit if needed
        if requirements.amount.contains('.')
            && let Some(info) = asset_info
            && let Ok(decimal) = requirements.amount.parse::<Decimal>()
        {
            requirements.amount = to_smallest_unit(decimal, u32::from(info.decimals)).to_string();
        }

        // Add EIP-712 domain params to extra
        if let Some(info) = asset_info {
            let extra = requirements
                .extra
                .as_object_mut()
                .expect("extra should be an object");

            if !extra.contains_key("name") {
                extra.insert("name".to_owned(), Value::String(info.name.clone()));
            }
            if !extra.contains_key("version") {
                extra.insert("version".to_owned(), Value::String(info.version.clone()));
            }
        }

        requirements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_price_for_known_network() {
        let server = ExactEvmServer::new();
        let network = server.networks[0].network.clone();
        let result = server.parse_price(&Value::String("1.50".into()), &network);
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_unknown_network() {
        let server = ExactEvmServer::new();
        let result = server.parse_price(&Value::String("1.50".into()), "eip155:999999999");
        assert!(result.is_err());
    }

    #[test]
    fn passes_through_explicit_asset_amount() {
        let server = ExactEvmServer::new();
        let price = serde_json::json!({"amount": "1000000", "asset": "0xUSDC"});
        let result = server.parse_price(&price, "eip155:8453").unwrap();
        assert_eq!(result.amount, "1000000");
        assert_eq!(result.asset, "0xUSDC");
    }
}
