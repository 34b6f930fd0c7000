//! Human-readable price parsing infrastructure.
//!
//! `Price` values declared in a [`ResourceConfig`](crate::config::ResourceConfig)
//! are either already an [`AssetAmount`](crate::scheme::AssetAmount) or a
//! human-readable decimal string/number (e.g. `"1.50"`). Converting the
//! latter into the former is mechanism-specific (it needs to know the
//! token's decimals and address on a given network), so this module
//! provides the *chain* that mechanism crates plug their parsers into, plus
//! the shared "already in smallest units" heuristic.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::scheme::{AssetAmount, SchemeError};

/// A single price-parsing callback.
///
/// Returns `Some(AssetAmount)` on a match, or `None` to defer to the next
/// parser in the chain.
pub type PriceParserFn = Box<dyn Fn(&Value, &str) -> Option<AssetAmount> + Send + Sync>;

/// An ordered chain of price parsers, consulted in insertion order.
///
/// The first parser to return `Some` wins. Callers typically push a
/// mechanism's default parser (e.g. a USDC parser keyed by network) last,
/// so the chain only falls through to "no match" for genuinely unsupported
/// networks.
#[derive(Default)]
pub struct PriceParserChain(Vec<PriceParserFn>);

impl PriceParserChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a parser to the end of the chain.
    pub fn push(&mut self, parser: PriceParserFn) {
        self.0.push(parser);
    }

    /// Appends a parser and returns `self` for chaining.
    #[must_use]
    pub fn and_push(mut self, parser: PriceParserFn) -> Self {
        self.push(parser);
        self
    }

    /// Runs the chain against `price`/`network`, returning the first match.
    ///
    /// # Errors
    ///
    /// Returns an error if every parser in the chain declines the price.
    pub fn parse(&self, price: &Value, network: &str) -> Result<AssetAmount, SchemeError> {
        for parser in &self.0 {
            if let Some(amount) = parser(price, network) {
                return Ok(amount);
            }
        }
        Err(format!(
            "no registered price parser matched price {price} for network {network}"
        )
        .into())
    }
}

/// Extracts a [`Decimal`] from a JSON price value.
///
/// Accepts either a JSON number or a numeric string (e.g. `"1.50"`).
///
/// # Errors
///
/// Returns an error if `price` is neither a number nor a parseable numeric
/// string.
pub fn decimal_amount(price: &Value) -> Result<Decimal, SchemeError> {
    match price {
        Value::String(s) => s
            .parse::<Decimal>()
            .map_err(|e| format!("invalid price {s:?}: {e}").into()),
        Value::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .map_err(|e| format!("invalid price {n}: {e}").into()),
        other => Err(format!("price must be a number or numeric string, got {other}").into()),
    }
}

/// Applies the "already in smallest units" heuristic: if `amount` is
/// integer-valued and at least `10^decimals`, it is assumed to already be
/// denominated in the token's smallest unit and returned unscaled.
/// Otherwise it is treated as a human-readable decimal amount and scaled up
/// by `10^decimals`.
///
/// This preserves round-trip identity for server-computed `AssetAmount`
/// values that get fed back through `parsePrice` a second time.
#[must_use]
pub fn to_smallest_unit(amount: Decimal, decimals: u32) -> u128 {
    let scale_factor = Decimal::from(10u64.saturating_pow(decimals));
    let smallest = if amount.fract().is_zero() && amount >= scale_factor {
        amount.trunc()
    } else {
        (amount * scale_factor).trunc()
    };
    smallest.to_string().parse().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_human_readable_amount() {
        assert_eq!(to_smallest_unit(Decimal::new(150, 2), 6), 1_500_000);
    }

    #[test]
    fn passes_through_already_smallest_unit_amount() {
        assert_eq!(to_smallest_unit(Decimal::from(1_500_000u64), 6), 1_500_000);
    }

    #[test]
    fn chain_falls_through_to_default_parser() {
        let mut chain = PriceParserChain::new();
        chain.push(Box::new(|_price, network| {
            (network == "eip155:8453").then(|| AssetAmount {
                amount: "1000000".into(),
                asset: "0xUSDC".into(),
                extra: None,
            })
        }));
        let result = chain.parse(&Value::String("1.0".into()), "eip155:8453").unwrap();
        assert_eq!(result.asset, "0xUSDC");
        assert!(chain.parse(&Value::String("1.0".into()), "solana:mainnet").is_err());
    }
}
