//! Option-chain mispricing scanner.
//!
//! Walks a chain one contract per strike, recovers each contract's implied
//! volatility from its mid-quote, and compares the market price against the
//! price implied by an independent volatility forecast. The model price uses
//! the forecast vol while delta uses the implied vol: the mispricing signal
//! measures divergence from the analyst's view, the delta measures the
//! market's priced-in risk.

use crate::errors::{ModelError, ModelResult};
use crate::models::black_scholes::BlackScholes;
use crate::solver::{solve_implied_vol, SolverConfig, SolverOutcome};
use crate::types::{
    ChainQuote, ContractSpec, MarketSnapshot, MispricingRecord, OptionKind, PricingInputs,
};

/// Screening thresholds, passed explicitly at the call site.
#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    /// Minimum |delta| for a contract to be reported.
    pub min_abs_delta: f64,
    /// Minimum |deviation| from the forecast-vol price, in percent.
    pub min_pct_mispricing: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_abs_delta: 0.5,
            min_pct_mispricing: 5.0,
        }
    }
}

/// Scans one expiry's chain and returns the contracts passing both filters,
/// in the chain's own order.
///
/// Per-contract problems are recoverable and skip only that contract: a
/// quote with a non-positive side is unusable, and a failed implied-vol
/// solve means the quote is inconsistent with the model near the boundary.
/// Malformed shared inputs (snapshot, forecast vol, a non-positive strike)
/// invalidate every contract uniformly and abort the scan.
pub fn scan_for_mispricings(
    model: &BlackScholes,
    snapshot: &MarketSnapshot,
    chain: &[ChainQuote],
    forecast_vol: f64,
    kind: OptionKind,
    scan: &ScanConfig,
    solver: &SolverConfig,
) -> ModelResult<Vec<MispricingRecord>> {
    snapshot.validate()?;
    if !forecast_vol.is_finite() || forecast_vol <= 0.0 {
        return Err(ModelError::InvalidInput(format!(
            "forecast volatility must be positive, got {forecast_vol}"
        )));
    }

    let mut records = Vec::new();

    for quote in chain {
        if !quote.is_usable() {
            tracing::debug!(
                strike = quote.strike,
                bid = quote.bid,
                ask = quote.ask,
                "unusable quote, skipping"
            );
            continue;
        }

        let contract = ContractSpec {
            strike: quote.strike,
            kind,
        };
        let market_price = quote.mid();

        let implied_vol =
            match solve_implied_vol(model, snapshot, &contract, market_price, solver)? {
                SolverOutcome::Converged { implied_vol, .. } => implied_vol,
                SolverOutcome::Failed { reason } => {
                    tracing::debug!(
                        strike = quote.strike,
                        %reason,
                        "implied vol solve failed, skipping"
                    );
                    continue;
                }
            };

        let model_price = model
            .price(&PricingInputs::new(*snapshot, contract, forecast_vol))?
            .price;
        let delta = model.delta(&PricingInputs::new(*snapshot, contract, implied_vol))?;
        let pct_mispricing = (market_price - model_price) / model_price * 100.0;

        if delta.abs() >= scan.min_abs_delta && pct_mispricing.abs() >= scan.min_pct_mispricing {
            tracing::debug!(
                strike = quote.strike,
                pct = pct_mispricing,
                delta,
                implied_vol,
                "mispricing candidate"
            );
            records.push(MispricingRecord {
                strike: quote.strike,
                market_price,
                model_price,
                implied_vol,
                delta,
                pct_mispricing,
            });
        }
    }

    Ok(records)
}
