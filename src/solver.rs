//! Newton-Raphson implied-volatility solver.
//!
//! Inverts the pricing formula: given an observed market price, finds the
//! volatility at which the model reproduces it. Non-convergence is reported
//! as a tagged outcome, not an error; callers decide whether to retry with a
//! different guess.

use crate::errors::{ModelError, ModelResult};
use crate::models::black_scholes::BlackScholes;
use crate::types::{ContractSpec, MarketSnapshot, PricingInputs};

/// Derivative guard. Below this vega the Newton step divides by a number
/// small enough to overshoot to negative or wildly large volatility.
const MIN_VEGA: f64 = 1e-8;

/// Solver tuning, passed explicitly at the call site.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Starting volatility for the iteration.
    pub initial_guess: f64,
    /// Convergence tolerance on the price difference. Doubles as the floor
    /// of the clamped volatility update.
    pub tolerance: f64,
    /// Iteration cap; the cancellation mechanism for non-convergence.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.20,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl SolverConfig {
    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: f64) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Outcome of one solver invocation. Both failure modes are expected,
/// recoverable conditions that callers pattern-match on.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SolverOutcome {
    Converged { implied_vol: f64, iterations: u32 },
    Failed { reason: FailureReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The derivative guard tripped: a near-zero vega makes the Newton step
    /// numerically unstable.
    VegaTooSmall,
    /// Iteration cap reached with |price - market| still above tolerance.
    MaxIterationsExceeded,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VegaTooSmall => write!(f, "vega too small"),
            Self::MaxIterationsExceeded => write!(f, "max iterations exceeded"),
        }
    }
}

/// Newton-Raphson on f(sigma) = price(sigma) - market_price.
///
/// Each iteration reprices at the current sigma, checks |diff| against the
/// tolerance, and otherwise steps by diff / vega with the result clamped to
/// the tolerance floor so the next evaluation stays in the formula's valid
/// domain. No bisection fallback: a failed solve is reported as such.
///
/// Malformed shared inputs (snapshot, strike, non-positive market price)
/// are fatal `InvalidInput` errors, surfaced before the iteration starts.
pub fn solve_implied_vol(
    model: &BlackScholes,
    snapshot: &MarketSnapshot,
    contract: &ContractSpec,
    market_price: f64,
    config: &SolverConfig,
) -> ModelResult<SolverOutcome> {
    snapshot.validate()?;
    contract.validate()?;
    if !market_price.is_finite() || market_price <= 0.0 {
        return Err(ModelError::InvalidInput(format!(
            "market price must be positive, got {market_price}"
        )));
    }

    let mut sigma = config.initial_guess.max(config.tolerance);

    for iteration in 0..config.max_iterations {
        let current = PricingInputs::new(*snapshot, *contract, sigma);
        let diff = model.price(&current)?.price - market_price;

        if diff.abs() < config.tolerance {
            return Ok(SolverOutcome::Converged {
                implied_vol: sigma,
                iterations: iteration,
            });
        }

        let vega = model.vega(&current)?;
        if vega < MIN_VEGA {
            tracing::debug!(sigma, vega, iteration, "vega below guard, aborting solve");
            return Ok(SolverOutcome::Failed {
                reason: FailureReason::VegaTooSmall,
            });
        }

        sigma = (sigma - diff / vega).max(config.tolerance);
    }

    tracing::debug!(
        sigma,
        max_iterations = config.max_iterations,
        "no convergence within iteration cap"
    );
    Ok(SolverOutcome::Failed {
        reason: FailureReason::MaxIterationsExceeded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OptionKind;

    fn snapshot(spot: f64, rate: f64, div: f64, t: f64) -> MarketSnapshot {
        MarketSnapshot {
            spot,
            risk_free_rate: rate,
            dividend_yield: div,
            time_to_expiry: t,
        }
    }

    fn call(strike: f64) -> ContractSpec {
        ContractSpec {
            strike,
            kind: OptionKind::Call,
        }
    }

    fn put(strike: f64) -> ContractSpec {
        ContractSpec {
            strike,
            kind: OptionKind::Put,
        }
    }

    fn price_at(snapshot: &MarketSnapshot, contract: &ContractSpec, vol: f64) -> f64 {
        BlackScholes::new()
            .price(&PricingInputs::new(*snapshot, *contract, vol))
            .unwrap()
            .price
    }

    #[test]
    fn test_reference_scenario_recovery() {
        // S=100, K=100, r=5%, q=0, t=1: 10.4506 implies ~20% vol.
        let model = BlackScholes::new();
        let snap = snapshot(100.0, 0.05, 0.0, 1.0);
        let outcome =
            solve_implied_vol(&model, &snap, &call(100.0), 10.4506, &SolverConfig::default())
                .unwrap();

        match outcome {
            SolverOutcome::Converged {
                implied_vol,
                iterations,
            } => {
                assert!((implied_vol - 0.2000).abs() < 1e-4, "got {implied_vol}");
                assert!(iterations < 10, "took {iterations} iterations");
            }
            SolverOutcome::Failed { reason } => panic!("solver failed: {reason}"),
        }
    }

    #[test]
    fn test_round_trip_across_vols() {
        // Price at a known vol, solve it back, across the practical range.
        let model = BlackScholes::new();
        let snap = snapshot(100.0, 0.02, 0.0, 0.5);
        let config = SolverConfig::default();

        for target in [0.02, 0.05, 0.1, 0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 2.5, 2.95] {
            let market_price = price_at(&snap, &call(100.0), target);
            let outcome =
                solve_implied_vol(&model, &snap, &call(100.0), market_price, &config).unwrap();

            match outcome {
                SolverOutcome::Converged { implied_vol, .. } => {
                    assert!(
                        (implied_vol - target).abs() < 1e-4,
                        "target {target}, recovered {implied_vol}"
                    );
                }
                SolverOutcome::Failed { reason } => panic!("failed at vol {target}: {reason}"),
            }
        }
    }

    #[test]
    fn test_round_trip_across_moneyness() {
        let model = BlackScholes::new();
        let snap = snapshot(100.0, 0.05, 0.01, 0.25);
        let config = SolverConfig::default();

        for strike in [80.0, 90.0, 100.0, 110.0, 120.0] {
            let market_price = price_at(&snap, &put(strike), 0.25);
            let outcome =
                solve_implied_vol(&model, &snap, &put(strike), market_price, &config).unwrap();

            match outcome {
                SolverOutcome::Converged { implied_vol, .. } => {
                    assert!(
                        (implied_vol - 0.25).abs() < 1e-4,
                        "strike {strike}, recovered {implied_vol}"
                    );
                }
                SolverOutcome::Failed { reason } => panic!("failed at strike {strike}: {reason}"),
            }
        }
    }

    #[test]
    fn test_vega_guard_trips_near_expiry() {
        // t -> 0+ with spot far from strike drives vega to zero; the solver
        // must abort cleanly instead of dividing by it.
        let model = BlackScholes::new();
        let snap = snapshot(100.0, 0.05, 0.0, 1e-4);
        let outcome =
            solve_implied_vol(&model, &snap, &call(150.0), 0.5, &SolverConfig::default()).unwrap();

        assert_eq!(
            outcome,
            SolverOutcome::Failed {
                reason: FailureReason::VegaTooSmall
            }
        );
    }

    #[test]
    fn test_unattainable_price_hits_iteration_cap() {
        // Strike pinned at the forward: the clamped sigma floor leaves the
        // model price above the target on every iteration while vega stays
        // healthy, so the cap is what terminates the solve.
        let model = BlackScholes::new();
        let snap = snapshot(100.0, 0.05, 0.0, 1.0);
        let strike = 100.0 * (0.05f64).exp();
        let outcome =
            solve_implied_vol(&model, &snap, &call(strike), 1e-5, &SolverConfig::default())
                .unwrap();

        assert_eq!(
            outcome,
            SolverOutcome::Failed {
                reason: FailureReason::MaxIterationsExceeded
            }
        );
    }

    #[test]
    fn test_invalid_inputs_are_fatal() {
        let model = BlackScholes::new();
        let config = SolverConfig::default();

        let bad_snap = snapshot(-100.0, 0.05, 0.0, 1.0);
        assert!(solve_implied_vol(&model, &bad_snap, &call(100.0), 5.0, &config).is_err());

        let snap = snapshot(100.0, 0.05, 0.0, 1.0);
        assert!(solve_implied_vol(&model, &snap, &call(0.0), 5.0, &config).is_err());
        assert!(solve_implied_vol(&model, &snap, &call(100.0), 0.0, &config).is_err());
        assert!(solve_implied_vol(&model, &snap, &call(100.0), -5.0, &config).is_err());
    }

    #[test]
    fn test_config_builders() {
        let config = SolverConfig::default()
            .with_initial_guess(0.35)
            .with_tolerance(1e-8)
            .with_max_iterations(50);
        assert!((config.initial_guess - 0.35).abs() < 1e-12);
        assert!((config.tolerance - 1e-8).abs() < 1e-20);
        assert_eq!(config.max_iterations, 50);
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let converged = SolverOutcome::Converged {
            implied_vol: 0.2,
            iterations: 4,
        };
        let json = serde_json::to_value(&converged).unwrap();
        assert_eq!(json["outcome"], "converged");
        assert_eq!(json["iterations"], 4);

        let failed = SolverOutcome::Failed {
            reason: FailureReason::VegaTooSmall,
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["reason"], "vega_too_small");
    }
}
