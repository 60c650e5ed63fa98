//! Black-Scholes-Merton pricing, implied volatility recovery, and
//! option-chain mispricing scanning.
//!
//! This is a pure computation library: spot, rates, dividend yield, and
//! chain quotes are materialized by the caller, and every component is a
//! deterministic function of its inputs. No I/O, no shared mutable state.
//!
//! - [`BlackScholes`] -- closed-form price with the d1/d2 terms, vega, delta
//! - [`solve_implied_vol`] -- Newton-Raphson inversion of the pricing
//!   formula, with derivative and iteration-cap guards
//! - [`scan_for_mispricings`] -- per-strike screen of a chain against an
//!   independent volatility forecast
//!
//! Solver failures (`SolverOutcome::Failed`) are ordinary outcomes to match
//! on; only inputs that make the formulas undefined surface as errors.

pub mod errors;
pub mod models;
pub mod scanner;
pub mod solver;
pub mod timeutil;
pub mod types;

pub use crate::errors::{ModelError, ModelResult};
pub use crate::models::black_scholes::BlackScholes;
pub use crate::models::normal::StdNormal;
pub use crate::scanner::{scan_for_mispricings, ScanConfig};
pub use crate::solver::{solve_implied_vol, FailureReason, SolverConfig, SolverOutcome};
pub use crate::timeutil::year_fraction;
pub use crate::types::{
    ChainQuote, ContractSpec, MarketSnapshot, MispricingRecord, OptionKind, PricingInputs,
    PricingResult,
};
