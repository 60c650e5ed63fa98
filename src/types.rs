use crate::errors::{ModelError, ModelResult};
use std::str::FromStr;

// ── Option Kind ──

/// Closed set of supported option kinds. Anything else is rejected at the
/// parsing boundary, so "unrecognized kind" cannot reach the formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    /// Payoff direction: +1 for calls, -1 for puts.
    #[inline]
    pub fn phi(&self) -> f64 {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }

    /// Intrinsic value at the given spot.
    #[inline]
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            Self::Call => (spot - strike).max(0.0),
            Self::Put => (strike - spot).max(0.0),
        }
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            other => Err(ModelError::InvalidInput(format!(
                "unknown option kind: {other}"
            ))),
        }
    }
}

// ── Pricing Inputs ──

/// Per-expiry market state shared by every contract in a chain.
/// Produced externally once per pricing request; never mutated.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct MarketSnapshot {
    pub spot: f64,
    pub risk_free_rate: f64,
    /// Continuous dividend yield, annualized.
    pub dividend_yield: f64,
    /// Time to expiry in years (ACT/365).
    pub time_to_expiry: f64,
}

impl MarketSnapshot {
    pub fn validate(&self) -> ModelResult<()> {
        if !self.spot.is_finite()
            || !self.risk_free_rate.is_finite()
            || !self.dividend_yield.is_finite()
            || !self.time_to_expiry.is_finite()
        {
            return Err(ModelError::InvalidInput("non-finite snapshot field".into()));
        }
        if self.spot <= 0.0 {
            return Err(ModelError::InvalidInput(format!(
                "spot must be positive, got {}",
                self.spot
            )));
        }
        if self.time_to_expiry <= 0.0 {
            return Err(ModelError::InvalidInput(format!(
                "time to expiry must be positive, got {}",
                self.time_to_expiry
            )));
        }
        if self.dividend_yield < 0.0 {
            return Err(ModelError::InvalidInput(format!(
                "dividend yield must be non-negative, got {}",
                self.dividend_yield
            )));
        }
        Ok(())
    }
}

/// One option contract being priced.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ContractSpec {
    pub strike: f64,
    pub kind: OptionKind,
}

impl ContractSpec {
    pub fn validate(&self) -> ModelResult<()> {
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(ModelError::InvalidInput(format!(
                "strike must be positive, got {}",
                self.strike
            )));
        }
        Ok(())
    }
}

/// Full argument set for one pricing-formula evaluation.
#[derive(Debug, Clone, Copy)]
pub struct PricingInputs {
    pub snapshot: MarketSnapshot,
    pub contract: ContractSpec,
    pub volatility: f64,
}

impl PricingInputs {
    #[inline]
    pub fn new(snapshot: MarketSnapshot, contract: ContractSpec, volatility: f64) -> Self {
        Self {
            snapshot,
            contract,
            volatility,
        }
    }

    /// Gate in front of every formula evaluation: d1/d2 divide by
    /// sigma * sqrt(t), which is undefined at zero.
    pub fn validate(&self) -> ModelResult<()> {
        self.snapshot.validate()?;
        self.contract.validate()?;
        if !self.volatility.is_finite() || self.volatility <= 0.0 {
            return Err(ModelError::InvalidInput(format!(
                "volatility must be positive, got {}",
                self.volatility
            )));
        }
        Ok(())
    }
}

/// Theoretical price plus the d1/d2 terms it was built from. Vega and the
/// scanner's delta reuse d1, so it is an addressable sub-result rather than
/// an implementation detail of the price.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct PricingResult {
    pub price: f64,
    pub d1: f64,
    pub d2: f64,
}

// ── Chain Quotes ──

/// A two-sided market quote for one strike in an option chain.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ChainQuote {
    pub strike: f64,
    pub bid: f64,
    pub ask: f64,
}

impl ChainQuote {
    /// Mid-quote, the market price proxy.
    #[inline]
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Both sides must be positive for the quote to be usable.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.bid > 0.0 && self.ask > 0.0
    }
}

/// Emitted for each contract that passes both scanner filters.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MispricingRecord {
    pub strike: f64,
    pub market_price: f64,
    pub model_price: f64,
    pub implied_vol: f64,
    /// Delta at the implied volatility (the market-consistent greek).
    pub delta: f64,
    /// Signed deviation of the market price from the forecast-vol model
    /// price, in percent.
    pub pct_mispricing: f64,
}
