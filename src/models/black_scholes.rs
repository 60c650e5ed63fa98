use crate::errors::ModelResult;
use crate::models::normal::StdNormal;
use crate::types::{OptionKind, PricingInputs, PricingResult};

/// Black-Scholes-Merton pricing for European vanilla options with a
/// continuous dividend yield.
///
/// call = S*e^(-qt)*N(d1) - K*e^(-rt)*N(d2)
/// put  = K*e^(-rt)*N(-d2) - S*e^(-qt)*N(-d1)
///
/// with d1 = [ln(S/K) + (r - q + sigma^2/2)*t] / (sigma*sqrt(t)) and
/// d2 = d1 - sigma*sqrt(t). With zero dividend yield e^(-qt) = 1 and this
/// reduces to plain Black-Scholes.
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes {
    /// Standard normal distribution (created once, reused)
    normal: StdNormal,
}

impl BlackScholes {
    pub fn new() -> Self {
        Self {
            normal: StdNormal::new(),
        }
    }

    /// Theoretical price plus the d1/d2 terms it was derived from.
    ///
    /// Deterministic, side-effect free. Inputs that make the formula
    /// undefined (non-positive spot, strike, time, or volatility) are
    /// rejected up front.
    pub fn price(&self, inputs: &PricingInputs) -> ModelResult<PricingResult> {
        inputs.validate()?;

        let (d1, d2) = self.d_terms(inputs);
        let s = inputs.snapshot.spot;
        let k = inputs.contract.strike;
        let t = inputs.snapshot.time_to_expiry;
        let carry = (-inputs.snapshot.dividend_yield * t).exp();
        let discount = (-inputs.snapshot.risk_free_rate * t).exp();

        let price = match inputs.contract.kind {
            OptionKind::Call => {
                s * carry * self.normal.cdf(d1) - k * discount * self.normal.cdf(d2)
            }
            OptionKind::Put => {
                k * discount * self.normal.cdf(-d2) - s * carry * self.normal.cdf(-d1)
            }
        };

        Ok(PricingResult { price, d1, d2 })
    }

    /// Price sensitivity to volatility: S*e^(-qt)*n(d1)*sqrt(t).
    ///
    /// Positive for both calls and puts; the Newton-Raphson derivative term.
    pub fn vega(&self, inputs: &PricingInputs) -> ModelResult<f64> {
        inputs.validate()?;
        let (d1, _) = self.d_terms(inputs);
        let t = inputs.snapshot.time_to_expiry;
        let carry = (-inputs.snapshot.dividend_yield * t).exp();
        Ok(inputs.snapshot.spot * carry * self.normal.pdf(d1) * t.sqrt())
    }

    /// Price sensitivity to spot: e^(-qt)*N(d1) for calls,
    /// e^(-qt)*(N(d1) - 1) for puts.
    pub fn delta(&self, inputs: &PricingInputs) -> ModelResult<f64> {
        inputs.validate()?;
        let (d1, _) = self.d_terms(inputs);
        let t = inputs.snapshot.time_to_expiry;
        let carry = (-inputs.snapshot.dividend_yield * t).exp();
        Ok(match inputs.contract.kind {
            OptionKind::Call => carry * self.normal.cdf(d1),
            OptionKind::Put => carry * (self.normal.cdf(d1) - 1.0),
        })
    }

    /// d1/d2 on pre-validated inputs.
    #[inline]
    fn d_terms(&self, inputs: &PricingInputs) -> (f64, f64) {
        let snap = &inputs.snapshot;
        let sigma = inputs.volatility;
        let t = snap.time_to_expiry;
        let sigma_sqrt_t = sigma * t.sqrt();
        let d1 = ((snap.spot / inputs.contract.strike).ln()
            + (snap.risk_free_rate - snap.dividend_yield + 0.5 * sigma * sigma) * t)
            / sigma_sqrt_t;
        (d1, d1 - sigma_sqrt_t)
    }
}

impl Default for BlackScholes {
    fn default() -> Self {
        Self::new()
    }
}
