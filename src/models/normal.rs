use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Standard normal distribution (created once, reused).
///
/// Leaf dependency of the pricing formula, vega, and delta: all of them
/// evaluate N(x) or n(x) at the d1/d2 terms.
#[derive(Debug, Clone, Copy)]
pub struct StdNormal {
    normal: Normal,
}

impl StdNormal {
    pub fn new() -> Self {
        Self {
            normal: Normal::standard(),
        }
    }

    /// Cumulative distribution function N(x).
    #[inline]
    pub fn cdf(&self, x: f64) -> f64 {
        self.normal.cdf(x)
    }

    /// Probability density function n(x).
    #[inline]
    pub fn pdf(&self, x: f64) -> f64 {
        self.normal.pdf(x)
    }
}

impl Default for StdNormal {
    fn default() -> Self {
        Self::new()
    }
}
