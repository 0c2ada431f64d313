//! Standard normal distribution primitives underlying the pricing formulas.

use statrs::function::erf::erf;
use std::f64::consts::{PI, SQRT_2};

/// Standard normal CDF: Phi(x) = 0.5 * (1 + erf(x / sqrt(2))).
///
/// Delegates to the statrs error function, which stays accurate in both
/// tails; no truncated series.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Standard normal PDF: phi(x) = exp(-x^2 / 2) / sqrt(2 * pi).
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}
