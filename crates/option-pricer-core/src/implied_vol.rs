use serde::{Deserialize, Serialize};

use crate::error::PricerError;
use crate::pricing::{self, OptionContract};
use crate::types::OptionType;
use crate::PricerResult;

/// Upper bound adopted when the target price sits above the initial bracket.
const WIDENED_UPPER_BOUND: f64 = 10.0;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A market price to invert for volatility, plus every contract parameter
/// except the volatility itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImpliedVolQuery {
    pub market_price: f64,
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    pub expiry: f64,
    #[serde(default)]
    pub dividend_yield: f64,
    pub option_type: OptionType,
}

/// Bisection controls. The defaults match the bracket the rest of the crate
/// is tested against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverSettings {
    pub tolerance: f64,
    pub max_iterations: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 100,
            lower_bound: 1e-6,
            upper_bound: 5.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Implied volatility by bracketed bisection.
///
/// Total over its domain: aside from invalid inputs this always returns a
/// volatility estimate. Targets outside the bracket are clamped to the
/// nearest bound (after one widening attempt on the high side) rather than
/// rejected, and running out of iterations yields the final bracket
/// midpoint. Callers relying on boundary behaviour get a usable number, not
/// an error.
///
/// Assumes price is monotone in volatility over the bracket, which holds
/// for vanilla Black-Scholes.
pub fn solve(query: &ImpliedVolQuery, settings: &SolverSettings) -> PricerResult<f64> {
    if query.market_price <= 0.0 {
        return Err(PricerError::InvalidTarget {
            price: query.market_price,
        });
    }
    let target = query.market_price;

    let price_at = |sigma: f64| -> PricerResult<f64> {
        pricing::price(&OptionContract {
            spot: query.spot,
            strike: query.strike,
            rate: query.rate,
            volatility: sigma,
            expiry: query.expiry,
            dividend_yield: query.dividend_yield,
            option_type: query.option_type,
        })
    };

    let mut lo = settings.lower_bound;
    let mut hi = settings.upper_bound;

    // Near-zero-vol regime: the target is worth less than the floor of the
    // bracket, so return the floor instead of failing.
    let lo_price = price_at(lo)?;
    if target < lo_price {
        return Ok(lo);
    }

    // Extreme-vol regime: widen the bracket once; if even that is not
    // enough, return the widened bound as a best-effort estimate.
    let hi_price = price_at(hi)?;
    if target > hi_price {
        if price_at(WIDENED_UPPER_BOUND)? < target {
            return Ok(WIDENED_UPPER_BOUND);
        }
        hi = WIDENED_UPPER_BOUND;
    }

    let mut f_lo = price_at(lo)? - target;

    for _ in 0..settings.max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = price_at(mid)? - target;
        if f_mid.abs() < settings.tolerance {
            return Ok(mid);
        }
        // Keep the half of the bracket whose endpoints straddle the root.
        if f_lo * f_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    // Out of iterations: best-effort midpoint.
    Ok(0.5 * (lo + hi))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
