use serde::{Deserialize, Serialize};

use crate::distribution::{norm_cdf, norm_pdf};
use crate::error::PricerError;
use crate::types::OptionType;
use crate::PricerResult;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Full parameter set for a European option. All rates are annualized and
/// continuously compounded; expiry is in years.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptionContract {
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    pub volatility: f64,
    pub expiry: f64,
    /// Continuous dividend (or carry) yield. Zero for non-paying underlyings.
    #[serde(default)]
    pub dividend_yield: f64,
    pub option_type: OptionType,
}

/// The five standard sensitivities. Theta is per year; vega and rho are per
/// 1.00 change in volatility / rate respectively.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
    pub rho: f64,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_contract(contract: &OptionContract) -> PricerResult<()> {
    if contract.spot <= 0.0 {
        return Err(PricerError::InvalidInput {
            field: "spot".into(),
            reason: "must be positive".into(),
        });
    }
    if contract.strike <= 0.0 {
        return Err(PricerError::InvalidInput {
            field: "strike".into(),
            reason: "must be positive".into(),
        });
    }
    if contract.volatility <= 0.0 {
        return Err(PricerError::InvalidInput {
            field: "volatility".into(),
            reason: "must be positive".into(),
        });
    }
    if contract.expiry <= 0.0 {
        return Err(PricerError::InvalidInput {
            field: "expiry".into(),
            reason: "must be positive".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Black-Scholes internals
// ---------------------------------------------------------------------------

struct BsFactors {
    d1: f64,
    d2: f64,
    sqrt_t: f64,
    disc_q: f64,
    disc_r: f64,
}

fn compute_factors(contract: &OptionContract) -> BsFactors {
    let OptionContract {
        spot: s,
        strike: k,
        rate: r,
        volatility: sigma,
        expiry: t,
        dividend_yield: q,
        ..
    } = *contract;

    let sqrt_t = t.sqrt();
    let sigma_sqrt_t = sigma * sqrt_t;
    let d1 = ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / sigma_sqrt_t;
    let d2 = d1 - sigma_sqrt_t;

    BsFactors {
        d1,
        d2,
        sqrt_t,
        disc_q: (-q * t).exp(),
        disc_r: (-r * t).exp(),
    }
}

fn price_from_factors(contract: &OptionContract, f: &BsFactors) -> f64 {
    let s = contract.spot;
    let k = contract.strike;
    match contract.option_type {
        OptionType::Call => s * f.disc_q * norm_cdf(f.d1) - k * f.disc_r * norm_cdf(f.d2),
        OptionType::Put => k * f.disc_r * norm_cdf(-f.d2) - s * f.disc_q * norm_cdf(-f.d1),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Black-Scholes price of a European option with continuous dividend yield.
///
/// With `dividend_yield == 0` this is the classical Black-Scholes formula.
pub fn price(contract: &OptionContract) -> PricerResult<f64> {
    validate_contract(contract)?;
    let factors = compute_factors(contract);
    Ok(price_from_factors(contract, &factors))
}

/// Delta, gamma, vega, theta, and rho for a European option.
pub fn greeks(contract: &OptionContract) -> PricerResult<Greeks> {
    validate_contract(contract)?;
    let f = compute_factors(contract);

    let OptionContract {
        spot: s,
        strike: k,
        rate: r,
        volatility: sigma,
        expiry: t,
        dividend_yield: q,
        ..
    } = *contract;

    let pdf_d1 = norm_pdf(f.d1);

    let (delta, theta, rho) = match contract.option_type {
        OptionType::Call => (
            f.disc_q * norm_cdf(f.d1),
            -(s * f.disc_q * pdf_d1 * sigma) / (2.0 * f.sqrt_t)
                - r * k * f.disc_r * norm_cdf(f.d2)
                + q * s * f.disc_q * norm_cdf(f.d1),
            k * t * f.disc_r * norm_cdf(f.d2),
        ),
        OptionType::Put => (
            f.disc_q * (norm_cdf(f.d1) - 1.0),
            -(s * f.disc_q * pdf_d1 * sigma) / (2.0 * f.sqrt_t)
                + r * k * f.disc_r * norm_cdf(-f.d2)
                - q * s * f.disc_q * norm_cdf(-f.d1),
            -k * t * f.disc_r * norm_cdf(-f.d2),
        ),
    };

    Ok(Greeks {
        delta,
        gamma: f.disc_q * pdf_d1 / (s * sigma * f.sqrt_t),
        vega: s * f.disc_q * pdf_d1 * f.sqrt_t,
        theta,
        rho,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn atm_call() -> OptionContract {
        OptionContract {
            spot: 100.0,
            strike: 100.0,
            rate: 0.05,
            volatility: 0.20,
            expiry: 1.0,
            dividend_yield: 0.0,
            option_type: OptionType::Call,
        }
    }

    fn atm_put() -> OptionContract {
        OptionContract {
            option_type: OptionType::Put,
            ..atm_call()
        }
    }

    #[test]
    fn test_atm_call_reference_price() {
        // Textbook value: S=K=100, r=5%, vol=20%, T=1 -> ~10.4506
        let p = price(&atm_call()).unwrap();
        assert_abs_diff_eq!(p, 10.4506, epsilon = 1e-3);
    }

    #[test]
    fn test_atm_put_via_parity() {
        // P = C - S + K*e^(-rT) ~ 5.5735
        let p = price(&atm_put()).unwrap();
        assert_abs_diff_eq!(p, 5.5735, epsilon = 1e-3);
    }

    #[test]
    fn test_put_call_parity_no_dividend() {
        for (s, k, r, sigma, t) in [
            (100.0, 100.0, 0.05, 0.20, 1.0),
            (120.0, 90.0, 0.01, 0.45, 0.25),
            (80.0, 130.0, -0.005, 0.10, 2.5),
        ] {
            let call = OptionContract {
                spot: s,
                strike: k,
                rate: r,
                volatility: sigma,
                expiry: t,
                dividend_yield: 0.0,
                option_type: OptionType::Call,
            };
            let put = OptionContract {
                option_type: OptionType::Put,
                ..call
            };
            let lhs = price(&call).unwrap() - price(&put).unwrap();
            let rhs = s - k * (-r * t).exp();
            assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_put_call_parity_with_dividend() {
        let call = OptionContract {
            dividend_yield: 0.03,
            ..atm_call()
        };
        let put = OptionContract {
            option_type: OptionType::Put,
            ..call
        };
        let lhs = price(&call).unwrap() - price(&put).unwrap();
        let rhs = 100.0 * (-0.03f64).exp() - 100.0 * (-0.05f64).exp();
        assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-6);
    }

    #[test]
    fn test_dividend_lowers_call_price() {
        let base = price(&atm_call()).unwrap();
        let with_div = price(&OptionContract {
            dividend_yield: 0.03,
            ..atm_call()
        })
        .unwrap();
        assert!(
            with_div < base,
            "call with q=3% ({with_div}) should be cheaper than q=0 ({base})"
        );
    }

    #[test]
    fn test_zero_dividend_matches_classical_formula() {
        // q=0 must reduce exactly to the classical two-term formula.
        let c = atm_call();
        let sqrt_t = c.expiry.sqrt();
        let d1 = ((c.spot / c.strike).ln() + (c.rate + 0.5 * c.volatility * c.volatility) * c.expiry)
            / (c.volatility * sqrt_t);
        let d2 = d1 - c.volatility * sqrt_t;
        let classical = c.spot * norm_cdf(d1) - c.strike * (-c.rate * c.expiry).exp() * norm_cdf(d2);
        assert_abs_diff_eq!(price(&c).unwrap(), classical, epsilon = 1e-12);
    }

    #[test]
    fn test_deep_itm_call_above_intrinsic_pv() {
        let c = OptionContract {
            spot: 200.0,
            ..atm_call()
        };
        let p = price(&c).unwrap();
        let lower_bound = 200.0 - 100.0 * (-0.05f64).exp();
        assert!(p >= lower_bound, "deep ITM call {p} below PV-intrinsic {lower_bound}");
    }

    #[test]
    fn test_deep_otm_call_near_zero() {
        let c = OptionContract {
            spot: 50.0,
            strike: 200.0,
            ..atm_call()
        };
        let p = price(&c).unwrap();
        assert!(p > 0.0 && p < 0.01, "deep OTM call {p} should be near zero");
    }

    #[test]
    fn test_greeks_reference_values() {
        // Hand-computed at S=K=100, r=5%, vol=20%, T=1, q=0:
        // d1=0.35, d2=0.15
        let g = greeks(&atm_call()).unwrap();
        assert_abs_diff_eq!(g.delta, 0.636831, epsilon = 1e-4);
        assert_abs_diff_eq!(g.gamma, 0.018762, epsilon = 1e-4);
        assert_abs_diff_eq!(g.vega, 37.5240, epsilon = 1e-3);
        assert_abs_diff_eq!(g.theta, -6.41403, epsilon = 1e-3);
        assert_abs_diff_eq!(g.rho, 53.2325, epsilon = 1e-3);

        let g = greeks(&atm_put()).unwrap();
        assert_abs_diff_eq!(g.delta, -0.363169, epsilon = 1e-4);
        assert_abs_diff_eq!(g.theta, -1.65788, epsilon = 1e-3);
        assert_abs_diff_eq!(g.rho, -41.8905, epsilon = 1e-3);
    }

    #[test]
    fn test_gamma_vega_same_for_call_and_put() {
        let gc = greeks(&atm_call()).unwrap();
        let gp = greeks(&atm_put()).unwrap();
        assert_abs_diff_eq!(gc.gamma, gp.gamma, epsilon = 1e-12);
        assert_abs_diff_eq!(gc.vega, gp.vega, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_ranges() {
        let gc = greeks(&atm_call()).unwrap();
        assert!(gc.delta > 0.0 && gc.delta < 1.0, "call delta {} out of (0,1)", gc.delta);
        let gp = greeks(&atm_put()).unwrap();
        assert!(gp.delta < 0.0 && gp.delta > -1.0, "put delta {} out of (-1,0)", gp.delta);
    }

    #[test]
    fn test_vega_matches_finite_difference() {
        let c = atm_call();
        let g = greeks(&c).unwrap();
        let h = 1e-5;
        let up = price(&OptionContract {
            volatility: c.volatility + h,
            ..c
        })
        .unwrap();
        let down = price(&OptionContract {
            volatility: c.volatility - h,
            ..c
        })
        .unwrap();
        assert_abs_diff_eq!(g.vega, (up - down) / (2.0 * h), epsilon = 1e-4);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let cases: [(&str, OptionContract); 4] = [
            ("spot", OptionContract { spot: 0.0, ..atm_call() }),
            ("strike", OptionContract { strike: -100.0, ..atm_call() }),
            ("volatility", OptionContract { volatility: 0.0, ..atm_call() }),
            ("expiry", OptionContract { expiry: -1.0, ..atm_call() }),
        ];
        for (expected_field, contract) in cases {
            for result in [price(&contract).map(|_| ()), greeks(&contract).map(|_| ())] {
                match result.unwrap_err() {
                    PricerError::InvalidInput { field, .. } => assert_eq!(field, expected_field),
                    other => panic!("Expected InvalidInput, got {other:?}"),
                }
            }
        }
    }
}
