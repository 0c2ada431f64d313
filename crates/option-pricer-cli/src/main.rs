mod output;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::process;
use std::str::FromStr;

use option_pricer_core::implied_vol::{self, ImpliedVolQuery, SolverSettings};
use option_pricer_core::pricing::{self, OptionContract};
use option_pricer_core::OptionType;

use output::Report;

/// Black-Scholes European option pricer
#[derive(Parser)]
#[command(
    name = "opx",
    version,
    about = "Black-Scholes European option pricer",
    long_about = "Prices European calls and puts under Black-Scholes with an optional \
                  continuous dividend yield, reports the standard Greeks, and solves \
                  for implied volatility from a market price."
)]
struct Cli {
    /// Spot price
    #[arg(long = "S")]
    spot: f64,

    /// Strike
    #[arg(long = "K")]
    strike: f64,

    /// Risk-free rate (annual, continuously compounded)
    #[arg(long = "r", allow_hyphen_values = true)]
    rate: f64,

    /// Time to maturity in years
    #[arg(long = "T")]
    expiry: f64,

    /// Volatility (annualized). Required unless --iv is passed.
    #[arg(long, allow_hyphen_values = true, required_unless_present = "iv")]
    sigma: Option<f64>,

    /// Option type: call or put (case-insensitive)
    #[arg(long = "type", default_value = "call")]
    option_type: String,

    /// Continuous dividend yield (annual, continuously compounded)
    #[arg(long = "q", default_value_t = 0.0, allow_hyphen_values = true)]
    dividend_yield: f64,

    /// Also print greeks
    #[arg(long)]
    greeks: bool,

    /// Market price: solve for implied volatility instead of pricing
    #[arg(long)]
    iv: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn run(cli: &Cli) -> Result<Report, Box<dyn std::error::Error>> {
    let option_type = OptionType::from_str(&cli.option_type)?;

    if let Some(market_price) = cli.iv {
        let query = ImpliedVolQuery {
            market_price,
            spot: cli.spot,
            strike: cli.strike,
            rate: cli.rate,
            expiry: cli.expiry,
            dividend_yield: cli.dividend_yield,
            option_type,
        };
        let implied_vol = implied_vol::solve(&query, &SolverSettings::default())?;
        return Ok(Report::ImpliedVol { implied_vol });
    }

    // clap enforces this via required_unless_present; guard anyway.
    let Some(sigma) = cli.sigma else {
        return Err("--sigma is required unless --iv is given".into());
    };

    let contract = OptionContract {
        spot: cli.spot,
        strike: cli.strike,
        rate: cli.rate,
        volatility: sigma,
        expiry: cli.expiry,
        dividend_yield: cli.dividend_yield,
        option_type,
    };

    let price = pricing::price(&contract)?;
    let greeks = if cli.greeks {
        Some(pricing::greeks(&contract)?)
    } else {
        None
    };

    Ok(Report::Price {
        option_type,
        price,
        greeks,
    })
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => {
            output::render(&cli.output, &report);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
