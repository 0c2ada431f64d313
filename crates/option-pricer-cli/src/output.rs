use serde::Serialize;

use option_pricer_core::pricing::Greeks;
use option_pricer_core::OptionType;

use crate::OutputFormat;

/// Everything a single invocation produces, ready for either renderer.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Price {
        option_type: OptionType,
        price: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        greeks: Option<Greeks>,
    },
    ImpliedVol {
        implied_vol: f64,
    },
}

/// Dispatch output to the appropriate formatter.
pub fn render(format: &OutputFormat, report: &Report) {
    match format {
        OutputFormat::Text => {
            for line in text_lines(report) {
                println!("{line}");
            }
        }
        OutputFormat::Json => print_json(report),
    }
}

/// Console lines, one per printed row. Greek names are left-justified into a
/// 6-character field so the values line up.
fn text_lines(report: &Report) -> Vec<String> {
    match report {
        Report::ImpliedVol { implied_vol } => {
            vec![format!("Implied vol (sigma): {implied_vol:.6}")]
        }
        Report::Price {
            option_type,
            price,
            greeks,
        } => {
            let mut lines = vec![format!("{option_type} price: {price:.6}")];
            if let Some(g) = greeks {
                for (name, value) in [
                    ("Delta", g.delta),
                    ("Gamma", g.gamma),
                    ("Vega", g.vega),
                    ("Theta", g.theta),
                    ("Rho", g.rho),
                ] {
                    lines.push(format!("{name:<6}: {value:.6}"));
                }
            }
            lines
        }
    }
}

/// Pretty-print JSON to stdout.
fn print_json(report: &Report) {
    match serde_json::to_string_pretty(report) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
