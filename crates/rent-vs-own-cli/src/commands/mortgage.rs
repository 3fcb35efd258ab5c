use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rent_vs_own_core::mortgage::{self, AmortizationInput};

use crate::input;

/// Arguments for a standalone amortisation schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual mortgage rate (e.g. 0.065 for 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(principal) = args.principal {
        AmortizationInput {
            principal,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--principal, --rate and --years (or --input) required for amortize".into());
    };
    let result = mortgage::amortize(&amort_input)?;
    Ok(serde_json::to_value(result)?)
}
