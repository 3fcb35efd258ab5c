use clap::Args;
use serde_json::Value;

use rent_vs_own_core::cashflow::flip::{self, FlipInput};
use rent_vs_own_core::cashflow::long_term::{self, LongTermRentalInput};
use rent_vs_own_core::cashflow::short_term::{self, ShortTermRentalInput};

use crate::input;

/// Arguments for a cash-flow model
#[derive(Args)]
pub struct CashFlowArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_long_term_rental(args: CashFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rental: LongTermRentalInput = input::load(args.input.as_deref(), "long-term-rental")?;
    let result = long_term::simulate_long_term_rental(&rental)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_short_term_rental(args: CashFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rental: ShortTermRentalInput = input::load(args.input.as_deref(), "short-term-rental")?;
    let result = short_term::simulate_short_term_rental(&rental)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_flip(args: CashFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flip_input: FlipInput = input::load(args.input.as_deref(), "flip")?;
    let result = flip::simulate_flip(&flip_input)?;
    Ok(serde_json::to_value(result)?)
}
