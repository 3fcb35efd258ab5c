use clap::Args;
use serde_json::Value;

use rent_vs_own_core::comparison;
use rent_vs_own_core::params::SimulationParameters;

use crate::input;

/// Arguments shared by every ownership-vs-investment comparison
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to JSON or YAML file with the scenario parameters
    #[arg(long)]
    pub input: Option<String>,

    /// Override the simulation horizon in years
    #[arg(long)]
    pub years: Option<u32>,
}

fn load_scenario(
    args: &ScenarioArgs,
    what: &str,
) -> Result<SimulationParameters, Box<dyn std::error::Error>> {
    let mut params: SimulationParameters = input::load(args.input.as_deref(), what)?;
    if let Some(years) = args.years {
        params.years = years;
    }
    Ok(params)
}

pub fn run_buy_and_live(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = load_scenario(&args, "buy-and-live")?;
    let result = comparison::compare_buy_and_live(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_buy_and_rent(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = load_scenario(&args, "buy-and-rent")?;
    let result = comparison::compare_buy_and_rent(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_net_worth_buy_and_live(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = load_scenario(&args, "net-worth-buy-and-live")?;
    let result = comparison::compare_net_worth_buy_and_live(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_hybrid_rental(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = load_scenario(&args, "hybrid-rental")?;
    let result = comparison::compare_hybrid_rental(&params)?;
    Ok(serde_json::to_value(result)?)
}
