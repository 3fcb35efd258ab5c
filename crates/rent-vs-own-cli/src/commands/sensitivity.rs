use clap::{Args, ValueEnum};
use serde_json::Value;

use rent_vs_own_core::comparison::Pipeline;
use rent_vs_own_core::params::SimulationParameters;
use rent_vs_own_core::sensitivity::{self, SensitivityInput};
use rent_vs_own_core::SensitivityVariable;

use crate::input;

/// Comparison whose final advantage is swept
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PipelineArg {
    BuyAndLive,
    BuyAndRent,
    NetWorthBuyAndLive,
    HybridRental,
}

impl From<PipelineArg> for Pipeline {
    fn from(arg: PipelineArg) -> Self {
        match arg {
            PipelineArg::BuyAndLive => Pipeline::BuyAndLive,
            PipelineArg::BuyAndRent => Pipeline::BuyAndRent,
            PipelineArg::NetWorthBuyAndLive => Pipeline::NetWorthBuyAndLive,
            PipelineArg::HybridRental => Pipeline::HybridRental,
        }
    }
}

/// Arguments for a 2-way sensitivity sweep
#[derive(Args)]
pub struct SensitivityArgs {
    /// Comparison to evaluate in each cell
    #[arg(long, value_enum, default_value = "buy-and-live")]
    pub pipeline: PipelineArg,

    /// First sweep variable in format name:min:max:step
    /// (e.g. "mortgage_rate:0.05:0.08:0.005")
    #[arg(long)]
    pub var1: String,

    /// Second sweep variable in format name:min:max:step
    #[arg(long)]
    pub var2: String,

    /// Path to JSON or YAML file with the base scenario (or pipe it on stdin)
    #[arg(long)]
    pub base_inputs: Option<String>,
}

fn parse_sens_var(spec: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be name:min:max:step, got '{}'",
            spec
        )
        .into());
    }
    Ok(SensitivityVariable {
        name: parts[0].to_string(),
        min: parts[1].parse()?,
        max: parts[2].parse()?,
        step: parts[3].parse()?,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let base: SimulationParameters = input::load(args.base_inputs.as_deref(), "sensitivity")?;
    let sens_input = SensitivityInput {
        base,
        pipeline: args.pipeline.into(),
        variable_1: parse_sens_var(&args.var1)?,
        variable_2: parse_sens_var(&args.var2)?,
    };
    let result = sensitivity::run_sensitivity(&sens_input)?;
    Ok(serde_json::to_value(result)?)
}
