use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::comparison::Pipeline;
use crate::error::RentVsOwnError;
use crate::params::SimulationParameters;
use crate::types::*;
use crate::RentVsOwnResult;

/// Input for a 2-way sweep over simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    /// Base case parameters; swept fields are overridden per cell
    pub base: SimulationParameters,
    /// Which ownership-vs-investment comparison to run
    pub pipeline: Pipeline,
    /// Field name as it appears in the parameter JSON (e.g. "mortgage_rate")
    pub variable_1: SensitivityVariable,
    pub variable_2: SensitivityVariable,
}

/// Output of a 2-way sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable_1_name: String,
    pub variable_2_name: String,
    pub variable_1_values: Vec<Decimal>,
    pub variable_2_values: Vec<Decimal>,
    pub output_metric: String,
    /// Matrix[i][j] = final ownership advantage when variable_1 =
    /// variable_1_values[i] and variable_2 = variable_2_values[j]
    pub matrix: Vec<Vec<Decimal>>,
    /// Advantage under the unmodified base parameters
    pub base_case_value: Decimal,
    /// Grid cell closest to the base parameters (row, col)
    pub base_case_position: (usize, usize),
}

const OUTPUT_METRIC: &str = "final_net_proceeds_advantage";

/// Generate the sweep values for a sensitivity variable from min to max with step.
fn generate_sweep_values(var: &SensitivityVariable) -> RentVsOwnResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(RentVsOwnError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(RentVsOwnError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Min must be <= max".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        current += var.step;
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value in a sorted list.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Current value of a numeric parameter, looked up by its serialized name.
fn read_field(params: &SimulationParameters, name: &str) -> RentVsOwnResult<Decimal> {
    let json = serde_json::to_value(params)?;
    let unknown = || RentVsOwnError::InvalidInput {
        field: format!("variable:{name}"),
        reason: "Not a numeric simulation parameter".into(),
    };

    match json.get(name) {
        Some(serde_json::Value::String(s)) => s.parse::<Decimal>().map_err(|_| unknown()),
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .map(Decimal::from)
            .ok_or_else(unknown),
        _ => Err(unknown()),
    }
}

/// Copy of `params` with one field replaced. Whole-year fields only accept
/// non-negative integers.
fn with_override(
    params: &SimulationParameters,
    name: &str,
    value: Decimal,
) -> RentVsOwnResult<SimulationParameters> {
    let mut json = serde_json::to_value(params)?;
    let slot = json
        .get_mut(name)
        .ok_or_else(|| RentVsOwnError::InvalidInput {
            field: format!("variable:{name}"),
            reason: "Not a simulation parameter".into(),
        })?;

    let replacement = match &*slot {
        serde_json::Value::Number(_) => {
            let whole = if value.fract().is_zero() {
                value.to_u32()
            } else {
                None
            };
            match whole {
                Some(n) => serde_json::Value::from(n),
                None => {
                    return Err(RentVsOwnError::InvalidInput {
                        field: format!("variable:{name}"),
                        reason: format!("Expected a whole number of years, got {value}"),
                    })
                }
            }
        }
        serde_json::Value::String(_) => serde_json::Value::String(value.to_string()),
        _ => {
            return Err(RentVsOwnError::InvalidInput {
                field: format!("variable:{name}"),
                reason: "Not a numeric simulation parameter".into(),
            })
        }
    };
    *slot = replacement;

    Ok(serde_json::from_value(json)?)
}

/// Sweep two parameters and record the final ownership advantage
/// (ownership minus investment net proceeds) of the chosen pipeline.
///
/// Cells whose parameters fail validation are reported as zero with a
/// warning rather than aborting the sweep.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> RentVsOwnResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.variable_1.name == input.variable_2.name {
        return Err(RentVsOwnError::InvalidInput {
            field: "variable_2".into(),
            reason: "The two sweep variables must differ".into(),
        });
    }

    let base_1 = read_field(&input.base, &input.variable_1.name)?;
    let base_2 = read_field(&input.base, &input.variable_2.name)?;

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = generate_sweep_values(&input.variable_2)?;

    let base_case_value = input.pipeline.advantage(&input.base, &mut Vec::new())?;

    let mut matrix = Vec::with_capacity(v1_values.len());

    for v1 in &v1_values {
        let mut row = Vec::with_capacity(v2_values.len());
        for v2 in &v2_values {
            let cell = with_override(&input.base, &input.variable_1.name, *v1)
                .and_then(|p| with_override(&p, &input.variable_2.name, *v2))
                .and_then(|p| input.pipeline.advantage(&p, &mut Vec::new()));
            match cell {
                Ok(val) => row.push(val),
                Err(e) => {
                    warnings.push(format!("Evaluation failed at ({v1}, {v2}): {e}"));
                    row.push(Decimal::ZERO);
                }
            }
        }
        matrix.push(row);
    }

    let base_row = closest_index(&v1_values, base_1);
    let base_col = closest_index(&v2_values, base_2);

    let output = SensitivityOutput {
        variable_1_name: input.variable_1.name.clone(),
        variable_2_name: input.variable_2.name.clone(),
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        output_metric: OUTPUT_METRIC.to_string(),
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way Sensitivity of the final ownership advantage",
        &serde_json::json!({
            "pipeline": input.pipeline,
            "variable_1": input.variable_1.name,
            "variable_2": input.variable_2.name,
            "output_metric": OUTPUT_METRIC,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::fixtures::thirty_year_purchase;
    use rust_decimal_macros::dec;

    fn sample_input() -> SensitivityInput {
        let mut base = thirty_year_purchase();
        base.years = 10;
        SensitivityInput {
            base,
            pipeline: Pipeline::BuyAndLive,
            variable_1: SensitivityVariable {
                name: "mortgage_rate".into(),
                min: dec!(0.05),
                max: dec!(0.07),
                step: dec!(0.01),
            },
            variable_2: SensitivityVariable {
                name: "appreciation_rate".into(),
                min: dec!(0.02),
                max: dec!(0.04),
                step: dec!(0.01),
            },
        }
    }

    #[test]
    fn test_grid_shape_and_base_case() {
        let out = run_sensitivity(&sample_input()).unwrap();
        let r = &out.result;
        assert_eq!(r.variable_1_values.len(), 3);
        assert_eq!(r.variable_2_values.len(), 3);
        assert_eq!(r.matrix.len(), 3);
        assert_eq!(r.matrix[0].len(), 3);
        // 0.065 sits between 0.06 and 0.07; 0.03 is exact
        assert_eq!(r.base_case_position.1, 1);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_higher_appreciation_favours_ownership() {
        let out = run_sensitivity(&sample_input()).unwrap();
        let row = &out.result.matrix[1];
        assert!(row[0] < row[1] && row[1] < row[2], "{row:?}");
    }

    #[test]
    fn test_cell_matches_direct_run() {
        let input = sample_input();
        let out = run_sensitivity(&input).unwrap();

        let mut params = input.base.clone();
        params.mortgage_rate = dec!(0.05);
        params.appreciation_rate = dec!(0.04);
        let direct = Pipeline::BuyAndLive.advantage(&params, &mut Vec::new()).unwrap();
        assert_eq!(out.result.matrix[0][2], direct);
    }

    #[test]
    fn test_integer_field_override() {
        let base = thirty_year_purchase();
        let p = with_override(&base, "years", dec!(15)).unwrap();
        assert_eq!(p.years, 15);
        assert!(with_override(&base, "years", dec!(15.5)).is_err());
        assert_eq!(read_field(&base, "mortgage_years").unwrap(), dec!(30));
    }

    #[test]
    fn test_unknown_or_non_numeric_field_rejected() {
        let mut input = sample_input();
        input.variable_2.name = "is_married".into();
        assert!(run_sensitivity(&input).is_err());

        input.variable_2.name = "no_such_field".into();
        assert!(run_sensitivity(&input).is_err());
    }

    #[test]
    fn test_invalid_cells_become_zero_with_warning() {
        let mut input = sample_input();
        input.variable_2 = SensitivityVariable {
            name: "tax_bracket".into(),
            min: dec!(0.9),
            max: dec!(1.1),
            step: dec!(0.1),
        };
        let out = run_sensitivity(&input).unwrap();
        assert_eq!(out.result.matrix[0][2], Decimal::ZERO);
        assert!(!out.warnings.is_empty());
    }
}
