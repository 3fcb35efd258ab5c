use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RentVsOwnError;
use crate::params::{check_amount, check_fraction, MAX_YEARS};
use crate::records::MonthlyRecord;
use crate::returns::roi;
use crate::tax::income_tax;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::RentVsOwnResult;

fn default_down_payment_pct() -> Rate {
    dec!(0.20)
}

fn default_selling_cost_pct() -> Rate {
    dec!(0.06)
}

/// Buy, renovate, sell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipInput {
    pub purchase_price: Money,
    #[serde(default = "default_down_payment_pct")]
    pub down_payment_pct: Rate,
    pub renovation_cost: Money,
    /// Months of renovation before the sale month
    pub renovation_months: u32,
    /// After-repair value, the sale price
    #[serde(alias = "arv")]
    pub after_repair_value: Money,
    pub holding_costs_monthly: Money,
    #[serde(default = "default_selling_cost_pct")]
    pub selling_cost_pct: Rate,
    /// Ordinary-income bracket; flip gains are short-term
    pub tax_bracket: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipStatus {
    Renovating,
    Sold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipMonth {
    pub month: u32,
    pub status: FlipStatus,
    /// Purchase price while renovating, after-repair value when sold
    pub property_value: Money,
    pub monthly_cost: Money,
    /// Initial cash plus costs to date
    pub cumulative_costs: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipSummary {
    pub purchase_price: Money,
    pub renovation_cost: Money,
    /// Down payment plus renovation budget
    pub total_investment: Money,
    pub total_costs: Money,
    pub after_repair_value: Money,
    pub selling_costs: Money,
    pub total_holding_costs: Money,
    pub gross_profit: Money,
    pub capital_gains_tax: Money,
    pub net_profit: Money,
    /// Net profit over total investment, percent
    pub roi: Decimal,
    pub holding_period_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipResult {
    pub monthly: Vec<FlipMonth>,
    pub summary: FlipSummary,
}

impl MonthlyRecord for FlipMonth {
    fn month(&self) -> u32 {
        self.month
    }

    fn net_proceeds(&self) -> Money {
        self.property_value - self.cumulative_costs
    }

    fn flows(&self) -> Vec<(&'static str, Money)> {
        vec![("monthly_cost", self.monthly_cost)]
    }

    fn levels(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("property_value", self.property_value),
            ("cumulative_costs", self.cumulative_costs),
        ]
    }
}

pub fn simulate_flip(input: &FlipInput) -> RentVsOwnResult<ComputationOutput<FlipResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.purchase_price <= Decimal::ZERO {
        return Err(RentVsOwnError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }
    if input.renovation_months == 0 {
        return Err(RentVsOwnError::InvalidInput {
            field: "renovation_months".into(),
            reason: "A flip needs at least one renovation month".into(),
        });
    }
    if input.renovation_months > MAX_YEARS * 12 {
        return Err(RentVsOwnError::InvalidInput {
            field: "renovation_months".into(),
            reason: format!("Cannot exceed {} months", MAX_YEARS * 12),
        });
    }
    check_amount("purchase_price", input.purchase_price)?;
    check_fraction("down_payment_pct", input.down_payment_pct)?;
    check_fraction("selling_cost_pct", input.selling_cost_pct)?;
    check_fraction("tax_bracket", input.tax_bracket)?;
    check_amount("renovation_cost", input.renovation_cost)?;
    check_amount("holding_costs_monthly", input.holding_costs_monthly)?;
    check_amount("after_repair_value", input.after_repair_value)?;

    if input.renovation_months >= 12 {
        warnings.push(format!(
            "Holding period of {} months still taxed as a short-term gain",
            input.renovation_months + 1
        ));
    }

    let down_payment = input.purchase_price * input.down_payment_pct;
    let total_investment = down_payment + input.renovation_cost;
    let renovation_per_month = input.renovation_cost / Decimal::from(input.renovation_months);

    // Renovation months, then the sale month
    let months = input.renovation_months + 1;
    let mut monthly = Vec::with_capacity(months as usize);
    let mut cumulative_costs = total_investment;

    for month in 1..=months {
        let (status, property_value, monthly_cost) = if month <= input.renovation_months {
            (
                FlipStatus::Renovating,
                input.purchase_price,
                input.holding_costs_monthly + renovation_per_month,
            )
        } else {
            (
                FlipStatus::Sold,
                input.after_repair_value,
                input.holding_costs_monthly,
            )
        };
        cumulative_costs += monthly_cost;

        monthly.push(FlipMonth {
            month,
            status,
            property_value,
            monthly_cost,
            cumulative_costs,
        });
    }

    let selling_costs = input.after_repair_value * input.selling_cost_pct;
    let total_holding_costs = input.holding_costs_monthly * Decimal::from(months);
    let gross_profit = input.after_repair_value
        - input.purchase_price
        - input.renovation_cost
        - selling_costs
        - total_holding_costs;
    let capital_gains_tax = income_tax(gross_profit.max(Decimal::ZERO), input.tax_bracket);
    let net_profit = gross_profit - capital_gains_tax;

    if gross_profit < Decimal::ZERO {
        warnings.push(format!("Flip loses money before tax: {gross_profit:.2}"));
    }

    // roi() measures growth of the final value, so feed it investment + profit
    let summary = FlipSummary {
        purchase_price: input.purchase_price,
        renovation_cost: input.renovation_cost,
        total_investment,
        total_costs: cumulative_costs,
        after_repair_value: input.after_repair_value,
        selling_costs,
        total_holding_costs,
        gross_profit,
        capital_gains_tax,
        net_profit,
        roi: roi(total_investment + net_profit, total_investment),
        holding_period_months: months,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fix & flip: renovation and holding costs, sale at after-repair value, short-term gain taxed as income",
        input,
        warnings,
        elapsed,
        FlipResult { monthly, summary },
    ))
}
