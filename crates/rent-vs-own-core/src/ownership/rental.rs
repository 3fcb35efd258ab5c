use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{property_month, NetProceedsInputs, NetProceedsPolicy, OwnershipResult};
use crate::mortgage::amortization_schedule;
use crate::params::SimulationParameters;
use crate::records::{column_sum, last_or_zero, MonthlyRecord};
use crate::returns::{annualized_return, roi};
use crate::time_value::GrowthPath;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::RentVsOwnResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One month of owning a property and renting it out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalMonth {
    pub month: u32,
    pub year: u32,
    pub property_value: Money,
    pub mortgage_payment: Money,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub remaining_balance: Money,
    pub property_tax: Money,
    pub hoa: Money,
    pub insurance: Money,
    pub maintenance: Money,
    /// Everything except principal; month 1 includes closing costs
    pub unrecoverable: Money,
    /// (interest + property tax) * bracket
    pub tax_benefit: Money,
    /// Rent collected after uniform vacancy loss
    pub rental_income: Money,
    /// Unrecoverable - rental income - tax benefit
    pub true_cost: Money,
    pub cumulative_true_cost: Money,
    pub operating_income: Money,
    pub cumulative_operating_income: Money,
    pub equity: Money,
    pub net_proceeds: Money,
}

/// Horizon-end totals for the rental scenario.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RentalSummary {
    pub initial_payment: Money,
    pub final_property_value: Money,
    pub selling_costs: Money,
    /// Value - selling costs - remaining balance
    pub final_net_proceeds: Money,
    /// Cumulative true cost plus selling costs
    pub total_true_cost: Money,
    pub total_operating_income: Money,
    pub total_rental_income: Money,
    pub total_tax_benefits: Money,
    pub total_principal_paid: Money,
    /// Initial payment plus principal paid
    pub total_invested: Money,
    /// Net proceeds over total invested, percent
    pub roi: Decimal,
    pub annualized_return: Decimal,
}

pub type RentalResult = OwnershipResult<RentalMonth, RentalSummary>;

impl MonthlyRecord for RentalMonth {
    fn month(&self) -> u32 {
        self.month
    }

    fn net_proceeds(&self) -> Money {
        self.net_proceeds
    }

    fn flows(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("mortgage_payment", self.mortgage_payment),
            ("principal_payment", self.principal_payment),
            ("interest_payment", self.interest_payment),
            ("property_tax", self.property_tax),
            ("hoa", self.hoa),
            ("insurance", self.insurance),
            ("maintenance", self.maintenance),
            ("unrecoverable", self.unrecoverable),
            ("tax_benefit", self.tax_benefit),
            ("rental_income", self.rental_income),
            ("true_cost", self.true_cost),
        ]
    }

    fn levels(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("property_value", self.property_value),
            ("remaining_balance", self.remaining_balance),
            ("equity", self.equity),
            ("cumulative_true_cost", self.cumulative_true_cost),
            ("cumulative_operating_income", self.cumulative_operating_income),
            ("net_proceeds", self.net_proceeds),
        ]
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate buying a property and renting it out.
pub fn simulate_rental(
    params: &SimulationParameters,
) -> RentVsOwnResult<ComputationOutput<RentalResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = run_rental(params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy & Rent: unrecoverable cost net of vacancy-adjusted rent and deductions",
        params,
        warnings,
        elapsed,
        result,
    ))
}

/// Month loop for the rental scenario. The expense series handed to the
/// investment side is true cost plus principal, so the investor matches
/// the landlord's equity-building outflow as well.
pub fn run_rental(
    params: &SimulationParameters,
    warnings: &mut Vec<String>,
) -> RentVsOwnResult<RentalResult> {
    params.validate(warnings)?;

    if params.monthly_rent.is_zero() {
        warnings.push("No monthly rent given: the property earns no rental income".into());
    }

    let policy = NetProceedsPolicy::Equity;
    let closing_costs = params.closing_costs();
    let schedule =
        amortization_schedule(params.loan_amount(), params.mortgage_rate, params.mortgage_years)?;

    // Vacancy is spread evenly: every month loses the same fraction.
    let rental_income = params.monthly_rent * (Decimal::ONE - params.vacancy_rate);

    let months = params.months();
    let mut monthly = Vec::with_capacity(months as usize);
    let mut monthly_expenses = Vec::with_capacity(months as usize);

    let mut cumulative_true_cost = Decimal::ZERO;
    let mut cumulative_operating_income = Decimal::ZERO;

    let mut appreciation = GrowthPath::new(params.appreciation_rate);
    for month in 1..=months {
        let pm = property_month(params, &schedule, &mut appreciation, month);

        let mut unrecoverable = pm.interest_payment
            + pm.property_tax
            + params.hoa_monthly
            + params.insurance_monthly
            + pm.maintenance;
        if month == 1 {
            unrecoverable += closing_costs;
        }

        let tax_benefit = (pm.interest_payment + pm.property_tax) * params.tax_bracket;
        let true_cost = unrecoverable - rental_income - tax_benefit;
        let operating_income = rental_income;

        cumulative_true_cost += true_cost;
        cumulative_operating_income += operating_income;

        let net_proceeds = policy.evaluate(&NetProceedsInputs {
            month,
            property_value: pm.property_value,
            remaining_balance: pm.remaining_balance,
            selling_cost_pct: params.selling_cost_pct,
            closing_costs,
            down_payment: params.down_payment(),
            cumulative_operating_income,
            side_portfolio: Decimal::ZERO,
        });

        monthly_expenses.push(true_cost + pm.principal_payment);
        monthly.push(RentalMonth {
            month,
            year: pm.year,
            property_value: pm.property_value,
            mortgage_payment: pm.mortgage_payment,
            principal_payment: pm.principal_payment,
            interest_payment: pm.interest_payment,
            remaining_balance: pm.remaining_balance,
            property_tax: pm.property_tax,
            hoa: params.hoa_monthly,
            insurance: params.insurance_monthly,
            maintenance: pm.maintenance,
            unrecoverable,
            tax_benefit,
            rental_income,
            true_cost,
            cumulative_true_cost,
            operating_income,
            cumulative_operating_income,
            equity: pm.equity(),
            net_proceeds,
        });
    }

    let summary = summarize(params, &monthly);

    Ok(OwnershipResult {
        net_proceeds_policy: policy,
        monthly,
        summary,
        monthly_expenses,
    })
}

fn summarize(params: &SimulationParameters, monthly: &[RentalMonth]) -> RentalSummary {
    if monthly.is_empty() {
        let initial_payment = params.initial_investment();
        return RentalSummary {
            initial_payment,
            total_invested: initial_payment,
            ..Default::default()
        };
    }

    let final_property_value = last_or_zero(monthly, |m| m.property_value);
    let final_remaining_balance = last_or_zero(monthly, |m| m.remaining_balance);
    let selling_costs = final_property_value * params.selling_cost_pct;
    let final_net_proceeds = final_property_value - selling_costs - final_remaining_balance;
    let initial_payment = params.initial_investment();
    let total_principal_paid = column_sum(monthly, |m| m.principal_payment);
    let total_invested = initial_payment + total_principal_paid;

    RentalSummary {
        initial_payment,
        final_property_value,
        selling_costs,
        final_net_proceeds,
        total_true_cost: last_or_zero(monthly, |m| m.cumulative_true_cost) + selling_costs,
        total_operating_income: last_or_zero(monthly, |m| m.cumulative_operating_income),
        total_rental_income: column_sum(monthly, |m| m.rental_income),
        total_tax_benefits: column_sum(monthly, |m| m.tax_benefit),
        total_principal_paid,
        total_invested,
        roi: roi(final_net_proceeds, total_invested),
        annualized_return: annualized_return(final_net_proceeds, total_invested, params.years),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
