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

/// One month of living in the purchased home.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveInMonth {
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
    /// Mortgage + property tax + insurance + HOA + maintenance
    pub total_costs_before_tax: Money,
    /// (interest + property tax) * bracket
    pub tax_benefit: Money,
    /// Total costs net of the tax benefit
    pub true_cost: Money,
    /// Everything except principal; month 1 includes closing costs
    pub unrecoverable: Money,
    pub cumulative_unrecoverable: Money,
    pub cumulative_tax_benefits: Money,
    pub cumulative_true_cost: Money,
    pub equity: Money,
    pub net_proceeds: Money,
}

/// Horizon-end totals for the live-in scenario.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveInSummary {
    pub initial_payment: Money,
    pub final_property_value: Money,
    pub final_equity: Money,
    pub selling_costs: Money,
    pub final_net_proceeds: Money,
    pub total_unrecoverable_costs: Money,
    pub total_tax_benefits: Money,
    /// Cumulative true cost plus selling costs
    pub total_true_cost: Money,
    pub total_principal_paid: Money,
    /// Initial payment plus principal paid
    pub total_invested: Money,
    /// Net proceeds over total invested, percent
    pub roi: Decimal,
    pub annualized_return: Decimal,
}

pub type LiveInResult = OwnershipResult<LiveInMonth, LiveInSummary>;

impl MonthlyRecord for LiveInMonth {
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
            ("tax_benefit", self.tax_benefit),
            ("true_cost", self.true_cost),
            ("unrecoverable", self.unrecoverable),
        ]
    }

    fn levels(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("property_value", self.property_value),
            ("remaining_balance", self.remaining_balance),
            ("equity", self.equity),
            ("cumulative_true_cost", self.cumulative_true_cost),
            ("net_proceeds", self.net_proceeds),
        ]
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate buying a home and living in it.
pub fn simulate_live_in(
    params: &SimulationParameters,
) -> RentVsOwnResult<ComputationOutput<LiveInResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = run_live_in(params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy & Live: monthly ownership cost net of interest and property-tax deductions",
        params,
        warnings,
        elapsed,
        result,
    ))
}

/// Month loop for the live-in scenario. The expense series handed to the
/// investment side is the true monthly cost.
pub fn run_live_in(
    params: &SimulationParameters,
    warnings: &mut Vec<String>,
) -> RentVsOwnResult<LiveInResult> {
    params.validate(warnings)?;

    let policy = NetProceedsPolicy::Liquidation;
    let closing_costs = params.closing_costs();
    let schedule =
        amortization_schedule(params.loan_amount(), params.mortgage_rate, params.mortgage_years)?;

    let months = params.months();
    let mut monthly = Vec::with_capacity(months as usize);
    let mut monthly_expenses = Vec::with_capacity(months as usize);

    let mut cumulative_unrecoverable = Decimal::ZERO;
    let mut cumulative_tax_benefits = Decimal::ZERO;
    let mut cumulative_true_cost = Decimal::ZERO;

    let mut appreciation = GrowthPath::new(params.appreciation_rate);
    for month in 1..=months {
        let pm = property_month(params, &schedule, &mut appreciation, month);

        let tax_benefit = (pm.interest_payment + pm.property_tax) * params.tax_bracket;

        let total_costs_before_tax = pm.mortgage_payment
            + pm.property_tax
            + params.insurance_monthly
            + params.hoa_monthly
            + pm.maintenance;
        let true_cost = total_costs_before_tax - tax_benefit;

        let mut unrecoverable = pm.interest_payment
            + pm.property_tax
            + params.insurance_monthly
            + params.hoa_monthly
            + pm.maintenance;
        if month == 1 {
            unrecoverable += closing_costs;
        }

        cumulative_unrecoverable += unrecoverable;
        cumulative_tax_benefits += tax_benefit;
        cumulative_true_cost += true_cost;

        let net_proceeds = policy.evaluate(&NetProceedsInputs {
            month,
            property_value: pm.property_value,
            remaining_balance: pm.remaining_balance,
            selling_cost_pct: params.selling_cost_pct,
            closing_costs,
            down_payment: params.down_payment(),
            cumulative_operating_income: cumulative_tax_benefits,
            side_portfolio: Decimal::ZERO,
        });

        monthly_expenses.push(true_cost);
        monthly.push(LiveInMonth {
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
            total_costs_before_tax,
            tax_benefit,
            true_cost,
            unrecoverable,
            cumulative_unrecoverable,
            cumulative_tax_benefits,
            cumulative_true_cost,
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

fn summarize(params: &SimulationParameters, monthly: &[LiveInMonth]) -> LiveInSummary {
    if monthly.is_empty() {
        let initial_payment = params.initial_investment();
        return LiveInSummary {
            initial_payment,
            total_invested: initial_payment,
            ..Default::default()
        };
    }

    let final_property_value = last_or_zero(monthly, |m| m.property_value);
    let final_remaining_balance = last_or_zero(monthly, |m| m.remaining_balance);
    let selling_costs = final_property_value * params.selling_cost_pct;
    let final_net_proceeds = final_property_value - final_remaining_balance - selling_costs;
    let initial_payment = params.initial_investment();
    let total_principal_paid = column_sum(monthly, |m| m.principal_payment);
    let total_invested = initial_payment + total_principal_paid;

    LiveInSummary {
        initial_payment,
        final_property_value,
        final_equity: final_property_value - final_remaining_balance,
        selling_costs,
        final_net_proceeds,
        total_unrecoverable_costs: last_or_zero(monthly, |m| m.cumulative_unrecoverable),
        total_tax_benefits: last_or_zero(monthly, |m| m.cumulative_tax_benefits),
        total_true_cost: last_or_zero(monthly, |m| m.cumulative_true_cost) + selling_costs,
        total_principal_paid,
        total_invested,
        roi: roi(final_net_proceeds, total_invested),
        annualized_return: annualized_return(final_net_proceeds, total_invested, params.years),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::fixtures::thirty_year_purchase;
    use rust_decimal::MathematicalOps;
    use rust_decimal_macros::dec;

    #[test]
    fn test_thirty_year_purchase_headline_numbers() {
        let params = thirty_year_purchase();
        let result = run_live_in(&params, &mut Vec::new()).unwrap();

        assert_eq!(result.monthly.len(), 360);
        assert_eq!(result.monthly_expenses.len(), 360);
        assert_eq!(result.summary.initial_payment, dec!(115000));

        // Month 1 unrecoverable carries the 15000 closing cost
        let m1 = &result.monthly[0];
        let recurring = m1.interest_payment + m1.property_tax + dec!(150) + dec!(200) + m1.maintenance;
        assert_eq!(m1.unrecoverable, recurring + dec!(15000));
        assert!(result.monthly[1].unrecoverable < dec!(15000));

        // Final value = 500000 * 1.03^(359/12)
        let expected = dec!(500000) * dec!(1.03).powd(dec!(359) / dec!(12));
        let actual = result.summary.final_property_value;
        assert!((actual - expected).abs() < dec!(1), "{actual} vs {expected}");
        assert!(actual > dec!(1210000) && actual < dec!(1215000));
    }

    #[test]
    fn test_tax_benefit_and_true_cost() {
        let params = thirty_year_purchase();
        let result = run_live_in(&params, &mut Vec::new()).unwrap();
        let m1 = &result.monthly[0];

        // 400000 * 0.065 / 12 interest, 500 property tax
        let interest = dec!(400000) * dec!(0.065) / dec!(12);
        assert!((m1.interest_payment - interest).abs() < dec!(0.000001));
        assert_eq!(m1.tax_benefit, (m1.interest_payment + dec!(500)) * dec!(0.25));
        assert_eq!(m1.true_cost, m1.total_costs_before_tax - m1.tax_benefit);
        assert_eq!(result.monthly_expenses[0], m1.true_cost);
    }

    #[test]
    fn test_cumulative_fields_follow_recurrence() {
        let result = run_live_in(&thirty_year_purchase(), &mut Vec::new()).unwrap();
        for pair in result.monthly.windows(2) {
            let (prev, cur) = (&pair[0], &pair[1]);
            assert_eq!(cur.cumulative_true_cost, prev.cumulative_true_cost + cur.true_cost);
            assert_eq!(
                cur.cumulative_unrecoverable,
                prev.cumulative_unrecoverable + cur.unrecoverable
            );
            assert_eq!(
                cur.cumulative_tax_benefits,
                prev.cumulative_tax_benefits + cur.tax_benefit
            );
        }
    }

    #[test]
    fn test_net_proceeds_is_liquidation_value() {
        let result = run_live_in(&thirty_year_purchase(), &mut Vec::new()).unwrap();
        assert_eq!(result.net_proceeds_policy, NetProceedsPolicy::Liquidation);
        for m in result.monthly.iter().step_by(37) {
            let expected = m.property_value - m.remaining_balance - m.property_value * dec!(0.06);
            assert_eq!(m.net_proceeds, expected);
            assert_eq!(m.equity, m.property_value - m.remaining_balance);
        }
        let last = result.monthly.last().unwrap();
        assert_eq!(result.summary.final_net_proceeds, last.net_proceeds);
    }

    #[test]
    fn test_summary_totals() {
        let result = run_live_in(&thirty_year_purchase(), &mut Vec::new()).unwrap();
        let s = &result.summary;
        assert!((s.total_principal_paid - dec!(400000)).abs() < dec!(0.01));
        let last = result.monthly.last().unwrap();
        assert_eq!(s.total_true_cost, last.cumulative_true_cost + s.selling_costs);
        assert_eq!(s.selling_costs, s.final_property_value * dec!(0.06));
    }

    #[test]
    fn test_trailing_months_after_payoff() {
        let mut params = thirty_year_purchase();
        params.mortgage_years = 10;
        params.years = 15;
        let result = run_live_in(&params, &mut Vec::new()).unwrap();
        let m = &result.monthly[150];
        assert_eq!(m.mortgage_payment, Decimal::ZERO);
        assert_eq!(m.interest_payment, Decimal::ZERO);
        assert_eq!(m.remaining_balance, Decimal::ZERO);
        assert_eq!(m.equity, m.property_value);
    }

    #[test]
    fn test_zero_horizon_yields_empty_series_and_zero_summary() {
        let mut params = thirty_year_purchase();
        params.years = 0;
        let out = simulate_live_in(&params).unwrap();
        assert!(out.result.monthly.is_empty());
        assert!(out.result.monthly_expenses.is_empty());
        assert_eq!(out.result.summary.final_property_value, Decimal::ZERO);
        assert_eq!(out.result.summary.total_principal_paid, Decimal::ZERO);
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let params = thirty_year_purchase();
        let a = serde_json::to_string(&run_live_in(&params, &mut Vec::new()).unwrap()).unwrap();
        let b = serde_json::to_string(&run_live_in(&params, &mut Vec::new()).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
