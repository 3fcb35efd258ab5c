//! Stand-alone investment-property models measured by cash flow.
//!
//! Unlike the ownership scenarios these are not paired with an investment
//! side: each produces its own monthly cash flow, taxes it as passive
//! income with straight-line depreciation, and prices a sale at the
//! horizon with depreciation recapture and long-term capital gains.

pub mod flip;
pub mod long_term;
pub mod short_term;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::mortgage::amortization_schedule;
use crate::ownership::property_month;
use crate::params::SimulationParameters;
use crate::records::{column_sum, last_or_zero, MonthlyRecord};
use crate::returns::{annualized_return, roi};
use crate::tax::{
    capital_gains_tax, passive_income_tax, rental_depreciation, DEFAULT_LAND_RATIO,
    DEPRECIATION_RECAPTURE_RATE, LONG_TERM_CAPITAL_GAINS_RATE, RESIDENTIAL_USEFUL_LIFE_YEARS,
    SHORT_TERM_CAPITAL_GAINS_RATE,
};
use crate::time_value::GrowthPath;
use crate::types::Money;
use crate::RentVsOwnResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One month of an income property. Lines that do not apply to a model
/// (utilities and cleaning for long-term rentals) are zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowMonth {
    pub month: u32,
    pub year: u32,
    pub property_value: Money,
    /// Rent or booking revenue before fees
    pub gross_income: Money,
    /// Management or platform fee
    pub fees: Money,
    /// Income after occupancy and fees
    pub net_income: Money,
    pub mortgage_payment: Money,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub property_tax: Money,
    pub insurance: Money,
    pub utilities: Money,
    pub maintenance: Money,
    pub cleaning_costs: Money,
    pub total_expenses: Money,
    pub pre_tax_cashflow: Money,
    pub depreciation: Money,
    pub income_tax: Money,
    pub post_tax_cashflow: Money,
    pub cumulative_cashflow: Money,
    pub cumulative_income: Money,
    pub remaining_balance: Money,
    pub equity: Money,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashFlowSummary {
    pub initial_investment: Money,
    pub total_income: Money,
    pub total_cashflow: Money,
    pub final_property_value: Money,
    pub final_equity: Money,
    pub selling_costs: Money,
    pub total_depreciation: Money,
    pub depreciation_recapture_tax: Money,
    pub capital_gain: Money,
    pub capital_gains_tax: Money,
    /// Equity less selling costs and sale taxes
    pub net_proceeds: Money,
    /// Net proceeds plus cumulative after-tax cash flow
    pub total_return: Money,
    pub roi: Decimal,
    /// Cumulative after-tax cash flow over initial investment, percent
    pub cash_on_cash_return: Decimal,
    pub annualized_return: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowResult {
    pub monthly: Vec<CashFlowMonth>,
    pub summary: CashFlowSummary,
}

impl MonthlyRecord for CashFlowMonth {
    fn month(&self) -> u32 {
        self.month
    }

    fn net_proceeds(&self) -> Money {
        self.equity
    }

    fn flows(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("gross_income", self.gross_income),
            ("fees", self.fees),
            ("net_income", self.net_income),
            ("total_expenses", self.total_expenses),
            ("pre_tax_cashflow", self.pre_tax_cashflow),
            ("income_tax", self.income_tax),
            ("post_tax_cashflow", self.post_tax_cashflow),
        ]
    }

    fn levels(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("property_value", self.property_value),
            ("remaining_balance", self.remaining_balance),
            ("equity", self.equity),
            ("cumulative_cashflow", self.cumulative_cashflow),
        ]
    }
}

// ---------------------------------------------------------------------------
// Shared month loop
// ---------------------------------------------------------------------------

/// Income side of one month, supplied by each model.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MonthIncome {
    pub gross_income: Money,
    pub fees: Money,
    pub net_income: Money,
    pub utilities: Money,
    pub cleaning_costs: Money,
}

/// Run the cash-flow loop. HOA dues are not part of these models.
pub(crate) fn run_cash_flow<F>(
    params: &SimulationParameters,
    warnings: &mut Vec<String>,
    mut income: F,
) -> RentVsOwnResult<CashFlowResult>
where
    F: FnMut(u32) -> MonthIncome,
{
    params.validate(warnings)?;
    if !params.hoa_monthly.is_zero() {
        warnings.push("HOA dues are not included in cash-flow property models".into());
    }

    let schedule =
        amortization_schedule(params.loan_amount(), params.mortgage_rate, params.mortgage_years)?;
    let monthly_depreciation = rental_depreciation(
        params.purchase_price,
        DEFAULT_LAND_RATIO,
        RESIDENTIAL_USEFUL_LIFE_YEARS,
    ) / Decimal::from(12);

    let months = params.months();
    let mut monthly = Vec::with_capacity(months as usize);
    let mut cumulative_cashflow = Decimal::ZERO;
    let mut cumulative_income = Decimal::ZERO;
    let mut negative_months = 0u32;

    let mut appreciation = GrowthPath::new(params.appreciation_rate);
    for month in 1..=months {
        let pm = property_month(params, &schedule, &mut appreciation, month);
        let inc = income(month);

        let total_expenses = pm.mortgage_payment
            + pm.property_tax
            + params.insurance_monthly
            + inc.utilities
            + pm.maintenance
            + inc.cleaning_costs;
        let pre_tax_cashflow = inc.net_income - total_expenses;

        // Principal is not deductible; fees are already out of net income.
        let deductible = pm.interest_payment
            + pm.property_tax
            + params.insurance_monthly
            + inc.utilities
            + pm.maintenance
            + inc.cleaning_costs;
        let income_tax = passive_income_tax(
            inc.net_income,
            deductible,
            monthly_depreciation,
            params.tax_bracket,
        );
        let post_tax_cashflow = pre_tax_cashflow - income_tax;
        if post_tax_cashflow < Decimal::ZERO {
            negative_months += 1;
        }

        cumulative_cashflow += post_tax_cashflow;
        cumulative_income += inc.net_income;

        monthly.push(CashFlowMonth {
            month,
            year: pm.year,
            property_value: pm.property_value,
            gross_income: inc.gross_income,
            fees: inc.fees,
            net_income: inc.net_income,
            mortgage_payment: pm.mortgage_payment,
            principal_payment: pm.principal_payment,
            interest_payment: pm.interest_payment,
            property_tax: pm.property_tax,
            insurance: params.insurance_monthly,
            utilities: inc.utilities,
            maintenance: pm.maintenance,
            cleaning_costs: inc.cleaning_costs,
            total_expenses,
            pre_tax_cashflow,
            depreciation: monthly_depreciation,
            income_tax,
            post_tax_cashflow,
            cumulative_cashflow,
            cumulative_income,
            remaining_balance: pm.remaining_balance,
            equity: pm.equity(),
        });
    }

    if negative_months > 0 {
        warnings.push(format!(
            "Negative after-tax cash flow in {negative_months} of {months} months"
        ));
    }

    let summary = summarize(params, &monthly, monthly_depreciation);
    Ok(CashFlowResult { monthly, summary })
}

fn summarize(
    params: &SimulationParameters,
    monthly: &[CashFlowMonth],
    monthly_depreciation: Money,
) -> CashFlowSummary {
    let initial_investment = params.initial_investment();
    if monthly.is_empty() {
        return CashFlowSummary {
            initial_investment,
            ..Default::default()
        };
    }

    let final_property_value = last_or_zero(monthly, |m| m.property_value);
    let final_equity = last_or_zero(monthly, |m| m.equity);
    let selling_costs = final_property_value * params.selling_cost_pct;

    let total_depreciation = monthly_depreciation * Decimal::from(params.months());
    let depreciation_recapture_tax = total_depreciation * DEPRECIATION_RECAPTURE_RATE;

    let capital_gain = final_property_value - params.purchase_price;
    let cgt = capital_gains_tax(
        capital_gain,
        Decimal::from(params.years),
        SHORT_TERM_CAPITAL_GAINS_RATE,
        LONG_TERM_CAPITAL_GAINS_RATE,
    );

    let net_proceeds = final_equity - selling_costs - cgt - depreciation_recapture_tax;
    let total_cashflow = last_or_zero(monthly, |m| m.cumulative_cashflow);
    let total_return = net_proceeds + total_cashflow;

    let cash_on_cash_return = if initial_investment > Decimal::ZERO {
        column_sum(monthly, |m| m.post_tax_cashflow) / initial_investment * Decimal::from(100)
    } else {
        Decimal::ZERO
    };

    CashFlowSummary {
        initial_investment,
        total_income: last_or_zero(monthly, |m| m.cumulative_income),
        total_cashflow,
        final_property_value,
        final_equity,
        selling_costs,
        total_depreciation,
        depreciation_recapture_tax,
        capital_gain,
        capital_gains_tax: cgt,
        net_proceeds,
        total_return,
        roi: roi(total_return, initial_investment),
        cash_on_cash_return,
        annualized_return: annualized_return(total_return, initial_investment, params.years),
    }
}
