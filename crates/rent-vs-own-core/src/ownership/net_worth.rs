//! Wealth-accounting ownership scenarios.
//!
//! Both report net worth rather than liquidation value: month 1 shows the
//! down payment, later months show equity less closing costs plus whatever
//! the owner has accumulated on the side. Sale is only priced at the
//! horizon, where capital gains tax is applied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{property_month, NetProceedsInputs, NetProceedsPolicy, OwnershipResult};
use crate::mortgage::amortization_schedule;
use crate::params::SimulationParameters;
use crate::records::{column_sum, last_or_zero, MonthlyRecord};
use crate::returns::{annualized_return, roi};
use crate::tax::{
    capital_gains_tax, primary_residence_exclusion, LONG_TERM_CAPITAL_GAINS_RATE,
    SHORT_TERM_CAPITAL_GAINS_RATE,
};
use crate::time_value::{grow_balance, GrowthPath};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::RentVsOwnResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One month of a live-in purchase tracked as net worth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetWorthLiveInMonth {
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
    pub total_monthly_cost: Money,
    pub unrecoverable: Money,
    pub cumulative_unrecoverable: Money,
    /// (interest + property tax) * (1 - bracket)
    pub operating_income: Money,
    pub cumulative_operating_income: Money,
    pub cumulative_principal: Money,
    pub equity: Money,
    pub net_worth: Money,
}

/// One month of a rental held alongside a stock portfolio funded by its
/// tax benefits and any surplus rent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridRentalMonth {
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
    /// Rent after vacancy
    pub gross_rental_income: Money,
    /// Rent after vacancy and income tax
    pub rental_income_after_tax: Money,
    pub unrecoverable: Money,
    pub cumulative_unrecoverable: Money,
    pub tax_benefit: Money,
    /// Out-of-pocket cost, never negative
    pub true_cost: Money,
    pub excess_rental_income: Money,
    pub side_contribution: Money,
    pub side_portfolio_value: Money,
    pub dividend: Money,
    pub dividend_tax: Money,
    pub net_dividend: Money,
    /// Tax benefit plus net dividend
    pub operating_income: Money,
    pub cumulative_operating_income: Money,
    pub cumulative_principal: Money,
    pub equity: Money,
    pub net_worth: Money,
}

/// Horizon-end figures shared by both wealth-accounting scenarios.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetWorthSummary {
    pub initial_investment: Money,
    /// Initial investment plus principal paid
    pub total_invested: Money,
    pub final_property_value: Money,
    pub final_equity: Money,
    /// Zero for the live-in scenario
    pub final_side_portfolio: Money,
    pub selling_costs: Money,
    pub capital_gain: Money,
    pub excluded_gain: Money,
    pub capital_gains_tax: Money,
    /// Equity - selling costs - capital gains tax (+ side portfolio)
    pub final_net_proceeds: Money,
    pub total_unrecoverable: Money,
    pub total_principal_paid: Money,
    pub total_rental_income: Money,
    pub total_operating_income: Money,
    pub roi: Decimal,
    pub annualized_return: Decimal,
}

pub type NetWorthLiveInResult = OwnershipResult<NetWorthLiveInMonth, NetWorthSummary>;
pub type HybridRentalResult = OwnershipResult<HybridRentalMonth, NetWorthSummary>;

impl MonthlyRecord for NetWorthLiveInMonth {
    fn month(&self) -> u32 {
        self.month
    }

    fn net_proceeds(&self) -> Money {
        self.net_worth
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
            ("operating_income", self.operating_income),
        ]
    }

    fn levels(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("property_value", self.property_value),
            ("remaining_balance", self.remaining_balance),
            ("equity", self.equity),
            ("cumulative_unrecoverable", self.cumulative_unrecoverable),
            ("cumulative_operating_income", self.cumulative_operating_income),
            ("net_worth", self.net_worth),
        ]
    }
}

impl MonthlyRecord for HybridRentalMonth {
    fn month(&self) -> u32 {
        self.month
    }

    fn net_proceeds(&self) -> Money {
        self.net_worth
    }

    fn flows(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("mortgage_payment", self.mortgage_payment),
            ("principal_payment", self.principal_payment),
            ("interest_payment", self.interest_payment),
            ("property_tax", self.property_tax),
            ("maintenance", self.maintenance),
            ("unrecoverable", self.unrecoverable),
            ("rental_income_after_tax", self.rental_income_after_tax),
            ("tax_benefit", self.tax_benefit),
            ("true_cost", self.true_cost),
            ("side_contribution", self.side_contribution),
            ("net_dividend", self.net_dividend),
            ("operating_income", self.operating_income),
        ]
    }

    fn levels(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("property_value", self.property_value),
            ("remaining_balance", self.remaining_balance),
            ("equity", self.equity),
            ("side_portfolio_value", self.side_portfolio_value),
            ("cumulative_operating_income", self.cumulative_operating_income),
            ("net_worth", self.net_worth),
        ]
    }
}

// ---------------------------------------------------------------------------
// Live-in, wealth accounting
// ---------------------------------------------------------------------------

/// Simulate living in the purchased home, reported as net worth.
pub fn simulate_net_worth_live_in(
    params: &SimulationParameters,
) -> RentVsOwnResult<ComputationOutput<NetWorthLiveInResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = run_net_worth_live_in(params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy & Live (net worth): equity less closing costs plus after-tax deduction value",
        params,
        warnings,
        elapsed,
        result,
    ))
}

/// The expense series handed to the investment side is unrecoverable cost
/// plus principal.
pub fn run_net_worth_live_in(
    params: &SimulationParameters,
    warnings: &mut Vec<String>,
) -> RentVsOwnResult<NetWorthLiveInResult> {
    params.validate(warnings)?;

    let policy = NetProceedsPolicy::WealthAccounting;
    let closing_costs = params.closing_costs();
    let schedule =
        amortization_schedule(params.loan_amount(), params.mortgage_rate, params.mortgage_years)?;

    let months = params.months();
    let mut monthly = Vec::with_capacity(months as usize);
    let mut monthly_expenses = Vec::with_capacity(months as usize);

    let mut cumulative_unrecoverable = Decimal::ZERO;
    let mut cumulative_operating_income = Decimal::ZERO;
    let mut cumulative_principal = Decimal::ZERO;

    let mut appreciation = GrowthPath::new(params.appreciation_rate);
    for month in 1..=months {
        let pm = property_month(params, &schedule, &mut appreciation, month);

        let total_monthly_cost = pm.mortgage_payment
            + pm.property_tax
            + params.hoa_monthly
            + params.insurance_monthly
            + pm.maintenance;

        let mut unrecoverable = pm.interest_payment
            + pm.property_tax
            + params.hoa_monthly
            + params.insurance_monthly
            + pm.maintenance;
        if month == 1 {
            unrecoverable += closing_costs;
        }

        let operating_income =
            (pm.interest_payment + pm.property_tax) * (Decimal::ONE - params.tax_bracket);

        cumulative_unrecoverable += unrecoverable;
        cumulative_operating_income += operating_income;
        cumulative_principal += pm.principal_payment;

        let net_worth = policy.evaluate(&NetProceedsInputs {
            month,
            property_value: pm.property_value,
            remaining_balance: pm.remaining_balance,
            selling_cost_pct: params.selling_cost_pct,
            closing_costs,
            down_payment: params.down_payment(),
            cumulative_operating_income,
            side_portfolio: Decimal::ZERO,
        });

        monthly_expenses.push(unrecoverable + pm.principal_payment);
        monthly.push(NetWorthLiveInMonth {
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
            total_monthly_cost,
            unrecoverable,
            cumulative_unrecoverable,
            operating_income,
            cumulative_operating_income,
            cumulative_principal,
            equity: pm.equity(),
            net_worth,
        });
    }

    let summary = if monthly.is_empty() {
        NetWorthSummary {
            initial_investment: params.initial_investment(),
            total_invested: params.initial_investment(),
            ..Default::default()
        }
    } else {
        let final_property_value = last_or_zero(&monthly, |m| m.property_value);
        let selling_costs = final_property_value * params.selling_cost_pct;
        let holding_years = Decimal::from(params.years);

        // Primary residence: gain measured against the purchase price,
        // exclusion applied before long-term rates.
        let capital_gain = final_property_value - params.purchase_price - selling_costs;
        let excluded_gain = primary_residence_exclusion(capital_gain, holding_years, params.is_married)
            .max(Decimal::ZERO);
        let taxable_gain = (capital_gain - excluded_gain).max(Decimal::ZERO);
        let cgt = capital_gains_tax(
            taxable_gain,
            holding_years,
            SHORT_TERM_CAPITAL_GAINS_RATE,
            LONG_TERM_CAPITAL_GAINS_RATE,
        );

        let final_equity = last_or_zero(&monthly, |m| m.equity);
        let total_principal_paid = last_or_zero(&monthly, |m| m.cumulative_principal);

        finish_summary(
            params,
            SaleOutcome {
                final_property_value,
                final_equity,
                final_side_portfolio: Decimal::ZERO,
                selling_costs,
                capital_gain,
                excluded_gain,
                capital_gains_tax: cgt,
                total_principal_paid,
                total_unrecoverable: last_or_zero(&monthly, |m| m.cumulative_unrecoverable),
                total_rental_income: Decimal::ZERO,
                total_operating_income: last_or_zero(&monthly, |m| m.cumulative_operating_income),
            },
        )
    };

    Ok(OwnershipResult {
        net_proceeds_policy: policy,
        monthly,
        summary,
        monthly_expenses,
    })
}

// ---------------------------------------------------------------------------
// Hybrid rental
// ---------------------------------------------------------------------------

/// Simulate renting out the property while investing its tax benefits and
/// surplus rent in a side stock portfolio.
pub fn simulate_hybrid_rental(
    params: &SimulationParameters,
) -> RentVsOwnResult<ComputationOutput<HybridRentalResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = run_hybrid_rental(params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Hybrid rental: property equity plus a stock portfolio funded by tax benefits and surplus rent",
        params,
        warnings,
        elapsed,
        result,
    ))
}

/// The expense series handed to the investment side is principal plus the
/// out-of-pocket true cost, or principal less any surplus rent.
pub fn run_hybrid_rental(
    params: &SimulationParameters,
    warnings: &mut Vec<String>,
) -> RentVsOwnResult<HybridRentalResult> {
    params.validate(warnings)?;

    if params.monthly_rent.is_zero() {
        warnings.push("No monthly rent given: the property earns no rental income".into());
    }

    let policy = NetProceedsPolicy::WealthAccounting;
    let closing_costs = params.closing_costs();
    let schedule =
        amortization_schedule(params.loan_amount(), params.mortgage_rate, params.mortgage_years)?;

    let after_tax = Decimal::ONE - params.tax_bracket;
    let gross_rental_income = params.monthly_rent * (Decimal::ONE - params.vacancy_rate);
    let rental_income_after_tax = gross_rental_income * after_tax;
    let monthly_return = params.stock_return_rate / Decimal::from(12);
    let monthly_yield = params.dividend_yield / Decimal::from(12);

    let months = params.months();
    let mut monthly = Vec::with_capacity(months as usize);
    let mut monthly_expenses = Vec::with_capacity(months as usize);

    let mut side_portfolio_value = Decimal::ZERO;
    let mut cumulative_unrecoverable = Decimal::ZERO;
    let mut cumulative_operating_income = Decimal::ZERO;
    let mut cumulative_principal = Decimal::ZERO;

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

        let tax_benefit = (pm.interest_payment + pm.property_tax) * after_tax;

        let shortfall = unrecoverable - rental_income_after_tax;
        let (true_cost, excess_rental_income) = if shortfall < Decimal::ZERO {
            (Decimal::ZERO, -shortfall)
        } else {
            (shortfall, Decimal::ZERO)
        };

        let side_contribution = tax_benefit + excess_rental_income;
        side_portfolio_value =
            grow_balance(side_portfolio_value, monthly_return, side_contribution, month)?;

        let dividend = side_portfolio_value * monthly_yield;
        let dividend_tax = dividend * params.dividend_tax_rate;
        let net_dividend = dividend - dividend_tax;
        let operating_income = tax_benefit + net_dividend;

        cumulative_unrecoverable += unrecoverable;
        cumulative_operating_income += operating_income;
        cumulative_principal += pm.principal_payment;

        // The side portfolio already holds the invested tax benefits, so
        // operating income is not added again.
        let net_worth = policy.evaluate(&NetProceedsInputs {
            month,
            property_value: pm.property_value,
            remaining_balance: pm.remaining_balance,
            selling_cost_pct: params.selling_cost_pct,
            closing_costs,
            down_payment: params.down_payment(),
            cumulative_operating_income: Decimal::ZERO,
            side_portfolio: side_portfolio_value,
        });

        let expense = if excess_rental_income > Decimal::ZERO {
            pm.principal_payment - excess_rental_income
        } else {
            pm.principal_payment + true_cost
        };
        monthly_expenses.push(expense);

        monthly.push(HybridRentalMonth {
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
            gross_rental_income,
            rental_income_after_tax,
            unrecoverable,
            cumulative_unrecoverable,
            tax_benefit,
            true_cost,
            excess_rental_income,
            side_contribution,
            side_portfolio_value,
            dividend,
            dividend_tax,
            net_dividend,
            operating_income,
            cumulative_operating_income,
            cumulative_principal,
            equity: pm.equity(),
            net_worth,
        });
    }

    let summary = if monthly.is_empty() {
        NetWorthSummary {
            initial_investment: params.initial_investment(),
            total_invested: params.initial_investment(),
            ..Default::default()
        }
    } else {
        let final_property_value = last_or_zero(&monthly, |m| m.property_value);
        let final_equity = last_or_zero(&monthly, |m| m.equity);
        let selling_costs = final_property_value * params.selling_cost_pct;

        // Investment property: no exclusion, gain measured on equity.
        let capital_gain = final_equity - params.initial_investment();
        let cgt = capital_gains_tax(
            capital_gain,
            Decimal::from(params.years),
            SHORT_TERM_CAPITAL_GAINS_RATE,
            LONG_TERM_CAPITAL_GAINS_RATE,
        );

        finish_summary(
            params,
            SaleOutcome {
                final_property_value,
                final_equity,
                final_side_portfolio: side_portfolio_value,
                selling_costs,
                capital_gain,
                excluded_gain: Decimal::ZERO,
                capital_gains_tax: cgt,
                total_principal_paid: last_or_zero(&monthly, |m| m.cumulative_principal),
                total_unrecoverable: last_or_zero(&monthly, |m| m.cumulative_unrecoverable),
                total_rental_income: column_sum(&monthly, |m| m.gross_rental_income),
                total_operating_income: last_or_zero(&monthly, |m| m.cumulative_operating_income),
            },
        )
    };

    Ok(OwnershipResult {
        net_proceeds_policy: policy,
        monthly,
        summary,
        monthly_expenses,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct SaleOutcome {
    final_property_value: Money,
    final_equity: Money,
    final_side_portfolio: Money,
    selling_costs: Money,
    capital_gain: Money,
    excluded_gain: Money,
    capital_gains_tax: Money,
    total_principal_paid: Money,
    total_unrecoverable: Money,
    total_rental_income: Money,
    total_operating_income: Money,
}

fn finish_summary(params: &SimulationParameters, sale: SaleOutcome) -> NetWorthSummary {
    let initial_investment = params.initial_investment();
    let total_invested = initial_investment + sale.total_principal_paid;
    let final_net_proceeds = sale.final_equity - sale.selling_costs - sale.capital_gains_tax
        + sale.final_side_portfolio;

    NetWorthSummary {
        initial_investment,
        total_invested,
        final_property_value: sale.final_property_value,
        final_equity: sale.final_equity,
        final_side_portfolio: sale.final_side_portfolio,
        selling_costs: sale.selling_costs,
        capital_gain: sale.capital_gain,
        excluded_gain: sale.excluded_gain,
        capital_gains_tax: sale.capital_gains_tax,
        final_net_proceeds,
        total_unrecoverable: sale.total_unrecoverable,
        total_principal_paid: sale.total_principal_paid,
        total_rental_income: sale.total_rental_income,
        total_operating_income: sale.total_operating_income,
        roi: roi(final_net_proceeds, total_invested),
        annualized_return: annualized_return(final_net_proceeds, total_invested, params.years),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
