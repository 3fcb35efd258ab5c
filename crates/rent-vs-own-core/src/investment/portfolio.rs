use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::ContributionSchedule;
use crate::params::InvestmentParameters;
use crate::records::{column_sum, last_or_zero, MonthlyRecord};
use crate::returns::{annualized_return, roi};
use crate::time_value::{grow_balance, is_year_end, year_index, GrowthPath};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::RentVsOwnResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which investment strategy the portfolio follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentVariant {
    /// Rent a home and invest the difference. Dividends are taxed once a
    /// year at the bracket; cumulative cost is rent plus dividend tax.
    RentAndInvest,
    /// Invest only, no rent. Dividends taxed annually; cumulative cost is
    /// dividend tax alone.
    StockOnly,
    /// Rent and invest, reported as net worth. Dividends are taxed monthly
    /// at the dividend rate and net worth adds the after-tax dividends.
    NetWorthTracking,
}

impl InvestmentVariant {
    fn pays_rent(&self) -> bool {
        !matches!(self, InvestmentVariant::StockOnly)
    }

    fn taxes_monthly(&self) -> bool {
        matches!(self, InvestmentVariant::NetWorthTracking)
    }
}

/// Stand-alone investment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentInput {
    #[serde(flatten)]
    pub params: InvestmentParameters,
    pub variant: InvestmentVariant,
    pub contributions: ContributionSchedule,
}

/// One month of the investment side. A single schema serves all variants;
/// `rent` is zero for `StockOnly`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentMonth {
    pub month: u32,
    pub year: u32,
    pub rent: Money,
    pub cumulative_rent: Money,
    pub contribution: Money,
    pub portfolio_value: Money,
    pub dividend: Money,
    /// Monthly under net-worth tracking; otherwise nonzero only in month 12
    pub dividend_tax: Money,
    pub net_dividend: Money,
    pub cumulative_dividends: Money,
    pub cumulative_dividend_tax: Money,
    pub cumulative_net_dividends: Money,
    pub operating_income: Money,
    pub cumulative_operating_income: Money,
    pub cumulative_cost: Money,
    pub net_worth: Money,
    pub net_proceeds: Money,
}

/// Horizon-end totals for the investment side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvestmentSummary {
    pub initial_investment: Money,
    pub final_portfolio_value: Money,
    /// Sum of monthly contributions
    pub total_contributions: Money,
    /// Initial investment plus contributions
    pub total_contributed: Money,
    pub total_rent_paid: Money,
    pub total_dividends: Money,
    pub total_dividend_tax: Money,
    pub total_cost: Money,
    pub total_operating_income: Money,
    pub final_net_proceeds: Money,
    pub final_net_worth: Money,
    pub roi: Decimal,
    pub annualized_return: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentResult {
    pub variant: InvestmentVariant,
    pub monthly: Vec<InvestmentMonth>,
    pub summary: InvestmentSummary,
}

impl MonthlyRecord for InvestmentMonth {
    fn month(&self) -> u32 {
        self.month
    }

    fn net_proceeds(&self) -> Money {
        self.net_proceeds
    }

    fn flows(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("rent", self.rent),
            ("contribution", self.contribution),
            ("dividend", self.dividend),
            ("dividend_tax", self.dividend_tax),
            ("net_dividend", self.net_dividend),
            ("operating_income", self.operating_income),
        ]
    }

    fn levels(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("portfolio_value", self.portfolio_value),
            ("cumulative_rent", self.cumulative_rent),
            ("cumulative_cost", self.cumulative_cost),
            ("net_worth", self.net_worth),
            ("net_proceeds", self.net_proceeds),
        ]
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn simulate_investment(
    input: &InvestmentInput,
) -> RentVsOwnResult<ComputationOutput<InvestmentResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = run_investment(&input.params, input.variant, &input.contributions, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Complementary stock portfolio: monthly compounding with dividend yield and dividend tax",
        input,
        warnings,
        elapsed,
        result,
    ))
}

/// Month loop for the investment side.
///
/// Each month the portfolio compounds at r/12 and then takes the
/// contribution; the dividend is computed on the updated value. Dividends
/// are tracked as income but not added back to the portfolio, while the
/// return rate already reflects total return, so the yield is counted on
/// top of it.
pub fn run_investment(
    params: &InvestmentParameters,
    variant: InvestmentVariant,
    schedule: &ContributionSchedule,
    warnings: &mut Vec<String>,
) -> RentVsOwnResult<InvestmentResult> {
    params.validate()?;
    let months = params.months();
    schedule.validate(months)?;

    let monthly_return = params.stock_return_rate / Decimal::from(12);
    let monthly_yield = params.dividend_yield / Decimal::from(12);

    let mut monthly = Vec::with_capacity(months as usize);

    let mut portfolio_value = params.initial_investment;
    let mut annual_dividends = Decimal::ZERO;
    let mut cumulative_rent = Decimal::ZERO;
    let mut cumulative_dividends = Decimal::ZERO;
    let mut cumulative_dividend_tax = Decimal::ZERO;
    let mut cumulative_net_dividends = Decimal::ZERO;
    let mut cumulative_operating_income = Decimal::ZERO;

    let mut negative_contributions = 0u32;
    let mut first_negative_portfolio: Option<u32> = None;

    let mut rent_growth = GrowthPath::new(params.rent_increase_rate);
    for month in 1..=months {
        let rent = if variant.pays_rent() {
            params.monthly_rent * rent_growth.annual(month)
        } else {
            Decimal::ZERO
        };

        let contribution = schedule.contribution((month - 1) as usize, rent);
        if contribution < Decimal::ZERO {
            negative_contributions += 1;
        }

        portfolio_value = grow_balance(portfolio_value, monthly_return, contribution, month)?;
        if portfolio_value < Decimal::ZERO && first_negative_portfolio.is_none() {
            first_negative_portfolio = Some(month);
        }

        let dividend = portfolio_value * monthly_yield;
        let dividend_tax = if variant.taxes_monthly() {
            dividend * params.dividend_tax_rate
        } else {
            annual_dividends += dividend;
            if is_year_end(month) {
                let tax = annual_dividends * params.tax_bracket;
                annual_dividends = Decimal::ZERO;
                tax
            } else {
                Decimal::ZERO
            }
        };
        let net_dividend = dividend - dividend_tax;
        let operating_income = if variant.taxes_monthly() {
            net_dividend
        } else {
            dividend
        };

        cumulative_rent += rent;
        cumulative_dividends += dividend;
        cumulative_dividend_tax += dividend_tax;
        cumulative_net_dividends += net_dividend;
        cumulative_operating_income += operating_income;

        let cumulative_cost = match variant {
            InvestmentVariant::StockOnly => cumulative_dividend_tax,
            _ => cumulative_rent + cumulative_dividend_tax,
        };

        let net_worth = if month == 1 {
            params.initial_investment
        } else {
            portfolio_value + cumulative_net_dividends
        };
        let net_proceeds = match variant {
            InvestmentVariant::NetWorthTracking => net_worth,
            _ => portfolio_value,
        };

        monthly.push(InvestmentMonth {
            month,
            year: year_index(month) + 1,
            rent,
            cumulative_rent,
            contribution,
            portfolio_value,
            dividend,
            dividend_tax,
            net_dividend,
            cumulative_dividends,
            cumulative_dividend_tax,
            cumulative_net_dividends,
            operating_income,
            cumulative_operating_income,
            cumulative_cost,
            net_worth,
            net_proceeds,
        });
    }

    if negative_contributions > 0 {
        warnings.push(format!(
            "{negative_contributions} months have a negative contribution: rent or surplus income exceeds the ownership outlay and is withdrawn from the portfolio"
        ));
    }
    if let Some(month) = first_negative_portfolio {
        warnings.push(format!("Portfolio value turns negative in month {month}"));
    }

    let summary = summarize(params, &monthly);

    Ok(InvestmentResult {
        variant,
        monthly,
        summary,
    })
}

fn summarize(params: &InvestmentParameters, monthly: &[InvestmentMonth]) -> InvestmentSummary {
    if monthly.is_empty() {
        return InvestmentSummary {
            initial_investment: params.initial_investment,
            total_contributed: params.initial_investment,
            ..Default::default()
        };
    }

    let total_contributions = column_sum(monthly, |m| m.contribution);
    let total_contributed = params.initial_investment + total_contributions;
    let final_net_proceeds = last_or_zero(monthly, |m| m.net_proceeds);

    InvestmentSummary {
        initial_investment: params.initial_investment,
        final_portfolio_value: last_or_zero(monthly, |m| m.portfolio_value),
        total_contributions,
        total_contributed,
        total_rent_paid: last_or_zero(monthly, |m| m.cumulative_rent),
        total_dividends: last_or_zero(monthly, |m| m.cumulative_dividends),
        total_dividend_tax: last_or_zero(monthly, |m| m.cumulative_dividend_tax),
        total_cost: last_or_zero(monthly, |m| m.cumulative_cost),
        total_operating_income: last_or_zero(monthly, |m| m.cumulative_operating_income),
        final_net_proceeds,
        final_net_worth: last_or_zero(monthly, |m| m.net_worth),
        roi: roi(final_net_proceeds, total_contributed),
        annualized_return: annualized_return(final_net_proceeds, total_contributed, params.years),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
