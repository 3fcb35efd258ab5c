//! Ownership vs. investment, month by month.
//!
//! Every pipeline runs in two phases: the ownership simulation produces its
//! records and the `monthly_expenses` series, then the investment
//! simulation consumes that series through a `ContributionSchedule`. The
//! investor therefore spends exactly what the owner spends each month.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::investment::{
    run_investment, ContributionSchedule, InvestmentResult, InvestmentSummary, InvestmentVariant,
};
use crate::ownership::live_in::{run_live_in, LiveInMonth, LiveInSummary};
use crate::ownership::net_worth::{
    run_hybrid_rental, run_net_worth_live_in, HybridRentalMonth, NetWorthLiveInMonth,
    NetWorthSummary,
};
use crate::ownership::rental::{run_rental, RentalMonth, RentalSummary};
use crate::ownership::{OwnershipResult, OwnershipSummary};
use crate::params::{InvestmentParameters, SimulationParameters};
use crate::records::MonthlyRecord;
use crate::time_value::year_index;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::RentVsOwnResult;

pub use crate::returns::{annualized_return, roi};

// ---------------------------------------------------------------------------
// Strategy table
// ---------------------------------------------------------------------------

/// One row of the side-by-side strategy table. Returns are in percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySummary {
    pub strategy: String,
    pub initial_investment: Money,
    pub total_return: Money,
    pub roi: Rate,
    pub annualized_return: Rate,
}

/// Build the two-row strategy table, ownership first. Each row repeats
/// the figures its own summary reports, so the table and the summaries
/// always agree.
pub fn compare_strategies<S: OwnershipSummary>(
    ownership_label: &str,
    ownership: &S,
    investment_label: &str,
    investment: &InvestmentSummary,
) -> Vec<StrategySummary> {
    vec![
        StrategySummary {
            strategy: ownership_label.to_string(),
            initial_investment: ownership.initial_investment(),
            total_return: ownership.final_net_proceeds(),
            roi: ownership.roi(),
            annualized_return: ownership.annualized_return(),
        },
        StrategySummary {
            strategy: investment_label.to_string(),
            initial_investment: investment.initial_investment,
            total_return: investment.final_net_proceeds,
            roi: investment.roi,
            annualized_return: investment.annualized_return,
        },
    ]
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Calendar-year view of a monthly series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualRollup {
    /// One-based simulation year
    pub year: u32,
    /// Months that fell in this year
    pub months: u32,
    /// Flow fields summed over the year
    pub flows: BTreeMap<String, Money>,
    /// Level fields as of the last month of the year
    pub levels: BTreeMap<String, Money>,
    pub net_proceeds: Money,
}

/// Group records by `floor((month - 1) / 12)`.
pub fn annual_rollup<R: MonthlyRecord>(records: &[R]) -> Vec<AnnualRollup> {
    let mut years: Vec<AnnualRollup> = Vec::new();

    for record in records {
        let year = year_index(record.month()) + 1;

        let needs_new = years.last().map_or(true, |last| last.year != year);
        if needs_new {
            years.push(AnnualRollup {
                year,
                months: 0,
                flows: BTreeMap::new(),
                levels: BTreeMap::new(),
                net_proceeds: Decimal::ZERO,
            });
        }

        if let Some(current) = years.last_mut() {
            current.months += 1;
            for (name, value) in record.flows() {
                *current.flows.entry(name.to_string()).or_insert(Decimal::ZERO) += value;
            }
            for (name, value) in record.levels() {
                current.levels.insert(name.to_string(), value);
            }
            current.net_proceeds = record.net_proceeds();
        }
    }

    years
}

/// One month of both sides, aligned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthComparison {
    pub month: u32,
    pub ownership_net_proceeds: Money,
    pub investment_net_proceeds: Money,
    /// Ownership minus investment
    pub difference: Money,
}

pub fn align_months<O: MonthlyRecord, I: MonthlyRecord>(
    ownership: &[O],
    investment: &[I],
) -> Vec<MonthComparison> {
    ownership
        .iter()
        .zip(investment)
        .map(|(o, i)| MonthComparison {
            month: o.month(),
            ownership_net_proceeds: o.net_proceeds(),
            investment_net_proceeds: i.net_proceeds(),
            difference: o.net_proceeds() - i.net_proceeds(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Ownership,
    Investment,
    Tie,
}

/// Both sides of a comparison plus the derived views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison<R, S> {
    pub ownership: OwnershipResult<R, S>,
    pub investment: InvestmentResult,
    pub monthly: Vec<MonthComparison>,
    pub ownership_annual: Vec<AnnualRollup>,
    pub investment_annual: Vec<AnnualRollup>,
    pub strategies: Vec<StrategySummary>,
    pub ownership_final_net_proceeds: Money,
    pub investment_final_net_proceeds: Money,
    /// Ownership minus investment at the horizon
    pub advantage: Money,
    pub winner: Winner,
}

pub type BuyAndLiveComparison = Comparison<LiveInMonth, LiveInSummary>;
pub type BuyAndRentComparison = Comparison<RentalMonth, RentalSummary>;
pub type NetWorthBuyAndLiveComparison = Comparison<NetWorthLiveInMonth, NetWorthSummary>;
pub type HybridRentalComparison = Comparison<HybridRentalMonth, NetWorthSummary>;

/// How a pipeline pairs an ownership scenario with an investment variant.
struct Pairing {
    ownership_label: &'static str,
    investment_label: &'static str,
    variant: InvestmentVariant,
    schedule: fn(Vec<Money>) -> ContributionSchedule,
}

const BUY_AND_LIVE: Pairing = Pairing {
    ownership_label: "Buy & Live",
    investment_label: "Rent & Invest",
    variant: InvestmentVariant::RentAndInvest,
    schedule: ContributionSchedule::LessRent,
};

const BUY_AND_RENT: Pairing = Pairing {
    ownership_label: "Buy & Rent",
    investment_label: "Stock Portfolio",
    variant: InvestmentVariant::StockOnly,
    schedule: ContributionSchedule::Direct,
};

const NET_WORTH_BUY_AND_LIVE: Pairing = Pairing {
    ownership_label: "Buy & Live (net worth)",
    investment_label: "Rent & Invest (net worth)",
    variant: InvestmentVariant::NetWorthTracking,
    schedule: ContributionSchedule::LessRent,
};

const HYBRID_RENTAL: Pairing = Pairing {
    ownership_label: "Hybrid Rental",
    investment_label: "Stock Portfolio (net worth)",
    variant: InvestmentVariant::NetWorthTracking,
    schedule: ContributionSchedule::Direct,
};

fn couple<R, S>(
    params: &SimulationParameters,
    ownership: OwnershipResult<R, S>,
    pairing: &Pairing,
    warnings: &mut Vec<String>,
) -> RentVsOwnResult<Comparison<R, S>>
where
    R: MonthlyRecord,
    S: OwnershipSummary,
{
    let investment_params = InvestmentParameters::from_simulation(params);
    let schedule = (pairing.schedule)(ownership.monthly_expenses.clone());
    let investment = run_investment(&investment_params, pairing.variant, &schedule, warnings)?;

    let monthly = align_months(&ownership.monthly, &investment.monthly);
    let ownership_annual = annual_rollup(&ownership.monthly);
    let investment_annual = annual_rollup(&investment.monthly);

    let ownership_final = ownership.summary.final_net_proceeds();
    let investment_final = investment.summary.final_net_proceeds;

    let strategies = compare_strategies(
        pairing.ownership_label,
        &ownership.summary,
        pairing.investment_label,
        &investment.summary,
    );

    let advantage = ownership_final - investment_final;
    let winner = if advantage > Decimal::ZERO {
        Winner::Ownership
    } else if advantage < Decimal::ZERO {
        Winner::Investment
    } else {
        Winner::Tie
    };

    Ok(Comparison {
        ownership,
        investment,
        monthly,
        ownership_annual,
        investment_annual,
        strategies,
        ownership_final_net_proceeds: ownership_final,
        investment_final_net_proceeds: investment_final,
        advantage,
        winner,
    })
}

fn warn_if_rent_free(params: &SimulationParameters, warnings: &mut Vec<String>) {
    if params.monthly_rent.is_zero() {
        warnings.push("No monthly rent given: the renter side pays no rent".into());
    }
}

pub fn run_buy_and_live(
    params: &SimulationParameters,
    warnings: &mut Vec<String>,
) -> RentVsOwnResult<BuyAndLiveComparison> {
    let ownership = run_live_in(params, warnings)?;
    warn_if_rent_free(params, warnings);
    couple(params, ownership, &BUY_AND_LIVE, warnings)
}

pub fn run_buy_and_rent(
    params: &SimulationParameters,
    warnings: &mut Vec<String>,
) -> RentVsOwnResult<BuyAndRentComparison> {
    let ownership = run_rental(params, warnings)?;
    couple(params, ownership, &BUY_AND_RENT, warnings)
}

pub fn run_net_worth_buy_and_live(
    params: &SimulationParameters,
    warnings: &mut Vec<String>,
) -> RentVsOwnResult<NetWorthBuyAndLiveComparison> {
    let ownership = run_net_worth_live_in(params, warnings)?;
    warn_if_rent_free(params, warnings);
    couple(params, ownership, &NET_WORTH_BUY_AND_LIVE, warnings)
}

pub fn run_hybrid_rental_comparison(
    params: &SimulationParameters,
    warnings: &mut Vec<String>,
) -> RentVsOwnResult<HybridRentalComparison> {
    let ownership = run_hybrid_rental(params, warnings)?;
    couple(params, ownership, &HYBRID_RENTAL, warnings)
}

/// Buy and live in the home vs. rent and invest the difference.
pub fn compare_buy_and_live(
    params: &SimulationParameters,
) -> RentVsOwnResult<ComputationOutput<BuyAndLiveComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = run_buy_and_live(params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy & Live vs Rent & Invest: investor contributes the owner's true cost less rent",
        params,
        warnings,
        elapsed,
        result,
    ))
}

/// Buy and rent the property out vs. invest the same outlay in stocks.
pub fn compare_buy_and_rent(
    params: &SimulationParameters,
) -> RentVsOwnResult<ComputationOutput<BuyAndRentComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = run_buy_and_rent(params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy & Rent vs Stock Portfolio: investor contributes the landlord's true cost plus principal",
        params,
        warnings,
        elapsed,
        result,
    ))
}

/// Net-worth view of buy-and-live vs. rent-and-invest.
pub fn compare_net_worth_buy_and_live(
    params: &SimulationParameters,
) -> RentVsOwnResult<ComputationOutput<NetWorthBuyAndLiveComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = run_net_worth_buy_and_live(params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy & Live vs Rent & Invest (net worth): unrecoverable cost plus principal less rent",
        params,
        warnings,
        elapsed,
        result,
    ))
}

/// Rental with a side portfolio vs. a plain stock portfolio.
pub fn compare_hybrid_rental(
    params: &SimulationParameters,
) -> RentVsOwnResult<ComputationOutput<HybridRentalComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = run_hybrid_rental_comparison(params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Hybrid Rental vs Stock Portfolio (net worth): principal plus out-of-pocket cost",
        params,
        warnings,
        elapsed,
        result,
    ))
}

/// Pipeline selector, used where the pipeline is chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    BuyAndLive,
    BuyAndRent,
    NetWorthBuyAndLive,
    HybridRental,
}

impl Pipeline {
    /// Final ownership advantage (ownership minus investment) under `params`.
    pub fn advantage(
        &self,
        params: &SimulationParameters,
        warnings: &mut Vec<String>,
    ) -> RentVsOwnResult<Money> {
        Ok(match self {
            Pipeline::BuyAndLive => run_buy_and_live(params, warnings)?.advantage,
            Pipeline::BuyAndRent => run_buy_and_rent(params, warnings)?.advantage,
            Pipeline::NetWorthBuyAndLive => run_net_worth_buy_and_live(params, warnings)?.advantage,
            Pipeline::HybridRental => run_hybrid_rental_comparison(params, warnings)?.advantage,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::fixtures::thirty_year_purchase;
    use rust_decimal_macros::dec;

    fn assert_rows_match<R, S: OwnershipSummary>(c: &Comparison<R, S>) {
        let (own, inv) = (&c.strategies[0], &c.strategies[1]);
        assert_eq!(own.roi, c.ownership.summary.roi());
        assert_eq!(own.annualized_return, c.ownership.summary.annualized_return());
        assert_eq!(own.total_return, c.ownership_final_net_proceeds);
        assert_eq!(inv.roi, c.investment.summary.roi);
        assert_eq!(inv.annualized_return, c.investment.summary.annualized_return);
        assert_eq!(inv.total_return, c.investment_final_net_proceeds);
    }

    #[test]
    fn test_strategy_rows_repeat_each_side_summary() {
        let params = thirty_year_purchase();
        let mut warnings = Vec::new();
        assert_rows_match(&run_buy_and_live(&params, &mut warnings).unwrap());
        assert_rows_match(&run_buy_and_rent(&params, &mut warnings).unwrap());
        assert_rows_match(&run_hybrid_rental_comparison(&params, &mut warnings).unwrap());

        let net_worth = run_net_worth_buy_and_live(&params, &mut warnings).unwrap();
        assert_rows_match(&net_worth);
        assert_eq!(net_worth.strategies[0].strategy, NET_WORTH_BUY_AND_LIVE.ownership_label);
        assert!(net_worth.ownership.summary.roi > Decimal::ZERO);
    }

    #[test]
    fn test_annual_rollup_sums_flows_and_snapshots_levels() {
        let mut params = thirty_year_purchase();
        params.years = 2;
        let result = run_live_in(&params, &mut Vec::new()).unwrap();
        let annual = annual_rollup(&result.monthly);

        assert_eq!(annual.len(), 2);
        assert_eq!(annual[0].year, 1);
        assert_eq!(annual[0].months, 12);

        let interest: Money = result.monthly[..12].iter().map(|m| m.interest_payment).sum();
        assert_eq!(annual[0].flows["interest_payment"], interest);
        assert_eq!(
            annual[1].levels["remaining_balance"],
            result.monthly[23].remaining_balance
        );
        assert_eq!(annual[1].net_proceeds, result.monthly[23].net_proceeds);
    }

    #[test]
    fn test_annual_rollup_empty() {
        let empty: Vec<LiveInMonth> = Vec::new();
        assert!(annual_rollup(&empty).is_empty());
    }

    #[test]
    fn test_buy_and_live_equal_outflow() {
        let result = run_buy_and_live(&thirty_year_purchase(), &mut Vec::new()).unwrap();
        assert_eq!(result.investment.monthly.len(), 360);
        for (inv, expense) in result
            .investment
            .monthly
            .iter()
            .zip(&result.ownership.monthly_expenses)
        {
            let diff = (inv.contribution + inv.rent - *expense).abs();
            assert!(diff < dec!(0.0000001), "month {}: {diff}", inv.month);
        }
    }

    #[test]
    fn test_buy_and_rent_passes_expenses_directly() {
        let result = run_buy_and_rent(&thirty_year_purchase(), &mut Vec::new()).unwrap();
        assert_eq!(result.investment.variant, InvestmentVariant::StockOnly);
        for (inv, expense) in result
            .investment
            .monthly
            .iter()
            .zip(&result.ownership.monthly_expenses)
        {
            assert_eq!(inv.contribution, *expense);
            assert_eq!(inv.rent, Decimal::ZERO);
        }
    }

    #[test]
    fn test_winner_matches_advantage_sign() {
        let result = run_buy_and_live(&thirty_year_purchase(), &mut Vec::new()).unwrap();
        assert_eq!(
            result.advantage,
            result.ownership_final_net_proceeds - result.investment_final_net_proceeds
        );
        let expected = if result.advantage > Decimal::ZERO {
            Winner::Ownership
        } else if result.advantage < Decimal::ZERO {
            Winner::Investment
        } else {
            Winner::Tie
        };
        assert_eq!(result.winner, expected);
        assert_eq!(result.strategies.len(), 2);
        assert_eq!(result.monthly.len(), 360);
    }

    #[test]
    fn test_aligned_series_difference() {
        let result = run_hybrid_rental_comparison(&thirty_year_purchase(), &mut Vec::new()).unwrap();
        for row in result.monthly.iter().step_by(50) {
            assert_eq!(
                row.difference,
                row.ownership_net_proceeds - row.investment_net_proceeds
            );
        }
        assert_eq!(result.monthly[0].ownership_net_proceeds, dec!(100000));
        assert_eq!(result.monthly[0].investment_net_proceeds, dec!(115000));
    }

    #[test]
    fn test_pipeline_selector_matches_direct_call() {
        let params = thirty_year_purchase();
        let direct = run_net_worth_buy_and_live(&params, &mut Vec::new()).unwrap();
        let via = Pipeline::NetWorthBuyAndLive
            .advantage(&params, &mut Vec::new())
            .unwrap();
        assert_eq!(direct.advantage, via);
    }

    #[test]
    fn test_rent_free_warning() {
        let mut params = thirty_year_purchase();
        params.monthly_rent = Decimal::ZERO;
        let out = compare_buy_and_live(&params).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("no rent")));
    }
}
