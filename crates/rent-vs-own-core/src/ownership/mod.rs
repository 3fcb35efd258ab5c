//! Month-by-month projections of owning a property.
//!
//! Every scenario shares the same month loop skeleton (appreciation,
//! mortgage schedule lookup, value-based property tax and maintenance) but
//! encodes its own tax treatment and its own definition of net proceeds.
//! Each run also emits `monthly_expenses`, the per-month cash outflow that
//! the investment side replicates for a fair comparison.

pub mod live_in;
pub mod net_worth;
pub mod rental;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::mortgage::AmortizationEntry;
use crate::params::SimulationParameters;
use crate::time_value::{year_index, GrowthPath};
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Net proceeds
// ---------------------------------------------------------------------------

/// How a scenario values the owner's position at a given month.
///
/// The variants are not interchangeable: they answer different questions
/// and produce different user-visible numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetProceedsPolicy {
    /// Sell today: value - balance - value * selling_cost_pct
    Liquidation,
    /// Book equity: value - balance
    Equity,
    /// Wealth accounting: value - balance - closing costs + cumulative
    /// operating income (+ any side portfolio). Month 1 reports the down
    /// payment.
    WealthAccounting,
}

/// Everything a `NetProceedsPolicy` may need for one month.
#[derive(Debug, Clone, Copy)]
pub struct NetProceedsInputs {
    pub month: u32,
    pub property_value: Money,
    pub remaining_balance: Money,
    pub selling_cost_pct: Rate,
    pub closing_costs: Money,
    pub down_payment: Money,
    pub cumulative_operating_income: Money,
    pub side_portfolio: Money,
}

impl NetProceedsPolicy {
    pub fn evaluate(&self, inputs: &NetProceedsInputs) -> Money {
        match self {
            NetProceedsPolicy::Liquidation => {
                let selling_costs = inputs.property_value * inputs.selling_cost_pct;
                inputs.property_value - inputs.remaining_balance - selling_costs
            }
            NetProceedsPolicy::Equity => inputs.property_value - inputs.remaining_balance,
            NetProceedsPolicy::WealthAccounting => {
                if inputs.month == 1 {
                    inputs.down_payment
                } else {
                    inputs.property_value - inputs.remaining_balance - inputs.closing_costs
                        + inputs.cumulative_operating_income
                        + inputs.side_portfolio
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Result container
// ---------------------------------------------------------------------------

/// Output of an ownership run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipResult<R, S> {
    /// Policy used for every record's net proceeds
    pub net_proceeds_policy: NetProceedsPolicy,
    pub monthly: Vec<R>,
    pub summary: S,
    /// Total cash outflow per month, length `years * 12`. The only value
    /// handed to the investment side.
    pub monthly_expenses: Vec<Money>,
}

/// Headline figures every ownership summary exposes to the comparison layer.
pub trait OwnershipSummary {
    /// Cash put in on the day of purchase
    fn initial_investment(&self) -> Money;

    /// The scenario's horizon-end value of the position
    fn final_net_proceeds(&self) -> Money;

    /// Return on the scenario's own invested amount, percent
    fn roi(&self) -> Rate;

    fn annualized_return(&self) -> Rate;
}

impl OwnershipSummary for live_in::LiveInSummary {
    fn initial_investment(&self) -> Money {
        self.initial_payment
    }

    fn final_net_proceeds(&self) -> Money {
        self.final_net_proceeds
    }

    fn roi(&self) -> Rate {
        self.roi
    }

    fn annualized_return(&self) -> Rate {
        self.annualized_return
    }
}

impl OwnershipSummary for rental::RentalSummary {
    fn initial_investment(&self) -> Money {
        self.initial_payment
    }

    fn final_net_proceeds(&self) -> Money {
        self.final_net_proceeds
    }

    fn roi(&self) -> Rate {
        self.roi
    }

    fn annualized_return(&self) -> Rate {
        self.annualized_return
    }
}

impl OwnershipSummary for net_worth::NetWorthSummary {
    fn initial_investment(&self) -> Money {
        self.initial_investment
    }

    fn final_net_proceeds(&self) -> Money {
        self.final_net_proceeds
    }

    fn roi(&self) -> Rate {
        self.roi
    }

    fn annualized_return(&self) -> Rate {
        self.annualized_return
    }
}

// ---------------------------------------------------------------------------
// Shared month skeleton
// ---------------------------------------------------------------------------

/// Property-side state common to every ownership scenario for one month.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PropertyMonth {
    pub month: u32,
    pub year: u32,
    pub property_value: Money,
    pub mortgage_payment: Money,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub remaining_balance: Money,
    pub property_tax: Money,
    pub maintenance: Money,
}

impl PropertyMonth {
    pub fn equity(&self) -> Money {
        self.property_value - self.remaining_balance
    }
}

/// Build month `month` (one-based). Appreciation compounds by elapsed
/// months along `appreciation`, so value grows smoothly within a year;
/// property tax and maintenance follow the current value. Once the
/// schedule is exhausted the mortgage lines are all zero.
pub(crate) fn property_month(
    params: &SimulationParameters,
    schedule: &[AmortizationEntry],
    appreciation: &mut GrowthPath,
    month: u32,
) -> PropertyMonth {
    let property_value = params.purchase_price * appreciation.smooth(month);

    let (mortgage_payment, principal_payment, interest_payment, remaining_balance) =
        match schedule.get((month - 1) as usize) {
            Some(entry) => (entry.payment, entry.principal, entry.interest, entry.balance),
            None => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        };

    PropertyMonth {
        month,
        year: year_index(month) + 1,
        property_value,
        mortgage_payment,
        principal_payment,
        interest_payment,
        remaining_balance,
        property_tax: property_value * params.property_tax_rate / Decimal::from(12),
        maintenance: property_value * params.maintenance_rate / Decimal::from(12),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mortgage::amortization_schedule;
    use crate::params::fixtures::thirty_year_purchase;
    use rust_decimal_macros::dec;

    fn inputs(month: u32) -> NetProceedsInputs {
        NetProceedsInputs {
            month,
            property_value: dec!(600000),
            remaining_balance: dec!(350000),
            selling_cost_pct: dec!(0.06),
            closing_costs: dec!(15000),
            down_payment: dec!(100000),
            cumulative_operating_income: dec!(20000),
            side_portfolio: dec!(5000),
        }
    }

    #[test]
    fn test_policies_give_different_values() {
        let i = inputs(24);
        assert_eq!(NetProceedsPolicy::Liquidation.evaluate(&i), dec!(214000));
        assert_eq!(NetProceedsPolicy::Equity.evaluate(&i), dec!(250000));
        assert_eq!(NetProceedsPolicy::WealthAccounting.evaluate(&i), dec!(260000));
    }

    #[test]
    fn test_wealth_accounting_month_one_is_down_payment() {
        assert_eq!(
            NetProceedsPolicy::WealthAccounting.evaluate(&inputs(1)),
            dec!(100000)
        );
    }

    #[test]
    fn test_property_month_first_and_trailing() {
        let mut params = thirty_year_purchase();
        params.mortgage_years = 1;
        let schedule = amortization_schedule(params.loan_amount(), params.mortgage_rate, 1).unwrap();

        let mut appreciation = GrowthPath::new(params.appreciation_rate);

        let first = property_month(&params, &schedule, &mut appreciation, 1);
        assert_eq!(first.property_value, dec!(500000));
        assert_eq!(first.property_tax, dec!(500));
        assert_eq!(first.year, 1);
        assert!(first.mortgage_payment > Decimal::ZERO);

        let trailing = property_month(&params, &schedule, &mut appreciation, 13);
        assert_eq!(trailing.year, 2);
        assert_eq!(trailing.mortgage_payment, Decimal::ZERO);
        assert_eq!(trailing.remaining_balance, Decimal::ZERO);
        assert_eq!(trailing.property_value, dec!(515000));
        assert_eq!(trailing.equity(), dec!(515000));
    }
}
