use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{run_cash_flow, CashFlowResult, MonthIncome};
use crate::error::RentVsOwnError;
use crate::params::{check_amount, check_fraction, SimulationParameters};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::RentVsOwnResult;

/// Nights in a modelled month.
const NIGHTS_PER_MONTH: Decimal = dec!(30);

/// Share of the guest cleaning fee paid out to cleaners.
const CLEANING_COST_SHARE: Rate = dec!(0.5);

fn default_avg_stay_length() -> Decimal {
    dec!(3)
}

/// A short-term (nightly) rental. `monthly_rent` on the property is
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortTermRentalInput {
    #[serde(flatten)]
    pub property: SimulationParameters,
    pub nightly_rate: Money,
    /// Fraction of nights booked
    pub occupancy_rate: Rate,
    pub cleaning_fee_per_stay: Money,
    /// Average booking length in nights
    #[serde(default = "default_avg_stay_length")]
    pub avg_stay_length: Decimal,
    /// Booking platform's cut of gross revenue
    pub platform_fee_pct: Rate,
    #[serde(default)]
    pub utilities_monthly: Money,
}

pub fn simulate_short_term_rental(
    input: &ShortTermRentalInput,
) -> RentVsOwnResult<ComputationOutput<CashFlowResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    check_fraction("occupancy_rate", input.occupancy_rate)?;
    check_fraction("platform_fee_pct", input.platform_fee_pct)?;
    check_amount("nightly_rate", input.nightly_rate)?;
    check_amount("cleaning_fee_per_stay", input.cleaning_fee_per_stay)?;
    check_amount("utilities_monthly", input.utilities_monthly)?;
    if input.avg_stay_length <= Decimal::ZERO {
        return Err(RentVsOwnError::InvalidInput {
            field: "avg_stay_length".into(),
            reason: "Average stay must be at least part of a night".into(),
        });
    }

    let nights_booked = NIGHTS_PER_MONTH * input.occupancy_rate;
    let bookings = nights_booked / input.avg_stay_length;
    let room_revenue = input.nightly_rate * nights_booked;
    let cleaning_revenue = input.cleaning_fee_per_stay * bookings;
    let gross = room_revenue + cleaning_revenue;
    let platform_fee = gross * input.platform_fee_pct;

    let income = MonthIncome {
        gross_income: gross,
        fees: platform_fee,
        net_income: gross - platform_fee,
        utilities: input.utilities_monthly,
        cleaning_costs: cleaning_revenue * CLEANING_COST_SHARE,
    };

    let result = run_cash_flow(&input.property, &mut warnings, |_| income)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Short-term rental: nightly bookings net of platform fee, cleaning and utilities",
        input,
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::fixtures::thirty_year_purchase;

    fn input() -> ShortTermRentalInput {
        let mut property = thirty_year_purchase();
        property.hoa_monthly = Decimal::ZERO;
        property.years = 5;
        ShortTermRentalInput {
            property,
            nightly_rate: dec!(200),
            occupancy_rate: dec!(0.7),
            cleaning_fee_per_stay: dec!(90),
            avg_stay_length: dec!(3),
            platform_fee_pct: dec!(0.03),
            utilities_monthly: dec!(250),
        }
    }

    #[test]
    fn test_booking_revenue() {
        let out = simulate_short_term_rental(&input()).unwrap();
        let m = &out.result.monthly[0];
        // 21 nights, 7 stays: 4200 room + 630 cleaning
        assert_eq!(m.gross_income, dec!(4830));
        assert_eq!(m.fees, dec!(144.9));
        assert_eq!(m.net_income, dec!(4685.1));
        assert_eq!(m.cleaning_costs, dec!(315));
        assert_eq!(m.utilities, dec!(250));
    }

    #[test]
    fn test_revenue_is_flat_across_months() {
        let out = simulate_short_term_rental(&input()).unwrap();
        let first = out.result.monthly[0].net_income;
        assert!(out.result.monthly.iter().all(|m| m.net_income == first));
        assert_eq!(
            out.result.summary.total_income,
            first * Decimal::from(60)
        );
    }

    #[test]
    fn test_zero_stay_length_rejected() {
        let mut bad = input();
        bad.avg_stay_length = Decimal::ZERO;
        assert!(simulate_short_term_rental(&bad).is_err());
    }
}
