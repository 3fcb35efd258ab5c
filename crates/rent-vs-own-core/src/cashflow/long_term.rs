use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{run_cash_flow, CashFlowResult, MonthIncome};
use crate::error::RentVsOwnError;
use crate::params::{check_fraction, SimulationParameters};
use crate::time_value::GrowthPath;
use crate::types::{with_metadata, ComputationOutput, Rate};
use crate::RentVsOwnResult;

/// A long-term rental: `monthly_rent` and `rent_increase_rate` come from
/// the property parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongTermRentalInput {
    #[serde(flatten)]
    pub property: SimulationParameters,
    /// Fraction of the month the unit is let
    pub occupancy_rate: Rate,
    /// Property manager's cut of collected rent
    pub management_fee_pct: Rate,
}

pub fn simulate_long_term_rental(
    input: &LongTermRentalInput,
) -> RentVsOwnResult<ComputationOutput<CashFlowResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    check_fraction("occupancy_rate", input.occupancy_rate)?;
    check_fraction("management_fee_pct", input.management_fee_pct)?;
    if input.property.monthly_rent <= Decimal::ZERO {
        return Err(RentVsOwnError::InvalidInput {
            field: "monthly_rent".into(),
            reason: "A rental needs a positive monthly rent".into(),
        });
    }

    let property = &input.property;
    let mut rent_growth = GrowthPath::new(property.rent_increase_rate);
    let result = run_cash_flow(property, &mut warnings, |month| {
        let gross_rent = property.monthly_rent * rent_growth.annual(month);
        let effective_rent = gross_rent * input.occupancy_rate;
        let management_fee = effective_rent * input.management_fee_pct;
        MonthIncome {
            gross_income: effective_rent,
            fees: management_fee,
            net_income: effective_rent - management_fee,
            ..Default::default()
        }
    })?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Long-term rental: occupancy-adjusted rent, passive income tax with depreciation, recapture on sale",
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
    use rust_decimal_macros::dec;

    fn input() -> LongTermRentalInput {
        let mut property = thirty_year_purchase();
        property.hoa_monthly = Decimal::ZERO;
        property.monthly_rent = dec!(3200);
        property.years = 10;
        LongTermRentalInput {
            property,
            occupancy_rate: dec!(0.95),
            management_fee_pct: dec!(0.08),
        }
    }

    #[test]
    fn test_rent_grows_yearly_and_fee_comes_off() {
        let out = simulate_long_term_rental(&input()).unwrap();
        let m1 = &out.result.monthly[0];
        assert_eq!(m1.gross_income, dec!(3040));
        assert_eq!(m1.fees, dec!(243.2));
        assert_eq!(m1.net_income, dec!(2796.8));

        let m13 = &out.result.monthly[12];
        assert_eq!(m13.gross_income, dec!(3131.2));
        assert!(!out.warnings.iter().any(|w| w.contains("HOA")));
    }

    #[test]
    fn test_summary_returns() {
        let out = simulate_long_term_rental(&input()).unwrap();
        let s = &out.result.summary;
        assert_eq!(s.initial_investment, dec!(115000));
        assert_eq!(s.roi, (s.total_return - dec!(115000)) / dec!(115000) * dec!(100));
        assert!(s.final_property_value > dec!(500000));
    }

    #[test]
    fn test_invalid_occupancy_rejected() {
        let mut bad = input();
        bad.occupancy_rate = dec!(1.2);
        assert!(simulate_long_term_rental(&bad).is_err());
    }

    #[test]
    fn test_input_from_json() {
        let json = r#"{
            "purchase_price": "400000",
            "down_payment_pct": "0.25",
            "closing_costs_pct": "0.03",
            "mortgage_rate": "0.07",
            "mortgage_years": 30,
            "property_tax_rate": "0.011",
            "insurance_monthly": "120",
            "maintenance_rate": "0.01",
            "appreciation_rate": "0.03",
            "tax_bracket": "0.24",
            "years": 5,
            "monthly_rent": "2800",
            "rent_increase_rate": "0.03",
            "occupancy_rate": "0.95",
            "management_fee_pct": "0.08"
        }"#;
        let input: LongTermRentalInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.property.monthly_rent, dec!(2800));
        let out = simulate_long_term_rental(&input).unwrap();
        assert_eq!(out.result.monthly.len(), 60);
    }
}
