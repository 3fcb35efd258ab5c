#![cfg(all(feature = "cashflow", feature = "sensitivity"))]

use rent_vs_own_core::cashflow::flip::{simulate_flip, FlipInput};
use rent_vs_own_core::cashflow::long_term::{simulate_long_term_rental, LongTermRentalInput};
use rent_vs_own_core::comparison::Pipeline;
use rent_vs_own_core::params::SimulationParameters;
use rent_vs_own_core::sensitivity::{run_sensitivity, SensitivityInput};
use rent_vs_own_core::SensitivityVariable;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn property() -> SimulationParameters {
    SimulationParameters {
        purchase_price: dec!(400000),
        down_payment_pct: dec!(0.25),
        closing_costs_pct: dec!(0.03),
        mortgage_rate: dec!(0.07),
        mortgage_years: 30,
        property_tax_rate: dec!(0.011),
        hoa_monthly: Decimal::ZERO,
        insurance_monthly: dec!(120),
        maintenance_rate: dec!(0.01),
        appreciation_rate: dec!(0.03),
        selling_cost_pct: dec!(0.06),
        tax_bracket: dec!(0.24),
        years: 10,
        monthly_rent: dec!(2800),
        vacancy_rate: dec!(0.05),
        rent_increase_rate: dec!(0.03),
        stock_return_rate: dec!(0.10),
        dividend_yield: dec!(0.02),
        dividend_tax_rate: dec!(0.15),
        is_married: false,
    }
}

// ===========================================================================
// Cash-flow models
// ===========================================================================

#[test]
fn test_long_term_rental_cumulative_cashflow() {
    let out = simulate_long_term_rental(&LongTermRentalInput {
        property: property(),
        occupancy_rate: dec!(0.95),
        management_fee_pct: dec!(0.08),
    })
    .unwrap();
    let monthly = &out.result.monthly;
    assert_eq!(monthly.len(), 120);

    let total: Decimal = monthly.iter().map(|m| m.post_tax_cashflow).sum();
    assert_eq!(out.result.summary.total_cashflow, total);
    assert_eq!(monthly.last().unwrap().cumulative_cashflow, total);
}

#[test]
fn test_flip_accepts_arv_alias() {
    let json = r#"{
        "purchase_price": "200000",
        "renovation_cost": "30000",
        "renovation_months": 4,
        "arv": "290000",
        "holding_costs_monthly": "1500",
        "tax_bracket": "0.22"
    }"#;
    let input: FlipInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.after_repair_value, dec!(290000));
    assert_eq!(input.down_payment_pct, dec!(0.20));

    let out = simulate_flip(&input).unwrap();
    // 290000 - 200000 - 30000 - 17400 - 7500
    assert_eq!(out.result.summary.gross_profit, dec!(35100));
    assert_eq!(out.result.monthly.len(), 5);
}

// ===========================================================================
// Sensitivity
// ===========================================================================

#[test]
fn test_sensitivity_over_rent_and_return() {
    let out = run_sensitivity(&SensitivityInput {
        base: property(),
        pipeline: Pipeline::BuyAndRent,
        variable_1: SensitivityVariable {
            name: "monthly_rent".into(),
            min: dec!(2400),
            max: dec!(3200),
            step: dec!(400),
        },
        variable_2: SensitivityVariable {
            name: "stock_return_rate".into(),
            min: dec!(0.06),
            max: dec!(0.10),
            step: dec!(0.02),
        },
    })
    .unwrap();

    let r = &out.result;
    assert_eq!(r.matrix.len(), 3);
    assert_eq!(r.base_case_position, (1, 2));
    assert_eq!(r.matrix[1][2], r.base_case_value);

    // A better stock market always narrows the landlord's lead
    for row in &r.matrix {
        assert!(row[0] > row[2], "{row:?}");
    }
}
