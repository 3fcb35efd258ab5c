use pretty_assertions::assert_eq;
use rent_vs_own_core::mortgage::{
    amortization_schedule, amortize, monthly_payment, remaining_balance, AmortizationInput,
};
use rent_vs_own_core::ownership::live_in::simulate_live_in;
use rent_vs_own_core::ownership::rental::simulate_rental;
use rent_vs_own_core::params::SimulationParameters;
use rent_vs_own_core::tax::{
    capital_gains_tax, LONG_TERM_CAPITAL_GAINS_RATE, SHORT_TERM_CAPITAL_GAINS_RATE,
};
use rent_vs_own_core::RentVsOwnError;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

fn purchase() -> SimulationParameters {
    SimulationParameters {
        purchase_price: dec!(500000),
        down_payment_pct: dec!(0.20),
        closing_costs_pct: dec!(0.03),
        mortgage_rate: dec!(0.065),
        mortgage_years: 30,
        property_tax_rate: dec!(0.012),
        hoa_monthly: dec!(200),
        insurance_monthly: dec!(150),
        maintenance_rate: dec!(0.01),
        appreciation_rate: dec!(0.03),
        selling_cost_pct: dec!(0.06),
        tax_bracket: dec!(0.25),
        years: 30,
        monthly_rent: dec!(2500),
        vacancy_rate: dec!(0.083),
        rent_increase_rate: dec!(0.03),
        stock_return_rate: dec!(0.10),
        dividend_yield: dec!(0.02),
        dividend_tax_rate: dec!(0.15),
        is_married: false,
    }
}

// ===========================================================================
// Amortization
// ===========================================================================

#[test]
fn test_schedule_rows_reconcile() {
    for (principal, rate, years) in [
        (dec!(400000), dec!(0.065), 30),
        (dec!(250000), dec!(0.0399), 15),
        (dec!(90000), dec!(0.12), 5),
    ] {
        let schedule = amortization_schedule(principal, rate, years).unwrap();
        assert_eq!(schedule.len(), (years * 12) as usize);

        for entry in &schedule {
            let drift = (entry.principal + entry.interest - entry.payment).abs();
            assert!(drift < dec!(0.0000001), "month {} drift {drift}", entry.month);
            assert!(entry.balance >= Decimal::ZERO);
        }

        let last = schedule.last().unwrap();
        assert!(last.balance < dec!(0.01), "final balance {}", last.balance);

        let repaid: Decimal = schedule.iter().map(|e| e.principal).sum();
        assert!((repaid - principal).abs() < dec!(0.01));
    }
}

#[test]
fn test_zero_rate_is_straight_line() {
    let payment = monthly_payment(dec!(120000), Decimal::ZERO, 10).unwrap();
    assert_eq!(payment, dec!(1000));

    let schedule = amortization_schedule(dec!(120000), Decimal::ZERO, 10).unwrap();
    assert!(schedule.iter().all(|e| e.interest.is_zero()));
    assert_eq!(schedule[59].balance, dec!(60000));
    assert_eq!(schedule.last().unwrap().balance, Decimal::ZERO);
}

#[test]
fn test_zero_rate_zero_term_is_division_by_zero() {
    let err = monthly_payment(dec!(1000), Decimal::ZERO, 0).unwrap_err();
    assert!(matches!(err, RentVsOwnError::DivisionByZero { .. }));
    assert!(amortization_schedule(dec!(1000), Decimal::ZERO, 0)
        .unwrap()
        .is_empty());
}

#[test]
fn test_remaining_balance_endpoints() {
    assert_eq!(
        remaining_balance(dec!(400000), dec!(0.065), 30, 0).unwrap(),
        dec!(400000)
    );
    assert_eq!(
        remaining_balance(dec!(400000), dec!(0.065), 30, 360).unwrap(),
        Decimal::ZERO
    );
    let mid = remaining_balance(dec!(400000), dec!(0.065), 30, 180).unwrap();
    assert!(mid > dec!(250000) && mid < dec!(300000), "got {mid}");
}

#[test]
fn test_amortize_envelope() {
    let out = amortize(&AmortizationInput {
        principal: dec!(400000),
        annual_rate: dec!(0.065),
        years: 30,
    })
    .unwrap();
    let r = &out.result;
    assert!((r.monthly_payment - dec!(2528.27)).abs() < dec!(0.01));
    assert_eq!(r.schedule.len(), 360);
    assert!((r.total_payments - r.total_interest - r.total_principal).abs() < dec!(0.000001));
    assert!(out.warnings.is_empty());
}

// ===========================================================================
// Tax rules
// ===========================================================================

#[test]
fn test_capital_gains_holding_period_boundary() {
    let at_one_year = capital_gains_tax(
        dec!(100000),
        dec!(1.0),
        SHORT_TERM_CAPITAL_GAINS_RATE,
        LONG_TERM_CAPITAL_GAINS_RATE,
    );
    let just_under = capital_gains_tax(
        dec!(100000),
        dec!(0.999),
        SHORT_TERM_CAPITAL_GAINS_RATE,
        LONG_TERM_CAPITAL_GAINS_RATE,
    );
    assert_eq!(at_one_year, dec!(15000));
    assert_eq!(just_under, dec!(25000));
}

// ===========================================================================
// Thirty-year purchase
// ===========================================================================

#[test]
fn test_thirty_year_live_in() {
    let out = simulate_live_in(&purchase()).unwrap();
    let result = &out.result;

    assert_eq!(result.summary.initial_payment, dec!(115000));
    assert_eq!(result.monthly.len(), 360);

    let m1 = &result.monthly[0];
    assert!(m1.unrecoverable > dec!(15000));
    assert_eq!(
        m1.unrecoverable - dec!(15000),
        m1.interest_payment + m1.property_tax + m1.hoa + m1.insurance + m1.maintenance
    );

    let expected = dec!(500000) * dec!(1.03).powd(dec!(359) / dec!(12));
    let diff = (result.summary.final_property_value - expected).abs();
    assert!(diff < dec!(1), "final value off by {diff}");
}

#[test]
fn test_cumulative_columns_never_drift() {
    let out = simulate_rental(&purchase()).unwrap();
    let mut running = Decimal::ZERO;
    for m in &out.result.monthly {
        running += m.true_cost;
        assert_eq!(m.cumulative_true_cost, running);
    }
}

#[test]
fn test_degenerate_horizon() {
    let mut params = purchase();
    params.years = 0;
    params.mortgage_years = 0;
    params.down_payment_pct = Decimal::ONE;
    params.closing_costs_pct = Decimal::ZERO;

    let out = simulate_live_in(&params).unwrap();
    assert!(out.result.monthly.is_empty());
    assert!(out.result.monthly_expenses.is_empty());
    assert_eq!(out.result.summary.total_unrecoverable_costs, Decimal::ZERO);
    assert_eq!(out.result.summary.total_tax_benefits, Decimal::ZERO);
    assert_eq!(out.result.summary.final_net_proceeds, Decimal::ZERO);
}

#[test]
fn test_invalid_fraction_names_field() {
    let mut params = purchase();
    params.vacancy_rate = dec!(-0.1);
    match simulate_rental(&params).unwrap_err() {
        RentVsOwnError::InvalidInput { field, .. } => assert_eq!(field, "vacancy_rate"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_runs_are_deterministic() {
    let a = serde_json::to_value(simulate_live_in(&purchase()).unwrap().result).unwrap();
    let b = serde_json::to_value(simulate_live_in(&purchase()).unwrap().result).unwrap();
    assert_eq!(a, b);
}
