//! Simplified flat-bracket US tax primitives.
//!
//! These are deliberately small and stateless. Each simulation composes
//! the subset it needs inline; there is no shared tax engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate, Years};

/// Ordinary-income rate applied to gains held under a year.
pub const SHORT_TERM_CAPITAL_GAINS_RATE: Rate = dec!(0.25);
/// Preferential rate applied to gains held a year or longer.
pub const LONG_TERM_CAPITAL_GAINS_RATE: Rate = dec!(0.15);
/// Section 121 exclusion, single filer.
pub const RESIDENCE_EXCLUSION_SINGLE: Money = dec!(250000);
/// Section 121 exclusion, married filing jointly.
pub const RESIDENCE_EXCLUSION_MARRIED: Money = dec!(500000);
/// Share of a property's value attributed to non-depreciable land.
pub const DEFAULT_LAND_RATIO: Rate = dec!(0.2);
/// Straight-line recovery period for residential rental property.
pub const RESIDENTIAL_USEFUL_LIFE_YEARS: Years = dec!(27.5);
/// State and local tax deduction cap.
pub const SALT_CAP: Money = dec!(10000);
/// Single-filer standard deduction used to test itemising.
pub const STANDARD_DEDUCTION: Money = dec!(13850);
/// Rate applied to qualified dividends.
pub const QUALIFIED_DIVIDEND_RATE: Rate = dec!(0.15);
/// Rate applied to recaptured depreciation on sale.
pub const DEPRECIATION_RECAPTURE_RATE: Rate = dec!(0.25);

pub fn income_tax(income: Money, tax_rate: Rate) -> Money {
    income * tax_rate
}

/// Tax on a realised gain. Under one year is short-term; exactly one year
/// already qualifies as long-term. Losses and zero gains owe nothing.
pub fn capital_gains_tax(
    gain: Money,
    holding_years: Years,
    short_term_rate: Rate,
    long_term_rate: Rate,
) -> Money {
    if gain <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    if holding_years < Decimal::ONE {
        gain * short_term_rate
    } else {
        gain * long_term_rate
    }
}

/// Portion of a primary-residence gain excluded from tax.
///
/// Requires at least two years of ownership.
pub fn primary_residence_exclusion(gain: Money, holding_years: Years, married: bool) -> Money {
    if holding_years < dec!(2) {
        return Decimal::ZERO;
    }

    let exclusion = if married {
        RESIDENCE_EXCLUSION_MARRIED
    } else {
        RESIDENCE_EXCLUSION_SINGLE
    };
    gain.min(exclusion)
}

/// Annual straight-line depreciation on the structure (land excluded).
pub fn rental_depreciation(property_value: Money, land_ratio: Rate, useful_life: Years) -> Money {
    if useful_life <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    property_value * (Decimal::ONE - land_ratio) / useful_life
}

/// Tax value of a property-tax deduction after the SALT cap.
pub fn salt_capped_deduction(property_tax: Money, rate: Rate, cap: Money) -> Money {
    property_tax.min(cap) * rate
}

/// Tax value of the mortgage-interest deduction. Worth nothing unless the
/// interest alone beats the standard deduction.
pub fn mortgage_interest_deduction(
    interest_paid: Money,
    tax_rate: Rate,
    standard_deduction: Money,
) -> Money {
    if interest_paid > standard_deduction {
        interest_paid * tax_rate
    } else {
        Decimal::ZERO
    }
}

/// Tax on passive rental income net of expenses and depreciation.
/// Passive losses are not carried; they simply owe nothing.
pub fn passive_income_tax(
    rental_income: Money,
    expenses: Money,
    depreciation: Money,
    tax_rate: Rate,
) -> Money {
    let taxable = rental_income - expenses - depreciation;
    if taxable > Decimal::ZERO {
        taxable * tax_rate
    } else {
        Decimal::ZERO
    }
}

/// Tax on dividends, all treated as qualified.
pub fn dividend_tax(dividend_income: Money, qualified_rate: Rate) -> Money {
    dividend_income * qualified_rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capital_gains_tie_break_at_one_year() {
        let long = capital_gains_tax(
            dec!(100000),
            dec!(1.0),
            SHORT_TERM_CAPITAL_GAINS_RATE,
            LONG_TERM_CAPITAL_GAINS_RATE,
        );
        assert_eq!(long, dec!(15000));

        let short = capital_gains_tax(
            dec!(100000),
            dec!(0.999),
            SHORT_TERM_CAPITAL_GAINS_RATE,
            LONG_TERM_CAPITAL_GAINS_RATE,
        );
        assert_eq!(short, dec!(25000));
    }

    #[test]
    fn test_capital_gains_loss_owes_nothing() {
        assert_eq!(
            capital_gains_tax(dec!(-5000), dec!(3), dec!(0.25), dec!(0.15)),
            Decimal::ZERO
        );
        assert_eq!(
            capital_gains_tax(Decimal::ZERO, dec!(3), dec!(0.25), dec!(0.15)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_primary_residence_exclusion() {
        assert_eq!(
            primary_residence_exclusion(dec!(300000), dec!(1.5), false),
            Decimal::ZERO
        );
        assert_eq!(
            primary_residence_exclusion(dec!(300000), dec!(2), false),
            dec!(250000)
        );
        assert_eq!(
            primary_residence_exclusion(dec!(300000), dec!(5), true),
            dec!(300000)
        );
        assert_eq!(
            primary_residence_exclusion(dec!(700000), dec!(5), true),
            dec!(500000)
        );
    }

    #[test]
    fn test_rental_depreciation_defaults() {
        // 275k * 0.8 / 27.5 = 8000
        let annual = rental_depreciation(
            dec!(275000),
            DEFAULT_LAND_RATIO,
            RESIDENTIAL_USEFUL_LIFE_YEARS,
        );
        assert_eq!(annual, dec!(8000));
    }

    #[test]
    fn test_salt_cap_applies() {
        assert_eq!(salt_capped_deduction(dec!(8000), dec!(0.25), SALT_CAP), dec!(2000));
        assert_eq!(salt_capped_deduction(dec!(15000), dec!(0.25), SALT_CAP), dec!(2500));
    }

    #[test]
    fn test_mortgage_interest_deduction_threshold() {
        assert_eq!(
            mortgage_interest_deduction(dec!(10000), dec!(0.24), STANDARD_DEDUCTION),
            Decimal::ZERO
        );
        assert_eq!(
            mortgage_interest_deduction(dec!(20000), dec!(0.24), STANDARD_DEDUCTION),
            dec!(4800)
        );
    }

    #[test]
    fn test_passive_income_tax_floors_at_zero() {
        assert_eq!(
            passive_income_tax(dec!(2000), dec!(1500), dec!(100), dec!(0.25)),
            dec!(100)
        );
        assert_eq!(
            passive_income_tax(dec!(2000), dec!(2500), dec!(100), dec!(0.25)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_dividend_and_income_tax() {
        assert_eq!(dividend_tax(dec!(1000), QUALIFIED_DIVIDEND_RATE), dec!(150));
        assert_eq!(income_tax(dec!(1000), dec!(0.3)), dec!(300));
    }
}
