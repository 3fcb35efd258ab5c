use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

/// Return on investment in percent: (final - invested) / invested * 100.
///
/// Zero when nothing was invested.
pub fn roi(final_value: Money, invested: Money) -> Rate {
    if invested <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (final_value - invested) / invested * dec!(100)
}

/// Compound annual growth in percent: ((final / invested)^(1/years) - 1) * 100.
///
/// Zero when nothing was invested or the horizon is empty. A non-positive
/// final value is a total loss and reports -100.
pub fn annualized_return(final_value: Money, invested: Money, years: u32) -> Rate {
    if invested <= Decimal::ZERO || years == 0 {
        return Decimal::ZERO;
    }

    let ratio = final_value / invested;
    if ratio <= Decimal::ZERO {
        return dec!(-100);
    }

    let exponent = Decimal::ONE / Decimal::from(years);
    match ratio.checked_powd(exponent) {
        Some(growth) => (growth - Decimal::ONE) * dec!(100),
        None => Decimal::ZERO,
    }
}
