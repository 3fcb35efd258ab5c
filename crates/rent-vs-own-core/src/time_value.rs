use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::RentVsOwnError;
use crate::types::{Money, Rate};
use crate::RentVsOwnResult;

const MONTHS_PER_YEAR: u32 = 12;

/// (1 + r)^n by iterative multiplication (avoids Decimal::powd drift).
///
/// `None` once the product no longer fits in a `Decimal`.
pub fn checked_compound(rate: Rate, n: u32) -> Option<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.checked_mul(factor)?;
    }
    Some(result)
}

/// One month of portfolio growth at `monthly_return` followed by the
/// contribution. Leaving the `Decimal` range is an input error on the
/// return rate.
pub fn grow_balance(
    value: Money,
    monthly_return: Rate,
    contribution: Money,
    month: u32,
) -> RentVsOwnResult<Money> {
    value
        .checked_mul(Decimal::ONE + monthly_return)
        .and_then(|v| v.checked_add(contribution))
        .ok_or_else(|| RentVsOwnError::InvalidInput {
            field: "stock_return_rate".into(),
            reason: format!("Portfolio value overflows in month {month}"),
        })
}

/// Annual growth followed month by month.
///
/// The whole-year factor steps once per simulated year and the intra-year
/// factors are computed up front, so walking a horizon costs one
/// multiplication per year rather than one compounding per month. Months
/// must be visited in non-decreasing order.
#[derive(Debug, Clone)]
pub struct GrowthPath {
    step: Decimal,
    years_elapsed: u32,
    year_factor: Decimal,
    /// (1 + r)^(k / 12) for k in 0..12
    intra_year: [Decimal; MONTHS_PER_YEAR as usize],
}

impl GrowthPath {
    pub fn new(rate: Rate) -> Self {
        let step = Decimal::ONE + rate;
        let mut intra_year = [Decimal::ONE; MONTHS_PER_YEAR as usize];
        for (k, slot) in intra_year.iter_mut().enumerate().skip(1) {
            let exponent = Decimal::from(k as u32) / Decimal::from(MONTHS_PER_YEAR);
            *slot = step.powd(exponent);
        }
        GrowthPath {
            step,
            years_elapsed: 0,
            year_factor: Decimal::ONE,
            intra_year,
        }
    }

    fn advance_to(&mut self, year: u32) -> Decimal {
        if year < self.years_elapsed {
            self.years_elapsed = 0;
            self.year_factor = Decimal::ONE;
        }
        while self.years_elapsed < year {
            self.year_factor *= self.step;
            self.years_elapsed += 1;
        }
        self.year_factor
    }

    /// Factor stepped once a year: (1 + r)^floor((month - 1) / 12).
    pub fn annual(&mut self, month: u32) -> Decimal {
        self.advance_to(year_index(month))
    }

    /// Factor compounding smoothly by elapsed months:
    /// (1 + r)^((month - 1) / 12). Exact on year boundaries.
    pub fn smooth(&mut self, month: u32) -> Decimal {
        let elapsed = month.saturating_sub(1);
        let whole = self.advance_to(elapsed / MONTHS_PER_YEAR);
        let remainder = (elapsed % MONTHS_PER_YEAR) as usize;
        if remainder == 0 {
            whole
        } else {
            whole * self.intra_year[remainder]
        }
    }
}

/// Zero-based year index of a one-based month: floor((month - 1) / 12).
pub fn year_index(month: u32) -> u32 {
    month.saturating_sub(1) / MONTHS_PER_YEAR
}

/// True for the twelfth month of each simulated year.
pub fn is_year_end(month: u32) -> bool {
    month > 0 && month % MONTHS_PER_YEAR == 0
}
