//! Fixed-rate, fully amortising mortgage maths.
//!
//! The schedule produced here drives every ownership simulation: month `k`
//! of a simulation reads entry `k - 1`, and months past the end of the
//! schedule carry no mortgage payment at all.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RentVsOwnError;
use crate::params::{check_amount, check_years};
use crate::time_value::checked_compound;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::RentVsOwnResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One month of an amortisation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// One-based month number
    pub month: u32,
    /// Level payment (identical for every entry)
    pub payment: Money,
    /// Portion of the payment that reduces the balance
    pub principal: Money,
    /// Portion of the payment that is interest on the opening balance
    pub interest: Money,
    /// Closing balance, clamped at zero
    pub balance: Money,
}

/// Input for a standalone amortisation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    /// Amount borrowed
    pub principal: Money,
    /// Annual nominal rate (e.g. 0.065 = 6.5%)
    pub annual_rate: Rate,
    /// Term in whole years
    pub years: u32,
}

/// Output of a standalone amortisation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub monthly_payment: Money,
    pub total_payments: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub schedule: Vec<AmortizationEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Standard fixed-rate mortgage payment: P * r(1+r)^n / ((1+r)^n - 1).
///
/// A zero rate falls back to straight-line repayment, `P / (years * 12)`.
pub fn monthly_payment(principal: Money, annual_rate: Rate, years: u32) -> RentVsOwnResult<Money> {
    let total_months = years * 12;

    if annual_rate.is_zero() {
        if total_months == 0 {
            return Err(RentVsOwnError::DivisionByZero {
                context: "monthly payment with zero rate and zero term".into(),
            });
        }
        return Ok(principal / Decimal::from(total_months));
    }

    let monthly_rate = annual_rate / dec!(12);
    let growth = checked_compound(monthly_rate, total_months).ok_or_else(|| {
        RentVsOwnError::InvalidInput {
            field: "mortgage_rate".into(),
            reason: format!("Payment overflows over a {years}-year term at {annual_rate}"),
        }
    })?;
    let denominator = growth - Decimal::ONE;

    if denominator.is_zero() {
        return Err(RentVsOwnError::DivisionByZero {
            context: "mortgage payment denominator".into(),
        });
    }

    Ok(principal * monthly_rate * growth / denominator)
}

/// Full month-by-month schedule of length `years * 12`.
///
/// A zero-year term yields an empty schedule.
pub fn amortization_schedule(
    principal: Money,
    annual_rate: Rate,
    years: u32,
) -> RentVsOwnResult<Vec<AmortizationEntry>> {
    let total_months = years * 12;
    if total_months == 0 {
        return Ok(Vec::new());
    }

    let payment = monthly_payment(principal, annual_rate, years)?;
    let monthly_rate = annual_rate / dec!(12);

    let mut schedule = Vec::with_capacity(total_months as usize);
    let mut balance = principal;

    for month in 1..=total_months {
        let interest = balance * monthly_rate;
        let principal_payment = payment - interest;
        balance -= principal_payment;
        balance = balance.max(Decimal::ZERO);

        schedule.push(AmortizationEntry {
            month,
            payment,
            principal: principal_payment,
            interest,
            balance,
        });
    }

    Ok(schedule)
}

/// Outstanding balance after `months_paid` payments.
pub fn remaining_balance(
    principal: Money,
    annual_rate: Rate,
    years: u32,
    months_paid: u32,
) -> RentVsOwnResult<Money> {
    if months_paid >= years * 12 {
        return Ok(Decimal::ZERO);
    }
    if months_paid == 0 {
        return Ok(principal);
    }

    let schedule = amortization_schedule(principal, annual_rate, years)?;
    Ok(schedule[(months_paid - 1) as usize].balance)
}

/// Total interest paid over the life of the loan.
pub fn total_interest(principal: Money, annual_rate: Rate, years: u32) -> RentVsOwnResult<Money> {
    let schedule = amortization_schedule(principal, annual_rate, years)?;
    Ok(schedule.iter().map(|e| e.interest).sum())
}

/// Amortise a loan and report payment, totals and the full schedule.
pub fn amortize(
    input: &AmortizationInput,
) -> RentVsOwnResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    check_amount("principal", input.principal)?;
    check_years("years", input.years)?;
    if input.annual_rate < Decimal::ZERO || input.annual_rate > Decimal::ONE {
        return Err(RentVsOwnError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Annual rate must be between 0 and 1".into(),
        });
    }
    if input.years == 0 {
        warnings.push("Zero-year term: schedule is empty".into());
    }

    let schedule = amortization_schedule(input.principal, input.annual_rate, input.years)?;
    let payment = schedule.first().map(|e| e.payment).unwrap_or(Decimal::ZERO);
    let total_interest: Money = schedule.iter().map(|e| e.interest).sum();
    let total_principal: Money = schedule.iter().map(|e| e.principal).sum();
    let total_payments = payment * Decimal::from(schedule.len() as u64);

    let output = AmortizationOutput {
        monthly_payment: payment,
        total_payments,
        total_interest,
        total_principal,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Mortgage Amortisation",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
