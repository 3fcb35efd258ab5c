use serde::{Deserialize, Serialize};

use crate::error::RentVsOwnError;
use crate::params::{MAX_AMOUNT, MAX_GROWTH_FACTOR};
use crate::types::Money;
use crate::RentVsOwnResult;

/// Where each month's portfolio contribution comes from.
///
/// The series variants carry an ownership run's `monthly_expenses`, one
/// entry per simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContributionSchedule {
    /// Contribute the expense less this month's rent, so that rent plus
    /// contribution equals the owner's outlay
    LessRent(Vec<Money>),
    /// Contribute the expense as-is
    Direct(Vec<Money>),
    /// Contribute the same amount every month
    Fixed(Money),
}

impl ContributionSchedule {
    /// Series must cover the horizon exactly, and no single contribution
    /// may exceed what a fully grown maximum-size scenario could spend.
    pub fn validate(&self, months: u32) -> RentVsOwnResult<()> {
        let limit = MAX_AMOUNT * MAX_GROWTH_FACTOR;
        let series = match self {
            ContributionSchedule::LessRent(s) | ContributionSchedule::Direct(s) => s,
            ContributionSchedule::Fixed(amount) => std::slice::from_ref(amount),
        };
        if let Some(value) = series.iter().find(|v| v.abs() > limit) {
            return Err(RentVsOwnError::InvalidInput {
                field: "contributions".into(),
                reason: format!("Contribution {value} is out of range"),
            });
        }
        if matches!(self, ContributionSchedule::Fixed(_)) {
            return Ok(());
        }

        if series.len() != months as usize {
            return Err(RentVsOwnError::InvalidInput {
                field: "contributions".into(),
                reason: format!(
                    "Expense series has {} entries but the horizon is {} months",
                    series.len(),
                    months
                ),
            });
        }
        Ok(())
    }

    /// Contribution for the zero-based month `index` given that month's rent.
    pub fn contribution(&self, index: usize, rent: Money) -> Money {
        match self {
            ContributionSchedule::LessRent(s) => {
                s.get(index).copied().unwrap_or_default() - rent
            }
            ContributionSchedule::Direct(s) => s.get(index).copied().unwrap_or_default(),
            ContributionSchedule::Fixed(amount) => *amount,
        }
    }
}
