use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RentVsOwnError;
use crate::time_value::checked_compound;
use crate::types::{Money, Rate};
use crate::RentVsOwnResult;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Longest horizon or mortgage term accepted, in years.
pub const MAX_YEARS: u32 = 100;

/// Largest price, rent or fee accepted.
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Largest cumulative growth a rate may reach over the horizon. Together
/// with `MAX_AMOUNT` this keeps every projected balance well inside the
/// `Decimal` range.
pub const MAX_GROWTH_FACTOR: Decimal = dec!(1000000000);

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_stock_return_rate() -> Rate {
    dec!(0.10)
}

fn default_dividend_yield() -> Rate {
    dec!(0.02)
}

fn default_dividend_tax_rate() -> Rate {
    dec!(0.15)
}

fn default_selling_cost_pct() -> Rate {
    dec!(0.06)
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Immutable input bundle for one scenario.
///
/// Property fields are always required. Strategy fields default to zero
/// (rent, vacancy, rent growth) or to conventional market assumptions
/// (stock return, dividend yield, dividend tax, selling costs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Purchase price of the property
    pub purchase_price: Money,
    /// Down payment as a fraction of price (e.g. 0.20)
    pub down_payment_pct: Rate,
    /// One-time closing costs as a fraction of price
    pub closing_costs_pct: Rate,
    /// Annual mortgage rate
    pub mortgage_rate: Rate,
    /// Mortgage term in years
    pub mortgage_years: u32,
    /// Annual property tax as a fraction of current value
    pub property_tax_rate: Rate,
    /// Monthly HOA dues
    #[serde(default)]
    pub hoa_monthly: Money,
    /// Monthly homeowner's insurance
    #[serde(default)]
    pub insurance_monthly: Money,
    /// Annual maintenance as a fraction of current value
    pub maintenance_rate: Rate,
    /// Annual property appreciation
    pub appreciation_rate: Rate,
    /// Selling costs as a fraction of sale price
    #[serde(default = "default_selling_cost_pct")]
    pub selling_cost_pct: Rate,
    /// Flat marginal tax bracket
    pub tax_bracket: Rate,
    /// Simulation horizon in years
    pub years: u32,

    /// Monthly rent (paid as a tenant, or received as a landlord)
    #[serde(default)]
    pub monthly_rent: Money,
    /// Fraction of potential rent lost to vacancy, applied every month
    #[serde(default)]
    pub vacancy_rate: Rate,
    /// Annual rent increase, stepped once per year
    #[serde(default)]
    pub rent_increase_rate: Rate,
    /// Annual stock portfolio return
    #[serde(default = "default_stock_return_rate")]
    pub stock_return_rate: Rate,
    /// Annual dividend yield
    #[serde(default = "default_dividend_yield")]
    pub dividend_yield: Rate,
    /// Qualified dividend tax rate
    #[serde(default = "default_dividend_tax_rate")]
    pub dividend_tax_rate: Rate,
    /// Married filing jointly (doubles the residence exclusion)
    #[serde(default)]
    pub is_married: bool,
}

impl SimulationParameters {
    pub fn down_payment(&self) -> Money {
        self.purchase_price * self.down_payment_pct
    }

    pub fn closing_costs(&self) -> Money {
        self.purchase_price * self.closing_costs_pct
    }

    pub fn loan_amount(&self) -> Money {
        self.purchase_price - self.down_payment()
    }

    /// Cash needed on the day of purchase: down payment plus closing costs.
    pub fn initial_investment(&self) -> Money {
        self.down_payment() + self.closing_costs()
    }

    pub fn months(&self) -> u32 {
        self.years * 12
    }

    /// Reject parameters no simulation can run on, naming the offending
    /// field. Legal but unusual values are reported through `warnings`.
    pub fn validate(&self, warnings: &mut Vec<String>) -> RentVsOwnResult<()> {
        if self.purchase_price <= Decimal::ZERO {
            return Err(RentVsOwnError::InvalidInput {
                field: "purchase_price".into(),
                reason: "Purchase price must be positive".into(),
            });
        }
        check_amount("purchase_price", self.purchase_price)?;
        check_years("years", self.years)?;
        check_years("mortgage_years", self.mortgage_years)?;

        check_fraction("down_payment_pct", self.down_payment_pct)?;
        check_fraction("closing_costs_pct", self.closing_costs_pct)?;
        check_fraction("mortgage_rate", self.mortgage_rate)?;
        check_fraction("property_tax_rate", self.property_tax_rate)?;
        check_fraction("maintenance_rate", self.maintenance_rate)?;
        check_fraction("selling_cost_pct", self.selling_cost_pct)?;
        check_fraction("tax_bracket", self.tax_bracket)?;
        check_fraction("vacancy_rate", self.vacancy_rate)?;
        check_fraction("dividend_yield", self.dividend_yield)?;
        check_fraction("dividend_tax_rate", self.dividend_tax_rate)?;

        check_growth("appreciation_rate", self.appreciation_rate)?;
        check_growth("rent_increase_rate", self.rent_increase_rate)?;
        check_growth("stock_return_rate", self.stock_return_rate)?;
        check_horizon_growth("appreciation_rate", self.appreciation_rate, self.years)?;
        check_horizon_growth("rent_increase_rate", self.rent_increase_rate, self.years)?;
        check_horizon_growth(
            "stock_return_rate",
            self.stock_return_rate / Decimal::from(12),
            self.months(),
        )?;

        check_amount("hoa_monthly", self.hoa_monthly)?;
        check_amount("insurance_monthly", self.insurance_monthly)?;
        check_amount("monthly_rent", self.monthly_rent)?;

        if self.down_payment_pct + self.closing_costs_pct > Decimal::ONE {
            return Err(RentVsOwnError::InvalidInput {
                field: "closing_costs_pct".into(),
                reason: "Down payment plus closing costs cannot exceed the purchase price".into(),
            });
        }

        if self.mortgage_years == 0 && self.down_payment_pct < Decimal::ONE {
            warnings.push(
                "Zero-year mortgage term: the loan has no schedule and carries no payments or balance"
                    .into(),
            );
        }
        if self.years == 0 {
            warnings.push("Zero-year horizon: monthly series are empty".into());
        }
        if self.mortgage_years > 0 && self.mortgage_years < self.years {
            warnings.push(format!(
                "Mortgage is paid off after {} years; the remaining {} years carry no mortgage payment",
                self.mortgage_years,
                self.years - self.mortgage_years
            ));
        }
        if self.vacancy_rate > dec!(0.15) {
            warnings.push(format!(
                "Vacancy rate {:.1}% exceeds 15%, above typical market norms",
                self.vacancy_rate * dec!(100)
            ));
        }

        Ok(())
    }
}

/// Standard parameters of the complementary investment side.
///
/// Usually derived from the ownership scenario so both sides start with
/// the same cash, but can be built directly for stand-alone runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentParameters {
    /// Opening portfolio value
    pub initial_investment: Money,
    /// Opening monthly rent paid by the investor
    #[serde(default)]
    pub monthly_rent: Money,
    /// Annual rent increase, stepped once per year
    #[serde(default)]
    pub rent_increase_rate: Rate,
    /// Annual portfolio return
    #[serde(default = "default_stock_return_rate")]
    pub stock_return_rate: Rate,
    /// Annual dividend yield
    #[serde(default = "default_dividend_yield")]
    pub dividend_yield: Rate,
    /// Bracket applied to the annual dividend tax event
    pub tax_bracket: Rate,
    /// Rate applied when dividends are taxed monthly
    #[serde(default = "default_dividend_tax_rate")]
    pub dividend_tax_rate: Rate,
    /// Simulation horizon in years
    pub years: u32,
}

impl InvestmentParameters {
    /// Investment side of a scenario, seeded with the ownership side's
    /// day-one cash outlay.
    pub fn from_simulation(params: &SimulationParameters) -> Self {
        InvestmentParameters {
            initial_investment: params.initial_investment(),
            monthly_rent: params.monthly_rent,
            rent_increase_rate: params.rent_increase_rate,
            stock_return_rate: params.stock_return_rate,
            dividend_yield: params.dividend_yield,
            tax_bracket: params.tax_bracket,
            dividend_tax_rate: params.dividend_tax_rate,
            years: params.years,
        }
    }

    pub fn months(&self) -> u32 {
        self.years * 12
    }

    pub fn validate(&self) -> RentVsOwnResult<()> {
        check_years("years", self.years)?;
        check_amount("initial_investment", self.initial_investment)?;
        check_amount("monthly_rent", self.monthly_rent)?;
        check_growth("rent_increase_rate", self.rent_increase_rate)?;
        check_growth("stock_return_rate", self.stock_return_rate)?;
        check_horizon_growth("rent_increase_rate", self.rent_increase_rate, self.years)?;
        check_horizon_growth(
            "stock_return_rate",
            self.stock_return_rate / Decimal::from(12),
            self.months(),
        )?;
        check_fraction("dividend_yield", self.dividend_yield)?;
        check_fraction("tax_bracket", self.tax_bracket)?;
        check_fraction("dividend_tax_rate", self.dividend_tax_rate)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

pub(crate) fn check_fraction(field: &str, value: Rate) -> RentVsOwnResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RentVsOwnError::InvalidInput {
            field: field.into(),
            reason: format!("Must be a fraction between 0 and 1, got {value}"),
        });
    }
    Ok(())
}

pub(crate) fn check_growth(field: &str, value: Rate) -> RentVsOwnResult<()> {
    if value <= dec!(-1) {
        return Err(RentVsOwnError::InvalidInput {
            field: field.into(),
            reason: format!("Growth rate must be greater than -100%, got {value}"),
        });
    }
    Ok(())
}

pub(crate) fn check_amount(field: &str, value: Money) -> RentVsOwnResult<()> {
    if value < Decimal::ZERO {
        return Err(RentVsOwnError::InvalidInput {
            field: field.into(),
            reason: format!("Cannot be negative, got {value}"),
        });
    }
    if value > MAX_AMOUNT {
        return Err(RentVsOwnError::InvalidInput {
            field: field.into(),
            reason: format!("Cannot exceed {MAX_AMOUNT}, got {value}"),
        });
    }
    Ok(())
}

pub(crate) fn check_years(field: &str, value: u32) -> RentVsOwnResult<()> {
    if value > MAX_YEARS {
        return Err(RentVsOwnError::InvalidInput {
            field: field.into(),
            reason: format!("Cannot exceed {MAX_YEARS} years, got {value}"),
        });
    }
    Ok(())
}

/// `rate` compounded over `periods` must stay below `MAX_GROWTH_FACTOR`.
pub(crate) fn check_horizon_growth(field: &str, rate: Rate, periods: u32) -> RentVsOwnResult<()> {
    match checked_compound(rate, periods) {
        Some(factor) if factor <= MAX_GROWTH_FACTOR => Ok(()),
        _ => Err(RentVsOwnError::InvalidInput {
            field: field.into(),
            reason: format!(
                "Compounding {rate} over {periods} periods grows values more than {MAX_GROWTH_FACTOR}-fold"
            ),
        }),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::thirty_year_purchase;
    use super::*;

    #[test]
    fn test_derived_amounts() {
        let p = thirty_year_purchase();
        assert_eq!(p.down_payment(), dec!(100000));
        assert_eq!(p.closing_costs(), dec!(15000));
        assert_eq!(p.loan_amount(), dec!(400000));
        assert_eq!(p.initial_investment(), dec!(115000));
        assert_eq!(p.months(), 360);
    }

    #[test]
    fn test_validate_accepts_baseline() {
        let mut warnings = Vec::new();
        thirty_year_purchase().validate(&mut warnings).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_validate_names_offending_field() {
        let mut p = thirty_year_purchase();
        p.tax_bracket = dec!(1.5);
        let err = p.validate(&mut Vec::new()).unwrap_err();
        match err {
            RentVsOwnError::InvalidInput { field, .. } => assert_eq!(field, "tax_bracket"),
            other => panic!("unexpected error: {other}"),
        }
    }

    fn rejected_field(p: &SimulationParameters) -> String {
        match p.validate(&mut Vec::new()) {
            Err(RentVsOwnError::InvalidInput { field, .. }) => field,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_runaway_growth() {
        let mut p = thirty_year_purchase();
        p.appreciation_rate = dec!(1.0);
        p.years = 100;
        assert_eq!(rejected_field(&p), "appreciation_rate");

        let mut p = thirty_year_purchase();
        p.stock_return_rate = dec!(5);
        assert_eq!(rejected_field(&p), "stock_return_rate");

        let mut p = thirty_year_purchase();
        p.rent_increase_rate = dec!(0.5);
        p.years = 60;
        assert_eq!(rejected_field(&p), "rent_increase_rate");
    }

    #[test]
    fn test_validate_caps_terms_and_amounts() {
        let mut p = thirty_year_purchase();
        p.years = MAX_YEARS + 1;
        assert_eq!(rejected_field(&p), "years");

        let mut p = thirty_year_purchase();
        p.mortgage_years = MAX_YEARS + 1;
        assert_eq!(rejected_field(&p), "mortgage_years");

        let mut p = thirty_year_purchase();
        p.purchase_price = MAX_AMOUNT * dec!(10);
        assert_eq!(rejected_field(&p), "purchase_price");

        let mut p = thirty_year_purchase();
        p.years = MAX_YEARS;
        p.validate(&mut Vec::new()).unwrap();
    }

    #[test]
    fn test_investment_parameters_reject_runaway_return() {
        let mut inv = InvestmentParameters::from_simulation(&thirty_year_purchase());
        inv.stock_return_rate = dec!(3);
        inv.years = 100;
        match inv.validate() {
            Err(RentVsOwnError::InvalidInput { field, .. }) => {
                assert_eq!(field, "stock_return_rate")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_overfunded_purchase() {
        let mut p = thirty_year_purchase();
        p.down_payment_pct = dec!(0.99);
        p.closing_costs_pct = dec!(0.05);
        assert!(p.validate(&mut Vec::new()).is_err());
    }

    #[test]
    fn test_validate_warns_on_short_mortgage_and_zero_horizon() {
        let mut p = thirty_year_purchase();
        p.mortgage_years = 15;
        let mut warnings = Vec::new();
        p.validate(&mut warnings).unwrap();
        assert!(warnings.iter().any(|w| w.contains("paid off")));

        let mut p = thirty_year_purchase();
        p.years = 0;
        let mut warnings = Vec::new();
        p.validate(&mut warnings).unwrap();
        assert!(warnings.iter().any(|w| w.contains("Zero-year")));
    }

    #[test]
    fn test_defaults_from_json() {
        let json = r#"{
            "purchase_price": "400000",
            "down_payment_pct": "0.2",
            "closing_costs_pct": "0.03",
            "mortgage_rate": "0.06",
            "mortgage_years": 30,
            "property_tax_rate": "0.01",
            "maintenance_rate": "0.01",
            "appreciation_rate": "0.03",
            "tax_bracket": "0.24",
            "years": 10
        }"#;
        let p: SimulationParameters = serde_json::from_str(json).unwrap();
        assert_eq!(p.stock_return_rate, dec!(0.10));
        assert_eq!(p.dividend_yield, dec!(0.02));
        assert_eq!(p.selling_cost_pct, dec!(0.06));
        assert_eq!(p.monthly_rent, Decimal::ZERO);
        assert!(!p.is_married);
    }

    #[test]
    fn test_investment_parameters_inherit_initial_cash() {
        let inv = InvestmentParameters::from_simulation(&thirty_year_purchase());
        assert_eq!(inv.initial_investment, dec!(115000));
        assert_eq!(inv.months(), 360);
        inv.validate().unwrap();
    }
}
