//! The complementary investment side: rent (optionally) and put the cash
//! that ownership would have consumed into a stock portfolio.

pub mod contributions;
pub mod portfolio;

pub use contributions::ContributionSchedule;
pub use portfolio::{
    run_investment, simulate_investment, InvestmentInput, InvestmentMonth, InvestmentResult,
    InvestmentSummary, InvestmentVariant,
};
