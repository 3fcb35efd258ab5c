pub mod cashflow;
pub mod comparison;
pub mod mortgage;
pub mod sensitivity;
