mod aggregate;
mod category;
mod expense;
mod money;

pub use aggregate::*;
pub use category::*;
pub use expense::*;
pub use money::*;

/// Budget used on first run and after a reset: 1000.00.
pub const DEFAULT_BUDGET_CENTS: Cents = 100_000;

/// Largest amount accepted for an expense or the budget: 10,000,000,000.00.
pub const MAX_AMOUNT_CENTS: Cents = 1_000_000_000_000;
