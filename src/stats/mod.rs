//! Figures derived from a list. Everything here is a pure function of the records passed in.

mod expense;
mod fridge;

pub use expense::{
    amount_class, sorted_by_amount_desc, AmountClass, ExpenseStats, ExpenseSummary,
    HIGH_AMOUNT_THRESHOLD,
};
pub use fridge::{
    days_until_expiry, sorted_by_expiry, FridgeStats, Freshness, WARNING_DAYS,
};
