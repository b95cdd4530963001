//! Types that represent the records kept in each list, such as `ExpenseRecord` and `FoodRecord`.
mod age;
mod amount;
mod expense;
mod food;
mod record_id;

pub use age::AddedAge;
pub use amount::{Won, WonError};
pub use expense::{ExpenseInput, ExpenseRecord, PaymentDay, FIXED_EXPENSES};
pub use food::{FoodInput, FoodRecord, FRIDGE_ITEMS};
pub use record_id::RecordId;

use crate::error::{typed, ErrorType};
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};

/// A record type that can be held in a `RecordStore`.
///
/// Each record type is persisted in its own storage slot and is created from raw, untyped string
/// fields (its `Input`), which are validated on the way in.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The key of the storage slot holding the collection.
    const SLOT: &'static str;

    /// Singular noun used in messages, e.g. "expense".
    const NOUN: &'static str;

    /// The raw field values a record is built from.
    type Input: Clone + Debug + Default + Serialize + Send + Sync;

    fn id(&self) -> RecordId;

    /// Validates `input` and builds a new record with a fresh id.
    fn create(input: &Self::Input) -> Result<Self>;

    /// Validates `input` and builds a replacement for `self` that keeps its identity.
    fn revise(&self, input: &Self::Input) -> Result<Self>;

    /// The record's current field values, e.g. to pre-populate an edit form.
    fn to_input(&self) -> Self::Input;
}

/// Collects every problem found in a set of input fields so they can be reported together.
#[derive(Debug, Default)]
pub(crate) struct Problems {
    noun: &'static str,
    problems: Vec<String>,
}

impl Problems {
    pub(crate) fn new(noun: &'static str) -> Self {
        Self {
            noun,
            problems: Vec::new(),
        }
    }

    /// Returns the trimmed value, or records a problem if it is blank.
    pub(crate) fn required(&mut self, field: &str, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.problems.push(format!("{field} is required"));
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Returns the parsed value, or records a problem if it is blank or does not parse.
    pub(crate) fn parse<T, E, F>(&mut self, field: &str, value: &str, parse: F) -> Option<T>
    where
        E: Display,
        F: FnOnce(&str) -> std::result::Result<T, E>,
    {
        let trimmed = self.required(field, value)?;
        match parse(&trimmed) {
            Ok(v) => Some(v),
            Err(e) => {
                self.problems.push(format!("{field} '{trimmed}' is invalid: {e}"));
                None
            }
        }
    }

    /// Returns a validation error naming every problem, if there were any.
    pub(crate) fn check(self) -> Result<()> {
        if self.problems.is_empty() {
            return Ok(());
        }
        Err(typed(
            ErrorType::Validation,
            format!("Invalid {}: {}", self.noun, self.problems.join("; ")),
        ))
    }
}
