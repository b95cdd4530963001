//! Command handlers for the homelist CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod expense;
mod fridge;
mod init;

use crate::model::Record;
use crate::store::RecordStore;
use crate::Config;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info, warn};

pub use expense::{
    expense_add, expense_delete, expense_edit, expense_list, expense_stats, ExpenseLine,
};
pub use fridge::{fridge_add, fridge_delete, fridge_edit, fridge_list, fridge_stats, FoodLine};
pub use init::init;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Opens and loads the list of `R` records. Stored data that cannot be loaded is reported and
/// the list starts out empty.
async fn open<R: Record>(config: &Config) -> RecordStore<R> {
    let mut store = RecordStore::new(config.slots());
    if let Err(e) = store.load().await {
        warn!("{e:#}");
    }
    store
}

/// "1 expense", "2 expenses".
fn plural(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", if count == 1 { "" } else { "s" })
}
