pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod slot;
pub mod stats;
pub mod store;
mod utils;

pub use backup::Backup;
pub use config::Config;
pub use error::{error_type, Error, ErrorType, IntoResult, Result, StoreError};
