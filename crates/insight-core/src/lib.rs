//! Shared domain types for the sales insight workspace.
//!
//! Holds the transaction and statistics models, the error taxonomy, price and
//! date parsing, display formatting and command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod pricing;
pub mod settings;
pub mod time_utils;

pub use error::{Result, SalesError};
