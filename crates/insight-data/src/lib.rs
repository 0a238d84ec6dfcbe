//! Data layer for the sales insight workspace.
//!
//! Reads raw daily sales CSV files, consolidates them into a single-product
//! table, aggregates daily totals and computes before/after statistics around
//! the price-change cutoff.

pub mod aggregator;
pub mod analysis;
pub mod consolidator;
pub mod reader;

pub use insight_core as core;
