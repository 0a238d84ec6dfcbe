//! Runtime layer for the sales insight workspace.
//!
//! Provides [`context::DatasetContext`], the explicit handle on a loaded
//! table that queries run against, and [`data_manager::DataManager`], which
//! builds, loads and reloads that table.

pub mod context;
pub mod data_manager;

pub use insight_core as core;
pub use insight_data as data;
