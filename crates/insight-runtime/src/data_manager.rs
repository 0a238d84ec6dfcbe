//! Lazily built, change-aware access to the consolidated sales table.
//!
//! [`DataManager::get_context`] hands out a [`DatasetContext`] for the table
//! on disk. The table is consolidated from the raw inputs the first time it is
//! needed, and reloaded whenever its modification time changes. If a reload
//! fails the previously loaded context is returned instead.
//!
//! Each rebuild records the product and inputs it used in a small JSON
//! manifest beside the table (`<table>.manifest.json`). A table built for
//! another product or input list, or older than one of its inputs, is rebuilt
//! before it is served.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::NaiveDate;
use insight_core::error::{Result, SalesError};
use insight_core::models::{ConsolidationSummary, ZeroBaselinePolicy};
use insight_data::consolidator::{consolidate_to_file, DEFAULT_PRODUCT};
use serde::{Deserialize, Serialize};

use crate::context::DatasetContext;

// ── Table manifest ────────────────────────────────────────────────────────────

/// What the consolidated table was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TableManifest {
    product: String,
    inputs: Vec<PathBuf>,
}

impl TableManifest {
    fn path_for(table_path: &Path) -> PathBuf {
        let mut name = table_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".manifest.json");
        table_path.with_file_name(name)
    }

    fn load(table_path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(Self::path_for(table_path)).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn save(&self, table_path: &Path) {
        let path = Self::path_for(table_path);
        let written = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            tracing::warn!(path = %path.display(), error = %e, "failed to write table manifest");
        }
    }
}

// ── DataManager ───────────────────────────────────────────────────────────────

/// Owns the path to the consolidated table and the context loaded from it.
///
/// # Example
/// ```no_run
/// use insight_core::models::RegionFilter;
/// use insight_core::time_utils::PRICE_INCREASE_DATE;
/// use insight_runtime::data_manager::DataManager;
///
/// let mut mgr = DataManager::new("pink_morsel_sales_consolidated.csv", PRICE_INCREASE_DATE);
/// let ctx = mgr.get_context(false).unwrap();
/// println!("{:?}", ctx.stats(&RegionFilter::All));
/// ```
pub struct DataManager {
    /// Consolidated table read and, when absent, written.
    table_path: PathBuf,
    /// Raw files used to build a missing table.
    inputs: Vec<PathBuf>,
    /// Product isolated when building the table.
    product: String,
    cutoff: NaiveDate,
    policy: ZeroBaselinePolicy,
    /// Most recently loaded context.
    cache: Option<DatasetContext>,
    /// Modification time of the table when `cache` was loaded.
    cache_mtime: Option<SystemTime>,
    /// Human-readable description of the last error encountered.
    last_error: Option<String>,
}

impl DataManager {
    /// Manager over an existing (or to-be-built) table at `table_path`.
    pub fn new(table_path: impl Into<PathBuf>, cutoff: NaiveDate) -> Self {
        Self {
            table_path: table_path.into(),
            inputs: Vec::new(),
            product: DEFAULT_PRODUCT.to_string(),
            cutoff,
            policy: ZeroBaselinePolicy::default(),
            cache: None,
            cache_mtime: None,
            last_error: None,
        }
    }

    /// Raw inputs and product used when the table has to be built.
    pub fn with_inputs(mut self, inputs: Vec<PathBuf>, product: impl Into<String>) -> Self {
        self.inputs = inputs;
        self.product = product.into();
        self
    }

    /// Zero-baseline policy applied to every handed-out context.
    pub fn with_policy(mut self, policy: ZeroBaselinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Rebuild the table from the raw inputs, replacing any existing file.
    pub fn rebuild(&mut self) -> Result<ConsolidationSummary> {
        if self.inputs.is_empty() {
            return Err(SalesError::NoInputData { attempted: 0 });
        }
        let consolidation = consolidate_to_file(&self.inputs, &self.product, &self.table_path)?;
        self.manifest().save(&self.table_path);
        self.invalidate_cache();
        Ok(consolidation.summary)
    }

    /// Return a context for the table, loading or building it as needed.
    ///
    /// With `force_refresh` the table is reloaded even if it has not changed.
    /// A failed reload falls back to the previous context when there is one.
    pub fn get_context(&mut self, force_refresh: bool) -> Result<DatasetContext> {
        if let Some(reason) = self.rebuild_reason() {
            tracing::info!(
                path = %self.table_path.display(),
                "consolidated table {}; building from raw inputs",
                reason
            );
            if let Err(e) = self.rebuild() {
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        }

        let mtime = self.table_mtime();
        if !force_refresh && self.is_cache_valid(mtime) {
            if let Some(ctx) = &self.cache {
                tracing::debug!("returning cached dataset");
                return Ok(ctx.clone());
            }
        }

        match DatasetContext::load(&self.table_path, self.cutoff) {
            Ok(ctx) => {
                let ctx = ctx.with_policy(self.policy);
                tracing::debug!(rows = ctx.len(), "dataset cache updated");
                self.cache = Some(ctx.clone());
                self.cache_mtime = mtime;
                self.last_error = None;
                Ok(ctx)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                match &self.cache {
                    Some(ctx) => {
                        tracing::warn!(error = %e, "reload failed; using previously loaded table");
                        Ok(ctx.clone())
                    }
                    None => Err(e),
                }
            }
        }
    }

    /// Discard the loaded context so the next call reloads from disk.
    pub fn invalidate_cache(&mut self) {
        self.cache = None;
        self.cache_mtime = None;
        tracing::debug!("dataset cache invalidated");
    }

    /// Human-readable description of the last error, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn manifest(&self) -> TableManifest {
        TableManifest {
            product: self.product.to_lowercase(),
            inputs: self.inputs.clone(),
        }
    }

    /// Why the table on disk cannot be served as is, or `None` if it can.
    ///
    /// Without inputs there is nothing to rebuild from, so an existing table
    /// is always served.
    fn rebuild_reason(&self) -> Option<&'static str> {
        if !self.table_path.exists() {
            return Some("missing");
        }
        if self.inputs.is_empty() {
            return None;
        }
        if let Some(recorded) = TableManifest::load(&self.table_path) {
            if recorded != self.manifest() {
                return Some("built from a different product or input list");
            }
        }
        let table_mtime = self.table_mtime()?;
        let stale = self.inputs.iter().any(|input| {
            std::fs::metadata(input)
                .and_then(|m| m.modified())
                .map(|mtime| mtime > table_mtime)
                .unwrap_or(false)
        });
        stale.then_some("older than its inputs")
    }

    fn table_mtime(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.table_path)
            .and_then(|m| m.modified())
            .ok()
    }

    fn is_cache_valid(&self, mtime: Option<SystemTime>) -> bool {
        self.cache.is_some() && mtime.is_some() && self.cache_mtime == mtime
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
