//! Explicit, shareable handle on a loaded sales table.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use insight_core::error::Result;
use insight_core::models::{
    DailySales, NormalizedRecord, PeriodStatistics, RegionDistribution, RegionFilter,
    ZeroBaselinePolicy,
};
use insight_data::aggregator::SalesAggregator;
use insight_data::analysis::{analyze_period, compute_stats_with_policy, PeriodReport};
use insight_data::reader::read_normalized;

/// A consolidated table plus the fixed analysis parameters.
///
/// The records sit behind an [`Arc`] and are never mutated after
/// construction; clones share them and every query derives its own
/// aggregates, so one context can serve many threads at once.
#[derive(Debug, Clone)]
pub struct DatasetContext {
    records: Arc<[NormalizedRecord]>,
    cutoff: NaiveDate,
    policy: ZeroBaselinePolicy,
}

impl DatasetContext {
    /// Wrap `records`, stable-sorting them by date.
    pub fn new(mut records: Vec<NormalizedRecord>, cutoff: NaiveDate) -> Self {
        records.sort_by_key(|r| r.date);
        Self {
            records: records.into(),
            cutoff,
            policy: ZeroBaselinePolicy::default(),
        }
    }

    /// Load a consolidated table from disk.
    pub fn load(path: &Path, cutoff: NaiveDate) -> Result<Self> {
        let records = read_normalized(path)?;
        tracing::debug!(rows = records.len(), path = %path.display(), "dataset loaded");
        Ok(Self::new(records, cutoff))
    }

    /// Replace the zero-baseline policy.
    pub fn with_policy(mut self, policy: ZeroBaselinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    pub fn policy(&self) -> ZeroBaselinePolicy {
        self.policy
    }

    /// First and last date in the table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }

    /// Distinct region names, lowercased and sorted.
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self.records.iter().map(|r| r.region.to_lowercase()).collect();
        regions.sort();
        regions.dedup();
        regions
    }

    /// Before/after statistics for `region`.
    pub fn stats(&self, region: &RegionFilter) -> Result<PeriodStatistics> {
        compute_stats_with_policy(&self.records, self.cutoff, region, self.policy)
    }

    /// Daily totals for `region`, ordered by date.
    pub fn daily_series(&self, region: &RegionFilter) -> Vec<DailySales> {
        SalesAggregator::daily_series(&self.records, region, self.cutoff)
    }

    /// Statistics and series for `region` in one call.
    pub fn report(&self, region: &RegionFilter) -> Result<PeriodReport> {
        analyze_period(&self.records, self.cutoff, region, self.policy)
    }

    /// Per-region spread of transaction sales.
    pub fn region_distribution(&self) -> Vec<RegionDistribution> {
        SalesAggregator::region_distribution(&self.records)
    }
}
