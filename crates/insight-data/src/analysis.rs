//! Before/after comparison around the price-change cutoff.
//!
//! Every call filters, partitions and aggregates from scratch over a borrowed,
//! read-only table, so concurrent callers never share derived state.

use chrono::NaiveDate;
use insight_core::error::{Result, SalesError};
use insight_core::models::{
    DailySales, NormalizedRecord, Period, PeriodStatistics, PriceChangeTrend, RegionFilter,
    ZeroBaselinePolicy,
};
use tracing::debug;

use crate::aggregator::SalesAggregator;

// ── Public types ──────────────────────────────────────────────────────────────

/// Records of one region scope split around the cutoff.
#[derive(Debug, Clone, Default)]
pub struct PeriodSplit<'a> {
    /// `Date < cutoff`.
    pub before: Vec<&'a NormalizedRecord>,
    /// `Date >= cutoff`.
    pub after: Vec<&'a NormalizedRecord>,
}

/// Everything a presentation layer needs for one region selection.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PeriodReport {
    pub region: String,
    pub cutoff: NaiveDate,
    pub stats: PeriodStatistics,
    pub trend: PriceChangeTrend,
    pub series: Vec<DailySales>,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Partition the records in `region` into before/after windows.
pub fn partition<'a>(
    records: &'a [NormalizedRecord],
    cutoff: NaiveDate,
    region: &RegionFilter,
) -> PeriodSplit<'a> {
    let mut split = PeriodSplit::default();
    for record in records.iter().filter(|r| region.matches(&r.region)) {
        match Period::classify(record.date, cutoff) {
            Period::Before => split.before.push(record),
            Period::After => split.after.push(record),
        }
    }
    split
}

/// Compare average daily sales before and after `cutoff` within `region`,
/// using [`ZeroBaselinePolicy::ReportZero`].
pub fn compute_stats(
    records: &[NormalizedRecord],
    cutoff: NaiveDate,
    region: &RegionFilter,
) -> PeriodStatistics {
    period_statistics(records, cutoff, region)
}

/// Compare average daily sales before and after `cutoff` within `region`.
///
/// If either window has no days the all-zero [`PeriodStatistics::default`] is
/// returned. When the before window has days but averages exactly zero,
/// `policy` decides between a `0` percent change and
/// [`SalesError::DivisionByZero`].
pub fn compute_stats_with_policy(
    records: &[NormalizedRecord],
    cutoff: NaiveDate,
    region: &RegionFilter,
    policy: ZeroBaselinePolicy,
) -> Result<PeriodStatistics> {
    let stats = period_statistics(records, cutoff, region);
    let zero_baseline = !stats.is_zero_state() && stats.before_avg == 0.0;

    match policy {
        ZeroBaselinePolicy::Fail if zero_baseline => Err(SalesError::DivisionByZero),
        _ => Ok(stats),
    }
}

/// Statistics plus the matching daily series for one region selection.
pub fn analyze_period(
    records: &[NormalizedRecord],
    cutoff: NaiveDate,
    region: &RegionFilter,
    policy: ZeroBaselinePolicy,
) -> Result<PeriodReport> {
    let stats = compute_stats_with_policy(records, cutoff, region, policy)?;
    let series = SalesAggregator::daily_series(records, region, cutoff);

    Ok(PeriodReport {
        region: region.to_string(),
        cutoff,
        trend: stats.trend(),
        stats,
        series,
    })
}

/// Statistics with a zero baseline reported as a `0` percent change.
fn period_statistics(
    records: &[NormalizedRecord],
    cutoff: NaiveDate,
    region: &RegionFilter,
) -> PeriodStatistics {
    let split = partition(records, cutoff, region);

    let before_daily = SalesAggregator::aggregate_daily(split.before.iter().copied());
    let after_daily = SalesAggregator::aggregate_daily(split.after.iter().copied());

    if before_daily.is_empty() || after_daily.is_empty() {
        debug!(
            region = %region,
            before_days = before_daily.len(),
            after_days = after_daily.len(),
            "empty window; returning zero statistics"
        );
        return PeriodStatistics::default();
    }

    let before_avg = mean(before_daily.values().copied());
    let after_avg = mean(after_daily.values().copied());

    let percent_change = if before_avg == 0.0 {
        0.0
    } else {
        (after_avg - before_avg) / before_avg * 100.0
    };

    PeriodStatistics {
        before_avg,
        after_avg,
        before_total: split.before.iter().map(|r| r.sales).sum(),
        after_total: split.after.iter().map(|r| r.sales).sum(),
        before_days: before_daily.len(),
        after_days: after_daily.len(),
        percent_change,
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

// ── Tests ─────────────────────────────────────────────────────────────────────
