//! Daily and per-region aggregation of normalized sales.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use insight_core::models::{DailySales, NormalizedRecord, Period, RegionDistribution, RegionFilter};

// ── Percentile helper ─────────────────────────────────────────────────────────

/// `p`-th percentile of a **sorted** slice with linear interpolation between
/// the two nearest ranks. Returns `0.0` for an empty slice; `p` is clamped to
/// `0..=100`.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    match sorted_data {
        [] => 0.0,
        [only] => *only,
        _ => {
            let last = sorted_data.len() - 1;
            let rank = p.clamp(0.0, 100.0) / 100.0 * last as f64;
            let lo = (rank.floor() as usize).min(last);
            let hi = (rank.ceil() as usize).min(last);
            let frac = rank - lo as f64;
            sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo])
        }
    }
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups normalized records by day or region.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Sum sales per calendar day. Keys iterate in date order.
    pub fn aggregate_daily<'a, I>(records: I) -> BTreeMap<NaiveDate, f64>
    where
        I: IntoIterator<Item = &'a NormalizedRecord>,
    {
        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in records {
            *daily.entry(record.date).or_insert(0.0) += record.sales;
        }
        daily
    }

    /// Daily totals within `region`, ordered by date and tagged with the side
    /// of `cutoff` each day falls on.
    pub fn daily_series(
        records: &[NormalizedRecord],
        region: &RegionFilter,
        cutoff: NaiveDate,
    ) -> Vec<DailySales> {
        Self::aggregate_daily(records.iter().filter(|r| region.matches(&r.region)))
            .into_iter()
            .map(|(date, sales)| DailySales {
                date,
                sales,
                period: Period::classify(date, cutoff),
            })
            .collect()
    }

    /// Spread of per-transaction sales for every region, ordered by region.
    ///
    /// Regions are grouped exactly as stored, so `North` and `north` are
    /// reported separately.
    pub fn region_distribution(records: &[NormalizedRecord]) -> Vec<RegionDistribution> {
        let mut by_region: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in records {
            by_region
                .entry(record.region.as_str())
                .or_default()
                .push(record.sales);
        }

        by_region
            .into_iter()
            .map(|(region, mut sales)| {
                sales.sort_by(f64::total_cmp);
                RegionDistribution {
                    region: region.to_string(),
                    count: sales.len(),
                    total: sales.iter().sum(),
                    min: sales.first().copied().unwrap_or(0.0),
                    q1: percentile(&sales, 25.0),
                    median: percentile(&sales, 50.0),
                    q3: percentile(&sales, 75.0),
                    max: sales.last().copied().unwrap_or(0.0),
                }
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sales: f64, date: &str, region: &str) -> NormalizedRecord {
        NormalizedRecord {
            sales,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            region: region.to_string(),
        }
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // ── percentile ────────────────────────────────────────────────────────────

    #[test]
    fn test_percentile_empty_and_single() {
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(percentile(&[7.0], 25.0), 7.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&data, 50.0) - 2.5).abs() < 1e-9);
        assert!((percentile(&data, 25.0) - 1.75).abs() < 1e-9);
        assert_eq!(percentile(&data, 0.0), 1.0);
        assert_eq!(percentile(&data, 100.0), 4.0);
    }

    #[test]
    fn test_percentile_out_of_range_is_clamped() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&data, 150.0), 4.0);
        assert_eq!(percentile(&data, -10.0), 1.0);
    }

    // ── aggregate_daily ───────────────────────────────────────────────────────

    #[test]
    fn test_aggregate_daily_sums_same_day() {
        let records = vec![
            record(6.0, "2021-01-10", "north"),
            record(4.0, "2021-01-10", "south"),
            record(3.5, "2021-01-20", "north"),
        ];
        let daily = SalesAggregator::aggregate_daily(&records);

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[&d("2021-01-10")], 10.0);
        assert_eq!(daily[&d("2021-01-20")], 3.5);
    }

    #[test]
    fn test_aggregate_daily_sorted() {
        let records = vec![
            record(1.0, "2021-01-20", "north"),
            record(1.0, "2021-01-05", "north"),
            record(1.0, "2021-01-12", "north"),
        ];
        let keys: Vec<NaiveDate> = SalesAggregator::aggregate_daily(&records)
            .into_keys()
            .collect();
        assert_eq!(keys, vec![d("2021-01-05"), d("2021-01-12"), d("2021-01-20")]);
    }

    #[test]
    fn test_aggregate_daily_empty() {
        assert!(SalesAggregator::aggregate_daily(&Vec::<NormalizedRecord>::new()).is_empty());
    }

    // ── daily_series ──────────────────────────────────────────────────────────

    #[test]
    fn test_daily_series_filters_region_and_tags_period() {
        let records = vec![
            record(6.0, "2021-01-10", "north"),
            record(2.0, "2021-01-10", "south"),
            record(3.5, "2021-01-15", "North"),
        ];
        let series = SalesAggregator::daily_series(
            &records,
            &RegionFilter::Region("north".to_string()),
            d("2021-01-15"),
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].sales, 6.0);
        assert_eq!(series[0].period, Period::Before);
        assert_eq!(series[1].date, d("2021-01-15"));
        assert_eq!(series[1].period, Period::After);
    }

    #[test]
    fn test_daily_series_all_regions() {
        let records = vec![
            record(6.0, "2021-01-10", "north"),
            record(2.0, "2021-01-10", "south"),
        ];
        let series = SalesAggregator::daily_series(&records, &RegionFilter::All, d("2021-01-15"));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].sales, 8.0);
    }

    // ── region_distribution ───────────────────────────────────────────────────

    #[test]
    fn test_region_distribution() {
        let records = vec![
            record(4.0, "2021-01-10", "north"),
            record(1.0, "2021-01-11", "north"),
            record(3.0, "2021-01-12", "north"),
            record(2.0, "2021-01-13", "north"),
            record(9.0, "2021-01-10", "east"),
        ];
        let dist = SalesAggregator::region_distribution(&records);

        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].region, "east");
        assert_eq!(dist[0].count, 1);
        assert_eq!(dist[0].median, 9.0);

        let north = &dist[1];
        assert_eq!(north.count, 4);
        assert_eq!(north.total, 10.0);
        assert_eq!(north.min, 1.0);
        assert_eq!(north.max, 4.0);
        assert!((north.median - 2.5).abs() < 1e-9);
        assert!((north.q1 - 1.75).abs() < 1e-9);
        assert!((north.q3 - 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_region_distribution_empty() {
        assert!(SalesAggregator::region_distribution(&[]).is_empty());
    }
}
