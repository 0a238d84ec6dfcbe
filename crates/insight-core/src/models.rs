use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SalesError;

/// One row from a raw daily sales file.
///
/// Every field is optional because source files contain empty cells; the
/// consolidator decides which gaps are tolerable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTransaction {
    /// Product name as written in the source file.
    pub product: Option<String>,
    /// Unit price, possibly carrying a leading currency symbol.
    pub price: Option<String>,
    /// Number of units sold.
    pub quantity: Option<String>,
    /// Transaction date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Sales region.
    pub region: Option<String>,
    /// 1-based data row number within its source file.
    pub row: usize,
}

impl RawTransaction {
    /// `true` when the product matches `target` ignoring case.
    pub fn is_product(&self, target: &str) -> bool {
        self.product
            .as_deref()
            .map(|p| p.to_lowercase() == target.to_lowercase())
            .unwrap_or(false)
    }

    /// `true` when every field needed to build a [`NormalizedRecord`] is present.
    pub fn is_complete(&self) -> bool {
        self.price.is_some() && self.quantity.is_some() && self.date.is_some() && self.region.is_some()
    }
}

/// A consolidated sales row: revenue for one transaction on one day.
///
/// Field order is the column order of the persisted table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    #[serde(rename = "Sales")]
    pub sales: f64,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Region")]
    pub region: String,
}

/// Which side of the cutoff date a day falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Before,
    After,
}

impl Period {
    /// Classify `date` against `cutoff`. The cutoff day itself is `After`.
    pub fn classify(date: NaiveDate, cutoff: NaiveDate) -> Self {
        if date < cutoff {
            Period::Before
        } else {
            Period::After
        }
    }
}

/// One point of the daily sales series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub sales: f64,
    pub period: Period,
}

/// Before/after comparison around the cutoff date.
///
/// `Default` is the zero state returned when either window has no days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodStatistics {
    pub before_avg: f64,
    pub after_avg: f64,
    pub before_total: f64,
    pub after_total: f64,
    pub before_days: usize,
    pub after_days: usize,
    pub percent_change: f64,
}

impl PeriodStatistics {
    /// Direction of the change in average daily sales.
    pub fn trend(&self) -> PriceChangeTrend {
        if self.percent_change > 0.0 {
            PriceChangeTrend::Higher
        } else if self.percent_change < 0.0 {
            PriceChangeTrend::Lower
        } else {
            PriceChangeTrend::Unchanged
        }
    }

    /// `true` for the all-zero result of an empty window.
    pub fn is_zero_state(&self) -> bool {
        self.before_days == 0 && self.after_days == 0
    }
}

/// Verdict on sales after the price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceChangeTrend {
    Higher,
    Lower,
    Unchanged,
}

impl fmt::Display for PriceChangeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceChangeTrend::Higher => "HIGHER",
            PriceChangeTrend::Lower => "LOWER",
            PriceChangeTrend::Unchanged => "UNCHANGED",
        };
        f.write_str(s)
    }
}

/// What to do when the before window averages exactly zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroBaselinePolicy {
    /// Report a percent change of `0`.
    #[default]
    ReportZero,
    /// Fail with [`SalesError::DivisionByZero`].
    Fail,
}

impl FromStr for ZeroBaselinePolicy {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "report-zero" => Ok(ZeroBaselinePolicy::ReportZero),
            "fail" => Ok(ZeroBaselinePolicy::Fail),
            other => Err(SalesError::Config(format!(
                "unknown zero-baseline policy: {other}"
            ))),
        }
    }
}

/// Region scope for a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RegionFilter {
    #[default]
    All,
    Region(String),
}

impl RegionFilter {
    /// `true` when a record in `region` is inside this scope.
    pub fn matches(&self, region: &str) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Region(wanted) => wanted.to_lowercase() == region.to_lowercase(),
        }
    }
}

impl FromStr for RegionFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            Ok(RegionFilter::All)
        } else {
            Ok(RegionFilter::Region(trimmed.to_string()))
        }
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFilter::All => f.write_str("all"),
            RegionFilter::Region(name) => f.write_str(name),
        }
    }
}

/// Spread of per-transaction sales within one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDistribution {
    pub region: String,
    pub count: usize,
    pub total: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Row and file counts gathered during one consolidation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationSummary {
    pub files_requested: usize,
    pub files_read: usize,
    pub rows_read: usize,
    pub rows_matched: usize,
    pub rows_dropped: usize,
    pub rows_written: usize,
    /// Distinct product names seen across all files, in first-seen order.
    pub products_seen: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn raw(product: Option<&str>) -> RawTransaction {
        RawTransaction {
            product: product.map(str::to_string),
            price: Some("$3.00".to_string()),
            quantity: Some("2".to_string()),
            date: Some("2021-01-10".to_string()),
            region: Some("north".to_string()),
            row: 1,
        }
    }

    #[test]
    fn test_is_product_ignores_case() {
        assert!(raw(Some("Pink Morsel")).is_product("pink morsel"));
        assert!(raw(Some("pink morsel")).is_product("PINK MORSEL"));
        assert!(!raw(Some("Blue Morsel")).is_product("pink morsel"));
        assert!(!raw(Some("pink morsels")).is_product("pink morsel"));
        assert!(!raw(None).is_product("pink morsel"));
    }

    #[test]
    fn test_is_complete_requires_all_fields() {
        let mut tx = raw(Some("pink morsel"));
        assert!(tx.is_complete());
        tx.region = None;
        assert!(!tx.is_complete());
    }

    #[test]
    fn test_product_is_not_required_for_completeness() {
        assert!(raw(None).is_complete());
    }

    #[test]
    fn test_period_cutoff_day_is_after() {
        let cutoff = date("2021-01-15");
        assert_eq!(Period::classify(date("2021-01-14"), cutoff), Period::Before);
        assert_eq!(Period::classify(date("2021-01-15"), cutoff), Period::After);
        assert_eq!(Period::classify(date("2021-01-16"), cutoff), Period::After);
    }

    #[test]
    fn test_trend_from_percent_change() {
        let mut stats = PeriodStatistics {
            percent_change: 12.5,
            ..Default::default()
        };
        assert_eq!(stats.trend(), PriceChangeTrend::Higher);
        stats.percent_change = -3.0;
        assert_eq!(stats.trend(), PriceChangeTrend::Lower);
        stats.percent_change = 0.0;
        assert_eq!(stats.trend(), PriceChangeTrend::Unchanged);
        assert_eq!(PriceChangeTrend::Higher.to_string(), "HIGHER");
    }

    #[test]
    fn test_default_statistics_is_zero_state() {
        let stats = PeriodStatistics::default();
        assert!(stats.is_zero_state());
        assert_eq!(stats.before_avg, 0.0);
        assert_eq!(stats.percent_change, 0.0);
    }

    #[test]
    fn test_region_filter_parse() {
        assert_eq!("all".parse::<RegionFilter>().unwrap(), RegionFilter::All);
        assert_eq!("ALL".parse::<RegionFilter>().unwrap(), RegionFilter::All);
        assert_eq!(
            "south".parse::<RegionFilter>().unwrap(),
            RegionFilter::Region("south".to_string())
        );
    }

    #[test]
    fn test_region_filter_matches_ignoring_case() {
        let north = RegionFilter::Region("North".to_string());
        assert!(north.matches("north"));
        assert!(north.matches("NORTH"));
        assert!(!north.matches("south"));
        assert!(RegionFilter::All.matches("anything"));
        assert_eq!(north.to_string(), "North");
    }

    #[test]
    fn test_zero_baseline_policy_parse() {
        assert_eq!(
            "report-zero".parse::<ZeroBaselinePolicy>().unwrap(),
            ZeroBaselinePolicy::ReportZero
        );
        assert_eq!(
            "FAIL".parse::<ZeroBaselinePolicy>().unwrap(),
            ZeroBaselinePolicy::Fail
        );
        assert!("ignore".parse::<ZeroBaselinePolicy>().is_err());
        assert_eq!(ZeroBaselinePolicy::default(), ZeroBaselinePolicy::ReportZero);
    }

    #[test]
    fn test_normalized_record_serializes_canonical_names() {
        let record = NormalizedRecord {
            sales: 6.0,
            date: date("2021-01-10"),
            region: "north".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Sales"], 6.0);
        assert_eq!(json["Date"], "2021-01-10");
        assert_eq!(json["Region"], "north");
    }
}
