//! Plain-text rendering of engine results for the terminal.

use std::fmt::Write as _;
use std::path::Path;

use insight_core::formatting::{format_currency, format_percent_change, format_whole_currency};
use insight_core::models::{
    ConsolidationSummary, DailySales, Period, RegionDistribution, RegionFilter,
};
use insight_core::time_utils::format_long_date;
use insight_data::analysis::PeriodReport;

/// `"pink morsel"` → `"Pink Morsel"`.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Summary printed after a consolidation run.
pub fn render_consolidation(summary: &ConsolidationSummary, product: &str, output: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Read {} rows from {} of {} files",
        summary.rows_read, summary.files_read, summary.files_requested
    );
    let _ = writeln!(out, "Products found: {}", summary.products_seen.join(", "));
    let _ = writeln!(
        out,
        "{} rows: {} matched, {} dropped as incomplete, {} written",
        title_case(product),
        summary.rows_matched,
        summary.rows_dropped,
        summary.rows_written
    );
    let _ = writeln!(out, "Saved to {}", output.display());
    out
}

/// Metric cards and conclusion for one region selection.
pub fn render_stats(report: &PeriodReport, product: &str) -> String {
    let stats = &report.stats;
    let mut out = String::new();

    let scope = match report.region.parse::<RegionFilter>() {
        Ok(RegionFilter::Region(name)) => format!(" in the {} region", title_case(&name)),
        _ => String::new(),
    };

    let _ = writeln!(
        out,
        "{} sales{} around {}",
        title_case(product),
        scope,
        format_long_date(report.cutoff)
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  Before  avg/day {:>12}   total {:>14}   days {:>4}",
        format_whole_currency(stats.before_avg),
        format_currency(stats.before_total),
        stats.before_days
    );
    let _ = writeln!(
        out,
        "  After   avg/day {:>12}   total {:>14}   days {:>4}",
        format_whole_currency(stats.after_avg),
        format_currency(stats.after_total),
        stats.after_days
    );
    let _ = writeln!(
        out,
        "  Change  {:>20}",
        format_percent_change(stats.percent_change)
    );
    let _ = writeln!(out);

    if stats.is_zero_state() {
        let _ = writeln!(
            out,
            "Not enough data{} on both sides of the price change to compare.",
            scope
        );
        return out;
    }

    let _ = writeln!(
        out,
        "{} sales{} were {} after the price increase on {}.",
        title_case(product),
        scope,
        report.trend,
        format_long_date(report.cutoff)
    );
    let _ = writeln!(
        out,
        "Average daily sales moved from {} to {} ({}).",
        format_whole_currency(stats.before_avg),
        format_whole_currency(stats.after_avg),
        format_percent_change(stats.percent_change)
    );
    out
}

/// Daily totals, one line per date.
pub fn render_series(series: &[DailySales]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10}  {:>14}  {}", "Date", "Sales", "Period");
    for point in series {
        let period = match point.period {
            Period::Before => "before",
            Period::After => "after",
        };
        let _ = writeln!(
            out,
            "{:<10}  {:>14}  {}",
            point.date,
            format_currency(point.sales),
            period
        );
    }
    if series.is_empty() {
        let _ = writeln!(out, "(no data)");
    }
    out
}

/// Per-region distribution table.
pub fn render_regions(distribution: &[RegionDistribution]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>7} {:>14} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Region", "Count", "Total", "Min", "Q1", "Median", "Q3", "Max"
    );
    for row in distribution {
        let _ = writeln!(
            out,
            "{:<8} {:>7} {:>14} {:>10} {:>10} {:>10} {:>10} {:>10}",
            row.region,
            row.count,
            format_currency(row.total),
            format_currency(row.min),
            format_currency(row.q1),
            format_currency(row.median),
            format_currency(row.q3),
            format_currency(row.max)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use insight_core::models::PeriodStatistics;
    use std::path::PathBuf;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn report(region: &str, stats: PeriodStatistics) -> PeriodReport {
        PeriodReport {
            region: region.to_string(),
            cutoff: d("2021-01-15"),
            trend: stats.trend(),
            stats,
            series: Vec::new(),
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("pink morsel"), "Pink Morsel");
        assert_eq!(title_case("NORTH"), "North");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_render_consolidation() {
        let summary = ConsolidationSummary {
            files_requested: 3,
            files_read: 2,
            rows_read: 10,
            rows_matched: 4,
            rows_dropped: 1,
            rows_written: 3,
            products_seen: vec!["pink morsel".to_string(), "gold morsel".to_string()],
        };
        let text = render_consolidation(&summary, "pink morsel", &PathBuf::from("out.csv"));
        assert!(text.contains("Read 10 rows from 2 of 3 files"));
        assert!(text.contains("pink morsel, gold morsel"));
        assert!(text.contains("Pink Morsel rows: 4 matched, 1 dropped as incomplete, 3 written"));
        assert!(text.contains("out.csv"));
    }

    #[test]
    fn test_render_stats_lower() {
        let stats = PeriodStatistics {
            before_avg: 6.0,
            after_avg: 3.5,
            before_total: 6.0,
            after_total: 3.5,
            before_days: 1,
            after_days: 1,
            percent_change: -41.666,
        };
        let text = render_stats(&report("north", stats), "pink morsel");
        assert!(text.contains("in the North region"));
        assert!(text.contains("-41.7%"));
        assert!(text.contains("were LOWER"));
        assert!(text.contains("January 15, 2021"));
        assert!(text.contains("$6.00"));
    }

    #[test]
    fn test_render_stats_all_regions_has_no_scope() {
        let stats = PeriodStatistics {
            before_avg: 100.0,
            after_avg: 150.0,
            before_days: 2,
            after_days: 2,
            percent_change: 50.0,
            ..Default::default()
        };
        let text = render_stats(&report("all", stats), "pink morsel");
        assert!(!text.contains("region"));
        assert!(text.contains("were HIGHER"));
        assert!(text.contains("+50.0%"));
    }

    #[test]
    fn test_render_stats_zero_state() {
        let text = render_stats(&report("south", PeriodStatistics::default()), "pink morsel");
        assert!(text.contains("Not enough data in the South region"));
        assert!(text.contains("+0.0%"));
    }

    #[test]
    fn test_render_series() {
        let series = vec![
            DailySales {
                date: d("2021-01-10"),
                sales: 1234.5,
                period: Period::Before,
            },
            DailySales {
                date: d("2021-01-15"),
                sales: 3.5,
                period: Period::After,
            },
        ];
        let text = render_series(&series);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2021-01-10"));
        assert!(lines[1].contains("$1,234.50"));
        assert!(lines[1].ends_with("before"));
        assert!(lines[2].ends_with("after"));
    }

    #[test]
    fn test_render_series_empty() {
        assert!(render_series(&[]).contains("(no data)"));
    }

    #[test]
    fn test_render_regions() {
        let rows = vec![RegionDistribution {
            region: "north".to_string(),
            count: 2,
            total: 9.5,
            min: 3.5,
            q1: 4.25,
            median: 4.75,
            q3: 5.25,
            max: 6.0,
        }];
        let text = render_regions(&rows);
        assert!(text.lines().next().unwrap().starts_with("Region"));
        assert!(text.contains("north"));
        assert!(text.contains("$9.50"));
        assert!(text.contains("$4.75"));
    }
}
