//! Statistics Calculator Module
//! Volume share aggregation for the static pie charts and descriptive
//! statistics for the filtered series.

use crate::charts::{PieChart, Share};
use crate::data::Dataset;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::HashMap;
use tracing::debug;

/// Number of regions shown individually in the region share chart.
pub const TOP_REGIONS: usize = 10;

/// Label of the slice collecting every region outside the top ten.
pub const REST_LABEL: &str = "Rest";

pub const REGION_SHARE_TITLE: &str = "Avocado Sales by Region";
pub const TYPE_SHARE_TITLE: &str = "Conventional Sales vs Organic Sales";

/// Descriptive statistics of one series. Every field is NaN for an empty series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

/// The two pie charts computed once at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticCharts {
    pub region_shares: PieChart,
    pub type_shares: PieChart,
}

/// Aggregations over the immutable dataset.
pub struct StatsCalculator;

impl StatsCalculator {
    pub fn static_charts(dataset: &Dataset) -> StaticCharts {
        StaticCharts {
            region_shares: Self::region_shares(dataset),
            type_shares: Self::type_shares(dataset),
        }
    }

    /// Total volume per region, rollup excluded, ascending by volume (ties by name).
    pub fn region_volume_totals(dataset: &Dataset) -> Vec<(String, f64)> {
        let sums = dataset
            .records()
            .par_iter()
            .filter(|r| !r.is_rollup())
            .fold(HashMap::<&str, f64>::new, |mut acc, r| {
                *acc.entry(r.region.as_str()).or_insert(0.0) += r.total_volume;
                acc
            })
            .reduce(HashMap::new, |mut a, b| {
                for (region, volume) in b {
                    *a.entry(region).or_insert(0.0) += volume;
                }
                a
            });

        let mut totals: Vec<(String, f64)> = sums
            .into_iter()
            .map(|(region, volume)| (region.to_string(), volume))
            .collect();
        totals.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        totals
    }

    /// Top ten regions by volume plus a "Rest" slice, as percentages of the
    /// total volume over all non-rollup regions.
    pub fn region_shares(dataset: &Dataset) -> PieChart {
        let totals = Self::region_volume_totals(dataset);
        let grand_total: f64 = totals.iter().map(|(_, v)| v).sum();

        let mut chart = PieChart {
            title: REGION_SHARE_TITLE.to_string(),
            slices: Vec::new(),
        };
        if totals.is_empty() || grand_total <= 0.0 {
            debug!("region share chart is empty");
            return chart;
        }

        let top = &totals[totals.len().saturating_sub(TOP_REGIONS)..];
        let top_sum: f64 = top.iter().map(|(_, v)| v).sum();

        chart.slices = top
            .iter()
            .map(|(region, volume)| Share {
                label: region.clone(),
                percent: volume / grand_total * 100.0,
            })
            .collect();
        chart.slices.push(Share {
            label: REST_LABEL.to_string(),
            percent: (grand_total - top_sum) / grand_total * 100.0,
        });

        debug!(regions = totals.len(), "region shares computed");
        chart
    }

    /// Organic vs conventional split of the whole-country rollup rows.
    pub fn type_shares(dataset: &Dataset) -> PieChart {
        let mut totals: Vec<(String, f64)> = Vec::new();
        for record in dataset.records().iter().filter(|r| r.is_rollup()) {
            match totals.iter_mut().find(|(t, _)| *t == record.avocado_type) {
                Some((_, volume)) => *volume += record.total_volume,
                None => totals.push((record.avocado_type.clone(), record.total_volume)),
            }
        }

        let grand_total: f64 = totals.iter().map(|(_, v)| v).sum();
        let slices = if grand_total > 0.0 {
            totals
                .into_iter()
                .map(|(label, volume)| Share {
                    label,
                    percent: volume / grand_total * 100.0,
                })
                .collect()
        } else {
            Vec::new()
        };

        PieChart {
            title: TYPE_SHARE_TITLE.to_string(),
            slices,
        }
    }

    /// Count, mean, min, max and sample standard deviation.
    pub fn summarize(values: &[f64]) -> SeriesSummary {
        SeriesSummary {
            count: values.len(),
            mean: values.iter().mean(),
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
            std_dev: values.iter().std_dev(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::record;
    use crate::data::{Dataset, ROLLUP_REGION};

    const EPS: f64 = 1e-9;

    fn twelve_regions() -> Dataset {
        let mut rows = Vec::new();
        for i in 1..=12 {
            let region = format!("Region{:02}", i);
            rows.push(record("2015-01-04", &region, "conventional", 1.0, i as f64 * 100.0));
            rows.push(record("2015-01-11", &region, "organic", 1.0, i as f64 * 10.0));
        }
        rows.push(record("2015-01-04", ROLLUP_REGION, "conventional", 1.0, 900_000.0));
        rows.push(record("2015-01-04", ROLLUP_REGION, "organic", 1.0, 100_000.0));
        Dataset::from_records(rows)
    }

    #[test]
    fn test_region_shares_top_ten_plus_rest() {
        let chart = StatsCalculator::region_shares(&twelve_regions());

        assert_eq!(chart.slices.len(), TOP_REGIONS + 1);
        assert_eq!(chart.slices.first().unwrap().label, "Region03");
        assert_eq!(chart.slices[TOP_REGIONS - 1].label, "Region12");
        assert_eq!(chart.slices.last().unwrap().label, REST_LABEL);
        assert!(!chart.slices.iter().any(|s| s.label == ROLLUP_REGION));
        assert!((chart.total_percent() - 100.0).abs() < EPS);

        // Rest holds Region01 + Region02 out of 1..=12, each 110 * i
        let rest = chart.slices.last().unwrap().percent;
        assert!((rest - 3.0 / 78.0 * 100.0).abs() < EPS);
    }

    #[test]
    fn test_region_shares_with_few_regions_has_zero_rest() {
        let ds = Dataset::from_records(vec![
            record("2015-01-04", "Albany", "organic", 1.0, 300.0),
            record("2015-01-04", "Boise", "organic", 1.0, 100.0),
        ]);
        let chart = StatsCalculator::region_shares(&ds);

        let labels: Vec<&str> = chart.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Boise", "Albany", REST_LABEL]);
        assert!((chart.slices[1].percent - 75.0).abs() < EPS);
        assert!(chart.slices[2].percent.abs() < EPS);
    }

    #[test]
    fn test_type_shares_use_rollup_only() {
        let chart = StatsCalculator::type_shares(&twelve_regions());

        assert_eq!(chart.slices.len(), 2);
        assert_eq!(chart.slices[0].label, "conventional");
        assert!((chart.slices[0].percent - 90.0).abs() < EPS);
        assert!((chart.slices[1].percent - 10.0).abs() < EPS);
        assert!((chart.total_percent() - 100.0).abs() < EPS);
    }

    #[test]
    fn test_empty_dataset_gives_empty_pies() {
        let ds = Dataset::default();
        assert!(StatsCalculator::region_shares(&ds).slices.is_empty());
        assert!(StatsCalculator::type_shares(&ds).slices.is_empty());
    }

    #[test]
    fn test_summarize() {
        let s = StatsCalculator::summarize(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < EPS);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!((s.std_dev - (5.0f64 / 3.0).sqrt()).abs() < EPS);

        let empty = StatsCalculator::summarize(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());
    }

    #[test]
    fn test_region_totals_break_volume_ties_by_name() {
        let ds = Dataset::from_records(vec![
            record("2015-01-04", "Boise", "organic", 1.0, 60.0),
            record("2015-01-11", "Boise", "organic", 1.0, 40.0),
            record("2015-01-04", "Albany", "organic", 1.0, 100.0),
            record("2015-01-04", "Chicago", "organic", 1.0, 50.0),
            record("2015-01-04", ROLLUP_REGION, "organic", 1.0, 250.0),
        ]);

        let totals = StatsCalculator::region_volume_totals(&ds);
        let names: Vec<&str> = totals.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Chicago", "Albany", "Boise"]);
        assert_eq!(totals[1].1, totals[2].1);
    }
}
