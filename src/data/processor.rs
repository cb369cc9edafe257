//! Data Processor Module
//! Filters the dataset by the current control values and reshapes the
//! selected rows into chart specifications.

use super::dataset::{Dataset, Record};
use crate::charts::{LineChart, Point, Series, COMPARE_PALETTE, PRICE_COLOR, VOLUME_COLOR};
use crate::stats::{SeriesSummary, StatsCalculator};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

pub const PRICE_TITLE: &str = "Average Price of Avocados";
pub const VOLUME_TITLE: &str = "Avocados Sold";

/// Region, type and inclusive date range for the price and volume charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceVolumeFilter {
    pub region: String,
    pub avocado_type: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PriceVolumeFilter {
    pub fn matches(&self, record: &Record) -> bool {
        record.region == self.region
            && record.avocado_type == self.avocado_type
            && record.date >= self.start
            && record.date <= self.end
    }
}

/// Two regions and a type for the comparison chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompareFilter {
    pub region_one: String,
    pub region_two: String,
    pub avocado_type: String,
}

impl CompareFilter {
    pub fn matches(&self, record: &Record) -> bool {
        (record.region == self.region_one || record.region == self.region_two)
            && record.avocado_type == self.avocado_type
    }

    pub fn title(&self) -> String {
        format!("{} vs {}", self.region_one, self.region_two)
    }
}

/// Every control value the dynamic charts depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub primary: PriceVolumeFilter,
    pub compare: CompareFilter,
}

impl Selection {
    /// Start-up selection: the preferred region/type when present in the data
    /// (otherwise the first available one) over the full date range.
    pub fn initial(dataset: &Dataset, preferred_region: &str, preferred_type: &str) -> Self {
        let pick = |options: Vec<String>, preferred: &str| {
            if options.iter().any(|o| o == preferred) {
                preferred.to_string()
            } else {
                options.into_iter().next().unwrap_or_default()
            }
        };
        let region = pick(dataset.regions(), preferred_region);
        let avocado_type = pick(dataset.types(), preferred_type);
        let (start, end) = dataset
            .date_bounds()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));

        Self {
            primary: PriceVolumeFilter {
                region: region.clone(),
                avocado_type: avocado_type.clone(),
                start,
                end,
            },
            compare: CompareFilter {
                region_one: region.clone(),
                region_two: region,
                avocado_type,
            },
        }
    }
}

/// The three dynamic charts plus summaries of the selected series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub price: LineChart,
    pub volume: LineChart,
    pub compare: LineChart,
    pub price_summary: SeriesSummary,
    pub volume_summary: SeriesSummary,
}

/// Filter-and-render callback over the shared dataset.
pub struct DataProcessor;

impl DataProcessor {
    /// Recompute all dynamic charts for a selection. Never fails: a selection
    /// matching no rows produces empty series.
    pub fn update_charts(dataset: &Dataset, selection: &Selection) -> DashboardCharts {
        let (price, volume) = Self::price_volume_charts(dataset, &selection.primary);
        let compare = Self::compare_chart(dataset, &selection.compare);

        let values = |chart: &LineChart| -> Vec<f64> {
            chart
                .series
                .iter()
                .flat_map(|s| s.points.iter().map(|p| p.value))
                .collect()
        };
        let price_summary = StatsCalculator::summarize(&values(&price));
        let volume_summary = StatsCalculator::summarize(&values(&volume));

        debug!(
            region = %selection.primary.region,
            avocado_type = %selection.primary.avocado_type,
            points = price_summary.count,
            compare_series = compare.series.len(),
            "charts updated"
        );

        DashboardCharts {
            price,
            volume,
            compare,
            price_summary,
            volume_summary,
        }
    }

    /// Price and volume time series for one region/type within the date range.
    pub fn price_volume_charts(
        dataset: &Dataset,
        filter: &PriceVolumeFilter,
    ) -> (LineChart, LineChart) {
        let selected: Vec<&Record> = dataset
            .records()
            .iter()
            .filter(|r| filter.matches(r))
            .collect();

        let mut price = LineChart::new(PRICE_TITLE);
        price.y_label = "Average Price".to_string();
        price.y_tick_prefix = "$".to_string();
        price.series.push(Series {
            name: filter.region.clone(),
            color: PRICE_COLOR,
            points: selected
                .iter()
                .map(|r| Point {
                    date: r.date,
                    value: r.average_price,
                })
                .collect(),
        });

        let mut volume = LineChart::new(VOLUME_TITLE);
        volume.y_label = "Total Volume".to_string();
        volume.series.push(Series {
            name: filter.region.clone(),
            color: VOLUME_COLOR,
            points: selected
                .iter()
                .map(|r| Point {
                    date: r.date,
                    value: r.total_volume,
                })
                .collect(),
        });

        (price, volume)
    }

    /// Total volume of up to two regions, one series per region in order of first appearance.
    pub fn compare_chart(dataset: &Dataset, filter: &CompareFilter) -> LineChart {
        let mut chart = LineChart::new(filter.title());
        chart.y_label = "Total Volume".to_string();
        chart.y_axis_visible = false;

        for record in dataset.records().iter().filter(|r| filter.matches(r)) {
            let point = Point {
                date: record.date,
                value: record.total_volume,
            };
            match chart.series.iter_mut().find(|s| s.name == record.region) {
                Some(series) => series.points.push(point),
                None => {
                    let color = COMPARE_PALETTE[chart.series.len() % COMPARE_PALETTE.len()];
                    chart.series.push(Series {
                        name: record.region.clone(),
                        color,
                        points: vec![point],
                    });
                }
            }
        }

        chart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{date, record};

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record("2015-01-04", "Albany", "organic", 1.50, 1000.0),
            record("2015-01-11", "Albany", "organic", 1.60, 1200.0),
            record("2015-01-04", "Albany", "conventional", 1.10, 5000.0),
            record("2015-01-04", "Boise", "organic", 1.20, 800.0),
            record("2015-02-01", "Albany", "organic", 1.70, 900.0),
            record("2015-01-11", "Boise", "organic", 1.25, 700.0),
        ])
    }

    fn primary(region: &str, t: &str, start: &str, end: &str) -> PriceVolumeFilter {
        PriceVolumeFilter {
            region: region.to_string(),
            avocado_type: t.to_string(),
            start: date(start),
            end: date(end),
        }
    }

    fn compare(one: &str, two: &str, t: &str) -> CompareFilter {
        CompareFilter {
            region_one: one.to_string(),
            region_two: two.to_string(),
            avocado_type: t.to_string(),
        }
    }

    #[test]
    fn test_price_series_for_region_type_and_range() {
        let filter = primary("Albany", "organic", "2015-01-01", "2015-01-31");
        let (price, volume) = DataProcessor::price_volume_charts(&sample(), &filter);

        assert_eq!(price.title, PRICE_TITLE);
        assert_eq!(price.series.len(), 1);
        assert_eq!(
            price.series[0].points,
            vec![
                Point { date: date("2015-01-04"), value: 1.50 },
                Point { date: date("2015-01-11"), value: 1.60 },
            ]
        );
        let volumes: Vec<f64> = volume.series[0].points.iter().map(|p| p.value).collect();
        assert_eq!(volumes, vec![1000.0, 1200.0]);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let filter = primary("Albany", "organic", "2015-01-04", "2015-02-01");
        let (price, _) = DataProcessor::price_volume_charts(&sample(), &filter);

        assert_eq!(price.series[0].points.len(), 3);
        assert!(price.series[0]
            .points
            .iter()
            .all(|p| p.date >= filter.start && p.date <= filter.end));
    }

    #[test]
    fn test_start_after_end_is_empty() {
        let filter = primary("Albany", "organic", "2016-01-01", "2015-01-01");
        let (price, volume) = DataProcessor::price_volume_charts(&sample(), &filter);

        assert_eq!(price.series.len(), 1);
        assert!(price.series[0].is_empty());
        assert!(volume.series[0].is_empty());
    }

    #[test]
    fn test_unknown_region_is_empty_not_error() {
        let selection = Selection {
            primary: primary("Atlantis", "organic", "2015-01-01", "2015-12-31"),
            compare: compare("Atlantis", "Nowhere", "organic"),
        };
        let charts = DataProcessor::update_charts(&sample(), &selection);

        assert!(!charts.price.has_points());
        assert!(!charts.volume.has_points());
        assert!(charts.compare.series.is_empty());
        assert_eq!(charts.price_summary.count, 0);
    }

    #[test]
    fn test_compare_one_series_per_region() {
        let chart = DataProcessor::compare_chart(&sample(), &compare("Boise", "Albany", "organic"));

        assert_eq!(chart.title, "Boise vs Albany");
        assert!(!chart.y_axis_visible);
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        // Series follow first appearance in the date-sorted table
        assert_eq!(names, vec!["Albany", "Boise"]);
        assert_eq!(chart.series[0].points.len(), 3);
        assert_eq!(chart.series[1].points.len(), 2);
    }

    #[test]
    fn test_compare_same_region_collapses() {
        let chart = DataProcessor::compare_chart(&sample(), &compare("Albany", "Albany", "organic"));

        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].points.len(), 3);
    }

    #[test]
    fn test_initial_selection_prefers_defaults() {
        let ds = sample();
        let selection = Selection::initial(&ds, "Boise", "organic");
        assert_eq!(selection.primary.region, "Boise");
        assert_eq!(selection.primary.start, date("2015-01-04"));
        assert_eq!(selection.primary.end, date("2015-02-01"));
        assert_eq!(selection.compare.region_two, "Boise");

        let fallback = Selection::initial(&ds, "Atlantis", "heirloom");
        assert_eq!(fallback.primary.region, "Albany");
        assert_eq!(fallback.primary.avocado_type, "organic");
    }

    #[test]
    fn test_update_charts_summarizes_selection() {
        let selection = Selection::initial(&sample(), "Albany", "organic");
        let charts = DataProcessor::update_charts(&sample(), &selection);

        assert_eq!(charts.price_summary.count, 3);
        assert!((charts.price_summary.mean - 1.6).abs() < 1e-9);
        assert_eq!(charts.volume_summary.max, 1200.0);
    }
}
