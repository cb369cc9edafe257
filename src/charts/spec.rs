//! Chart Specification Module
//! UI-independent chart descriptions produced by the processor and the stats calculator.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// RGB colour carried in chart specs, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

pub const PRICE_COLOR: Rgb = Rgb(0x17, 0xB8, 0x97);
pub const VOLUME_COLOR: Rgb = Rgb(0xE1, 0x2D, 0x39);

/// Teal ramp for the comparison chart.
pub const COMPARE_PALETTE: [Rgb; 4] = [
    Rgb(0x7F, 0xC9, 0x7F),
    Rgb(0x2A, 0x7B, 0x8E),
    Rgb(0x4C, 0xA6, 0x8A),
    Rgb(0x0E, 0x4F, 0x6B),
];

/// Red-to-blue diverging palette for pie slices.
pub const SHARE_PALETTE: [Rgb; 11] = [
    Rgb(0x67, 0x00, 0x1F),
    Rgb(0xB2, 0x18, 0x2B),
    Rgb(0xD6, 0x60, 0x4D),
    Rgb(0xF4, 0xA5, 0x82),
    Rgb(0xFD, 0xDB, 0xC7),
    Rgb(0xF7, 0xF7, 0xF7),
    Rgb(0xD1, 0xE5, 0xF0),
    Rgb(0x92, 0xC5, 0xDE),
    Rgb(0x43, 0x93, 0xC3),
    Rgb(0x21, 0x66, 0xAC),
    Rgb(0x05, 0x30, 0x61),
];

/// A single (date, value) sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub date: NaiveDate,
    pub value: f64,
}

impl Point {
    /// X coordinate used by the plotting backends: days since 1970-01-01.
    pub fn x(&self) -> f64 {
        date_to_x(self.date)
    }
}

pub fn date_to_x(date: NaiveDate) -> f64 {
    (date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE) as f64
}

/// Inverse of [`date_to_x`], rounding to the nearest day.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    let days = i32::try_from(x.round() as i64).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Short axis label: 1.5M, 250k, 1.25.
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.0}k", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<Point>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Time-series chart: one or more lines over a date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_tick_prefix: String,
    pub y_axis_visible: bool,
    pub series: Vec<Series>,
}

impl LineChart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: "Date".to_string(),
            y_label: String::new(),
            y_tick_prefix: String::new(),
            y_axis_visible: true,
            series: Vec::new(),
        }
    }

    pub fn has_points(&self) -> bool {
        self.series.iter().any(|s| !s.is_empty())
    }

    /// Value range across all series, `None` when there are no points.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.points().map(|p| p.value).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Date range across all series, `None` when there are no points.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.points().map(|p| p.date).min()?;
        let last = self.points().map(|p| p.date).max()?;
        Some((first, last))
    }

    fn points(&self) -> impl Iterator<Item = &Point> {
        self.series.iter().flat_map(|s| s.points.iter())
    }
}

/// One labelled slice of a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<Share>,
}

impl PieChart {
    pub fn slice_color(index: usize) -> Rgb {
        SHARE_PALETTE[index % SHARE_PALETTE.len()]
    }

    pub fn total_percent(&self) -> f64 {
        self.slices.iter().map(|s| s.percent).sum()
    }

    /// Slice boundaries as fractions of a full turn, clockwise from 12 o'clock.
    pub fn wedges(&self) -> Vec<Wedge> {
        let total = self.total_percent();
        if total <= 0.0 {
            return Vec::new();
        }

        let mut start = 0.0;
        self.slices
            .iter()
            .enumerate()
            .map(|(i, slice)| {
                let end = start + slice.percent.max(0.0) / total;
                let wedge = Wedge {
                    label: slice.label.clone(),
                    percent: slice.percent,
                    color: Self::slice_color(i),
                    start,
                    end,
                };
                start = end;
                wedge
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub label: String,
    pub percent: f64,
    pub color: Rgb,
    pub start: f64,
    pub end: f64,
}

impl Wedge {
    /// Unit-circle polygons covering the wedge. Each piece spans at most a
    /// quarter turn so it stays convex.
    pub fn pieces(&self) -> Vec<Vec<[f64; 2]>> {
        const MAX_SPAN: f64 = 0.25;
        const STEPS_PER_TURN: f64 = 120.0;

        let mut pieces = Vec::new();
        let mut from = self.start;
        while from < self.end {
            let to = (from + MAX_SPAN).min(self.end);
            let steps = ((to - from) * STEPS_PER_TURN).ceil().max(1.0) as usize;

            let mut polygon = vec![[0.0, 0.0]];
            polygon.extend((0..=steps).map(|k| {
                let frac = from + (to - from) * k as f64 / steps as f64;
                unit_point(frac)
            }));
            pieces.push(polygon);
            from = to;
        }
        pieces
    }

    /// Unit-circle point in the middle of the wedge, for labels.
    pub fn mid_point(&self) -> [f64; 2] {
        unit_point((self.start + self.end) / 2.0)
    }
}

fn unit_point(turn_fraction: f64) -> [f64; 2] {
    let angle = std::f64::consts::FRAC_PI_2 - turn_fraction * std::f64::consts::TAU;
    [angle.cos(), angle.sin()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::date;

    #[test]
    fn test_date_axis_conversion() {
        assert_eq!(date_to_x(date("1970-01-01")), 0.0);
        assert_eq!(date_to_x(date("1970-01-11")), 10.0);
        assert_eq!(x_to_date(16439.2), Some(date("2015-01-04")));
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(1.5), "1.50");
        assert_eq!(format_compact(250_000.0), "250k");
        assert_eq!(format_compact(1_500_000.0), "1.5M");
        assert_eq!(format_compact(2.0e9), "2.0B");
    }

    #[test]
    fn test_line_chart_ranges() {
        let mut chart = LineChart::new("t");
        assert_eq!(chart.y_range(), None);
        assert!(!chart.has_points());

        chart.series.push(Series {
            name: "a".into(),
            color: PRICE_COLOR,
            points: vec![
                Point { date: date("2015-02-01"), value: 2.0 },
                Point { date: date("2015-01-01"), value: 0.5 },
            ],
        });
        assert_eq!(chart.y_range(), Some((0.5, 2.0)));
        assert_eq!(
            chart.date_range(),
            Some((date("2015-01-01"), date("2015-02-01")))
        );
    }

    #[test]
    fn test_wedges_cover_full_turn() {
        let chart = PieChart {
            title: "t".into(),
            slices: vec![
                Share { label: "conventional".into(), percent: 97.0 },
                Share { label: "organic".into(), percent: 3.0 },
            ],
        };
        let wedges = chart.wedges();

        assert_eq!(wedges.len(), 2);
        assert_eq!(wedges[0].start, 0.0);
        assert!((wedges[0].end - 0.97).abs() < 1e-12);
        assert!((wedges[1].end - 1.0).abs() < 1e-12);

        // 97% needs four quarter-turn pieces
        let pieces = wedges[0].pieces();
        assert_eq!(pieces.len(), 4);
        assert!(pieces.iter().all(|p| p[0] == [0.0, 0.0]));
        let top = pieces[0][1];
        assert!(top[0].abs() < 1e-12 && (top[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_pie_has_no_wedges() {
        let chart = PieChart { title: "t".into(), slices: Vec::new() };
        assert!(chart.wedges().is_empty());
    }

    #[test]
    fn test_color_serializes_as_hex() {
        let json = serde_json::to_string(&PRICE_COLOR).unwrap();
        assert_eq!(json, "\"#17B897\"");
    }
}
