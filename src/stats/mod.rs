//! Stats module - volume shares and series summaries

mod calculator;

pub use calculator::{SeriesSummary, StaticCharts, StatsCalculator};
