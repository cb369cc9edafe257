//! Data module - CSV loading and chart filtering

mod dataset;
mod loader;
mod processor;

pub use dataset::Dataset;
pub use loader::DataLoader;
pub use processor::{DashboardCharts, DataProcessor, Selection};

#[cfg(test)]
pub(crate) use dataset::{fixtures, ROLLUP_REGION};
