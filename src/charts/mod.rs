//! Charts module - chart specifications, interactive plotting and static rendering

mod plotter;
mod renderer;
mod spec;

pub use plotter::ChartPlotter;
pub use renderer::{ChartRenderer, RenderError};
pub use spec::{LineChart, PieChart, Point, Series, Share, COMPARE_PALETTE, PRICE_COLOR, VOLUME_COLOR};
