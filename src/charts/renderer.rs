//! Static Chart Renderer
//! Renders chart specifications to PNG bytes with plotters, for report export.
//!
//! Layout:
//! 1. Title centered at the top
//! 2. Line charts: date axis, value axis (optional), legend when comparing regions
//! 3. Pie charts: pie on the left, legend with percentages on the right

use super::spec::{date_to_x, format_compact, x_to_date, LineChart, PieChart, Rgb};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Invalid image buffer size {0}x{1}")]
    Buffer(u32, u32),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Drawing(e.to_string())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Render a time-series chart to PNG bytes.
    pub fn render_line_chart_to_bytes(
        chart: &LineChart,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buf = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            match (chart.date_range(), chart.y_range()) {
                (Some((first, last)), Some((y_min, y_max))) => {
                    let (x_min, mut x_max) = (date_to_x(first), date_to_x(last));
                    if x_max <= x_min {
                        x_max = x_min + 1.0;
                    }
                    let pad = ((y_max - y_min) * 0.1).max(y_max.abs() * 0.05).max(0.01);

                    let y_area = if chart.y_axis_visible { 80 } else { 10 };
                    let mut ctx = ChartBuilder::on(&root)
                        .caption(&chart.title, (FONT, 28))
                        .margin(20)
                        .x_label_area_size(45)
                        .y_label_area_size(y_area)
                        .build_cartesian_2d(x_min..x_max, (y_min - pad)..(y_max + pad))
                        .map_err(draw_err)?;

                    let prefix = chart.y_tick_prefix.clone();
                    let x_fmt = |x: &f64| {
                        x_to_date(*x)
                            .map(|d| d.format("%b %Y").to_string())
                            .unwrap_or_default()
                    };
                    let y_fmt = |y: &f64| format!("{}{}", prefix, format_compact(*y));

                    let mut mesh = ctx.configure_mesh();
                    mesh.x_desc(chart.x_label.as_str())
                        .x_labels(6)
                        .x_label_formatter(&x_fmt)
                        .y_label_formatter(&y_fmt);
                    if chart.y_axis_visible {
                        mesh.y_desc(chart.y_label.as_str());
                    } else {
                        mesh.disable_y_axis().disable_y_mesh();
                    }
                    mesh.draw().map_err(draw_err)?;

                    for series in chart.series.iter().filter(|s| !s.is_empty()) {
                        let color = rgb(series.color);
                        ctx.draw_series(LineSeries::new(
                            series.points.iter().map(|p| (p.x(), p.value)),
                            color.stroke_width(2),
                        ))
                        .map_err(draw_err)?
                        .label(series.name.as_str())
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                        });
                    }

                    if chart.series.len() > 1 {
                        ctx.configure_series_labels()
                            .position(SeriesLabelPosition::UpperRight)
                            .background_style(WHITE.mix(0.8))
                            .border_style(BLACK)
                            .draw()
                            .map_err(draw_err)?;
                    }
                }
                _ => Self::draw_empty(&root, &chart.title, width, height)?,
            }

            root.present().map_err(draw_err)?;
        }

        Self::encode_png(buf, width, height)
    }

    /// Render a pie chart to PNG bytes.
    pub fn render_pie_chart_to_bytes(
        chart: &PieChart,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buf = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let wedges = chart.wedges();
            if wedges.is_empty() {
                Self::draw_empty(&root, &chart.title, width, height)?;
            } else {
                let area = root.titled(&chart.title, (FONT, 28)).map_err(draw_err)?;
                let (area_w, area_h) = area.dim_in_pixel();

                let radius = (area_h.min(area_w * 3 / 5) as f64 / 2.0 - 20.0).max(10.0);
                let center = (radius + 30.0, area_h as f64 / 2.0);
                let to_pixel = |[x, y]: [f64; 2], r: f64| {
                    (
                        (center.0 + x * r).round() as i32,
                        (center.1 - y * r).round() as i32,
                    )
                };

                for wedge in &wedges {
                    let color = rgb(wedge.color);
                    for piece in wedge.pieces() {
                        let points: Vec<(i32, i32)> =
                            piece.into_iter().map(|p| to_pixel(p, radius)).collect();
                        area.draw(&Polygon::new(points.clone(), color.filled()))
                            .map_err(draw_err)?;
                        area.draw(&PathElement::new(points, WHITE.stroke_width(1)))
                            .map_err(draw_err)?;
                    }
                }

                let legend_x = (center.0 + radius + 40.0) as i32;
                let row_h = 26;
                let top = (center.1 as i32 - (wedges.len() as i32 * row_h) / 2).max(0);
                for (i, wedge) in wedges.iter().enumerate() {
                    let y = top + i as i32 * row_h;
                    area.draw(&Rectangle::new(
                        [(legend_x, y), (legend_x + 16, y + 16)],
                        rgb(wedge.color).filled(),
                    ))
                    .map_err(draw_err)?;
                    area.draw(&Text::new(
                        format!("{}  {:.1}%", wedge.label, wedge.percent),
                        (legend_x + 24, y),
                        (FONT, 16).into_font().color(&BLACK),
                    ))
                    .map_err(draw_err)?;
                }
            }

            root.present().map_err(draw_err)?;
        }

        Self::encode_png(buf, width, height)
    }

    fn draw_empty<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let area = root.titled(title, (FONT, 28)).map_err(draw_err)?;
        area.draw(&Text::new(
            "No data",
            (width as i32 / 2 - 35, height as i32 / 2 - 30),
            (FONT, 22).into_font().color(&RGBColor(128, 128, 128)),
        ))
        .map_err(draw_err)?;
        Ok(())
    }

    fn encode_png(buf: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let img = RgbImage::from_raw(width, height, buf).ok_or(RenderError::Buffer(width, height))?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}
