//! Influence plot: leverage against externally studentized residuals, bubble area by Cook's distance.
//!
//! Text is rendered with the bundled DejaVu Sans through plotters' `ab_glyph`
//! backend, so no system fonts are needed.

use crate::diagnostics::InfluenceMeasures;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Smallest canvas that still fits the caption, the axis labels and the plot area.
pub const MIN_PLOT_SIZE: (u32, u32) = (240, 180);

const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("drawing backend error: {0}")]
    Backend(String),
    #[error("bundled font could not be loaded")]
    Font,
    #[error("nothing to plot: no finite influence measures")]
    NoData,
    #[error("plot area {0}x{1} is too small")]
    TooSmall(u32, u32),
}

fn backend<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Backend(err.to_string())
}

fn ensure_font() -> Result<(), PlotError> {
    let registered =
        *FONT_REGISTERED.get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if registered {
        Ok(())
    } else {
        Err(PlotError::Font)
    }
}

/// One drawable observation.
struct Point {
    row: usize,
    leverage: f64,
    residual: f64,
    cooks: f64,
    influential: bool,
}

/// Render `measures` as a PNG of `size` pixels at `path`.
///
/// Observations whose Cook's distance is above the 4/n threshold are drawn
/// in red and labelled with their input row.
pub fn render_influence_plot(
    path: &Path,
    measures: &InfluenceMeasures,
    title: &str,
    size: (u32, u32),
) -> Result<(), PlotError> {
    let (width, height) = size;
    if width < MIN_PLOT_SIZE.0 || height < MIN_PLOT_SIZE.1 {
        return Err(PlotError::TooSmall(width, height));
    }

    let points: Vec<Point> = (0..measures.n_observations())
        .filter_map(|i| {
            let point = Point {
                row: measures.row_ids[i],
                leverage: measures.leverage[i],
                residual: measures.externally_studentized[i],
                cooks: measures.cooks_distance[i],
                influential: measures.cooks_distance[i] > measures.threshold,
            };
            (point.leverage.is_finite() && point.residual.is_finite() && point.cooks.is_finite())
                .then_some(point)
        })
        .collect();
    if points.is_empty() {
        return Err(PlotError::NoData);
    }
    ensure_font()?;

    let h_max = points.iter().map(|p| p.leverage).fold(0.0_f64, f64::max);
    let r_max = points.iter().map(|p| p.residual.abs()).fold(2.5_f64, f64::max);
    let d_max = points.iter().map(|p| p.cooks).fold(0.0_f64, f64::max);
    let x_max = (h_max * 1.1).max(1e-6);
    let y_max = r_max * 1.15;
    let max_radius = (height as f64 / 25.0).max(6.0);
    let label_size = (height / 60).max(11);

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(backend)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT_FAMILY, (height / 30).max(14)))
        .margin(12)
        .x_label_area_size((height / 14).max(32))
        .y_label_area_size((width / 18).max(44))
        .build_cartesian_2d(0.0..x_max, -y_max..y_max)
        .map_err(backend)?;

    chart
        .configure_mesh()
        .x_desc("H Leverage")
        .y_desc("Studentized Residuals")
        .x_label_formatter(&|v| format!("{v:.2}"))
        .y_label_formatter(&|v| format!("{v:.1}"))
        .label_style((FONT_FAMILY, label_size))
        .axis_desc_style((FONT_FAMILY, label_size + 2))
        .draw()
        .map_err(backend)?;

    // Zero residual and the ±2 bands
    chart
        .draw_series(
            [(0.0, BLACK.mix(0.6)), (2.0, RED.mix(0.3)), (-2.0, RED.mix(0.3))]
                .into_iter()
                .map(|(level, color)| {
                    PathElement::new(vec![(0.0, level), (x_max, level)], color.stroke_width(1))
                }),
        )
        .map_err(backend)?;

    // Largest bubbles first so small ones stay visible on top
    let mut order: Vec<&Point> = points.iter().collect();
    order.sort_by(|a, b| b.cooks.total_cmp(&a.cooks));

    let radius = |p: &Point| {
        let scale = if d_max > 0.0 { (p.cooks / d_max).sqrt() } else { 0.0 };
        (max_radius * scale).max(2.0).round() as i32
    };

    chart
        .draw_series(order.iter().map(|p| {
            let (fill, outline) = if p.influential {
                (RED.mix(0.55).filled(), RED.stroke_width(1))
            } else {
                (BLUE.mix(0.35).filled(), BLUE.stroke_width(1))
            };
            let r = radius(p);
            EmptyElement::at((p.leverage, p.residual))
                + Circle::new((0, 0), r, fill)
                + Circle::new((0, 0), r, outline)
        }))
        .map_err(backend)?;

    chart
        .draw_series(order.iter().filter(|p| p.influential).map(|p| {
            let r = radius(p);
            EmptyElement::at((p.leverage, p.residual))
                + Text::new(p.row.to_string(), (r + 2, -r - 2), (FONT_FAMILY, label_size))
        }))
        .map_err(backend)?;

    root.present().map_err(backend)?;
    Ok(())
}
