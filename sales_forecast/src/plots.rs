//! Grid plot rendering
//!
//! One PNG per item: a panel per weekday slot showing the full history, the
//! dashed forecast and its shaded interval, plus a small statistics box.

use crate::error::{ForecastError, Result};
use crate::forecast::{ItemForecast, WeekdayOutcome};
use crate::models::ForecastPoint;
use crate::series::weekday_name;
use plotters::prelude::*;
use std::collections::HashSet;
use std::error::Error;
use std::path::Path;
use tracing::warn;

/// Suffix of every plot file name
pub const PLOT_SUFFIX: &str = "_grid_plot.png";

/// Length of one dash of the forecast line, in x steps
const DASH_LENGTH: f64 = 0.12;

type DrawResult<T> = std::result::Result<T, Box<dyn Error>>;

/// Deterministic plot file name for an item.
///
/// Keeps word characters, whitespace and `-`, then turns spaces into `_`.
///
/// ```
/// use sales_forecast::plots::plot_file_name;
///
/// assert_eq!(plot_file_name("Lemon Tart (Large)"), "Lemon_Tart_Large_grid_plot.png");
/// ```
pub fn plot_file_name(item: &str) -> String {
    let kept: String = item
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    format!("{}{}", kept.replace(' ', "_"), PLOT_SUFFIX)
}

/// Hands out plot file names that are unique within one report run.
///
/// Items whose names sanitise to the same file get `_2`, `_3`, ... before the
/// suffix, in the order they are assigned.
#[derive(Debug, Default)]
pub struct PlotNames {
    issued: HashSet<String>,
}

impl PlotNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// File name for `item`, distinct from every name issued so far
    pub fn assign(&mut self, item: &str) -> String {
        let name = plot_file_name(item);
        if self.issued.insert(name.clone()) {
            return name;
        }

        let stem = &name[..name.len() - PLOT_SUFFIX.len()];
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}{}", stem, n, PLOT_SUFFIX);
            if self.issued.insert(candidate.clone()) {
                warn!(item = %item, file = %candidate, collides_with = %name, "Plot file name already taken");
                return candidate;
            }
            n += 1;
        }
    }
}

/// Renders item grid plots to PNG files
#[derive(Debug, Clone)]
pub struct GridPlotRenderer {
    size: (u32, u32),
    columns: usize,
}

impl Default for GridPlotRenderer {
    fn default() -> Self {
        Self {
            size: (1800, 1200),
            columns: 3,
        }
    }
}

impl GridPlotRenderer {
    /// Render an item's grid plot to `path`.
    ///
    /// When text cannot be drawn (typically no usable font on the host) the
    /// plot is redrawn without any labels.
    pub fn render(&self, forecast: &ItemForecast, path: &Path) -> Result<()> {
        if let Err(err) = self.draw(forecast, path, true) {
            warn!(
                item = %forecast.item,
                error = %err,
                "Labelled plot failed, rendering without text"
            );
            self.draw(forecast, path, false).map_err(|e| {
                ForecastError::PlotError(format!("{}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    fn draw(&self, forecast: &ItemForecast, path: &Path, with_text: bool) -> DrawResult<()> {
        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let panel_count = forecast.weekdays.len().max(1);
        let rows = (panel_count + self.columns - 1) / self.columns;
        let panels = if with_text {
            let title = format!("Weekday Sales Pattern with Forecast: {}", forecast.item);
            root.titled(&title, ("sans-serif", 32))?
                .split_evenly((rows, self.columns))
        } else {
            root.split_evenly((rows, self.columns))
        };

        for (idx, (outcome, panel)) in forecast.weekdays.iter().zip(panels.iter()).enumerate() {
            draw_panel(panel, outcome, with_text, idx == 0)?;
        }

        root.present()?;
        Ok(())
    }
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    outcome: &WeekdayOutcome,
    with_text: bool,
    show_legend: bool,
) -> DrawResult<()> {
    let values = outcome.series.values();
    let forecast_points: &[ForecastPoint] = outcome
        .forecast
        .result()
        .map(|r| r.points())
        .unwrap_or(&[]);
    let history_len = values.len();
    let total_x = (history_len + forecast_points.len()).max(1);

    let y_max = values
        .iter()
        .copied()
        .chain(forecast_points.iter().map(|p| p.upper))
        .fold(0.0_f64, f64::max);
    let y_top = if y_max > 0.0 { y_max * 1.15 } else { 1.0 };

    let mut builder = ChartBuilder::on(area);
    builder.margin(15);
    if with_text {
        builder
            .caption(weekday_name(outcome.series.weekday()), ("sans-serif", 24))
            .x_label_area_size(40)
            .y_label_area_size(50);
    }
    let mut chart = builder.build_cartesian_2d(-0.5_f64..(total_x as f64 - 0.5), 0.0_f64..y_top)?;

    let labels = x_labels(outcome);
    let label_for = |x: &f64| {
        let rounded = x.round();
        if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    };

    let mut mesh = chart.configure_mesh();
    mesh.light_line_style(BLACK.mix(0.05));
    if with_text {
        mesh.x_labels(total_x.min(12) + 1)
            .x_label_formatter(&label_for)
            .x_label_style(("sans-serif", 12))
            .x_desc("Date")
            .y_desc("Quantity Sold");
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw()?;

    // Forecast path starts at the last observation so a one-step horizon still shows a cone
    let anchor = values
        .last()
        .map(|v| ((history_len - 1) as f64, *v, *v));
    let forecast_path: Vec<(f64, f64, f64)> = anchor
        .into_iter()
        .chain(
            forecast_points
                .iter()
                .enumerate()
                .map(|(k, p)| ((history_len + k) as f64, p.value, p.lower)),
        )
        .collect();

    if !forecast_points.is_empty() {
        let upper = anchor
            .map(|(x, v, _)| (x, v))
            .into_iter()
            .chain(
                forecast_points
                    .iter()
                    .enumerate()
                    .map(|(k, p)| ((history_len + k) as f64, p.upper.min(y_top))),
            );
        let lower: Vec<(f64, f64)> = forecast_path
            .iter()
            .map(|(x, _, lower)| (*x, lower.max(0.0)))
            .rev()
            .collect();
        let band: Vec<(f64, f64)> = upper.chain(lower).collect();

        chart
            .draw_series(std::iter::once(Polygon::new(band, RED.mix(0.3).filled())))?
            .label("Confidence Interval")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], RED.mix(0.3).filled()));
    }

    let history: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();
    chart
        .draw_series(LineSeries::new(history.clone(), BLUE.stroke_width(2)))?
        .label("Historical")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));
    chart.draw_series(
        history
            .iter()
            .map(|point| Circle::new(*point, 3, BLUE.filled())),
    )?;

    if !forecast_points.is_empty() {
        let line: Vec<(f64, f64)> = forecast_path.iter().map(|(x, v, _)| (*x, *v)).collect();
        chart
            .draw_series(
                dashed_segments(&line, DASH_LENGTH)
                    .into_iter()
                    .map(|segment| PathElement::new(segment, RED.stroke_width(2))),
            )?
            .label("Forecast")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 8, y)], RED.stroke_width(2)));
    }

    if with_text {
        draw_stats_box(area, outcome)?;
        if show_legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(("sans-serif", 14))
                .draw()?;
        }
    }

    Ok(())
}

fn draw_stats_box(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    outcome: &WeekdayOutcome,
) -> DrawResult<()> {
    let stats = outcome.stats();
    let mut lines = vec![
        format!("Avg: {:.1}", stats.average),
        format!("Max: {:.0}", stats.maximum),
    ];
    if let Some(next) = stats.next {
        lines.push(format!("Next: {:.1}", next));
    }

    let (left, top, line_height) = (75, 55, 20);
    let bottom = top + line_height * lines.len() as i32 + 8;
    area.draw(&Rectangle::new(
        [(left, top), (left + 110, bottom)],
        WHITE.mix(0.8).filled(),
    ))?;
    area.draw(&Rectangle::new([(left, top), (left + 110, bottom)], BLACK.mix(0.3)))?;

    for (i, line) in lines.into_iter().enumerate() {
        area.draw(&Text::new(
            line,
            (left + 8, top + 6 + line_height * i as i32),
            ("sans-serif", 16),
        ))?;
    }
    Ok(())
}

/// Axis labels: `M/D` for history, `F+k` for forecast steps
fn x_labels(outcome: &WeekdayOutcome) -> Vec<String> {
    let horizon = outcome.forecast.result().map_or(0, |r| r.horizons());
    outcome
        .series
        .dates()
        .iter()
        .map(|d| d.format("%-m/%-d").to_string())
        .chain((1..=horizon).map(|k| format!("F+{}", k)))
        .collect()
}

/// Break a polyline into dash segments of `dash` length along x
fn dashed_segments(line: &[(f64, f64)], dash: f64) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();

    for pair in line.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let pieces = (((x1 - x0).abs() / dash).ceil() as usize).max(1);
        let at = |t: f64| (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);

        // Every other piece is drawn
        for piece in (0..pieces).step_by(2) {
            let start = piece as f64 / pieces as f64;
            let end = ((piece + 1) as f64 / pieces as f64).min(1.0);
            segments.push(vec![at(start), at(end)]);
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_file_name_sanitises() {
        assert_eq!(plot_file_name("Croissant"), "Croissant_grid_plot.png");
        assert_eq!(
            plot_file_name("Dubai Chocolate Croissant"),
            "Dubai_Chocolate_Croissant_grid_plot.png"
        );
        assert_eq!(plot_file_name("Raspberry Tart (Small)"), "Raspberry_Tart_Small_grid_plot.png");
        assert_eq!(plot_file_name("Ham & Cheese/Plain"), "Ham__CheesePlain_grid_plot.png");
        assert_eq!(plot_file_name("Pain-au-Chocolat"), "Pain-au-Chocolat_grid_plot.png");
    }

    #[test]
    fn test_plot_names_disambiguates_collisions() {
        let mut names = PlotNames::new();
        assert_eq!(names.assign("Ham & Cheese"), "Ham__Cheese_grid_plot.png");
        assert_eq!(names.assign("Ham  Cheese"), "Ham__Cheese_2_grid_plot.png");
        assert_eq!(names.assign("Ham & Cheese"), "Ham__Cheese_3_grid_plot.png");
        assert_eq!(names.assign("Croissant"), "Croissant_grid_plot.png");
    }

    #[test]
    fn test_dashed_segments_cover_half_the_line() {
        let segments = dashed_segments(&[(0.0, 0.0), (1.0, 2.0)], 0.25);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], vec![(0.0, 0.0), (0.25, 0.5)]);
        assert_eq!(segments[1], vec![(0.5, 1.0), (0.75, 1.5)]);
        assert!(dashed_segments(&[(0.0, 1.0)], 0.25).is_empty());
    }
}
