//! Item detail page and API

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use chrono::{DateTime, Utc};
use sales_forecast::summary::WeekdaySummary;
use serde::Serialize;

use super::ui::ITEM_HTML;
use super::ApiError;
use crate::catalog::PlotEntry;
use crate::AppState;

/// Item detail response
#[derive(Debug, Serialize)]
pub struct ItemDetail {
    #[serde(flatten)]
    pub plot: PlotEntry,
    pub plot_url: String,
    /// When the statistics were computed, absent unless they come from the summary
    pub generated_at: Option<DateTime<Utc>>,
    pub interval_width: Option<f64>,
    pub weekdays: Vec<WeekdaySummary>,
}

/// GET /item/:slug
///
/// Serves the detail page; the page loads its data from `/api/items/:slug`.
pub async fn serve_item_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<&'static str>, ApiError> {
    match state.catalog().find_by_slug(&slug)? {
        Some(_) => Ok(Html(ITEM_HTML)),
        None => Err(ApiError::ItemNotFound(slug)),
    }
}

/// GET /api/items/:slug
///
/// Returns the plot entry with per-weekday statistics from the last run,
/// recomputed from the quantity table when the summary has no entry for it.
pub async fn get_item(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ItemDetail>, ApiError> {
    let catalog = state.catalog();
    let plot = catalog
        .find_by_slug(&slug)?
        .ok_or_else(|| ApiError::ItemNotFound(slug.clone()))?;

    let summary = catalog.summary();
    let stored = summary.as_ref().and_then(|s| {
        s.find_by_plot(&plot.filename)
            .map(|item| (s.generated_at, s.interval_width, item.weekdays.clone()))
    });

    let (generated_at, interval_width, weekdays) = match stored {
        Some((generated_at, width, weekdays)) => (Some(generated_at), Some(width), weekdays),
        None => match catalog.recompute(&plot) {
            Some(item) => (None, catalog.fallback_interval_width(), item.weekdays),
            None => (None, None, Vec::new()),
        },
    };

    Ok(Json(ItemDetail {
        plot_url: format!("/plot/{}", plot.filename),
        generated_at,
        interval_width,
        weekdays,
        plot,
    }))
}
