//! Plot listing and plot file serving

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::ApiError;
use crate::catalog::PlotEntry;
use crate::AppState;

/// Query parameters for the plot list
#[derive(Debug, Default, Deserialize)]
pub struct PlotQuery {
    /// Case-insensitive substring of the item name
    pub q: Option<String>,
}

/// GET /api/plots?q=<substring>
///
/// Lists plots sorted by item name.
pub async fn list_plots(
    State(state): State<AppState>,
    Query(query): Query<PlotQuery>,
) -> Result<Json<Vec<PlotEntry>>, ApiError> {
    let catalog = state.catalog();
    let plots = catalog.search(query.q.as_deref().unwrap_or_default())?;
    Ok(Json(plots))
}

/// GET /plot/:filename
///
/// Serves a plot PNG. Plots are regenerated in place, so caching is disabled.
pub async fn serve_plot(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let path = state
        .catalog()
        .plot_path(&filename)
        .ok_or(ApiError::PlotNotFound)?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::PlotNotFound)?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        bytes,
    )
        .into_response())
}
