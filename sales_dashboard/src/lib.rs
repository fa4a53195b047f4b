//! sales_dashboard library - Forecast plot browser
//!
//! Read-only HTTP views over a reports directory written by `run_analysis`.

use axum::Router;
use sales_forecast::config::AnalysisConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;

use catalog::PlotCatalog;

/// Application state shared across HTTP handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Directory holding `grid_plots/` and the forecast summary
    pub reports_dir: PathBuf,
    /// Analysis settings for recomputing statistics the summary lacks
    pub analysis: Option<Arc<AnalysisConfig>>,
}

impl AppState {
    /// Create new application state
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
            analysis: None,
        }
    }

    pub fn with_analysis(mut self, config: AnalysisConfig) -> Self {
        self.analysis = Some(Arc::new(config));
        self
    }

    pub fn catalog(&self) -> PlotCatalog {
        let catalog = PlotCatalog::new(&self.reports_dir);
        match &self.analysis {
            Some(config) => catalog.with_analysis(Arc::clone(config)),
            None => catalog,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/static/item.js", get(api::serve_item_js))
        .route("/item/:slug", get(api::serve_item_page))
        .route("/api/plots", get(api::list_plots))
        .route("/api/items/:slug", get(api::get_item))
        .route("/plot/:filename", get(api::serve_plot))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
