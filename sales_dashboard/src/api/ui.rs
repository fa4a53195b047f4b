//! UI serving routes
//!
//! Serves the static HTML/JS pages of the dashboard

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
pub(crate) const ITEM_HTML: &str = include_str!("../ui/item.html");
const APP_JS: &str = include_str!("../ui/app.js");
const ITEM_JS: &str = include_str!("../ui/item.js");

/// GET /
///
/// Serves the plot list page
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    javascript(APP_JS)
}

/// GET /static/item.js
pub async fn serve_item_js() -> Response {
    javascript(ITEM_JS)
}

fn javascript(body: &'static str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        body,
    )
        .into_response()
}
