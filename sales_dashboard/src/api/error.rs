//! Error responses shared by the handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    /// Unknown, missing or unsafe plot file name
    PlotNotFound,
    /// No plot for this item slug
    ItemNotFound(String),
    /// Reports directory could not be read
    Io(std::io::Error),
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::PlotNotFound => (StatusCode::NOT_FOUND, "Plot not found").into_response(),
            ApiError::ItemNotFound(slug) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("Item not found: {}", slug) })),
            )
                .into_response(),
            ApiError::Io(err) => {
                error!("Failed to read reports directory: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to read reports" })),
                )
                    .into_response()
            }
        }
    }
}
