//! HTTP API handlers for sales_dashboard

pub mod error;
pub mod health;
pub mod items;
pub mod plots;
pub mod ui;

pub use error::ApiError;
pub use health::health_routes;
pub use items::{get_item, serve_item_page};
pub use plots::{list_plots, serve_plot};
pub use ui::{serve_app_js, serve_index, serve_item_js};
