//! Integration tests for the dashboard routes

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use sales_dashboard::{build_router, AppState};
use sales_forecast::config::{AnalysisConfig, PLOT_DIR_NAME, SUMMARY_FILE_NAME};
use sales_forecast::QuantityTable;
use sales_forecast::summary::{ForecastSummary, ItemSummary, WeekdaySummary};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

/// Test helper: reports directory with three plots and a summary for one of them
fn setup_reports() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let plot_dir = dir.path().join(PLOT_DIR_NAME);
    fs::create_dir_all(&plot_dir).unwrap();

    for name in [
        "Plain_Croissant_grid_plot.png",
        "Almond_Croissant_grid_plot.png",
        "Berry_Tart_grid_plot.png",
    ] {
        fs::write(plot_dir.join(name), FAKE_PNG).unwrap();
    }
    fs::write(plot_dir.join("notes.txt"), "not a plot").unwrap();
    fs::write(dir.path().join("secret.png"), FAKE_PNG).unwrap();

    let mut summary = ForecastSummary::new(0.8);
    summary.items.push(ItemSummary {
        item: "Plain Croissant".to_string(),
        plot_file: "Plain_Croissant_grid_plot.png".to_string(),
        weekdays: vec![WeekdaySummary {
            weekday: "Tuesday".to_string(),
            observations: 12,
            trimmed: 0,
            average: 10.5,
            maximum: 14.0,
            next: Some(11.0),
            lower: Some(8.5),
            upper: Some(13.5),
            available: true,
            reason: None,
        }],
    });
    summary.write_json(dir.path().join(SUMMARY_FILE_NAME)).unwrap();

    dir
}

fn setup_app(dir: &TempDir) -> Router {
    build_router(AppState::new(dir.path()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

async fn extract_json(body: Body) -> Value {
    serde_json::from_slice(&extract_bytes(body).await).expect("Should parse JSON")
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = setup_reports();
    let response = setup_app(&dir).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "sales_dashboard");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_index_and_scripts_served() {
    let dir = setup_reports();
    let app = setup_app(&dir);

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(extract_bytes(response.into_body()).await).unwrap();
    assert!(html.contains("/static/app.js"));

    let response = app.oneshot(get("/static/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/javascript"
    );
}

#[tokio::test]
async fn test_list_plots_sorted_by_item_name() {
    let dir = setup_reports();
    let response = setup_app(&dir).oneshot(get("/api/plots")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["item_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Almond Croissant", "Berry Tart", "Plain Croissant"]);
    assert_eq!(body[0]["filename"], "Almond_Croissant_grid_plot.png");
    assert_eq!(body[0]["slug"], "almond_croissant");
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let dir = setup_reports();
    let response = setup_app(&dir)
        .oneshot(get("/api/plots?q=CROISS"))
        .await
        .unwrap();

    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = setup_app(&dir)
        .oneshot(get("/api/plots?q=baguette"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_plot_served_without_caching() {
    let dir = setup_reports();
    let response = setup_app(&dir)
        .oneshot(get("/plot/Berry_Tart_grid_plot.png"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "no-cache, no-store, must-revalidate"
    );
    assert_eq!(headers[header::PRAGMA], "no-cache");
    assert_eq!(headers[header::EXPIRES], "0");
    assert_eq!(extract_bytes(response.into_body()).await, FAKE_PNG);
}

#[tokio::test]
async fn test_missing_and_unsafe_plots_are_not_found() {
    let dir = setup_reports();

    for uri in [
        "/plot/Unknown_grid_plot.png",
        "/plot/notes.txt",
        "/plot/..%2Fsecret.png",
        "/plot/%2E%2E%2Fsecret.png",
    ] {
        let response = setup_app(&dir).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let body = extract_bytes(response.into_body()).await;
        assert_eq!(body, b"Plot not found", "{uri}");
    }
}

#[tokio::test]
async fn test_item_detail_includes_summary_statistics() {
    let dir = setup_reports();
    let response = setup_app(&dir)
        .oneshot(get("/api/items/plain_croissant"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["item_name"], "Plain Croissant");
    assert_eq!(body["plot_url"], "/plot/Plain_Croissant_grid_plot.png");
    assert_eq!(body["interval_width"], 0.8);
    assert_eq!(body["weekdays"][0]["weekday"], "Tuesday");
    assert_eq!(body["weekdays"][0]["next"], 11.0);
}

#[tokio::test]
async fn test_item_without_summary_has_no_statistics() {
    let dir = setup_reports();
    let response = setup_app(&dir)
        .oneshot(get("/api/items/berry_tart"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["item_name"], "Berry Tart");
    assert!(body["weekdays"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_item_is_not_found() {
    let dir = setup_reports();

    let response = setup_app(&dir)
        .oneshot(get("/api/items/lemon_tart"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = setup_app(&dir)
        .oneshot(get("/item/lemon_tart"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = setup_app(&dir)
        .oneshot(get("/item/plain_croissant"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_item_slugs_match_regardless_of_case() {
    let dir = setup_reports();

    for uri in ["/item/Plain_Croissant", "/item/PLAIN_CROISSANT", "/api/items/Plain_Croissant"] {
        let response = setup_app(&dir).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }

    let response = setup_app(&dir)
        .oneshot(get("/api/items/Berry_Tart"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["slug"], "berry_tart");
}

#[tokio::test]
async fn test_item_statistics_recomputed_from_quantity_table() {
    let dir = setup_reports();
    let data_dir = dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();

    // Twelve weeks of Tuesday to Sunday sales
    let start = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
    let dates: Vec<NaiveDate> = (0..84)
        .map(|d| start + Duration::days(d))
        .filter(|d| d.weekday() != Weekday::Mon)
        .collect();
    let quantities: Vec<f64> = (0..dates.len()).map(|i| 4.0 + (i % 3) as f64).collect();
    let table = QuantityTable::new(vec!["Berry Tart".to_string()], dates, vec![quantities]).unwrap();

    let mut config = AnalysisConfig::default();
    config.paths.data_dir = data_dir;
    table.write_csv(config.paths.pivot_path()).unwrap();

    let app = build_router(AppState::new(dir.path()).with_analysis(config));
    let response = app.oneshot(get("/api/items/berry_tart")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["item_name"], "Berry Tart");
    assert!(body["generated_at"].is_null());
    assert_eq!(body["interval_width"], 0.8);

    let weekdays = body["weekdays"].as_array().unwrap();
    assert_eq!(weekdays.len(), 6);
    assert_eq!(weekdays[0]["weekday"], "Tuesday");
    assert_eq!(weekdays[0]["observations"], 12);
    assert_eq!(weekdays[5]["weekday"], "Sunday");
}

#[tokio::test]
async fn test_empty_reports_directory() {
    let dir = tempfile::tempdir().unwrap();
    let response = setup_app(&dir).oneshot(get("/api/plots")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert!(body.as_array().unwrap().is_empty());
}
