use sales_forecast::error::ForecastError;
use sales_forecast::AnalysisConfig;
use sales_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    let math_error = MathError::InsufficientData("need 3 points".to_string());
    let forecast_error = ForecastError::from(math_error);
    assert!(matches!(forecast_error, ForecastError::MathError(_)));

    let json_error = serde_json::from_str::<Vec<f64>>("not json").unwrap_err();
    let forecast_error = ForecastError::from(json_error);
    assert!(matches!(forecast_error, ForecastError::JsonError(_)));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidParameter("horizon must be at least 1".to_string());
    assert!(error.to_string().contains("horizon must be at least 1"));

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error = ForecastError::from(io_error);
    let error_string = error.to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[test]
fn test_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[forecast\nhorizon = ").unwrap();

    let error = AnalysisConfig::from_file(&path).unwrap_err();
    assert!(matches!(error, ForecastError::ConfigError(_)));

    let missing = AnalysisConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(missing, ForecastError::IoError(_)));
}
