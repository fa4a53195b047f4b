//! # Sales Math
//!
//! Numeric building blocks for sales history analysis.
//! This crate provides the small kernels the forecasting pipeline is built
//! from: descriptive statistics, detection of the zero-sales run that
//! precedes a product's introduction, and ordinary least squares fitting.

use thiserror::Error;

pub mod regression;
pub mod statistics;
pub mod zero_runs;

pub use regression::{LeastSquares, LeastSquaresFit};
pub use statistics::{max, mean, sum};
pub use zero_runs::{pre_introduction_len, TrimPolicy, DEFAULT_ZERO_RUN_THRESHOLD};

/// Errors that can occur in sales math calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;
