//! Descriptive statistics over quantity slices

use crate::{MathError, Result};

/// Sum of all values
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Arithmetic mean of the values
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty series".to_string(),
        ));
    }

    Ok(sum(values) / values.len() as f64)
}

/// Largest value in the series
pub fn max(values: &[f64]) -> Result<f64> {
    values
        .iter()
        .copied()
        .fold(None, |acc: Option<f64>, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
        .ok_or_else(|| {
            MathError::InsufficientData("Cannot take the maximum of an empty series".to_string())
        })
}
