//! Ordinary least squares regression
//!
//! Solves the normal equations `(X'X) b = X'y` for small design matrices.
//! The forecasting model uses a handful of regressors (intercept, trend and
//! a few Fourier terms), so a dense Gauss-Jordan inverse is sufficient and
//! also yields `(X'X)^-1` for prediction intervals.

use crate::{MathError, Result};

/// Pivot magnitude below which the normal matrix is treated as singular
const SINGULAR_EPSILON: f64 = 1e-10;

/// Ordinary least squares solver
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSquares;

/// Fitted least squares model
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    coefficients: Vec<f64>,
    /// `(X'X)^-1`
    normal_inverse: Vec<Vec<f64>>,
    residual_variance: f64,
}

impl LeastSquares {
    /// Fit coefficients for the given design rows and targets
    pub fn fit(design: &[Vec<f64>], targets: &[f64]) -> Result<LeastSquaresFit> {
        if design.is_empty() {
            return Err(MathError::InsufficientData(
                "Least squares needs at least one observation".to_string(),
            ));
        }
        if design.len() != targets.len() {
            return Err(MathError::InvalidInput(format!(
                "Design has {} rows but {} targets were given",
                design.len(),
                targets.len()
            )));
        }

        let width = design[0].len();
        if width == 0 || design.iter().any(|row| row.len() != width) {
            return Err(MathError::InvalidInput(
                "Design rows must share a non-zero width".to_string(),
            ));
        }
        if design.len() < width {
            return Err(MathError::InsufficientData(format!(
                "Need at least {} observations for {} regressors, have {}",
                width,
                width,
                design.len()
            )));
        }

        // Accumulate X'X and X'y
        let mut normal = vec![vec![0.0; width]; width];
        let mut moment = vec![0.0; width];
        for (row, &y) in design.iter().zip(targets) {
            for i in 0..width {
                moment[i] += row[i] * y;
                for j in 0..width {
                    normal[i][j] += row[i] * row[j];
                }
            }
        }

        let normal_inverse = invert(normal)?;
        let coefficients: Vec<f64> = normal_inverse
            .iter()
            .map(|inv_row| inv_row.iter().zip(&moment).map(|(a, b)| a * b).sum())
            .collect();

        let sse: f64 = design
            .iter()
            .zip(targets)
            .map(|(row, &y)| (y - dot(row, &coefficients)).powi(2))
            .sum();
        let dof = design.len() - width;
        let residual_variance = if dof > 0 { sse / dof as f64 } else { 0.0 };

        Ok(LeastSquaresFit {
            coefficients,
            normal_inverse,
            residual_variance,
        })
    }
}

impl LeastSquaresFit {
    /// Fitted coefficients, one per regressor
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Unbiased residual variance (`SSE / (n - p)`), zero for an exact fit
    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    /// Point prediction for a design row
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        self.check_width(row)?;
        Ok(dot(row, &self.coefficients))
    }

    /// Standard error of a new observation at `row`:
    /// `sigma * sqrt(1 + x0' (X'X)^-1 x0)`
    pub fn prediction_std_error(&self, row: &[f64]) -> Result<f64> {
        self.check_width(row)?;

        let leverage: f64 = self
            .normal_inverse
            .iter()
            .zip(row)
            .map(|(inv_row, &xi)| xi * dot(inv_row, row))
            .sum();

        Ok((self.residual_variance * (1.0 + leverage.max(0.0))).sqrt())
    }

    fn check_width(&self, row: &[f64]) -> Result<()> {
        if row.len() != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Expected {} regressors, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }
        Ok(())
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Gauss-Jordan inverse with partial pivoting
fn invert(mut matrix: Vec<Vec<f64>>) -> Result<Vec<Vec<f64>>> {
    let n = matrix.len();
    let mut inverse: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))
            .unwrap_or(col);

        if matrix[pivot_row][col].abs() < SINGULAR_EPSILON {
            return Err(MathError::CalculationError(
                "Normal matrix is singular; regressors are collinear".to_string(),
            ));
        }

        matrix.swap(col, pivot_row);
        inverse.swap(col, pivot_row);

        let pivot = matrix[col][col];
        for j in 0..n {
            matrix[col][j] /= pivot;
            inverse[col][j] /= pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = matrix[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                matrix[row][j] -= factor * matrix[col][j];
                inverse[row][j] -= factor * inverse[col][j];
            }
        }
    }

    Ok(inverse)
}
