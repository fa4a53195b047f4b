//! # Patisserie Workspace
//!
//! Sales analysis for a small bakery, from point-of-sale exports to a
//! forecast dashboard.
//!
//! - [`math`]: statistics, zero-run detection and least squares
//! - [`forecast`]: cleaning, the quantity table, weekday forecasts and plots
//! - [`dashboard`]: the read-only web dashboard
//!
//! ## Example
//!
//! ```
//! use patisserie_workspace::math::{pre_introduction_len, TrimPolicy};
//!
//! let weekly_sales = [0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 3.0];
//! assert_eq!(pre_introduction_len(&weekly_sales, 4, TrimPolicy::FirstRun), 5);
//! ```

pub use sales_dashboard as dashboard;
pub use sales_forecast as forecast;
pub use sales_math as math;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_are_reachable() {
        let config = forecast::AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(forecast::plots::plot_file_name("Baguette"), "Baguette_grid_plot.png");

        let state = dashboard::AppState::new("reports");
        assert!(state.catalog().plot_dir().ends_with("grid_plots"));
    }
}
