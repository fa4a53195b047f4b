//! Detection of the pre-introduction run of zero sales
//!
//! A product that was added to the menu part way through the history shows a
//! long stretch of zero quantities before its first sale. Fitting a model on
//! that stretch drags the forecast towards zero, so the stretch is located
//! here and excluded by the caller.
//!
//! A run "ends" at the first non-zero observation that follows it. A run that
//! reaches the end of the series never ends and therefore trims nothing.

use serde::{Deserialize, Serialize};

/// Number of consecutive zero observations that marks a product as not yet introduced
pub const DEFAULT_ZERO_RUN_THRESHOLD: usize = 4;

/// Which qualifying zero run decides the trim point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimPolicy {
    /// Trim up to the end of the first qualifying run
    #[default]
    FirstRun,
    /// Trim up to the end of the latest qualifying run
    LastRun,
}

/// Number of leading observations that belong to the pre-introduction period.
///
/// Returns the index of the first observation after a run of at least
/// `threshold` consecutive zeros, or 0 when no such run ends inside the series.
///
/// # Examples
///
/// ```
/// use sales_math::{pre_introduction_len, TrimPolicy};
///
/// assert_eq!(pre_introduction_len(&[0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 3.0], 4, TrimPolicy::FirstRun), 5);
/// assert_eq!(pre_introduction_len(&[1.0, 0.0, 0.0, 2.0], 4, TrimPolicy::FirstRun), 0);
/// ```
pub fn pre_introduction_len(values: &[f64], threshold: usize, policy: TrimPolicy) -> usize {
    let threshold = threshold.max(1);
    let mut trim_idx = 0;
    let mut consecutive_zeros = 0;

    for (i, &value) in values.iter().enumerate() {
        if value == 0.0 {
            consecutive_zeros += 1;
            continue;
        }

        if consecutive_zeros >= threshold {
            trim_idx = i;
            if policy == TrimPolicy::FirstRun {
                return trim_idx;
            }
        }
        consecutive_zeros = 0;
    }

    trim_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 3.0], 5)]
    #[case(&[1.0, 0.0, 0.0, 2.0], 0)]
    #[case(&[0.0, 0.0, 0.0, 0.0, 1.0], 4)]
    #[case(&[0.0, 0.0, 0.0, 1.0, 2.0], 0)]
    #[case(&[3.0, 4.0, 0.0, 0.0, 0.0, 0.0], 0)]
    #[case(&[], 0)]
    fn test_first_run(#[case] values: &[f64], #[case] expected: usize) {
        assert_eq!(
            pre_introduction_len(values, DEFAULT_ZERO_RUN_THRESHOLD, TrimPolicy::FirstRun),
            expected
        );
    }

    #[test]
    fn test_first_and_last_run_differ_on_second_gap() {
        let values = [0.0, 0.0, 0.0, 0.0, 5.0, 6.0, 0.0, 0.0, 0.0, 0.0, 0.0, 7.0, 8.0];
        assert_eq!(pre_introduction_len(&values, 4, TrimPolicy::FirstRun), 4);
        assert_eq!(pre_introduction_len(&values, 4, TrimPolicy::LastRun), 11);
    }

    #[test]
    fn test_custom_threshold() {
        let values = [0.0, 0.0, 1.0, 1.0];
        assert_eq!(pre_introduction_len(&values, 2, TrimPolicy::FirstRun), 2);
        assert_eq!(pre_introduction_len(&values, 3, TrimPolicy::FirstRun), 0);
    }
}
