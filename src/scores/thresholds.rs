//! Detection threshold sets.

use crate::constants::{DEFAULT_THRESHOLDS, THRESHOLD_LABEL_PREFIX};
use crate::error::{Error, Result};

/// An ordered set of log-odds detection thresholds.
///
/// Each threshold contributes one `t_<threshold>` column to every summary
/// table. The label renders the value the way Rust displays an `f64`, so
/// `2.0` becomes `t_2` and `7.313` becomes `t_7.313`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSet {
    values: Vec<f64>,
}

impl ThresholdSet {
    /// Build a threshold set, enforcing a non-empty, finite, strictly
    /// increasing list.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::ConfigValidation {
                message: "thresholds must not be empty".to_string(),
            });
        }

        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::ConfigValidation {
                message: format!("thresholds must be finite, got {bad}"),
            });
        }

        if values.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::ConfigValidation {
                message: format!("thresholds must be strictly increasing, got {values:?}"),
            });
        }

        Ok(Self { values })
    }

    /// The threshold values in ascending order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of thresholds.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty. Never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column label for one threshold value.
    pub fn label(value: f64) -> String {
        format!("{THRESHOLD_LABEL_PREFIX}{value}")
    }

    /// Column labels for all thresholds, in threshold order.
    pub fn labels(&self) -> Vec<String> {
        self.values.iter().map(|v| Self::label(*v)).collect()
    }

    /// Detection flags for one clip: `log_odds > threshold` per threshold.
    ///
    /// The comparison is strict, so a clip sitting exactly on a threshold
    /// does not count as a detection.
    pub fn flags(&self, log_odds: f64) -> Vec<bool> {
        self.values.iter().map(|t| log_odds > *t).collect()
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            values: DEFAULT_THRESHOLDS.to_vec(),
        }
    }
}
