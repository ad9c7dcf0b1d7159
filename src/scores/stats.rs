//! Score transforms: softmax and log-odds.

use crate::error::{Error, Result};

/// Convert a raw score pair to the positive-class probability.
///
/// Two-class softmax computed against the row maximum so that large raw
/// scores cannot overflow. Equal raw scores give exactly 0.5.
pub fn softmax_pair(positive: f64, negative: f64) -> Result<f64> {
    if !positive.is_finite() || !negative.is_finite() {
        return Err(Error::Domain {
            message: format!("raw scores must be finite, got ({positive}, {negative})"),
        });
    }

    let max = positive.max(negative);
    let exp_pos = (positive - max).exp();
    let exp_neg = (negative - max).exp();
    Ok(exp_pos / (exp_pos + exp_neg))
}

/// Convert a probability to log-odds (logit).
///
/// Probabilities of exactly 0 or 1 have no finite log-odds and are reported
/// as [`Error::Domain`] rather than clamped.
pub fn log_odds(probability: f64) -> Result<f64> {
    if !(probability > 0.0 && probability < 1.0) {
        return Err(Error::Domain {
            message: format!("probability {probability} has no finite log-odds"),
        });
    }
    Ok((probability / (1.0 - probability)).ln())
}
