//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::recorder::lookup_timezone;
use crate::scores::ThresholdSet;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_project(config)?;
    validate_classes(config)?;
    validate_train(config)?;
    validate_predict(config)?;
    validate_aggregate(config)?;
    Ok(())
}

/// Validate survey-wide settings.
fn validate_project(config: &Config) -> Result<()> {
    lookup_timezone(&config.project.timezone)?;
    Ok(())
}

/// Validate class names.
fn validate_classes(config: &Config) -> Result<()> {
    let classes = &config.classes;

    if classes.positive.is_empty() || classes.negative.is_empty() {
        return Err(Error::ConfigValidation {
            message: "class names must not be empty".to_string(),
        });
    }

    if classes.positive == classes.negative {
        return Err(Error::ConfigValidation {
            message: format!(
                "positive and negative classes must differ, both are '{}'",
                classes.positive
            ),
        });
    }

    Ok(())
}

/// Validate training stage settings.
fn validate_train(config: &Config) -> Result<()> {
    let train = &config.train;

    if !(train.sample_duration.is_finite() && train.sample_duration > 0.0) {
        return Err(Error::ConfigValidation {
            message: format!(
                "train.sample_duration must be positive, got {}",
                train.sample_duration
            ),
        });
    }

    if train.epochs == 0 {
        return Err(Error::ConfigValidation {
            message: "train.epochs must be at least 1".to_string(),
        });
    }

    if train.batch_size == 0 {
        return Err(Error::ConfigValidation {
            message: "train.batch_size must be at least 1".to_string(),
        });
    }

    if !(train.learning_rate.is_finite() && train.learning_rate > 0.0) {
        return Err(Error::ConfigValidation {
            message: format!(
                "train.learning_rate must be positive, got {}",
                train.learning_rate
            ),
        });
    }

    let pre = &train.preprocess;

    if !(pre.bandpass_min_hz >= 0.0 && pre.bandpass_min_hz < pre.bandpass_max_hz) {
        return Err(Error::ConfigValidation {
            message: format!(
                "bandpass cutoffs must satisfy 0 <= min < max, got {} and {}",
                pre.bandpass_min_hz, pre.bandpass_max_hz
            ),
        });
    }

    for (name, width) in [
        ("frequency_mask_width", pre.frequency_mask_width),
        ("time_mask_width", pre.time_mask_width),
    ] {
        if !(width > 0.0 && width <= 1.0) {
            return Err(Error::ConfigValidation {
                message: format!("train.preprocess.{name} must be in (0, 1], got {width}"),
            });
        }
    }

    if !(pre.noise_std.is_finite() && pre.noise_std >= 0.0) {
        return Err(Error::ConfigValidation {
            message: format!(
                "train.preprocess.noise_std must be non-negative, got {}",
                pre.noise_std
            ),
        });
    }

    Ok(())
}

/// Validate prediction stage settings.
fn validate_predict(config: &Config) -> Result<()> {
    if config.predict.batch_size == 0 {
        return Err(Error::ConfigValidation {
            message: "predict.batch_size must be at least 1".to_string(),
        });
    }

    if config.predict.workers == 0 {
        return Err(Error::ConfigValidation {
            message: "predict.workers must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate aggregation stage settings.
fn validate_aggregate(config: &Config) -> Result<()> {
    // ThresholdSet::new enforces the non-empty, finite, strictly increasing rules.
    ThresholdSet::new(config.aggregate.thresholds.clone())?;
    Ok(())
}
