//! Configuration type definitions.

use crate::constants::{
    DEFAULT_NEGATIVE_CLASS, DEFAULT_POSITIVE_CLASS, DEFAULT_THRESHOLDS, DEFAULT_TIMEZONE,
    predict_defaults, preprocess_defaults, train_defaults,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Survey-wide settings.
    #[serde(default)]
    pub project: ProjectConfig,

    /// Score class names.
    #[serde(default)]
    pub classes: ClassConfig,

    /// Inference model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Training stage settings.
    #[serde(default)]
    pub train: TrainConfig,

    /// Prediction stage settings.
    #[serde(default)]
    pub predict: PredictConfig,

    /// Aggregation stage settings.
    #[serde(default)]
    pub aggregate: AggregateConfig,
}

/// Survey-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project name used for tracking runs.
    pub name: String,

    /// IANA timezone the recorders were deployed in.
    ///
    /// Recorder filenames encode UTC; dates and times in the summaries are
    /// reported in this zone.
    pub timezone: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "survey".to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

/// Names of the two score classes.
///
/// Score tables carry one column per class; the positive class is the
/// species call being surveyed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassConfig {
    /// Positive (target call) class name.
    pub positive: String,

    /// Negative class name.
    pub negative: String,
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            positive: DEFAULT_POSITIVE_CLASS.to_string(),
            negative: DEFAULT_NEGATIVE_CLASS.to_string(),
        }
    }
}

/// Inference model settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the model manifest TOML.
    pub manifest: Option<PathBuf>,
}

/// Training stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// CNN architecture requested from the training backend.
    pub architecture: String,

    /// Clip duration in seconds.
    pub sample_duration: f64,

    /// Number of epochs.
    pub epochs: u32,

    /// Batch size.
    pub batch_size: usize,

    /// Data loader worker count.
    pub workers: usize,

    /// Optimizer learning rate.
    pub learning_rate: f64,

    /// Checkpoint save interval in epochs.
    pub save_interval: u32,

    /// Metric log interval in batches.
    pub log_interval: u32,

    /// Validation interval in epochs.
    pub validation_interval: u32,

    /// Directory where the training bundle and checkpoints are staged.
    pub checkpoint_dir: Option<PathBuf>,

    /// Spectrogram preprocessing settings.
    #[serde(default)]
    pub preprocess: PreprocessConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            architecture: train_defaults::ARCHITECTURE.to_string(),
            sample_duration: train_defaults::SAMPLE_DURATION,
            epochs: train_defaults::EPOCHS,
            batch_size: train_defaults::BATCH_SIZE,
            workers: train_defaults::WORKERS,
            learning_rate: train_defaults::LEARNING_RATE,
            save_interval: train_defaults::SAVE_INTERVAL,
            log_interval: train_defaults::LOG_INTERVAL,
            validation_interval: train_defaults::VALIDATION_INTERVAL,
            checkpoint_dir: None,
            preprocess: PreprocessConfig::default(),
        }
    }
}

/// Spectrogram preprocessing settings for training samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Bandpass low cutoff in Hz.
    pub bandpass_min_hz: f64,

    /// Bandpass high cutoff in Hz.
    pub bandpass_max_hz: f64,

    /// Maximum number of frequency masks per sample.
    pub frequency_mask_count: u32,

    /// Maximum frequency mask width as a fraction of the axis.
    pub frequency_mask_width: f64,

    /// Maximum number of time masks per sample.
    pub time_mask_count: u32,

    /// Maximum time mask width as a fraction of the axis.
    pub time_mask_width: f64,

    /// Standard deviation of additive Gaussian noise.
    pub noise_std: f64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            bandpass_min_hz: preprocess_defaults::BANDPASS_MIN_HZ,
            bandpass_max_hz: preprocess_defaults::BANDPASS_MAX_HZ,
            frequency_mask_count: preprocess_defaults::FREQUENCY_MASK_COUNT,
            frequency_mask_width: preprocess_defaults::FREQUENCY_MASK_WIDTH,
            time_mask_count: preprocess_defaults::TIME_MASK_COUNT,
            time_mask_width: preprocess_defaults::TIME_MASK_WIDTH,
            noise_std: preprocess_defaults::NOISE_STD,
        }
    }
}

/// Prediction stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    /// Inference batch size in clips.
    pub batch_size: usize,

    /// Intra-op thread count for the inference session.
    pub workers: usize,

    /// Only process cards whose directory name contains this substring.
    pub card_filter: Option<String>,

    /// Directory where per-card score tables are written.
    pub score_dir: Option<PathBuf>,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            batch_size: predict_defaults::BATCH_SIZE,
            workers: predict_defaults::WORKERS,
            card_filter: None,
            score_dir: None,
        }
    }
}

/// Aggregation stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Log-odds detection thresholds, strictly increasing.
    pub thresholds: Vec<f64>,

    /// Directory containing per-card score tables.
    pub score_dir: Option<PathBuf>,

    /// Directory where summary tables are written.
    pub output_dir: Option<PathBuf>,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            score_dir: None,
            output_dir: None,
        }
    }
}
