//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "anura";

/// Configuration filename inside the per-user config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default IANA timezone for converting recorder timestamps to local time.
pub const DEFAULT_TIMEZONE: &str = "US/Pacific";

/// Default log-odds detection thresholds.
///
/// Detection counts are reported once per threshold, so the summaries show
/// how sensitive the survey totals are to the chosen cutoff. The 7.313 entry
/// corresponds to a call probability of 99.93%.
pub const DEFAULT_THRESHOLDS: [f64; 6] = [2.0, 4.0, 6.0, 7.313, 8.0, 10.0];

/// Default positive (target call) class name.
pub const DEFAULT_POSITIVE_CLASS: &str = "positive";

/// Default negative class name.
pub const DEFAULT_NEGATIVE_CLASS: &str = "negative";

/// Filename prefix for per-card score tables (`preds_<card>.csv`).
pub const SCORE_FILE_PREFIX: &str = "preds_";

/// Column label prefix for per-threshold detection columns (`t_<threshold>`).
pub const THRESHOLD_LABEL_PREFIX: &str = "t_";

/// Summary table filenames written by the aggregate stage.
pub mod summary_filenames {
    /// Detection totals per threshold over the whole survey.
    pub const TOTALS: &str = "total_detections_per_threshold.csv";
    /// Detection counts per calendar date.
    pub const BY_DATE: &str = "detections_by_date.csv";
    /// Mean detection rate per (card, date) pair.
    pub const BY_CARD_AND_DATE: &str = "dvar_by_card_and_date.csv";
    /// Detection counts per time of day.
    pub const BY_TIME: &str = "detections_by_time.csv";
    /// Mean detection rate per time of day.
    pub const MEAN_BY_TIME: &str = "dvar_by_time.csv";
}

/// Training stage defaults.
pub mod train_defaults {
    /// CNN architecture requested from the training backend.
    pub const ARCHITECTURE: &str = "resnet18";
    /// Clip duration in seconds for training samples.
    pub const SAMPLE_DURATION: f64 = 2.0;
    /// Number of training epochs.
    pub const EPOCHS: u32 = 20;
    /// Training batch size.
    pub const BATCH_SIZE: usize = 128;
    /// Data loader worker count.
    pub const WORKERS: usize = 12;
    /// Optimizer learning rate.
    pub const LEARNING_RATE: f64 = 0.002;
    /// Checkpoint save interval in epochs.
    pub const SAVE_INTERVAL: u32 = 1;
    /// Metric log interval in batches.
    pub const LOG_INTERVAL: u32 = 10;
    /// Validation interval in epochs.
    pub const VALIDATION_INTERVAL: u32 = 1;
}

/// Spectrogram preprocessing defaults for the training stage.
pub mod preprocess_defaults {
    /// Bandpass low cutoff in Hz.
    pub const BANDPASS_MIN_HZ: f64 = 300.0;
    /// Bandpass high cutoff in Hz.
    pub const BANDPASS_MAX_HZ: f64 = 2000.0;
    /// Maximum number of frequency masks per sample.
    pub const FREQUENCY_MASK_COUNT: u32 = 5;
    /// Maximum frequency mask width as a fraction of the axis.
    pub const FREQUENCY_MASK_WIDTH: f64 = 0.1;
    /// Maximum number of time masks per sample.
    pub const TIME_MASK_COUNT: u32 = 5;
    /// Maximum time mask width as a fraction of the axis.
    pub const TIME_MASK_WIDTH: f64 = 0.1;
    /// Standard deviation of additive Gaussian noise.
    pub const NOISE_STD: f64 = 0.01;
}

/// Prediction stage defaults.
pub mod predict_defaults {
    /// Inference batch size in clips.
    pub const BATCH_SIZE: usize = 1024;
    /// Intra-op thread count for the inference session.
    pub const WORKERS: usize = 12;
}

/// Filenames inside a staged training bundle.
pub mod bundle_filenames {
    /// Balanced training table.
    pub const TRAIN: &str = "train.csv";
    /// Validation table (never balanced).
    pub const VAL: &str = "val.csv";
    /// Training spec manifest consumed by the training backend.
    pub const SPEC: &str = "spec.toml";
}
