//! Model seams: the classifier used for inference and the learner used for
//! training.
//!
//! The CNN itself is an external artifact. Inference runs exported ONNX
//! graphs through [`OnnxClassifier`]; training is staged as a reproducible
//! bundle by [`BundleLearner`] and executed by the training backend that
//! owns the GPU. Both seams are traits so the pipeline stages can be tested
//! without a model on disk.

mod bundle;
mod onnx;
mod wav;

pub use bundle::BundleLearner;
pub use onnx::{ModelManifest, OnnxClassifier};
pub use wav::{ClipWindow, clip_windows, read_mono_samples};

use crate::config::{ClassConfig, PreprocessConfig};
use crate::error::Result;
use crate::labels::LabeledClip;
use crate::scores::RawScore;
use crate::tracking::TrackingSession;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output of one prediction run over a set of recordings.
#[derive(Debug, Clone, Default)]
pub struct Prediction {
    /// One raw score row per full clip window.
    pub scores: Vec<RawScore>,
    /// Recordings that could not be scored (unreadable, wrong sample rate,
    /// or shorter than one clip).
    pub unsafe_samples: Vec<PathBuf>,
}

/// A model that scores recordings clip by clip.
pub trait Classifier {
    /// Class pair this model scores.
    fn classes(&self) -> &ClassConfig;

    /// Score every full clip window of each recording.
    ///
    /// Recordings that cannot be scored are reported in
    /// [`Prediction::unsafe_samples`] instead of failing the run.
    fn predict(&self, files: &[PathBuf], batch_size: usize) -> Result<Prediction>;
}

/// Everything the training backend needs to reproduce one training run.
///
/// Scalar fields come first so the staged `spec.toml` reads top-down before
/// the `[classes]` and `[preprocess]` tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainSpec {
    /// CNN architecture name.
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
    /// Directory for the staged bundle and checkpoints.
    pub save_path: PathBuf,
    /// Checkpoint save interval in epochs.
    pub save_interval: u32,
    /// Metric log interval in batches.
    pub log_interval: u32,
    /// Validation interval in epochs.
    pub validation_interval: u32,
    /// Class pair, positive first.
    pub classes: ClassConfig,
    /// Spectrogram preprocessing settings.
    pub preprocess: PreprocessConfig,
}

/// Result of one training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Files the run produced.
    pub artifacts: Vec<PathBuf>,
    /// One-line human summary.
    pub summary: String,
}

/// A training backend.
pub trait Learner {
    /// Train on balanced clips, validating against `val`.
    fn train(
        &mut self,
        spec: &TrainSpec,
        train: &[LabeledClip],
        val: &[LabeledClip],
        session: &mut dyn TrackingSession,
    ) -> Result<TrainReport>;
}
