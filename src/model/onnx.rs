//! ONNX inference session for exported call classifiers.
//!
//! A model ships as an ONNX graph plus a small TOML manifest describing the
//! input it expects. The graph takes raw waveform batches of shape
//! `[batch, samples]` and returns raw class scores of shape `[batch, 2]`;
//! spectrogram preprocessing is baked into the exported graph.

use crate::config::ClassConfig;
use crate::error::{Error, Result};
use crate::model::wav::{clip_windows, read_mono_samples};
use crate::model::{Classifier, Prediction};
use crate::scores::RawScore;
use ort::session::Session;
use ort::value::Tensor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Manifest describing one exported model.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ModelManifest {
    /// ONNX graph path, resolved relative to the manifest file.
    pub model: PathBuf,
    /// Class names in output order, positive first.
    pub classes: Vec<String>,
    /// Input sample rate in Hz.
    pub sample_rate: u32,
    /// Clip duration in seconds.
    pub clip_duration: f64,
}

impl ModelManifest {
    /// Read and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ManifestRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let manifest: Self = toml::from_str(&contents).map_err(|e| Error::ManifestParse {
            path: path.to_path_buf(),
            source: e,
        })?;

        if manifest.classes.len() != 2 {
            return Err(Error::ModelLoad {
                path: path.to_path_buf(),
                reason: format!(
                    "manifest must list exactly 2 classes, got {}",
                    manifest.classes.len()
                ),
            });
        }
        if manifest.sample_rate == 0 {
            return Err(Error::ModelLoad {
                path: path.to_path_buf(),
                reason: "sample_rate must be positive".to_string(),
            });
        }
        if !(manifest.clip_duration.is_finite() && manifest.clip_duration > 0.0) {
            return Err(Error::ModelLoad {
                path: path.to_path_buf(),
                reason: format!("clip_duration must be positive, got {}", manifest.clip_duration),
            });
        }

        Ok(manifest)
    }

    /// Resolve the ONNX graph path against the manifest's directory.
    pub fn resolve_model_path(&self, manifest_path: &Path) -> PathBuf {
        if self.model.is_absolute() {
            self.model.clone()
        } else {
            manifest_path
                .parent()
                .map_or_else(|| self.model.clone(), |dir| dir.join(&self.model))
        }
    }
}

/// One clip waiting in the current inference batch.
struct PendingClip {
    file: String,
    start_time: f64,
    end_time: f64,
    samples: Vec<f32>,
}

/// Classifier backed by an ONNX Runtime session.
pub struct OnnxClassifier {
    /// `Session::run` needs `&mut`, so the session sits behind a Mutex to
    /// keep `predict` callable through `&self`.
    session: Mutex<Session>,
    classes: ClassConfig,
    sample_rate: u32,
    clip_duration: f64,
    window_samples: usize,
}

impl OnnxClassifier {
    /// Load a model from its manifest.
    ///
    /// `workers` sets the session's intra-op thread count.
    pub fn load(manifest_path: &Path, workers: usize) -> Result<Self> {
        let manifest = ModelManifest::load(manifest_path)?;
        let model_path = manifest.resolve_model_path(manifest_path);

        if !model_path.exists() {
            return Err(Error::ModelFileNotFound { path: model_path });
        }

        let load_err = |e: ort::Error| Error::ModelLoad {
            path: model_path.clone(),
            reason: e.to_string(),
        };
        let session = Session::builder()
            .map_err(load_err)?
            .with_intra_threads(workers)
            .map_err(load_err)?
            .commit_from_file(&model_path)
            .map_err(load_err)?;

        debug!(
            model = %model_path.display(),
            sample_rate = manifest.sample_rate,
            clip_duration = manifest.clip_duration,
            "model loaded"
        );

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let window_samples =
            (manifest.clip_duration * f64::from(manifest.sample_rate)).round() as usize;

        Ok(Self {
            session: Mutex::new(session),
            classes: ClassConfig {
                positive: manifest.classes[0].clone(),
                negative: manifest.classes[1].clone(),
            },
            sample_rate: manifest.sample_rate,
            clip_duration: manifest.clip_duration,
            window_samples,
        })
    }

    /// Run one batch through the session, returning raw `(positive,
    /// negative)` score pairs in input order.
    fn run_batch(&self, batch: &[PendingClip]) -> Result<Vec<(f64, f64)>> {
        let rows = batch.len();
        let mut flat = Vec::with_capacity(rows * self.window_samples);
        for clip in batch {
            flat.extend_from_slice(&clip.samples);
        }

        #[allow(clippy::cast_possible_wrap)]
        let tensor = Tensor::from_array((
            vec![rows as i64, self.window_samples as i64],
            flat,
        ))
        .map_err(|e| Error::Inference {
            reason: format!("tensor creation error: {e}"),
        })?;

        let mut session = self.session.lock().map_err(|e| Error::Inference {
            reason: format!("session lock poisoned: {e}"),
        })?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| Error::Inference {
                reason: e.to_string(),
            })?;

        let (_name, output) = outputs.iter().next().ok_or_else(|| Error::Inference {
            reason: "no output tensor".to_string(),
        })?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference {
                reason: format!("tensor extraction failed: {e}"),
            })?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let shape_ok =
            shape.len() == 2 && shape[0] as usize == rows && shape[1] == 2;
        if !shape_ok {
            return Err(Error::Inference {
                reason: format!("unexpected output shape: {shape:?}"),
            });
        }

        Ok((0..rows)
            .map(|i| (f64::from(data[i * 2]), f64::from(data[i * 2 + 1])))
            .collect())
    }

    /// Score a full batch and append the rows to `scores`.
    fn flush_batch(&self, batch: &mut Vec<PendingClip>, scores: &mut Vec<RawScore>) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let pairs = self.run_batch(batch)?;
        for (clip, (positive, negative)) in batch.drain(..).zip(pairs) {
            scores.push(RawScore {
                file: clip.file,
                start_time: Some(clip.start_time),
                end_time: Some(clip.end_time),
                positive,
                negative,
            });
        }
        Ok(())
    }
}

impl Classifier for OnnxClassifier {
    fn classes(&self) -> &ClassConfig {
        &self.classes
    }

    fn predict(&self, files: &[PathBuf], batch_size: usize) -> Result<Prediction> {
        let batch_size = batch_size.max(1);
        let mut prediction = Prediction::default();
        let mut batch: Vec<PendingClip> = Vec::with_capacity(batch_size);

        for file in files {
            let samples = match read_mono_samples(file, self.sample_rate) {
                Ok(samples) => samples,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping unreadable recording");
                    prediction.unsafe_samples.push(file.clone());
                    continue;
                }
            };

            let windows = clip_windows(&samples, self.sample_rate, self.clip_duration);
            if windows.is_empty() {
                warn!(file = %file.display(), "recording shorter than one clip, skipping");
                prediction.unsafe_samples.push(file.clone());
                continue;
            }

            let file_name = file.to_string_lossy().into_owned();
            for window in windows {
                batch.push(PendingClip {
                    file: file_name.clone(),
                    start_time: window.start_time,
                    end_time: window.end_time,
                    samples: window.samples,
                });
                if batch.len() == batch_size {
                    self.flush_batch(&mut batch, &mut prediction.scores)?;
                }
            }
        }

        self.flush_batch(&mut batch, &mut prediction.scores)?;
        Ok(prediction)
    }
}
