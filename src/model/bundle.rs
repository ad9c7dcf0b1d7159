//! Training bundle staging.
//!
//! The CNN is trained by a GPU-side backend, not in-process. This learner
//! stages everything that backend needs as one directory: the balanced
//! training table, the untouched validation table, and the full training
//! spec as TOML.

use crate::constants::bundle_filenames;
use crate::error::{Error, Result};
use crate::labels::{LabeledClip, write_label_table};
use crate::model::{Learner, TrainReport, TrainSpec};
use crate::tracking::TrackingSession;
use tracing::info;

/// Learner that writes a training bundle for the external backend.
#[derive(Debug, Default)]
pub struct BundleLearner;

impl Learner for BundleLearner {
    fn train(
        &mut self,
        spec: &TrainSpec,
        train: &[LabeledClip],
        val: &[LabeledClip],
        session: &mut dyn TrackingSession,
    ) -> Result<TrainReport> {
        std::fs::create_dir_all(&spec.save_path)?;

        let train_path = spec.save_path.join(bundle_filenames::TRAIN);
        write_label_table(&train_path, train, &spec.classes)?;

        let val_path = spec.save_path.join(bundle_filenames::VAL);
        write_label_table(&val_path, val, &spec.classes)?;

        let spec_path = spec.save_path.join(bundle_filenames::SPEC);
        let contents =
            toml::to_string_pretty(spec).map_err(|e| Error::ConfigSerialize { source: e })?;
        std::fs::write(&spec_path, contents)?;

        session.log(
            "bundle_staged",
            serde_json::json!({
                "dir": spec.save_path,
                "train_rows": train.len(),
                "val_rows": val.len(),
                "epochs": spec.epochs,
                "architecture": spec.architecture,
            }),
        )?;
        info!(dir = %spec.save_path.display(), "training bundle staged");

        Ok(TrainReport {
            artifacts: vec![train_path, val_path, spec_path],
            summary: format!("staged training bundle in '{}'", spec.save_path.display()),
        })
    }
}
