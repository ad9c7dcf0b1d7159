//! Train stage: load clip tables, balance classes, hand off to the learner.

use crate::error::{Error, Result};
use crate::labels::{balance_classes, read_label_table};
use crate::model::{Learner, TrainReport, TrainSpec};
use crate::tracking::TrackingSession;
use std::path::PathBuf;
use tracing::info;

/// Resolved inputs for one train run.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Labeled training clip table.
    pub train_table: PathBuf,
    /// Labeled validation clip table.
    pub val_table: PathBuf,
    /// Assembled contract for the training backend.
    pub spec: TrainSpec,
}

/// Run the train stage.
///
/// Loads both clip tables, balances the training classes by upsampling, logs
/// the dataset shape and spec to the tracking session and delegates the run
/// to the learner. Validation clips are passed through unbalanced.
pub fn run_train(
    learner: &mut dyn Learner,
    options: &TrainOptions,
    session: &mut dyn TrackingSession,
) -> Result<TrainReport> {
    let positive = options.spec.classes.positive.clone();
    let train = read_label_table(&options.train_table, &positive)?;
    let val = read_label_table(&options.val_table, &positive)?;

    let balanced = balance_classes(&train)?;
    info!(
        "Loaded {} training clip(s) ({} after balancing) and {} validation clip(s)",
        train.len(),
        balanced.len(),
        val.len()
    );

    session.log(
        "dataset_loaded",
        serde_json::json!({
            "train_rows": train.len(),
            "balanced_rows": balanced.len(),
            "val_rows": val.len(),
        }),
    )?;
    session.log(
        "train_spec",
        serde_json::to_value(&options.spec)
            .map_err(|e| Error::TrackingSerialize { source: e })?,
    )?;

    let report = learner.train(&options.spec, &balanced, &val, session)?;
    session.finish()?;

    info!("{}", report.summary);
    Ok(report)
}
