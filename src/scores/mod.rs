//! Score tables and detection summaries.
//!
//! A score table is one CSV per card holding the classifier's raw (pre
//! softmax) outputs for every clip. This module reads those tables, converts
//! raw scores to probabilities and log-odds, applies detection thresholds,
//! and reduces the result to the survey summary tables.

mod clip;
mod stats;
mod summary;
mod table;
mod thresholds;
mod writer;

pub(crate) use table::format_float;

pub use clip::{ScoredClip, derive_clip, derive_clips};
pub use stats::{log_odds, softmax_pair};
pub use summary::{SummaryTables, summarize};
pub use table::{RawScore, collect_score_tables, load_score_tables, read_score_table, write_score_table};
pub use thresholds::ThresholdSet;
pub use writer::write_summaries;
