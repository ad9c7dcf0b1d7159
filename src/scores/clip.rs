//! Per-clip derived values: card, local date and time, probability, log-odds.

use crate::error::{Error, Result};
use crate::recorder::{card_from_path, local_clip_start};
use crate::scores::table::RawScore;
use crate::scores::{log_odds, softmax_pair};
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use std::path::Path;

/// A scored clip with everything the summaries group by.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredClip {
    /// Recording path as read from the score table.
    pub file: String,
    /// SD card the recording came from.
    pub card: String,
    /// Local calendar date of the recording start.
    pub date: NaiveDate,
    /// Local wall-clock start time, truncated to the minute.
    pub time: NaiveTime,
    /// Positive-class probability after softmax.
    pub probability: f64,
    /// Log-odds of the positive class.
    pub log_odds: f64,
}

/// Derive the groupable clip values from one raw score row.
pub fn derive_clip(raw: &RawScore, tz: Tz) -> Result<ScoredClip> {
    let card = card_from_path(&raw.file)?;
    let start = local_clip_start(Path::new(&raw.file), tz)?;
    let probability = softmax_pair(raw.positive, raw.negative)?;
    let log_odds = log_odds(probability).map_err(|e| match e {
        Error::Domain { message } => Error::Domain {
            message: format!("{message} (from '{}')", raw.file),
        },
        other => other,
    })?;

    Ok(ScoredClip {
        file: raw.file.clone(),
        card,
        date: start.date,
        time: start.time,
        probability,
        log_odds,
    })
}

/// Derive clips for a whole table, failing on the first bad row.
pub fn derive_clips(rows: &[RawScore], tz: Tz) -> Result<Vec<ScoredClip>> {
    rows.iter().map(|raw| derive_clip(raw, tz)).collect()
}
