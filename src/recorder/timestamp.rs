//! `AudioMoth` filename timestamp parsing.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use std::path::Path;

/// Filename format used by `AudioMoth` firmware 1.4+ (`20220620_213301.WAV`).
const DATETIME_STEM_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Parse the recording start time encoded in an `AudioMoth` filename.
///
/// Older firmware names files with eight hex digits holding the Unix
/// timestamp (`5E92B380.WAV`); newer firmware uses a readable
/// `YYYYMMDD_HHMMSS` stem. Both encode UTC. Eight-character stems are
/// always tried as hex first, matching the recorder's own convention.
pub fn audiomoth_start_time(path: &Path) -> Result<DateTime<Utc>> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::MalformedInput {
            path: path.to_path_buf(),
            message: "filename is not valid UTF-8".to_string(),
        })?;

    if stem.len() == 8 && stem.chars().all(|c| c.is_ascii_hexdigit()) {
        let seconds = u32::from_str_radix(stem, 16).map_err(|e| Error::MalformedInput {
            path: path.to_path_buf(),
            message: format!("invalid hex timestamp '{stem}': {e}"),
        })?;
        return DateTime::from_timestamp(i64::from(seconds), 0).ok_or_else(|| {
            Error::MalformedInput {
                path: path.to_path_buf(),
                message: format!("hex timestamp '{stem}' is out of range"),
            }
        });
    }

    NaiveDateTime::parse_from_str(stem, DATETIME_STEM_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| Error::MalformedInput {
            path: path.to_path_buf(),
            message: format!(
                "file stem '{stem}' is neither an 8-digit hex timestamp nor YYYYMMDD_HHMMSS"
            ),
        })
}

/// Look up an IANA timezone by name.
pub fn lookup_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| Error::UnknownTimezone {
        name: name.to_string(),
    })
}

/// Recording start in survey-local civil time, truncated to the minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClipStart {
    /// Local calendar date.
    pub date: NaiveDate,
    /// Local wall-clock time with seconds zeroed.
    pub time: NaiveTime,
}

/// Resolve a recording's local date and minute-of-day from its filename.
///
/// Seconds are zeroed so that recordings from the same scheduled minute
/// group together even when recorder clocks drift by a few seconds.
pub fn local_clip_start(path: &Path, tz: Tz) -> Result<LocalClipStart> {
    let utc = audiomoth_start_time(path)?;
    let local = utc.with_timezone(&tz);
    let time = local.time();
    Ok(LocalClipStart {
        date: local.date_naive(),
        time: time.with_second(0).unwrap_or(time),
    })
}
