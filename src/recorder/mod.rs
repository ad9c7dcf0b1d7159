//! Field recorder conventions: filename timestamps and card directory layout.
//!
//! `AudioMoth` recorders name each WAV after its start time and surveys arrange
//! recordings as one directory per SD card. Everything the summaries know
//! about *when* and *where* a clip was recorded is recovered from the file
//! path alone.

mod card;
mod timestamp;

pub use card::card_from_path;
pub use timestamp::{LocalClipStart, audiomoth_start_time, local_clip_start, lookup_timezone};
