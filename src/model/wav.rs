//! WAV reading and fixed-length clip windowing.

use crate::error::{Error, Result};
use std::path::Path;

/// A fixed-length window of audio with its time offset.
#[derive(Debug, Clone)]
pub struct ClipWindow {
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
    /// Mono samples, exactly one clip long.
    pub samples: Vec<f32>,
}

/// Read a WAV file as mono f32 samples at the model's input rate.
///
/// The sample rate must match exactly; resampling in the survey pipeline
/// would change the scores relative to the rate the model was trained at.
/// Multi-channel recordings are mixed down by averaging channels.
pub fn read_mono_samples(path: &Path, expected_rate: u32) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(path).map_err(|e| Error::AudioOpen {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    let spec = reader.spec();

    if spec.sample_rate != expected_rate {
        return Err(Error::SampleRateMismatch {
            path: path.to_path_buf(),
            expected: expected_rate,
            actual: spec.sample_rate,
        });
    }

    let read_err = |e: hound::Error| Error::AudioOpen {
        path: path.to_path_buf(),
        source: Box::new(e),
    };

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(read_err)?,
        hound::SampleFormat::Int => {
            #[allow(clippy::cast_precision_loss)]
            let scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            #[allow(clippy::cast_precision_loss)]
            let converted: std::result::Result<Vec<f32>, hound::Error> = reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect();
            converted.map_err(read_err)?
        }
    };

    let channels = usize::from(spec.channels);
    if channels <= 1 {
        return Ok(samples);
    }

    #[allow(clippy::cast_precision_loss)]
    let mixed = samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();
    Ok(mixed)
}

/// Split samples into consecutive non-overlapping clip windows.
///
/// Only full windows are kept; a trailing remainder shorter than one clip
/// is dropped, never padded, so every scored clip covers real audio.
pub fn clip_windows(samples: &[f32], sample_rate: u32, clip_duration: f64) -> Vec<ClipWindow> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let window_samples = (clip_duration * f64::from(sample_rate)).round() as usize;
    if window_samples == 0 {
        return Vec::new();
    }

    let mut windows = Vec::new();
    let mut pos = 0;
    let mut index = 0u32;

    while pos + window_samples <= samples.len() {
        let start_time = f64::from(index) * clip_duration;
        windows.push(ClipWindow {
            start_time,
            end_time: start_time + clip_duration,
            samples: samples[pos..pos + window_samples].to_vec(),
        });
        pos += window_samples;
        index += 1;
    }

    windows
}
