//! Label table reading and writing.

use crate::config::ClassConfig;
use crate::error::{Error, Result};
use crate::scores::format_float;
use std::path::Path;

/// One human-annotated training clip.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledClip {
    /// Recording path.
    pub file: String,
    /// Clip start offset in seconds.
    pub start_time: f64,
    /// Clip end offset in seconds.
    pub end_time: f64,
    /// Whether the target call is present in the clip.
    pub present: bool,
}

/// Read a label table.
///
/// Requires `file`, `start_time`, `end_time` and one 0/1 column named after
/// the positive class. An empty table is an error: there is nothing to
/// train on.
#[allow(clippy::float_cmp)]
pub fn read_label_table(path: &Path, positive_class: &str) -> Result<Vec<LabeledClip>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let headers = reader
        .headers()
        .map_err(|e| Error::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .clone();

    let required = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };

    let file_idx = required("file")?;
    let start_idx = required("start_time")?;
    let end_idx = required("end_time")?;
    let label_idx = required(positive_class)?;

    let mut clips = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        let record = result.map_err(|e| Error::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let field = |idx: usize, name: &str| {
            record.get(idx).ok_or_else(|| Error::MalformedInput {
                path: path.to_path_buf(),
                message: format!("line {}: missing '{name}' field", line_num + 2),
            })
        };
        let float_field = |idx: usize, name: &str| {
            field(idx, name).and_then(|raw| {
                raw.parse::<f64>().map_err(|_| Error::MalformedInput {
                    path: path.to_path_buf(),
                    message: format!("line {}: '{raw}' is not a valid {name} value", line_num + 2),
                })
            })
        };

        let present = match float_field(label_idx, positive_class)? {
            v if v == 0.0 => false,
            v if v == 1.0 => true,
            other => {
                return Err(Error::MalformedInput {
                    path: path.to_path_buf(),
                    message: format!(
                        "line {}: label must be 0 or 1, got {other}",
                        line_num + 2
                    ),
                });
            }
        };

        clips.push(LabeledClip {
            file: field(file_idx, "file")?.to_string(),
            start_time: float_field(start_idx, "start_time")?,
            end_time: float_field(end_idx, "end_time")?,
            present,
        });
    }

    if clips.is_empty() {
        return Err(Error::EmptyInput {
            what: "labeled clips".to_string(),
            path: path.to_path_buf(),
        });
    }

    Ok(clips)
}

/// Write a label table with both class columns.
///
/// The negative column is derived as `1 - <positive>`, which is the layout
/// the training backend expects.
pub fn write_label_table(path: &Path, clips: &[LabeledClip], classes: &ClassConfig) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| Error::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    let write_err = |e: csv::Error| Error::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    };

    writer
        .write_record([
            "file",
            "start_time",
            "end_time",
            classes.positive.as_str(),
            classes.negative.as_str(),
        ])
        .map_err(write_err)?;

    for clip in clips {
        let label = u8::from(clip.present);
        writer
            .write_record([
                clip.file.clone(),
                format_float(clip.start_time),
                format_float(clip.end_time),
                label.to_string(),
                (1 - label).to_string(),
            ])
            .map_err(write_err)?;
    }

    writer.flush().map_err(|e| Error::CsvWrite {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })
}
