//! Per-card score table reading and writing.

use crate::config::ClassConfig;
use crate::constants::SCORE_FILE_PREFIX;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// One classifier output row: a clip of one recording with its raw
/// (pre softmax) class scores.
#[derive(Debug, Clone, PartialEq)]
pub struct RawScore {
    /// Recording path as recorded in the table, `<...>/<card>/<file>`.
    pub file: String,
    /// Clip start offset in seconds, when the table carries one.
    pub start_time: Option<f64>,
    /// Clip end offset in seconds, when the table carries one.
    pub end_time: Option<f64>,
    /// Raw score for the positive class.
    pub positive: f64,
    /// Raw score for the negative class.
    pub negative: f64,
}

/// Render a float CSV field the way the score tables expect.
///
/// Integral values keep one decimal (`2.0` not `2`) so score and offset
/// columns stay visibly float-typed; counts elsewhere remain bare integers.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Read one score table.
///
/// Requires a `file` column plus one raw score column per class name.
/// `start_time`/`end_time` columns are carried through when present.
/// A header-only table yields an empty vec.
pub fn read_score_table(path: &Path, classes: &ClassConfig) -> Result<Vec<RawScore>> {
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

    let column = |name: &str| headers.iter().position(|h| h == name);
    let required = |name: &str| {
        column(name).ok_or_else(|| Error::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
    };

    let file_idx = required("file")?;
    let positive_idx = required(&classes.positive)?;
    let negative_idx = required(&classes.negative)?;
    let start_idx = column("start_time");
    let end_idx = column("end_time");

    let mut rows = Vec::new();

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

        let start_time = start_idx.map(|idx| float_field(idx, "start_time")).transpose()?;
        let end_time = end_idx.map(|idx| float_field(idx, "end_time")).transpose()?;

        rows.push(RawScore {
            file: field(file_idx, "file")?.to_string(),
            start_time,
            end_time,
            positive: float_field(positive_idx, &classes.positive)?,
            negative: float_field(negative_idx, &classes.negative)?,
        });
    }

    Ok(rows)
}

/// Write one score table with the standard column order.
pub fn write_score_table(path: &Path, rows: &[RawScore], classes: &ClassConfig) -> Result<()> {
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

    for row in rows {
        writer
            .write_record([
                row.file.clone(),
                row.start_time.map(format_float).unwrap_or_default(),
                row.end_time.map(format_float).unwrap_or_default(),
                format_float(row.positive),
                format_float(row.negative),
            ])
            .map_err(write_err)?;
    }

    writer.flush().map_err(|e| Error::CsvWrite {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })
}

/// Find all `preds_*.csv` score tables directly inside a directory.
///
/// Returns paths in filename order so concatenation is deterministic.
pub fn collect_score_tables(dir: &Path) -> Result<Vec<PathBuf>> {
    let empty = || Error::EmptyInput {
        what: format!("score tables ({SCORE_FILE_PREFIX}*.csv)"),
        path: dir.to_path_buf(),
    };

    if !dir.is_dir() {
        return Err(empty());
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(SCORE_FILE_PREFIX))
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();

    if paths.is_empty() {
        return Err(empty());
    }

    paths.sort();
    Ok(paths)
}

/// Concatenate score tables in the given order.
///
/// Rows are kept exactly as read; a recording that appears in several tables
/// is counted once per appearance, which overcounts detections if the same
/// card was scored twice into different tables.
pub fn load_score_tables(paths: &[PathBuf], classes: &ClassConfig) -> Result<Vec<RawScore>> {
    let mut rows = Vec::new();
    for path in paths {
        rows.extend(read_score_table(path, classes)?);
    }
    Ok(rows)
}
