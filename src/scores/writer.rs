//! Summary table CSV output.

use crate::constants::summary_filenames;
use crate::error::{Error, Result};
use crate::scores::summary::SummaryTables;
use crate::scores::table::format_float;
use std::path::{Path, PathBuf};

/// Write all five summary tables into a directory, overwriting any
/// previous run.
///
/// Returns the written paths in a fixed order: totals, by date, by card and
/// date, by time, mean by time.
pub fn write_summaries(tables: &SummaryTables, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let totals = dir.join(summary_filenames::TOTALS);
    write_totals(tables, &totals)?;

    let by_date = dir.join(summary_filenames::BY_DATE);
    write_keyed_counts(
        &by_date,
        "date",
        &tables.threshold_labels,
        tables.by_date.iter().map(|(date, counts)| (date.to_string(), counts)),
    )?;

    let by_card_and_date = dir.join(summary_filenames::BY_CARD_AND_DATE);
    write_card_date_means(tables, &by_card_and_date)?;

    let by_time = dir.join(summary_filenames::BY_TIME);
    write_keyed_counts(
        &by_time,
        "time",
        &tables.threshold_labels,
        tables.by_time.iter().map(|(time, counts)| (time.to_string(), counts)),
    )?;

    let mean_by_time = dir.join(summary_filenames::MEAN_BY_TIME);
    write_keyed_means(
        &mean_by_time,
        "time",
        &tables.threshold_labels,
        tables.mean_by_time.iter().map(|(time, means)| (time.to_string(), means)),
    )?;

    Ok(vec![totals, by_date, by_card_and_date, by_time, mean_by_time])
}

fn csv_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    csv::Writer::from_path(path).map_err(|e| Error::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn finish(mut writer: csv::Writer<std::fs::File>, path: &Path) -> Result<()> {
    writer.flush().map_err(|e| Error::CsvWrite {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })
}

/// One row per threshold: `threshold,count`.
fn write_totals(tables: &SummaryTables, path: &Path) -> Result<()> {
    let mut writer = csv_writer(path)?;
    let write_err = |e: csv::Error| Error::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    };

    writer.write_record(["threshold", "count"]).map_err(write_err)?;
    for (label, count) in tables.threshold_labels.iter().zip(&tables.totals) {
        writer
            .write_record([label.as_str(), &count.to_string()])
            .map_err(write_err)?;
    }
    finish(writer, path)
}

/// One row per group key with integer detection counts.
fn write_keyed_counts<'a>(
    path: &Path,
    key_column: &str,
    labels: &[String],
    rows: impl Iterator<Item = (String, &'a Vec<u64>)>,
) -> Result<()> {
    let mut writer = csv_writer(path)?;
    let write_err = |e: csv::Error| Error::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let mut header = vec![key_column.to_string()];
    header.extend(labels.iter().cloned());
    writer.write_record(&header).map_err(write_err)?;

    for (key, counts) in rows {
        let mut record = vec![key];
        record.extend(counts.iter().map(u64::to_string));
        writer.write_record(&record).map_err(write_err)?;
    }
    finish(writer, path)
}

/// One row per group key with mean detection rates.
fn write_keyed_means<'a>(
    path: &Path,
    key_column: &str,
    labels: &[String],
    rows: impl Iterator<Item = (String, &'a Vec<f64>)>,
) -> Result<()> {
    let mut writer = csv_writer(path)?;
    let write_err = |e: csv::Error| Error::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let mut header = vec![key_column.to_string()];
    header.extend(labels.iter().cloned());
    writer.write_record(&header).map_err(write_err)?;

    for (key, means) in rows {
        let mut record = vec![key];
        record.extend(means.iter().map(|m| format_float(*m)));
        writer.write_record(&record).map_err(write_err)?;
    }
    finish(writer, path)
}

/// `card,date` keyed means.
fn write_card_date_means(tables: &SummaryTables, path: &Path) -> Result<()> {
    let mut writer = csv_writer(path)?;
    let write_err = |e: csv::Error| Error::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let mut header = vec!["card".to_string(), "date".to_string()];
    header.extend(tables.threshold_labels.iter().cloned());
    writer.write_record(&header).map_err(write_err)?;

    for ((card, date), means) in &tables.by_card_and_date {
        let mut record = vec![card.clone(), date.to_string()];
        record.extend(means.iter().map(|m| format_float(*m)));
        writer.write_record(&record).map_err(write_err)?;
    }
    finish(writer, path)
}
