//! Aggregate stage: per-card score tables in, survey summary tables out.

use crate::config::ClassConfig;
use crate::error::{Error, Result};
use crate::scores::{
    ThresholdSet, collect_score_tables, derive_clips, load_score_tables, summarize,
    write_summaries,
};
use chrono_tz::Tz;
use std::path::PathBuf;
use tracing::info;

/// Resolved inputs for one aggregate run.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Directory holding the per-card `preds_*.csv` tables.
    pub score_dir: PathBuf,
    /// Directory the summary tables are written into.
    pub output_dir: PathBuf,
    /// Log-odds detection thresholds.
    pub thresholds: ThresholdSet,
    /// Timezone the recorder clocks are interpreted in.
    pub timezone: Tz,
    /// Class column names expected in the score tables.
    pub classes: ClassConfig,
}

/// What an aggregate run read and wrote.
#[derive(Debug)]
pub struct AggregateReport {
    /// Score tables found.
    pub tables: usize,
    /// Score rows read across all tables.
    pub rows: usize,
    /// Summary files written, in the writer's fixed order.
    pub outputs: Vec<PathBuf>,
}

/// Run the aggregate stage.
///
/// Concatenates every score table under `score_dir`, derives per-clip
/// probabilities, log-odds, card ids and local start times, reduces those to
/// the five summary tables and writes them to `output_dir`. A row appearing
/// in more than one table is counted once per appearance.
pub fn run_aggregate(options: &AggregateOptions) -> Result<AggregateReport> {
    let tables = collect_score_tables(&options.score_dir)?;
    info!(
        "Aggregating {} score table(s) from {}",
        tables.len(),
        options.score_dir.display()
    );

    let rows = load_score_tables(&tables, &options.classes)?;
    if rows.is_empty() {
        return Err(Error::EmptyInput {
            what: "score rows".to_string(),
            path: options.score_dir.clone(),
        });
    }

    let clips = derive_clips(&rows, options.timezone)?;
    let summaries = summarize(&clips, &options.thresholds);
    let outputs = write_summaries(&summaries, &options.output_dir)?;

    info!(
        "Summarized {} clip(s) into {} table(s) under {}",
        clips.len(),
        outputs.len(),
        options.output_dir.display()
    );

    Ok(AggregateReport {
        tables: tables.len(),
        rows: rows.len(),
        outputs,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::recorder::lookup_timezone;

    fn options(score_dir: &std::path::Path, output_dir: &std::path::Path) -> AggregateOptions {
        AggregateOptions {
            score_dir: score_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            thresholds: ThresholdSet::new(vec![0.0, 5.0]).unwrap(),
            timezone: lookup_timezone("US/Pacific").unwrap(),
            classes: ClassConfig {
                positive: "ramu".to_string(),
                negative: "negative".to_string(),
            },
        }
    }

    #[test]
    fn test_run_aggregate_writes_all_summaries() {
        let dir = tempfile::tempdir().unwrap();
        let score_dir = dir.path().join("scores");
        std::fs::create_dir(&score_dir).unwrap();
        std::fs::write(
            score_dir.join("preds_SD_A012.csv"),
            "file,start_time,end_time,ramu,negative\n\
             SD_A012/20220620_213301.WAV,0.0,2.0,2.0,0.0\n\
             SD_A012/20220620_213301.WAV,2.0,4.0,-2.0,0.0\n",
        )
        .unwrap();

        let output_dir = dir.path().join("summaries");
        let report = run_aggregate(&options(&score_dir, &output_dir)).unwrap();

        assert_eq!(report.tables, 1);
        assert_eq!(report.rows, 2);
        assert_eq!(report.outputs.len(), 5);
        for path in &report.outputs {
            assert!(path.exists(), "missing {}", path.display());
        }

        let totals =
            std::fs::read_to_string(output_dir.join("total_detections_per_threshold.csv"))
                .unwrap();
        assert_eq!(totals, "threshold,count\nt_0,1\nt_5,0\n");
    }

    #[test]
    fn test_run_aggregate_header_only_tables_are_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let score_dir = dir.path().join("scores");
        std::fs::create_dir(&score_dir).unwrap();
        std::fs::write(
            score_dir.join("preds_SD_A012.csv"),
            "file,start_time,end_time,ramu,negative\n",
        )
        .unwrap();

        let result = run_aggregate(&options(&score_dir, &dir.path().join("out")));
        assert!(matches!(result, Err(Error::EmptyInput { .. })));
    }

    #[test]
    fn test_run_aggregate_missing_score_dir_is_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_aggregate(&options(
            &dir.path().join("nope"),
            &dir.path().join("out"),
        ));
        assert!(matches!(result, Err(Error::EmptyInput { .. })));
    }

    #[test]
    fn test_run_aggregate_bad_row_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let score_dir = dir.path().join("scores");
        std::fs::create_dir(&score_dir).unwrap();
        std::fs::write(
            score_dir.join("preds_SD_A012.csv"),
            "file,ramu,negative\nno_card_segment.WAV,1.0,0.0\n",
        )
        .unwrap();

        let output_dir = dir.path().join("summaries");
        let result = run_aggregate(&options(&score_dir, &output_dir));
        assert!(matches!(result, Err(Error::MalformedInput { .. })));
        assert!(!output_dir.exists());
    }
}
