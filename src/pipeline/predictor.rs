//! Predict stage: run the classifier over every card in a dataset.

use crate::constants::SCORE_FILE_PREFIX;
use crate::error::{Error, Result};
use crate::model::Classifier;
use crate::pipeline::progress;
use crate::scores::write_score_table;
use crate::tracking::TrackingSession;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Resolved inputs for one predict run.
#[derive(Debug, Clone)]
pub struct PredictOptions {
    /// Dataset root holding one subdirectory per card.
    pub dataset_dir: PathBuf,
    /// Directory the per-card score tables are written into.
    pub score_dir: PathBuf,
    /// Clips per inference batch.
    pub batch_size: usize,
    /// Keep only cards whose name contains this substring.
    pub card_filter: Option<String>,
    /// Rescore cards whose table already exists.
    pub force: bool,
    /// Draw a progress bar over cards.
    pub progress: bool,
}

/// What a predict run scored and skipped.
#[derive(Debug, Default)]
pub struct PredictReport {
    /// Cards scored in this run.
    pub scored: usize,
    /// Cards skipped (existing table or no audio).
    pub skipped: usize,
    /// Score rows written across all cards.
    pub rows: usize,
    /// Recordings the model could not process.
    pub unsafe_samples: Vec<PathBuf>,
    /// Score tables written in this run.
    pub outputs: Vec<PathBuf>,
}

/// Discover recorder cards: the immediate subdirectories of the dataset
/// root, in name order, optionally filtered by a name substring.
pub fn discover_cards(
    dataset_dir: &Path,
    filter: Option<&str>,
) -> Result<Vec<(String, PathBuf)>> {
    let empty = || Error::EmptyInput {
        what: filter.map_or_else(
            || "card directories".to_string(),
            |f| format!("card directories matching '{f}'"),
        ),
        path: dataset_dir.to_path_buf(),
    };

    if !dataset_dir.is_dir() {
        return Err(empty());
    }

    let mut cards = Vec::new();
    for entry in std::fs::read_dir(dataset_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!("Skipping non-UTF-8 card name: {}", path.display());
            continue;
        };
        if filter.is_none_or(|f| name.contains(f)) {
            cards.push((name.to_string(), path));
        }
    }

    if cards.is_empty() {
        return Err(empty());
    }

    cards.sort();
    Ok(cards)
}

/// Collect the `.wav` recordings directly inside one card directory, in
/// name order. Card directories are flat on `AudioMoth` SD cards, so there is
/// no recursion here.
pub fn collect_card_audio(card_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(card_dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Score table path for one card.
pub fn score_path_for(score_dir: &Path, card: &str) -> PathBuf {
    score_dir.join(format!("{SCORE_FILE_PREFIX}{card}.csv"))
}

/// Run the predict stage.
///
/// Writes one `preds_<card>.csv` per card. Cards whose table already exists
/// are skipped unless `force` is set; cards without audio are skipped with a
/// warning. Recordings the model cannot process are reported as unsafe
/// samples and left out of the tables. A dataset with no audio at all is an
/// error.
pub fn run_predict(
    classifier: &dyn Classifier,
    options: &PredictOptions,
    session: &mut dyn TrackingSession,
) -> Result<PredictReport> {
    let start = Instant::now();
    let cards = discover_cards(&options.dataset_dir, options.card_filter.as_deref())?;
    info!(
        "Found {} card(s) under {}",
        cards.len(),
        options.dataset_dir.display()
    );

    std::fs::create_dir_all(&options.score_dir)?;

    let bar = progress::CardProgress::new(cards.len(), options.progress);

    let mut report = PredictReport::default();
    let mut examined = 0usize;
    let mut audio_total = 0usize;

    for (card, card_dir) in &cards {
        let score_path = score_path_for(&options.score_dir, card);

        if !options.force && score_path.exists() {
            info!("Skipping {card} (table exists): {}", score_path.display());
            report.skipped += 1;
            bar.advance();
            continue;
        }

        examined += 1;
        let files = collect_card_audio(card_dir)?;
        audio_total += files.len();
        if files.is_empty() {
            warn!("Skipping {card}: no .wav files in {}", card_dir.display());
            report.skipped += 1;
            bar.advance();
            continue;
        }

        let card_start = Instant::now();
        let prediction = classifier.predict(&files, options.batch_size)?;
        write_score_table(&score_path, &prediction.scores, classifier.classes())?;

        info!(
            "Scored {card}: {} file(s), {} clip(s) in {:.2}s",
            files.len(),
            prediction.scores.len(),
            card_start.elapsed().as_secs_f64()
        );
        session.log(
            "card_scored",
            serde_json::json!({
                "card": card,
                "files": files.len(),
                "rows": prediction.scores.len(),
                "unsafe_samples": prediction.unsafe_samples.len(),
                "table": score_path.display().to_string(),
            }),
        )?;

        report.scored += 1;
        report.rows += prediction.scores.len();
        report.unsafe_samples.extend(prediction.unsafe_samples);
        report.outputs.push(score_path);
        bar.advance();
    }

    if examined > 0 && audio_total == 0 {
        bar.finish("aborted");
        return Err(Error::EmptyInput {
            what: "audio files (*.wav)".to_string(),
            path: options.dataset_dir.clone(),
        });
    }

    bar.finish("all cards scored");
    session.finish()?;

    info!(
        "Complete: {} card(s) scored, {} skipped, {} row(s) in {:.2}s",
        report.scored,
        report.skipped,
        report.rows,
        start.elapsed().as_secs_f64()
    );
    if !report.unsafe_samples.is_empty() {
        warn!(
            "{} recording(s) could not be scored",
            report.unsafe_samples.len()
        );
    }

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClassConfig;
    use crate::model::Prediction;
    use crate::scores::RawScore;
    use crate::tracking::{JsonlSession, NullSession, RunInfo};

    fn test_classes() -> ClassConfig {
        ClassConfig {
            positive: "ramu".to_string(),
            negative: "negative".to_string(),
        }
    }

    fn unit_score(file: &Path) -> RawScore {
        RawScore {
            file: file.display().to_string(),
            start_time: Some(0.0),
            end_time: Some(2.0),
            positive: 1.0,
            negative: 0.0,
        }
    }

    /// Scores every file 1.0/0.0 without reading it.
    struct FakeClassifier {
        classes: ClassConfig,
    }

    impl FakeClassifier {
        fn new() -> Self {
            Self {
                classes: test_classes(),
            }
        }
    }

    impl Classifier for FakeClassifier {
        fn classes(&self) -> &ClassConfig {
            &self.classes
        }

        fn predict(&self, files: &[PathBuf], _batch_size: usize) -> Result<Prediction> {
            let scores = files.iter().map(|file| unit_score(file)).collect();
            Ok(Prediction {
                scores,
                unsafe_samples: Vec::new(),
            })
        }
    }

    /// Like [`FakeClassifier`], but reports any file whose name contains
    /// "corrupt" as an unsafe sample instead of scoring it.
    struct PartialClassifier {
        classes: ClassConfig,
    }

    impl PartialClassifier {
        fn new() -> Self {
            Self {
                classes: test_classes(),
            }
        }
    }

    impl Classifier for PartialClassifier {
        fn classes(&self) -> &ClassConfig {
            &self.classes
        }

        fn predict(&self, files: &[PathBuf], _batch_size: usize) -> Result<Prediction> {
            let (unsafe_samples, readable): (Vec<PathBuf>, Vec<PathBuf>) =
                files.iter().cloned().partition(|file| {
                    file.file_name()
                        .is_some_and(|name| name.to_string_lossy().contains("corrupt"))
                });
            let scores = readable.iter().map(|file| unit_score(file)).collect();
            Ok(Prediction {
                scores,
                unsafe_samples,
            })
        }
    }

    fn make_dataset(cards: &[(&str, &[&str])]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (card, files) in cards {
            let card_dir = dir.path().join(card);
            std::fs::create_dir(&card_dir).unwrap();
            for file in *files {
                std::fs::write(card_dir.join(file), b"").unwrap();
            }
        }
        dir
    }

    fn options(dataset: &Path, scores: &Path) -> PredictOptions {
        PredictOptions {
            dataset_dir: dataset.to_path_buf(),
            score_dir: scores.to_path_buf(),
            batch_size: 8,
            card_filter: None,
            force: false,
            progress: false,
        }
    }

    #[test]
    fn test_discover_cards_sorts_and_filters() {
        let dataset = make_dataset(&[
            ("SD_B004", &["20220620_213301.WAV"]),
            ("SD_A012", &["20220620_213301.WAV"]),
            ("notes", &[]),
        ]);
        std::fs::write(dataset.path().join("readme.txt"), b"").unwrap();

        let all = discover_cards(dataset.path(), None).unwrap();
        let names: Vec<_> = all.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["SD_A012", "SD_B004", "notes"]);

        let filtered = discover_cards(dataset.path(), Some("SD")).unwrap();
        let names: Vec<_> = filtered.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["SD_A012", "SD_B004"]);
    }

    #[test]
    fn test_discover_cards_no_match_is_empty_input() {
        let dataset = make_dataset(&[("SD_A012", &[])]);
        assert!(matches!(
            discover_cards(dataset.path(), Some("XX")),
            Err(Error::EmptyInput { .. })
        ));
        assert!(matches!(
            discover_cards(Path::new("/nonexistent/dataset"), None),
            Err(Error::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_collect_card_audio_is_case_insensitive_and_sorted() {
        let dataset = make_dataset(&[(
            "SD_A012",
            &["b.WAV", "a.wav", "notes.txt", "cover.jpg"][..],
        )]);
        let files = collect_card_audio(&dataset.path().join("SD_A012")).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.wav", "b.WAV"]);
    }

    #[test]
    fn test_run_predict_writes_one_table_per_card() {
        let dataset = make_dataset(&[
            ("SD_A012", &["20220620_213301.WAV"][..]),
            ("SD_B004", &["20220620_213301.WAV", "20220621_063000.WAV"][..]),
        ]);
        let scores = dataset.path().join("scores");

        let report = run_predict(
            &FakeClassifier::new(),
            &options(dataset.path(), &scores),
            &mut NullSession,
        )
        .unwrap();

        assert_eq!(report.scored, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.rows, 3);
        assert!(scores.join("preds_SD_A012.csv").exists());
        assert!(scores.join("preds_SD_B004.csv").exists());

        let table = std::fs::read_to_string(scores.join("preds_SD_B004.csv")).unwrap();
        assert!(table.starts_with("file,start_time,end_time,ramu,negative\n"));
        assert_eq!(table.lines().count(), 3);
    }

    #[test]
    fn test_run_predict_reports_unsafe_samples() {
        let dataset = make_dataset(&[
            (
                "SD_A012",
                &["20220620_213301.WAV", "corrupt_a.WAV", "corrupt_b.WAV"][..],
            ),
            ("SD_B004", &["20220621_063000.WAV"][..]),
        ]);
        let scores = dataset.path().join("scores");

        let log_path = dataset.path().join("runs/predict.jsonl");
        let run = RunInfo {
            project: "survey".to_string(),
            name: "predict-test".to_string(),
            comment: None,
        };
        let mut session = JsonlSession::create(&log_path, &run).unwrap();

        let report = run_predict(
            &PartialClassifier::new(),
            &options(dataset.path(), &scores),
            &mut session,
        )
        .unwrap();

        assert_eq!(report.scored, 2);
        assert_eq!(report.rows, 2);
        assert_eq!(report.unsafe_samples.len(), 2);
        assert!(report.unsafe_samples.iter().all(|path| {
            path.file_name()
                .is_some_and(|name| name.to_string_lossy().contains("corrupt"))
        }));

        // Unscorable recordings stay out of the written table.
        let table = std::fs::read_to_string(scores.join("preds_SD_A012.csv")).unwrap();
        assert_eq!(table.lines().count(), 2);
        assert!(table.contains("20220620_213301.WAV"));
        assert!(!table.contains("corrupt"));

        let text = std::fs::read_to_string(&log_path).unwrap();
        let card_events: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
            .filter(|event| event["event"] == "card_scored")
            .collect();
        assert_eq!(card_events.len(), 2);
        assert_eq!(card_events[0]["data"]["card"], "SD_A012");
        assert_eq!(card_events[0]["data"]["rows"], 1);
        assert_eq!(card_events[0]["data"]["unsafe_samples"], 2);
        assert_eq!(card_events[1]["data"]["card"], "SD_B004");
        assert_eq!(card_events[1]["data"]["unsafe_samples"], 0);
    }

    #[test]
    fn test_run_predict_skips_existing_tables_unless_forced() {
        let dataset = make_dataset(&[("SD_A012", &["20220620_213301.WAV"][..])]);
        let scores = dataset.path().join("scores");
        let opts = options(dataset.path(), &scores);

        run_predict(&FakeClassifier::new(), &opts, &mut NullSession).unwrap();
        let rerun = run_predict(&FakeClassifier::new(), &opts, &mut NullSession).unwrap();
        assert_eq!(rerun.scored, 0);
        assert_eq!(rerun.skipped, 1);

        let forced = run_predict(
            &FakeClassifier::new(),
            &PredictOptions {
                force: true,
                ..opts
            },
            &mut NullSession,
        )
        .unwrap();
        assert_eq!(forced.scored, 1);
    }

    #[test]
    fn test_run_predict_skips_empty_card_but_scores_the_rest() {
        let dataset = make_dataset(&[
            ("SD_A012", &[][..]),
            ("SD_B004", &["20220620_213301.WAV"][..]),
        ]);
        let scores = dataset.path().join("scores");

        let report = run_predict(
            &FakeClassifier::new(),
            &options(dataset.path(), &scores),
            &mut NullSession,
        )
        .unwrap();

        assert_eq!(report.scored, 1);
        assert_eq!(report.skipped, 1);
        assert!(!scores.join("preds_SD_A012.csv").exists());
        assert!(scores.join("preds_SD_B004.csv").exists());
    }

    #[test]
    fn test_run_predict_dataset_without_audio_is_empty_input() {
        let dataset = make_dataset(&[("SD_A012", &[][..]), ("SD_B004", &[][..])]);
        let scores = dataset.path().join("scores");

        let result = run_predict(
            &FakeClassifier::new(),
            &options(dataset.path(), &scores),
            &mut NullSession,
        );
        assert!(matches!(result, Err(Error::EmptyInput { .. })));
    }
}
