//! Reduction of scored clips to the survey summary tables.

use crate::scores::clip::ScoredClip;
use crate::scores::thresholds::ThresholdSet;
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;

/// The five summary tables produced by the aggregate stage.
///
/// Every table has one value column per threshold, in threshold order.
/// Count tables sum detection flags; mean tables average them, giving the
/// fraction of clips in the group that were detections. Group keys are kept
/// sorted so the written tables are deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTables {
    /// `t_<threshold>` column labels, in threshold order.
    pub threshold_labels: Vec<String>,
    /// Total detections per threshold over the whole survey.
    pub totals: Vec<u64>,
    /// Detections per local calendar date.
    pub by_date: BTreeMap<NaiveDate, Vec<u64>>,
    /// Mean detection rate per (card, date) pair.
    pub by_card_and_date: BTreeMap<(String, NaiveDate), Vec<f64>>,
    /// Detections per local time of day.
    pub by_time: BTreeMap<NaiveTime, Vec<u64>>,
    /// Mean detection rate per local time of day.
    pub mean_by_time: BTreeMap<NaiveTime, Vec<f64>>,
}

/// Per-group accumulator: detection flag sums plus the group's row count.
#[derive(Debug, Clone)]
struct GroupSums {
    sums: Vec<u64>,
    rows: u64,
}

impl GroupSums {
    fn new(width: usize) -> Self {
        Self {
            sums: vec![0; width],
            rows: 0,
        }
    }

    fn add(&mut self, flags: &[bool]) {
        for (sum, &flag) in self.sums.iter_mut().zip(flags) {
            *sum += u64::from(flag);
        }
        self.rows += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn means(&self) -> Vec<f64> {
        self.sums
            .iter()
            .map(|&sum| sum as f64 / self.rows as f64)
            .collect()
    }
}

/// Reduce scored clips to all five summary tables in one pass.
pub fn summarize(clips: &[ScoredClip], thresholds: &ThresholdSet) -> SummaryTables {
    let width = thresholds.len();
    let mut totals = vec![0u64; width];
    let mut by_date: BTreeMap<NaiveDate, GroupSums> = BTreeMap::new();
    let mut by_card_and_date: BTreeMap<(String, NaiveDate), GroupSums> = BTreeMap::new();
    let mut by_time: BTreeMap<NaiveTime, GroupSums> = BTreeMap::new();

    for clip in clips {
        let flags = thresholds.flags(clip.log_odds);

        for (total, &flag) in totals.iter_mut().zip(&flags) {
            *total += u64::from(flag);
        }

        by_date
            .entry(clip.date)
            .or_insert_with(|| GroupSums::new(width))
            .add(&flags);
        by_card_and_date
            .entry((clip.card.clone(), clip.date))
            .or_insert_with(|| GroupSums::new(width))
            .add(&flags);
        by_time
            .entry(clip.time)
            .or_insert_with(|| GroupSums::new(width))
            .add(&flags);
    }

    SummaryTables {
        threshold_labels: thresholds.labels(),
        totals,
        by_date: by_date
            .into_iter()
            .map(|(date, group)| (date, group.sums))
            .collect(),
        by_card_and_date: by_card_and_date
            .into_iter()
            .map(|(key, group)| (key, group.means()))
            .collect(),
        mean_by_time: by_time
            .iter()
            .map(|(time, group)| (*time, group.means()))
            .collect(),
        by_time: by_time
            .into_iter()
            .map(|(time, group)| (time, group.sums))
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn clip(card: &str, date: (i32, u32, u32), time: (u32, u32), log_odds: f64) -> ScoredClip {
        ScoredClip {
            file: format!("{card}/20220620_213301.WAV"),
            card: card.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
            probability: 0.5,
            log_odds,
        }
    }

    fn thresholds() -> ThresholdSet {
        ThresholdSet::new(vec![0.0, 5.0]).unwrap()
    }

    #[test]
    fn test_totals_count_strict_exceedance() {
        let clips = vec![
            clip("SD_A", (2022, 6, 20), (21, 33), 2.0),
            clip("SD_A", (2022, 6, 20), (21, 33), 6.0),
            clip("SD_A", (2022, 6, 20), (21, 33), -1.0),
        ];
        let tables = summarize(&clips, &thresholds());
        assert_eq!(tables.threshold_labels, vec!["t_0", "t_5"]);
        assert_eq!(tables.totals, vec![2, 1]);
    }

    #[test]
    fn test_by_date_splits_groups() {
        let clips = vec![
            clip("SD_A", (2022, 6, 20), (21, 33), 2.0),
            clip("SD_A", (2022, 6, 21), (21, 33), 2.0),
            clip("SD_A", (2022, 6, 21), (21, 33), -2.0),
        ];
        let tables = summarize(&clips, &thresholds());
        let june20 = NaiveDate::from_ymd_opt(2022, 6, 20).unwrap();
        let june21 = NaiveDate::from_ymd_opt(2022, 6, 21).unwrap();
        assert_eq!(tables.by_date[&june20], vec![1, 0]);
        assert_eq!(tables.by_date[&june21], vec![1, 0]);
    }

    #[test]
    fn test_card_date_means_are_group_fractions() {
        let clips = vec![
            clip("SD_A", (2022, 6, 20), (21, 33), 2.0),
            clip("SD_A", (2022, 6, 20), (22, 0), -2.0),
            clip("SD_B", (2022, 6, 20), (21, 33), 2.0),
        ];
        let tables = summarize(&clips, &thresholds());
        let june20 = NaiveDate::from_ymd_opt(2022, 6, 20).unwrap();
        assert_eq!(
            tables.by_card_and_date[&("SD_A".to_string(), june20)],
            vec![0.5, 0.0]
        );
        assert_eq!(
            tables.by_card_and_date[&("SD_B".to_string(), june20)],
            vec![1.0, 0.0]
        );
    }

    #[test]
    fn test_time_groups_pool_across_dates() {
        let clips = vec![
            clip("SD_A", (2022, 6, 20), (21, 33), 2.0),
            clip("SD_B", (2022, 6, 21), (21, 33), 2.0),
            clip("SD_B", (2022, 6, 22), (4, 0), -2.0),
        ];
        let tables = summarize(&clips, &thresholds());
        let evening = NaiveTime::from_hms_opt(21, 33, 0).unwrap();
        let dawn = NaiveTime::from_hms_opt(4, 0, 0).unwrap();
        assert_eq!(tables.by_time[&evening], vec![2, 0]);
        assert_eq!(tables.by_time[&dawn], vec![0, 0]);
        assert_eq!(tables.mean_by_time[&evening], vec![1.0, 0.0]);
        assert_eq!(tables.mean_by_time[&dawn], vec![0.0, 0.0]);
    }

    #[test]
    fn test_empty_clips_give_zero_totals_and_no_groups() {
        let tables = summarize(&[], &thresholds());
        assert_eq!(tables.totals, vec![0, 0]);
        assert!(tables.by_date.is_empty());
        assert!(tables.by_card_and_date.is_empty());
        assert!(tables.by_time.is_empty());
        assert!(tables.mean_by_time.is_empty());
    }

    #[test]
    fn test_group_keys_are_sorted() {
        let clips = vec![
            clip("SD_B", (2022, 6, 22), (23, 0), 1.0),
            clip("SD_A", (2022, 6, 20), (4, 0), 1.0),
        ];
        let tables = summarize(&clips, &thresholds());
        let dates: Vec<_> = tables.by_date.keys().copied().collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2022, 6, 20).unwrap(),
                NaiveDate::from_ymd_opt(2022, 6, 22).unwrap(),
            ]
        );
        let cards: Vec<_> = tables.by_card_and_date.keys().map(|k| k.0.clone()).collect();
        assert_eq!(cards, vec!["SD_A", "SD_B"]);
    }
}
