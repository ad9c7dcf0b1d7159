//! Class balancing by deterministic upsampling.

use crate::error::{Error, Result};
use crate::labels::table::LabeledClip;

/// Upsample the minority class until both classes have equal clip counts.
///
/// The original rows are kept first in their input order, then minority
/// rows are repeated cyclically until the counts match. The same input
/// always yields the same output, so staged training tables are
/// reproducible.
pub fn balance_classes(clips: &[LabeledClip]) -> Result<Vec<LabeledClip>> {
    let positives = clips.iter().filter(|c| c.present).count();
    let negatives = clips.len() - positives;

    if positives == 0 || negatives == 0 {
        let missing = if positives == 0 { "positive" } else { "negative" };
        return Err(Error::Train {
            reason: format!("cannot balance classes: no {missing} clips in the training table"),
        });
    }

    let mut balanced = clips.to_vec();
    if positives == negatives {
        return Ok(balanced);
    }

    let minority_present = positives < negatives;
    let deficit = positives.abs_diff(negatives);
    let minority: Vec<&LabeledClip> = clips
        .iter()
        .filter(|c| c.present == minority_present)
        .collect();

    balanced.extend(minority.iter().cycle().take(deficit).map(|c| (*c).clone()));
    Ok(balanced)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn clip(file: &str, present: bool) -> LabeledClip {
        LabeledClip {
            file: file.to_string(),
            start_time: 0.0,
            end_time: 2.0,
            present,
        }
    }

    fn count_present(clips: &[LabeledClip]) -> usize {
        clips.iter().filter(|c| c.present).count()
    }

    #[test]
    fn test_balance_upsamples_minority_cyclically() {
        let mut clips = vec![
            clip("p0", true),
            clip("p1", true),
            clip("p2", true),
        ];
        clips.extend((0..7).map(|i| clip(&format!("n{i}"), false)));

        let balanced = balance_classes(&clips).unwrap();
        assert_eq!(balanced.len(), 14);
        assert_eq!(count_present(&balanced), 7);

        // Originals first, untouched.
        assert_eq!(balanced[..10], clips[..]);
        // Then p0, p1, p2, p0.
        let appended: Vec<_> = balanced[10..].iter().map(|c| c.file.as_str()).collect();
        assert_eq!(appended, vec!["p0", "p1", "p2", "p0"]);
    }

    #[test]
    fn test_balance_handles_negative_minority() {
        let clips = vec![
            clip("p0", true),
            clip("p1", true),
            clip("p2", true),
            clip("n0", false),
        ];
        let balanced = balance_classes(&clips).unwrap();
        assert_eq!(balanced.len(), 6);
        assert_eq!(count_present(&balanced), 3);
        assert_eq!(balanced[4].file, "n0");
        assert_eq!(balanced[5].file, "n0");
    }

    #[test]
    fn test_already_balanced_is_unchanged() {
        let clips = vec![clip("p0", true), clip("n0", false)];
        let balanced = balance_classes(&clips).unwrap();
        assert_eq!(balanced, clips);
    }

    #[test]
    fn test_single_class_is_an_error() {
        let clips = vec![clip("p0", true), clip("p1", true)];
        assert!(matches!(
            balance_classes(&clips),
            Err(Error::Train { .. })
        ));
    }

    #[test]
    fn test_balance_is_deterministic() {
        let mut clips = vec![clip("p0", true)];
        clips.extend((0..5).map(|i| clip(&format!("n{i}"), false)));
        let first = balance_classes(&clips).unwrap();
        let second = balance_classes(&clips).unwrap();
        assert_eq!(first, second);
    }
}
