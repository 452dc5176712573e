use tracing::{info, warn};

use crate::caption::CaptionSet;

// Only this many flagged words are listed individually in the log
const SUMMARY_LIMIT: usize = 10;

/// Mark captions whose confidence falls strictly below the threshold for
/// manual review. Pure over the document: no removal, reorder, or
/// text/timing change. Returns the number of captions flagged this pass.
pub fn flag_low_confidence(set: &mut CaptionSet, threshold: f64) -> usize {
    let mut flagged = Vec::new();

    for caption in &mut set.captions {
        if caption.confidence < threshold {
            caption.low_confidence = Some(true);
            flagged.push(format!(
                "'{}' (confidence: {:.0}%)",
                caption.text,
                caption.confidence * 100.0
            ));
        }
    }

    if flagged.is_empty() {
        info!("No captions below confidence threshold {}", threshold);
    } else {
        warn!("{} low-confidence words flagged for review:", flagged.len());
        for entry in flagged.iter().take(SUMMARY_LIMIT) {
            warn!("  {}", entry);
        }
        if flagged.len() > SUMMARY_LIMIT {
            warn!("  ... and {} more", flagged.len() - SUMMARY_LIMIT);
        }
    }

    flagged.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::{Caption, CaptionSet, TimingSource};

    fn set_with_confidences(confidences: &[f64]) -> CaptionSet {
        let captions = confidences
            .iter()
            .enumerate()
            .map(|(i, &confidence)| {
                Caption::new(
                    format!("w{}", i),
                    i as u64 * 300,
                    (i as u64 + 1) * 300,
                    confidence,
                )
            })
            .collect();
        CaptionSet::new("hi", "test-model", captions, TimingSource::Estimated)
    }

    #[test]
    fn test_flags_strictly_below_threshold() {
        let mut set = set_with_confidences(&[0.5, 0.9, 0.3]);
        let flagged = flag_low_confidence(&mut set, 0.7);

        assert_eq!(flagged, 2);
        assert_eq!(set.captions[0].low_confidence, Some(true));
        assert_eq!(set.captions[1].low_confidence, None);
        assert_eq!(set.captions[2].low_confidence, Some(true));
    }

    #[test]
    fn test_threshold_boundary_is_exclusive() {
        let mut set = set_with_confidences(&[0.7]);
        assert_eq!(flag_low_confidence(&mut set, 0.7), 0);
        assert_eq!(set.captions[0].low_confidence, None);
    }

    #[test]
    fn test_does_not_alter_text_or_timing() {
        let mut set = set_with_confidences(&[0.1, 0.2]);
        let before = set.clone();
        flag_low_confidence(&mut set, 0.7);

        for (flagged, original) in set.captions.iter().zip(&before.captions) {
            assert_eq!(flagged.text, original.text);
            assert_eq!(flagged.start_ms, original.start_ms);
            assert_eq!(flagged.end_ms, original.end_ms);
            assert_eq!(flagged.confidence, original.confidence);
        }
    }

    #[test]
    fn test_idempotent_on_already_flagged_document() {
        let mut set = set_with_confidences(&[0.5, 0.9, 0.3]);
        flag_low_confidence(&mut set, 0.7);
        let once = set.clone();

        flag_low_confidence(&mut set, 0.7);
        assert_eq!(set, once);
    }

    #[test]
    fn test_empty_document_yields_no_flags() {
        let mut set = set_with_confidences(&[]);
        assert_eq!(flag_low_confidence(&mut set, 0.7), 0);
    }
}
