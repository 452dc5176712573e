use tracing::{info, warn};

use crate::caption::CaptionSet;
use super::CorrectionProvider;

/// Merges an externally generated correction back into a caption document.
///
/// Owns only the merge/validation logic; correction generation is the
/// provider's concern. Provider failures and safety-check rejections leave
/// the document unmodified and never propagate to the pipeline driver.
pub struct CorrectionApplicator {
    provider: Box<dyn CorrectionProvider>,
}

impl CorrectionApplicator {
    pub fn new(provider: Box<dyn CorrectionProvider>) -> Self {
        Self { provider }
    }

    /// Run the correction pass. Returns the number of words changed;
    /// 0 when the pass was skipped or nothing differed.
    pub async fn apply(&self, set: &mut CaptionSet) -> usize {
        if set.captions.is_empty() {
            return 0;
        }

        let full_text = set
            .captions
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let corrected = match self.provider.correct(&full_text).await {
            Ok(corrected) => corrected,
            Err(e) => {
                warn!("Correction skipped: {}", e);
                return 0;
            }
        };

        merge_corrections(set, &corrected)
    }
}

/// Positionally merge a corrected word sequence into the document.
///
/// Safety invariant: the corrected sequence must contain exactly one word
/// per caption; any length mismatch rejects the whole correction.
fn merge_corrections(set: &mut CaptionSet, corrected: &str) -> usize {
    let corrected_words: Vec<&str> = corrected.split_whitespace().collect();

    if corrected_words.len() != set.captions.len() {
        warn!(
            "Word count mismatch ({} vs {}), skipping corrections",
            corrected_words.len(),
            set.captions.len()
        );
        return 0;
    }

    let mut changed = 0;
    for (caption, corrected_word) in set.captions.iter_mut().zip(corrected_words) {
        if caption.text != corrected_word {
            caption.original = Some(std::mem::replace(
                &mut caption.text,
                corrected_word.to_string(),
            ));
            caption.enhanced = Some(true);
            changed += 1;
        }
    }

    if changed > 0 {
        info!("Enhanced {} words via correction API", changed);
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::{Caption, CaptionSet, TimingSource};
    use crate::enhance::MockCorrectionProvider;
    use crate::error::SunoError;

    fn set_with_words(words: &[&str]) -> CaptionSet {
        let captions = words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                Caption::new(word.to_string(), i as u64 * 300, (i as u64 + 1) * 300, 0.9)
            })
            .collect();
        CaptionSet::new("hi", "test-model", captions, TimingSource::Word)
    }

    fn applicator_returning(result: crate::error::Result<String>) -> CorrectionApplicator {
        let mut provider = MockCorrectionProvider::new();
        provider
            .expect_correct()
            .return_once(move |_| result);
        CorrectionApplicator::new(Box::new(provider))
    }

    #[tokio::test]
    async fn test_merges_changed_words_and_preserves_originals() {
        let mut set = set_with_words(&["ka", "hay", "accha"]);
        let applicator = applicator_returning(Ok("kya hai accha".to_string()));

        let changed = applicator.apply(&mut set).await;

        assert_eq!(changed, 2);
        assert_eq!(set.captions[0].text, "kya");
        assert_eq!(set.captions[0].original.as_deref(), Some("ka"));
        assert_eq!(set.captions[0].enhanced, Some(true));
        assert_eq!(set.captions[1].text, "hai");
        assert_eq!(set.captions[1].original.as_deref(), Some("hay"));
        assert_eq!(set.captions[1].enhanced, Some(true));
        // Unchanged position stays untouched
        assert_eq!(set.captions[2].text, "accha");
        assert_eq!(set.captions[2].original, None);
        assert_eq!(set.captions[2].enhanced, None);
    }

    #[tokio::test]
    async fn test_word_count_mismatch_rejects_whole_correction() {
        let mut set = set_with_words(&["ka", "hay", "accha"]);
        let before = set.clone();
        let applicator = applicator_returning(Ok("kya hai".to_string()));

        let changed = applicator.apply(&mut set).await;

        assert_eq!(changed, 0);
        assert_eq!(set, before);
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_document_unmodified() {
        let mut set = set_with_words(&["ka", "hay"]);
        let before = set.clone();
        let applicator =
            applicator_returning(Err(SunoError::Enhance("connection refused".to_string())));

        let changed = applicator.apply(&mut set).await;

        assert_eq!(changed, 0);
        assert_eq!(set, before);
    }

    #[tokio::test]
    async fn test_identical_correction_changes_nothing() {
        let mut set = set_with_words(&["kya", "hai"]);
        let before = set.clone();
        let applicator = applicator_returning(Ok("kya hai".to_string()));

        let changed = applicator.apply(&mut set).await;

        assert_eq!(changed, 0);
        assert_eq!(set, before);
    }

    #[tokio::test]
    async fn test_empty_document_skips_provider_call() {
        let mut set = set_with_words(&[]);
        // Provider must not be called at all for an empty document
        let provider = MockCorrectionProvider::new();
        let applicator = CorrectionApplicator::new(Box::new(provider));

        assert_eq!(applicator.apply(&mut set).await, 0);
    }
}
