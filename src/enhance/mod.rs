// Caption enhancement architecture
//
// Two post-processing passes over a caption document:
// - Flagger: marks low-confidence words for manual review
// - Applicator: merges an externally generated correction back into the
//   document, guarded by a word-count safety check
//
// Correction generation is delegated to a CorrectionProvider so the merge
// logic stays testable without network access.

pub mod apply;
pub mod flagger;
pub mod groq;

use async_trait::async_trait;

pub use apply::CorrectionApplicator;
pub use flagger::flag_low_confidence;

use crate::config::EnhanceConfig;
use crate::error::Result;

/// External text-correction collaborator. Given the full caption text,
/// returns a corrected string with the same number of words.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CorrectionProvider: Send + Sync {
    async fn correct(&self, text: &str) -> Result<String>;
}

/// Factory for creating correction provider instances
pub struct CorrectionProviderFactory;

impl CorrectionProviderFactory {
    /// Create a provider when credentials are configured; None disables
    /// the correction pass entirely.
    pub fn create_provider(config: EnhanceConfig) -> Option<Box<dyn CorrectionProvider>> {
        match config.api_key.clone() {
            Some(key) if !key.is_empty() => Some(Box::new(groq::GroqCorrector::new(config, key))),
            _ => None,
        }
    }
}
