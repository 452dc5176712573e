use std::path::Path;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::error::Result;

/// One transcribed word with its assigned time interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    #[serde(rename = "startMs")]
    pub start_ms: u64,
    #[serde(rename = "endMs")]
    pub end_ms: u64,
    pub confidence: f64,
    /// Set when confidence falls below the review threshold
    #[serde(rename = "lowConfidence", skip_serializing_if = "Option::is_none")]
    pub low_confidence: Option<bool>,
    /// Pre-correction text, present only when a correction changed this word
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhanced: Option<bool>,
}

impl Caption {
    pub fn new<S: Into<String>>(text: S, start_ms: u64, end_ms: u64, confidence: f64) -> Self {
        Self {
            text: text.into(),
            start_ms,
            end_ms,
            confidence,
            low_confidence: None,
            original: None,
            enhanced: None,
        }
    }
}

/// Provenance of the timing allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingSource {
    /// Per-word timestamps straight from the engine
    Word,
    /// Chunk timestamps split evenly across chunk words
    Chunk,
    /// Even split over a probed audio duration
    EstimatedProbed,
    /// Even split over a synthesized duration
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionStats {
    pub total_words: usize,
    pub duration_ms: u64,
    pub timing: TimingSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcribe_time_s: Option<f64>,
}

/// The persisted caption document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSet {
    pub text: String,
    pub language: String,
    pub model: String,
    pub captions: Vec<Caption>,
    pub stats: CaptionStats,
}

impl CaptionSet {
    /// Build a document from allocated captions; the aggregate text and
    /// stats are derived here so they cannot drift from the caption list.
    pub fn new<S1: Into<String>, S2: Into<String>>(
        language: S1,
        model: S2,
        captions: Vec<Caption>,
        timing: TimingSource,
    ) -> Self {
        let text = captions
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let duration_ms = captions.last().map(|c| c.end_ms).unwrap_or(0);

        Self {
            text,
            language: language.into(),
            model: model.into(),
            stats: CaptionStats {
                total_words: captions.len(),
                duration_ms,
                timing,
                transcribe_time_s: None,
            },
            captions,
        }
    }

    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        info!("Caption document saved to {}", path.display());
        Ok(())
    }

    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).await?;
        let document = serde_json::from_str(&content)?;
        Ok(document)
    }
}
