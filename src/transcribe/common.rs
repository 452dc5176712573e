use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::timing::{TimedChunk, TimedWord, TimingEvidence};

/// Engine-agnostic word token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineWord {
    pub text: String,
    pub start_ms: Option<u64>,
    pub end_ms: Option<u64>,
    pub confidence: Option<f64>,
}

/// Engine-agnostic decoded span; `words` is empty when the engine
/// reports no word-level sub-results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSegment {
    pub text: String,
    pub start_ms: Option<u64>,
    pub end_ms: Option<u64>,
    pub words: Vec<EngineWord>,
}

/// Engine-agnostic transcription result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineTranscript {
    pub text: String,
    pub language: Option<String>,
    pub segments: Vec<EngineSegment>,
}

/// Trait for converting engine-specific output formats to the
/// engine-agnostic transcript
pub trait TranscriptMapper<T> {
    fn to_engine_transcript(engine_output: T) -> Result<EngineTranscript>;
}

impl EngineTranscript {
    /// Flatten the transcript into ordered word tokens paired with the
    /// best timing evidence the engine produced. Empty tokens are dropped.
    ///
    /// Precision classification, in priority order: any word-level start
    /// timestamp selects word evidence; otherwise any segment-level start
    /// timestamp selects chunk evidence; otherwise plain tokens.
    pub fn timing_evidence(&self) -> TimingEvidence {
        let has_word_timestamps = self
            .segments
            .iter()
            .flat_map(|s| s.words.iter())
            .any(|w| w.start_ms.is_some());

        if has_word_timestamps {
            let words = self
                .segments
                .iter()
                .flat_map(|segment| segment.words.iter())
                .filter(|word| !word.text.trim().is_empty())
                .map(|word| TimedWord {
                    text: word.text.trim().to_string(),
                    start_ms: word.start_ms,
                    end_ms: word.end_ms,
                    confidence: word.confidence,
                })
                .collect();
            return TimingEvidence::Words(words);
        }

        let has_segment_timestamps = self.segments.iter().any(|s| s.start_ms.is_some());
        if has_segment_timestamps {
            let chunks = self
                .segments
                .iter()
                .map(|segment| TimedChunk {
                    words: segment_tokens(segment),
                    start_ms: segment.start_ms.unwrap_or(0),
                    end_ms: segment.end_ms,
                })
                .collect();
            return TimingEvidence::Chunks(chunks);
        }

        if self.segments.is_empty() {
            return TimingEvidence::Plain(split_tokens(&self.text));
        }

        let words = self.segments.iter().flat_map(segment_tokens).collect();
        TimingEvidence::Plain(words)
    }
}

/// Word tokens of one segment: engine word entries when present,
/// whitespace-split segment text otherwise
fn segment_tokens(segment: &EngineSegment) -> Vec<String> {
    if segment.words.is_empty() {
        split_tokens(&segment.text)
    } else {
        segment
            .words
            .iter()
            .map(|w| w.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn split_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(|t| t.to_string()).collect()
}
