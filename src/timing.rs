use tracing::debug;

use crate::caption::{Caption, TimingSource};
use crate::config::TimingConfig;

// Fixed confidence levels by timing provenance. Word-level scores come from
// the engine when available; everything coarser gets a constant.
const WORD_CONFIDENCE: f64 = 0.9;
const CHUNK_CONFIDENCE: f64 = 0.9;
const PROBED_CONFIDENCE: f64 = 0.9;
const FALLBACK_CONFIDENCE: f64 = 0.5;

/// A word token with whatever timing the engine reported for it
#[derive(Debug, Clone)]
pub struct TimedWord {
    pub text: String,
    pub start_ms: Option<u64>,
    pub end_ms: Option<u64>,
    pub confidence: Option<f64>,
}

/// A multi-word span with one timestamp pair for the whole span
#[derive(Debug, Clone)]
pub struct TimedChunk {
    pub words: Vec<String>,
    pub start_ms: u64,
    pub end_ms: Option<u64>,
}

/// Best available timing evidence, in decreasing order of precision
#[derive(Debug, Clone)]
pub enum TimingEvidence {
    Words(Vec<TimedWord>),
    Chunks(Vec<TimedChunk>),
    Plain(Vec<String>),
}

impl TimingEvidence {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Words(words) => words.is_empty(),
            Self::Chunks(chunks) => chunks.iter().all(|c| c.words.is_empty()),
            Self::Plain(words) => words.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Allocation {
    pub captions: Vec<Caption>,
    pub source: TimingSource,
}

/// Assigns a monotonically ordered time interval to every transcribed word,
/// in one of three escalating precision modes. Total over any input: absent
/// timing evidence selects the lowest-fidelity mode, never an error.
pub struct TimingAllocator {
    config: TimingConfig,
}

impl TimingAllocator {
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    pub fn allocate(&self, evidence: TimingEvidence, audio_duration_ms: Option<u64>) -> Allocation {
        match evidence {
            TimingEvidence::Words(words) => self.allocate_from_words(words),
            TimingEvidence::Chunks(chunks) => self.allocate_from_chunks(chunks),
            TimingEvidence::Plain(words) => self.allocate_evenly(words, audio_duration_ms),
        }
    }

    /// Mode 1: per-word timestamps from the engine, fully trusted.
    fn allocate_from_words(&self, words: Vec<TimedWord>) -> Allocation {
        let captions = words
            .into_iter()
            .map(|word| {
                let start_ms = word.start_ms.unwrap_or(0);
                let end_ms = match word.end_ms {
                    Some(end) if end > start_ms => end,
                    _ => start_ms + self.config.default_word_end_ms,
                };
                let confidence = word.confidence.unwrap_or(WORD_CONFIDENCE);
                Caption::new(word.text, start_ms, end_ms, confidence)
            })
            .collect();

        Allocation {
            captions,
            source: TimingSource::Word,
        }
    }

    /// Mode 2: each chunk's interval is split into equal sub-intervals,
    /// assigned in token order. Integer-rounded boundaries keep the
    /// sub-interval durations summing to the chunk duration.
    fn allocate_from_chunks(&self, chunks: Vec<TimedChunk>) -> Allocation {
        let mut captions = Vec::new();

        for chunk in chunks {
            let count = chunk.words.len() as u64;
            if count == 0 {
                continue;
            }

            let start = chunk.start_ms;
            let end = match chunk.end_ms {
                Some(end) if end > start => end,
                _ => start + self.config.chunk_fallback_ms,
            };
            let span = end - start;

            for (i, word) in chunk.words.into_iter().enumerate() {
                let i = i as u64;
                let word_start = start + span * i / count;
                let word_end = (start + span * (i + 1) / count).max(word_start + 1);
                captions.push(Caption::new(word, word_start, word_end, CHUNK_CONFIDENCE));
            }
        }

        Allocation {
            captions,
            source: TimingSource::Chunk,
        }
    }

    /// Mode 3: no timestamps at all. With a probed duration, reserve the
    /// lead-in and trailing buffer and divide the rest evenly; otherwise
    /// synthesize the duration from the word count.
    fn allocate_evenly(&self, words: Vec<String>, audio_duration_ms: Option<u64>) -> Allocation {
        let count = words.len() as u64;
        if count == 0 {
            return Allocation {
                captions: Vec::new(),
                source: TimingSource::Estimated,
            };
        }

        let reserved = self.config.lead_in_ms + self.config.trail_buffer_ms;
        let probed_split = audio_duration_ms.and_then(|duration| {
            let usable = duration.saturating_sub(reserved);
            // A probed clip too short to give every word at least 1ms
            // degrades to the synthesized split.
            if usable >= count {
                Some((self.config.lead_in_ms, usable / count))
            } else {
                None
            }
        });

        let (lead_in, word_ms, confidence, source) = match probed_split {
            Some((lead_in, word_ms)) => {
                (lead_in, word_ms, PROBED_CONFIDENCE, TimingSource::EstimatedProbed)
            }
            None => (
                0,
                self.config.fallback_word_ms,
                FALLBACK_CONFIDENCE,
                TimingSource::Estimated,
            ),
        };

        debug!(
            "Even timing split: {} words at {}ms each (lead-in {}ms)",
            count, word_ms, lead_in
        );

        let captions = words
            .into_iter()
            .enumerate()
            .map(|(i, word)| {
                let i = i as u64;
                let start = lead_in + i * word_ms;
                Caption::new(word, start, start + word_ms, confidence)
            })
            .collect();

        Allocation { captions, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocator() -> TimingAllocator {
        TimingAllocator::new(crate::config::Config::default().timing)
    }

    fn plain(words: &[&str]) -> TimingEvidence {
        TimingEvidence::Plain(words.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn test_word_mode_uses_engine_timestamps() {
        let words = vec![
            TimedWord {
                text: "kya".to_string(),
                start_ms: Some(100),
                end_ms: Some(450),
                confidence: Some(0.82),
            },
            TimedWord {
                text: "hai".to_string(),
                start_ms: Some(450),
                end_ms: None,
                confidence: None,
            },
        ];

        let result = allocator().allocate(TimingEvidence::Words(words), Some(60_000));
        assert_eq!(result.source, TimingSource::Word);
        assert_eq!(result.captions.len(), 2);
        assert_eq!(result.captions[0].start_ms, 100);
        assert_eq!(result.captions[0].end_ms, 450);
        assert_eq!(result.captions[0].confidence, 0.82);
        // Missing end falls back to start + 200
        assert_eq!(result.captions[1].start_ms, 450);
        assert_eq!(result.captions[1].end_ms, 650);
        assert_eq!(result.captions[1].confidence, 0.9);
    }

    #[test]
    fn test_word_mode_repairs_non_increasing_end() {
        let words = vec![TimedWord {
            text: "accha".to_string(),
            start_ms: Some(500),
            end_ms: Some(500),
            confidence: None,
        }];

        let result = allocator().allocate(TimingEvidence::Words(words), None);
        assert_eq!(result.captions[0].start_ms, 500);
        assert_eq!(result.captions[0].end_ms, 700);
    }

    #[test]
    fn test_chunk_mode_covers_chunk_span() {
        let chunks = vec![TimedChunk {
            words: vec!["ek".to_string(), "do".to_string(), "teen".to_string()],
            start_ms: 1000,
            end_ms: Some(2000),
        }];

        let result = allocator().allocate(TimingEvidence::Chunks(chunks), None);
        assert_eq!(result.source, TimingSource::Chunk);
        assert_eq!(result.captions.len(), 3);
        assert_eq!(result.captions[0].start_ms, 1000);
        assert_eq!(result.captions[2].end_ms, 2000);

        // Sub-interval durations cover the chunk within rounding tolerance
        let total: u64 = result
            .captions
            .iter()
            .map(|c| c.end_ms - c.start_ms)
            .sum();
        assert!(total.abs_diff(1000) <= result.captions.len() as u64);

        for caption in &result.captions {
            assert!(caption.start_ms < caption.end_ms);
            assert_eq!(caption.confidence, 0.9);
        }
    }

    #[test]
    fn test_chunk_mode_uneven_split_stays_within_tolerance() {
        let chunks = vec![TimedChunk {
            words: (0..7).map(|i| format!("w{}", i)).collect(),
            start_ms: 0,
            end_ms: Some(1000),
        }];

        let result = allocator().allocate(TimingEvidence::Chunks(chunks), None);
        assert_eq!(result.captions.first().unwrap().start_ms, 0);
        assert_eq!(result.captions.last().unwrap().end_ms, 1000);
        for pair in result.captions.windows(2) {
            assert_eq!(pair[0].end_ms, pair[1].start_ms);
            let duration = pair[0].end_ms - pair[0].start_ms;
            assert!(duration.abs_diff(1000 / 7) <= 1);
        }
    }

    #[test]
    fn test_chunk_mode_missing_end_defaults_to_one_second() {
        let chunks = vec![TimedChunk {
            words: vec!["haan".to_string(), "ji".to_string()],
            start_ms: 3000,
            end_ms: None,
        }];

        let result = allocator().allocate(TimingEvidence::Chunks(chunks), None);
        assert_eq!(result.captions[0].start_ms, 3000);
        assert_eq!(result.captions[1].end_ms, 4000);
    }

    #[test]
    fn test_chunk_mode_zero_duration_defaults_to_one_second() {
        let chunks = vec![TimedChunk {
            words: vec!["bas".to_string()],
            start_ms: 3000,
            end_ms: Some(3000),
        }];

        let result = allocator().allocate(TimingEvidence::Chunks(chunks), None);
        assert_eq!(result.captions[0].start_ms, 3000);
        assert_eq!(result.captions[0].end_ms, 4000);
    }

    #[test]
    fn test_probe_backed_even_split() {
        let words: Vec<&str> = (0..10).map(|_| "shabd").collect();
        let result = allocator().allocate(plain(&words), Some(10_000));

        assert_eq!(result.source, TimingSource::EstimatedProbed);
        assert_eq!(result.captions.len(), 10);
        assert_eq!(result.captions[0].start_ms, 200);
        assert_eq!(result.captions[9].end_ms, 9500);
        for caption in &result.captions {
            assert_eq!(caption.end_ms - caption.start_ms, 930);
            assert_eq!(caption.confidence, 0.9);
        }
    }

    #[test]
    fn test_no_probe_synthesizes_duration() {
        let result = allocator().allocate(plain(&["a", "b", "c", "d", "e"]), None);

        assert_eq!(result.source, TimingSource::Estimated);
        assert_eq!(result.captions.len(), 5);
        assert_eq!(result.captions[0].start_ms, 0);
        assert_eq!(result.captions[4].end_ms, 1500);
        for caption in &result.captions {
            assert_eq!(caption.confidence, 0.5);
        }
    }

    #[test]
    fn test_probe_shorter_than_reserved_falls_back() {
        let result = allocator().allocate(plain(&["ek", "do", "teen"]), Some(600));

        assert_eq!(result.source, TimingSource::Estimated);
        assert_eq!(result.captions[2].end_ms, 900);
    }

    #[test]
    fn test_empty_input_yields_empty_allocation() {
        for evidence in [
            TimingEvidence::Words(vec![]),
            TimingEvidence::Chunks(vec![]),
            TimingEvidence::Plain(vec![]),
        ] {
            let result = allocator().allocate(evidence, Some(10_000));
            assert!(result.captions.is_empty());
        }
    }

    #[test]
    fn test_every_mode_preserves_order_and_positive_spans() {
        let chunks = vec![
            TimedChunk {
                words: vec!["pehla".to_string(), "dusra".to_string()],
                start_ms: 0,
                end_ms: Some(800),
            },
            TimedChunk {
                words: vec!["teesra".to_string()],
                start_ms: 800,
                end_ms: Some(1400),
            },
        ];

        let result = allocator().allocate(TimingEvidence::Chunks(chunks), None);
        assert_eq!(
            result
                .captions
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>(),
            vec!["pehla", "dusra", "teesra"]
        );
        for pair in result.captions.windows(2) {
            assert!(pair[0].start_ms <= pair[1].start_ms);
        }
        for caption in &result.captions {
            assert!(caption.start_ms < caption.end_ms);
        }
    }
}
