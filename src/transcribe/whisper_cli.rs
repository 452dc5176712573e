// External whisper command-line engine
//
// Invokes the configured whisper binary with JSON output into a temporary
// directory, then maps the engine JSON into the engine-agnostic transcript.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::config::TranscriberConfig;
use crate::error::{Result, SunoError};
use super::{EngineSegment, EngineTranscript, EngineWord, TranscriberTrait, TranscriptMapper};

/// Whisper CLI JSON output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperJsonOutput {
    pub text: String,
    #[serde(default)]
    pub segments: Vec<WhisperJsonSegment>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperJsonSegment {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub text: String,
    #[serde(default)]
    pub words: Vec<WhisperJsonWord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperJsonWord {
    pub word: String,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub probability: Option<f64>,
}

/// Mapper for whisper CLI JSON to the engine-agnostic transcript
pub struct WhisperJsonMapper;

fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}

impl TranscriptMapper<WhisperJsonOutput> for WhisperJsonMapper {
    fn to_engine_transcript(engine_output: WhisperJsonOutput) -> Result<EngineTranscript> {
        let segments = engine_output
            .segments
            .into_iter()
            .map(|segment| EngineSegment {
                start_ms: segment.start.map(seconds_to_ms),
                end_ms: segment.end.map(seconds_to_ms),
                words: segment
                    .words
                    .into_iter()
                    .map(|word| EngineWord {
                        text: word.word,
                        start_ms: word.start.map(seconds_to_ms),
                        end_ms: word.end.map(seconds_to_ms),
                        confidence: word.probability,
                    })
                    .collect(),
                text: segment.text,
            })
            .collect();

        Ok(EngineTranscript {
            text: engine_output.text.trim().to_string(),
            language: engine_output.language,
            segments,
        })
    }
}

/// Whisper command-line implementation
pub struct WhisperCliTranscriber {
    config: TranscriberConfig,
}

impl WhisperCliTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TranscriberTrait for WhisperCliTranscriber {
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<EngineTranscript> {
        info!(
            "Transcribing {} with model {}",
            audio_path.display(),
            self.config.model
        );

        // Temporary output directory for the engine's JSON result
        let temp_dir = tempfile::tempdir()
            .map_err(|e| SunoError::Transcriber(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg(audio_path)
            .arg("--model").arg(&self.config.model)
            .arg("--output_dir").arg(output_dir)
            .arg("--output_format").arg("json")
            .arg("--task").arg("transcribe");

        if self.config.word_timestamps {
            cmd.arg("--word_timestamps").arg("True");
        }

        let language = language.unwrap_or(&self.config.language);
        if !language.is_empty() {
            cmd.arg("--language").arg(language);
        }

        debug!("Executing transcription command: {:?}", cmd);

        let output = cmd.output()
            .map_err(|e| SunoError::Transcriber(format!(
                "Failed to execute {}: {}. Install the whisper command-line tool first.",
                self.config.binary_path, e
            )))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SunoError::Transcriber(format!(
                "Transcription failed: {}",
                stderr
            )));
        }

        // The engine writes <audio stem>.json into the output directory
        let audio_stem = audio_path
            .file_stem()
            .ok_or_else(|| SunoError::Transcriber("Invalid audio filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", audio_stem.to_string_lossy()));

        if !json_file.exists() {
            return Err(SunoError::Transcriber(
                "Engine JSON output file not found".to_string(),
            ));
        }

        let json_content = std::fs::read_to_string(&json_file)
            .map_err(|e| SunoError::Transcriber(format!("Failed to read engine output: {}", e)))?;

        let whisper_output: WhisperJsonOutput = serde_json::from_str(&json_content)
            .map_err(|e| SunoError::Transcriber(format!("Failed to parse engine JSON: {}", e)))?;

        WhisperJsonMapper::to_engine_transcript(whisper_output)
    }

    fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.binary_path)
            .arg("--help")
            .output()
            .map_err(|e| SunoError::Transcriber(format!(
                "{} not found: {}. Install with: pip install openai-whisper",
                self.config.binary_path, e
            )))?;

        if output.status.success() {
            info!("Transcription engine is available");
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(SunoError::Transcriber(format!(
                "Transcription engine check failed: {}",
                stderr
            )))
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
