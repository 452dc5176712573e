// Modular transcription architecture
//
// This module provides transcription engine implementations through a
// factory pattern:
// - WhisperCli: external whisper command-line tool with JSON output
//
// To add a new engine:
// 1. Create engine-specific data structures for parsing its JSON
// 2. Implement TranscriptMapper for the engine
// 3. Add the engine to TranscriberImplementation
// 4. Update the factory to create your implementation

pub mod common;
pub mod whisper_cli;

use async_trait::async_trait;
use std::path::Path;

pub use common::*;
use crate::config::TranscriberConfig;
use crate::error::Result;

/// Main trait for transcription operations
#[async_trait]
pub trait TranscriberTrait: Send + Sync {
    /// Transcribe an audio file into an engine-agnostic transcript
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<EngineTranscript>;

    /// Check that the engine binary is invocable
    fn check_availability(&self) -> Result<()>;

    /// Model identifier the engine was configured with
    fn model(&self) -> &str;
}

/// Transcriber implementation type
#[derive(Debug, Clone)]
pub enum TranscriberImplementation {
    WhisperCli,
    // Future implementations can be added here:
    // Vosk,
    // AssemblyAI,
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    pub fn create_transcriber(
        implementation: TranscriberImplementation,
        config: TranscriberConfig,
    ) -> Box<dyn TranscriberTrait> {
        match implementation {
            TranscriberImplementation::WhisperCli => {
                Box::new(whisper_cli::WhisperCliTranscriber::new(config))
            }
        }
    }

    pub fn create_default(config: TranscriberConfig) -> Box<dyn TranscriberTrait> {
        Self::create_transcriber(TranscriberImplementation::WhisperCli, config)
    }
}
