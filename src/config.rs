use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, SunoError};

// Default values for optional enhance configuration
fn default_confidence_threshold() -> f64 {
    0.7
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub transcriber: TranscriberConfig,
    pub timing: TimingConfig,
    pub enhance: EnhanceConfig,
    pub media: MediaConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Path to the transcription binary (e.g., whisper)
    pub binary_path: String,
    /// Model identifier passed to the engine
    pub model: String,
    /// Source language hint
    pub language: String,
    /// Request word-level timestamps from the engine
    pub word_timestamps: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Milliseconds reserved before the first word when the true
    /// audio duration is known
    pub lead_in_ms: u64,
    /// Milliseconds reserved after the last word when the true
    /// audio duration is known
    pub trail_buffer_ms: u64,
    /// Per-word span when no duration evidence exists at all
    pub fallback_word_ms: u64,
    /// Word end fallback when the engine reports only a start timestamp
    pub default_word_end_ms: u64,
    /// Chunk end fallback when the engine reports only a chunk start
    pub chunk_fallback_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhanceConfig {
    /// Correction API endpoint (OpenAI-compatible chat completions)
    pub endpoint: String,
    /// LLM model to use for correction
    pub model: String,
    /// API key; usually injected from GROQ_API_KEY at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Captions strictly below this confidence are flagged for review
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    /// HTTP timeout for the correction call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to the duration probe binary (ffprobe)
    pub probe_binary_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Path to the sync binary (rclone)
    pub binary_path: String,
    /// Pre-configured rclone remote name
    pub remote: String,
    /// Explicit rclone config file; None uses rclone's default lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    /// Where the upload result-status JSON is written
    pub result_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transcriber: TranscriberConfig {
                binary_path: "whisper".to_string(),
                model: "oriserve/whisper-hindi2hinglish-apex".to_string(),
                language: "hi".to_string(),
                word_timestamps: true,
            },
            timing: TimingConfig {
                lead_in_ms: 200,
                trail_buffer_ms: 500,
                fallback_word_ms: 300,
                default_word_end_ms: 200,
                chunk_fallback_ms: 1000,
            },
            enhance: EnhanceConfig {
                endpoint: "https://api.groq.com/openai/v1".to_string(),
                model: "llama-3.3-70b-versatile".to_string(),
                api_key: None,
                confidence_threshold: 0.7,
                request_timeout_secs: 30,
            },
            media: MediaConfig {
                probe_binary_path: "ffprobe".to_string(),
            },
            upload: UploadConfig {
                binary_path: "rclone".to_string(),
                remote: "gdrive".to_string(),
                config_path: None,
                result_path: "upload_result.json".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SunoError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SunoError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SunoError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SunoError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
