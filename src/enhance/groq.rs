use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::EnhanceConfig;
use crate::error::{Result, SunoError};
use super::CorrectionProvider;

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Hinglish correction through Groq's OpenAI-compatible chat API
pub struct GroqCorrector {
    client: Client,
    config: EnhanceConfig,
    api_key: String,
}

impl GroqCorrector {
    pub fn new(config: EnhanceConfig, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("HTTP client creation should not fail");

        Self {
            client,
            config,
            api_key,
        }
    }

    fn build_correction_prompt(&self, text: &str) -> String {
        format!(
            "You are a Hinglish text corrector. Fix spelling and transliteration errors \
             in this transcribed Hinglish text.\n\
             \n\
             Rules:\n\
             - Keep words in Roman script (no Devanagari)\n\
             - Fix common misheard words (e.g., \"ka\" -> \"kya\", \"hay\" -> \"hai\")\n\
             - Maintain the EXACT number of words - do NOT add or remove words\n\
             - Return ONLY the corrected text, nothing else\n\
             \n\
             Original: {}\n\
             \n\
             Corrected:",
            text
        )
    }
}

#[async_trait]
impl CorrectionProvider for GroqCorrector {
    async fn correct(&self, text: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: self.build_correction_prompt(text),
            }],
            temperature: 0.1,
            max_tokens: text.len() * 2,
        };

        let url = format!("{}/chat/completions", self.config.endpoint);
        debug!("Sending correction request to: {}", url);

        let response = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SunoError::Enhance(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SunoError::Enhance(format!(
                "Correction API error {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await
            .map_err(|e| SunoError::Enhance(format!("Failed to parse response: {}", e)))?;

        let corrected = completion
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| SunoError::Enhance("Empty correction response".to_string()))?;

        if corrected.is_empty() {
            return Err(SunoError::Enhance("Empty correction received".to_string()));
        }

        Ok(corrected)
    }
}
