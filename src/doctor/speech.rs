// MEDIVOX Doctor Voice
// Copyright (c) 2026 Xing_The_Creator | MEDIVOX

use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use tracing::info;

use crate::error::{ConsultError, ConsultResult};

/// Boundary to the hosted text-to-speech engine.
#[async_trait]
pub trait SpeechSynthesis: Send + Sync {
    /// Writes an mp3 of `text` to `output_path`.
    async fn speak(&self, text: &str, output_path: &Path) -> ConsultResult<()>;
}

/// OpenAI-compatible speech endpoint (Groq hosted).
pub struct SpeechClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    voice: String,
}

impl SpeechClient {
    pub fn new(
        client: reqwest::Client,
        api_url: &str,
        api_key: &str,
        model: &str,
        voice: &str,
    ) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            voice: voice.to_string(),
        }
    }
}

#[async_trait]
impl SpeechSynthesis for SpeechClient {
    async fn speak(&self, text: &str, output_path: &Path) -> ConsultResult<()> {
        if text.trim().is_empty() {
            return Err(ConsultError::Synthesis("nothing to say".to_string()));
        }

        info!("[VOICE] Synthesizing {} chars -> {:?}", text.len(), output_path);

        let payload = json!({
            "model": self.model,
            "voice": self.voice,
            "input": text,
            "response_format": "mp3"
        });

        let endpoint = format!("{}/audio/speech", self.api_url.trim_end_matches('/'));

        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ConsultError::Synthesis(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ConsultError::Synthesis(format!(
                "API Error: {}",
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ConsultError::Synthesis(e.to_string()))?;

        tokio::fs::write(output_path, &bytes)
            .await
            .map_err(|e| ConsultError::Synthesis(format!("cannot write {:?}: {}", output_path, e)))?;

        Ok(())
    }
}
