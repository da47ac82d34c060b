// MEDIVOX Patient Ear
// Copyright (c) 2026 Xing_The_Creator | MEDIVOX

use async_trait::async_trait;
use reqwest::multipart;
use std::path::Path;
use tracing::info;

use crate::error::{ConsultError, ConsultResult};

/// Boundary to the hosted speech-to-text model.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Returns the transcript exactly as the model produced it.
    async fn transcribe(&self, audio_path: &Path) -> ConsultResult<String>;
}

/// OpenAI-compatible Whisper endpoint (Groq hosted).
pub struct WhisperClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl WhisperClient {
    pub fn new(client: reqwest::Client, api_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl SpeechToText for WhisperClient {
    async fn transcribe(&self, audio_path: &Path) -> ConsultResult<String> {
        info!("[EAR] Transcribing with {}: {:?}", self.model, audio_path);

        let bytes = tokio::fs::read(audio_path).await.map_err(|e| {
            ConsultError::Transcription(format!("cannot read audio {:?}: {}", audio_path, e))
        })?;

        let filename = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("recording.wav")
            .to_string();

        let form = multipart::Form::new()
            .part("file", multipart::Part::bytes(bytes).file_name(filename))
            .text("model", self.model.clone());

        let endpoint = format!("{}/audio/transcriptions", self.api_url.trim_end_matches('/'));

        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ConsultError::Transcription(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ConsultError::Transcription(format!(
                "API Error: {}",
                resp.status()
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ConsultError::Transcription(e.to_string()))?;

        // Transcript lives at the top-level "text" field
        let text = json["text"]
            .as_str()
            .ok_or_else(|| ConsultError::Transcription("no text in response".to_string()))?;

        info!("[EAR] Transcript: {} chars", text.len());
        Ok(text.to_string())
    }
}
