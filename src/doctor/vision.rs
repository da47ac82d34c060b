// MEDIVOX Clinical Eyes
// Copyright (c) 2026 Xing_The_Creator | MEDIVOX

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::error::{ConsultError, ConsultResult};

/// Boundary to the hosted vision-language model.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// `query` is the full instruction + symptom text; `image_data_url` is a
    /// base64 `data:` URL. The reply is opaque free text.
    async fn analyze(&self, query: &str, image_data_url: &str) -> ConsultResult<String>;
}

/// OpenAI-compatible chat-completions endpoint with image input.
pub struct VisionClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl VisionClient {
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
impl VisionModel for VisionClient {
    async fn analyze(&self, query: &str, image_data_url: &str) -> ConsultResult<String> {
        info!("[EYES] Consulting {} with image + query", self.model);

        let payload = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": query },
                        { "type": "image_url", "image_url": { "url": image_data_url } }
                    ]
                }
            ]
        });

        let endpoint = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));

        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ConsultError::Vision(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ConsultError::Vision(format!("API Error: {}", resp.status())));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ConsultError::Vision(e.to_string()))?;

        // Extract content from: choices[0].message.content
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ConsultError::Vision("empty response".to_string()))?;

        Ok(content.to_string())
    }
}
