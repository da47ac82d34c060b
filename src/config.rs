// MEDIVOX Configuration
// Copyright (c) 2026 Xing_The_Creator | MEDIVOX

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Preferred dashboard port; the server scans upward from here when busy.
pub const DEFAULT_PORT: u16 = 7860;
pub const PORT_SCAN_RANGE: u16 = 10;

const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_STT_MODEL: &str = "whisper-large-v3";
const DEFAULT_VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
const DEFAULT_TTS_MODEL: &str = "playai-tts";
const DEFAULT_TTS_VOICE: &str = "Fritz-PlayAI";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub stt_model: String,
    pub vision_model: String,
    pub tts_model: String,
    pub tts_voice: String,
    /// Working area for synthesized audio and uploaded inputs.
    pub media_dir: PathBuf,
    /// Archive directory for saved consultations.
    pub output_dir: PathBuf,
    /// Bundled demo consultations shown on the dashboard.
    pub demos_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("GROQ_API_KEY")
            .context("GROQ_API_KEY is not set (put it in .env or the environment)")?;

        let env_or = |key: &str, default: &str| env::var(key).unwrap_or_else(|_| default.to_string());

        Ok(Self {
            api_url: env_or("MEDIVOX_API_URL", DEFAULT_API_URL),
            api_key,
            stt_model: env_or("MEDIVOX_STT_MODEL", DEFAULT_STT_MODEL),
            vision_model: env_or("MEDIVOX_VISION_MODEL", DEFAULT_VISION_MODEL),
            tts_model: env_or("MEDIVOX_TTS_MODEL", DEFAULT_TTS_MODEL),
            tts_voice: env_or("MEDIVOX_TTS_VOICE", DEFAULT_TTS_VOICE),
            media_dir: PathBuf::from(env_or("MEDIVOX_MEDIA_DIR", "media")),
            output_dir: PathBuf::from(env_or("MEDIVOX_OUTPUT_DIR", "doctor_responses")),
            demos_dir: PathBuf::from(env_or("MEDIVOX_DEMOS_DIR", "demos")),
        })
    }

    /// One-time idempotent directory setup, run before any request is accepted.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.media_dir)
            .with_context(|| format!("creating media dir {:?}", self.media_dir))?;
        fs::create_dir_all(self.upload_dir())
            .with_context(|| format!("creating upload dir {:?}", self.upload_dir()))?;
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating output dir {:?}", self.output_dir))?;
        info!(
            "[INIT] Directories ready: media={:?} output={:?}",
            self.media_dir, self.output_dir
        );
        Ok(())
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.media_dir.join("uploads")
    }
}
