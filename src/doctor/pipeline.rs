// MEDIVOX Consultation Pipeline - The "Attending"
// Copyright (c) 2026 Xing_The_Creator | MEDIVOX
//
// One submission, one linear run: transcribe -> look -> speak -> archive.
// No queuing, no retries; a failed stage fails the whole consultation.

use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::doctor::archive::Archiver;
use crate::doctor::image;
use crate::doctor::prompt::{self, NO_IMAGE_RESPONSE};
use crate::doctor::speech::{SpeechClient, SpeechSynthesis};
use crate::doctor::transcribe::{SpeechToText, WhisperClient};
use crate::doctor::vision::{VisionClient, VisionModel};
use crate::error::ConsultResult;

/// Outcome of one full pipeline run for a single patient submission.
#[derive(Debug, Clone)]
pub struct Consultation {
    pub id: Uuid,
    pub transcript: String,
    pub doctor_text: String,
    /// Synthesized speech; lives under the media dir, or under the archive
    /// dir when the patient asked to save.
    pub audio_path: PathBuf,
    pub archived: bool,
}

pub struct Doctor {
    ear: Box<dyn SpeechToText>,
    eyes: Box<dyn VisionModel>,
    voice: Box<dyn SpeechSynthesis>,
    archiver: Archiver,
    media_dir: PathBuf,
}

impl Doctor {
    /// Wire up the hosted model clients over one shared HTTP connection pool.
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::new();
        Self {
            ear: Box::new(WhisperClient::new(
                client.clone(),
                &config.api_url,
                &config.api_key,
                &config.stt_model,
            )),
            eyes: Box::new(VisionClient::new(
                client.clone(),
                &config.api_url,
                &config.api_key,
                &config.vision_model,
            )),
            voice: Box::new(SpeechClient::new(
                client,
                &config.api_url,
                &config.api_key,
                &config.tts_model,
                &config.tts_voice,
            )),
            archiver: Archiver::new(&config.output_dir),
            media_dir: config.media_dir.clone(),
        }
    }

    /// Caller-supplied model boundaries, for embedding and for tests.
    pub fn with_clients(
        ear: Box<dyn SpeechToText>,
        eyes: Box<dyn VisionModel>,
        voice: Box<dyn SpeechSynthesis>,
        archiver: Archiver,
        media_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ear,
            eyes,
            voice,
            archiver,
            media_dir: media_dir.into(),
        }
    }

    pub fn archiver(&self) -> &Archiver {
        &self.archiver
    }

    /// Where a consultation's synthesized speech lands before any archiving.
    /// Every run gets its own file, so concurrent submissions never clobber
    /// each other's audio.
    pub fn media_path(&self, id: Uuid) -> PathBuf {
        self.media_dir.join(format!("consult_{}.mp3", id))
    }

    /// Run one consultation: transcribe the recording, analyze the image
    /// (or fall back to the fixed no-image reply), voice the response, and
    /// optionally archive the pair.
    pub async fn consult(
        &self,
        audio_path: &Path,
        image_path: Option<&Path>,
        save: bool,
    ) -> ConsultResult<Consultation> {
        let id = Uuid::new_v4();
        info!("[PIPELINE] 🩺 Consultation {} started", id);

        let transcript = self.ear.transcribe(audio_path).await?;

        let doctor_text = match image_path {
            Some(img) => {
                let encoded = image::encode_image(img)?;
                let query = prompt::compose_query(&transcript);
                self.eyes.analyze(&query, &encoded).await?
            }
            None => {
                // Normal branch, not an error
                info!("[PIPELINE] No image supplied, skipping visual analysis");
                NO_IMAGE_RESPONSE.to_string()
            }
        };

        let mut audio_out = self.media_path(id);
        self.voice.speak(&doctor_text, &audio_out).await?;

        let mut archived = false;
        if save {
            audio_out = self.archiver.archive(&doctor_text, &audio_out)?;
            archived = true;
        }

        info!("[PIPELINE] ✅ Consultation {} complete", id);
        Ok(Consultation {
            id,
            transcript,
            doctor_text,
            audio_path: audio_out,
            archived,
        })
    }
}
