// MEDIVOX Response Archiver
// Copyright (c) 2026 Xing_The_Creator | MEDIVOX

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ConsultError, ConsultResult};

const TEXT_PREFIX: &str = "doctor_response_";
const AUDIO_PREFIX: &str = "doctor_voice_";

/// Persists consultation text and audio under second-resolution timestamped
/// names. Two archives landing in the same second share a name and the later
/// one wins; that collision is accepted.
pub struct Archiver {
    output_dir: PathBuf,
}

impl Archiver {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn stamp() -> String {
        Local::now().format("%Y%m%d_%H%M%S").to_string()
    }

    /// Write the text and move the audio file under one timestamped pair.
    /// Returns the audio's new home, or the given path untouched when the
    /// file does not exist.
    pub fn archive(&self, text: &str, audio_path: &Path) -> ConsultResult<PathBuf> {
        self.archive_as(&Self::stamp(), text, audio_path)
    }

    /// Same as [`archive`](Self::archive) with a caller-chosen stamp, which
    /// keeps the file naming deterministic.
    pub fn archive_as(&self, stamp: &str, text: &str, audio_path: &Path) -> ConsultResult<PathBuf> {
        self.write_text(stamp, text)?;

        if audio_path.exists() {
            let new_audio = self.output_dir.join(format!("{}{}.mp3", AUDIO_PREFIX, stamp));
            fs::rename(audio_path, &new_audio)
                .map_err(|e| ConsultError::Archive(format!("cannot move audio: {}", e)))?;
            info!("[ARCHIVE] Consultation archived as {}", stamp);
            Ok(new_audio)
        } else {
            Ok(audio_path.to_path_buf())
        }
    }

    /// Re-save already-displayed response text under a fresh stamp
    /// (the dashboard's "download text" action).
    pub fn save_text(&self, text: &str) -> ConsultResult<PathBuf> {
        self.write_text(&Self::stamp(), text)
    }

    /// Re-save already-displayed audio under a fresh stamp, copying so the
    /// original stays playable (the dashboard's "download audio" action).
    pub fn save_audio_copy(&self, audio_path: &Path) -> ConsultResult<PathBuf> {
        let new_audio = self
            .output_dir
            .join(format!("{}{}.mp3", AUDIO_PREFIX, Self::stamp()));
        fs::copy(audio_path, &new_audio)
            .map_err(|e| ConsultError::Archive(format!("cannot copy audio: {}", e)))?;
        Ok(new_audio)
    }

    fn write_text(&self, stamp: &str, text: &str) -> ConsultResult<PathBuf> {
        let path = self.output_dir.join(format!("{}{}.txt", TEXT_PREFIX, stamp));
        fs::write(&path, text)
            .map_err(|e| ConsultError::Archive(format!("cannot write text: {}", e)))?;
        Ok(path)
    }
}
