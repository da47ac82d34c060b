// MEDIVOX Error Taxonomy
// Copyright (c) 2026 Xing_The_Creator | MEDIVOX

use thiserror::Error;

/// Marker prepended to every user-visible failure message. The dashboard
/// checks for this prefix to decide whether download actions are offered.
pub const ERROR_PREFIX: &str = "An error occurred: ";

/// One variant per pipeline stage that can fail, so callers can branch on
/// the kind instead of string-matching.
#[derive(Debug, Error)]
pub enum ConsultError {
    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("vision analysis failed: {0}")]
    Vision(String),

    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("archiving failed: {0}")]
    Archive(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ConsultError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConsultError::Transcription(_) => "transcription",
            ConsultError::Vision(_) => "vision",
            ConsultError::Synthesis(_) => "synthesis",
            ConsultError::Archive(_) => "archive",
            ConsultError::InvalidInput(_) => "invalid-input",
        }
    }

    /// Collapse into the single prefixed string shown to the patient.
    pub fn user_message(&self) -> String {
        format!("{}{}", ERROR_PREFIX, self)
    }
}

pub type ConsultResult<T> = Result<T, ConsultError>;
