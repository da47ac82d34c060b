use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{Config, PORT_SCAN_RANGE};
use crate::doctor::Consultation;
use crate::error::{ConsultError, ConsultResult, ERROR_PREFIX};
use crate::state::{ClinicState, DashboardStatus};

pub type AppState = Arc<ClinicState>;

/// Demo consultations offered on the dashboard when the files are bundled.
const EXAMPLE_PAIRS: &[(&str, &str)] = &[
    ("cough.wav", "skin_rash.jpg"),
    ("headache.wav", "eye_redness.jpg"),
];

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// What the dashboard renders after a submission. On failure both text slots
/// carry the same prefixed message and the audio link is absent, which is
/// what gates the download actions client-side.
#[derive(Debug, Serialize)]
pub struct ConsultView {
    pub transcript: String,
    pub doctor_response: String,
    pub audio_url: Option<String>,
}

impl ConsultView {
    pub fn from_result(result: ConsultResult<Consultation>, config: &Config) -> Self {
        match result {
            Ok(c) => Self {
                transcript: c.transcript,
                doctor_response: c.doctor_text,
                audio_url: public_url(&c.audio_path, config),
            },
            Err(e) => Self::failure(&e),
        }
    }

    pub fn failure(err: &ConsultError) -> Self {
        let msg = err.user_message();
        Self {
            transcript: msg.clone(),
            doctor_response: msg,
            audio_url: None,
        }
    }
}

#[derive(Deserialize)]
pub struct DownloadTextRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct DownloadAudioRequest {
    pub audio_url: String,
}

#[derive(Serialize)]
pub struct DownloadView {
    pub file_url: String,
    pub filename: String,
}

#[derive(Serialize)]
pub struct ExamplePair {
    pub label: String,
    pub audio_url: String,
    pub image_url: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/examples", get(get_examples))
        .route("/api/consult", post(consult))
        .route("/api/download/text", post(download_text))
        .route("/api/download/audio", post(download_audio))
        .nest_service("/media", ServeDir::new(state.config.media_dir.clone()))
        .nest_service("/archive", ServeDir::new(state.config.output_dir.clone()))
        .nest_service("/demos", ServeDir::new(state.config.demos_dir.clone()))
        .fallback_service(ServeDir::new("dashboard"))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(port: u16, state: AppState) -> anyhow::Result<()> {
    let app = router(state);

    let listener = bind_with_fallback(port, PORT_SCAN_RANGE).await?;
    let bound = listener.local_addr()?.port();
    info!("🩺 MEDIVOX clinic running on http://127.0.0.1:{}", bound);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Bind the preferred port, scanning a small range above it when occupied.
pub async fn bind_with_fallback(preferred: u16, attempts: u16) -> anyhow::Result<TcpListener> {
    for port in preferred..preferred.saturating_add(attempts) {
        match TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await {
            Ok(listener) => {
                if port != preferred {
                    warn!("[SERVER] Port {} busy, falling back to {}", preferred, port);
                }
                return Ok(listener);
            }
            Err(_) => continue,
        }
    }
    anyhow::bail!(
        "no free port in {}..{}",
        preferred,
        preferred.saturating_add(attempts)
    )
}

async fn get_status(State(state): State<AppState>) -> Json<DashboardStatus> {
    let stats = state.stats.lock().unwrap_or_else(|e| e.into_inner()).clone();
    Json(DashboardStatus {
        stats,
        output_dir: state.config.output_dir.display().to_string(),
    })
}

async fn get_examples(State(state): State<AppState>) -> Json<Vec<ExamplePair>> {
    let demos = &state.config.demos_dir;
    let pairs = EXAMPLE_PAIRS
        .iter()
        .filter(|(audio, img)| demos.join(audio).exists() && demos.join(img).exists())
        .map(|(audio, img)| ExamplePair {
            label: audio.trim_end_matches(".wav").replace('_', " "),
            audio_url: format!("/demos/{}", audio),
            image_url: format!("/demos/{}", img),
        })
        .collect();
    Json(pairs)
}

async fn consult(State(state): State<AppState>, mut multipart: Multipart) -> Json<ConsultView> {
    let upload_dir = state.config.upload_dir();

    let mut audio: Option<PathBuf> = None;
    let mut image: Option<PathBuf> = None;
    let mut save = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                let err = ConsultError::InvalidInput(format!("malformed upload: {}", e));
                return failure_response(&state, &err);
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        let original = field.file_name().map(|n| n.to_string());

        match name.as_str() {
            "audio" | "image" => {
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let err = ConsultError::InvalidInput(format!("upload truncated: {}", e));
                        return failure_response(&state, &err);
                    }
                };
                match store_upload(&upload_dir, &name, original.as_deref(), &bytes).await {
                    Ok(path) if name == "audio" => audio = Some(path),
                    Ok(path) => image = Some(path),
                    Err(e) => {
                        let err = ConsultError::InvalidInput(format!("cannot store upload: {}", e));
                        return failure_response(&state, &err);
                    }
                }
            }
            "save" => {
                let value = field.text().await.unwrap_or_default();
                save = matches!(value.as_str(), "true" | "on" | "1");
            }
            _ => {}
        }
    }

    let Some(audio_path) = audio else {
        let err = ConsultError::InvalidInput("no audio recording supplied".to_string());
        return failure_response(&state, &err);
    };

    let result = state
        .doctor
        .consult(&audio_path, image.as_deref(), save)
        .await;

    // Inputs are consumed once per submission, never retained
    let _ = tokio::fs::remove_file(&audio_path).await;
    if let Some(img) = &image {
        let _ = tokio::fs::remove_file(img).await;
    }

    if let Err(e) = &result {
        error!("[SERVER] Consultation failed ({}): {}", e.kind(), e);
    }
    let failed = result.is_err();
    let archived = matches!(&result, Ok(c) if c.archived);
    state.record_consultation(failed, archived);

    Json(ConsultView::from_result(result, &state.config))
}

async fn download_text(
    State(state): State<AppState>,
    Json(req): Json<DownloadTextRequest>,
) -> Result<Json<DownloadView>, (StatusCode, String)> {
    if req.text.is_empty() || req.text.starts_with(ERROR_PREFIX) {
        return Err((
            StatusCode::BAD_REQUEST,
            "no downloadable response".to_string(),
        ));
    }

    let path = state
        .doctor
        .archiver()
        .save_text(&req.text)
        .map_err(internal)?;
    download_view(&path, &state.config)
}

async fn download_audio(
    State(state): State<AppState>,
    Json(req): Json<DownloadAudioRequest>,
) -> Result<Json<DownloadView>, (StatusCode, String)> {
    let Some(path) = resolve_public_url(&req.audio_url, &state.config) else {
        return Err((StatusCode::BAD_REQUEST, "unknown audio".to_string()));
    };
    if !path.exists() {
        return Err((StatusCode::BAD_REQUEST, "audio no longer exists".to_string()));
    }

    let saved = state
        .doctor
        .archiver()
        .save_audio_copy(&path)
        .map_err(internal)?;
    download_view(&saved, &state.config)
}

fn failure_response(state: &AppState, err: &ConsultError) -> Json<ConsultView> {
    error!("[SERVER] Rejected submission ({}): {}", err.kind(), err);
    state.record_consultation(true, false);
    Json(ConsultView::failure(err))
}

fn internal(err: ConsultError) -> (StatusCode, String) {
    error!("[SERVER] Download failed ({}): {}", err.kind(), err);
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn download_view(path: &Path, config: &Config) -> Result<Json<DownloadView>, (StatusCode, String)> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("download")
        .to_string();
    let file_url = public_url(path, config).ok_or((
        StatusCode::INTERNAL_SERVER_ERROR,
        "saved outside served dirs".to_string(),
    ))?;
    Ok(Json(DownloadView { file_url, filename }))
}

async fn store_upload(
    dir: &Path,
    kind: &str,
    original_name: Option<&str>,
    bytes: &[u8],
) -> std::io::Result<PathBuf> {
    let fallback_ext = if kind == "image" { "jpg" } else { "wav" };
    let ext = original_name
        .and_then(|n| Path::new(n).extension().and_then(|e| e.to_str()))
        .unwrap_or(fallback_ext);
    let path = dir.join(format!("{}_{}.{}", kind, Uuid::new_v4(), ext));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Map an on-disk artifact to the URL the router serves it under.
pub fn public_url(path: &Path, config: &Config) -> Option<String> {
    if let Ok(rest) = path.strip_prefix(&config.media_dir) {
        return Some(format!("/media/{}", rest.display()));
    }
    if let Ok(rest) = path.strip_prefix(&config.output_dir) {
        return Some(format!("/archive/{}", rest.display()));
    }
    None
}

/// Inverse of [`public_url`] for the download actions. Only bare filenames
/// directly under the served dirs resolve; traversal segments do not.
pub fn resolve_public_url(url: &str, config: &Config) -> Option<PathBuf> {
    let (root, name) = if let Some(name) = url.strip_prefix("/media/") {
        (&config.media_dir, name)
    } else if let Some(name) = url.strip_prefix("/archive/") {
        (&config.output_dir, name)
    } else {
        return None;
    };

    if name.is_empty() || name.contains('/') || name.contains("..") {
        return None;
    }
    Some(root.join(name))
}
