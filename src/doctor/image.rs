// MEDIVOX Image Encoder
// Copyright (c) 2026 Xing_The_Creator | MEDIVOX

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::Path;
use tracing::info;

use crate::error::{ConsultError, ConsultResult};

/// Read an uploaded image and produce the `data:` URL embedded in the
/// vision request. The mime type comes from the file's magic bytes, not its
/// extension, so misnamed uploads still encode correctly.
pub fn encode_image(path: &Path) -> ConsultResult<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| ConsultError::InvalidInput(format!("cannot read image {:?}: {}", path, e)))?;

    let mime = match image::guess_format(&bytes) {
        Ok(format) => format.to_mime_type(),
        Err(_) => "image/jpeg",
    };

    info!("[EYES] Encoded {:?} as {} ({} bytes)", path, mime, bytes.len());
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(&bytes)))
}
