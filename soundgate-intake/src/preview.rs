//! Audio preview clips for accepted uploads
//!
//! Builds one playable element per accepted file: content base64-encoded
//! into a data URL, keyed by the file's name with its extension
//! stripped. Only runs after validation, so reads here are real errors
//! rather than validation outcomes.

use crate::services::type_classifier::classify;
use crate::types::FileHandle;
use base64::{engine::general_purpose, Engine as _};
use soundgate_common::Result;

/// Media type used when the container is not recognized
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// One playable preview element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewClip {
    /// Element key: file name with its extension stripped
    pub id: String,
    /// `data:` URL with the base64-encoded content
    pub src: String,
}

/// Build preview clips for a list of accepted files
pub async fn build_previews(files: &[FileHandle]) -> Result<Vec<PreviewClip>> {
    let mut clips = Vec::with_capacity(files.len());
    for handle in files {
        clips.push(build_preview(handle).await?);
    }
    Ok(clips)
}

/// Build the preview clip for one file
pub async fn build_preview(handle: &FileHandle) -> Result<PreviewClip> {
    let kind = classify(handle).await?;
    let media_type = kind.media_type().unwrap_or(FALLBACK_MEDIA_TYPE);
    let bytes = handle.read_all().await?;
    let encoded = general_purpose::STANDARD.encode(&bytes);
    Ok(PreviewClip {
        id: handle.stem().to_string(),
        src: format!("data:{};base64,{}", media_type, encoded),
    })
}
