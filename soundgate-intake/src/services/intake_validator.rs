//! Intake validation
//!
//! Runs the count- and classification-based checks that gate every
//! downstream consumer, and aggregates the outcome into a
//! [`ValidationResult`].

use crate::services::type_classifier::classify_or_unknown;
use crate::types::{FileHandle, UploadRole, ValidationResult};
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

/// Error shown when a Target upload resolves to more than one file
pub const TARGET_CARDINALITY_ERROR: &str = "Only one target audio file may be uploaded.";
/// Error shown when any collected file fails signature classification
pub const AUDIO_TYPE_ERROR: &str = "Only audio files are accepted.";

/// Outstanding signature reads held concurrently during a batch check
const CLASSIFY_CONCURRENCY: usize = 8;

/// Intake Validator
#[derive(Debug, Default)]
pub struct IntakeValidator;

impl IntakeValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate collected files for an upload role
    ///
    /// A single non-audio file rejects the whole batch rather than being
    /// filtered out: the user is told once and retries with a clean
    /// selection. Never fails; every condition is recovered into the
    /// result's error list.
    pub async fn validate(&self, role: UploadRole, files: Vec<FileHandle>) -> ValidationResult {
        let mut errors = Vec::new();

        if role == UploadRole::Target && files.len() > 1 {
            errors.push(TARGET_CARDINALITY_ERROR.to_string());
        }

        if Self::any_non_audio(&files).await {
            errors.push(AUDIO_TYPE_ERROR.to_string());
        }

        if errors.is_empty() {
            info!(role = %role, files = files.len(), "Upload validated");
        } else {
            debug!(role = %role, errors = ?errors, "Upload rejected");
        }

        ValidationResult::new(files, errors)
    }

    /// True if any file's signature fails to classify as audio
    ///
    /// Signature reads run as interleaved asynchronous reads; the check
    /// short-circuits on the first Unknown and abandons the remaining
    /// reads.
    async fn any_non_audio(files: &[FileHandle]) -> bool {
        let mut kinds = stream::iter(files)
            .map(|handle| classify_or_unknown(handle))
            .buffer_unordered(CLASSIFY_CONCURRENCY);

        while let Some(kind) = kinds.next().await {
            if !kind.is_audio() {
                return true;
            }
        }
        false
    }
}

/// Merge fresh error messages into an already-displayed list
///
/// The relative order of already-shown messages is preserved; messages
/// not yet present are appended in their own order. Re-validation never
/// stacks duplicates.
pub fn merge_errors(existing: &[String], fresh: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = existing.to_vec();
    for message in fresh {
        if !merged.iter().any(|shown| shown == message) {
            merged.push(message.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav(name: &str) -> FileHandle {
        FileHandle::from_bytes(name, b"RIFF0000WAVEfmt ".to_vec())
    }

    fn aiff(name: &str) -> FileHandle {
        FileHandle::from_bytes(name, b"FORM0000AIFF".to_vec())
    }

    fn text(name: &str) -> FileHandle {
        FileHandle::from_bytes(name, b"hello".to_vec())
    }

    #[tokio::test]
    async fn target_with_two_valid_files_gets_only_cardinality_error() {
        let validator = IntakeValidator::new();
        let result = validator
            .validate(UploadRole::Target, vec![wav("a.wav"), wav("b.wav")])
            .await;
        assert_eq!(result.errors(), [TARGET_CARDINALITY_ERROR]);
        assert!(result.files().is_empty());
    }

    #[tokio::test]
    async fn target_with_zeroed_signature_gets_type_error() {
        let validator = IntakeValidator::new();
        let zeroed = FileHandle::from_bytes("quiet.wav", vec![0, 0, 0, 0, 1, 2]);
        let result = validator.validate(UploadRole::Target, vec![zeroed]).await;
        assert_eq!(result.errors(), [AUDIO_TYPE_ERROR]);
    }

    #[tokio::test]
    async fn one_bad_file_rejects_the_whole_batch() {
        let validator = IntakeValidator::new();
        let result = validator
            .validate(
                UploadRole::Other,
                vec![wav("a.wav"), aiff("b.aif"), text("notes.txt")],
            )
            .await;
        assert_eq!(result.errors(), [AUDIO_TYPE_ERROR]);
        assert!(result.files().is_empty());
    }

    #[tokio::test]
    async fn other_role_accepts_many_valid_files() {
        let validator = IntakeValidator::new();
        let result = validator
            .validate(UploadRole::Other, vec![wav("a.wav"), aiff("b.aif")])
            .await;
        assert!(result.is_accepted());
        assert_eq!(result.files().len(), 2);
    }

    #[tokio::test]
    async fn target_cardinality_and_type_errors_stack_in_order() {
        let validator = IntakeValidator::new();
        let result = validator
            .validate(UploadRole::Target, vec![wav("a.wav"), text("b.txt")])
            .await;
        assert_eq!(result.errors(), [TARGET_CARDINALITY_ERROR, AUDIO_TYPE_ERROR]);
    }

    #[test]
    fn merge_preserves_shown_order_and_appends_distinct() {
        let shown = vec![TARGET_CARDINALITY_ERROR.to_string()];
        let merged = merge_errors(
            &shown,
            &[
                TARGET_CARDINALITY_ERROR.to_string(),
                AUDIO_TYPE_ERROR.to_string(),
            ],
        );
        assert_eq!(merged, [TARGET_CARDINALITY_ERROR, AUDIO_TYPE_ERROR]);

        // Re-merging the same messages changes nothing.
        let again = merge_errors(&merged, &[AUDIO_TYPE_ERROR.to_string()]);
        assert_eq!(again, merged);
    }
}
