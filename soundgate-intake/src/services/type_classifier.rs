//! Binary-signature audio type classification
//!
//! Maps the leading bytes of a file's content to a canonical audio
//! kind. Classification never consults the filename extension or any
//! platform-reported media type: dropped-folder entries routinely carry
//! empty or wrong type metadata, the bytes do not.

use crate::types::FileHandle;
use tracing::warn;

/// Number of leading bytes consulted by the classifier
pub const SIGNATURE_LEN: usize = 4;

/// Canonical audio container kind derived from a 4-byte magic number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioKind {
    /// RIFF container ("RIFF", 52 49 46 46)
    Wave,
    /// IFF/AIFF container ("FORM", 46 4f 52 4d)
    Aiff,
    /// Anything else
    Unknown,
}

impl AudioKind {
    /// Classify leading bytes by exact signature match
    ///
    /// Content shorter than the signature is Unknown.
    pub fn from_signature(bytes: &[u8]) -> AudioKind {
        match bytes {
            [0x52, 0x49, 0x46, 0x46, ..] => AudioKind::Wave,
            [0x46, 0x4f, 0x52, 0x4d, ..] => AudioKind::Aiff,
            _ => AudioKind::Unknown,
        }
    }

    /// True for any recognized audio container
    pub fn is_audio(&self) -> bool {
        !matches!(self, AudioKind::Unknown)
    }

    /// Media type string for recognized containers
    pub fn media_type(&self) -> Option<&'static str> {
        match self {
            AudioKind::Wave => Some("audio/x-wav"),
            AudioKind::Aiff => Some("audio/x-aiff"),
            AudioKind::Unknown => None,
        }
    }
}

/// Classify a file by reading its first [`SIGNATURE_LEN`] bytes
///
/// Pure function of the content: repeated calls on an unchanged handle
/// yield the same kind.
pub async fn classify(handle: &FileHandle) -> std::io::Result<AudioKind> {
    let prefix = handle.read_prefix(SIGNATURE_LEN).await?;
    Ok(AudioKind::from_signature(&prefix))
}

/// Classify, mapping read failures to Unknown
///
/// An unreadable file cannot prove it is audio; the failure is logged
/// and the batch-level type check treats the file as non-audio.
pub async fn classify_or_unknown(handle: &FileHandle) -> AudioKind {
    match classify(handle).await {
        Ok(kind) => kind,
        Err(e) => {
            warn!(file = %handle.name, error = %e, "Signature read failed");
            AudioKind::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_signature_matches() {
        assert_eq!(
            AudioKind::from_signature(&[0x52, 0x49, 0x46, 0x46, 0xAA, 0xBB]),
            AudioKind::Wave
        );
        assert_eq!(AudioKind::from_signature(b"RIFF"), AudioKind::Wave);
    }

    #[test]
    fn aiff_signature_matches() {
        assert_eq!(
            AudioKind::from_signature(&[0x46, 0x4F, 0x52, 0x4D]),
            AudioKind::Aiff
        );
        assert_eq!(AudioKind::from_signature(b"FORM"), AudioKind::Aiff);
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(
            AudioKind::from_signature(&[0x00, 0x00, 0x00, 0x00]),
            AudioKind::Unknown
        );
        assert_eq!(AudioKind::from_signature(b"OggS"), AudioKind::Unknown);
        // Too short to carry a signature.
        assert_eq!(AudioKind::from_signature(b"RIF"), AudioKind::Unknown);
        assert_eq!(AudioKind::from_signature(&[]), AudioKind::Unknown);
    }

    #[tokio::test]
    async fn classify_ignores_name_and_is_idempotent() {
        use crate::types::FileHandle;

        // A ".txt" name with WAV bytes is still Wave.
        let handle = FileHandle::from_bytes("notes.txt", b"RIFF0000WAVE".to_vec());
        assert_eq!(classify(&handle).await.unwrap(), AudioKind::Wave);
        assert_eq!(classify(&handle).await.unwrap(), AudioKind::Wave);

        // A ".wav" name with text bytes is Unknown.
        let fake = FileHandle::from_bytes("clip.wav", b"hello world".to_vec());
        assert_eq!(classify(&fake).await.unwrap(), AudioKind::Unknown);
    }
}
