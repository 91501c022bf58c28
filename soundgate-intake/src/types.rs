//! Core Types and Trait Definitions for the Intake Pipeline
//!
//! Defines the data model flowing through the pipeline and the two
//! platform seams:
//! - [`ByteSource`]: lazy asynchronous access to a file's bytes
//! - [`DirectoryReader`]: batched asynchronous listing of a directory
//!
//! Platform file handles are read-only to this crate; nothing here
//! mutates file content or metadata.

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub use soundgate_common::events::{EventOrigin, UploadRole};

/// Lazy accessor to a file's bytes
///
/// Content access is not guaranteed synchronous on any platform, so both
/// reads are async. Implementations must be cheap to clone behind an
/// `Arc` and safe to read from concurrently.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Read up to `len` leading bytes
    ///
    /// Returns fewer bytes only when the file itself is shorter.
    async fn read_prefix(&self, len: usize) -> std::io::Result<Vec<u8>>;

    /// Read the entire content
    async fn read_all(&self) -> std::io::Result<Vec<u8>>;
}

/// In-memory byte source
///
/// Used for host-supplied buffers and for tests.
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    async fn read_prefix(&self, len: usize) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.iter().take(len).copied().collect())
    }

    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Filesystem-backed byte source
pub struct FsSource {
    path: PathBuf,
}

impl FsSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ByteSource for FsSource {
    async fn read_prefix(&self, len: usize) -> std::io::Result<Vec<u8>> {
        use tokio::io::AsyncReadExt;

        let mut file = tokio::fs::File::open(&self.path).await?;
        let mut buffer = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            let n = file.read(&mut buffer[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        buffer.truncate(filled);
        Ok(buffer)
    }

    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// Opaque reference to a file's bytes plus metadata
///
/// Created by the platform seam (or test helpers), read-only afterwards.
#[derive(Clone)]
pub struct FileHandle {
    /// File name including extension
    pub name: String,
    /// Size in bytes as reported by the platform (directories surface
    /// as size-0 "files" in flat drop lists)
    pub size: u64,
    /// Path relative to the dropped top-level folder, when the platform
    /// exposes one (e.g. "album/track.wav")
    pub relative_path: Option<String>,
    source: Arc<dyn ByteSource>,
}

impl FileHandle {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        relative_path: Option<String>,
        source: Arc<dyn ByteSource>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            relative_path,
            source,
        }
    }

    /// Handle over an in-memory buffer
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::new(name, size, None, Arc::new(MemorySource::new(bytes)))
    }

    /// Handle over a filesystem path
    ///
    /// Fails if the file's metadata cannot be read.
    pub async fn from_fs_path(path: &std::path::Path) -> std::io::Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(
            name,
            metadata.len(),
            None,
            Arc::new(FsSource::new(path.to_path_buf())),
        ))
    }

    /// Read up to `len` leading bytes of the content
    pub async fn read_prefix(&self, len: usize) -> std::io::Result<Vec<u8>> {
        self.source.read_prefix(len).await
    }

    /// Read the entire content
    pub async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        self.source.read_all().await
    }

    /// File name with its extension stripped (preview element key)
    pub fn stem(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("relative_path", &self.relative_path)
            .finish()
    }
}

/// Batched directory listing
///
/// Platforms return a directory's children in one or more batches; a
/// single call is not guaranteed to return all of them. Callers MUST
/// keep invoking [`next_batch`](DirectoryReader::next_batch) until it
/// returns an empty batch.
#[async_trait]
pub trait DirectoryReader: Send + Sync {
    /// Next batch of child entries; an empty batch means exhausted
    async fn next_batch(&self) -> std::io::Result<Vec<Entry>>;
}

/// Directory handle within a dropped file-system tree
#[derive(Clone)]
pub struct DirectoryHandle {
    /// Directory name
    pub name: String,
    reader: Arc<dyn DirectoryReader>,
}

impl DirectoryHandle {
    pub fn new(name: impl Into<String>, reader: Arc<dyn DirectoryReader>) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }

    /// The batched reader for this directory's children
    pub fn reader(&self) -> &Arc<dyn DirectoryReader> {
        &self.reader
    }
}

impl fmt::Debug for DirectoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryHandle")
            .field("name", &self.name)
            .finish()
    }
}

/// Platform-level handle representing either a file or a directory
/// within a dropped file-system tree
#[derive(Debug, Clone)]
pub enum Entry {
    File(FileHandle),
    Directory(DirectoryHandle),
}

/// Upload event produced by the host UI, consumed once by the collector
#[derive(Debug)]
pub enum UploadEvent {
    /// File-picker selection (change event)
    Picker {
        /// Selected files in platform order
        files: Vec<FileHandle>,
    },
    /// Drop onto a drop-zone
    Drop {
        /// Flat platform view of the drop; directories appear here as
        /// size-0 "files"
        files: Vec<FileHandle>,
        /// Structured entries, used when directory content is present
        items: Vec<Entry>,
    },
}

impl UploadEvent {
    /// Which surface produced this event
    pub fn origin(&self) -> EventOrigin {
        match self {
            UploadEvent::Picker { .. } => EventOrigin::Picker,
            UploadEvent::Drop { .. } => EventOrigin::Drop,
        }
    }
}

/// Aggregated outcome of validating one upload
///
/// The accepted files are only reachable while the error list is empty;
/// downstream consumers never see a partially-valid batch.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    accepted: Vec<FileHandle>,
    errors: Vec<String>,
}

impl ValidationResult {
    pub fn new(accepted: Vec<FileHandle>, errors: Vec<String>) -> Self {
        Self { accepted, errors }
    }

    /// True when validation produced no errors
    pub fn is_accepted(&self) -> bool {
        self.errors.is_empty()
    }

    /// Accepted files; empty whenever any error was recorded
    pub fn files(&self) -> &[FileHandle] {
        if self.errors.is_empty() {
            &self.accepted
        } else {
            &[]
        }
    }

    /// Ordered distinct error messages
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_source_prefix_is_bounded() {
        let handle = FileHandle::from_bytes("clip.wav", vec![1, 2, 3]);
        assert_eq!(handle.read_prefix(4).await.unwrap(), vec![1, 2, 3]);
        assert_eq!(handle.read_prefix(2).await.unwrap(), vec![1, 2]);
        assert_eq!(handle.read_all().await.unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn stem_strips_extension() {
        let handle = FileHandle::from_bytes("kick.drum.wav", Vec::new());
        assert_eq!(handle.stem(), "kick");

        let plain = FileHandle::from_bytes("README", Vec::new());
        assert_eq!(plain.stem(), "README");
    }

    #[test]
    fn rejected_result_hides_accepted_files() {
        let files = vec![FileHandle::from_bytes("a.wav", Vec::new())];
        let rejected =
            ValidationResult::new(files.clone(), vec!["Only audio files are accepted.".into()]);
        assert!(!rejected.is_accepted());
        assert!(rejected.files().is_empty());

        let accepted = ValidationResult::new(files, Vec::new());
        assert!(accepted.is_accepted());
        assert_eq!(accepted.files().len(), 1);
    }
}
