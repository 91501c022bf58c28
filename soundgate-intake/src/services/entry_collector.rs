//! Entry collection for drop and picker events
//!
//! Flattens an [`UploadEvent`] into the list of files it reaches:
//! picker selections pass through untouched, drops are expanded by an
//! asynchronous depth-first traversal of any directory content.
//!
//! Completion is structured: one task per entry in a
//! [`tokio::task::JoinSet`], a directory counting as resolved only once
//! its reader is drained and all child tasks have joined. An entry that
//! fails to resolve contributes zero files and never stalls the
//! traversal.

use crate::types::{
    DirectoryHandle, DirectoryReader, Entry, FileHandle, FsSource, MemorySource, UploadEvent,
};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use soundgate_common::events::{EventBus, IntakeEvent};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Entry Collector
///
/// Produces a flat collection of file handles from one upload event.
/// Every leaf file reachable from a drop is included exactly once;
/// ordering across sibling directories is unspecified.
#[derive(Default)]
pub struct EntryCollector {
    bus: Option<EventBus>,
}

impl EntryCollector {
    pub fn new() -> Self {
        Self { bus: None }
    }

    /// Collector that reports skipped entries over an event bus
    pub fn with_bus(bus: EventBus) -> Self {
        Self { bus: Some(bus) }
    }

    /// Collect the files an upload event resolves to
    pub async fn collect(&self, event: UploadEvent) -> Vec<FileHandle> {
        match event {
            UploadEvent::Picker { files } => files,
            UploadEvent::Drop { files, items } => {
                // Platforms report dropped directories as size-0 "files"
                // in the flat list; with none present the flat list is
                // already complete.
                let has_directory = files.iter().any(|file| file.size == 0);
                if !has_directory {
                    return files;
                }

                debug!(items = items.len(), "Drop contains directory content, traversing");
                self.traverse(items).await
            }
        }
    }

    /// Expand dropped entries depth-first, concurrently
    async fn traverse(&self, items: Vec<Entry>) -> Vec<FileHandle> {
        let mut tasks = JoinSet::new();
        for entry in items {
            tasks.spawn(resolve_entry(entry, self.bus.clone()));
        }

        let mut collected = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(files) => collected.extend(files),
                Err(e) => warn!(error = %e, "Traversal task failed"),
            }
        }
        collected
    }
}

fn report_skip(bus: &Option<EventBus>, name: &str, reason: String) {
    if let Some(bus) = bus {
        bus.emit_lossy(IntakeEvent::EntrySkipped {
            name: name.to_string(),
            reason,
            timestamp: chrono::Utc::now(),
        });
    }
}

/// Resolve one entry to the leaf files beneath it
///
/// Directory readers may return children in several batches; the reader
/// is re-invoked until it yields an empty batch. A batch read failure
/// ends that directory's expansion with whatever was already dispatched.
fn resolve_entry(entry: Entry, bus: Option<EventBus>) -> BoxFuture<'static, Vec<FileHandle>> {
    async move {
        match entry {
            Entry::File(handle) => vec![handle],
            Entry::Directory(dir) => {
                let mut tasks = JoinSet::new();
                loop {
                    match dir.reader().next_batch().await {
                        Ok(batch) if batch.is_empty() => break,
                        Ok(batch) => {
                            for child in batch {
                                tasks.spawn(resolve_entry(child, bus.clone()));
                            }
                        }
                        Err(e) => {
                            warn!(directory = %dir.name, error = %e, "Directory batch read failed");
                            report_skip(&bus, &dir.name, e.to_string());
                            break;
                        }
                    }
                }

                let mut files = Vec::new();
                while let Some(joined) = tasks.join_next().await {
                    match joined {
                        Ok(children) => files.extend(children),
                        Err(e) => {
                            warn!(directory = %dir.name, error = %e, "Child resolution failed")
                        }
                    }
                }
                files
            }
        }
    }
    .boxed()
}

// ============================================================================
// Filesystem adapter
// ============================================================================

enum ReadState {
    Unopened,
    Open(tokio::fs::ReadDir),
    Exhausted,
}

/// Batched directory reader over the local filesystem
///
/// Emulates platform batching: each [`next_batch`] call returns at most
/// `batch_size` entries, and an empty batch once the directory is
/// drained. Symlinks and entries whose metadata cannot be read are
/// skipped with a warning.
///
/// [`next_batch`]: crate::types::DirectoryReader::next_batch
pub struct FsDirectoryReader {
    path: PathBuf,
    prefix: String,
    batch_size: usize,
    state: Mutex<ReadState>,
}

impl FsDirectoryReader {
    /// Reader for a top-level dropped directory
    pub fn new(path: PathBuf, batch_size: usize) -> Self {
        let prefix = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::with_prefix(path, prefix, batch_size)
    }

    fn with_prefix(path: PathBuf, prefix: String, batch_size: usize) -> Self {
        Self {
            path,
            prefix,
            batch_size: batch_size.max(1),
            state: Mutex::new(ReadState::Unopened),
        }
    }

    async fn entry_from(&self, dirent: tokio::fs::DirEntry) -> Option<Entry> {
        let name = dirent.file_name().to_string_lossy().into_owned();
        let file_type = match dirent.file_type().await {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!(entry = %name, error = %e, "Entry type unavailable, skipping");
                return None;
            }
        };

        if file_type.is_symlink() {
            warn!(entry = %name, "Symlink entry skipped");
            return None;
        }

        let child_prefix = if self.prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", self.prefix, name)
        };

        if file_type.is_dir() {
            let reader = Arc::new(Self::with_prefix(
                dirent.path(),
                child_prefix,
                self.batch_size,
            ));
            return Some(Entry::Directory(DirectoryHandle::new(name, reader)));
        }

        match dirent.metadata().await {
            Ok(metadata) => Some(Entry::File(FileHandle::new(
                name,
                metadata.len(),
                Some(child_prefix),
                Arc::new(FsSource::new(dirent.path())),
            ))),
            Err(e) => {
                warn!(entry = %name, error = %e, "Entry metadata unavailable, skipping");
                None
            }
        }
    }
}

#[async_trait]
impl DirectoryReader for FsDirectoryReader {
    async fn next_batch(&self) -> std::io::Result<Vec<Entry>> {
        let mut state = self.state.lock().await;
        let mut reader = match std::mem::replace(&mut *state, ReadState::Exhausted) {
            ReadState::Unopened => tokio::fs::read_dir(&self.path).await?,
            ReadState::Open(reader) => reader,
            ReadState::Exhausted => return Ok(Vec::new()),
        };

        let mut batch = Vec::new();
        while batch.len() < self.batch_size {
            match reader.next_entry().await {
                Ok(Some(dirent)) => {
                    if let Some(entry) = self.entry_from(dirent).await {
                        batch.push(entry);
                    }
                }
                Ok(None) => return Ok(batch),
                Err(e) => {
                    warn!(directory = %self.path.display(), error = %e, "Directory read failed");
                    return Ok(batch);
                }
            }
        }
        *state = ReadState::Open(reader);
        Ok(batch)
    }
}

/// Build a drop event from local paths the way a platform would
///
/// Every path appears in the flat file list (directories as size-0
/// handles) and as a structured entry for traversal.
pub async fn drop_event_from_paths(
    paths: &[PathBuf],
    batch_size: usize,
) -> std::io::Result<UploadEvent> {
    let mut files = Vec::new();
    let mut items = Vec::new();

    for path in paths {
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if metadata.is_dir() {
            files.push(FileHandle::new(
                name.clone(),
                0,
                None,
                Arc::new(MemorySource::new(Vec::new())),
            ));
            items.push(Entry::Directory(DirectoryHandle::new(
                name,
                Arc::new(FsDirectoryReader::new(path.clone(), batch_size)),
            )));
        } else {
            let handle = FileHandle::new(
                name,
                metadata.len(),
                None,
                Arc::new(FsSource::new(path.clone())),
            );
            files.push(handle.clone());
            items.push(Entry::File(handle));
        }
    }

    Ok(UploadEvent::Drop { files, items })
}

/// Build a picker event from local file paths
pub async fn picker_event_from_paths(paths: &[PathBuf]) -> std::io::Result<UploadEvent> {
    let mut files = Vec::new();
    for path in paths {
        files.push(FileHandle::from_fs_path(path).await?);
    }
    Ok(UploadEvent::Picker { files })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_file(name: &str, bytes: &[u8]) -> FileHandle {
        FileHandle::from_bytes(name, bytes.to_vec())
    }

    #[tokio::test]
    async fn picker_event_passes_through_in_order() {
        let collector = EntryCollector::new();
        let event = UploadEvent::Picker {
            files: vec![memory_file("a.wav", b"RIFF"), memory_file("b.aif", b"FORM")],
        };
        let files = collector.collect(event).await;
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.wav", "b.aif"]);
    }

    #[tokio::test]
    async fn flat_drop_takes_fast_path() {
        let collector = EntryCollector::new();
        let flat = vec![memory_file("a.wav", b"RIFF"), memory_file("b.wav", b"RIFFx")];
        let event = UploadEvent::Drop {
            files: flat.clone(),
            // Items intentionally empty: the fast path must not consult them.
            items: Vec::new(),
        };
        let files = collector.collect(event).await;
        assert_eq!(files.len(), 2);
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.wav", "b.wav"]);
    }

    #[tokio::test]
    async fn fs_reader_batches_until_empty() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            std::fs::write(dir.path().join(format!("clip{}.wav", i)), b"RIFF0000WAVE").unwrap();
        }

        let reader = FsDirectoryReader::new(dir.path().to_path_buf(), 2);
        let mut total = 0;
        let mut batches = 0;
        loop {
            let batch = reader.next_batch().await.unwrap();
            if batch.is_empty() {
                break;
            }
            assert!(batch.len() <= 2);
            total += batch.len();
            batches += 1;
        }
        assert_eq!(total, 5);
        assert!(batches >= 3);
        // Exhausted readers stay exhausted.
        assert!(reader.next_batch().await.unwrap().is_empty());
    }
}
