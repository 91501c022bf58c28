//! Placeholder path strings for the host's path field
//!
//! After acceptance the host pre-fills its path input with a template
//! the user completes. Target uploads name the file itself; corpus
//! uploads name the dropped top-level folder when the platform exposed
//! a relative path.

use crate::types::{FileHandle, UploadRole};

/// Fallback when the platform exposes no relative path for a folder
pub const FOLDER_NAME_PLACEHOLDER: &str = "{Add folder name}";

/// Placeholder path for the first accepted file of an upload
pub fn placeholder_path(file: &FileHandle, role: UploadRole) -> String {
    match role {
        UploadRole::Target => format!("{{Add full path to file}}/{}", file.name),
        UploadRole::Other => {
            let folder = file
                .relative_path
                .as_deref()
                .and_then(|path| path.split('/').next())
                .filter(|segment| !segment.is_empty())
                .unwrap_or(FOLDER_NAME_PLACEHOLDER);
            format!("{{Add full path to folder}}/{}", folder)
        }
    }
}
