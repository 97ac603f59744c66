//! Canonical entry shape returned by every filesystem operation.
//!
//! Backends answer with their own native payloads; normalization folds
//! them into [`Entry`] so callers never see medium-specific records.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::path::pathinfo;

/// What an entry is on the logical tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// Coarse access class a medium may expose (unix mode bits, ACL grants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// A file or directory as seen through the uniform view.
///
/// `path` is always prefix-relative with no trailing separator. The
/// derived name fields come from [`pathinfo`] so every backend reports
/// identical shapes for the same logical path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub kind: EntryKind,
    pub path: String,
    pub dirname: String,
    pub basename: String,
    pub filename: String,
    pub extension: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Seconds since the unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

impl Entry {
    /// Builds a directory entry for a logical path, trailing separators
    /// trimmed. Size and contents stay unset: directories report neither.
    pub fn directory(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let info = pathinfo(trimmed);
        Entry {
            kind: EntryKind::Dir,
            path: trimmed.to_string(),
            dirname: info.dirname,
            basename: info.basename,
            filename: info.filename,
            extension: info.extension,
            size: None,
            timestamp: None,
            contents: None,
            mimetype: None,
            visibility: None,
        }
    }

    /// Builds a file entry for a logical path with every optional field
    /// unset; normalization fills in what the backend reported.
    pub fn file(path: &str) -> Self {
        let info = pathinfo(path);
        Entry {
            kind: EntryKind::File,
            path: path.to_string(),
            dirname: info.dirname,
            basename: info.basename,
            filename: info.filename,
            extension: info.extension,
            size: None,
            timestamp: None,
            contents: None,
            mimetype: None,
            visibility: None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Per-write knobs forwarded to the backend.
///
/// Everything is optional; a default value writes with the medium's own
/// defaults. Options a medium cannot express are dropped by its adapter.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    pub visibility: Option<Visibility>,
    /// Overrides the mimetype guessed from the path extension.
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub content_encoding: Option<String>,
    pub content_disposition: Option<String>,
    /// Arbitrary key/value metadata attached to the stored object.
    pub metadata: Vec<(String, String)>,
    /// Object tags, for stores that support tagging.
    pub tags: Vec<(String, String)>,
}

impl WriteOptions {
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}
