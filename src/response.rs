//! Backend-native payloads and their normalization into [`Entry`].
//!
//! Each backend reports results as [`RawResponse`] values close to what
//! its medium actually returned: an object record, a common prefix from
//! a delimiter listing, or a stat record from a disk walk. Normalization
//! is the single place those shapes fold into the canonical entry.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::entry::{Entry, EntryKind, Visibility};
use crate::path::PathPrefixer;

/// A result payload in the vocabulary of the backend that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// An object record from a flat-namespace store.
    Object {
        /// Physical key, root prefix still applied.
        key: String,
        size: Option<u64>,
        last_modified: Option<DateTime<Utc>>,
        content_type: Option<String>,
        body: Option<Bytes>,
        visibility: Option<Visibility>,
    },
    /// A common prefix from a delimiter listing, trailing separator kept.
    Prefix { prefix: String },
    /// A stat record from a medium with real directories.
    Stat {
        /// Physical location, root prefix still applied.
        path: String,
        is_dir: bool,
        size: u64,
        modified: Option<DateTime<Utc>>,
        /// File contents when the record came from a read.
        body: Option<Bytes>,
        visibility: Option<Visibility>,
    },
}

impl RawResponse {
    /// Normalizes a backend payload into the canonical entry.
    ///
    /// `explicit_path` carries the caller-supplied logical path for
    /// single-path operations; when absent the logical path is recovered
    /// by stripping the root prefix from the physical location. A
    /// resolved path ending in a separator always classifies as a
    /// directory, whatever the variant says.
    pub(crate) fn into_entry(self, explicit_path: Option<&str>, prefix: &PathPrefixer) -> Entry {
        match self {
            RawResponse::Object {
                key,
                size,
                last_modified,
                content_type,
                body,
                visibility,
            } => {
                let path = resolve(explicit_path, &key, prefix);
                if path.ends_with('/') {
                    let mut entry = Entry::directory(&path);
                    entry.timestamp = last_modified.map(|t| t.timestamp());
                    entry
                } else {
                    let mut entry = Entry::file(&path);
                    entry.size = size;
                    entry.timestamp = last_modified.map(|t| t.timestamp());
                    entry.mimetype = content_type;
                    entry.contents = body;
                    entry.visibility = visibility;
                    entry
                }
            }
            RawResponse::Prefix { prefix: raw } => {
                let path = resolve(explicit_path, &raw, prefix);
                Entry::directory(&path)
            }
            RawResponse::Stat {
                path: raw,
                is_dir,
                size,
                modified,
                body,
                visibility,
            } => {
                let path = resolve(explicit_path, &raw, prefix);
                if is_dir || path.ends_with('/') {
                    let mut entry = Entry::directory(&path);
                    entry.timestamp = modified.map(|t| t.timestamp());
                    entry.visibility = visibility;
                    entry
                } else {
                    let mut entry = Entry::file(&path);
                    entry.size = Some(size);
                    entry.timestamp = modified.map(|t| t.timestamp());
                    entry.contents = body;
                    entry.visibility = visibility;
                    entry
                }
            }
        }
    }
}

fn resolve(explicit_path: Option<&str>, physical: &str, prefix: &PathPrefixer) -> String {
    match explicit_path {
        Some(path) => path.to_string(),
        None => prefix.remove(physical),
    }
}
