//! Logical path helpers.
//!
//! Paths in the uniform view are `/`-separated strings relative to a
//! configured root prefix. Helpers here never touch the filesystem:
//! they only slice strings, so every backend derives identical name
//! fields for the same logical path.

/// Name fields derived from a logical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    pub dirname: String,
    pub basename: String,
    pub filename: String,
    pub extension: String,
}

/// Splits a logical path into dirname, basename, filename and extension.
///
/// A trailing separator is ignored. `filename` is the basename up to the
/// first dot and `extension` is the segment between the first and second
/// dots, so `a.tar.gz` reports filename `a` and extension `tar`, and a
/// dotfile like `.env` reports an empty filename with extension `env`.
pub fn pathinfo(path: &str) -> PathInfo {
    let trimmed = path.trim_end_matches('/');
    let basename = trimmed.rsplit('/').next().unwrap_or("").to_string();
    let mut pieces = basename.split('.');
    let filename = pieces.next().unwrap_or("").to_string();
    let extension = pieces.next().unwrap_or("").to_string();
    PathInfo {
        dirname: dirname(trimmed),
        basename,
        filename,
        extension,
    }
}

/// Parent of a logical path, with `.` and the top level both reported
/// as the empty string.
pub fn dirname(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((parent, _)) if parent == "." => String::new(),
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}

/// Maps logical paths to physical locations under a root prefix.
///
/// An empty prefix disables mapping entirely. Any other prefix is stored
/// with exactly one trailing separator, so applying it never doubles
/// separators and removing it strips exactly what was applied.
#[derive(Debug, Clone, Default)]
pub struct PathPrefixer {
    prefix: Option<String>,
}

impl PathPrefixer {
    pub fn new(prefix: &str) -> Self {
        let mut prefixer = PathPrefixer::default();
        prefixer.set_prefix(prefix);
        prefixer
    }

    /// Replaces the root prefix. An empty string disables prefixing.
    pub fn set_prefix(&mut self, prefix: &str) {
        if prefix.is_empty() {
            self.prefix = None;
            return;
        }
        let trimmed = prefix.trim_end_matches(['/', '\\']);
        self.prefix = Some(format!("{}/", trimmed));
    }

    /// Currently configured prefix, trailing separator included.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Physical location for a logical path.
    pub fn apply(&self, path: &str) -> String {
        match &self.prefix {
            Some(root) => format!("{}{}", root, path.trim_start_matches(['/', '\\'])),
            None => path.to_string(),
        }
    }

    /// Logical path for a physical location produced by [`apply`].
    ///
    /// Strips exactly the prefix length; no containment check is made.
    ///
    /// [`apply`]: PathPrefixer::apply
    pub fn remove(&self, path: &str) -> String {
        match &self.prefix {
            Some(root) => path.get(root.len()..).unwrap_or("").to_string(),
            None => path.to_string(),
        }
    }
}
