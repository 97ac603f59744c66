//! The uniform filesystem view.
//!
//! [`Filesystem`] is the caller-facing surface: it maps logical paths
//! onto physical locations, drives one [`Backend`], normalizes whatever
//! the medium answered and emulates directories over flat listings. The
//! same calls behave the same against local disk, S3, GCS or the
//! in-memory store.

use bytes::Bytes;

use crate::backend::{Backend, LocalBackend, ObjectStoreBackend};
use crate::emulate::emulate_directories;
use crate::entry::{Entry, Visibility, WriteOptions};
use crate::error::{Error, Result};
use crate::path::PathPrefixer;

/// A filesystem-like view over one storage backend.
///
/// Paths are logical: `/`-separated and relative to the configured root
/// prefix. Expected failures of destructive calls (`delete`, `rename`,
/// `copy`, `delete_dir`) report as `Ok(false)`; reads and stats of
/// missing paths report [`Error::NotFound`]; operations a medium cannot
/// express report [`Error::NotImplemented`].
pub struct Filesystem {
    backend: Box<dyn Backend>,
    prefix: PathPrefixer,
}

impl Filesystem {
    pub fn new(backend: impl Backend + 'static, prefix: &str) -> Self {
        Filesystem {
            backend: Box::new(backend),
            prefix: PathPrefixer::new(prefix),
        }
    }

    /// View over a local directory tree.
    pub fn local(root: &str) -> Self {
        Filesystem::new(LocalBackend::new(), root)
    }

    /// View over a fresh in-memory store.
    pub fn memory() -> Self {
        Filesystem::new(ObjectStoreBackend::memory(), "")
    }

    /// Replaces the root prefix for all subsequent operations.
    pub fn set_path_prefix(&mut self, prefix: &str) {
        self.prefix.set_prefix(prefix);
    }

    /// Current root prefix, trailing separator included.
    pub fn path_prefix(&self) -> Option<&str> {
        self.prefix.prefix()
    }

    /// Whether anything exists at the path, directories included.
    pub async fn has(&self, path: &str) -> Result<bool> {
        let physical = self.prefix.apply(canonical(path));
        self.backend.exists(&physical).await
    }

    /// Reads a file; the returned entry carries its contents.
    pub async fn read(&self, path: &str) -> Result<Entry> {
        let logical = canonical(path);
        tracing::debug!("Reading {}", logical);
        let physical = self.prefix.apply(logical);
        let raw = self.backend.read_raw(&physical).await?;
        Ok(raw.into_entry(Some(logical), &self.prefix))
    }

    /// Creates or replaces a file with default options.
    pub async fn write(&self, path: &str, contents: impl Into<Bytes>) -> Result<Entry> {
        self.write_with(path, contents, &WriteOptions::default())
            .await
    }

    /// Creates or replaces a file.
    pub async fn write_with(
        &self,
        path: &str,
        contents: impl Into<Bytes>,
        options: &WriteOptions,
    ) -> Result<Entry> {
        let logical = canonical(path);
        if logical.is_empty() || logical.ends_with('/') {
            return Err(Error::InvalidPath(format!(
                "cannot write file contents to {:?}",
                path
            )));
        }
        tracing::debug!("Writing {}", logical);
        let physical = self.prefix.apply(logical);
        let raw = self
            .backend
            .write_raw(&physical, contents.into(), options)
            .await?;
        Ok(raw.into_entry(Some(logical), &self.prefix))
    }

    /// Replaces an existing file. Same semantics as [`write`]; kept as
    /// a separate verb so intent shows at call sites.
    ///
    /// [`write`]: Filesystem::write
    pub async fn update(&self, path: &str, contents: impl Into<Bytes>) -> Result<Entry> {
        self.write_with(path, contents, &WriteOptions::default())
            .await
    }

    /// Replaces an existing file with explicit options.
    pub async fn update_with(
        &self,
        path: &str,
        contents: impl Into<Bytes>,
        options: &WriteOptions,
    ) -> Result<Entry> {
        self.write_with(path, contents, options).await
    }

    /// Deletes a single file. Directory paths report `false`.
    pub async fn delete(&self, path: &str) -> Result<bool> {
        let logical = canonical(path);
        if logical.is_empty() || logical.ends_with('/') {
            return Ok(false);
        }
        let physical = self.prefix.apply(logical);
        match self.backend.delete_raw(&physical).await {
            Ok(()) => Ok(true),
            Err(Error::NotImplemented(message)) => Err(Error::NotImplemented(message)),
            Err(e) => {
                tracing::debug!("Delete of {} failed: {}", logical, e);
                Ok(false)
            }
        }
    }

    /// Deletes a directory and everything under it. Reports `false`
    /// when the path is not a directory or the medium refuses.
    pub async fn delete_dir(&self, directory: &str) -> Result<bool> {
        let logical = canonical(directory);
        let physical = dir_location(&self.prefix.apply(logical));
        match self.backend.delete_dir_raw(&physical).await {
            Ok(deleted) => Ok(deleted),
            Err(Error::NotImplemented(message)) => Err(Error::NotImplemented(message)),
            Err(e) => {
                tracing::debug!("Delete of directory {} failed: {}", logical, e);
                Ok(false)
            }
        }
    }

    /// Creates a directory with default options.
    pub async fn create_dir(&self, directory: &str) -> Result<Entry> {
        self.create_dir_with(directory, &WriteOptions::default())
            .await
    }

    /// Creates a directory. On flat-namespace media this stores a
    /// zero-byte marker so the directory is listable while empty.
    pub async fn create_dir_with(
        &self,
        directory: &str,
        options: &WriteOptions,
    ) -> Result<Entry> {
        let logical = canonical(directory).trim_end_matches('/');
        if logical.is_empty() {
            return Err(Error::InvalidPath("directory name is empty".to_string()));
        }
        tracing::debug!("Creating directory {}", logical);
        let dir_path = format!("{}/", logical);
        let physical = self.prefix.apply(&dir_path);
        let raw = self.backend.create_dir_raw(&physical, options).await?;
        Ok(raw.into_entry(Some(&dir_path), &self.prefix))
    }

    /// Moves a file. Media without a native move copy then delete; the
    /// source survives whenever the copy never landed.
    pub async fn rename(&self, from: &str, to: &str) -> Result<bool> {
        let from_logical = canonical(from);
        let to_logical = canonical(to);
        tracing::debug!("Renaming {} to {}", from_logical, to_logical);
        let from_physical = self.prefix.apply(from_logical);
        let to_physical = self.prefix.apply(to_logical);
        match self
            .backend
            .rename_raw(&from_physical, &to_physical)
            .await
        {
            Ok(()) => Ok(true),
            Err(Error::NotImplemented(message)) => Err(Error::NotImplemented(message)),
            Err(e) => {
                tracing::debug!("Rename of {} failed: {}", from_logical, e);
                Ok(false)
            }
        }
    }

    /// Copies a file within the same backend.
    pub async fn copy(&self, from: &str, to: &str) -> Result<bool> {
        let from_logical = canonical(from);
        let to_logical = canonical(to);
        tracing::debug!("Copying {} to {}", from_logical, to_logical);
        let from_physical = self.prefix.apply(from_logical);
        let to_physical = self.prefix.apply(to_logical);
        match self.backend.copy_raw(&from_physical, &to_physical).await {
            Ok(()) => Ok(true),
            Err(Error::NotImplemented(message)) => Err(Error::NotImplemented(message)),
            Err(e) => {
                tracing::debug!("Copy of {} failed: {}", from_logical, e);
                Ok(false)
            }
        }
    }

    /// Stats a path without fetching contents.
    pub async fn get_metadata(&self, path: &str) -> Result<Entry> {
        let logical = canonical(path);
        let physical = self.prefix.apply(logical);
        let raw = self.backend.metadata_raw(&physical).await?;
        Ok(raw.into_entry(Some(logical), &self.prefix))
    }

    /// File size in bytes. Directories report [`Error::NotAFile`].
    pub async fn get_size(&self, path: &str) -> Result<u64> {
        let entry = self.get_metadata(path).await?;
        entry.size.ok_or_else(|| Error::NotAFile(path.to_string()))
    }

    /// Mimetype as reported by the medium.
    pub async fn get_mimetype(&self, path: &str) -> Result<String> {
        let entry = self.get_metadata(path).await?;
        entry
            .mimetype
            .ok_or_else(|| Error::NotImplemented(format!("mimetype for {}", path)))
    }

    /// Last modification time, seconds since the unix epoch.
    pub async fn get_timestamp(&self, path: &str) -> Result<i64> {
        let entry = self.get_metadata(path).await?;
        entry
            .timestamp
            .ok_or_else(|| Error::NotImplemented(format!("timestamp for {}", path)))
    }

    /// Access class of the path.
    pub async fn get_visibility(&self, path: &str) -> Result<Visibility> {
        let physical = self.prefix.apply(canonical(path));
        self.backend.visibility_raw(&physical).await
    }

    /// Changes the access class and reports the refreshed entry.
    pub async fn set_visibility(&self, path: &str, visibility: Visibility) -> Result<Entry> {
        let logical = canonical(path);
        let physical = self.prefix.apply(logical);
        let raw = self
            .backend
            .set_visibility_raw(&physical, visibility)
            .await?;
        Ok(raw.into_entry(Some(logical), &self.prefix))
    }

    /// Lists a directory, immediate children only or the whole subtree.
    ///
    /// Parent directories implied by flat keys are synthesized, the
    /// listed directory itself is excluded and entries come back sorted
    /// by path, ascending.
    pub async fn list_contents(&self, directory: &str, recursive: bool) -> Result<Vec<Entry>> {
        let logical = canonical(directory);
        tracing::debug!("Listing {} (recursive: {})", logical, recursive);
        let physical = dir_location(&self.prefix.apply(logical));
        let raws = self.backend.list_raw(&physical, recursive).await?;
        let entries = raws
            .into_iter()
            .map(|raw| raw.into_entry(None, &self.prefix))
            .collect();
        let query = logical.trim_end_matches('/');
        Ok(emulate_directories(entries)
            .into_iter()
            .filter(|entry| entry.path != query)
            .collect())
    }
}

/// Logical paths never carry a leading separator.
fn canonical(path: &str) -> &str {
    path.trim_start_matches(['/', '\\'])
}

/// Directory locations end in exactly one separator.
fn dir_location(physical: &str) -> String {
    format!("{}/", physical.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use crate::response::RawResponse;
    use async_trait::async_trait;
    use futures::TryStreamExt;
    use object_store::memory::InMemory;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn memory_fs() -> Filesystem {
        Filesystem::new(ObjectStoreBackend::memory(), "unittest")
    }

    fn shape(entries: &[Entry]) -> Vec<(EntryKind, String)> {
        entries
            .iter()
            .map(|e| (e.kind, e.path.clone()))
            .collect()
    }

    #[tokio::test]
    async fn write_and_read_round_trip() {
        let fs = memory_fs();
        let written = fs.write("test/1.txt", "test").await.unwrap();
        assert_eq!(written.kind, EntryKind::File);
        assert_eq!(written.path, "test/1.txt");
        assert_eq!(written.size, Some(4));
        assert_eq!(written.mimetype.as_deref(), Some("text/plain"));

        let read = fs.read("test/1.txt").await.unwrap();
        assert_eq!(read.contents, Some(Bytes::from_static(b"test")));
        assert_eq!(read.size, Some(4));
        assert_eq!(read.dirname, "test");
        assert_eq!(read.basename, "1.txt");
        assert_eq!(read.filename, "1");
        assert_eq!(read.extension, "txt");
    }

    #[tokio::test]
    async fn update_replaces_contents() {
        let fs = memory_fs();
        fs.write("test/1.txt", "test").await.unwrap();
        fs.update("test/1.txt", "new contents").await.unwrap();

        let read = fs.read("test/1.txt").await.unwrap();
        assert_eq!(read.contents, Some(Bytes::from_static(b"new contents")));
        assert_eq!(read.size, Some(12));
    }

    #[tokio::test]
    async fn has_covers_files_and_implied_directories() {
        let fs = memory_fs();
        fs.write("test/1.txt", "x").await.unwrap();

        assert!(fs.has("test/1.txt").await.unwrap());
        assert!(fs.has("test/").await.unwrap());
        assert!(!fs.has("test/2.txt").await.unwrap());
        assert!(!fs.has("other/").await.unwrap());
    }

    #[tokio::test]
    async fn delete_ignores_directory_paths_and_missing_files() {
        let fs = memory_fs();
        fs.write("test/1.txt", "x").await.unwrap();

        assert!(fs.delete("test/1.txt").await.unwrap());
        assert!(!fs.has("test/1.txt").await.unwrap());
        assert!(!fs.delete("test/1.txt").await.unwrap());
        assert!(!fs.delete("test/").await.unwrap());
    }

    #[tokio::test]
    async fn created_directory_is_visible_until_deleted() {
        let fs = memory_fs();
        let created = fs.create_dir("test2/test3").await.unwrap();
        assert_eq!(created.kind, EntryKind::Dir);
        assert_eq!(created.path, "test2/test3");

        assert!(fs.has("test2/test3/").await.unwrap());
        assert_eq!(
            shape(&fs.list_contents("test2", false).await.unwrap()),
            vec![(EntryKind::Dir, "test2/test3".to_string())]
        );

        assert!(fs.delete_dir("test2").await.unwrap());
        assert!(!fs.has("test2/test3/").await.unwrap());
    }

    #[tokio::test]
    async fn listing_emulates_directories_from_flat_keys() {
        let fs = memory_fs();
        fs.create_dir("test2/test31/test4").await.unwrap();
        fs.create_dir("test2/test32/test4").await.unwrap();
        fs.write("test2/test.txt", "test").await.unwrap();

        let deep = fs.list_contents("test2", true).await.unwrap();
        assert_eq!(
            shape(&deep),
            vec![
                (EntryKind::File, "test2/test.txt".to_string()),
                (EntryKind::Dir, "test2/test31".to_string()),
                (EntryKind::Dir, "test2/test31/test4".to_string()),
                (EntryKind::Dir, "test2/test32".to_string()),
                (EntryKind::Dir, "test2/test32/test4".to_string()),
            ]
        );

        let shallow = fs.list_contents("test2", false).await.unwrap();
        assert_eq!(
            shape(&shallow),
            vec![
                (EntryKind::File, "test2/test.txt".to_string()),
                (EntryKind::Dir, "test2/test31".to_string()),
                (EntryKind::Dir, "test2/test32".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn listing_excludes_the_queried_directory_and_markers() {
        let fs = memory_fs();
        fs.create_dir("docs").await.unwrap();

        assert!(fs.list_contents("docs", true).await.unwrap().is_empty());
        assert_eq!(
            shape(&fs.list_contents("", false).await.unwrap()),
            vec![(EntryKind::Dir, "docs".to_string())]
        );
    }

    #[tokio::test]
    async fn rename_moves_and_copy_duplicates() {
        let fs = memory_fs();
        fs.write("test/1.txt", "move me").await.unwrap();

        assert!(fs.rename("test/1.txt", "test/2.txt").await.unwrap());
        assert!(!fs.has("test/1.txt").await.unwrap());
        let moved = fs.read("test/2.txt").await.unwrap();
        assert_eq!(moved.contents, Some(Bytes::from_static(b"move me")));

        assert!(fs.copy("test/2.txt", "test/3.txt").await.unwrap());
        assert!(fs.has("test/2.txt").await.unwrap());
        assert!(fs.has("test/3.txt").await.unwrap());

        assert!(!fs.rename("missing.txt", "x.txt").await.unwrap());
        assert!(!fs.copy("missing.txt", "x.txt").await.unwrap());
    }

    #[tokio::test]
    async fn metadata_feeds_the_convenience_getters() {
        let fs = memory_fs();
        fs.write("test/1.txt", "test").await.unwrap();

        let meta = fs.get_metadata("test/1.txt").await.unwrap();
        assert_eq!(meta.kind, EntryKind::File);
        assert_eq!(meta.path, "test/1.txt");
        assert_eq!(meta.size, Some(4));
        assert_eq!(meta.mimetype.as_deref(), Some("text/plain"));
        assert!(meta.timestamp.is_some());
        assert!(meta.contents.is_none());

        assert_eq!(fs.get_size("test/1.txt").await.unwrap(), 4);
        assert_eq!(fs.get_mimetype("test/1.txt").await.unwrap(), "text/plain");
        assert!(fs.get_timestamp("test/1.txt").await.unwrap() > 0);

        assert!(matches!(
            fs.get_metadata("missing.txt").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn memory_visibility_round_trip() {
        let fs = memory_fs();
        fs.write("test/1.txt", "x").await.unwrap();
        fs.write_with(
            "test/secret.txt",
            "s",
            &WriteOptions::default().with_visibility(Visibility::Private),
        )
        .await
        .unwrap();

        // Plain writes read back as public, like default-mode files.
        assert_eq!(
            fs.get_visibility("test/1.txt").await.unwrap(),
            Visibility::Public
        );
        assert_eq!(
            fs.get_visibility("test/secret.txt").await.unwrap(),
            Visibility::Private
        );

        let entry = fs
            .set_visibility("test/secret.txt", Visibility::Public)
            .await
            .unwrap();
        assert_eq!(entry.path, "test/secret.txt");
        assert_eq!(entry.visibility, Some(Visibility::Public));
        assert_eq!(
            fs.get_visibility("test/secret.txt").await.unwrap(),
            Visibility::Public
        );
        let read = fs.read("test/secret.txt").await.unwrap();
        assert_eq!(read.contents, Some(Bytes::from_static(b"s")));
    }

    #[tokio::test]
    async fn visibility_stays_loud_when_the_medium_has_no_acls() {
        let fs = Filesystem::new(
            ObjectStoreBackend::new(Arc::new(InMemory::new())),
            "unittest",
        );
        fs.write("test/1.txt", "x").await.unwrap();

        assert!(matches!(
            fs.get_visibility("test/1.txt").await,
            Err(Error::NotImplemented(_))
        ));
        assert!(matches!(
            fs.set_visibility("test/1.txt", Visibility::Private).await,
            Err(Error::NotImplemented(_))
        ));
    }

    #[tokio::test]
    async fn trailing_separator_on_a_file_reports_absent() {
        let fs = memory_fs();
        fs.write("test/1.txt", "x").await.unwrap();
        assert!(fs.has("test/1.txt").await.unwrap());
        assert!(!fs.has("test/1.txt/").await.unwrap());

        let root = tempfile::tempdir().unwrap();
        let local = Filesystem::local(root.path().to_str().unwrap());
        local.write("test/1.txt", "x").await.unwrap();
        assert!(local.has("test/1.txt").await.unwrap());
        assert!(!local.has("test/1.txt/").await.unwrap());
    }

    #[tokio::test]
    async fn write_rejects_directory_paths() {
        let fs = memory_fs();
        assert!(matches!(
            fs.write("test/", "x").await,
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(fs.write("", "x").await, Err(Error::InvalidPath(_))));
    }

    #[tokio::test]
    async fn delete_dir_sweeps_the_subtree() {
        let fs = memory_fs();
        fs.write("test2/a.txt", "a").await.unwrap();
        fs.write("test2/sub/b.txt", "b").await.unwrap();
        fs.create_dir("test2/empty").await.unwrap();

        assert!(fs.delete_dir("test2").await.unwrap());
        assert!(!fs.has("test2/").await.unwrap());
        assert!(fs.list_contents("", true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn path_prefix_scopes_physical_keys() {
        let backend = ObjectStoreBackend::memory();
        let store = backend.store();
        let fs = Filesystem::new(backend, "tenant-a");
        fs.write("doc.txt", "x").await.unwrap();

        let stored: Vec<String> = store
            .list(None)
            .try_collect::<Vec<_>>()
            .await
            .unwrap()
            .iter()
            .map(|meta| meta.location.to_string())
            .collect();
        assert_eq!(stored, vec!["tenant-a/doc.txt".to_string()]);
    }

    #[tokio::test]
    async fn changing_the_prefix_changes_the_visible_tree() {
        let mut fs = Filesystem::new(ObjectStoreBackend::memory(), "tenant-a");
        fs.write("doc.txt", "x").await.unwrap();

        fs.set_path_prefix("tenant-b");
        assert!(!fs.has("doc.txt").await.unwrap());

        fs.set_path_prefix("tenant-a");
        assert!(fs.has("doc.txt").await.unwrap());
    }

    #[tokio::test]
    async fn local_view_round_trips_through_real_directories() {
        let root = tempfile::tempdir().unwrap();
        let fs = Filesystem::local(root.path().to_str().unwrap());

        fs.write("test/files/1.txt", "local").await.unwrap();
        let read = fs.read("test/files/1.txt").await.unwrap();
        assert_eq!(read.contents, Some(Bytes::from_static(b"local")));
        assert_eq!(read.path, "test/files/1.txt");

        let listing = fs.list_contents("test", true).await.unwrap();
        assert_eq!(
            shape(&listing),
            vec![
                (EntryKind::Dir, "test/files".to_string()),
                (EntryKind::File, "test/files/1.txt".to_string()),
            ]
        );

        assert!(fs.delete_dir("test").await.unwrap());
        assert!(!fs.has("test").await.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn local_visibility_round_trip() {
        let root = tempfile::tempdir().unwrap();
        let fs = Filesystem::local(root.path().to_str().unwrap());
        fs.write_with(
            "secret.txt",
            "x",
            &WriteOptions::default().with_visibility(Visibility::Private),
        )
        .await
        .unwrap();

        assert_eq!(
            fs.get_visibility("secret.txt").await.unwrap(),
            Visibility::Private
        );

        let entry = fs
            .set_visibility("secret.txt", Visibility::Public)
            .await
            .unwrap();
        assert_eq!(entry.path, "secret.txt");
        assert_eq!(entry.visibility, Some(Visibility::Public));
        assert_eq!(
            fs.get_visibility("secret.txt").await.unwrap(),
            Visibility::Public
        );
    }

    struct FlakyBackend {
        fail_copy: bool,
        deletes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Backend for FlakyBackend {
        async fn exists(&self, _location: &str) -> Result<bool> {
            Ok(false)
        }

        async fn read_raw(&self, location: &str) -> Result<RawResponse> {
            Err(Error::NotFound(location.to_string()))
        }

        async fn write_raw(
            &self,
            location: &str,
            contents: Bytes,
            _options: &WriteOptions,
        ) -> Result<RawResponse> {
            Ok(RawResponse::Object {
                key: location.to_string(),
                size: Some(contents.len() as u64),
                last_modified: None,
                content_type: None,
                body: Some(contents),
                visibility: None,
            })
        }

        async fn delete_raw(&self, _location: &str) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn delete_dir_raw(&self, _location: &str) -> Result<bool> {
            Ok(false)
        }

        async fn list_raw(&self, _location: &str, _recursive: bool) -> Result<Vec<RawResponse>> {
            Ok(Vec::new())
        }

        async fn copy_raw(&self, from: &str, _to: &str) -> Result<()> {
            if self.fail_copy {
                Err(Error::Storage(format!("Failed to copy {}", from)))
            } else {
                Ok(())
            }
        }

        async fn metadata_raw(&self, location: &str) -> Result<RawResponse> {
            Err(Error::NotFound(location.to_string()))
        }

        async fn visibility_raw(&self, location: &str) -> Result<Visibility> {
            Err(Error::NotImplemented(location.to_string()))
        }

        async fn set_visibility_raw(
            &self,
            location: &str,
            _visibility: Visibility,
        ) -> Result<RawResponse> {
            Err(Error::NotImplemented(location.to_string()))
        }

        async fn create_dir_raw(
            &self,
            location: &str,
            _options: &WriteOptions,
        ) -> Result<RawResponse> {
            Ok(RawResponse::Prefix {
                prefix: location.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn failed_copy_never_deletes_the_source() {
        let deletes = Arc::new(AtomicUsize::new(0));
        let fs = Filesystem::new(
            FlakyBackend {
                fail_copy: true,
                deletes: Arc::clone(&deletes),
            },
            "",
        );

        assert!(!fs.rename("a.txt", "b.txt").await.unwrap());
        assert_eq!(deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_copy_deletes_the_source_once() {
        let deletes = Arc::new(AtomicUsize::new(0));
        let fs = Filesystem::new(
            FlakyBackend {
                fail_copy: false,
                deletes: Arc::clone(&deletes),
            },
            "",
        );

        assert!(fs.rename("a.txt", "b.txt").await.unwrap());
        assert_eq!(deletes.load(Ordering::SeqCst), 1);
    }
}
