//! Local disk backend.
//!
//! Locations are real paths on the host filesystem, so directories are
//! actual directories and no marker objects are involved. Visibility
//! maps to unix file mode bits through a configurable permission map.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;

use crate::backend::Backend;
use crate::entry::{Visibility, WriteOptions};
use crate::error::{Error, Result};
use crate::response::RawResponse;

/// Mode bits used when mapping visibility onto files and directories.
#[derive(Debug, Clone, Copy)]
pub struct PermissionMap {
    pub public_file: u32,
    pub private_file: u32,
    pub public_dir: u32,
    pub private_dir: u32,
}

impl Default for PermissionMap {
    fn default() -> Self {
        PermissionMap {
            public_file: 0o644,
            private_file: 0o600,
            public_dir: 0o755,
            private_dir: 0o700,
        }
    }
}

impl PermissionMap {
    fn file_mode(&self, visibility: Visibility) -> u32 {
        match visibility {
            Visibility::Public => self.public_file,
            Visibility::Private => self.private_file,
        }
    }

    fn dir_mode(&self, visibility: Visibility) -> u32 {
        match visibility {
            Visibility::Public => self.public_dir,
            Visibility::Private => self.private_dir,
        }
    }

    fn mode_for(&self, is_dir: bool, visibility: Visibility) -> u32 {
        if is_dir {
            self.dir_mode(visibility)
        } else {
            self.file_mode(visibility)
        }
    }
}

/// Backend over the host filesystem.
#[derive(Debug, Default)]
pub struct LocalBackend {
    permissions: PermissionMap,
}

impl LocalBackend {
    pub fn new() -> Self {
        LocalBackend::default()
    }

    pub fn with_permissions(permissions: PermissionMap) -> Self {
        LocalBackend { permissions }
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn exists(&self, location: &str) -> Result<bool> {
        Ok(fs::metadata(location).await.is_ok())
    }

    async fn read_raw(&self, location: &str) -> Result<RawResponse> {
        let meta = fs::metadata(location).await.map_err(|e| io_err(location, e))?;
        if meta.is_dir() {
            return Err(Error::NotAFile(location.to_string()));
        }
        let body = fs::read(location).await.map_err(|e| io_err(location, e))?;
        Ok(RawResponse::Stat {
            path: location.to_string(),
            is_dir: false,
            size: meta.len(),
            modified: mtime(&meta),
            body: Some(Bytes::from(body)),
            visibility: stat_visibility(&meta),
        })
    }

    async fn write_raw(
        &self,
        location: &str,
        contents: Bytes,
        options: &WriteOptions,
    ) -> Result<RawResponse> {
        if let Some(parent) = parent_dir(location) {
            fs::create_dir_all(&parent)
                .await
                .map_err(|e| io_err(&parent, e))?;
        }
        fs::write(location, &contents)
            .await
            .map_err(|e| io_err(location, e))?;
        if let Some(visibility) = options.visibility {
            if cfg!(unix) {
                set_mode(location, self.permissions.file_mode(visibility)).await?;
            }
        }
        Ok(RawResponse::Stat {
            path: location.to_string(),
            is_dir: false,
            size: contents.len() as u64,
            modified: None,
            body: Some(contents),
            visibility: Some(options.visibility.unwrap_or(Visibility::Public)),
        })
    }

    async fn delete_raw(&self, location: &str) -> Result<()> {
        fs::remove_file(location)
            .await
            .map_err(|e| io_err(location, e))
    }

    async fn delete_dir_raw(&self, location: &str) -> Result<bool> {
        let meta = match fs::metadata(location).await {
            Ok(meta) => meta,
            Err(_) => return Ok(false),
        };
        if !meta.is_dir() {
            return Ok(false);
        }
        fs::remove_dir_all(location)
            .await
            .map_err(|e| io_err(location, e))?;
        Ok(true)
    }

    async fn list_raw(&self, location: &str, recursive: bool) -> Result<Vec<RawResponse>> {
        match fs::metadata(location).await {
            Ok(meta) if meta.is_dir() => {}
            _ => return Ok(Vec::new()),
        }
        let root = if location.len() > 1 {
            location.trim_end_matches('/')
        } else {
            location
        };
        let mut raws = Vec::new();
        let mut pending = vec![root.to_string()];
        while let Some(dir) = pending.pop() {
            let mut reader = fs::read_dir(&dir).await.map_err(|e| io_err(&dir, e))?;
            while let Some(dirent) = reader.next_entry().await.map_err(|e| io_err(&dir, e))? {
                let name = dirent.file_name().to_string_lossy().into_owned();
                let physical = format!("{}/{}", dir, name);
                let meta = match dirent.metadata().await {
                    Ok(meta) => meta,
                    Err(e) => {
                        tracing::warn!("Skipping unreadable entry {}: {}", physical, e);
                        continue;
                    }
                };
                let is_dir = meta.is_dir();
                raws.push(RawResponse::Stat {
                    path: physical.clone(),
                    is_dir,
                    size: meta.len(),
                    modified: mtime(&meta),
                    body: None,
                    visibility: stat_visibility(&meta),
                });
                if recursive && is_dir {
                    pending.push(physical);
                }
            }
        }
        Ok(raws)
    }

    async fn copy_raw(&self, from: &str, to: &str) -> Result<()> {
        if let Some(parent) = parent_dir(to) {
            fs::create_dir_all(&parent)
                .await
                .map_err(|e| io_err(&parent, e))?;
        }
        fs::copy(from, to).await.map_err(|e| io_err(from, e))?;
        Ok(())
    }

    async fn rename_raw(&self, from: &str, to: &str) -> Result<()> {
        if let Some(parent) = parent_dir(to) {
            fs::create_dir_all(&parent)
                .await
                .map_err(|e| io_err(&parent, e))?;
        }
        fs::rename(from, to).await.map_err(|e| io_err(from, e))
    }

    async fn metadata_raw(&self, location: &str) -> Result<RawResponse> {
        let meta = fs::metadata(location).await.map_err(|e| io_err(location, e))?;
        Ok(RawResponse::Stat {
            path: location.to_string(),
            is_dir: meta.is_dir(),
            size: meta.len(),
            modified: mtime(&meta),
            body: None,
            visibility: stat_visibility(&meta),
        })
    }

    async fn visibility_raw(&self, location: &str) -> Result<Visibility> {
        let meta = fs::metadata(location).await.map_err(|e| io_err(location, e))?;
        stat_visibility(&meta).ok_or_else(|| {
            Error::NotImplemented(format!("file mode visibility for {}", location))
        })
    }

    async fn set_visibility_raw(
        &self,
        location: &str,
        visibility: Visibility,
    ) -> Result<RawResponse> {
        let meta = fs::metadata(location).await.map_err(|e| io_err(location, e))?;
        let mode = self.permissions.mode_for(meta.is_dir(), visibility);
        set_mode(location, mode).await?;
        Ok(RawResponse::Stat {
            path: location.to_string(),
            is_dir: meta.is_dir(),
            size: meta.len(),
            modified: mtime(&meta),
            body: None,
            visibility: Some(visibility),
        })
    }

    async fn create_dir_raw(
        &self,
        location: &str,
        options: &WriteOptions,
    ) -> Result<RawResponse> {
        let dir = location.trim_end_matches('/');
        fs::create_dir_all(dir).await.map_err(|e| io_err(dir, e))?;
        if let Some(visibility) = options.visibility {
            if cfg!(unix) {
                set_mode(dir, self.permissions.dir_mode(visibility)).await?;
            }
        }
        Ok(RawResponse::Stat {
            path: dir.to_string(),
            is_dir: true,
            size: 0,
            modified: None,
            body: None,
            visibility: options.visibility,
        })
    }
}

fn io_err(location: &str, err: std::io::Error) -> Error {
    match err.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(location.to_string()),
        std::io::ErrorKind::PermissionDenied => Error::PermissionDenied(location.to_string()),
        std::io::ErrorKind::NotADirectory => Error::NotADirectory(location.to_string()),
        std::io::ErrorKind::IsADirectory => Error::NotAFile(location.to_string()),
        _ => Error::Io(err),
    }
}

fn mtime(metadata: &std::fs::Metadata) -> Option<DateTime<Utc>> {
    metadata.modified().ok().map(DateTime::<Utc>::from)
}

fn parent_dir(location: &str) -> Option<String> {
    location
        .trim_end_matches('/')
        .rsplit_once('/')
        .map(|(parent, _)| parent.to_string())
        .filter(|parent| !parent.is_empty())
}

/// Group or other read bit set means public.
#[cfg(unix)]
fn stat_visibility(metadata: &std::fs::Metadata) -> Option<Visibility> {
    use std::os::unix::fs::PermissionsExt;
    if metadata.permissions().mode() & 0o044 != 0 {
        Some(Visibility::Public)
    } else {
        Some(Visibility::Private)
    }
}

#[cfg(not(unix))]
fn stat_visibility(_metadata: &std::fs::Metadata) -> Option<Visibility> {
    None
}

#[cfg(unix)]
async fn set_mode(location: &str, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(location, std::fs::Permissions::from_mode(mode))
        .await
        .map_err(|e| io_err(location, e))
}

#[cfg(not(unix))]
async fn set_mode(location: &str, _mode: u32) -> Result<()> {
    Err(Error::NotImplemented(format!(
        "file mode visibility for {}",
        location
    )))
}
