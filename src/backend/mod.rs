//! Storage backend seam.
//!
//! A backend is a thin adapter over one medium. It receives physical
//! locations (root prefix already applied) and answers with payloads in
//! the medium's own vocabulary; path mapping, normalization, directory
//! emulation and ordering all happen above this trait.

use async_trait::async_trait;
use bytes::Bytes;

use crate::entry::{Visibility, WriteOptions};
use crate::error::Result;
use crate::response::RawResponse;

pub mod local;
pub mod object;

pub use local::{LocalBackend, PermissionMap};
pub use object::ObjectStoreBackend;

/// Medium-specific operations behind the uniform view.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Whether anything exists at the location.
    async fn exists(&self, location: &str) -> Result<bool>;

    /// Reads the full contents at the location.
    async fn read_raw(&self, location: &str) -> Result<RawResponse>;

    /// Creates or replaces the object at the location.
    async fn write_raw(
        &self,
        location: &str,
        contents: Bytes,
        options: &WriteOptions,
    ) -> Result<RawResponse>;

    /// Removes a single object or file, never a directory.
    async fn delete_raw(&self, location: &str) -> Result<()>;

    /// Removes a directory and everything under it. Reports `false`
    /// when the location is not a directory.
    async fn delete_dir_raw(&self, location: &str) -> Result<bool>;

    /// Lists what lives under a directory location. A non-recursive
    /// listing reports immediate children only, common prefixes included.
    async fn list_raw(&self, location: &str, recursive: bool) -> Result<Vec<RawResponse>>;

    /// Copies an object within the same backend.
    async fn copy_raw(&self, from: &str, to: &str) -> Result<()>;

    /// Moves an object. The default composes copy and delete; the source
    /// is only deleted once the copy succeeded.
    async fn rename_raw(&self, from: &str, to: &str) -> Result<()> {
        self.copy_raw(from, to).await?;
        self.delete_raw(from).await
    }

    /// Stats the location without fetching contents.
    async fn metadata_raw(&self, location: &str) -> Result<RawResponse>;

    /// Reports the access class of the location.
    async fn visibility_raw(&self, location: &str) -> Result<Visibility>;

    /// Changes the access class and reports the refreshed record.
    async fn set_visibility_raw(
        &self,
        location: &str,
        visibility: Visibility,
    ) -> Result<RawResponse>;

    /// Ensures a directory exists at the location.
    async fn create_dir_raw(&self, location: &str, options: &WriteOptions)
        -> Result<RawResponse>;
}
