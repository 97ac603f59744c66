//! Flat-namespace object store backend.
//!
//! One adapter covers every medium the `object_store` crate can reach:
//! S3, GCS and the in-memory store used by tests. Keys have no real
//! directories, so explicitly created directories are held down by a
//! zero-byte marker object; listings translate markers back into the
//! directory prefixes they stand for. Media that keep per-key
//! attributes represent visibility as a metadata attribute; the rest
//! answer visibility calls with [`Error::NotImplemented`].

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use object_store::aws::AmazonS3Builder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, GetOptions, ObjectMeta, ObjectStore, PutOptions, PutPayload, TagSet,
};

use crate::backend::Backend;
use crate::entry::{Visibility, WriteOptions};
use crate::error::{Error, Result};
use crate::response::RawResponse;

/// Marker object that keeps an explicitly created directory listable
/// while it has no other content.
const DIR_MARKER: &str = ".dir";

/// Metadata attribute under which visibility is kept per key.
const VISIBILITY_KEY: &str = "visibility";

/// Backend over any `object_store` implementation.
#[derive(Debug)]
pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
    attribute_visibility: bool,
}

impl ObjectStoreBackend {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        ObjectStoreBackend {
            store,
            attribute_visibility: false,
        }
    }

    /// Keeps visibility as a per-key metadata attribute. Without this,
    /// visibility calls answer [`Error::NotImplemented`], since the SDK
    /// exposes no ACL surface.
    pub fn with_attribute_visibility(mut self) -> Self {
        self.attribute_visibility = true;
        self
    }

    /// Backend over an S3 bucket. A custom endpoint switches to
    /// path-style addressing for S3-compatible stores such as MinIO.
    pub fn s3(
        bucket: &str,
        region: &str,
        access_key_id: Option<&str>,
        secret_access_key: Option<&str>,
        endpoint: Option<&str>,
    ) -> Result<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_region(region);
        if let Some(key) = access_key_id {
            builder = builder.with_access_key_id(key);
        }
        if let Some(secret) = secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }
        if let Some(endpoint) = endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_virtual_hosted_style_request(false)
                .with_allow_http(endpoint.starts_with("http://"));
        }
        let store = builder
            .build()
            .map_err(|e| Error::Storage(format!("Failed to create S3 store: {}", e)))?;
        Ok(ObjectStoreBackend::new(Arc::new(store)))
    }

    /// Backend over a GCS bucket. Credentials fall back to the
    /// environment when no service account file is given.
    pub fn gcs(bucket: &str, service_account_path: Option<&str>) -> Result<Self> {
        let mut builder = GoogleCloudStorageBuilder::new().with_bucket_name(bucket);
        if let Some(path) = service_account_path {
            builder = builder.with_service_account_path(path);
        }
        let store = builder
            .build()
            .map_err(|e| Error::Storage(format!("Failed to create GCS store: {}", e)))?;
        Ok(ObjectStoreBackend::new(Arc::new(store)))
    }

    /// In-memory store, for tests and prototyping. Visibility is kept
    /// per key.
    pub fn memory() -> Self {
        ObjectStoreBackend::new(Arc::new(InMemory::new())).with_attribute_visibility()
    }

    /// The underlying client, for operations outside the uniform view.
    pub fn store(&self) -> Arc<dyn ObjectStore> {
        Arc::clone(&self.store)
    }

    /// Maps write options onto put attributes and tags. The resolved
    /// content type (guessed from the location unless overridden) comes
    /// back alongside so upload echoes can carry it.
    fn put_options(&self, location: &str, options: &WriteOptions) -> (PutOptions, String) {
        let content_type = options.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(location)
                .first_or_octet_stream()
                .to_string()
        });
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.clone().into());
        if let Some(value) = &options.cache_control {
            attributes.insert(Attribute::CacheControl, value.clone().into());
        }
        if let Some(value) = &options.content_encoding {
            attributes.insert(Attribute::ContentEncoding, value.clone().into());
        }
        if let Some(value) = &options.content_disposition {
            attributes.insert(Attribute::ContentDisposition, value.clone().into());
        }
        for (key, value) in &options.metadata {
            attributes.insert(Attribute::Metadata(key.clone().into()), value.clone().into());
        }
        match options.visibility {
            Some(visibility) if self.attribute_visibility => {
                attributes.insert(
                    Attribute::Metadata(VISIBILITY_KEY.into()),
                    visibility_label(visibility).into(),
                );
            }
            Some(_) => {
                tracing::debug!(
                    "Store exposes no ACLs; dropping visibility option for {}",
                    location
                );
            }
            None => {}
        }
        let mut tags = TagSet::default();
        for (key, value) in &options.tags {
            tags.push(key, value);
        }
        let opts = PutOptions {
            attributes,
            tags,
            ..Default::default()
        };
        (opts, content_type)
    }
}

#[async_trait]
impl Backend for ObjectStoreBackend {
    async fn exists(&self, location: &str) -> Result<bool> {
        // A trailing separator names a directory. The typed path would
        // silently drop it and head the file key, so those locations go
        // straight to the prefix probe.
        if !location.ends_with('/') {
            match self.store.head(&object_path(location)).await {
                Ok(_) => return Ok(true),
                Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(storage_err("head", location, e)),
            }
        }
        let prefix = list_prefix(location);
        let mut stream = self.store.list(prefix.as_ref());
        match stream.next().await {
            Some(Ok(_)) => Ok(true),
            Some(Err(e)) => Err(storage_err("probe", location, e)),
            None => Ok(false),
        }
    }

    async fn read_raw(&self, location: &str) -> Result<RawResponse> {
        let path = object_path(location);
        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| storage_err("get", location, e))?;
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.to_string());
        let meta = result.meta.clone();
        let body = result
            .bytes()
            .await
            .map_err(|e| storage_err("read", location, e))?;
        Ok(RawResponse::Object {
            key: meta.location.to_string(),
            size: Some(meta.size),
            last_modified: Some(meta.last_modified),
            content_type,
            body: Some(body),
            visibility: None,
        })
    }

    async fn write_raw(
        &self,
        location: &str,
        contents: Bytes,
        options: &WriteOptions,
    ) -> Result<RawResponse> {
        let path = object_path(location);
        let (opts, content_type) = self.put_options(location, options);
        let visibility = if self.attribute_visibility {
            Some(options.visibility.unwrap_or(Visibility::Public))
        } else {
            None
        };
        let size = contents.len() as u64;
        self.store
            .put_opts(&path, contents.clone().into(), opts)
            .await
            .map_err(|e| storage_err("put", location, e))?;
        Ok(RawResponse::Object {
            key: path.to_string(),
            size: Some(size),
            last_modified: None,
            content_type: Some(content_type),
            body: Some(contents),
            visibility,
        })
    }

    async fn delete_raw(&self, location: &str) -> Result<()> {
        let path = object_path(location);
        self.store
            .delete(&path)
            .await
            .map_err(|e| storage_err("delete", location, e))
    }

    async fn delete_dir_raw(&self, location: &str) -> Result<bool> {
        let prefix = list_prefix(location);
        let objects: Vec<ObjectMeta> = self
            .store
            .list(prefix.as_ref())
            .try_collect()
            .await
            .map_err(|e| storage_err("list", location, e))?;
        for object in &objects {
            self.store
                .delete(&object.location)
                .await
                .map_err(|e| storage_err("delete", object.location.as_ref(), e))?;
        }
        Ok(true)
    }

    async fn list_raw(&self, location: &str, recursive: bool) -> Result<Vec<RawResponse>> {
        let prefix = list_prefix(location);
        let mut raws = Vec::new();
        if recursive {
            let objects: Vec<ObjectMeta> = self
                .store
                .list(prefix.as_ref())
                .try_collect()
                .await
                .map_err(|e| storage_err("list", location, e))?;
            for object in objects {
                raws.push(adapt_object(object));
            }
        } else {
            let result = self
                .store
                .list_with_delimiter(prefix.as_ref())
                .await
                .map_err(|e| storage_err("list", location, e))?;
            for object in result.objects {
                raws.push(adapt_object(object));
            }
            for common in result.common_prefixes {
                raws.push(RawResponse::Prefix {
                    prefix: format!("{}/", common),
                });
            }
        }
        Ok(raws)
    }

    async fn copy_raw(&self, from: &str, to: &str) -> Result<()> {
        self.store
            .copy(&object_path(from), &object_path(to))
            .await
            .map_err(|e| storage_err("copy", from, e))
    }

    async fn metadata_raw(&self, location: &str) -> Result<RawResponse> {
        let path = object_path(location);
        let options = GetOptions {
            head: true,
            ..Default::default()
        };
        let result = self
            .store
            .get_opts(&path, options)
            .await
            .map_err(|e| storage_err("stat", location, e))?;
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.to_string());
        let meta = result.meta;
        Ok(RawResponse::Object {
            key: meta.location.to_string(),
            size: Some(meta.size),
            last_modified: Some(meta.last_modified),
            content_type,
            body: None,
            visibility: None,
        })
    }

    async fn visibility_raw(&self, location: &str) -> Result<Visibility> {
        if !self.attribute_visibility {
            return Err(Error::NotImplemented(format!(
                "visibility for object store location {}",
                location
            )));
        }
        let options = GetOptions {
            head: true,
            ..Default::default()
        };
        let result = self
            .store
            .get_opts(&object_path(location), options)
            .await
            .map_err(|e| storage_err("stat", location, e))?;
        let stored = result
            .attributes
            .get(&Attribute::Metadata(VISIBILITY_KEY.into()))
            .map(|value| value.to_string());
        // Keys written without an explicit visibility are public, like
        // a default-mode file on disk.
        Ok(match stored.as_deref() {
            Some("private") => Visibility::Private,
            _ => Visibility::Public,
        })
    }

    async fn set_visibility_raw(
        &self,
        location: &str,
        visibility: Visibility,
    ) -> Result<RawResponse> {
        if !self.attribute_visibility {
            return Err(Error::NotImplemented(format!(
                "visibility for object store location {}",
                location
            )));
        }
        // No attribute update call in the SDK; rewrite the object with
        // the visibility attribute replaced.
        let path = object_path(location);
        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| storage_err("get", location, e))?;
        let mut attributes = result.attributes.clone();
        let content_type = attributes
            .get(&Attribute::ContentType)
            .map(|value| value.to_string());
        let meta = result.meta.clone();
        let body = result
            .bytes()
            .await
            .map_err(|e| storage_err("read", location, e))?;
        attributes.insert(
            Attribute::Metadata(VISIBILITY_KEY.into()),
            visibility_label(visibility).into(),
        );
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };
        self.store
            .put_opts(&path, body.into(), opts)
            .await
            .map_err(|e| storage_err("put", location, e))?;
        Ok(RawResponse::Object {
            key: meta.location.to_string(),
            size: Some(meta.size),
            last_modified: Some(meta.last_modified),
            content_type,
            body: None,
            visibility: Some(visibility),
        })
    }

    async fn create_dir_raw(
        &self,
        location: &str,
        options: &WriteOptions,
    ) -> Result<RawResponse> {
        let dir = location.trim_matches('/');
        if dir.is_empty() {
            return Err(Error::InvalidPath("directory name is empty".to_string()));
        }
        let marker = Path::from(format!("{}/{}", dir, DIR_MARKER));
        let (opts, _) = self.put_options(location, options);
        self.store
            .put_opts(&marker, PutPayload::from_static(b""), opts)
            .await
            .map_err(|e| storage_err("put", location, e))?;
        Ok(RawResponse::Prefix {
            prefix: format!("{}/", dir),
        })
    }
}

fn object_path(location: &str) -> Path {
    Path::from(location.trim_start_matches('/'))
}

fn list_prefix(location: &str) -> Option<Path> {
    let trimmed = location.trim_matches('/');
    (!trimmed.is_empty()).then(|| Path::from(trimmed))
}

fn storage_err(op: &str, location: &str, err: object_store::Error) -> Error {
    match err {
        object_store::Error::NotFound { .. } => Error::NotFound(location.to_string()),
        err => Error::Storage(format!("Failed to {} {}: {}", op, location, err)),
    }
}

fn visibility_label(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "public",
        Visibility::Private => "private",
    }
}

/// Marker objects stand in for the directory that owns them; everything
/// else passes through as a plain object record.
fn adapt_object(meta: ObjectMeta) -> RawResponse {
    let key = meta.location.to_string();
    if let Some(parent) = key
        .strip_suffix(DIR_MARKER)
        .and_then(|head| head.strip_suffix('/'))
    {
        return RawResponse::Prefix {
            prefix: format!("{}/", parent),
        };
    }
    RawResponse::Object {
        key,
        size: Some(meta.size),
        last_modified: Some(meta.last_modified),
        content_type: None,
        body: None,
        visibility: None,
    }
}
