//! Object storage access for published packages.
//!
//! [`PackageStore`] is the seam the rest of the crate talks to. The
//! production implementation wraps any `object_store` backend; runs use the
//! S3 backend, tests use the in-memory one.
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use log::*;
use object_store::{
    ObjectStore, PutOptions, PutPayload, aws::AmazonS3Builder,
    memory::InMemory, path::Path as ObjectPath,
};
use serde::Serialize;
use std::{path::Path, sync::Arc};

use crate::error::Result;

/// One object returned by a prefix listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
}

/// Result of listing a prefix, shaped like an S3 ListObjectsV2 response.
///
/// `contents` is `None` when the backend omits the `Contents` element, which
/// S3 does when no key matches the prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Listing {
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<ObjectSummary>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageStore: Send + Sync {
    /// Lists every object whose key starts with `prefix`.
    async fn list_prefix(&self, prefix: &str) -> Result<Listing>;

    /// Uploads the local file at `path` to `key`, replacing any existing
    /// object.
    async fn upload_file(&self, path: &Path, key: &str) -> Result<()>;
}

/// [`PackageStore`] backed by an `object_store` implementation bound to a
/// single bucket.
pub struct ObjectStorePackageStore {
    inner: Arc<dyn ObjectStore>,
}

impl ObjectStorePackageStore {
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self { inner }
    }

    /// S3 bucket client. Credentials come from the standard AWS environment
    /// variables.
    pub fn s3(bucket_name: &str, region: &str) -> Result<Self> {
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket_name)
            .with_region(region)
            .build()?;

        Ok(Self::new(Arc::new(store)))
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }
}

#[async_trait]
impl PackageStore for ObjectStorePackageStore {
    async fn list_prefix(&self, prefix: &str) -> Result<Listing> {
        let location =
            ObjectPath::parse(prefix).map_err(object_store::Error::from)?;
        let entries: Vec<_> =
            self.inner.list(Some(&location)).try_collect().await?;

        let contents = if entries.is_empty() {
            None
        } else {
            Some(
                entries
                    .into_iter()
                    .map(|meta| ObjectSummary {
                        key: meta.location.to_string(),
                        size: meta.size,
                    })
                    .collect(),
            )
        };

        Ok(Listing {
            prefix: prefix.to_string(),
            contents,
        })
    }

    async fn upload_file(&self, path: &Path, key: &str) -> Result<()> {
        let data = tokio::fs::read(path).await?;
        debug!("uploading {} bytes from {}", data.len(), path.display());

        let location =
            ObjectPath::parse(key).map_err(object_store::Error::from)?;

        self.inner
            .put_opts(
                &location,
                PutPayload::from_bytes(Bytes::from(data)),
                PutOptions::default(),
            )
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::PublishError,
        uploader::PackageUploader,
        version::{Subversion, VersionKey},
    };
    use tempfile::TempDir;

    #[tokio::test]
    async fn empty_prefix_omits_contents() {
        let store = ObjectStorePackageStore::memory();

        let listing = store.list_prefix("atlasMongo/4.0/0000001").await.unwrap();

        assert_eq!(listing.prefix, "atlasMongo/4.0/0000001");
        assert!(listing.contents.is_none());
    }

    #[tokio::test]
    async fn uploaded_file_is_listed_under_its_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("cluster.zip");
        std::fs::write(&archive, b"zip-bytes").unwrap();

        let store = ObjectStorePackageStore::memory();
        store
            .upload_file(&archive, "atlasMongo/4.0/0000001/cluster.zip")
            .await
            .unwrap();

        let listing = store.list_prefix("atlasMongo/4.0/0000001").await.unwrap();
        assert_eq!(
            listing.contents,
            Some(vec![ObjectSummary {
                key: "atlasMongo/4.0/0000001/cluster.zip".into(),
                size: 9,
            }])
        );

        let other = store.list_prefix("atlasMongo/4.0/0000002").await.unwrap();
        assert!(other.contents.is_none());
    }

    #[tokio::test]
    async fn keys_are_stored_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("pkg~v[1].zip"), b"zip").unwrap();

        let store = ObjectStorePackageStore::memory();
        let key = VersionKey::new(
            "atlasMongo",
            "4.0",
            Subversion::parse("0000001").unwrap(),
        );
        let uploader = PackageUploader::new(&store, "test-bucket", "zip");
        let uploaded = uploader.upload(temp_dir.path(), &key).await.unwrap();

        assert_eq!(uploaded, "atlasMongo/4.0/0000001/pkg~v[1].zip");

        let listing = store.list_prefix(&key.prefix()).await.unwrap();
        let stored: Vec<_> = listing
            .contents
            .unwrap()
            .into_iter()
            .map(|object| object.key)
            .collect();
        assert_eq!(stored, vec![uploaded]);
    }

    #[tokio::test]
    async fn malformed_key_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("cluster.zip");
        std::fs::write(&archive, b"zip").unwrap();

        let store = ObjectStorePackageStore::memory();
        let result = store.upload_file(&archive, "atlasMongo//cluster.zip").await;

        assert!(matches!(
            result,
            Err(PublishError::Storage(object_store::Error::InvalidPath { .. }))
        ));
        let listing = store.list_prefix("atlasMongo").await.unwrap();
        assert!(listing.contents.is_none());
    }

    #[tokio::test]
    async fn upload_of_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = ObjectStorePackageStore::memory();

        let result = store
            .upload_file(&temp_dir.path().join("missing.zip"), "k/missing.zip")
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn listing_serializes_like_s3_response() {
        let listing = Listing {
            prefix: "p".into(),
            contents: None,
        };
        assert_eq!(serde_json::to_string(&listing).unwrap(), r#"{"Prefix":"p"}"#);

        let listing = Listing {
            prefix: "p".into(),
            contents: Some(vec![]),
        };
        assert_eq!(
            serde_json::to_string(&listing).unwrap(),
            r#"{"Prefix":"p","Contents":[]}"#
        );
    }
}
