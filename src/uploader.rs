//! Uploads built resource packages.
use log::*;
use std::path::Path;

use crate::{
    error::{PublishError, Result},
    layout::find_single_file,
    storage::PackageStore,
    version::VersionKey,
};

pub struct PackageUploader<'a> {
    store: &'a dyn PackageStore,
    bucket_name: &'a str,
    archive_extension: &'a str,
}

impl<'a> PackageUploader<'a> {
    pub fn new(
        store: &'a dyn PackageStore,
        bucket_name: &'a str,
        archive_extension: &'a str,
    ) -> Self {
        Self {
            store,
            bucket_name,
            archive_extension,
        }
    }

    /// Uploads the single archive in `dir` under `key` and returns the object
    /// key it was written to.
    pub async fn upload(&self, dir: &Path, key: &VersionKey) -> Result<String> {
        let archive = find_single_file(dir, self.archive_extension)?;

        let file_name = archive
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                PublishError::package_layout(dir, self.archive_extension, 0)
            })?;

        let object_key = key.object_key(&file_name);

        info!(
            "uploading {} into {}/{}",
            file_name, self.bucket_name, object_key
        );

        self.store.upload_file(&archive, &object_key).await?;

        info!("upload success");

        Ok(object_key)
    }
}
