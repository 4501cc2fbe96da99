//! Temporary patching of resource schema documents.
//!
//! [`SchemaPatch`] owns the original bytes of a schema file for as long as the
//! patched content is on disk. Call [`SchemaPatch::restore`] to put the
//! original back and observe any error; if the patch is dropped first the
//! original is written back synchronously and a failure is only logged.
use log::*;
use serde_json::Value;
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tokio::io::AsyncWriteExt;

use crate::error::{PublishError, Result};

/// Sets the top-level `description` of a JSON schema document to
/// `description`, keeping key order.
pub fn patch_description(
    path: &Path,
    original: &[u8],
    description: &str,
) -> Result<Vec<u8>> {
    let mut schema: Value = serde_json::from_slice(original)?;

    let object = schema.as_object_mut().ok_or_else(|| {
        PublishError::invalid_schema(path, "top level must be a JSON object")
    })?;

    object.insert(
        "description".to_string(),
        Value::String(description.to_string()),
    );

    Ok(serde_json::to_vec_pretty(&schema)?)
}

/// Replaces the file's content and waits until it has reached the disk.
pub async fn rewrite_durably(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .await?;

    file.write_all(content).await?;
    file.flush().await?;
    file.sync_all().await?;

    Ok(())
}

fn rewrite_durably_blocking(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)?;

    file.write_all(content)?;
    file.flush()?;
    file.sync_all()
}

/// A schema file whose content is temporarily replaced.
#[derive(Debug)]
pub struct SchemaPatch {
    path: PathBuf,
    original: Vec<u8>,
    restored: bool,
}

impl SchemaPatch {
    /// Reads the schema at `path`, remembers it verbatim, and writes the
    /// version with `description` set.
    pub async fn apply(path: &Path, description: &str) -> Result<Self> {
        let original = tokio::fs::read(path).await?;
        let patched = patch_description(path, &original, description)?;

        let patch = Self {
            path: path.to_path_buf(),
            original,
            restored: false,
        };

        rewrite_durably(&patch.path, &patched).await?;

        Ok(patch)
    }

    pub fn original(&self) -> &[u8] {
        &self.original
    }

    /// Writes the original bytes back.
    pub async fn restore(mut self) -> Result<()> {
        self.restored = true;
        rewrite_durably(&self.path, &self.original).await
    }
}

impl Drop for SchemaPatch {
    fn drop(&mut self) {
        if self.restored {
            return;
        }

        warn!(
            "restoring {} after interrupted build",
            self.path.display()
        );

        if let Err(err) = rewrite_durably_blocking(&self.path, &self.original) {
            error!("failed to restore {}: {}", self.path.display(), err);
        }
    }
}
