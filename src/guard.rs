//! Pre-flight check that a version prefix may be published.
use log::*;

use crate::{
    error::{PublishError, Result},
    storage::{Listing, PackageStore},
    version::VersionKey,
};

/// Bucket that must never have an existing version overwritten.
pub const PRODUCTION_BUCKET_NAME: &str = "stacktape-infrastructure-modules";

/// Interprets a prefix listing as "version already published".
///
/// An absent `Contents` element counts as existing, exactly like a non-empty
/// one. S3 omits `Contents` when nothing matched, so this reports `true` for
/// unused prefixes too; it is kept as-is until the intended semantics are
/// confirmed.
pub fn listing_indicates_existing(listing: &Listing) -> bool {
    match &listing.contents {
        None => {
            warn!(
                "listing for prefix {} returned no Contents element: treating prefix as existing",
                listing.prefix
            );
            true
        }
        Some(contents) => !contents.is_empty(),
    }
}

/// Queries `store` for objects under the version prefix.
pub async fn check_subversion_existence(
    store: &dyn PackageStore,
    bucket_name: &str,
    key: &VersionKey,
) -> Result<bool> {
    let prefix = key.prefix();
    let listing = store.list_prefix(&prefix).await?;

    debug!("{}", serde_json::to_string_pretty(&listing)?);

    let exists = listing_indicates_existing(&listing);
    if exists {
        info!("Prefix {} already exists in bucket {}", prefix, bucket_name);
    }

    Ok(exists)
}

/// Fails with [`PublishError::ProductionOverwriteForbidden`] when the version
/// exists and `bucket_name` is the production bucket.
pub async fn ensure_publishable(
    store: &dyn PackageStore,
    bucket_name: &str,
    key: &VersionKey,
) -> Result<()> {
    let exists = check_subversion_existence(store, bucket_name, key).await?;

    if !exists {
        return Ok(());
    }

    if bucket_name == PRODUCTION_BUCKET_NAME {
        return Err(PublishError::ProductionOverwriteForbidden {
            bucket: bucket_name.to_string(),
            prefix: key.prefix(),
        });
    }

    warn!(
        "existing objects under {} in {} will be overwritten",
        key.prefix(),
        bucket_name
    );

    Ok(())
}
