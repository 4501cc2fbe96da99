//! Drives a full publishing run: version guard, then build and upload for
//! every resource of the major version.
use log::*;

use crate::{
    builder::PackageBuilder,
    config::PublishConfig,
    error::Result,
    guard,
    layout::{ResourceDir, list_resource_dirs},
    runner::CommandRunner,
    storage::PackageStore,
    uploader::PackageUploader,
};

pub struct Orchestrator {
    config: PublishConfig,
    store: Box<dyn PackageStore>,
    runner: Box<dyn CommandRunner>,
}

impl Orchestrator {
    pub fn new(
        config: PublishConfig,
        store: Box<dyn PackageStore>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            store,
            runner,
        }
    }

    /// Publishes every resource package and returns the uploaded object
    /// keys. Stops at the first resource that fails.
    pub async fn run(&self) -> Result<Vec<String>> {
        let key = self.config.version_key();

        guard::ensure_publishable(
            self.store.as_ref(),
            &self.config.bucket_name,
            &key,
        )
        .await?;

        let major_version_dir = self.config.major_version_dir();
        let resources = list_resource_dirs(&major_version_dir)?;

        info!(
            "publishing {} resource packages from {} as {}",
            resources.len(),
            major_version_dir.display(),
            key.prefix()
        );

        let mut uploaded = vec![];

        for resource in resources.iter() {
            uploaded.push(self.publish_resource(resource).await?);
        }

        for object_key in uploaded.iter() {
            info!("published {}/{}", self.config.bucket_name, object_key);
        }

        Ok(uploaded)
    }

    async fn publish_resource(&self, resource: &ResourceDir) -> Result<String> {
        debug!("processing resource {}", resource.name);

        let builder = PackageBuilder::new(
            self.runner.as_ref(),
            &self.config.commands,
            &self.config.schema_extension,
        );
        builder.build(&resource.path, &self.config.subversion).await?;

        let uploader = PackageUploader::new(
            self.store.as_ref(),
            &self.config.bucket_name,
            &self.config.archive_extension,
        );
        uploader
            .upload(&resource.path, &self.config.version_key())
            .await
    }
}
