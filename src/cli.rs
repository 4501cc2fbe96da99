//! CLI argument parsing.
use clap::Parser;
use std::path::PathBuf;

use crate::{
    config::{Config, DEFAULT_CONFIG_FILE, PublishConfig},
    error::Result,
    version::Subversion,
};

/// Builds every CloudFormation resource package of a major version and
/// uploads it under a versioned prefix.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long)]
    /// Major version directory under the resources root, e.g. 4.0.
    pub major_version: String,

    #[arg(long)]
    /// Seven digit subversion stamped into each schema description.
    pub subversion: String,

    #[arg(long)]
    /// Target bucket for the resource packages.
    pub bucket_name: String,

    #[arg(long)]
    /// Region of the target bucket.
    pub bucket_region: String,

    #[arg(long)]
    /// Path to configuration file. Defaults to ./cfn-publish.toml if present.
    pub config: Option<PathBuf>,

    #[arg(long)]
    /// Overrides the resources root directory from the configuration file.
    pub resources_root: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

impl Args {
    /// Loads the configuration file this invocation points at.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path, true),
            None => Config::load(&PathBuf::from(DEFAULT_CONFIG_FILE), false),
        }
    }

    /// Validates the subversion and merges CLI overrides into `config`.
    pub fn publish_config(&self, mut config: Config) -> Result<PublishConfig> {
        let subversion = Subversion::parse(&self.subversion)?;

        if let Some(root) = &self.resources_root {
            config.resources_root = root.clone();
        }

        Ok(PublishConfig::new(
            &self.major_version,
            subversion,
            &self.bucket_name,
            &self.bucket_region,
            config,
        ))
    }
}
