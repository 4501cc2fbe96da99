//! Configuration loading and parsing for `cfn-publish.toml` files.
//!
//! Every field is optional; a missing file at the default location yields the
//! conventional layout and tool commands.
use log::*;
use serde::Deserialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    error::{PublishError, Result},
    version::{Subversion, VersionKey},
};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "cfn-publish.toml";
/// Directory holding `<major_version>/<resource>` trees.
pub const DEFAULT_RESOURCES_ROOT: &str = "cfn-resources";
/// Leading segment of every uploaded object key.
pub const DEFAULT_NAMESPACE: &str = "atlasMongo";
pub const DEFAULT_SCHEMA_EXTENSION: &str = "json";
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "zip";

/// An external program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for ToolCommand {
    type Error = String;

    fn try_from(mut value: Vec<String>) -> std::result::Result<Self, String> {
        if value.is_empty() {
            return Err("command must contain at least a program name".into());
        }
        let program = value.remove(0);
        Ok(Self {
            program,
            args: value,
        })
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// External commands run inside each resource directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Builds the resource handler and produces the package archive.
    pub build: ToolCommand,
    /// Validates the package without registering it.
    pub submit: ToolCommand,
    /// Regenerates docs and generated sources from the schema.
    pub generate: ToolCommand,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            build: ToolCommand::new("make", &[]),
            submit: ToolCommand::new("cfn", &["submit", "--dry-run"]),
            generate: ToolCommand::new("cfn", &["generate"]),
        }
    }
}

/// Root configuration structure for `cfn-publish.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub resources_root: PathBuf,
    pub namespace: String,
    pub schema_extension: String,
    pub archive_extension: String,
    pub commands: CommandsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resources_root: PathBuf::from(DEFAULT_RESOURCES_ROOT),
            namespace: DEFAULT_NAMESPACE.to_string(),
            schema_extension: DEFAULT_SCHEMA_EXTENSION.to_string(),
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            commands: CommandsConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`. A missing file is only an error when
    /// the caller asked for it explicitly.
    pub fn load(path: &Path, explicit: bool) -> Result<Self> {
        if !path.exists() {
            if explicit {
                return Err(PublishError::invalid_config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            info!("configuration file not found: using default");
            return Ok(Self::default());
        }

        debug!("loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() || self.namespace.contains('/') {
            return Err(PublishError::invalid_config(format!(
                "namespace must be a single non-empty key segment, got '{}'",
                self.namespace
            )));
        }
        for (name, ext) in [
            ("schema_extension", &self.schema_extension),
            ("archive_extension", &self.archive_extension),
        ] {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(PublishError::invalid_config(format!(
                    "{name} must be a bare extension like \"json\", got '{ext}'"
                )));
            }
        }
        Ok(())
    }
}

/// Everything one publishing run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub major_version: String,
    pub subversion: Subversion,
    pub bucket_name: String,
    pub bucket_region: String,
    pub resources_root: PathBuf,
    pub namespace: String,
    pub schema_extension: String,
    pub archive_extension: String,
    pub commands: CommandsConfig,
}

impl PublishConfig {
    pub fn new(
        major_version: impl Into<String>,
        subversion: Subversion,
        bucket_name: impl Into<String>,
        bucket_region: impl Into<String>,
        config: Config,
    ) -> Self {
        Self {
            major_version: major_version.into(),
            subversion,
            bucket_name: bucket_name.into(),
            bucket_region: bucket_region.into(),
            resources_root: config.resources_root,
            namespace: config.namespace,
            schema_extension: config.schema_extension,
            archive_extension: config.archive_extension,
            commands: config.commands,
        }
    }

    pub fn version_key(&self) -> VersionKey {
        VersionKey::new(
            self.namespace.clone(),
            self.major_version.clone(),
            self.subversion.clone(),
        )
    }

    /// `<resources_root>/<major_version>`
    pub fn major_version_dir(&self) -> PathBuf {
        self.resources_root.join(&self.major_version)
    }
}
