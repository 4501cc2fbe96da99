//! Execution of external build tools.
use async_trait::async_trait;
use log::*;
use std::path::Path;
use tokio::process::Command;

use crate::{
    config::ToolCommand,
    error::{PublishError, Result},
};

/// Runs an external command inside a working directory.
///
/// Implementations must treat a zero exit status as success and anything
/// else as [`PublishError::ExternalToolFailure`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &ToolCommand, cwd: &Path) -> Result<()>;
}

/// Spawns real processes with inherited stdio so tool output stays visible
/// to the operator.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &ToolCommand, cwd: &Path) -> Result<()> {
        debug!("running `{}` in {}", command, cwd.display());

        let status = Command::new(&command.program)
            .args(&command.args)
            .current_dir(cwd)
            .status()
            .await
            .map_err(|err| {
                PublishError::tool_failure(
                    command.to_string(),
                    cwd,
                    format!("failed to spawn: {err}"),
                )
            })?;

        if !status.success() {
            return Err(PublishError::tool_failure(
                command.to_string(),
                cwd,
                status.to_string(),
            ));
        }

        Ok(())
    }
}
