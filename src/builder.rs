//! Builds one resource package with its schema temporarily stamped with the
//! subversion.
use log::*;
use std::path::Path;

use crate::{
    config::CommandsConfig,
    error::Result,
    layout::find_single_file,
    runner::CommandRunner,
    schema::SchemaPatch,
    version::Subversion,
};

pub struct PackageBuilder<'a> {
    runner: &'a dyn CommandRunner,
    commands: &'a CommandsConfig,
    schema_extension: &'a str,
}

impl<'a> PackageBuilder<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        commands: &'a CommandsConfig,
        schema_extension: &'a str,
    ) -> Self {
        Self {
            runner,
            commands,
            schema_extension,
        }
    }

    /// Builds and validates the package in `dir`.
    ///
    /// The schema's `description` holds `subversion` only while the build and
    /// submit commands run. Afterwards the original bytes are back on disk and
    /// the generate command has run once, whether or not the build succeeded.
    /// A build failure is returned after regeneration; a regeneration failure
    /// takes its place.
    pub async fn build(&self, dir: &Path, subversion: &Subversion) -> Result<()> {
        let schema_path = find_single_file(dir, self.schema_extension)?;

        info!("building package for {}", dir.display());

        let outcome = match SchemaPatch::apply(&schema_path, subversion.as_str())
            .await
        {
            Ok(patch) => {
                let outcome = self.build_and_validate(dir).await;
                patch.restore().await?;
                outcome
            }
            Err(err) => Err(err),
        };

        if let Err(err) = &outcome {
            error!("building package for {} FAILED: {}", dir.display(), err);
        }

        // docs are generated from the schema, so they must follow the restore
        self.runner.run(&self.commands.generate, dir).await?;

        outcome?;

        info!("building package for {} SUCCESS", dir.display());

        Ok(())
    }

    async fn build_and_validate(&self, dir: &Path) -> Result<()> {
        self.runner.run(&self.commands.build, dir).await?;
        self.runner.run(&self.commands.submit, dir).await
    }
}
