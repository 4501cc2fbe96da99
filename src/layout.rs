//! Resource directory discovery.
use log::*;
use std::path::{Path, PathBuf};

use crate::error::{PublishError, Result};

/// One `<resources_root>/<major_version>/<name>` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDir {
    pub name: String,
    pub path: PathBuf,
}

/// Lists the resource directories directly under `major_version_dir`.
///
/// Plain files are skipped. Order follows the filesystem enumeration.
pub fn list_resource_dirs(major_version_dir: &Path) -> Result<Vec<ResourceDir>> {
    let mut dirs = vec![];

    for entry in std::fs::read_dir(major_version_dir)? {
        let entry = entry?;

        if !entry.file_type()?.is_dir() {
            debug!("skipping non-directory entry {}", entry.path().display());
            continue;
        }

        dirs.push(ResourceDir {
            name: entry.file_name().to_string_lossy().to_string(),
            path: entry.path(),
        });
    }

    Ok(dirs)
}

/// Returns the only file in `dir` ending in `.<extension>`.
///
/// Zero or several matches are a [`PublishError::PackageLayout`].
pub fn find_single_file(dir: &Path, extension: &str) -> Result<PathBuf> {
    let suffix = format!(".{extension}");
    let mut matches = vec![];

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().ends_with(&suffix) {
            matches.push(entry.path());
        }
    }

    if matches.len() != 1 {
        return Err(PublishError::package_layout(dir, extension, matches.len()));
    }

    Ok(matches.remove(0))
}
