//! Project discovery and well-known paths.

use std::path::{Path, PathBuf};

use crate::commands::CommandError;
use crate::constants::{IGNORE_FILE, MANIFEST_FILE, RUNNER_BIN, RUNNER_CONFIG_FILE};
use crate::types::errors::PathError;
use crate::types::rooted::RootedPath;

/// A component project, anchored at the directory holding its manifest.
#[derive(Clone, Debug)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Walk upward from `start` to the nearest directory containing
    /// `package.json`. `start` should be absolute (the CLI passes the
    /// current working directory).
    pub fn discover(start: &Path) -> Result<Self, CommandError> {
        let mut dir = Some(start);
        while let Some(d) = dir {
            if d.join(MANIFEST_FILE).is_file() {
                return Ok(Self {
                    root: d.to_path_buf(),
                });
            }
            dir = d.parent();
        }
        Err(CommandError::ProjectRootNotFound {
            start: start.to_path_buf(),
        })
    }

    /// Anchor a project at `root` directly, without discovery. The
    /// manifest may not exist yet; `setup` checks for it explicitly.
    #[must_use]
    pub fn from_root(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    #[must_use]
    pub fn runner_config_path(&self) -> PathBuf {
        self.root.join(RUNNER_CONFIG_FILE)
    }

    #[must_use]
    pub fn ignore_path(&self) -> PathBuf {
        self.root.join(IGNORE_FILE)
    }

    #[must_use]
    pub fn runner_bin_path(&self) -> PathBuf {
        self.root.join("node_modules").join(".bin").join(RUNNER_BIN)
    }

    /// Validate `candidate` against this project's root.
    pub fn rooted(&self, candidate: &Path) -> Result<RootedPath, PathError> {
        RootedPath::from_rooted(&self.root, candidate)
    }
}
