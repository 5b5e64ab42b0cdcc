use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::errors::{EngineError, ErrorId, PathError};

/// Failures surfaced by the CLI commands. Engine errors pass through
/// untouched; everything else is a collaborator concern (environment,
/// project layout, the runner process).
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("node executable not found on PATH")]
    NodeNotFound,
    #[error("node {found} is older than the minimum supported {min}")]
    NodeTooOld {
        found: semver::Version,
        min: semver::Version,
    },
    #[error("could not parse node version from {raw:?}")]
    NodeVersionUnparsable { raw: String },
    #[error("npm executable not found on PATH")]
    NpmNotFound,
    #[error("no package.json found in {} or any parent directory", .start.display())]
    ProjectRootNotFound { start: PathBuf },
    #[error("no package.json at {}", .path.display())]
    ManifestMissing { path: PathBuf },
    #[error("invalid package.json at {}", .path.display())]
    ManifestInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("package.json at {} is not a JSON object", .path.display())]
    ManifestNotAnObject { path: PathBuf },
    #[error("test runner not found at {}; run `testyard setup` first", .path.display())]
    RunnerMissing { path: PathBuf },
    #[error("installing {pkg} failed")]
    InstallFailed { pkg: &'static str },
    #[error("not a JavaScript module: {}", .path.display())]
    NotAJsModule { path: PathBuf },
    #[error("component module not found: {}", .path.display())]
    ModuleNotFound { path: PathBuf },
    #[error("test file already exists: {}", .path.display())]
    TestFileExists { path: PathBuf },
    #[error("{op} failed for {}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl CommandError {
    pub(crate) fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Stable classification, used for the process exit status.
    #[must_use]
    pub fn error_id(&self) -> ErrorId {
        match self {
            Self::NodeNotFound
            | Self::NodeTooOld { .. }
            | Self::NodeVersionUnparsable { .. }
            | Self::NpmNotFound => ErrorId::E_ENV,
            Self::ProjectRootNotFound { .. }
            | Self::ManifestMissing { .. }
            | Self::ManifestInvalid { .. }
            | Self::ManifestNotAnObject { .. } => ErrorId::E_PROJECT,
            Self::RunnerMissing { .. } | Self::InstallFailed { .. } => ErrorId::E_RUNNER,
            Self::NotAJsModule { .. }
            | Self::ModuleNotFound { .. }
            | Self::TestFileExists { .. } => ErrorId::E_SCAFFOLD,
            Self::Io { .. } | Self::Path(_) => ErrorId::E_IO,
            Self::Engine(e) => e.error_id(),
        }
    }
}
