//! Error taxonomy for the write engine, plus the stable identifiers emitted
//! into facts and mapped to process exit codes.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Path validation failures for [`RootedPath`](super::rooted::RootedPath).
#[derive(Debug, Error)]
pub enum PathError {
    #[error("project root must be absolute: {}", .root.display())]
    RootNotAbsolute { root: PathBuf },
    #[error("path escapes the project root: {}", .path.display())]
    OutsideRoot { path: PathBuf },
    #[error("parent traversal is not allowed: {}", .path.display())]
    ParentTraversal { path: PathBuf },
}

/// The first failure encountered while executing a batch.
///
/// The engine never reinterprets I/O errors; the original cause is kept as
/// the error source and only rollback behavior is added around it.
#[derive(Debug, Error)]
pub enum FlushError {
    /// Caller-contract violation: appends require an existing target.
    #[error("append target does not exist: {}", .path.display())]
    AppendTargetMissing { path: PathBuf },
    /// An underlying filesystem operation failed.
    #[error("{op} failed for {}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The termination guard could not be installed; nothing was mutated.
    #[error("termination guard registration failed")]
    Guard {
        #[source]
        source: std::io::Error,
    },
}

impl FlushError {
    pub(crate) fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    #[must_use]
    pub fn error_id(&self) -> ErrorId {
        match self {
            Self::AppendTargetMissing { .. } => ErrorId::E_APPEND_MISSING,
            Self::Io { .. } | Self::Guard { .. } => ErrorId::E_IO,
        }
    }
}

/// Outcome of a failed flush, after rollback has run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The batch failed and every touched file was restored byte-for-byte.
    #[error("batch aborted; all changes rolled back")]
    RolledBack {
        #[source]
        cause: FlushError,
    },
    /// The batch failed and rollback itself hit errors. Backup artifacts may
    /// remain on disk under the names [`crate::engine::backup_path_for`]
    /// yields, enabling manual recovery.
    #[error("batch aborted; rollback incomplete ({} step(s) failed)", .rollback_errors.len())]
    RollbackIncomplete {
        #[source]
        cause: FlushError,
        rollback_errors: Vec<String>,
    },
}

impl EngineError {
    /// The failure that aborted the batch.
    #[must_use]
    pub fn cause(&self) -> &FlushError {
        match self {
            Self::RolledBack { cause } | Self::RollbackIncomplete { cause, .. } => cause,
        }
    }

    #[must_use]
    pub fn error_id(&self) -> ErrorId {
        match self {
            Self::RolledBack { cause } => cause.error_id(),
            Self::RollbackIncomplete { .. } => ErrorId::E_ROLLBACK,
        }
    }
}

/// Stable error identifiers.
// SCREAMING_SNAKE_CASE matches the identifiers as emitted into facts.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_APPEND_MISSING,
    E_IO,
    E_ROLLBACK,
    E_ENV,
    E_PROJECT,
    E_RUNNER,
    E_SCAFFOLD,
    E_GENERIC,
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_APPEND_MISSING => "E_APPEND_MISSING",
        ErrorId::E_IO => "E_IO",
        ErrorId::E_ROLLBACK => "E_ROLLBACK",
        ErrorId::E_ENV => "E_ENV",
        ErrorId::E_PROJECT => "E_PROJECT",
        ErrorId::E_RUNNER => "E_RUNNER",
        ErrorId::E_SCAFFOLD => "E_SCAFFOLD",
        ErrorId::E_GENERIC => "E_GENERIC",
    }
}

#[must_use]
pub const fn exit_code_for(id: ErrorId) -> i32 {
    match id {
        ErrorId::E_APPEND_MISSING => 10,
        ErrorId::E_IO => 20,
        ErrorId::E_ROLLBACK => 30,
        ErrorId::E_ENV => 40,
        ErrorId::E_PROJECT => 50,
        ErrorId::E_RUNNER => 60,
        ErrorId::E_SCAFFOLD => 70,
        ErrorId::E_GENERIC => 1,
    }
}
