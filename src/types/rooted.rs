use std::path::{Component, Path, PathBuf};

use super::errors::PathError;

/// A path anchored under a project root.
///
/// Mutating APIs accept only `RootedPath`, so a batch can never reach
/// outside the project it was planned for. Parent traversal is rejected
/// outright rather than normalized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootedPath {
    root: PathBuf,
    rel: PathBuf,
}

impl RootedPath {
    /// Validate `candidate` against `root`. Absolute candidates must live
    /// under the root; relative candidates are taken as root-relative.
    pub fn from_rooted(root: &Path, candidate: &Path) -> Result<Self, PathError> {
        if !root.is_absolute() {
            return Err(PathError::RootNotAbsolute {
                root: root.to_path_buf(),
            });
        }
        let effective = if candidate.is_absolute() {
            candidate
                .strip_prefix(root)
                .map_err(|_| PathError::OutsideRoot {
                    path: candidate.to_path_buf(),
                })?
                .to_path_buf()
        } else {
            candidate.to_path_buf()
        };

        let mut rel = PathBuf::new();
        for seg in effective.components() {
            match seg {
                Component::CurDir => {}
                Component::Normal(p) => rel.push(p),
                _ => {
                    return Err(PathError::ParentTraversal {
                        path: candidate.to_path_buf(),
                    })
                }
            }
        }
        Ok(Self {
            root: root.to_path_buf(),
            rel,
        })
    }

    /// The full path, root and relative part joined.
    #[must_use]
    pub fn as_path(&self) -> PathBuf {
        self.root.join(&self.rel)
    }

    /// The root-relative part; used wherever ids must not depend on where
    /// the project happens to live.
    #[must_use]
    pub fn rel(&self) -> &Path {
        &self.rel
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
