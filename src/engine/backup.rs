//! Backup naming for the write engine.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::constants::{BACKUP_DIGEST_LEN, BACKUP_SUFFIX};

/// Deterministic backup path for `target` in this process.
///
/// The name is a hidden sibling, `.{name}.{digest}.bak`, where the digest
/// hashes the target path together with the process id. Two processes
/// working on the same project therefore never collide on backup names.
/// The rule is public so leftover artifacts after a double fault can be
/// located by hand.
#[must_use]
pub fn backup_path_for(target: &Path) -> PathBuf {
    backup_path_with_pid(target, std::process::id())
}

pub(crate) fn backup_path_with_pid(target: &Path, pid: u32) -> PathBuf {
    let name = target
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("backup");
    let parent = target.parent().unwrap_or_else(|| Path::new("."));

    let mut hasher = Sha256::new();
    hasher.update(target.as_os_str().as_encoded_bytes());
    hasher.update(pid.to_string().as_bytes());
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(BACKUP_DIGEST_LEN);
    for byte in digest.iter().take(BACKUP_DIGEST_LEN / 2) {
        let _ = write!(hex, "{byte:02x}");
    }
    parent.join(format!(".{name}.{hex}{BACKUP_SUFFIX}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_is_deterministic_per_process() {
        let a = backup_path_for(Path::new("/proj/package.json"));
        let b = backup_path_for(Path::new("/proj/package.json"));
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_targets_get_distinct_names() {
        let a = backup_path_for(Path::new("/proj/a.txt"));
        let b = backup_path_for(Path::new("/proj/b.txt"));
        assert_ne!(a, b);
    }

    #[test]
    fn backup_is_a_hidden_sibling() {
        let backup = backup_path_with_pid(Path::new("/proj/pkg/file.txt"), 42);
        assert_eq!(backup.parent(), Some(Path::new("/proj/pkg")));
        let name = backup.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".file.txt."));
        assert!(name.ends_with(BACKUP_SUFFIX));
    }

    #[test]
    fn pid_is_part_of_the_digest() {
        let target = Path::new("/proj/a.txt");
        assert_ne!(
            backup_path_with_pid(target, 1),
            backup_path_with_pid(target, 2)
        );
    }
}
