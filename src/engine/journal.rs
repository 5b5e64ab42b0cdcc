//! Rollback bookkeeping for one flush: the backup map and the new-file
//! list. Created empty when a flush begins, fully cleared at the end
//! regardless of outcome; nothing persists across batches.

use std::fs;
use std::path::{Path, PathBuf};

use super::backup::backup_path_for;

#[derive(Clone, Debug)]
struct BackupEntry {
    original: PathBuf,
    backup: PathBuf,
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    backups: Vec<BackupEntry>,
    created: Vec<PathBuf>,
}

impl Journal {
    /// Copy `target` to its backup path and record the mapping. First touch
    /// wins: a path that already has a backup keeps its original snapshot,
    /// so a file appended and then rewritten in one batch restores to its
    /// true pre-batch content.
    pub(crate) fn ensure_backup(&mut self, target: &Path) -> std::io::Result<()> {
        if self.backups.iter().any(|e| e.original == target) {
            return Ok(());
        }
        let backup = backup_path_for(target);
        fs::copy(target, &backup)?;
        self.backups.push(BackupEntry {
            original: target.to_path_buf(),
            backup,
        });
        Ok(())
    }

    /// Record a path that did not exist before the batch. Recorded before
    /// the file is created, so a crash between the two still cleans it up.
    pub(crate) fn record_created(&mut self, target: &Path) {
        self.created.push(target.to_path_buf());
    }

    /// Restore every backup over its original, delete every recorded new
    /// file, then delete the backup payloads. Best effort: step failures
    /// are collected and the remaining entries still run, since stopping
    /// early would leave more of the tree unrestored. Clears all
    /// bookkeeping.
    pub(crate) fn rollback(&mut self) -> Vec<String> {
        let mut errors = Vec::new();
        for entry in self.backups.iter().rev() {
            if let Err(e) = fs::copy(&entry.backup, &entry.original) {
                errors.push(format!("restore {} failed: {e}", entry.original.display()));
            }
        }
        for path in self.created.iter().rev() {
            // A write that failed before its file came into being leaves
            // nothing to undo.
            if !path.exists() {
                continue;
            }
            if let Err(e) = fs::remove_file(path) {
                errors.push(format!("remove {} failed: {e}", path.display()));
            }
        }
        self.created.clear();
        errors.extend(self.discard_backups());
        errors
    }

    /// Commit: the mutations stand, so only the backup payloads and the
    /// bookkeeping go away.
    pub(crate) fn commit(&mut self) -> Vec<String> {
        self.created.clear();
        self.discard_backups()
    }

    fn discard_backups(&mut self) -> Vec<String> {
        let mut errors = Vec::new();
        for entry in self.backups.drain(..) {
            if let Err(e) = fs::remove_file(&entry.backup) {
                errors.push(format!(
                    "remove backup {} failed: {e}",
                    entry.backup.display()
                ));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_touch_wins() {
        let td = tempfile::tempdir().unwrap();
        let target = td.path().join("file.txt");
        fs::write(&target, "original").unwrap();

        let mut journal = Journal::default();
        journal.ensure_backup(&target).unwrap();
        fs::write(&target, "mutated once").unwrap();
        journal.ensure_backup(&target).unwrap();
        fs::write(&target, "mutated twice").unwrap();

        let errors = journal.rollback();
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
        assert!(!backup_path_for(&target).exists());
    }

    #[test]
    fn rollback_removes_created_files() {
        let td = tempfile::tempdir().unwrap();
        let target = td.path().join("new.txt");

        let mut journal = Journal::default();
        journal.record_created(&target);
        fs::write(&target, "fresh").unwrap();

        let errors = journal.rollback();
        assert!(errors.is_empty(), "{errors:?}");
        assert!(!target.exists());
    }

    #[test]
    fn rollback_tolerates_a_recorded_file_that_was_never_created() {
        let td = tempfile::tempdir().unwrap();
        let target = td.path().join("never.txt");

        let mut journal = Journal::default();
        journal.record_created(&target);
        // The creating write failed, so the file does not exist.

        let errors = journal.rollback();
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn rollback_continues_past_failures() {
        let td = tempfile::tempdir().unwrap();
        let broken = td.path().join("broken.txt");
        let healthy = td.path().join("healthy.txt");
        fs::write(&broken, "one").unwrap();
        fs::write(&healthy, "two").unwrap();

        let mut journal = Journal::default();
        journal.ensure_backup(&broken).unwrap();
        journal.ensure_backup(&healthy).unwrap();
        fs::write(&broken, "dirty").unwrap();
        fs::write(&healthy, "dirty").unwrap();
        // Sabotage one backup so its restore step fails.
        fs::remove_file(backup_path_for(&broken)).unwrap();

        let errors = journal.rollback();
        assert!(!errors.is_empty());
        assert_eq!(fs::read_to_string(&healthy).unwrap(), "two");
        assert!(!backup_path_for(&healthy).exists());
    }

    #[test]
    fn commit_keeps_mutations_and_drops_backups() {
        let td = tempfile::tempdir().unwrap();
        let target = td.path().join("file.txt");
        fs::write(&target, "original").unwrap();

        let mut journal = Journal::default();
        journal.ensure_backup(&target).unwrap();
        fs::write(&target, "mutated").unwrap();

        let errors = journal.commit();
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(fs::read_to_string(&target).unwrap(), "mutated");
        assert!(!backup_path_for(&target).exists());
    }
}
