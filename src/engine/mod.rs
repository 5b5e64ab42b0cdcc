//! The transactional write engine.
//!
//! Callers queue file creations and appends, then [`WriteEngine::flush`]
//! applies the whole batch as one all-or-nothing operation: appends first,
//! then writes, each in enqueue order. Any failure restores every touched
//! file to its pre-batch content and deletes every file the batch created.

mod backup;
mod guard;
mod journal;

pub use backup::backup_path_for;

use std::fs;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::os::unix::fs::PermissionsExt as _;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use log::Level;
use serde_json::json;

use crate::logging::{now_iso, AuditCtx, AuditSink, FactsEmitter, StageLogger};
use crate::types::errors::{exit_code_for, id_str, EngineError, ErrorId, FlushError};
use crate::types::ids::batch_id;
use crate::types::report::FlushReport;
use crate::types::request::{AppendRequest, WriteOptions, WriteRequest};
use crate::types::rooted::RootedPath;

use guard::{lock_journal, TermGuard};
use journal::Journal;

/// Owns the pending queues and executes them transactionally. One engine
/// instance serves one command invocation; bookkeeping never persists
/// across flushes.
pub struct WriteEngine<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    appends: Vec<AppendRequest>,
    writes: Vec<WriteRequest>,
}

impl<E: FactsEmitter, A: AuditSink> WriteEngine<E, A> {
    pub fn new(facts: E, audit: A) -> Self {
        Self {
            facts,
            audit,
            appends: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Enqueue a create-or-replace request. Pure in-memory append; no I/O
    /// happens until [`flush`](Self::flush).
    pub fn queue_write(
        &mut self,
        target: RootedPath,
        content: impl Into<Vec<u8>>,
        options: WriteOptions,
    ) {
        self.writes.push(WriteRequest {
            target,
            content: content.into(),
            options,
        });
    }

    /// Enqueue an append request. The target must exist by the time
    /// [`flush`](Self::flush) runs.
    pub fn queue_append(
        &mut self,
        target: RootedPath,
        suffix: impl Into<Vec<u8>>,
        options: WriteOptions,
    ) {
        self.appends.push(AppendRequest {
            target,
            suffix: suffix.into(),
            options,
        });
    }

    /// Number of requests currently queued.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.appends.len() + self.writes.len()
    }

    /// Execute the queued batch.
    ///
    /// On return the filesystem holds either every requested mutation
    /// (`Ok`) or exactly the pre-flush state (`Err`, rollback completed).
    /// A termination guard covers the flush window, so a catchable signal
    /// mid-batch rolls back the same way an in-process error does; an
    /// uncatchable kill voids that guarantee. A failure during rollback
    /// itself is reported as [`EngineError::RollbackIncomplete`] and may
    /// leave backup artifacts on disk, named per [`backup_path_for`].
    ///
    /// Queues are drained whatever the outcome; a rerun needs a fresh plan.
    pub fn flush(&mut self) -> Result<FlushReport, EngineError> {
        let t0 = Instant::now();
        let appends = std::mem::take(&mut self.appends);
        let writes = std::mem::take(&mut self.writes);

        let bid = batch_id(&appends, &writes);
        let ctx = AuditCtx::new(&self.facts, bid.to_string(), now_iso());
        let slog = StageLogger::new(&ctx);

        self.audit.log(Level::Info, "flush: starting");
        slog.flush_attempt()
            .merge(json!({
                "appends": appends.len(),
                "writes": writes.len(),
            }))
            .emit_success();

        let journal = Arc::new(Mutex::new(Journal::default()));
        let mut report = FlushReport::default();
        let outcome = match TermGuard::arm(Arc::clone(&journal)) {
            Ok(guard) => {
                let outcome = run_batch(&appends, &writes, &journal, &slog, &mut report);
                guard.disarm();
                outcome
            }
            Err(source) => Err(FlushError::Guard { source }),
        };

        match outcome {
            Ok(()) => {
                for warning in lock_journal(&journal).commit() {
                    self.audit.log(Level::Warn, &warning);
                    slog.flush_result()
                        .field("warning", json!(warning))
                        .emit_warn();
                }
                report.duration_ms = elapsed_ms(t0);
                slog.flush_result()
                    .merge(json!({
                        "appended": report.appended.len(),
                        "written": report.written.len(),
                        "created": report.created.len(),
                        "duration_ms": report.duration_ms,
                    }))
                    .emit_success();
                self.audit.log(Level::Info, "flush: finished");
                Ok(report)
            }
            Err(cause) => {
                self.audit
                    .log(Level::Warn, "flush failed; restoring pre-batch state");
                let rollback_errors = lock_journal(&journal).rollback();
                for error in &rollback_errors {
                    self.audit.log(Level::Error, error);
                    slog.rollback().field("error", json!(error)).emit_failure();
                }
                if rollback_errors.is_empty() {
                    slog.rollback_summary().emit_success();
                } else {
                    slog.rollback_summary()
                        .merge(json!({
                            "error_id": id_str(ErrorId::E_ROLLBACK),
                            "exit_code": exit_code_for(ErrorId::E_ROLLBACK),
                            "failed_steps": rollback_errors.len(),
                        }))
                        .emit_failure();
                }
                slog.flush_result()
                    .merge(json!({
                        "error": cause.to_string(),
                        "error_id": id_str(cause.error_id()),
                        "exit_code": exit_code_for(cause.error_id()),
                        "duration_ms": elapsed_ms(t0),
                    }))
                    .emit_failure();
                if rollback_errors.is_empty() {
                    Err(EngineError::RolledBack { cause })
                } else {
                    Err(EngineError::RollbackIncomplete {
                        cause,
                        rollback_errors,
                    })
                }
            }
        }
    }
}

fn run_batch(
    appends: &[AppendRequest],
    writes: &[WriteRequest],
    journal: &Arc<Mutex<Journal>>,
    slog: &StageLogger<'_>,
    report: &mut FlushReport,
) -> Result<(), FlushError> {
    for item in appends {
        let path = item.target.as_path();
        item_fact(slog, "append", &path, apply_append(item, &path, journal))?;
        report.appended.push(path);
    }
    for item in writes {
        let path = item.target.as_path();
        let created = item_fact(slog, "write", &path, apply_write(item, &path, journal))?;
        if created {
            report.created.push(path);
        } else {
            report.written.push(path);
        }
    }
    Ok(())
}

/// Emit the per-item `flush.result` fact and pass the outcome through.
fn item_fact<T>(
    slog: &StageLogger<'_>,
    op: &str,
    path: &Path,
    outcome: Result<T, FlushError>,
) -> Result<T, FlushError> {
    let display = path.display().to_string();
    match outcome {
        Ok(value) => {
            slog.flush_result()
                .path(display)
                .field("op", json!(op))
                .emit_success();
            Ok(value)
        }
        Err(e) => {
            slog.flush_result()
                .path(display)
                .merge(json!({
                    "op": op,
                    "error": e.to_string(),
                    "error_id": id_str(e.error_id()),
                    "exit_code": exit_code_for(e.error_id()),
                }))
                .emit_failure();
            Err(e)
        }
    }
}

fn apply_append(
    item: &AppendRequest,
    path: &Path,
    journal: &Arc<Mutex<Journal>>,
) -> Result<(), FlushError> {
    if !path.exists() {
        return Err(FlushError::AppendTargetMissing {
            path: path.to_path_buf(),
        });
    }
    lock_journal(journal)
        .ensure_backup(path)
        .map_err(|source| FlushError::io("back up", path, source))?;
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|source| FlushError::io("open", path, source))?;
    file.write_all(&item.suffix)
        .map_err(|source| FlushError::io("append to", path, source))?;
    apply_mode(path, &item.options)
}

/// Returns true when the target did not exist before the batch.
fn apply_write(
    item: &WriteRequest,
    path: &Path,
    journal: &Arc<Mutex<Journal>>,
) -> Result<bool, FlushError> {
    let existed = path.exists();
    if existed {
        lock_journal(journal)
            .ensure_backup(path)
            .map_err(|source| FlushError::io("back up", path, source))?;
    } else {
        // Recorded before creation so an interrupt in between still cleans
        // up the half-born file.
        lock_journal(journal).record_created(path);
    }
    fs::write(path, &item.content).map_err(|source| FlushError::io("write", path, source))?;
    apply_mode(path, &item.options)?;
    Ok(!existed)
}

fn apply_mode(path: &Path, options: &WriteOptions) -> Result<(), FlushError> {
    if let Some(mode) = options.mode {
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|source| FlushError::io("set mode on", path, source))?;
    }
    Ok(())
}

fn elapsed_ms(t0: Instant) -> u64 {
    u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX)
}
