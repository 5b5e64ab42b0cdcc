//! Scoped termination guard for the flush window.
//!
//! Armed when a flush begins and disarmed on both the commit and rollback
//! exit paths, so it fires at most once and only while file mutations are
//! in flight. A catchable termination signal triggers the same rollback as
//! an in-process error, after which the default signal disposition is
//! re-delivered so the exit status still reflects the signal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use signal_hook::consts::TERM_SIGNALS;
use signal_hook::iterator::{Handle, Signals};

use super::journal::Journal;

pub(crate) struct TermGuard {
    armed: Arc<AtomicBool>,
    handle: Handle,
    watcher: Option<JoinHandle<()>>,
    journal: Arc<Mutex<Journal>>,
}

impl TermGuard {
    /// Install the signal watcher for one flush. The journal is shared
    /// with the flush loop; whoever wins the race to swap `armed` runs the
    /// rollback, exactly once.
    pub(crate) fn arm(journal: Arc<Mutex<Journal>>) -> std::io::Result<Self> {
        let armed = Arc::new(AtomicBool::new(true));
        let mut signals = Signals::new(TERM_SIGNALS)?;
        let handle = signals.handle();

        let watcher_armed = Arc::clone(&armed);
        let watcher_journal = Arc::clone(&journal);
        let watcher = std::thread::spawn(move || {
            for signal in signals.forever() {
                if watcher_armed.swap(false, Ordering::SeqCst) {
                    log::warn!("caught signal {signal} mid-flush; restoring pre-batch state");
                    for error in lock_journal(&watcher_journal).rollback() {
                        log::error!("rollback: {error}");
                    }
                }
                let _ = signal_hook::low_level::emulate_default_handler(signal);
            }
        });

        Ok(Self {
            armed,
            handle,
            watcher: Some(watcher),
            journal,
        })
    }

    /// Deregister the watcher. Called on both exit paths before commit or
    /// rollback bookkeeping runs, so the handler cannot double-fire.
    pub(crate) fn disarm(mut self) {
        self.armed.store(false, Ordering::SeqCst);
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.handle.close();
        if let Some(watcher) = self.watcher.take() {
            let _ = watcher.join();
        }
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        // Still armed here means the flush never reached an exit path, i.e.
        // a panic is unwinding through the flush window.
        if self.armed.swap(false, Ordering::SeqCst) {
            for error in lock_journal(&self.journal).rollback() {
                log::error!("rollback: {error}");
            }
        }
        self.shutdown();
    }
}

pub(crate) fn lock_journal(journal: &Arc<Mutex<Journal>>) -> MutexGuard<'_, Journal> {
    journal.lock().unwrap_or_else(PoisonError::into_inner)
}
