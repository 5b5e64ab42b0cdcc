//! Shared helpers for the testyard integration tests.

use std::sync::{Arc, Mutex};

use log::Level;
use serde_json::Value;

use testyard::logging::{AuditSink, FactsEmitter};
use testyard::WriteEngine;

/// In-memory emitter that captures facts for assertions.
#[derive(Clone, Default)]
pub struct TestEmitter {
    pub events: Arc<Mutex<Vec<(String, String, String, Value)>>>,
}

impl FactsEmitter for TestEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events
            .lock()
            .unwrap()
            .push((subsystem.into(), event.into(), decision.into(), fields));
    }
}

/// No-op audit sink.
#[derive(Clone, Copy, Default)]
pub struct TestAudit;

impl AuditSink for TestAudit {
    fn log(&self, _level: Level, _msg: &str) {}
}

/// Temporary directory to use as a project root.
pub fn temp_root() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}

/// Fresh engine plus a handle on its captured facts.
pub fn test_engine() -> (WriteEngine<TestEmitter, TestAudit>, TestEmitter) {
    let facts = TestEmitter::default();
    (WriteEngine::new(facts.clone(), TestAudit), facts)
}
