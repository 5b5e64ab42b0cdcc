//! Typed fact emission for the write engine stages.
//!
//! Every fact carries a minimal envelope: `schema_version`, `ts`,
//! `batch_id`, `path`, `stage`, and `decision`. Builders fill the rest.

use serde_json::{json, Value};

use super::facts::FactsEmitter;

pub(crate) const SCHEMA_VERSION: i64 = 1;

const SUBSYSTEM: &str = "testyard";

/// Shared context for one flush worth of facts.
pub struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub batch_id: String,
    pub ts: String,
}

impl<'a> AuditCtx<'a> {
    pub fn new(facts: &'a dyn FactsEmitter, batch_id: String, ts: String) -> Self {
        Self {
            facts,
            batch_id,
            ts,
        }
    }
}

/// Stage for typed fact emission.
#[derive(Clone, Copy, Debug)]
pub enum Stage {
    FlushAttempt,
    FlushResult,
    Rollback,
    RollbackSummary,
}

impl Stage {
    fn as_event(self) -> &'static str {
        match self {
            Stage::FlushAttempt => "flush.attempt",
            Stage::FlushResult => "flush.result",
            Stage::Rollback => "rollback",
            Stage::RollbackSummary => "rollback.summary",
        }
    }
}

/// Decision severity for facts.
#[derive(Clone, Copy, Debug)]
pub enum Decision {
    Success,
    Failure,
    Warn,
}

impl Decision {
    fn as_str(self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
            Decision::Warn => "warn",
        }
    }
}

/// Builder facade over fact emission with a centralized envelope.
pub struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub fn new(ctx: &'a AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    pub fn flush_attempt(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::FlushAttempt)
    }

    pub fn flush_result(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::FlushResult)
    }

    pub fn rollback(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Rollback)
    }

    pub fn rollback_summary(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::RollbackSummary)
    }
}

pub struct EventBuilder<'a> {
    ctx: &'a AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: &'a AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.fields.insert("path".into(), json!(path.into()));
        self
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn merge(mut self, extra: Value) -> Self {
        if let Some(obj) = extra.as_object() {
            for (k, v) in obj {
                self.fields.insert(k.clone(), v.clone());
            }
        }
        self
    }

    pub fn emit(self, decision: Decision) {
        let mut fields = self.fields;
        fields
            .entry("schema_version")
            .or_insert(json!(SCHEMA_VERSION));
        fields.entry("ts").or_insert(json!(self.ctx.ts));
        fields.entry("batch_id").or_insert(json!(self.ctx.batch_id));
        fields.entry("path").or_insert(json!(""));
        fields
            .entry("decision")
            .or_insert(json!(decision.as_str()));
        self.ctx.facts.emit(
            SUBSYSTEM,
            self.stage.as_event(),
            decision.as_str(),
            Value::Object(fields),
        );
    }

    pub fn emit_success(self) {
        self.emit(Decision::Success);
    }

    pub fn emit_failure(self) {
        self.emit(Decision::Failure);
    }

    pub fn emit_warn(self) {
        self.emit(Decision::Warn);
    }
}
