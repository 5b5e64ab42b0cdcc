pub mod audit;
pub mod facts;

pub use audit::{AuditCtx, Decision, EventBuilder, Stage, StageLogger};
pub use facts::{AuditSink, FactsEmitter, LogSink};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

/// Current time as RFC3339, falling back to the epoch constant if
/// formatting ever fails.
#[must_use]
pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| TS_ZERO.to_string())
}
