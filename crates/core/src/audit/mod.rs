//! Audit trail: who did what to the content pipeline, persisted off the
//! request path through an async channel.

mod events;
mod handle;
mod sqlite;
mod store;
mod writer;

pub use events::AuditEvent;
pub use handle::{AuditEventEnvelope, AuditHandle};
pub use sqlite::SqliteAuditStore;
pub use store::{AuditError, AuditFilter, AuditRecord, AuditStore};
pub use writer::{create_audit_system, AuditWriter};
