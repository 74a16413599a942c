//! `fleetdesk-audit` — audit event model and store adapter.
//!
//! Every security-relevant action in the application (logins, entity
//! mutations, permission changes, denied access, exports, sensitive views)
//! is recorded as an immutable [`AuditEvent`] in an external durable store.
//! This crate owns the event shape, the filter value object and the
//! [`AuditStore`] contract the store must satisfy; the store engine itself is
//! a remote queryable append log and is not implemented here. An in-memory
//! store is provided for tests and development.

pub mod event;
pub mod filter;
pub mod store;

pub use event::{
    ActionKind, AuditEvent, AuditEventInput, EntityKind, Metadata, MetadataValue, Severity,
};
pub use filter::{AuditFilter, TimeRangePreset};
pub use store::{AuditPage, AuditStore, AuditStoreError, Cursor, InMemoryAuditStore};
