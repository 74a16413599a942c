//! Audit store adapter contract.
//!
//! The durable store is external (a remote queryable append log); this
//! module defines the contract the core requires from it, plus an in-memory
//! implementation for tests and development.
//!
//! ## Contract
//!
//! - `append` assigns `id` and `recorded_at` exactly once and never mutates
//!   an existing event.
//! - `query` returns events ordered by `occurred_at` descending, ties broken
//!   by store-assigned id descending — newest first, deterministic across
//!   repeated calls with no intervening appends.
//! - Both operations cross a network boundary: callers treat them as
//!   asynchronous, await `append` before any action that must observe the
//!   event, and may retry the idempotent `query` freely. The core adds no
//!   retries, buffering or batching of its own.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fleetdesk_core::AuditEventId;

use crate::event::{AuditEvent, AuditEventInput};
use crate::filter::AuditFilter;

/// Store adapter failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditStoreError {
    /// The underlying store cannot be reached. Retry/drop/queue is the
    /// caller's policy decision.
    #[error("audit store unavailable: {0}")]
    Unavailable(String),

    /// The event (or cursor) was rejected before ingestion.
    #[error("audit record validation failed: {0}")]
    ValidationFailed(String),
}

/// Opaque paging cursor.
///
/// Only valid for the filter that produced it; a cursor resumed under a
/// different filter yields unspecified results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    fn after(event: &AuditEvent) -> Self {
        let nanos = event.occurred_at().timestamp_nanos_opt().unwrap_or(0);
        Self(format!("{}:{}", nanos, event.id().as_uuid()))
    }

    fn decode(&self) -> Result<(DateTime<Utc>, AuditEventId), AuditStoreError> {
        let invalid = || AuditStoreError::ValidationFailed(format!("invalid cursor: {}", self.0));
        let (nanos, id) = self.0.split_once(':').ok_or_else(invalid)?;
        let nanos: i64 = nanos.parse().map_err(|_| invalid())?;
        let id: AuditEventId = id.parse().map_err(|_| invalid())?;
        Ok((DateTime::from_timestamp_nanos(nanos), id))
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditPage {
    pub events: Vec<AuditEvent>,
    /// Present when more events match beyond this page.
    pub next_cursor: Option<Cursor>,
}

/// Contract the external durable store must satisfy.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist one event, assigning its id and ingestion timestamp.
    ///
    /// Fails with [`AuditStoreError::ValidationFailed`] when required fields
    /// are blank or `occurred_at` lies in the future (a stored event always
    /// satisfies `occurred_at <= recorded_at`), and with
    /// [`AuditStoreError::Unavailable`] when the store is unreachable.
    async fn append(&self, input: AuditEventInput) -> Result<AuditEvent, AuditStoreError>;

    /// Fetch up to `page_size` events matching the filter's structured
    /// fields, newest first. The free-text term is not a store concern.
    async fn query(
        &self,
        filter: &AuditFilter,
        page_size: usize,
        cursor: Option<&Cursor>,
    ) -> Result<AuditPage, AuditStoreError>;
}

#[async_trait]
impl<S> AuditStore for Arc<S>
where
    S: AuditStore + ?Sized,
{
    async fn append(&self, input: AuditEventInput) -> Result<AuditEvent, AuditStoreError> {
        (**self).append(input).await
    }

    async fn query(
        &self,
        filter: &AuditFilter,
        page_size: usize,
        cursor: Option<&Cursor>,
    ) -> Result<AuditPage, AuditStoreError> {
        (**self).query(filter, page_size, cursor).await
    }
}

/// In-memory audit store for tests/dev.
#[derive(Debug)]
pub struct InMemoryAuditStore {
    events: RwLock<Vec<AuditEvent>>,
}

impl Default for InMemoryAuditStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        self.events.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn validate(input: &AuditEventInput, recorded_at: DateTime<Utc>) -> Result<(), AuditStoreError> {
    if input.actor_email.trim().is_empty() {
        return Err(AuditStoreError::ValidationFailed(
            "actor_email must not be blank".to_string(),
        ));
    }
    if input.description.trim().is_empty() {
        return Err(AuditStoreError::ValidationFailed(
            "description must not be blank".to_string(),
        ));
    }
    if input.occurred_at > recorded_at {
        return Err(AuditStoreError::ValidationFailed(
            "occurred_at must not lie in the future".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn append(&self, input: AuditEventInput) -> Result<AuditEvent, AuditStoreError> {
        let recorded_at = Utc::now();
        validate(&input, recorded_at)?;

        let event = AuditEvent::new(AuditEventId::new(), recorded_at, input);
        tracing::debug!(
            event_id = %event.id(),
            action = event.action().as_str(),
            entity = event.entity().as_str(),
            severity = event.severity().as_str(),
            "audit event appended"
        );

        self.events.write().unwrap().push(event.clone());
        Ok(event)
    }

    async fn query(
        &self,
        filter: &AuditFilter,
        page_size: usize,
        cursor: Option<&Cursor>,
    ) -> Result<AuditPage, AuditStoreError> {
        let events = self.events.read().unwrap();

        let mut matched: Vec<&AuditEvent> = events.iter().filter(|e| filter.matches(e)).collect();
        matched.sort_by(|a, b| {
            b.occurred_at()
                .cmp(&a.occurred_at())
                .then_with(|| b.id().cmp(&a.id()))
        });

        let start = match cursor {
            None => 0,
            Some(cursor) => {
                let key = cursor.decode()?;
                // First event strictly after the cursor position in the
                // descending sort order; none left means an empty tail page.
                matched
                    .iter()
                    .position(|e| (e.occurred_at(), e.id()) < key)
                    .unwrap_or(matched.len())
            }
        };

        let page: Vec<AuditEvent> = matched
            .iter()
            .skip(start)
            .take(page_size)
            .map(|e| (*e).clone())
            .collect();

        let next_cursor = if start + page.len() < matched.len() {
            page.last().map(Cursor::after)
        } else {
            None
        };

        Ok(AuditPage {
            events: page,
            next_cursor,
        })
    }
}
