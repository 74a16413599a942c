//! Audit trail service.
//!
//! Sits between the application and the [`AuditStore`]: the store answers
//! structured queries; this service refines by free text, folds statistics
//! and records gate denials. It adds no retries and no buffering — causal
//! ordering is the caller's `await`.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use uuid::Uuid;

use fleetdesk_audit::{
    ActionKind, AuditEvent, AuditEventInput, AuditFilter, AuditStore, AuditStoreError, EntityKind,
    Severity,
};
use fleetdesk_auth::{AccessDenial, AccessRequirement, GateOutcome};
use fleetdesk_core::AccountId;

/// Default cap on the working set fetched for statistics.
pub const DEFAULT_STATS_SCAN_LIMIT: usize = 1000;

/// Derived, ephemeral statistics over a filtered event set.
///
/// Recomputed on demand, never cached across requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditStats {
    pub total_logs: usize,
    pub by_action: BTreeMap<ActionKind, usize>,
    pub by_entity: BTreeMap<EntityKind, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    /// Events whose `occurred_at` lies within the trailing 24 hours of the
    /// computation instant (wall clock, not the filter's end bound).
    pub recent_activity: usize,
    pub critical_events: usize,
}

impl AuditStats {
    pub fn from_events(events: &[AuditEvent], now: DateTime<Utc>) -> Self {
        let recent_threshold = now - TimeDelta::hours(24);
        let mut stats = Self {
            total_logs: events.len(),
            ..Self::default()
        };

        for event in events {
            *stats.by_action.entry(event.action()).or_default() += 1;
            *stats.by_entity.entry(event.entity()).or_default() += 1;
            *stats.by_severity.entry(event.severity()).or_default() += 1;
            if event.occurred_at() > recent_threshold {
                stats.recent_activity += 1;
            }
            if event.severity() == Severity::Critical {
                stats.critical_events += 1;
            }
        }

        stats
    }
}

/// Statistics outcome for callers that prefer a degraded panel over a hard
/// failure when the store is unreachable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StatsView {
    Ready(AuditStats),
    /// The store could not be reached. Render "stats unavailable" — never an
    /// all-zero panel.
    Unavailable,
}

/// The application's audit surface over any [`AuditStore`].
#[derive(Debug, Clone)]
pub struct AuditTrail<S> {
    store: S,
    stats_scan_limit: usize,
}

impl<S: AuditStore> AuditTrail<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            stats_scan_limit: DEFAULT_STATS_SCAN_LIMIT,
        }
    }

    /// Tune the statistics working-set cap (a cost bound, not a contract).
    pub fn with_stats_scan_limit(mut self, limit: usize) -> Self {
        self.stats_scan_limit = limit;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append one event. Store failures surface unmodified; retry, drop or
    /// queue is the caller's policy.
    pub async fn record(&self, input: AuditEventInput) -> Result<AuditEvent, AuditStoreError> {
        self.store.append(input).await
    }

    /// Record an access-gate denial as an `access_denied` event.
    ///
    /// A forbidden outcome for an authenticated account is recorded at high
    /// severity; an unauthenticated denial at medium.
    pub async fn record_denial(
        &self,
        denial: &AccessDenial,
    ) -> Result<AuditEvent, AuditStoreError> {
        let severity = match denial.outcome {
            GateOutcome::DenyForbidden => Severity::High,
            _ => Severity::Medium,
        };

        let (actor_id, actor_email, actor_display_name) = match &denial.account {
            Some(account) => (
                account.id,
                account.email.clone(),
                account.display_name.clone(),
            ),
            None => (
                AccountId::from_uuid(Uuid::nil()),
                "anonymous".to_string(),
                "Anonymous".to_string(),
            ),
        };

        let requirement = match &denial.requirement {
            AccessRequirement::None => "none".to_string(),
            AccessRequirement::Permission(p) => p.as_str().to_string(),
            AccessRequirement::Superuser => "superuser".to_string(),
        };

        let input = AuditEventInput::new(
            actor_id,
            actor_email,
            actor_display_name,
            ActionKind::AccessDenied,
            EntityKind::System,
            format!("Access denied to '{}'", denial.resource),
            severity,
            Utc::now(),
        )
        .with_entity_ref(denial.resource.clone(), denial.resource.clone())
        .with_metadata("requirement", requirement)
        .with_metadata(
            "outcome",
            match denial.outcome {
                GateOutcome::DenyUnauthenticated => "deny_unauthenticated",
                _ => "deny_forbidden",
            },
        );

        tracing::warn!(
            resource = %denial.resource,
            outcome = ?denial.outcome,
            "recording access denial"
        );
        self.store.append(input).await
    }

    /// Filtered listing.
    ///
    /// The store handles the structured fields; the free-text term is then
    /// applied locally as a case-insensitive substring match over
    /// description, actor display name, actor email, entity name and action
    /// kind — a record matches if ANY of those contains the term. Store
    /// failures propagate unmodified: an audit page must never silently
    /// render "no results" after a failure.
    pub async fn list_logs(
        &self,
        filter: &AuditFilter,
        page_size: usize,
    ) -> Result<Vec<AuditEvent>, AuditStoreError> {
        let page = self.store.query(filter, page_size, None).await?;

        let Some(term) = filter.term.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(page.events);
        };

        Ok(page
            .events
            .into_iter()
            .filter(|event| matches_term(event, term))
            .collect())
    }

    /// Statistics over the filtered set, ignoring the free-text term.
    ///
    /// The working set is capped at the configured scan limit to bound cost;
    /// above the cap the figures are an approximation over the newest
    /// events, not exact totals.
    pub async fn compute_stats(&self, filter: &AuditFilter) -> Result<AuditStats, AuditStoreError> {
        let working = self
            .store
            .query(&filter.without_term(), self.stats_scan_limit, None)
            .await?;
        Ok(AuditStats::from_events(&working.events, Utc::now()))
    }

    /// Statistics with an explicit degraded-mode marker.
    ///
    /// An unreachable store yields [`StatsView::Unavailable`] instead of an
    /// error; validation failures still propagate.
    pub async fn stats_or_unavailable(
        &self,
        filter: &AuditFilter,
    ) -> Result<StatsView, AuditStoreError> {
        match self.compute_stats(filter).await {
            Ok(stats) => Ok(StatsView::Ready(stats)),
            Err(AuditStoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "audit store unavailable, degrading stats");
                Ok(StatsView::Unavailable)
            }
            Err(other) => Err(other),
        }
    }
}

fn matches_term(event: &AuditEvent, term: &str) -> bool {
    let needle = term.to_lowercase();
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    contains(event.description())
        || contains(event.actor_display_name())
        || contains(event.actor_email())
        || event.entity_name().is_some_and(contains)
        || contains(event.action().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdesk_core::AuditEventId;

    fn event(description: &str, occurred_at: DateTime<Utc>, severity: Severity) -> AuditEvent {
        let input = AuditEventInput::new(
            AccountId::new(),
            "trail@fleetdesk.test",
            "Trail",
            ActionKind::Update,
            EntityKind::Employee,
            description,
            severity,
            occurred_at,
        );
        AuditEvent::new(AuditEventId::new(), occurred_at, input)
    }

    #[test]
    fn stats_fold_counts_totals_recent_and_critical() {
        let now = Utc::now();
        let events = vec![
            event("old low", now - TimeDelta::days(3), Severity::Low),
            event("old medium", now - TimeDelta::days(2), Severity::Medium),
            event("old high", now - TimeDelta::hours(30), Severity::High),
            event("fresh", now - TimeDelta::hours(2), Severity::Low),
            event("fresh critical", now - TimeDelta::minutes(5), Severity::Critical),
        ];

        let stats = AuditStats::from_events(&events, now);

        assert_eq!(stats.total_logs, 5);
        assert_eq!(stats.recent_activity, 2);
        assert_eq!(stats.critical_events, 1);
        assert_eq!(stats.by_action.get(&ActionKind::Update), Some(&5));
        assert_eq!(stats.by_severity.get(&Severity::Low), Some(&2));
        assert_eq!(stats.by_entity.get(&EntityKind::Employee), Some(&5));
    }

    #[test]
    fn stats_over_an_empty_set_are_all_zero() {
        let stats = AuditStats::from_events(&[], Utc::now());
        assert_eq!(stats, AuditStats::default());
    }

    #[test]
    fn term_matches_any_of_the_searchable_fields() {
        let now = Utc::now();
        let e = event("Adjusted route plan", now, Severity::Low);

        assert!(matches_term(&e, "route"));
        assert!(matches_term(&e, "TRAIL"));
        assert!(matches_term(&e, "trail@fleetdesk.test"));
        assert!(matches_term(&e, "update"));
        assert!(!matches_term(&e, "vehicle"));
    }
}
