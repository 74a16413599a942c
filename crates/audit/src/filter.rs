//! Audit filter value object and time-range presets.

use chrono::{DateTime, Days, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use fleetdesk_core::AccountId;

use crate::event::{ActionKind, AuditEvent, EntityKind, Severity};

/// Filter criteria for audit queries.
///
/// All fields are optional and combine conjunctively. The time range is
/// inclusive on both ends; a range with `start > end` simply matches
/// nothing — it is not an error. The free-text `term` is carried here for
/// the caller's convenience but is **not** part of [`Self::matches`]: store
/// adapters filter structured fields only, and the audit trail service
/// refines by term locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditFilter {
    pub actor_id: Option<AccountId>,
    pub action: Option<ActionKind>,
    pub entity: Option<EntityKind>,
    pub severity: Option<Severity>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub term: Option<String>,
}

impl AuditFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actor(mut self, actor_id: AccountId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn with_action(mut self, action: ActionKind) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_entity(mut self, entity: EntityKind) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    /// The same filter minus the free-text term (statistics ignore it).
    pub fn without_term(&self) -> Self {
        Self {
            term: None,
            ..self.clone()
        }
    }

    /// Structured-field predicate over a stored event.
    ///
    /// Matches on actor, action, entity, severity and the inclusive
    /// `occurred_at` range. The free-text term is deliberately excluded.
    pub fn matches(&self, event: &AuditEvent) -> bool {
        if let Some(actor_id) = self.actor_id {
            if event.actor_id() != actor_id {
                return false;
            }
        }
        if let Some(action) = self.action {
            if event.action() != action {
                return false;
            }
        }
        if let Some(entity) = self.entity {
            if event.entity() != entity {
                return false;
            }
        }
        if let Some(severity) = self.severity {
            if event.severity() != severity {
                return false;
            }
        }
        if let Some(start) = self.start {
            if event.occurred_at() < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if event.occurred_at() > end {
                return false;
            }
        }
        true
    }
}

/// Named time ranges offered by the audit surface.
///
/// Presets resolve against the caller's local calendar day. `All` means no
/// range constraint; `Custom` with either bound missing also resolves to no
/// constraint — a malformed convenience filter widens the query rather than
/// failing. (Missing *authorization* data narrows instead; the asymmetry is
/// deliberate.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRangePreset {
    Last7Days,
    Last30Days,
    Last90Days,
    All,
    Custom,
}

impl TimeRangePreset {
    /// Resolve against today's local calendar day.
    pub fn resolve(
        &self,
        custom_start: Option<NaiveDate>,
        custom_end: Option<NaiveDate>,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.resolve_on(Local::now().date_naive(), custom_start, custom_end)
    }

    /// Resolve against an explicit calendar day (deterministic for tests).
    ///
    /// Day presets span `[today - N days at 00:00:00, today at 23:59:59]`
    /// local time.
    pub fn resolve_on(
        &self,
        today: NaiveDate,
        custom_start: Option<NaiveDate>,
        custom_end: Option<NaiveDate>,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self {
            TimeRangePreset::All => None,
            TimeRangePreset::Last7Days => trailing_days(today, 7),
            TimeRangePreset::Last30Days => trailing_days(today, 30),
            TimeRangePreset::Last90Days => trailing_days(today, 90),
            TimeRangePreset::Custom => match (custom_start, custom_end) {
                (Some(start), Some(end)) => day_bounds(start, end),
                // Either bound missing: no range constraint at all.
                _ => None,
            },
        }
    }
}

fn trailing_days(today: NaiveDate, days: u64) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start_day = today.checked_sub_days(Days::new(days))?;
    day_bounds(start_day, today)
}

fn day_bounds(start_day: NaiveDate, end_day: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = start_day
        .and_hms_opt(0, 0, 0)?
        .and_local_timezone(Local)
        .earliest()?;
    let end = end_day
        .and_hms_opt(23, 59, 59)?
        .and_local_timezone(Local)
        .latest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AuditEventInput;
    use chrono::TimeDelta;
    use fleetdesk_core::AuditEventId;

    fn event_at(occurred_at: DateTime<Utc>, severity: Severity) -> AuditEvent {
        let input = AuditEventInput::new(
            AccountId::new(),
            "filter@fleetdesk.test",
            "Filter",
            ActionKind::View,
            EntityKind::Client,
            "Viewed client file",
            severity,
            occurred_at,
        );
        AuditEvent::new(AuditEventId::new(), occurred_at, input)
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = AuditFilter::new();
        assert!(filter.matches(&event_at(Utc::now(), Severity::Low)));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let now = Utc::now();
        let filter = AuditFilter::new().with_range(now, now - TimeDelta::hours(2));
        assert!(!filter.matches(&event_at(now, Severity::Low)));
        assert!(!filter.matches(&event_at(now - TimeDelta::hours(1), Severity::Low)));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let now = Utc::now();
        let filter = AuditFilter::new().with_range(now, now);
        assert!(filter.matches(&event_at(now, Severity::Low)));
    }

    #[test]
    fn severity_filter_is_exact() {
        let filter = AuditFilter::new().with_severity(Severity::Critical);
        assert!(filter.matches(&event_at(Utc::now(), Severity::Critical)));
        assert!(!filter.matches(&event_at(Utc::now(), Severity::High)));
    }

    #[test]
    fn without_term_preserves_structured_fields() {
        let filter = AuditFilter::new()
            .with_action(ActionKind::Delete)
            .with_term("truck");
        let stripped = filter.without_term();
        assert_eq!(stripped.action, Some(ActionKind::Delete));
        assert_eq!(stripped.term, None);
    }

    #[test]
    fn day_presets_span_midnight_to_end_of_day() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let (start, end) = TimeRangePreset::Last7Days
            .resolve_on(today, None, None)
            .unwrap();

        let start_local = start.with_timezone(&Local);
        let end_local = end.with_timezone(&Local);
        assert_eq!(start_local.date_naive(), today - Days::new(7));
        assert_eq!(start_local.format("%H:%M:%S").to_string(), "00:00:00");
        assert_eq!(end_local.date_naive(), today);
        assert_eq!(end_local.format("%H:%M:%S").to_string(), "23:59:59");
    }

    #[test]
    fn all_preset_has_no_bounds() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert!(TimeRangePreset::All.resolve_on(today, None, None).is_none());
    }

    #[test]
    fn custom_preset_requires_both_bounds() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        assert!(
            TimeRangePreset::Custom
                .resolve_on(today, Some(start), None)
                .is_none()
        );
        assert!(
            TimeRangePreset::Custom
                .resolve_on(today, None, Some(today))
                .is_none()
        );
        assert!(
            TimeRangePreset::Custom
                .resolve_on(today, Some(start), Some(today))
                .is_some()
        );
    }
}
