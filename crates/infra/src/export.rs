//! Flat export rows for the filtered audit table.
//!
//! Field order and presence are a contract with downstream consumers of the
//! offline export — append new fields at the end, never reorder.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fleetdesk_audit::{ActionKind, AuditEvent, EntityKind, Severity};

/// One exported audit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub timestamp: DateTime<Utc>,
    pub actor_name: String,
    pub actor_email: String,
    pub action: ActionKind,
    pub entity_kind: EntityKind,
    pub description: String,
    pub severity: Severity,
    pub network_origin: Option<String>,
}

impl ExportRow {
    pub fn from_event(event: &AuditEvent) -> Self {
        Self {
            timestamp: event.occurred_at(),
            actor_name: event.actor_display_name().to_string(),
            actor_email: event.actor_email().to_string(),
            action: event.action(),
            entity_kind: event.entity(),
            description: event.description().to_string(),
            severity: event.severity(),
            network_origin: event.origin_ip().map(str::to_string),
        }
    }

    pub fn csv_header() -> &'static str {
        "timestamp,actor_name,actor_email,action,entity_kind,description,severity,network_origin"
    }

    pub fn to_csv_record(&self) -> String {
        [
            self.timestamp.to_rfc3339(),
            escape_csv(&self.actor_name),
            escape_csv(&self.actor_email),
            self.action.as_str().to_string(),
            self.entity_kind.as_str().to_string(),
            escape_csv(&self.description),
            self.severity.as_str().to_string(),
            escape_csv(self.network_origin.as_deref().unwrap_or("")),
        ]
        .join(",")
    }
}

/// Project a filtered result set into export rows, preserving order.
pub fn export_rows(events: &[AuditEvent]) -> Vec<ExportRow> {
    events.iter().map(ExportRow::from_event).collect()
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdesk_audit::AuditEventInput;
    use fleetdesk_core::{AccountId, AuditEventId};

    fn event(description: &str, origin: Option<&str>) -> AuditEvent {
        let occurred_at = Utc::now();
        let mut input = AuditEventInput::new(
            AccountId::new(),
            "export@fleetdesk.test",
            "Export",
            ActionKind::Delete,
            EntityKind::BankAccount,
            description,
            Severity::High,
            occurred_at,
        );
        if let Some(origin) = origin {
            input = input.with_origin(origin);
        }
        AuditEvent::new(AuditEventId::new(), occurred_at, input)
    }

    #[test]
    fn row_carries_the_contract_fields_in_order() {
        let e = event("Removed dormant account", Some("10.0.0.9"));
        let row = ExportRow::from_event(&e);

        let record = row.to_csv_record();
        let fields: Vec<&str> = record.split(',').collect();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[1], "Export");
        assert_eq!(fields[2], "export@fleetdesk.test");
        assert_eq!(fields[3], "delete");
        assert_eq!(fields[4], "bank_account");
        assert_eq!(fields[5], "Removed dormant account");
        assert_eq!(fields[6], "high");
        assert_eq!(fields[7], "10.0.0.9");
    }

    #[test]
    fn csv_fields_with_commas_and_quotes_are_escaped() {
        let e = event("Removed account \"Main\", permanently", None);
        let record = ExportRow::from_event(&e).to_csv_record();
        assert!(record.contains("\"Removed account \"\"Main\"\", permanently\""));
    }

    #[test]
    fn header_matches_the_record_field_count() {
        let header_fields = ExportRow::csv_header().split(',').count();
        let e = event("plain", None);
        let record_fields = ExportRow::from_event(&e).to_csv_record().split(',').count();
        assert_eq!(header_fields, record_fields);
    }
}
