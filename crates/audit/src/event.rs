//! Audit event model.
//!
//! Events are:
//! - **immutable** (treat them as facts)
//! - **append-only** (never updated or deleted by this core)
//! - stamped twice: `occurred_at` is business time supplied by the emitter,
//!   `recorded_at` is ingestion time assigned by the store, and
//!   `occurred_at <= recorded_at` always holds for a stored event.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleetdesk_core::{AccountId, AuditEventId};

/// Kind of action an audit event records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Create,
    Update,
    Delete,
    Login,
    Logout,
    PermissionChange,
    AccessDenied,
    Export,
    View,
    Other,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
            ActionKind::Login => "login",
            ActionKind::Logout => "logout",
            ActionKind::PermissionChange => "permission_change",
            ActionKind::AccessDenied => "access_denied",
            ActionKind::Export => "export",
            ActionKind::View => "view",
            ActionKind::Other => "other",
        }
    }
}

impl core::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of entity an audit event concerns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Client,
    Employee,
    Service,
    Vehicle,
    Subcontractor,
    ContractService,
    Financing,
    BankAccount,
    CreditCard,
    ExpenseType,
    ServicePricing,
    System,
    Permission,
    Other,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Client => "client",
            EntityKind::Employee => "employee",
            EntityKind::Service => "service",
            EntityKind::Vehicle => "vehicle",
            EntityKind::Subcontractor => "subcontractor",
            EntityKind::ContractService => "contract_service",
            EntityKind::Financing => "financing",
            EntityKind::BankAccount => "bank_account",
            EntityKind::CreditCard => "credit_card",
            EntityKind::ExpenseType => "expense_type",
            EntityKind::ServicePricing => "service_pricing",
            EntityKind::System => "system",
            EntityKind::Permission => "permission",
            EntityKind::Other => "other",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency classification, ordered ascending.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl core::fmt::Display for Severity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metadata value: scalar or nested mapping, nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Map(BTreeMap<String, MetadataValue>),
}

/// Event metadata: string keys to constrained values.
pub type Metadata = BTreeMap<String, MetadataValue>;

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// An audit event as emitted, before the store assigns id and ingestion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEventInput {
    pub actor_id: AccountId,
    pub actor_email: String,
    pub actor_display_name: String,
    pub action: ActionKind,
    pub entity: EntityKind,
    pub entity_id: Option<String>,
    pub entity_name: Option<String>,
    pub description: String,
    pub severity: Severity,
    pub origin_ip: Option<String>,
    pub client_agent: Option<String>,
    pub metadata: Metadata,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEventInput {
    pub fn new(
        actor_id: AccountId,
        actor_email: impl Into<String>,
        actor_display_name: impl Into<String>,
        action: ActionKind,
        entity: EntityKind,
        description: impl Into<String>,
        severity: Severity,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            actor_id,
            actor_email: actor_email.into(),
            actor_display_name: actor_display_name.into(),
            action,
            entity,
            entity_id: None,
            entity_name: None,
            description: description.into(),
            severity,
            origin_ip: None,
            client_agent: None,
            metadata: Metadata::new(),
            occurred_at,
        }
    }

    pub fn with_entity_ref(
        mut self,
        entity_id: impl Into<String>,
        entity_name: impl Into<String>,
    ) -> Self {
        self.entity_id = Some(entity_id.into());
        self.entity_name = Some(entity_name.into());
        self
    }

    pub fn with_origin(mut self, ip: impl Into<String>) -> Self {
        self.origin_ip = Some(ip.into());
        self
    }

    pub fn with_client_agent(mut self, agent: impl Into<String>) -> Self {
        self.client_agent = Some(agent.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A stored audit event.
///
/// `id` and `recorded_at` are assigned exactly once by the store adapter;
/// the rest is the emitter's input, unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    id: AuditEventId,
    recorded_at: DateTime<Utc>,

    #[serde(flatten)]
    input: AuditEventInput,
}

impl AuditEvent {
    /// Used by store adapters after assigning id and ingestion time.
    pub fn new(id: AuditEventId, recorded_at: DateTime<Utc>, input: AuditEventInput) -> Self {
        Self {
            id,
            recorded_at,
            input,
        }
    }

    pub fn id(&self) -> AuditEventId {
        self.id
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.input.occurred_at
    }

    pub fn actor_id(&self) -> AccountId {
        self.input.actor_id
    }

    pub fn actor_email(&self) -> &str {
        &self.input.actor_email
    }

    pub fn actor_display_name(&self) -> &str {
        &self.input.actor_display_name
    }

    pub fn action(&self) -> ActionKind {
        self.input.action
    }

    pub fn entity(&self) -> EntityKind {
        self.input.entity
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.input.entity_id.as_deref()
    }

    pub fn entity_name(&self) -> Option<&str> {
        self.input.entity_name.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.input.description
    }

    pub fn severity(&self) -> Severity {
        self.input.severity
    }

    pub fn origin_ip(&self) -> Option<&str> {
        self.input.origin_ip.as_deref()
    }

    pub fn client_agent(&self) -> Option<&str> {
        self.input.client_agent.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.input.metadata
    }
}
