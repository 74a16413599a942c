//! Account view consumed by the authorization layer.
//!
//! The identity store owns accounts; this crate only reads a snapshot of the
//! fields authorization needs. The grant set is treated as immutable for the
//! duration of one evaluation — it is never re-read mid-decision.

use serde::{Deserialize, Serialize};

use fleetdesk_core::AccountId;

use crate::catalogue::Permission;

/// Role marker on an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Ordinary account; access is governed by the grant set.
    #[default]
    Standard,
    /// Satisfies every permission check unconditionally.
    Superuser,
}

impl core::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AccountRole::Standard => write!(f, "standard"),
            AccountRole::Superuser => write!(f, "superuser"),
        }
    }
}

/// Snapshot of an authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub display_name: String,
    pub role: AccountRole,
    pub grants: Vec<Permission>,
}

impl Account {
    pub fn new(
        id: AccountId,
        email: impl Into<String>,
        display_name: impl Into<String>,
        role: AccountRole,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: display_name.into(),
            role,
            grants: Vec::new(),
        }
    }

    pub fn with_grants(mut self, grants: Vec<Permission>) -> Self {
        self.grants = grants;
        self
    }

    pub fn is_superuser(&self) -> bool {
        self.role == AccountRole::Superuser
    }
}
