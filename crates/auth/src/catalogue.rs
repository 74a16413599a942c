//! Permission catalogue.
//!
//! The catalogue is the single source of truth for permission tokens: any
//! identifier not present here is invalid and is rejected wherever external
//! input is turned into a [`Permission`]. The set is versioned by release —
//! adding a token is backward compatible, renaming or removing one breaks
//! every persisted grant set or template that references it.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use fleetdesk_core::{DomainError, DomainResult};

/// Permission identifier.
///
/// Permissions are modeled as opaque string tokens (stable, lowercase,
/// hyphenated — e.g. `"service-pricing"`), each guarding one application
/// area. Tokens are declared in the [`Catalogue`]; arbitrary strings from
/// external sources must go through [`Catalogue::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(token: impl Into<Cow<'static, str>>) -> Self {
        Self(token.into())
    }

    const fn from_static(token: &'static str) -> Self {
        Self(Cow::Borrowed(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named category of permissions.
///
/// Every catalogue permission belongs to exactly one group. The permission
/// order within a group is display order only; evaluation is pure set logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionGroup {
    pub id: Cow<'static, str>,
    pub label: Cow<'static, str>,
    pub permissions: Vec<Permission>,
}

impl PermissionGroup {
    fn from_static(id: &'static str, label: &'static str, tokens: &[&'static str]) -> Self {
        Self {
            id: Cow::Borrowed(id),
            label: Cow::Borrowed(label),
            permissions: tokens.iter().map(|t| Permission::from_static(t)).collect(),
        }
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Immutable registry of every permission the application knows about.
///
/// Constructed once at process start and passed by reference to the
/// evaluator, the template registry and the access gate. Never mutated.
#[derive(Debug, Clone)]
pub struct Catalogue {
    groups: Vec<PermissionGroup>,
    all: Vec<Permission>,
}

impl Catalogue {
    pub fn new() -> Self {
        let groups = vec![
            PermissionGroup::from_static(
                "overview",
                "Overview",
                &["dashboard", "reports", "management"],
            ),
            PermissionGroup::from_static(
                "operations",
                "Operations",
                &["clients", "employees", "services", "vehicles", "subcontractors"],
            ),
            PermissionGroup::from_static(
                "finance",
                "Finance",
                &[
                    "contract-services",
                    "financing",
                    "bank-accounts",
                    "credit-cards",
                    "expense-types",
                    "service-pricing",
                ],
            ),
            PermissionGroup::from_static(
                "administration",
                "Administration",
                &["users", "permissions", "audit-log", "data-export"],
            ),
        ];

        let all = groups
            .iter()
            .flat_map(|g| g.permissions.iter().cloned())
            .collect();

        Self { groups, all }
    }

    /// Every permission, in declaration order. Deterministic across calls.
    pub fn all(&self) -> &[Permission] {
        &self.all
    }

    /// Every group, in declaration order.
    pub fn groups(&self) -> &[PermissionGroup] {
        &self.groups
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.all.iter().any(|p| p == permission)
    }

    /// Turn an external token into a catalogue permission.
    ///
    /// This is the only sanctioned way to build a [`Permission`] from
    /// untrusted input (account profiles, request payloads). Tokens outside
    /// the catalogue are rejected.
    pub fn resolve(&self, token: &str) -> DomainResult<Permission> {
        self.all
            .iter()
            .find(|p| p.as_str() == token)
            .cloned()
            .ok_or_else(|| DomainError::validation(format!("unknown permission: {token}")))
    }

    pub fn group_by_id(&self, id: &str) -> Option<&PermissionGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Group a permission belongs to (exactly one, per catalogue invariant).
    pub fn group_of(&self, permission: &Permission) -> Option<&PermissionGroup> {
        self.groups.iter().find(|g| g.contains(permission))
    }

    /// "Select all in group" toggle over a working selection.
    ///
    /// If every permission of the group is already selected, exactly those
    /// are removed; otherwise the missing ones are added. Selections outside
    /// the group are untouched either way. Unknown group ids are a no-op.
    pub fn toggle_group(&self, selected: &mut Vec<Permission>, group_id: &str) {
        let Some(group) = self.group_by_id(group_id) else {
            return;
        };

        let fully_selected = group
            .permissions
            .iter()
            .all(|p| selected.iter().any(|s| s == p));

        if fully_selected {
            selected.retain(|s| !group.contains(s));
        } else {
            for p in &group.permissions {
                if !selected.iter().any(|s| s == p) {
                    selected.push(p.clone());
                }
            }
        }
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::new()
    }
}
