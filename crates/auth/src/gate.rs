//! Access gate.
//!
//! The decision point between a resource's declared requirement and the
//! current authentication state. The gate never throws and never exposes
//! internal reasons to the caller beyond the outcome: the integrating
//! application routes denials to its fixed "forbidden" surface and records
//! the structured [`AccessDenial`] through the audit trail.

use serde::Serialize;

use crate::account::{Account, AccountRole};
use crate::catalogue::{Catalogue, Permission};
use crate::evaluate::PermissionEvaluator;

/// Requirement declared on a guarded resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRequirement {
    /// Open to any authenticated account.
    None,
    /// Requires a specific catalogue permission.
    Permission(Permission),
    /// Requires the superuser role, irrespective of grants.
    Superuser,
}

/// Authentication state as seen by the gate.
///
/// `Pending` models the window in which the session check has not resolved
/// yet; the caller must suspend presenting the resource until it has.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Pending,
    Unauthenticated,
    Authenticated(Account),
}

impl AuthState {
    pub fn account(&self) -> Option<&Account> {
        match self {
            AuthState::Authenticated(account) => Some(account),
            _ => None,
        }
    }
}

/// Outcome of a gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateOutcome {
    /// Authentication unresolved; suspend, do not present the resource.
    Pending,
    Allow,
    DenyUnauthenticated,
    DenyForbidden,
}

impl GateOutcome {
    pub fn is_denial(&self) -> bool {
        matches!(self, GateOutcome::DenyUnauthenticated | GateOutcome::DenyForbidden)
    }
}

/// Structured description of a denial, handed to the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessDenial {
    /// The guarded resource that was requested (route name, page id).
    pub resource: String,
    pub requirement: AccessRequirement,
    pub outcome: GateOutcome,
    /// Actor snapshot at decision time; `None` for unauthenticated denials.
    pub account: Option<Account>,
}

/// A gate decision: the outcome plus, for denials, the audit hook payload.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDecision {
    pub outcome: GateOutcome,
    pub denial: Option<AccessDenial>,
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        self.outcome == GateOutcome::Allow
    }

    fn passed(outcome: GateOutcome) -> Self {
        Self { outcome, denial: None }
    }

    fn denied(
        outcome: GateOutcome,
        resource: &str,
        requirement: &AccessRequirement,
        account: Option<&Account>,
    ) -> Self {
        Self {
            outcome,
            denial: Some(AccessDenial {
                resource: resource.to_string(),
                requirement: requirement.clone(),
                outcome,
                account: account.cloned(),
            }),
        }
    }
}

/// Maps `(auth state, requirement)` to an outcome via the evaluator.
#[derive(Debug, Clone, Copy)]
pub struct AccessGate<'a> {
    evaluator: PermissionEvaluator<'a>,
}

impl<'a> AccessGate<'a> {
    pub fn new(catalogue: &'a Catalogue) -> Self {
        Self {
            evaluator: PermissionEvaluator::new(catalogue),
        }
    }

    pub fn decide(
        &self,
        state: &AuthState,
        requirement: &AccessRequirement,
        resource: &str,
    ) -> GateDecision {
        let account = match state {
            AuthState::Pending => return GateDecision::passed(GateOutcome::Pending),
            AuthState::Unauthenticated => {
                return GateDecision::denied(
                    GateOutcome::DenyUnauthenticated,
                    resource,
                    requirement,
                    None,
                );
            }
            AuthState::Authenticated(account) => account,
        };

        let allowed = match requirement {
            AccessRequirement::Superuser => account.role == AccountRole::Superuser,
            AccessRequirement::Permission(p) => {
                self.evaluator.has_permission(Some(account), Some(p))
            }
            AccessRequirement::None => self.evaluator.has_permission(Some(account), None),
        };

        if allowed {
            GateDecision::passed(GateOutcome::Allow)
        } else {
            GateDecision::denied(
                GateOutcome::DenyForbidden,
                resource,
                requirement,
                Some(account),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdesk_core::AccountId;

    fn account(role: AccountRole, tokens: &[&str]) -> Account {
        let catalogue = Catalogue::new();
        let grants = tokens
            .iter()
            .map(|t| catalogue.resolve(t).unwrap())
            .collect();
        Account::new(AccountId::new(), "gate@fleetdesk.test", "Gate", role).with_grants(grants)
    }

    #[test]
    fn pending_auth_suspends_the_decision() {
        let catalogue = Catalogue::new();
        let gate = AccessGate::new(&catalogue);
        let decision = gate.decide(&AuthState::Pending, &AccessRequirement::None, "dashboard");
        assert_eq!(decision.outcome, GateOutcome::Pending);
        assert!(decision.denial.is_none());
    }

    #[test]
    fn unauthenticated_is_denied_with_a_hook_payload() {
        let catalogue = Catalogue::new();
        let gate = AccessGate::new(&catalogue);
        let requirement = AccessRequirement::Permission(catalogue.resolve("reports").unwrap());

        let decision = gate.decide(&AuthState::Unauthenticated, &requirement, "reports");

        assert_eq!(decision.outcome, GateOutcome::DenyUnauthenticated);
        let denial = decision.denial.unwrap();
        assert_eq!(denial.resource, "reports");
        assert!(denial.account.is_none());
    }

    #[test]
    fn superuser_requirement_rejects_standard_roles() {
        let catalogue = Catalogue::new();
        let gate = AccessGate::new(&catalogue);
        let state = AuthState::Authenticated(account(AccountRole::Standard, &["users"]));

        let decision = gate.decide(&state, &AccessRequirement::Superuser, "settings");

        assert_eq!(decision.outcome, GateOutcome::DenyForbidden);
        assert!(decision.denial.unwrap().account.is_some());
    }

    #[test]
    fn superuser_requirement_admits_superusers() {
        let catalogue = Catalogue::new();
        let gate = AccessGate::new(&catalogue);
        let state = AuthState::Authenticated(account(AccountRole::Superuser, &[]));

        let decision = gate.decide(&state, &AccessRequirement::Superuser, "settings");
        assert!(decision.is_allowed());
    }

    #[test]
    fn permission_requirement_follows_the_grant_set() {
        let catalogue = Catalogue::new();
        let gate = AccessGate::new(&catalogue);
        let state = AuthState::Authenticated(account(AccountRole::Standard, &["vehicles"]));

        let allowed = gate.decide(
            &state,
            &AccessRequirement::Permission(catalogue.resolve("vehicles").unwrap()),
            "vehicles",
        );
        assert!(allowed.is_allowed());

        let denied = gate.decide(
            &state,
            &AccessRequirement::Permission(catalogue.resolve("financing").unwrap()),
            "financing",
        );
        assert_eq!(denied.outcome, GateOutcome::DenyForbidden);
    }

    #[test]
    fn open_resources_admit_any_authenticated_account() {
        let catalogue = Catalogue::new();
        let gate = AccessGate::new(&catalogue);
        let state = AuthState::Authenticated(account(AccountRole::Standard, &[]));

        let decision = gate.decide(&state, &AccessRequirement::None, "home");
        assert!(decision.is_allowed());
    }
}
