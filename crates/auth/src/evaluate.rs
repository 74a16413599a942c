//! Authorization evaluation rules.
//!
//! Pure decision functions over `(account, requirement)`:
//!
//! - No IO
//! - No panics
//! - No failure mode — missing or invalid input degrades to the most
//!   restrictive truthful answer, never an error
//!
//! The precedence encoded here is a business rule, not an accident of
//! control flow: the superuser short-circuit comes before any grant-set
//! lookup, and "no requirement" (always allowed) is distinct from "empty
//! requirement list" (nothing can satisfy `any`, everything satisfies
//! `all`).

use std::collections::HashSet;

use crate::account::{Account, AccountRole};
use crate::catalogue::{Catalogue, Permission};

/// Decision functions over an account's grant set.
///
/// Borrows the process-wide [`Catalogue`]: grant and requirement tokens that
/// are not catalogue members are invalid and never satisfy a check.
#[derive(Debug, Clone, Copy)]
pub struct PermissionEvaluator<'a> {
    catalogue: &'a Catalogue,
}

impl<'a> PermissionEvaluator<'a> {
    pub fn new(catalogue: &'a Catalogue) -> Self {
        Self { catalogue }
    }

    /// Does the account satisfy a single (optional) requirement?
    ///
    /// `None` requirement means "no requirement" and is always allowed for an
    /// authenticated account. An unauthenticated caller is denied regardless
    /// of the requirement.
    pub fn has_permission(
        &self,
        account: Option<&Account>,
        required: Option<&Permission>,
    ) -> bool {
        let Some(account) = account else {
            return false;
        };
        if account.role == AccountRole::Superuser {
            return true;
        }
        let Some(required) = required else {
            return true;
        };
        self.catalogue.contains(required) && account.grants.iter().any(|p| p == required)
    }

    /// Does the account hold at least one of `required`?
    ///
    /// An empty `required` list is `false` for non-superusers: no permission
    /// can be satisfied by nothing. This deliberately differs from
    /// [`Self::has_permission`] with an absent requirement.
    pub fn has_any_permission(&self, account: Option<&Account>, required: &[Permission]) -> bool {
        let Some(account) = account else {
            return false;
        };
        if account.role == AccountRole::Superuser {
            return true;
        }
        let grants = self.grant_set(account);
        required
            .iter()
            .any(|p| self.catalogue.contains(p) && grants.contains(p.as_str()))
    }

    /// Does the account hold every permission in `required`?
    ///
    /// An empty `required` list is vacuously `true` — but only for an
    /// authenticated account; the absent-account rule takes precedence.
    pub fn has_all_permissions(&self, account: Option<&Account>, required: &[Permission]) -> bool {
        let Some(account) = account else {
            return false;
        };
        if account.role == AccountRole::Superuser {
            return true;
        }
        let grants = self.grant_set(account);
        required
            .iter()
            .all(|p| self.catalogue.contains(p) && grants.contains(p.as_str()))
    }

    /// The effective grant set.
    ///
    /// Empty for an unauthenticated caller; the full catalogue (declaration
    /// order) for a superuser; otherwise the account's grants restricted to
    /// catalogue members.
    pub fn granted_permissions(&self, account: Option<&Account>) -> Vec<Permission> {
        let Some(account) = account else {
            return Vec::new();
        };
        if account.role == AccountRole::Superuser {
            return self.catalogue.all().to_vec();
        }
        account
            .grants
            .iter()
            .filter(|p| self.catalogue.contains(p))
            .cloned()
            .collect()
    }

    fn grant_set<'b>(&self, account: &'b Account) -> HashSet<&'b str> {
        account.grants.iter().map(|p| p.as_str()).collect()
    }
}
