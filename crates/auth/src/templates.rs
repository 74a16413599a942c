//! Permission templates.
//!
//! Templates are named, predefined permission bundles used by account
//! provisioning to seed a new account's grant set. They are defined
//! statically and read-only at runtime; the registry never mutates or
//! deletes them.

use std::borrow::Cow;

use serde::Serialize;

use crate::catalogue::Permission;

/// A named permission bundle.
///
/// The administrator template deliberately carries an **empty** permission
/// set: its whole effect is delegated to the superuser role flag set by the
/// provisioning workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionTemplate {
    pub id: Cow<'static, str>,
    pub display_name: Cow<'static, str>,
    pub description: Cow<'static, str>,
    pub permissions: Vec<Permission>,
}

impl PermissionTemplate {
    fn from_static(
        id: &'static str,
        display_name: &'static str,
        description: &'static str,
        tokens: &[&'static str],
    ) -> Self {
        Self {
            id: Cow::Borrowed(id),
            display_name: Cow::Borrowed(display_name),
            description: Cow::Borrowed(description),
            permissions: tokens.iter().map(|t| Permission::new(*t)).collect(),
        }
    }
}

/// Read-only registry of the built-in templates, in declaration order.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<PermissionTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        let templates = vec![
            PermissionTemplate::from_static(
                "administrator",
                "Administrator",
                "Full access through the superuser role; carries no explicit grants.",
                &[],
            ),
            PermissionTemplate::from_static(
                "operations-manager",
                "Operations manager",
                "Overview pages plus day-to-day fleet and staff management.",
                &[
                    "dashboard",
                    "reports",
                    "management",
                    "clients",
                    "employees",
                    "services",
                    "vehicles",
                    "subcontractors",
                ],
            ),
            PermissionTemplate::from_static(
                "accountant",
                "Accountant",
                "Financial records, pricing and reporting.",
                &[
                    "dashboard",
                    "reports",
                    "contract-services",
                    "financing",
                    "bank-accounts",
                    "credit-cards",
                    "expense-types",
                    "service-pricing",
                ],
            ),
            PermissionTemplate::from_static(
                "dispatcher",
                "Dispatcher",
                "Operational scheduling across clients, services and vehicles.",
                &["dashboard", "clients", "services", "vehicles", "subcontractors"],
            ),
            PermissionTemplate::from_static(
                "viewer",
                "Viewer",
                "Dashboard access only.",
                &["dashboard"],
            ),
        ];

        Self { templates }
    }

    /// Exact-match lookup. `None` is a normal, recoverable outcome — the
    /// caller decides the fallback.
    pub fn template_by_id(&self, id: &str) -> Option<&PermissionTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Permission set for a template id.
    ///
    /// Returns an empty set both for an unknown id and for the administrator
    /// template (whose defined set is intentionally empty). Callers that must
    /// tell those cases apart check [`Self::template_by_id`] first.
    pub fn permissions_for_template(&self, id: &str) -> Vec<Permission> {
        self.template_by_id(id)
            .map(|t| t.permissions.clone())
            .unwrap_or_default()
    }

    /// `(id, display_name)` pairs for presentation, in declaration order.
    pub fn template_options(&self) -> Vec<(&str, &str)> {
        self.templates
            .iter()
            .map(|t| (t.id.as_ref(), t.display_name.as_ref()))
            .collect()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Catalogue;

    #[test]
    fn every_template_permission_is_in_the_catalogue() {
        let catalogue = Catalogue::new();
        let registry = TemplateRegistry::new();
        for (id, _) in registry.template_options() {
            for permission in registry.permissions_for_template(id) {
                assert!(
                    catalogue.contains(&permission),
                    "template {id} references unknown permission {permission}"
                );
            }
        }
    }

    #[test]
    fn administrator_template_is_empty() {
        let registry = TemplateRegistry::new();
        let template = registry.template_by_id("administrator").unwrap();
        assert!(template.permissions.is_empty());
    }

    #[test]
    fn unknown_template_and_administrator_are_observationally_identical() {
        let registry = TemplateRegistry::new();
        assert_eq!(
            registry.permissions_for_template("administrator"),
            registry.permissions_for_template("no-such-template"),
        );
        // The existence check is what tells them apart.
        assert!(registry.template_by_id("administrator").is_some());
        assert!(registry.template_by_id("no-such-template").is_none());
    }

    #[test]
    fn template_options_follow_declaration_order() {
        let registry = TemplateRegistry::new();
        let ids: Vec<&str> = registry.template_options().iter().map(|(id, _)| *id).collect();
        assert_eq!(
            ids,
            vec!["administrator", "operations-manager", "accountant", "dispatcher", "viewer"]
        );
    }
}
