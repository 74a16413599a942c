//! `fleetdesk-auth` — pure authorization boundary.
//!
//! This crate owns the closed permission catalogue, the template registry
//! used to seed new accounts, the evaluation rules over an account's grant
//! set, and the access gate that turns a resource requirement into an
//! allow/deny outcome. It is intentionally decoupled from HTTP, session
//! handling and storage: the only inputs are an `Account` snapshot supplied
//! by the identity layer and the requirement declared on a resource.

pub mod account;
pub mod catalogue;
pub mod evaluate;
pub mod gate;
pub mod templates;

pub use account::{Account, AccountRole};
pub use catalogue::{Catalogue, Permission, PermissionGroup};
pub use evaluate::PermissionEvaluator;
pub use gate::{AccessDenial, AccessGate, AccessRequirement, AuthState, GateDecision, GateOutcome};
pub use templates::{PermissionTemplate, TemplateRegistry};
