use serde::{Deserialize, Serialize};

use crate::Role;

/// Declarative access requirement attached to a protected route.
///
/// Unset fields impose nothing. `required_roles` uses OR semantics: the actor
/// must hold at least one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteAccessRequirement {
    pub require_admin: bool,
    pub require_staff: bool,
    pub required_roles: Vec<Role>,
}

impl RouteAccessRequirement {
    /// Authentication only.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn admin() -> Self {
        Self {
            require_admin: true,
            ..Self::default()
        }
    }

    pub fn staff() -> Self {
        Self {
            require_staff: true,
            ..Self::default()
        }
    }

    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            required_roles: roles.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// How a route is guarded, fixed when the route table is composed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "guard", content = "requirement", rename_all = "snake_case")]
pub enum RouteGuard {
    /// Rendered for everyone, including anonymous visitors.
    Public,
    /// Full gate: authentication, role requirements, onboarding.
    Protected(RouteAccessRequirement),
    /// Onboarding gating only, without broader access control.
    ClientOnboarding,
}
