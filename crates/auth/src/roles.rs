use core::str::FromStr;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use portal_core::DomainError;

/// Role tag held by an actor.
///
/// The set is closed: every role row stored by the backend maps to one of
/// these variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Press,
    Research,
    Paper,
    Admin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Client,
        Role::Press,
        Role::Research,
        Role::Paper,
        Role::Admin,
    ];

    /// Staff precedence, highest first.
    const STAFF: [Role; 4] = [Role::Admin, Role::Press, Role::Research, Role::Paper];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Press => "press",
            Role::Research => "research",
            Role::Paper => "paper",
            Role::Admin => "admin",
        }
    }

    pub fn is_staff(&self) -> bool {
        Self::STAFF.contains(self)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown role '{s}'")))
    }
}

/// The roles an actor holds, one entry per role row.
///
/// Most flows assume a single primary role, but nothing here depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: Role) -> bool {
        self.0.insert(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// OR semantics: true when at least one of `roles` is held.
    pub fn has_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has_role(*r))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn is_staff(&self) -> bool {
        self.0.iter().any(Role::is_staff)
    }

    pub fn is_client(&self) -> bool {
        self.has_role(Role::Client)
    }

    /// The role used to label the actor: the highest staff role, else client.
    pub fn primary_role(&self) -> Option<Role> {
        Role::STAFF
            .into_iter()
            .find(|r| self.has_role(*r))
            .or_else(|| self.is_client().then_some(Role::Client))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Role; N]> for RoleSet {
    fn from(roles: [Role; N]) -> Self {
        roles.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_predicate_covers_every_non_client_role() {
        for role in Role::ALL {
            assert_eq!(role.is_staff(), role != Role::Client, "{role}");
        }
    }

    #[test]
    fn role_tags_round_trip_through_from_str() {
        assert_eq!("research".parse::<Role>().unwrap(), Role::Research);
        assert!(matches!(
            "owner".parse::<Role>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn role_serializes_as_lowercase_tag() {
        let json = serde_json::to_string(&RoleSet::from([Role::Paper, Role::Client])).unwrap();
        assert_eq!(json, r#"["client","paper"]"#);
    }

    #[test]
    fn client_with_staff_row_is_staff() {
        let roles = RoleSet::from([Role::Client, Role::Press]);
        assert!(roles.is_client());
        assert!(roles.is_staff());
        assert!(!roles.is_admin());
        assert_eq!(roles.primary_role(), Some(Role::Press));
    }

    #[test]
    fn has_any_is_false_for_empty_requirement() {
        let roles = RoleSet::from([Role::Admin]);
        assert!(!roles.has_any(&[]));
        assert!(roles.has_any(&[Role::Paper, Role::Admin]));
    }

    #[test]
    fn empty_set_has_no_primary_role() {
        assert_eq!(RoleSet::new().primary_role(), None);
        assert_eq!(RoleSet::from([Role::Client]).primary_role(), Some(Role::Client));
    }
}
