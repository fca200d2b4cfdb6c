//! In-memory resolver doubles for tests, previews and local development.
//!
//! Nothing in the decision path depends on this module; hosts inject these
//! wherever a real identity provider is not available.

use std::collections::HashMap;
use std::sync::Mutex;

use portal_core::ActorId;

use crate::resolvers::{OnboardingStatus, OnboardingStatusResolver, RoleResolver, SessionResolver};
use crate::{Actor, Keyed, Navigator, Readiness, Role, RoleSet};

/// Session double with a settable state.
#[derive(Debug)]
pub struct StaticSession {
    state: Mutex<Readiness<Option<Actor>>>,
}

impl StaticSession {
    pub fn anonymous() -> Self {
        Self {
            state: Mutex::new(Readiness::Ready(None)),
        }
    }

    pub fn signed_in(actor: Actor) -> Self {
        Self {
            state: Mutex::new(Readiness::Ready(Some(actor))),
        }
    }

    pub fn sign_in(&self, actor: Actor) {
        self.replace(Readiness::Ready(Some(actor)));
    }

    pub fn sign_out(&self) {
        self.replace(Readiness::Ready(None));
    }

    pub fn set_loading(&self) {
        self.replace(Readiness::Loading);
    }

    fn replace(&self, next: Readiness<Option<Actor>>) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }
}

impl SessionResolver for StaticSession {
    fn session(&self) -> Readiness<Option<Actor>> {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or(Readiness::Loading)
    }
}

/// Keyed resolver double: holds the latest response and the actor it was for.
#[derive(Debug)]
struct KeyedSlot<T> {
    state: Mutex<Readiness<Keyed<T>>>,
}

impl<T: Clone> KeyedSlot<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(Readiness::Unavailable),
        }
    }

    fn replace(&self, next: Readiness<Keyed<T>>) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }

    fn read(&self) -> Readiness<Keyed<T>> {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or(Readiness::Loading)
    }
}

/// Role lookup double. Returns whatever was last set, regardless of the
/// actor asked about, so stale responses can be simulated.
#[derive(Debug)]
pub struct StaticRoles(KeyedSlot<RoleSet>);

impl Default for StaticRoles {
    fn default() -> Self {
        Self(KeyedSlot::new())
    }
}

impl StaticRoles {
    pub fn set(&self, actor: ActorId, roles: RoleSet) {
        self.0.replace(Readiness::Ready(Keyed::new(actor, roles)));
    }

    pub fn set_loading(&self) {
        self.0.replace(Readiness::Loading);
    }

    pub fn clear(&self) {
        self.0.replace(Readiness::Unavailable);
    }
}

impl RoleResolver for StaticRoles {
    fn roles(&self, _actor: ActorId) -> Readiness<Keyed<RoleSet>> {
        self.0.read()
    }
}

/// Onboarding status double, same semantics as [`StaticRoles`].
#[derive(Debug)]
pub struct StaticOnboarding(KeyedSlot<OnboardingStatus>);

impl Default for StaticOnboarding {
    fn default() -> Self {
        Self(KeyedSlot::new())
    }
}

impl StaticOnboarding {
    pub fn set(&self, actor: ActorId, onboarding_completed: bool) {
        self.0.replace(Readiness::Ready(Keyed::new(
            actor,
            OnboardingStatus {
                onboarding_completed,
            },
        )));
    }

    pub fn set_loading(&self) {
        self.0.replace(Readiness::Loading);
    }

    pub fn clear(&self) {
        self.0.replace(Readiness::Unavailable);
    }
}

impl OnboardingStatusResolver for StaticOnboarding {
    fn onboarding_status(&self, _actor: ActorId) -> Readiness<Keyed<OnboardingStatus>> {
        self.0.read()
    }
}

/// Navigator double that records every navigation.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    path: Mutex<String>,
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            path: Mutex::new(path.into()),
            visits: Mutex::new(Vec::new()),
        }
    }

    pub fn set_path(&self, path: impl Into<String>) {
        if let Ok(mut current) = self.path.lock() {
            *current = path.into();
        }
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn navigate(&self, target: &str) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(target.to_string());
        }
    }
}

/// One demo account per role, switchable at runtime.
///
/// Serves as both session and role resolver so previews can flip between
/// personas without an identity provider.
#[derive(Debug)]
pub struct DemoDirectory {
    users: HashMap<Role, Actor>,
    active: Mutex<Option<Role>>,
}

impl Default for DemoDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoDirectory {
    pub fn new() -> Self {
        let users = Role::ALL
            .into_iter()
            .map(|role| {
                let actor = Actor::new(ActorId::new()).with_email(format!("{role}@demo.local"));
                (role, actor)
            })
            .collect();

        Self {
            users,
            active: Mutex::new(None),
        }
    }

    pub fn actor(&self, role: Role) -> Option<&Actor> {
        self.users.get(&role)
    }

    pub fn switch_to(&self, role: Role) {
        if let Ok(mut active) = self.active.lock() {
            tracing::debug!(%role, "switching demo user");
            *active = Some(role);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut active) = self.active.lock() {
            *active = None;
        }
    }

    fn role_of(&self, actor: ActorId) -> Option<Role> {
        self.users
            .iter()
            .find(|(_, user)| user.id == actor)
            .map(|(role, _)| *role)
    }
}

impl SessionResolver for DemoDirectory {
    fn session(&self) -> Readiness<Option<Actor>> {
        match self.active.lock() {
            Ok(active) => Readiness::Ready(active.and_then(|role| self.users.get(&role).cloned())),
            Err(_) => Readiness::Unavailable,
        }
    }
}

impl RoleResolver for DemoDirectory {
    fn roles(&self, actor: ActorId) -> Readiness<Keyed<RoleSet>> {
        self.role_of(actor)
            .map(|role| Keyed::new(actor, RoleSet::from([role])))
            .into()
    }
}
