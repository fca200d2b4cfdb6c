//! Route access decisions.
//!
//! Pure functions over one snapshot of resolver state:
//! - No IO
//! - No panics
//! - Same snapshot, requirement and path always yield the same decision

use serde::Serialize;

use crate::resolvers::OnboardingStatus;
use crate::{Actor, Keyed, Readiness, RoleSet, RouteAccessRequirement, RouteGuard, RoutePaths};

/// Outcome of evaluating a guarded route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Inputs are still resolving. Render a loading indicator, do not navigate.
    Pending,
    /// Navigate away to the given path.
    Redirect(String),
    /// Render the route.
    Allow,
}

/// Latest output of all three resolvers, captured together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessSnapshot {
    pub session: Readiness<Option<Actor>>,
    pub roles: Readiness<Keyed<RoleSet>>,
    pub onboarding: Readiness<Keyed<OnboardingStatus>>,
}

impl AccessSnapshot {
    /// Nobody is signed in.
    pub fn anonymous() -> Self {
        Self {
            session: Readiness::Ready(None),
            roles: Readiness::Unavailable,
            onboarding: Readiness::Unavailable,
        }
    }

    /// Fully resolved snapshot for `actor`.
    pub fn resolved(actor: Actor, roles: RoleSet, onboarding_completed: Option<bool>) -> Self {
        let id = actor.id;
        Self {
            session: Readiness::Ready(Some(actor)),
            roles: Readiness::Ready(Keyed::new(id, roles)),
            onboarding: onboarding_completed
                .map(|onboarding_completed| Keyed::new(id, OnboardingStatus { onboarding_completed }))
                .into(),
        }
    }
}

/// An authenticated actor with every input settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedActor {
    pub actor: Actor,
    pub roles: RoleSet,
    /// `None` when the onboarding resolver settled without data.
    pub onboarding_completed: Option<bool>,
}

/// The snapshot reduced to what the decision table needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Pending,
    Anonymous,
    Actor(ResolvedActor),
}

/// Fold the three readiness values into one state.
///
/// Any resolver still loading, or answering for a previous actor, keeps the
/// whole snapshot pending. A role lookup without data reads as no roles; an
/// onboarding lookup without data reads as "unknown", which never redirects.
pub fn settle(snapshot: &AccessSnapshot) -> Settled {
    let actor = match &snapshot.session {
        Readiness::Loading => return Settled::Pending,
        Readiness::Ready(None) | Readiness::Unavailable => return Settled::Anonymous,
        Readiness::Ready(Some(actor)) => actor,
    };

    let roles = snapshot.roles.clone().for_actor(actor.id);
    let onboarding = snapshot.onboarding.clone().for_actor(actor.id);
    if roles.is_loading() || onboarding.is_loading() {
        return Settled::Pending;
    }

    Settled::Actor(ResolvedActor {
        actor: actor.clone(),
        roles: roles.ready().unwrap_or_default(),
        onboarding_completed: onboarding.ready().map(|s| s.onboarding_completed),
    })
}

/// Which row of the decision table produced a decision.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    Pending,
    Unauthenticated,
    AdminRequired,
    StaffRequired,
    RoleRequired,
    OnboardingIncomplete,
    Allowed,
}

impl DecisionRule {
    pub fn decision(self, paths: &RoutePaths) -> AccessDecision {
        match self {
            DecisionRule::Pending => AccessDecision::Pending,
            DecisionRule::Unauthenticated => AccessDecision::Redirect(paths.auth.clone()),
            DecisionRule::AdminRequired
            | DecisionRule::StaffRequired
            | DecisionRule::RoleRequired => AccessDecision::Redirect(paths.dashboard.clone()),
            DecisionRule::OnboardingIncomplete => {
                AccessDecision::Redirect(paths.onboarding.clone())
            }
            DecisionRule::Allowed => AccessDecision::Allow,
        }
    }
}

/// Clients who are not staff and explicitly have not finished onboarding are
/// held to the onboarding flow, except while already inside it.
fn must_onboard(resolved: &ResolvedActor, current_path: &str, paths: &RoutePaths) -> bool {
    resolved.roles.is_client()
        && !resolved.roles.is_staff()
        && !paths.is_onboarding_path(current_path)
        && resolved.onboarding_completed == Some(false)
}

/// Evaluate the full route gate. Checks short-circuit in table order.
pub fn evaluate(
    settled: &Settled,
    requirement: &RouteAccessRequirement,
    current_path: &str,
    paths: &RoutePaths,
) -> DecisionRule {
    let resolved = match settled {
        Settled::Pending => return DecisionRule::Pending,
        Settled::Anonymous => return DecisionRule::Unauthenticated,
        Settled::Actor(resolved) => resolved,
    };
    let roles = &resolved.roles;

    if requirement.require_admin && !roles.is_admin() {
        DecisionRule::AdminRequired
    } else if requirement.require_staff && !roles.is_staff() {
        DecisionRule::StaffRequired
    } else if !requirement.required_roles.is_empty() && !roles.has_any(&requirement.required_roles)
    {
        DecisionRule::RoleRequired
    } else if must_onboard(resolved, current_path, paths) {
        DecisionRule::OnboardingIncomplete
    } else {
        DecisionRule::Allowed
    }
}

/// Evaluate onboarding gating alone.
///
/// Authentication is not this guard's concern: an anonymous visitor passes.
pub fn evaluate_client_onboarding(
    settled: &Settled,
    current_path: &str,
    paths: &RoutePaths,
) -> DecisionRule {
    match settled {
        Settled::Pending => DecisionRule::Pending,
        Settled::Anonymous => DecisionRule::Allowed,
        Settled::Actor(resolved) if must_onboard(resolved, current_path, paths) => {
            DecisionRule::OnboardingIncomplete
        }
        Settled::Actor(_) => DecisionRule::Allowed,
    }
}

/// Evaluate whichever guard a route carries. Public routes never wait.
pub fn evaluate_route(
    settled: &Settled,
    guard: &RouteGuard,
    current_path: &str,
    paths: &RoutePaths,
) -> DecisionRule {
    match guard {
        RouteGuard::Public => DecisionRule::Allowed,
        RouteGuard::Protected(requirement) => evaluate(settled, requirement, current_path, paths),
        RouteGuard::ClientOnboarding => evaluate_client_onboarding(settled, current_path, paths),
    }
}

/// Decide access to a protected route.
pub fn decide(
    snapshot: &AccessSnapshot,
    requirement: &RouteAccessRequirement,
    current_path: &str,
    paths: &RoutePaths,
) -> AccessDecision {
    evaluate(&settle(snapshot), requirement, current_path, paths).decision(paths)
}

/// Decide access for a route guarded by onboarding only.
pub fn decide_client_onboarding(
    snapshot: &AccessSnapshot,
    current_path: &str,
    paths: &RoutePaths,
) -> AccessDecision {
    evaluate_client_onboarding(&settle(snapshot), current_path, paths).decision(paths)
}

/// Decide access for a route with any guard kind.
pub fn decide_for_route(
    snapshot: &AccessSnapshot,
    guard: &RouteGuard,
    current_path: &str,
    paths: &RoutePaths,
) -> AccessDecision {
    evaluate_route(&settle(snapshot), guard, current_path, paths).decision(paths)
}
