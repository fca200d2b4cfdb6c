//! `portal-auth` — route access decisions for the portal.
//!
//! Combines the session, role and onboarding resolvers into one
//! allow/redirect/pending decision per rendered route. Decoupled from the
//! identity provider, the backend and the router.

pub mod actor;
pub mod config;
pub mod decision;
pub mod explain;
pub mod gate;
pub mod navigation;
pub mod readiness;
pub mod requirement;
pub mod resolvers;
pub mod roles;
pub mod routes;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use actor::Actor;
pub use config::RoutePaths;
pub use decision::{
    decide, decide_client_onboarding, decide_for_route, settle, AccessDecision, AccessSnapshot,
    DecisionRule, ResolvedActor, Settled,
};
pub use explain::{explain_decision, ActorState, DecisionExplanation};
pub use gate::AccessDecisionGate;
pub use navigation::Navigator;
pub use readiness::{Keyed, Readiness};
pub use requirement::{RouteAccessRequirement, RouteGuard};
pub use resolvers::{
    snapshot, OnboardingStatus, OnboardingStatusResolver, RoleResolver, SessionResolver,
};
pub use roles::{Role, RoleSet};
pub use routes::{RouteEntry, RouteTable};
