//! Contracts for the three external collaborators the gate observes.
//!
//! Resolvers fetch independently and report their latest settled state on
//! every read; the gate never waits on them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use portal_core::ActorId;

use crate::{Actor, Keyed, Readiness, RoleSet};
use crate::decision::AccessSnapshot;

/// Onboarding progress of one client.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingStatus {
    pub onboarding_completed: bool,
}

/// Identity provider session. `Ready(None)` means nobody is signed in.
pub trait SessionResolver {
    fn session(&self) -> Readiness<Option<Actor>>;
}

/// Role lookup, keyed by actor.
pub trait RoleResolver {
    fn roles(&self, actor: ActorId) -> Readiness<Keyed<RoleSet>>;
}

/// Onboarding-completion lookup, keyed by actor.
pub trait OnboardingStatusResolver {
    fn onboarding_status(&self, actor: ActorId) -> Readiness<Keyed<OnboardingStatus>>;
}

macro_rules! forward_resolver {
    ($trait:ident, $method:ident ( $($arg:ident : $ty:ty),* ) -> $ret:ty) => {
        impl<T: $trait + ?Sized> $trait for Arc<T> {
            fn $method(&self, $($arg: $ty),*) -> $ret {
                (**self).$method($($arg),*)
            }
        }

        impl<T: $trait + ?Sized> $trait for &T {
            fn $method(&self, $($arg: $ty),*) -> $ret {
                (**self).$method($($arg),*)
            }
        }
    };
}

forward_resolver!(SessionResolver, session() -> Readiness<Option<Actor>>);
forward_resolver!(RoleResolver, roles(actor: ActorId) -> Readiness<Keyed<RoleSet>>);
forward_resolver!(
    OnboardingStatusResolver,
    onboarding_status(actor: ActorId) -> Readiness<Keyed<OnboardingStatus>>
);

/// Read every resolver once, producing one consistent set of inputs.
///
/// Role and onboarding lookups are only consulted for a present actor; they
/// are keyed by actor identity and have nothing to report otherwise.
pub fn snapshot<S, R, O>(session: &S, roles: &R, onboarding: &O) -> AccessSnapshot
where
    S: SessionResolver + ?Sized,
    R: RoleResolver + ?Sized,
    O: OnboardingStatusResolver + ?Sized,
{
    let session = session.session();
    let (roles, onboarding) = match &session {
        Readiness::Ready(Some(actor)) => (
            roles.roles(actor.id),
            onboarding.onboarding_status(actor.id),
        ),
        _ => (Readiness::Unavailable, Readiness::Unavailable),
    };

    AccessSnapshot {
        session,
        roles,
        onboarding,
    }
}
