//! Stateful route gate.
//!
//! Wraps the pure decision table with the one side effect it owns: issuing a
//! navigation when the decision is a redirect.

use crate::decision::{evaluate_route, settle, AccessDecision, DecisionRule};
use crate::resolvers::{snapshot, OnboardingStatusResolver, RoleResolver, SessionResolver};
use crate::{Navigator, RouteGuard, RoutePaths};

/// Guards one rendered route.
///
/// Call [`AccessDecisionGate::evaluate`] whenever any input may have changed.
/// Each call recomputes the decision from a fresh snapshot of every resolver.
pub struct AccessDecisionGate<S, R, O, N> {
    session: S,
    roles: R,
    onboarding: O,
    navigator: N,
    guard: RouteGuard,
    paths: RoutePaths,
    /// `(from, to)` of the last navigation issued, until the decision moves on.
    last_redirect: Option<(String, String)>,
}

impl<S, R, O, N> AccessDecisionGate<S, R, O, N>
where
    S: SessionResolver,
    R: RoleResolver,
    O: OnboardingStatusResolver,
    N: Navigator,
{
    pub fn new(session: S, roles: R, onboarding: O, navigator: N, guard: RouteGuard) -> Self {
        Self {
            session,
            roles,
            onboarding,
            navigator,
            guard,
            paths: RoutePaths::default(),
            last_redirect: None,
        }
    }

    pub fn with_paths(mut self, paths: RoutePaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Point the gate at a different route (the host re-rendered elsewhere).
    pub fn set_guard(&mut self, guard: RouteGuard) {
        if self.guard != guard {
            self.guard = guard;
            self.last_redirect = None;
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Recompute the decision and navigate if it is a new redirect.
    ///
    /// `Pending` never navigates and keeps the memo of the last redirect, so a
    /// loading blip between two identical redirects from the same path does
    /// not navigate twice. A redirect from a different path always navigates.
    pub fn evaluate(&mut self) -> AccessDecision {
        let current_path = self.navigator.current_path();
        let snapshot = snapshot(&self.session, &self.roles, &self.onboarding);
        let rule = evaluate_route(&settle(&snapshot), &self.guard, &current_path, &self.paths);
        let decision = rule.decision(&self.paths);

        tracing::debug!(path = %current_path, ?rule, ?decision, "route access evaluated");

        match &decision {
            AccessDecision::Pending => {}
            AccessDecision::Allow => self.last_redirect = None,
            AccessDecision::Redirect(target) => self.redirect(rule, &current_path, target),
        }

        decision
    }

    fn redirect(&mut self, rule: DecisionRule, from: &str, target: &str) {
        let repeated = self
            .last_redirect
            .as_ref()
            .is_some_and(|(last_from, last_to)| last_from == from && last_to == target);
        if repeated {
            return;
        }
        tracing::info!(from, to = target, ?rule, "redirecting");
        self.navigator.navigate(target);
        self.last_redirect = Some((from.to_string(), target.to_string()));
    }
}
