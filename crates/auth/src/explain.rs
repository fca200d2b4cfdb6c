// ─────────────────────────────────────────────────────────────────────────────
// Decision Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

use serde::Serialize;

use portal_core::ActorId;

use crate::decision::{evaluate_route, settle, AccessDecision, AccessSnapshot, DecisionRule, Settled};
use crate::{Role, RouteAccessRequirement, RouteGuard, RoutePaths};

/// Detailed explanation of a route access decision.
///
/// Answers "why was this actor sent there?" for logs and support tooling.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionExplanation {
    pub path: String,
    pub decision: AccessDecision,
    pub rule: DecisionRule,
    /// Human-readable reason for the decision.
    pub reason: String,
    /// `None` while pending or for anonymous visitors.
    pub actor: Option<ActorState>,
}

/// Settled inputs the decision was computed from.
#[derive(Debug, Clone, Serialize)]
pub struct ActorState {
    pub actor_id: ActorId,
    pub roles: Vec<Role>,
    pub primary_role: Option<Role>,
    pub is_staff: bool,
    pub is_client: bool,
    pub onboarding_completed: Option<bool>,
}

/// Explain the decision for `guard` on `current_path`.
///
/// Always agrees with [`crate::decide_for_route`] for the same inputs.
pub fn explain_decision(
    snapshot: &AccessSnapshot,
    guard: &RouteGuard,
    current_path: &str,
    paths: &RoutePaths,
) -> DecisionExplanation {
    let settled = settle(snapshot);
    let rule = evaluate_route(&settled, guard, current_path, paths);

    let actor = match &settled {
        Settled::Actor(resolved) => Some(ActorState {
            actor_id: resolved.actor.id,
            roles: resolved.roles.iter().collect(),
            primary_role: resolved.roles.primary_role(),
            is_staff: resolved.roles.is_staff(),
            is_client: resolved.roles.is_client(),
            onboarding_completed: resolved.onboarding_completed,
        }),
        _ => None,
    };

    DecisionExplanation {
        path: current_path.to_string(),
        decision: rule.decision(paths),
        rule,
        reason: reason(rule, guard, actor.as_ref()),
        actor,
    }
}

fn reason(rule: DecisionRule, guard: &RouteGuard, actor: Option<&ActorState>) -> String {
    let roles = actor
        .map(|a| format!("{:?}", a.roles))
        .unwrap_or_else(|| "[]".to_string());

    match rule {
        DecisionRule::Pending => "Waiting for session, roles or onboarding status to resolve".to_string(),
        DecisionRule::Unauthenticated => "No active session".to_string(),
        DecisionRule::AdminRequired => format!("Route requires the admin role; actor holds {roles}"),
        DecisionRule::StaffRequired => format!("Route requires a staff role; actor holds {roles}"),
        DecisionRule::RoleRequired => {
            let required = match guard {
                RouteGuard::Protected(RouteAccessRequirement { required_roles, .. }) => {
                    format!("{required_roles:?}")
                }
                _ => "[]".to_string(),
            };
            format!("Route requires one of {required}; actor holds {roles}")
        }
        DecisionRule::OnboardingIncomplete => {
            "Client has not completed onboarding".to_string()
        }
        DecisionRule::Allowed => match guard {
            RouteGuard::Public => "Public route".to_string(),
            RouteGuard::ClientOnboarding if actor.is_none() => {
                "Onboarding guard does not require a session".to_string()
            }
            _ if actor.is_some_and(|a| a.is_staff) => "Staff actor satisfies the route".to_string(),
            _ if actor.is_some_and(|a| a.is_client && a.onboarding_completed.is_none()) => {
                "Onboarding status unknown; allowed by default".to_string()
            }
            _ => "Actor satisfies the route".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decide_for_route, Actor, RoleSet};

    fn paths() -> RoutePaths {
        RoutePaths::default()
    }

    #[test]
    fn explanation_agrees_with_decision() {
        let guards = [
            RouteGuard::Public,
            RouteGuard::ClientOnboarding,
            RouteGuard::Protected(RouteAccessRequirement::none()),
            RouteGuard::Protected(RouteAccessRequirement::admin()),
            RouteGuard::Protected(RouteAccessRequirement::staff()),
            RouteGuard::Protected(RouteAccessRequirement::roles([Role::Paper])),
        ];
        let snapshots = [
            AccessSnapshot::anonymous(),
            AccessSnapshot::resolved(Actor::new(ActorId::new()), RoleSet::from([Role::Client]), Some(false)),
            AccessSnapshot::resolved(Actor::new(ActorId::new()), RoleSet::from([Role::Admin]), None),
        ];

        for snapshot in &snapshots {
            for guard in &guards {
                let explanation = explain_decision(snapshot, guard, "/dashboard", &paths());
                assert_eq!(
                    explanation.decision,
                    decide_for_route(snapshot, guard, "/dashboard", &paths())
                );
            }
        }
    }

    #[test]
    fn role_denial_lists_required_roles() {
        let snapshot =
            AccessSnapshot::resolved(Actor::new(ActorId::new()), RoleSet::from([Role::Press]), None);
        let guard = RouteGuard::Protected(RouteAccessRequirement::roles([Role::Research]));
        let explanation = explain_decision(&snapshot, &guard, "/research", &paths());

        assert_eq!(explanation.rule, DecisionRule::RoleRequired);
        assert!(explanation.reason.contains("Research"));
        assert!(explanation.reason.contains("Press"));
        assert_eq!(explanation.actor.unwrap().primary_role, Some(Role::Press));
    }

    #[test]
    fn permissive_default_is_called_out() {
        let snapshot =
            AccessSnapshot::resolved(Actor::new(ActorId::new()), RoleSet::from([Role::Client]), None);
        let explanation = explain_decision(
            &snapshot,
            &RouteGuard::Protected(RouteAccessRequirement::none()),
            "/dashboard",
            &paths(),
        );
        assert_eq!(explanation.rule, DecisionRule::Allowed);
        assert!(explanation.reason.contains("unknown"));
    }

    #[test]
    fn anonymous_pass_through_on_onboarding_guard_is_explained() {
        let explanation = explain_decision(
            &AccessSnapshot::anonymous(),
            &RouteGuard::ClientOnboarding,
            "/profile",
            &paths(),
        );
        assert_eq!(explanation.decision, AccessDecision::Allow);
        assert_eq!(explanation.reason, "Onboarding guard does not require a session");
        assert!(explanation.actor.is_none());
    }

    #[test]
    fn explanation_serializes_decision_and_rule() {
        let explanation = explain_decision(
            &AccessSnapshot::anonymous(),
            &RouteGuard::Protected(RouteAccessRequirement::none()),
            "/dashboard",
            &paths(),
        );
        let json = serde_json::to_value(&explanation).unwrap();
        assert_eq!(json["rule"], "unauthenticated");
        assert_eq!(json["decision"]["kind"], "redirect");
        assert_eq!(json["decision"]["target"], "/auth");
        assert!(json["actor"].is_null());
    }
}
