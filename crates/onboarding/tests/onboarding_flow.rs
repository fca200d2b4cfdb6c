//! Client journey through the route gate: sign in, get held at onboarding,
//! finish the wizard, reach the dashboard.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use portal_auth::testing::{RecordingNavigator, StaticRoles, StaticSession};
use portal_auth::{
    explain_decision, snapshot, AccessDecision, AccessDecisionGate, Actor, DecisionRule, Role,
    RoleSet, RoutePaths, RouteTable,
};
use portal_core::{ActorId, ExpectedVersion, ProfileId};
use portal_onboarding::{
    CreateProfile, ProfileCommand, ProfileDirectory, ReopenOnboarding, Wizard, WizardConfig,
};

struct Portal {
    session: Arc<StaticSession>,
    roles: Arc<StaticRoles>,
    profiles: Arc<ProfileDirectory>,
    navigator: Arc<RecordingNavigator>,
    table: RouteTable,
}

impl Portal {
    fn new() -> Self {
        portal_observability::init_for_tests();
        Self {
            session: Arc::new(StaticSession::anonymous()),
            roles: Arc::new(StaticRoles::default()),
            profiles: Arc::new(ProfileDirectory::new()),
            navigator: Arc::new(RecordingNavigator::at("/dashboard")),
            table: RouteTable::portal(),
        }
    }

    fn register_client(&self) -> ActorId {
        let id = ActorId::new();
        self.session.sign_in(Actor::new(id).with_email("client@northwind.test"));
        self.roles.set(id, RoleSet::from([Role::Client]));
        self.profiles
            .execute(
                ExpectedVersion::Exact(0),
                ProfileCommand::Create(CreateProfile {
                    profile_id: ProfileId::new(),
                    actor_id: id,
                    company_name: "Northwind".to_string(),
                    occurred_at: Utc::now(),
                }),
            )
            .unwrap();
        id
    }

    fn visit(&self, path: &str) -> AccessDecision {
        self.navigator.set_path(path);
        let mut gate = AccessDecisionGate::new(
            self.session.clone(),
            self.roles.clone(),
            self.profiles.clone(),
            self.navigator.clone(),
            self.table.guard_for(path).clone(),
        );
        gate.evaluate()
    }
}

fn run_wizard(actor: ActorId) -> ProfileCommand {
    let wizard = Wizard::new(Arc::new(WizardConfig::client_default()))
        .submit(&json!({ "company_name": "Northwind", "industry": "Logistics" }))
        .and_then(|w| w.submit(&json!({ "contact_name": "Ada", "contact_email": "ada@northwind.test" })))
        .and_then(|w| w.submit(&json!({ "target_audience": ["press", "researchers"] })))
        .and_then(|w| w.submit(&json!({})))
        .unwrap();
    ProfileCommand::CompleteOnboarding(wizard.finish(actor, Utc::now()).unwrap())
}

#[test]
fn anonymous_visitor_is_sent_to_sign_in() {
    let portal = Portal::new();

    assert_eq!(portal.visit("/auth"), AccessDecision::Allow);
    assert_eq!(portal.visit("/dashboard"), AccessDecision::Redirect("/auth".to_string()));
    assert_eq!(portal.navigator.visits(), vec!["/auth".to_string()]);
}

#[test]
fn new_client_is_held_at_onboarding_until_wizard_completes() {
    let portal = Portal::new();
    let actor = portal.register_client();

    assert_eq!(
        portal.visit("/dashboard"),
        AccessDecision::Redirect("/onboarding".to_string())
    );
    assert_eq!(
        portal.visit("/profile"),
        AccessDecision::Redirect("/onboarding".to_string())
    );
    assert_eq!(portal.visit("/onboarding/contact"), AccessDecision::Allow);

    portal
        .profiles
        .execute(ExpectedVersion::Exact(1), run_wizard(actor))
        .unwrap();

    assert_eq!(portal.visit("/dashboard"), AccessDecision::Allow);
    assert_eq!(portal.visit("/profile"), AccessDecision::Allow);
    assert_eq!(
        portal.visit("/admin"),
        AccessDecision::Redirect("/dashboard".to_string())
    );
}

#[test]
fn reopened_onboarding_sends_client_back() {
    let portal = Portal::new();
    let actor = portal.register_client();
    portal
        .profiles
        .execute(ExpectedVersion::Any, run_wizard(actor))
        .unwrap();
    assert_eq!(portal.visit("/dashboard"), AccessDecision::Allow);

    portal
        .profiles
        .execute(
            ExpectedVersion::Any,
            ProfileCommand::ReopenOnboarding(ReopenOnboarding {
                actor_id: actor,
                requested_by: RoleSet::from([Role::Admin]),
                reason: "new billing contact".to_string(),
                occurred_at: Utc::now(),
            }),
        )
        .unwrap();

    assert_eq!(
        portal.visit("/dashboard"),
        AccessDecision::Redirect("/onboarding".to_string())
    );
}

#[test]
fn staff_without_profile_reach_their_console() {
    let portal = Portal::new();
    let id = ActorId::new();
    portal.session.sign_in(Actor::new(id));
    portal.roles.set(id, RoleSet::from([Role::Press]));

    assert_eq!(portal.visit("/press/releases"), AccessDecision::Allow);
    assert_eq!(portal.visit("/clients"), AccessDecision::Allow);
    assert_eq!(
        portal.visit("/research"),
        AccessDecision::Redirect("/dashboard".to_string())
    );
}

#[test]
fn client_without_profile_is_allowed_by_default() {
    let portal = Portal::new();
    let id = ActorId::new();
    portal.session.sign_in(Actor::new(id));
    portal.roles.set(id, RoleSet::from([Role::Client]));

    let snap = snapshot(&portal.session, &portal.roles, &portal.profiles);
    let explanation = explain_decision(
        &snap,
        portal.table.guard_for("/dashboard"),
        "/dashboard",
        &RoutePaths::default(),
    );

    assert_eq!(explanation.decision, AccessDecision::Allow);
    assert_eq!(explanation.rule, DecisionRule::Allowed);
    assert_eq!(explanation.actor.unwrap().onboarding_completed, None);
}
