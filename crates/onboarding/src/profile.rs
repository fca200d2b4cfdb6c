//! Client profile aggregate.
//!
//! A profile is created for every client and owns the `onboarding_completed`
//! flag the route gate reads. Staff actors never have one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_auth::RoleSet;
use portal_core::{ActorId, Aggregate, AggregateRoot, DomainError, Event, ProfileId};

use crate::wizard::OnboardingAnswers;

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// # Invariants
/// - A profile belongs to exactly one actor (immutable after creation).
/// - Onboarding completes at most once until staff reopen it.
/// - Completion requires answers for every wizard step.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientProfile {
    pub id: ProfileId,
    pub actor_id: Option<ActorId>,
    pub company_name: String,
    pub onboarding_completed: bool,
    pub answers: OnboardingAnswers,
    pub completed_at: Option<DateTime<Utc>>,
    pub version: u64,
    pub created: bool,
}

impl ClientProfile {
    pub fn empty(id: ProfileId) -> Self {
        Self {
            id,
            actor_id: None,
            company_name: String::new(),
            onboarding_completed: false,
            answers: OnboardingAnswers::default(),
            completed_at: None,
            version: 0,
            created: false,
        }
    }

    fn ensure_created(&self) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn ensure_actor(&self, actor_id: ActorId) -> Result<(), DomainError> {
        if self.actor_id != Some(actor_id) {
            return Err(DomainError::invariant("profile belongs to another actor"));
        }
        Ok(())
    }
}

impl AggregateRoot for ClientProfile {
    type Id = ProfileId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Create the profile for a newly registered client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    pub profile_id: ProfileId,
    pub actor_id: ActorId,
    pub company_name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Mark onboarding done. Built by [`crate::Wizard::finish`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteOnboarding {
    pub actor_id: ActorId,
    pub answers: OnboardingAnswers,
    /// Step keys that must all have answers.
    pub required_steps: Vec<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Send a client back through onboarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReopenOnboarding {
    pub actor_id: ActorId,
    /// Roles of whoever asks; only staff may reopen.
    pub requested_by: RoleSet,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProfileCommand {
    Create(CreateProfile),
    CompleteOnboarding(CompleteOnboarding),
    ReopenOnboarding(ReopenOnboarding),
}

impl ProfileCommand {
    /// The client whose profile the command targets.
    pub fn actor_id(&self) -> ActorId {
        match self {
            ProfileCommand::Create(c) => c.actor_id,
            ProfileCommand::CompleteOnboarding(c) => c.actor_id,
            ProfileCommand::ReopenOnboarding(c) => c.actor_id,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCreated {
    pub profile_id: ProfileId,
    pub actor_id: ActorId,
    pub company_name: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingCompleted {
    pub profile_id: ProfileId,
    pub actor_id: ActorId,
    pub answers: OnboardingAnswers,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingReopened {
    pub profile_id: ProfileId,
    pub actor_id: ActorId,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProfileEvent {
    Created(ProfileCreated),
    OnboardingCompleted(OnboardingCompleted),
    OnboardingReopened(OnboardingReopened),
}

impl Event for ProfileEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProfileEvent::Created(_) => "onboarding.profile.created",
            ProfileEvent::OnboardingCompleted(_) => "onboarding.profile.completed",
            ProfileEvent::OnboardingReopened(_) => "onboarding.profile.reopened",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProfileEvent::Created(e) => e.occurred_at,
            ProfileEvent::OnboardingCompleted(e) => e.occurred_at,
            ProfileEvent::OnboardingReopened(e) => e.occurred_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate Implementation
// ─────────────────────────────────────────────────────────────────────────────

impl Aggregate for ClientProfile {
    type Command = ProfileCommand;
    type Event = ProfileEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProfileEvent::Created(e) => self.apply_created(e),
            ProfileEvent::OnboardingCompleted(e) => self.apply_completed(e),
            ProfileEvent::OnboardingReopened(e) => self.apply_reopened(e),
        }
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProfileCommand::Create(cmd) => self.handle_create(cmd),
            ProfileCommand::CompleteOnboarding(cmd) => self.handle_complete(cmd),
            ProfileCommand::ReopenOnboarding(cmd) => self.handle_reopen(cmd),
        }
    }
}

impl ClientProfile {
    fn handle_create(&self, cmd: &CreateProfile) -> Result<Vec<ProfileEvent>, DomainError> {
        if self.created {
            return Err(DomainError::invariant("profile already exists"));
        }

        let company_name = cmd.company_name.trim();
        if company_name.is_empty() {
            return Err(DomainError::validation("company name cannot be empty"));
        }

        Ok(vec![ProfileEvent::Created(ProfileCreated {
            profile_id: cmd.profile_id,
            actor_id: cmd.actor_id,
            company_name: company_name.to_string(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_complete(&self, cmd: &CompleteOnboarding) -> Result<Vec<ProfileEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_actor(cmd.actor_id)?;

        if self.onboarding_completed {
            return Err(DomainError::invariant("onboarding already completed"));
        }
        if let Some(missing) = cmd.answers.first_missing(&cmd.required_steps) {
            return Err(DomainError::validation(format!(
                "missing answers for step '{missing}'"
            )));
        }

        Ok(vec![ProfileEvent::OnboardingCompleted(OnboardingCompleted {
            profile_id: self.id,
            actor_id: cmd.actor_id,
            answers: cmd.answers.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reopen(&self, cmd: &ReopenOnboarding) -> Result<Vec<ProfileEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_actor(cmd.actor_id)?;

        if !cmd.requested_by.is_staff() {
            return Err(DomainError::Unauthorized);
        }
        if !self.onboarding_completed {
            return Err(DomainError::invariant("onboarding is not completed"));
        }

        Ok(vec![ProfileEvent::OnboardingReopened(OnboardingReopened {
            profile_id: self.id,
            actor_id: cmd.actor_id,
            reason: cmd.reason.trim().to_string(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn apply_created(&mut self, e: &ProfileCreated) {
        self.id = e.profile_id;
        self.actor_id = Some(e.actor_id);
        self.company_name = e.company_name.clone();
        self.onboarding_completed = false;
        self.created = true;
    }

    fn apply_completed(&mut self, e: &OnboardingCompleted) {
        self.onboarding_completed = true;
        self.answers = e.answers.clone();
        self.completed_at = Some(e.occurred_at);
    }

    fn apply_reopened(&mut self, _e: &OnboardingReopened) {
        self.onboarding_completed = false;
        self.completed_at = None;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
