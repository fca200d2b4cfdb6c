use std::collections::HashMap;
use std::sync::RwLock;

use portal_auth::{Keyed, OnboardingStatus, OnboardingStatusResolver, Readiness};
use portal_core::{
    ActorId, Aggregate, AggregateRoot, DomainError, DomainResult, Event, ExpectedVersion, ProfileId,
};

use crate::profile::{ClientProfile, ProfileCommand, ProfileEvent};

/// In-memory client profiles, one per actor, for tests and local development.
///
/// Doubles as the onboarding status resolver: it answers synchronously, so it
/// never reports `Loading`.
#[derive(Debug, Default)]
pub struct ProfileDirectory {
    profiles: RwLock<HashMap<ActorId, ClientProfile>>,
}

impl ProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, actor_id: ActorId) -> Option<ClientProfile> {
        let profiles = self.profiles.read().ok()?;
        profiles.get(&actor_id).cloned()
    }

    /// Run a command against the actor's profile and persist the result.
    pub fn execute(
        &self,
        expected: ExpectedVersion,
        command: ProfileCommand,
    ) -> DomainResult<Vec<ProfileEvent>> {
        let actor_id = command.actor_id();
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| DomainError::conflict("profile directory lock poisoned"))?;

        let mut profile = profiles
            .get(&actor_id)
            .cloned()
            .unwrap_or_else(|| ClientProfile::empty(ProfileId::new()));
        expected.check(profile.version())?;

        let events = profile.handle(&command)?;
        for event in &events {
            profile.apply(event);
            tracing::info!(
                actor = %actor_id,
                profile = %profile.id,
                event_type = event.event_type(),
                "client profile updated"
            );
        }
        profiles.insert(actor_id, profile);

        Ok(events)
    }
}

impl OnboardingStatusResolver for ProfileDirectory {
    fn onboarding_status(&self, actor: ActorId) -> Readiness<Keyed<OnboardingStatus>> {
        self.get(actor)
            .map(|p| {
                Keyed::new(
                    actor,
                    OnboardingStatus {
                        onboarding_completed: p.onboarding_completed,
                    },
                )
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::CreateProfile;
    use chrono::Utc;

    fn create(actor_id: ActorId) -> ProfileCommand {
        ProfileCommand::Create(CreateProfile {
            profile_id: ProfileId::new(),
            actor_id,
            company_name: "Contoso".to_string(),
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn status_is_unavailable_without_profile() {
        let directory = ProfileDirectory::new();
        assert_eq!(directory.onboarding_status(ActorId::new()), Readiness::Unavailable);
    }

    #[test]
    fn status_reflects_stored_profile() {
        let directory = ProfileDirectory::new();
        let actor = ActorId::new();
        directory.execute(ExpectedVersion::Exact(0), create(actor)).unwrap();

        assert_eq!(
            directory.onboarding_status(actor),
            Readiness::Ready(Keyed::new(actor, OnboardingStatus { onboarding_completed: false }))
        );
    }

    #[test]
    fn stale_expected_version_is_a_conflict() {
        let directory = ProfileDirectory::new();
        let actor = ActorId::new();
        directory.execute(ExpectedVersion::Any, create(actor)).unwrap();

        let err = directory.execute(ExpectedVersion::Exact(0), create(actor)).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn rejected_command_leaves_profile_untouched() {
        let directory = ProfileDirectory::new();
        let actor = ActorId::new();
        directory.execute(ExpectedVersion::Any, create(actor)).unwrap();
        let before = directory.get(actor).unwrap();

        assert!(directory.execute(ExpectedVersion::Any, create(actor)).is_err());
        assert_eq!(directory.get(actor).unwrap(), before);
    }
}
