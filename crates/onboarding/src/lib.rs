//! `portal-onboarding` — client onboarding: the profile that records whether
//! a client finished onboarding, and the wizard that collects their answers.

pub mod directory;
pub mod profile;
pub mod wizard;

pub use directory::ProfileDirectory;
pub use profile::{
    ClientProfile, CompleteOnboarding, CreateProfile, OnboardingCompleted, OnboardingReopened,
    ProfileCommand, ProfileCreated, ProfileEvent, ReopenOnboarding,
};
pub use wizard::{OnboardingAnswers, StepContext, StepDefinition, Wizard, WizardConfig};
