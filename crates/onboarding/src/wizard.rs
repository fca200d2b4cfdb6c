//! Multi-step onboarding wizard.
//!
//! The wizard is a value: every transition returns a new `Wizard` and leaves
//! the old one untouched. Step components receive their configuration and the
//! answers so far through [`StepContext`] instead of shared mutable state.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use portal_core::{ActorId, DomainError, DomainResult};

use crate::profile::CompleteOnboarding;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// One page of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub key: String,
    pub title: String,
    /// Fields that must be present and non-empty before the step can be submitted.
    #[serde(default)]
    pub required_fields: Vec<String>,
}

impl StepDefinition {
    pub fn new(key: impl Into<String>, title: impl Into<String>, required: &[&str]) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            required_fields: required.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Ordered, immutable wizard definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardConfig {
    steps: Vec<StepDefinition>,
}

impl WizardConfig {
    /// Build a config. Steps must be non-empty with unique, non-blank keys.
    pub fn new(steps: Vec<StepDefinition>) -> DomainResult<Self> {
        if steps.is_empty() {
            return Err(DomainError::validation("wizard needs at least one step"));
        }
        let mut seen = HashSet::new();
        for step in &steps {
            if step.key.trim().is_empty() {
                return Err(DomainError::validation("step key cannot be empty"));
            }
            if !seen.insert(step.key.as_str()) {
                return Err(DomainError::validation(format!(
                    "duplicate step key '{}'",
                    step.key
                )));
            }
        }
        Ok(Self { steps })
    }

    /// Steps every new client goes through.
    pub fn client_default() -> Self {
        Self {
            steps: vec![
                StepDefinition::new("company", "Company details", &["company_name", "industry"]),
                StepDefinition::new("contact", "Primary contact", &["contact_name", "contact_email"]),
                StepDefinition::new("audience", "Audience and goals", &["target_audience"]),
                StepDefinition::new("review", "Review", &[]),
            ],
        }
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.key == key)
    }

    pub fn step_keys(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.key.clone()).collect()
    }
}

impl<'de> Deserialize<'de> for WizardConfig {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            steps: Vec<StepDefinition>,
        }

        let raw = Raw::deserialize(deserializer)?;
        WizardConfig::new(raw.steps).map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Answers
// ─────────────────────────────────────────────────────────────────────────────

/// Submitted answers, one JSON object per step key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OnboardingAnswers(BTreeMap<String, Map<String, Value>>);

impl OnboardingAnswers {
    pub fn get(&self, step: &str) -> Option<&Map<String, Value>> {
        self.0.get(step)
    }

    pub fn field(&self, step: &str, field: &str) -> Option<&Value> {
        self.get(step).and_then(|s| s.get(field))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn with(&self, step: &str, data: Map<String, Value>) -> Self {
        let mut next = self.clone();
        next.0.insert(step.to_string(), data);
        next
    }

    /// First step key in `steps` that has no submitted answers.
    pub fn first_missing<'a>(&self, steps: &'a [String]) -> Option<&'a str> {
        steps
            .iter()
            .find(|k| !self.0.contains_key(k.as_str()))
            .map(String::as_str)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// Check a step submission against its required fields.
pub fn validate_step(step: &StepDefinition, data: &Value) -> DomainResult<Map<String, Value>> {
    let Value::Object(fields) = data else {
        return Err(DomainError::validation(format!(
            "{}: answers must be an object",
            step.key
        )));
    };

    for required in &step.required_fields {
        if fields.get(required).is_none_or(is_blank) {
            return Err(DomainError::validation(format!(
                "{}: missing required field '{required}'",
                step.key
            )));
        }
    }

    Ok(fields.clone())
}

// ─────────────────────────────────────────────────────────────────────────────
// Wizard
// ─────────────────────────────────────────────────────────────────────────────

/// Everything a step component needs to render.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub config: &'a WizardConfig,
    pub step: &'a StepDefinition,
    pub index: usize,
    pub total: usize,
    pub answers: &'a OnboardingAnswers,
}

impl StepContext<'_> {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }

    /// Previously submitted answers for this step, for pre-filling.
    pub fn saved(&self) -> Option<&Map<String, Value>> {
        self.answers.get(&self.step.key)
    }
}

/// Wizard progress. `position == steps.len()` means every step was submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    config: Arc<WizardConfig>,
    position: usize,
    furthest: usize,
    answers: OnboardingAnswers,
}

impl Wizard {
    pub fn new(config: Arc<WizardConfig>) -> Self {
        Self {
            config,
            position: 0,
            furthest: 0,
            answers: OnboardingAnswers::default(),
        }
    }

    /// Resume with previously saved answers, positioned at the first step
    /// without answers. Steps up to the one after the last answered step stay
    /// reachable through [`Wizard::jump_to`].
    pub fn resume(config: Arc<WizardConfig>, answers: OnboardingAnswers) -> Self {
        let keys = config.step_keys();
        let position = answers
            .first_missing(&keys)
            .and_then(|k| config.position(k))
            .unwrap_or(keys.len());
        let after_last_answered = keys
            .iter()
            .rposition(|k| answers.get(k).is_some())
            .map_or(0, |i| i + 1);
        Self {
            config,
            position,
            furthest: position.max(after_last_answered),
            answers,
        }
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn answers(&self) -> &OnboardingAnswers {
        &self.answers
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_complete(&self) -> bool {
        self.position == self.config.steps.len()
    }

    pub fn current_step(&self) -> Option<&StepDefinition> {
        self.config.steps.get(self.position)
    }

    /// Render context for the current step, `None` once complete.
    pub fn context(&self) -> Option<StepContext<'_>> {
        let step = self.current_step()?;
        Some(StepContext {
            config: &self.config,
            step,
            index: self.position,
            total: self.config.steps.len(),
            answers: &self.answers,
        })
    }

    /// Validate and record answers for the current step, then advance.
    pub fn submit(&self, data: &Value) -> DomainResult<Wizard> {
        let step = self
            .current_step()
            .ok_or_else(|| DomainError::invariant("wizard already complete"))?;
        let fields = validate_step(step, data)?;

        let position = self.position + 1;
        tracing::debug!(step = %step.key, position, "onboarding step submitted");
        Ok(Wizard {
            config: Arc::clone(&self.config),
            position,
            furthest: self.furthest.max(position),
            answers: self.answers.with(&step.key, fields),
        })
    }

    /// Previous step; answers are kept. Stays put on the first step.
    pub fn back(&self) -> Wizard {
        Wizard {
            position: self.position.saturating_sub(1),
            ..self.clone()
        }
    }

    /// Jump to an already visited step.
    pub fn jump_to(&self, key: &str) -> DomainResult<Wizard> {
        let index = self
            .config
            .position(key)
            .ok_or_else(|| DomainError::validation(format!("unknown step '{key}'")))?;
        if index > self.furthest {
            return Err(DomainError::invariant(format!("step '{key}' not reached yet")));
        }
        Ok(Wizard {
            position: index,
            ..self.clone()
        })
    }

    /// Turn a completed wizard into the command that marks onboarding done.
    pub fn finish(&self, actor_id: ActorId, occurred_at: DateTime<Utc>) -> DomainResult<CompleteOnboarding> {
        if !self.is_complete() {
            let pending = self.current_step().map(|s| s.key.as_str()).unwrap_or_default();
            return Err(DomainError::invariant(format!(
                "onboarding not finished, next step is '{pending}'"
            )));
        }
        Ok(CompleteOnboarding {
            actor_id,
            answers: self.answers.clone(),
            required_steps: self.config.step_keys(),
            occurred_at,
        })
    }
}
