//! Event-sourced state owned by the portal (today: client profiles).

use crate::error::{DomainError, DomainResult};

/// Identity and revision of a stored aggregate.
pub trait AggregateRoot {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Count of events folded into this value. A never-stored aggregate is at 0.
    fn version(&self) -> u64;
}

/// Revision a writer believes it is updating.
///
/// Stores compare it with the stored revision before applying new events, so
/// two writers racing on the same profile cannot both win.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip the comparison.
    Any,
    /// The stored revision must equal this one.
    Exact(u64),
}

impl ExpectedVersion {
    /// `Conflict` unless `stored` is acceptable.
    pub fn check(self, stored: u64) -> DomainResult<()> {
        match self {
            Self::Exact(expected) if expected != stored => Err(DomainError::conflict(format!(
                "expected version {expected}, stored version is {stored}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Command/event state machine.
///
/// `handle` decides and never mutates; `apply` folds one event and bumps the
/// version. Neither performs IO.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    fn apply(&mut self, event: &Self::Event);

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_accepts_every_stored_version() {
        for stored in [0, 1, 42] {
            assert!(ExpectedVersion::Any.check(stored).is_ok());
        }
    }

    #[test]
    fn exact_mismatch_names_both_versions() {
        assert!(ExpectedVersion::Exact(3).check(3).is_ok());
        assert_eq!(
            ExpectedVersion::Exact(3).check(4),
            Err(DomainError::Conflict(
                "expected version 3, stored version is 4".to_string()
            ))
        );
    }
}
