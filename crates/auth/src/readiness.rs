//! Per-resolver readiness.
//!
//! Every resolver is in exactly one of three states at any instant. The gate
//! never evaluates route requirements while any consulted resolver is loading.

use serde::Serialize;

use portal_core::ActorId;

/// Three-valued state of one asynchronous resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Readiness<T> {
    /// The resolver is still fetching.
    Loading,
    /// The resolver settled with data.
    Ready(T),
    /// The resolver settled without data (query error, missing row).
    Unavailable,
}

impl<T> Readiness<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Readiness::Loading)
    }

    /// The settled value, or `None` when loading or unavailable.
    pub fn ready(self) -> Option<T> {
        match self {
            Readiness::Ready(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Readiness<T> {
    /// A settled query result: `None` means the resolver found nothing.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Readiness::Ready(v),
            None => Readiness::Unavailable,
        }
    }
}

/// A resolver result tagged with the actor it was fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyed<T> {
    pub actor_id: ActorId,
    pub value: T,
}

impl<T> Keyed<T> {
    pub fn new(actor_id: ActorId, value: T) -> Self {
        Self { actor_id, value }
    }
}

impl<T> Readiness<Keyed<T>> {
    /// Unwrap a keyed result for `actor`.
    ///
    /// A response fetched for a different actor is stale and reads as
    /// `Loading`: the resolver has not yet produced anything for `actor`.
    pub fn for_actor(self, actor: ActorId) -> Readiness<T> {
        match self {
            Readiness::Ready(keyed) if keyed.actor_id == actor => Readiness::Ready(keyed.value),
            Readiness::Ready(keyed) => {
                tracing::warn!(
                    expected = %actor,
                    received = %keyed.actor_id,
                    "discarding resolver response for a previous actor"
                );
                Readiness::Loading
            }
            Readiness::Loading => Readiness::Loading,
            Readiness::Unavailable => Readiness::Unavailable,
        }
    }
}
