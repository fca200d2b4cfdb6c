use chrono::{DateTime, Utc};

/// Immutable fact emitted by an aggregate.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted name, e.g. `onboarding.profile.created`.
    fn event_type(&self) -> &'static str;

    /// Payload schema version of this event type.
    fn version(&self) -> u32;

    fn occurred_at(&self) -> DateTime<Utc>;
}
