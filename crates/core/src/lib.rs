//! `portal-core`: ids, errors and the aggregate/event traits shared by the
//! portal crates. No IO lives here.

pub mod aggregate;
pub mod error;
pub mod event;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{ActorId, ProfileId};
