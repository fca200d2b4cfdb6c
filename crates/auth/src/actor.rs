use serde::{Deserialize, Serialize};

use portal_core::ActorId;

/// The currently authenticated identity, as supplied by the session resolver.
///
/// Construction is decoupled from the identity provider: hosts map whatever
/// session object they receive onto this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub email: Option<String>,
}

impl Actor {
    pub fn new(id: ActorId) -> Self {
        Self { id, email: None }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
