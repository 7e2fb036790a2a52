use crate::types::Identity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The identity that passed Stage 2, with when and in which attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthenticatedUser {
    pub identity: Identity,
    pub attempt: Uuid,
    pub authenticated_at: DateTime<Utc>,
}

/// Holder of at most one authenticated identity.
///
/// Only the sequencer writes to it: set after a Stage 2 accept, cleared by a
/// new Stage 1 attempt, any rejection, or an explicit logout.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<AuthenticatedUser>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&AuthenticatedUser> {
        self.current.as_ref()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.current.as_ref().map(|u| &u.identity)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// True when `identity` is the user currently held.
    pub fn holds(&self, identity: &Identity) -> bool {
        self.identity().is_some_and(|held| held == identity)
    }

    pub(crate) fn authenticate(&mut self, identity: Identity, attempt: Uuid) -> &AuthenticatedUser {
        self.current.insert(AuthenticatedUser {
            identity,
            attempt,
            authenticated_at: Utc::now(),
        })
    }

    pub(crate) fn clear(&mut self) -> Option<AuthenticatedUser> {
        self.current.take()
    }
}
