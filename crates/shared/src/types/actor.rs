//! Actor identity recorded in audit fields.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Who performed a mutation.
///
/// Automated updates (the payment completion cascade, refund-driven payment
/// status changes) are attributed to [`Actor::System`] so audit queries can tell
/// them apart from human actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "user_id", rename_all = "lowercase")]
pub enum Actor {
    /// A back-office user.
    User(UserId),
    /// The system itself.
    System,
}

impl Actor {
    /// Returns the user id for human actors.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(id) => Some(*id),
            Self::System => None,
        }
    }

    /// Returns true for the system sentinel.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}

impl From<UserId> for Actor {
    fn from(id: UserId) -> Self {
        Self::User(id)
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "{id}"),
            Self::System => write!(f, "SYSTEM"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_actor_display() {
        assert_eq!(Actor::System.to_string(), "SYSTEM");
        assert!(Actor::System.is_system());
        assert_eq!(Actor::System.user_id(), None);
    }

    #[test]
    fn test_user_actor() {
        let user = UserId::new();
        let actor = Actor::from(user);
        assert_eq!(actor.user_id(), Some(user));
        assert_eq!(actor.to_string(), user.to_string());
        assert!(!actor.is_system());
    }
}
