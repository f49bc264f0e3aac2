//! Typed failures returned by command actions, task consumers and
//! interaction callbacks
//!
//! The dispatcher matches on the variant to decide between aborting the
//! owning task and only reporting the failure.

use thiserror::Error;

use super::model::ComponentKind;

/// Result type for everything the dispatcher invokes
pub type HandlerResult<T> = Result<T, HandlerError>;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// The bot identity lacks rights for a platform operation
    #[error("missing permission: {permission}")]
    Permission { permission: String },

    /// A component callback received an event of the wrong shape
    #[error("interaction {interaction_id} expected a {expected} event but found a {found} event")]
    WrongInteraction {
        interaction_id: String,
        expected: ComponentKind,
        found: ComponentKind,
    },

    /// Any other platform failure
    #[error(transparent)]
    Platform(#[from] anyhow::Error),
}

impl HandlerError {
    pub fn permission(permission: impl Into<String>) -> Self {
        HandlerError::Permission {
            permission: permission.into(),
        }
    }

    pub fn wrong_interaction(
        interaction_id: impl Into<String>,
        expected: ComponentKind,
        found: ComponentKind,
    ) -> Self {
        HandlerError::WrongInteraction {
            interaction_id: interaction_id.into(),
            expected,
            found,
        }
    }

    /// Permission and kind failures end the task they happened in
    pub fn aborts_task(&self) -> bool {
        matches!(
            self,
            HandlerError::Permission { .. } | HandlerError::WrongInteraction { .. }
        )
    }
}
