//! Errors of the messaging core

/// Every failure an operation of the core can return.
///
/// `AccessDenied` means the resource may exist but the actor may not touch
/// it, the `*NotFound` kinds mean it does not exist.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("access denied: {0}")]
    AccessDenied(&'static str),

    #[error("resident {0} not found")]
    ResidentNotFound(i64),

    #[error("thread {0} not found")]
    ThreadNotFound(i64),

    #[error("message {0} not found")]
    MessageNotFound(i64),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl From<validator::ValidationErrors> for MessagingError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}
