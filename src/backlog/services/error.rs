//! Service-level error type shared by every backlog service.

use crate::backlog::{
    domain::{BacklogDomainError, EntityRef, FailureKind, LifecycleViolation},
    ports::BacklogRepositoryError,
};
use thiserror::Error;
use tracing::warn;

/// Service-level errors for backlog operations.
#[derive(Debug, Error)]
pub enum BacklogServiceError {
    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(EntityRef),
    /// A lifecycle rule rejected the operation.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleViolation),
    /// Field validation failed.
    #[error(transparent)]
    Domain(#[from] BacklogDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] BacklogRepositoryError),
}

impl BacklogServiceError {
    /// Returns the failure classification used by transport adapters.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) | Self::Repository(BacklogRepositoryError::NotFound(_)) => {
                FailureKind::NotFound
            }
            Self::Lifecycle(violation) => violation.kind(),
            Self::Domain(err) => err.kind(),
            Self::Repository(
                BacklogRepositoryError::Duplicate(_) | BacklogRepositoryError::Persistence(_),
            ) => FailureKind::Persistence,
        }
    }
}

/// Result type for backlog service operations.
pub type BacklogServiceResult<T> = Result<T, BacklogServiceError>;

/// Logs a rejected lifecycle rule and wraps it.
pub(super) fn rejected(violation: LifecycleViolation) -> BacklogServiceError {
    warn!(
        kind = %violation.kind(),
        reason = %violation,
        "lifecycle rule rejected operation"
    );
    BacklogServiceError::Lifecycle(violation)
}
