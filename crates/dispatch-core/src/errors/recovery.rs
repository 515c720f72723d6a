//! RecoveryAction: what a caller should do when an engine operation fails.
//!
//! The engine never retries on its own; this is advice for the caller.

use std::fmt;

use super::{DispatchError, StorageError};

/// Recommended recovery action for a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Transient downstream failure; the same call may succeed later.
    Retry,
    /// The input was wrong; fix it and call again.
    Correct,
    /// A definitive outcome (lost race, missing record); show it to the user.
    Surface,
}

impl RecoveryAction {
    pub fn for_error(error: &DispatchError) -> Self {
        match error {
            DispatchError::StoreUnavailable(StorageError::DbBusy) => Self::Retry,
            DispatchError::StoreUnavailable(StorageError::CorruptRow { .. }) => Self::Surface,
            DispatchError::StoreUnavailable(StorageError::MigrationFailed { .. }) => Self::Surface,
            DispatchError::StoreUnavailable(_) => Self::Retry,
            DispatchError::PaymentUnavailable { .. } => Self::Retry,
            DispatchError::GeocoderUnavailable { .. } => Self::Retry,

            DispatchError::InvalidInput(_) => Self::Correct,
            DispatchError::NotAssigned { .. } => Self::Correct,
            DispatchError::Config(_) => Self::Correct,

            DispatchError::StateConflict { .. } => Self::Surface,
            DispatchError::NotFound { .. } => Self::Surface,
        }
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retry => write!(f, "Retry"),
            Self::Correct => write!(f, "Correct"),
            Self::Surface => write!(f, "Surface"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestStatus;

    #[test]
    fn test_conflict_is_surfaced_not_retried() {
        let err = DispatchError::StateConflict {
            request_id: "r".into(),
            expected: RequestStatus::Pending,
            actual: RequestStatus::Rejected,
        };
        assert_eq!(RecoveryAction::for_error(&err), RecoveryAction::Surface);
    }

    #[test]
    fn test_busy_is_retryable() {
        let err = DispatchError::StoreUnavailable(StorageError::DbBusy);
        assert_eq!(RecoveryAction::for_error(&err), RecoveryAction::Retry);
    }

    #[test]
    fn test_bad_input_must_be_corrected() {
        let err = DispatchError::invalid("negative weight");
        assert_eq!(RecoveryAction::for_error(&err), RecoveryAction::Correct);
        assert_eq!(RecoveryAction::Correct.to_string(), "Correct");
    }
}
