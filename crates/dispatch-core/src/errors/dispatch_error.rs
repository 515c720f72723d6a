use super::error_code::{self, DispatchErrorCode};
use super::StorageError;
use crate::types::RequestStatus;

/// Top-level error type for every engine operation.
///
/// Every variant is scoped to the single operation that produced it.
/// "No eligible collector" is absent: it is a
/// [`MatchOutcome`](crate::matching::MatchOutcome), not a failure.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("state conflict on request {request_id}: expected {expected}, found {actual}")]
    StateConflict {
        request_id: String,
        expected: RequestStatus,
        actual: RequestStatus,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("collector {collector_id} is not assigned to request {request_id}")]
    NotAssigned {
        request_id: String,
        collector_id: String,
    },

    #[error("request store unavailable: {0}")]
    StoreUnavailable(#[from] StorageError),

    #[error("payment collaborator unavailable: {reason}")]
    PaymentUnavailable { reason: String },

    #[error("geocoder unavailable: {reason}")]
    GeocoderUnavailable { reason: String },

    #[error("config error: {0}")]
    Config(String),
}

/// Coarse classification of a [`DispatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    StateConflict,
    NotFound,
    DownstreamUnavailable,
    Config,
}

impl DispatchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn request_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "pickup request",
            id: id.to_string(),
        }
    }

    pub fn collector_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "collector",
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            // Acting on someone else's request is a caller mistake.
            Self::InvalidInput(_) | Self::NotAssigned { .. } => ErrorKind::InvalidInput,
            Self::StateConflict { .. } => ErrorKind::StateConflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StoreUnavailable(_)
            | Self::PaymentUnavailable { .. }
            | Self::GeocoderUnavailable { .. } => ErrorKind::DownstreamUnavailable,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::StateConflict { .. })
    }
}

impl DispatchErrorCode for DispatchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => error_code::INVALID_INPUT,
            Self::StateConflict { .. } => error_code::STATE_CONFLICT,
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::NotAssigned { .. } => error_code::NOT_ASSIGNED,
            Self::StoreUnavailable(e) => match e {
                StorageError::DbBusy => error_code::DB_BUSY,
                _ => error_code::STORE_UNAVAILABLE,
            },
            Self::PaymentUnavailable { .. } => error_code::PAYMENT_UNAVAILABLE,
            Self::GeocoderUnavailable { .. } => error_code::GEOCODER_UNAVAILABLE,
            Self::Config(_) => error_code::CONFIG_ERROR,
        }
    }
}

/// Convenience type alias.
pub type DispatchResult<T> = Result<T, DispatchError>;
