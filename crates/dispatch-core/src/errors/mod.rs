//! Error types for the dispatch engine (thiserror).

pub mod error_code;
mod dispatch_error;
mod recovery;
mod storage_error;

pub use dispatch_error::{DispatchError, DispatchResult, ErrorKind};
pub use error_code::DispatchErrorCode;
pub use recovery::RecoveryAction;
pub use storage_error::StorageError;
