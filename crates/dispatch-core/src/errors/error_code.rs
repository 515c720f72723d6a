//! Stable string error codes, exposed to the presentation layer.

pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const STATE_CONFLICT: &str = "STATE_CONFLICT";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const NOT_ASSIGNED: &str = "NOT_ASSIGNED";
pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
pub const PAYMENT_UNAVAILABLE: &str = "PAYMENT_UNAVAILABLE";
pub const GEOCODER_UNAVAILABLE: &str = "GEOCODER_UNAVAILABLE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";

pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CORRUPT_ROW: &str = "CORRUPT_ROW";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";

/// Implemented by every error type that crosses the engine boundary.
pub trait DispatchErrorCode {
    fn error_code(&self) -> &'static str;
}
