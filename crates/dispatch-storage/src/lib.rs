//! # dispatch-storage
//!
//! SQLite persistence for the pickup dispatch engine.
//! WAL mode, one serialized writer plus a round-robin read pool, versioned
//! migrations, and a compare-and-set status update that holds across
//! processes sharing the same database file.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod pragmas;
pub mod queries;
pub mod schema;

pub use engine::DispatchStorageEngine;
pub use pool::ConnectionPool;
