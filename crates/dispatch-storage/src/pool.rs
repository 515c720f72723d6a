//! ConnectionPool: one writer plus a read pool with round-robin selection.
//!
//! The only place in this crate that holds `Mutex<Connection>`. Everything
//! else reaches SQLite through `with_writer` / `with_reader`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use dispatch_core::errors::StorageError;
use rusqlite::{Connection, OpenFlags};

use crate::pragmas::{configure_connection, configure_readonly_connection};
use crate::queries::sqe;

/// Default number of reader connections.
const DEFAULT_READ_POOL_SIZE: usize = 2;

pub struct ConnectionPool {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    read_index: AtomicUsize,
    path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open a file-backed pool: one read-write connection and
    /// `read_pool_size` read-only ones. Zero means the default.
    ///
    /// `init` runs on the writer before any reader is opened, so readers
    /// always see a migrated schema.
    pub fn open<F>(path: &Path, read_pool_size: usize, init: F) -> Result<Self, StorageError>
    where
        F: FnOnce(&Connection) -> Result<(), StorageError>,
    {
        let pool_size = if read_pool_size == 0 {
            DEFAULT_READ_POOL_SIZE
        } else {
            read_pool_size
        };

        let writer = Connection::open(path).map_err(sqe)?;
        configure_connection(&writer)?;
        init(&writer)?;

        let mut readers = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let reader = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(sqe)?;
            configure_readonly_connection(&reader)?;
            readers.push(Mutex::new(reader));
        }

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            read_index: AtomicUsize::new(0),
            path: Some(path.to_path_buf()),
        })
    }

    /// A private in-memory database. Readers fall back to the writer since
    /// separate in-memory connections do not share data.
    pub fn open_in_memory<F>(init: F) -> Result<Self, StorageError>
    where
        F: FnOnce(&Connection) -> Result<(), StorageError>,
    {
        let writer = Connection::open_in_memory().map_err(sqe)?;
        configure_connection(&writer)?;
        init(&writer)?;
        Ok(Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            read_index: AtomicUsize::new(0),
            path: None,
        })
    }

    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self
            .writer
            .lock()
            .map_err(|e| StorageError::LockPoisoned(format!("writer: {e}")))?;
        f(&conn)
    }

    /// Round-robin over the readers; the writer when there are none.
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        if self.readers.is_empty() {
            return self.with_writer(f);
        }
        let index = self.read_index.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[index]
            .lock()
            .map_err(|e| StorageError::LockPoisoned(format!("reader {index}: {e}")))?;
        f(&conn)
    }

    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_wal_mode(&self) -> bool {
        self.with_writer(|conn| {
            let mode: String = conn
                .query_row("PRAGMA journal_mode", [], |row| row.get(0))
                .map_err(sqe)?;
            Ok(mode.eq_ignore_ascii_case("wal"))
        })
        .unwrap_or(false)
    }
}
