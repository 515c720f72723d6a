//! Schema SQL constants, applied by `migrations`.

/// Tables owned by the dispatch store.
pub const DISPATCH_TABLE_NAMES: [&str; 3] = ["collectors", "drop_off_points", "pickup_requests"];

/// V1 schema: directory tables, the request table, and its lookup indexes.
///
/// Category sets, itemizations and settlements are JSON text. Timestamps
/// are fixed-width RFC 3339 so lexical order is chronological order.
pub const DISPATCH_TABLES_V1: &str = "
    CREATE TABLE IF NOT EXISTS collectors (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        lat REAL NOT NULL,
        lng REAL NOT NULL,
        categories TEXT NOT NULL,
        available_from TEXT NOT NULL,
        available_to TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1 CHECK (active IN (0, 1)),
        updated_at INTEGER NOT NULL DEFAULT (unixepoch())
    ) STRICT;

    CREATE TABLE IF NOT EXISTS drop_off_points (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        lat REAL NOT NULL,
        lng REAL NOT NULL,
        address TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1 CHECK (active IN (0, 1))
    ) STRICT;

    CREATE TABLE IF NOT EXISTS pickup_requests (
        id TEXT PRIMARY KEY NOT NULL,
        submission_id TEXT NOT NULL,
        user_id TEXT NOT NULL,
        collector_id TEXT,
        origin_lat REAL NOT NULL,
        origin_lng REAL NOT NULL,
        categories TEXT NOT NULL,
        preferred_date TEXT NOT NULL,
        preferred_time TEXT NOT NULL,
        pickup_address TEXT NOT NULL,
        status TEXT NOT NULL
            CHECK (status IN ('pending', 'accepted', 'rejected', 'completed')),
        scraps TEXT,
        settlement TEXT,
        payment_reference TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    ) STRICT;

    CREATE INDEX IF NOT EXISTS idx_requests_user ON pickup_requests(user_id, created_at);
    CREATE INDEX IF NOT EXISTS idx_requests_collector_status
        ON pickup_requests(collector_id, status);
    CREATE INDEX IF NOT EXISTS idx_requests_status ON pickup_requests(status);
    CREATE INDEX IF NOT EXISTS idx_requests_submission ON pickup_requests(submission_id);
";
