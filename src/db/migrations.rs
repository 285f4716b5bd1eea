use anyhow::Context;
use rusqlite::Connection;

// Migrations ship embedded so an in-memory database carries the full schema.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial",
    "CREATE TABLE stores (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        working_days TEXT NOT NULL,
        opening_time TEXT NOT NULL,
        closing_time TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE branches (
        id TEXT PRIMARY KEY,
        store_id TEXT NOT NULL REFERENCES stores(id),
        name TEXT NOT NULL,
        working_days TEXT NOT NULL,
        opening_time TEXT NOT NULL,
        closing_time TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE entities (
        id TEXT PRIMARY KEY,
        entity_type TEXT NOT NULL CHECK (entity_type IN ('service', 'offer')),
        name TEXT NOT NULL,
        store_id TEXT NOT NULL REFERENCES stores(id),
        branch_id TEXT REFERENCES branches(id),
        staff_id TEXT,
        duration_minutes INTEGER,
        slot_interval INTEGER,
        buffer_minutes INTEGER NOT NULL DEFAULT 0,
        max_concurrent INTEGER NOT NULL DEFAULT 1,
        allow_overbooking INTEGER NOT NULL DEFAULT 0,
        min_advance_minutes INTEGER NOT NULL DEFAULT 0,
        max_advance_minutes INTEGER,
        booking_enabled INTEGER NOT NULL DEFAULT 1,
        auto_confirm INTEGER NOT NULL DEFAULT 0,
        active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE bookings (
        id TEXT PRIMARY KEY,
        entity_id TEXT NOT NULL,
        entity_type TEXT NOT NULL,
        staff_id TEXT,
        customer_id TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        verification_code TEXT NOT NULL,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX idx_bookings_entity_start ON bookings(entity_id, entity_type, start_time);
    CREATE INDEX idx_bookings_staff_start ON bookings(staff_id, start_time);",
)];

pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .context("failed to create migrations table")?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .context("failed to check migration status")?;

        if already_applied {
            continue;
        }

        conn.execute_batch(sql)
            .with_context(|| format!("failed to apply migration: {name}"))?;

        conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])
            .with_context(|| format!("failed to record migration: {name}"))?;

        tracing::info!("applied migration: {name}");
    }

    Ok(())
}
