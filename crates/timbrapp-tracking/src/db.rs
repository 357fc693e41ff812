use rusqlite::{Connection, Result};

/// Initialise the tracking tables. Idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    create_shifts_table(conn)?;
    create_timbrature_table(conn)?;
    create_requests_table(conn)?;
    Ok(())
}

fn create_shifts_table(conn: &Connection) -> Result<()> {
    // resource_id mirrors the calendar resource lane; it defaults to the
    // shift's user when not sent by the client.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS shifts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER NOT NULL REFERENCES users(id),
            start_time  TEXT NOT NULL,
            end_time    TEXT NOT NULL,
            date        TEXT NOT NULL,
            role        TEXT,
            location    TEXT,
            notes       TEXT,
            commessa_id INTEGER REFERENCES commesse(id) ON DELETE SET NULL,
            task_id     INTEGER REFERENCES tasks(id) ON DELETE SET NULL,
            resource_id INTEGER NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_shifts_date ON shifts (date);",
    )
}

fn create_timbrature_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS timbrature (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id             INTEGER NOT NULL REFERENCES users(id),
            type                TEXT NOT NULL,
            timestamp           TEXT NOT NULL,
            lat                 REAL,
            lon                 REAL,
            synced_from_offline INTEGER NOT NULL DEFAULT 0,
            created_at          TEXT NOT NULL,
            updated_at          TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_timbrature_user ON timbrature (user_id);",
    )
}

fn create_requests_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS requests (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id    INTEGER NOT NULL REFERENCES users(id),
            type       TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date   TEXT NOT NULL,
            note       TEXT,
            status     TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )
}
