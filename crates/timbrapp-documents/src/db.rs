use rusqlite::{Connection, Result};

/// Initialise the document tables. Idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tipologiedocumento (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            nome       TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS documentiuser (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       INTEGER NOT NULL REFERENCES users(id),
            tipologia_id  INTEGER NOT NULL REFERENCES tipologiedocumento(id),
            nome          TEXT NOT NULL,
            url           TEXT NOT NULL,
            stato_lettura TEXT NOT NULL DEFAULT 'non letto',
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_documentiuser_user ON documentiuser (user_id);",
    )
}
