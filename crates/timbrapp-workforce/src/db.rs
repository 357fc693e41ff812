use rusqlite::{Connection, Result};

/// Initialise all tables for the workforce subsystem. Idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    create_dipendenti_table(conn)?;
    create_funzioni_table(conn)?;
    create_skill_table(conn)?;
    create_funzioneskill_table(conn)?;
    Ok(())
}

fn create_dipendenti_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS dipendenti (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            nome        TEXT NOT NULL,
            cognome     TEXT NOT NULL,
            email       TEXT NOT NULL UNIQUE,
            telefono    TEXT,
            user_id     INTEGER REFERENCES users(id),
            ruolo       TEXT NOT NULL DEFAULT 'Altro',
            skills      TEXT NOT NULL DEFAULT '[]',  -- JSON array
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );",
    )
}

fn create_funzioni_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS funzioni (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            nome        TEXT NOT NULL,
            descrizione TEXT,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );",
    )
}

fn create_skill_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS skill (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            nome        TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );",
    )
}

fn create_funzioneskill_table(conn: &Connection) -> Result<()> {
    // UNIQUE(funzione_id, skill_id) keeps the link table free of duplicates.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS funzioneskill (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            funzione_id INTEGER NOT NULL REFERENCES funzioni(id) ON DELETE CASCADE,
            skill_id    INTEGER NOT NULL REFERENCES skill(id) ON DELETE CASCADE,
            created_at  TEXT NOT NULL,
            UNIQUE(funzione_id, skill_id)
        );",
    )
}
