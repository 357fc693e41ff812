use rusqlite::{Connection, Result};

/// Initialise all tables for the planner subsystem. Idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    create_commesse_table(conn)?;
    create_locations_table(conn)?;
    create_tasks_table(conn)?;
    create_task_dipendenti_table(conn)?;
    Ok(())
}

fn create_commesse_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS commesse (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            codice      TEXT NOT NULL UNIQUE,
            descrizione TEXT NOT NULL,
            cliente     TEXT NOT NULL,
            data_inizio TEXT NOT NULL,
            data_fine   TEXT,
            budget      REAL,
            stato       TEXT NOT NULL DEFAULT 'attiva',
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );",
    )
}

fn create_locations_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS locations (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            commessa_id INTEGER NOT NULL REFERENCES commesse(id) ON DELETE CASCADE,
            nome        TEXT NOT NULL,
            indirizzo   TEXT,
            lat         REAL,
            lng         REAL
        );
        CREATE INDEX IF NOT EXISTS idx_locations_commessa ON locations (commessa_id);",
    )
}

fn create_tasks_table(conn: &Connection) -> Result<()> {
    // funzione_id is RESTRICT: a funzione with tasks attached can't be removed.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tasks (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            nome            TEXT NOT NULL,
            descrizione     TEXT,
            commessa_id     INTEGER NOT NULL REFERENCES commesse(id) ON DELETE CASCADE,
            stato           TEXT NOT NULL DEFAULT 'attivo',
            durata_prevista REAL,
            numero_risorse  INTEGER NOT NULL DEFAULT 1,
            skills          TEXT,               -- JSON array or NULL
            data_inizio     TEXT,
            data_fine       TEXT,
            location_id     INTEGER REFERENCES locations(id) ON DELETE SET NULL,
            funzione_id     INTEGER NOT NULL REFERENCES funzioni(id) ON DELETE RESTRICT,
            priorita        TEXT NOT NULL DEFAULT 'media',
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_tasks_commessa ON tasks (commessa_id);",
    )
}

fn create_task_dipendenti_table(conn: &Connection) -> Result<()> {
    // UNIQUE(task_id, dipendente_id): one assignment row per pair.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS task_dipendenti (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            task_id       INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            dipendente_id INTEGER NOT NULL REFERENCES dipendenti(id) ON DELETE CASCADE,
            ruolo         TEXT,
            note          TEXT,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL,
            UNIQUE(task_id, dipendente_id)
        );",
    )
}
