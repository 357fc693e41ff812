use std::sync::Mutex;

use rusqlite::Connection;
use timbrapp_core::types::now_rfc3339;
use tracing::info;

use crate::error::{Result, WorkforceError};
use crate::types::{Dipendente, Funzione, NewDipendente, Skill};

fn row_to_dipendente(row: &rusqlite::Row<'_>) -> rusqlite::Result<Dipendente> {
    let skills: Vec<String> =
        serde_json::from_str(&row.get::<_, String>(7)?).unwrap_or_default();
    Ok(Dipendente {
        id: row.get(0)?,
        nome: row.get(1)?,
        cognome: row.get(2)?,
        email: row.get(3)?,
        telefono: row.get(4)?,
        user_id: row.get(5)?,
        ruolo: row.get(6)?,
        skills,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

const DIPENDENTE_COLUMNS: &str =
    "id, nome, cognome, email, telefono, user_id, ruolo, skills, created_at, updated_at";

fn row_to_funzione(row: &rusqlite::Row<'_>) -> rusqlite::Result<Funzione> {
    Ok(Funzione {
        id: row.get(0)?,
        nome: row.get(1)?,
        descrizione: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn row_to_skill(row: &rusqlite::Row<'_>) -> rusqlite::Result<Skill> {
    Ok(Skill {
        id: row.get(0)?,
        nome: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

/// Store for employees, job functions and skills.
pub struct WorkforceStore {
    db: Mutex<Connection>,
}

impl WorkforceStore {
    pub fn new(conn: Connection) -> Self {
        Self { db: Mutex::new(conn) }
    }

    // ── dipendenti ────────────────────────────────────────────────────────────

    pub fn list_dipendenti(&self) -> Result<Vec<Dipendente>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {} FROM dipendenti ORDER BY cognome, nome",
            DIPENDENTE_COLUMNS
        ))?;
        let rows = stmt.query_map([], row_to_dipendente)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn get_dipendente(&self, id: i64) -> Result<Option<Dipendente>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            &format!("SELECT {} FROM dipendenti WHERE id = ?1", DIPENDENTE_COLUMNS),
            rusqlite::params![id],
            row_to_dipendente,
        ) {
            Ok(d) => Ok(Some(d)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn create_dipendente(&self, new: &NewDipendente) -> Result<Dipendente> {
        let db = self.db.lock().unwrap();
        let now = now_rfc3339();
        let skills = serde_json::to_string(&new.skills).unwrap_or_else(|_| "[]".to_string());
        db.execute(
            "INSERT INTO dipendenti (nome, cognome, email, telefono, user_id, ruolo, skills,
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            rusqlite::params![
                new.nome,
                new.cognome,
                new.email,
                new.telefono,
                new.user_id,
                new.ruolo,
                skills,
                now
            ],
        )?;
        let id = db.last_insert_rowid();
        info!(id, email = %new.email, "dipendente created");
        db.query_row(
            &format!("SELECT {} FROM dipendenti WHERE id = ?1", DIPENDENTE_COLUMNS),
            rusqlite::params![id],
            row_to_dipendente,
        )
        .map_err(WorkforceError::from)
    }

    /// Check that every id in `ids` names an existing employee.
    /// Used by the planner before replacing a task's assignment set.
    pub fn dipendenti_exist(&self, ids: &[i64]) -> Result<bool> {
        let db = self.db.lock().unwrap();
        for &id in ids {
            let found: bool = db
                .query_row(
                    "SELECT 1 FROM dipendenti WHERE id = ?1",
                    rusqlite::params![id],
                    |_| Ok(true),
                )
                .unwrap_or(false);
            if !found {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // ── funzioni ──────────────────────────────────────────────────────────────

    pub fn list_funzioni(&self) -> Result<Vec<Funzione>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT id, nome, descrizione, created_at, updated_at FROM funzioni ORDER BY nome",
        )?;
        let rows = stmt.query_map([], row_to_funzione)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Create a funzione and link it to the given skills through the
    /// funzioneskill join table. Every skill id must exist.
    pub fn create_funzione(
        &self,
        nome: &str,
        descrizione: Option<&str>,
        skill_ids: &[i64],
    ) -> Result<Funzione> {
        let db = self.db.lock().unwrap();

        for &skill_id in skill_ids {
            let found: bool = db
                .query_row(
                    "SELECT 1 FROM skill WHERE id = ?1",
                    rusqlite::params![skill_id],
                    |_| Ok(true),
                )
                .unwrap_or(false);
            if !found {
                return Err(WorkforceError::NotFound { entity: "skill", id: skill_id });
            }
        }

        let now = now_rfc3339();
        db.execute(
            "INSERT INTO funzioni (nome, descrizione, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            rusqlite::params![nome, descrizione, now],
        )?;
        let id = db.last_insert_rowid();

        for &skill_id in skill_ids {
            db.execute(
                "INSERT OR IGNORE INTO funzioneskill (funzione_id, skill_id, created_at)
                 VALUES (?1, ?2, ?3)",
                rusqlite::params![id, skill_id, now],
            )?;
        }
        info!(id, nome, linked_skills = skill_ids.len(), "funzione created");

        db.query_row(
            "SELECT id, nome, descrizione, created_at, updated_at FROM funzioni WHERE id = ?1",
            rusqlite::params![id],
            row_to_funzione,
        )
        .map_err(WorkforceError::from)
    }

    pub fn funzione_exists(&self, id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        Ok(db
            .query_row("SELECT 1 FROM funzioni WHERE id = ?1", rusqlite::params![id], |_| {
                Ok(true)
            })
            .unwrap_or(false))
    }

    /// Skills required by a funzione, through the join table.
    pub fn skills_for_funzione(&self, funzione_id: i64) -> Result<Vec<Skill>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT s.id, s.nome, s.created_at, s.updated_at
             FROM skill s
             JOIN funzioneskill fs ON fs.skill_id = s.id
             WHERE fs.funzione_id = ?1
             ORDER BY s.nome",
        )?;
        let rows = stmt.query_map(rusqlite::params![funzione_id], row_to_skill)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    // ── skill ─────────────────────────────────────────────────────────────────

    pub fn list_skills(&self) -> Result<Vec<Skill>> {
        let db = self.db.lock().unwrap();
        let mut stmt =
            db.prepare("SELECT id, nome, created_at, updated_at FROM skill ORDER BY nome")?;
        let rows = stmt.query_map([], row_to_skill)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn create_skill(&self, nome: &str) -> Result<Skill> {
        let db = self.db.lock().unwrap();
        let now = now_rfc3339();
        db.execute(
            "INSERT INTO skill (nome, created_at, updated_at) VALUES (?1, ?2, ?2)",
            rusqlite::params![nome, now],
        )?;
        let id = db.last_insert_rowid();
        db.query_row(
            "SELECT id, nome, created_at, updated_at FROM skill WHERE id = ?1",
            rusqlite::params![id],
            row_to_skill,
        )
        .map_err(WorkforceError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> WorkforceStore {
        let conn = Connection::open_in_memory().unwrap();
        timbrapp_users::db::init_db(&conn).unwrap();
        crate::db::init_db(&conn).unwrap();
        WorkforceStore::new(conn)
    }

    fn sample_dipendente(email: &str) -> NewDipendente {
        NewDipendente {
            nome: "Mario".to_string(),
            cognome: "Rossi".to_string(),
            email: email.to_string(),
            telefono: None,
            user_id: None,
            ruolo: "Elettricista".to_string(),
            skills: vec!["cablaggio".to_string()],
        }
    }

    #[test]
    fn create_and_list_dipendenti() {
        let store = store();
        let d = store.create_dipendente(&sample_dipendente("mario@example.com")).unwrap();
        assert_eq!(d.skills, vec!["cablaggio"]);

        let all = store.list_dipendenti().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].ruolo, "Elettricista");
    }

    #[test]
    fn dipendenti_exist_spots_missing_ids() {
        let store = store();
        let d = store.create_dipendente(&sample_dipendente("a@example.com")).unwrap();
        assert!(store.dipendenti_exist(&[d.id]).unwrap());
        assert!(!store.dipendenti_exist(&[d.id, 999]).unwrap());
    }

    #[test]
    fn funzione_links_skills() {
        let store = store();
        let s1 = store.create_skill("cablaggio").unwrap();
        let s2 = store.create_skill("collaudo").unwrap();
        let f = store
            .create_funzione("Impianti", Some("montaggio impianti"), &[s1.id, s2.id])
            .unwrap();

        let skills = store.skills_for_funzione(f.id).unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].nome, "cablaggio");
    }

    #[test]
    fn funzione_with_unknown_skill_rejected() {
        let store = store();
        let err = store.create_funzione("Impianti", None, &[404]).unwrap_err();
        assert!(matches!(err, WorkforceError::NotFound { entity: "skill", .. }));
    }
}
