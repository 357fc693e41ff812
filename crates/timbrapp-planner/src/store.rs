use std::sync::Mutex;

use rusqlite::Connection;
use timbrapp_core::types::now_rfc3339;
use tracing::info;

use crate::error::{PlannerError, Result};
use crate::types::*;

const COMMESSA_COLUMNS: &str =
    "id, codice, descrizione, cliente, data_inizio, data_fine, budget, stato, created_at, updated_at";

const TASK_COLUMNS: &str = "id, nome, descrizione, commessa_id, stato, durata_prevista, \
     numero_risorse, skills, data_inizio, data_fine, location_id, funzione_id, priorita, \
     created_at, updated_at";

const LOCATION_COLUMNS: &str = "id, commessa_id, nome, indirizzo, lat, lng";

fn row_to_commessa(row: &rusqlite::Row<'_>) -> rusqlite::Result<Commessa> {
    let stato = CommessaStato::parse(&row.get::<_, String>(7)?).unwrap_or_default();
    Ok(Commessa {
        id: row.get(0)?,
        codice: row.get(1)?,
        descrizione: row.get(2)?,
        cliente: row.get(3)?,
        data_inizio: row.get(4)?,
        data_fine: row.get(5)?,
        budget: row.get(6)?,
        stato,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let stato = TaskStato::parse(&row.get::<_, String>(4)?).unwrap_or_default();
    let skills = row
        .get::<_, Option<String>>(7)?
        .and_then(|s| serde_json::from_str(&s).ok());
    let priorita = TaskPriorita::parse(&row.get::<_, String>(12)?).unwrap_or_default();
    Ok(Task {
        id: row.get(0)?,
        nome: row.get(1)?,
        descrizione: row.get(2)?,
        commessa_id: row.get(3)?,
        stato,
        durata_prevista: row.get(5)?,
        numero_risorse: row.get(6)?,
        skills,
        data_inizio: row.get(8)?,
        data_fine: row.get(9)?,
        location_id: row.get(10)?,
        funzione_id: row.get(11)?,
        priorita,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

fn row_to_location(row: &rusqlite::Row<'_>) -> rusqlite::Result<Location> {
    Ok(Location {
        id: row.get(0)?,
        commessa_id: row.get(1)?,
        nome: row.get(2)?,
        indirizzo: row.get(3)?,
        lat: row.get(4)?,
        lng: row.get(5)?,
    })
}

fn row_to_assignment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Assignment> {
    Ok(Assignment {
        id: row.get(0)?,
        task_id: row.get(1)?,
        dipendente_id: row.get(2)?,
        ruolo: row.get(3)?,
        note: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Store for commesse, locations, tasks and assignments.
///
/// All planner tables live in the same SQLite file as the rest of the app,
/// so listing queries can join dipendenti directly.
pub struct PlannerStore {
    db: Mutex<Connection>,
}

impl PlannerStore {
    pub fn new(conn: Connection) -> Self {
        Self { db: Mutex::new(conn) }
    }

    // ── commesse ──────────────────────────────────────────────────────────────

    /// Active commesse ordered by codice, each decorated with its tasks and
    /// locations — the dashboard tree sidebar payload.
    pub fn list_commesse_attive(&self) -> Result<Vec<CommessaDetail>> {
        let commesse = {
            let db = self.db.lock().unwrap();
            let mut stmt = db.prepare(&format!(
                "SELECT {} FROM commesse WHERE stato = 'attiva' ORDER BY codice",
                COMMESSA_COLUMNS
            ))?;
            let rows = stmt.query_map([], row_to_commessa)?;
            rows.filter_map(|r| r.ok()).collect::<Vec<_>>()
        };
        commesse.into_iter().map(|c| self.decorate(c)).collect()
    }

    pub fn get_commessa(&self, id: i64) -> Result<Option<CommessaDetail>> {
        let commessa = {
            let db = self.db.lock().unwrap();
            match db.query_row(
                &format!("SELECT {} FROM commesse WHERE id = ?1", COMMESSA_COLUMNS),
                rusqlite::params![id],
                row_to_commessa,
            ) {
                Ok(c) => c,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        };
        Ok(Some(self.decorate(commessa)?))
    }

    fn decorate(&self, commessa: Commessa) -> Result<CommessaDetail> {
        let tasks = self.tasks_for_commessa(commessa.id)?;
        let locations = self.locations_for_commessa(commessa.id)?;
        Ok(CommessaDetail { commessa, tasks, locations })
    }

    pub fn create_commessa(&self, new: &NewCommessa) -> Result<Commessa> {
        let db = self.db.lock().unwrap();
        let now = now_rfc3339();
        db.execute(
            "INSERT INTO commesse (codice, descrizione, cliente, data_inizio, data_fine,
             budget, stato, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            rusqlite::params![
                new.codice,
                new.descrizione,
                new.cliente,
                new.data_inizio,
                new.data_fine,
                new.budget,
                new.stato.as_str(),
                now
            ],
        )?;
        let id = db.last_insert_rowid();
        info!(id, codice = %new.codice, "commessa created");
        db.query_row(
            &format!("SELECT {} FROM commesse WHERE id = ?1", COMMESSA_COLUMNS),
            rusqlite::params![id],
            row_to_commessa,
        )
        .map_err(PlannerError::from)
    }

    pub fn update_commessa(&self, id: i64, upd: &UpdateCommessa) -> Result<Option<Commessa>> {
        let current = {
            let db = self.db.lock().unwrap();
            match db.query_row(
                &format!("SELECT {} FROM commesse WHERE id = ?1", COMMESSA_COLUMNS),
                rusqlite::params![id],
                row_to_commessa,
            ) {
                Ok(c) => c,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        };

        // Merge: absent fields keep their current value.
        let codice = upd.codice.clone().unwrap_or(current.codice);
        let descrizione = upd.descrizione.clone().unwrap_or(current.descrizione);
        let cliente = upd.cliente.clone().unwrap_or(current.cliente);
        let data_inizio = upd.data_inizio.clone().unwrap_or(current.data_inizio);
        let data_fine = upd.data_fine.clone().or(current.data_fine);
        let budget = upd.budget.or(current.budget);
        let stato = upd.stato.unwrap_or(current.stato);

        let db = self.db.lock().unwrap();
        db.execute(
            "UPDATE commesse SET codice=?1, descrizione=?2, cliente=?3, data_inizio=?4,
             data_fine=?5, budget=?6, stato=?7, updated_at=?8 WHERE id=?9",
            rusqlite::params![
                codice,
                descrizione,
                cliente,
                data_inizio,
                data_fine,
                budget,
                stato.as_str(),
                now_rfc3339(),
                id
            ],
        )?;
        db.query_row(
            &format!("SELECT {} FROM commesse WHERE id = ?1", COMMESSA_COLUMNS),
            rusqlite::params![id],
            row_to_commessa,
        )
        .map(Some)
        .map_err(PlannerError::from)
    }

    /// Delete a commessa. Tasks and locations cascade via foreign keys.
    pub fn delete_commessa(&self, id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let rows = db.execute("DELETE FROM commesse WHERE id = ?1", rusqlite::params![id])?;
        Ok(rows > 0)
    }

    pub fn commessa_exists(&self, id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        Ok(db
            .query_row("SELECT 1 FROM commesse WHERE id = ?1", rusqlite::params![id], |_| {
                Ok(true)
            })
            .unwrap_or(false))
    }

    // ── locations ─────────────────────────────────────────────────────────────

    pub fn locations_for_commessa(&self, commessa_id: i64) -> Result<Vec<Location>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {} FROM locations WHERE commessa_id = ?1 ORDER BY nome",
            LOCATION_COLUMNS
        ))?;
        let rows = stmt.query_map(rusqlite::params![commessa_id], row_to_location)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn create_location(&self, commessa_id: i64, new: &NewLocation) -> Result<Location> {
        if !self.commessa_exists(commessa_id)? {
            return Err(PlannerError::NotFound { entity: "commessa", id: commessa_id });
        }
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO locations (commessa_id, nome, indirizzo, lat, lng)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![commessa_id, new.nome, new.indirizzo, new.lat, new.lng],
        )?;
        let id = db.last_insert_rowid();
        db.query_row(
            &format!("SELECT {} FROM locations WHERE id = ?1", LOCATION_COLUMNS),
            rusqlite::params![id],
            row_to_location,
        )
        .map_err(PlannerError::from)
    }

    /// Update a location only when it belongs to the given commessa.
    pub fn update_location(
        &self,
        commessa_id: i64,
        location_id: i64,
        upd: &UpdateLocation,
    ) -> Result<Option<Location>> {
        let current = {
            let db = self.db.lock().unwrap();
            match db.query_row(
                &format!(
                    "SELECT {} FROM locations WHERE id = ?1 AND commessa_id = ?2",
                    LOCATION_COLUMNS
                ),
                rusqlite::params![location_id, commessa_id],
                row_to_location,
            ) {
                Ok(l) => l,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        };

        let nome = upd.nome.clone().unwrap_or(current.nome);
        let indirizzo = upd.indirizzo.clone().or(current.indirizzo);
        let lat = upd.lat.or(current.lat);
        let lng = upd.lng.or(current.lng);

        let db = self.db.lock().unwrap();
        db.execute(
            "UPDATE locations SET nome=?1, indirizzo=?2, lat=?3, lng=?4 WHERE id=?5",
            rusqlite::params![nome, indirizzo, lat, lng, location_id],
        )?;
        db.query_row(
            &format!("SELECT {} FROM locations WHERE id = ?1", LOCATION_COLUMNS),
            rusqlite::params![location_id],
            row_to_location,
        )
        .map(Some)
        .map_err(PlannerError::from)
    }

    pub fn delete_location(&self, commessa_id: i64, location_id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let rows = db.execute(
            "DELETE FROM locations WHERE id = ?1 AND commessa_id = ?2",
            rusqlite::params![location_id, commessa_id],
        )?;
        Ok(rows > 0)
    }

    // ── tasks ─────────────────────────────────────────────────────────────────

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!("SELECT {} FROM tasks ORDER BY id", TASK_COLUMNS))?;
        let rows = stmt.query_map([], row_to_task)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn tasks_for_commessa(&self, commessa_id: i64) -> Result<Vec<Task>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {} FROM tasks WHERE commessa_id = ?1 ORDER BY id",
            TASK_COLUMNS
        ))?;
        let rows = stmt.query_map(rusqlite::params![commessa_id], row_to_task)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS),
            rusqlite::params![id],
            row_to_task,
        ) {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn create_task(&self, new: &NewTask) -> Result<Task> {
        if !self.commessa_exists(new.commessa_id)? {
            return Err(PlannerError::NotFound { entity: "commessa", id: new.commessa_id });
        }
        {
            let db = self.db.lock().unwrap();
            let funzione_found: bool = db
                .query_row(
                    "SELECT 1 FROM funzioni WHERE id = ?1",
                    rusqlite::params![new.funzione_id],
                    |_| Ok(true),
                )
                .unwrap_or(false);
            if !funzione_found {
                return Err(PlannerError::NotFound { entity: "funzione", id: new.funzione_id });
            }
        }

        let db = self.db.lock().unwrap();
        let now = now_rfc3339();
        let skills = new
            .skills
            .as_ref()
            .map(|s| serde_json::to_string(s).unwrap_or_else(|_| "[]".to_string()));
        db.execute(
            "INSERT INTO tasks (nome, descrizione, commessa_id, stato, durata_prevista,
             numero_risorse, skills, data_inizio, data_fine, location_id, funzione_id,
             priorita, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
            rusqlite::params![
                new.nome,
                new.descrizione,
                new.commessa_id,
                new.stato.as_str(),
                new.durata_prevista,
                new.numero_risorse,
                skills,
                new.data_inizio,
                new.data_fine,
                new.location_id,
                new.funzione_id,
                new.priorita.as_str(),
                now
            ],
        )?;
        let id = db.last_insert_rowid();
        info!(id, nome = %new.nome, commessa_id = new.commessa_id, "task created");
        db.query_row(
            &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS),
            rusqlite::params![id],
            row_to_task,
        )
        .map_err(PlannerError::from)
    }

    pub fn update_task(&self, id: i64, upd: &UpdateTask) -> Result<Option<Task>> {
        let current = match self.get_task(id)? {
            Some(t) => t,
            None => return Ok(None),
        };

        let nome = upd.nome.clone().unwrap_or(current.nome);
        let descrizione = upd.descrizione.clone().or(current.descrizione);
        let stato = upd.stato.unwrap_or(current.stato);
        let durata_prevista = upd.durata_prevista.or(current.durata_prevista);
        let numero_risorse = upd.numero_risorse.unwrap_or(current.numero_risorse);
        let skills = upd.skills.clone().or(current.skills);
        let data_inizio = upd.data_inizio.clone().or(current.data_inizio);
        let data_fine = upd.data_fine.clone().or(current.data_fine);
        let location_id = upd.location_id.or(current.location_id);
        let funzione_id = upd.funzione_id.unwrap_or(current.funzione_id);
        let priorita = upd.priorita.unwrap_or(current.priorita);

        let skills_json =
            skills.map(|s| serde_json::to_string(&s).unwrap_or_else(|_| "[]".to_string()));

        let db = self.db.lock().unwrap();
        db.execute(
            "UPDATE tasks SET nome=?1, descrizione=?2, stato=?3, durata_prevista=?4,
             numero_risorse=?5, skills=?6, data_inizio=?7, data_fine=?8, location_id=?9,
             funzione_id=?10, priorita=?11, updated_at=?12 WHERE id=?13",
            rusqlite::params![
                nome,
                descrizione,
                stato.as_str(),
                durata_prevista,
                numero_risorse,
                skills_json,
                data_inizio,
                data_fine,
                location_id,
                funzione_id,
                priorita.as_str(),
                now_rfc3339(),
                id
            ],
        )?;
        db.query_row(
            &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS),
            rusqlite::params![id],
            row_to_task,
        )
        .map(Some)
        .map_err(PlannerError::from)
    }

    pub fn delete_task(&self, id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let rows = db.execute("DELETE FROM tasks WHERE id = ?1", rusqlite::params![id])?;
        Ok(rows > 0)
    }

    // ── personale / assignments ───────────────────────────────────────────────

    /// Employees currently assigned to a task.
    pub fn personale_for_task(&self, task_id: i64) -> Result<Vec<AssignedDipendente>> {
        if self.get_task(task_id)?.is_none() {
            return Err(PlannerError::NotFound { entity: "task", id: task_id });
        }
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT d.id, d.nome, d.cognome, d.email, d.ruolo
             FROM dipendenti d
             JOIN task_dipendenti td ON td.dipendente_id = d.id
             WHERE td.task_id = ?1
             ORDER BY d.cognome, d.nome",
        )?;
        let rows = stmt.query_map(rusqlite::params![task_id], |row| {
            Ok(AssignedDipendente {
                id: row.get(0)?,
                nome: row.get(1)?,
                cognome: row.get(2)?,
                email: row.get(3)?,
                ruolo: row.get(4)?,
            })
        })?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Replace the full assignment set of a task with `dipendente_ids`.
    /// Every id must name an existing employee.
    pub fn set_task_personale(
        &self,
        task_id: i64,
        dipendente_ids: &[i64],
    ) -> Result<Vec<AssignedDipendente>> {
        if self.get_task(task_id)?.is_none() {
            return Err(PlannerError::NotFound { entity: "task", id: task_id });
        }
        {
            let db = self.db.lock().unwrap();
            for &id in dipendente_ids {
                let found: bool = db
                    .query_row(
                        "SELECT 1 FROM dipendenti WHERE id = ?1",
                        rusqlite::params![id],
                        |_| Ok(true),
                    )
                    .unwrap_or(false);
                if !found {
                    return Err(PlannerError::UnknownDipendenti);
                }
            }

            let now = now_rfc3339();
            db.execute(
                "DELETE FROM task_dipendenti WHERE task_id = ?1",
                rusqlite::params![task_id],
            )?;
            for &id in dipendente_ids {
                db.execute(
                    "INSERT INTO task_dipendenti (task_id, dipendente_id, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?3)",
                    rusqlite::params![task_id, id, now],
                )?;
            }
            info!(task_id, count = dipendente_ids.len(), "task personale replaced");
        }
        self.personale_for_task(task_id)
    }

    /// Resource planner listing: every assignment with its task, commessa and
    /// dipendente, ordered by task start date then employee surname.
    pub fn list_assignments(&self, filter: &AssignmentFilter) -> Result<Vec<AssignmentDetail>> {
        let mut sql = format!(
            "SELECT td.id, td.task_id, td.dipendente_id, td.ruolo, td.note, td.created_at,
                    td.updated_at,
                    {task_cols},
                    {commessa_cols},
                    d.id, d.nome, d.cognome, d.email, d.ruolo
             FROM task_dipendenti td
             JOIN tasks t ON t.id = td.task_id
             JOIN commesse c ON c.id = t.commessa_id
             JOIN dipendenti d ON d.id = td.dipendente_id
             WHERE 1=1",
            task_cols = prefixed(TASK_COLUMNS, "t"),
            commessa_cols = prefixed(COMMESSA_COLUMNS, "c"),
        );
        let mut params: Vec<i64> = Vec::new();
        if let Some(task_id) = filter.task_id {
            params.push(task_id);
            sql.push_str(&format!(" AND td.task_id = ?{}", params.len()));
        }
        if let Some(commessa_id) = filter.commessa_id {
            params.push(commessa_id);
            sql.push_str(&format!(" AND t.commessa_id = ?{}", params.len()));
        }
        if let Some(dipendente_id) = filter.dipendente_id {
            params.push(dipendente_id);
            sql.push_str(&format!(" AND td.dipendente_id = ?{}", params.len()));
        }
        sql.push_str(" ORDER BY t.data_inizio, d.cognome");

        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), |row| {
            let assignment = row_to_assignment(row)?;
            // task columns start at 7, commessa at 22, dipendente at 32
            let stato = TaskStato::parse(&row.get::<_, String>(7 + 4)?).unwrap_or_default();
            let skills = row
                .get::<_, Option<String>>(7 + 7)?
                .and_then(|s| serde_json::from_str(&s).ok());
            let priorita =
                TaskPriorita::parse(&row.get::<_, String>(7 + 12)?).unwrap_or_default();
            let task = Task {
                id: row.get(7)?,
                nome: row.get(8)?,
                descrizione: row.get(9)?,
                commessa_id: row.get(10)?,
                stato,
                durata_prevista: row.get(12)?,
                numero_risorse: row.get(13)?,
                skills,
                data_inizio: row.get(15)?,
                data_fine: row.get(16)?,
                location_id: row.get(17)?,
                funzione_id: row.get(18)?,
                priorita,
                created_at: row.get(20)?,
                updated_at: row.get(21)?,
            };
            let commessa_stato =
                CommessaStato::parse(&row.get::<_, String>(22 + 7)?).unwrap_or_default();
            let commessa = Commessa {
                id: row.get(22)?,
                codice: row.get(23)?,
                descrizione: row.get(24)?,
                cliente: row.get(25)?,
                data_inizio: row.get(26)?,
                data_fine: row.get(27)?,
                budget: row.get(28)?,
                stato: commessa_stato,
                created_at: row.get(30)?,
                updated_at: row.get(31)?,
            };
            let dipendente = AssignedDipendente {
                id: row.get(32)?,
                nome: row.get(33)?,
                cognome: row.get(34)?,
                email: row.get(35)?,
                ruolo: row.get(36)?,
            };
            Ok(AssignmentDetail { assignment, task, commessa, dipendente })
        })?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Create a single assignment. Rejects unknown task/dipendente and
    /// duplicate (task, dipendente) pairs.
    pub fn create_assignment(&self, new: &NewAssignment) -> Result<Assignment> {
        if self.get_task(new.task_id)?.is_none() {
            return Err(PlannerError::NotFound { entity: "task", id: new.task_id });
        }
        let db = self.db.lock().unwrap();
        let dipendente_found: bool = db
            .query_row(
                "SELECT 1 FROM dipendenti WHERE id = ?1",
                rusqlite::params![new.dipendente_id],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if !dipendente_found {
            return Err(PlannerError::NotFound { entity: "dipendente", id: new.dipendente_id });
        }

        let duplicate: bool = db
            .query_row(
                "SELECT 1 FROM task_dipendenti WHERE task_id = ?1 AND dipendente_id = ?2",
                rusqlite::params![new.task_id, new.dipendente_id],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if duplicate {
            return Err(PlannerError::DuplicateAssignment {
                task_id: new.task_id,
                dipendente_id: new.dipendente_id,
            });
        }

        let now = now_rfc3339();
        db.execute(
            "INSERT INTO task_dipendenti (task_id, dipendente_id, ruolo, note, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![new.task_id, new.dipendente_id, new.ruolo, new.note, now],
        )?;
        let id = db.last_insert_rowid();
        db.query_row(
            "SELECT id, task_id, dipendente_id, ruolo, note, created_at, updated_at
             FROM task_dipendenti WHERE id = ?1",
            rusqlite::params![id],
            row_to_assignment,
        )
        .map_err(PlannerError::from)
    }

    /// Update the ruolo/note annotation of an assignment.
    pub fn update_assignment(
        &self,
        id: i64,
        ruolo: Option<&str>,
        note: Option<&str>,
    ) -> Result<Option<Assignment>> {
        let db = self.db.lock().unwrap();
        let rows = db.execute(
            "UPDATE task_dipendenti
             SET ruolo = COALESCE(?1, ruolo), note = COALESCE(?2, note), updated_at = ?3
             WHERE id = ?4",
            rusqlite::params![ruolo, note, now_rfc3339(), id],
        )?;
        if rows == 0 {
            return Ok(None);
        }
        db.query_row(
            "SELECT id, task_id, dipendente_id, ruolo, note, created_at, updated_at
             FROM task_dipendenti WHERE id = ?1",
            rusqlite::params![id],
            row_to_assignment,
        )
        .map(Some)
        .map_err(PlannerError::from)
    }

    pub fn delete_assignment(&self, id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let rows =
            db.execute("DELETE FROM task_dipendenti WHERE id = ?1", rusqlite::params![id])?;
        Ok(rows > 0)
    }
}

/// Expand "a, b, c" into "p.a, p.b, p.c" for join queries.
fn prefixed(columns: &str, prefix: &str) -> String {
    columns
        .split(',')
        .map(|c| format!("{}.{}", prefix, c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_full_schema() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        timbrapp_users::db::init_db(&conn).unwrap();
        timbrapp_workforce::db::init_db(&conn).unwrap();
        crate::db::init_db(&conn).unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        conn
    }

    struct Fixture {
        planner: PlannerStore,
        commessa: Commessa,
        funzione_id: i64,
        dipendente_id: i64,
    }

    fn fixture() -> Fixture {
        let conn = open_full_schema();
        // in-memory DBs are per-connection, so seed workforce rows with raw SQL
        conn.execute(
            "INSERT INTO funzioni (nome, created_at, updated_at) VALUES ('Impianti', '2025', '2025')",
            [],
        )
        .unwrap();
        let funzione_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO dipendenti (nome, cognome, email, ruolo, skills, created_at, updated_at)
             VALUES ('Mario', 'Rossi', 'mario@example.com', 'Elettricista', '[]', '2025', '2025')",
            [],
        )
        .unwrap();
        let dipendente_id = conn.last_insert_rowid();

        let planner = PlannerStore::new(conn);
        let commessa = planner
            .create_commessa(&NewCommessa {
                codice: "C-001".to_string(),
                descrizione: "Cantiere nord".to_string(),
                cliente: "ACME".to_string(),
                data_inizio: "2025-05-01".to_string(),
                data_fine: None,
                budget: Some(10_000.0),
                stato: CommessaStato::Attiva,
            })
            .unwrap();
        Fixture { planner, commessa, funzione_id, dipendente_id }
    }

    fn new_task(f: &Fixture, nome: &str) -> NewTask {
        NewTask {
            nome: nome.to_string(),
            descrizione: None,
            commessa_id: f.commessa.id,
            stato: TaskStato::Attivo,
            durata_prevista: Some(8.0),
            numero_risorse: 2,
            skills: Some(vec!["cablaggio".to_string()]),
            data_inizio: Some("2025-05-02".to_string()),
            data_fine: None,
            location_id: None,
            funzione_id: f.funzione_id,
            priorita: TaskPriorita::Alta,
        }
    }

    #[test]
    fn commessa_detail_includes_tasks_and_locations() {
        let f = fixture();
        f.planner.create_task(&new_task(&f, "Posa cavi")).unwrap();
        f.planner
            .create_location(
                f.commessa.id,
                &NewLocation {
                    nome: "Sede A".to_string(),
                    indirizzo: Some("Via Roma 1".to_string()),
                    lat: Some(45.07),
                    lng: Some(7.69),
                },
            )
            .unwrap();

        let detail = f.planner.get_commessa(f.commessa.id).unwrap().unwrap();
        assert_eq!(detail.tasks.len(), 1);
        assert_eq!(detail.locations.len(), 1);
        assert_eq!(detail.tasks[0].priorita, TaskPriorita::Alta);
    }

    #[test]
    fn only_active_commesse_listed() {
        let f = fixture();
        f.planner
            .create_commessa(&NewCommessa {
                codice: "C-002".to_string(),
                descrizione: "Chiusa".to_string(),
                cliente: "ACME".to_string(),
                data_inizio: "2025-01-01".to_string(),
                data_fine: None,
                budget: None,
                stato: CommessaStato::Completata,
            })
            .unwrap();

        let attive = f.planner.list_commesse_attive().unwrap();
        assert_eq!(attive.len(), 1);
        assert_eq!(attive[0].commessa.codice, "C-001");
    }

    #[test]
    fn task_requires_existing_commessa_and_funzione() {
        let f = fixture();
        let mut bad = new_task(&f, "X");
        bad.commessa_id = 999;
        assert!(matches!(
            f.planner.create_task(&bad).unwrap_err(),
            PlannerError::NotFound { entity: "commessa", .. }
        ));

        let mut bad = new_task(&f, "X");
        bad.funzione_id = 999;
        assert!(matches!(
            f.planner.create_task(&bad).unwrap_err(),
            PlannerError::NotFound { entity: "funzione", .. }
        ));
    }

    #[test]
    fn partial_task_update_keeps_other_fields() {
        let f = fixture();
        let task = f.planner.create_task(&new_task(&f, "Posa cavi")).unwrap();
        let updated = f
            .planner
            .update_task(
                task.id,
                &UpdateTask { stato: Some(TaskStato::Completato), ..Default::default() },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.stato, TaskStato::Completato);
        assert_eq!(updated.nome, "Posa cavi");
        assert_eq!(updated.numero_risorse, 2);
    }

    #[test]
    fn personale_replacement_and_duplicates() {
        let f = fixture();
        let task = f.planner.create_task(&new_task(&f, "Posa cavi")).unwrap();

        let personale =
            f.planner.set_task_personale(task.id, &[f.dipendente_id]).unwrap();
        assert_eq!(personale.len(), 1);
        assert_eq!(personale[0].cognome, "Rossi");

        // Replacing with an empty set clears assignments.
        assert!(f.planner.set_task_personale(task.id, &[]).unwrap().is_empty());

        // Unknown ids are rejected wholesale.
        assert!(matches!(
            f.planner.set_task_personale(task.id, &[f.dipendente_id, 999]),
            Err(PlannerError::UnknownDipendenti)
        ));
    }

    #[test]
    fn assignment_lifecycle() {
        let f = fixture();
        let task = f.planner.create_task(&new_task(&f, "Posa cavi")).unwrap();
        let a = f
            .planner
            .create_assignment(&NewAssignment {
                task_id: task.id,
                dipendente_id: f.dipendente_id,
                ruolo: Some("Capo squadra".to_string()),
                note: None,
            })
            .unwrap();

        assert!(matches!(
            f.planner.create_assignment(&NewAssignment {
                task_id: task.id,
                dipendente_id: f.dipendente_id,
                ruolo: None,
                note: None,
            }),
            Err(PlannerError::DuplicateAssignment { .. })
        ));

        let listed = f.planner.list_assignments(&AssignmentFilter::default()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].commessa.codice, "C-001");
        assert_eq!(listed[0].dipendente.cognome, "Rossi");

        let filtered = f
            .planner
            .list_assignments(&AssignmentFilter {
                dipendente_id: Some(999),
                ..Default::default()
            })
            .unwrap();
        assert!(filtered.is_empty());

        let updated = f
            .planner
            .update_assignment(a.id, Some("Operaio"), Some("turno serale"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.ruolo.as_deref(), Some("Operaio"));

        assert!(f.planner.delete_assignment(a.id).unwrap());
        assert!(!f.planner.delete_assignment(a.id).unwrap());
    }

    #[test]
    fn deleting_commessa_cascades_tasks() {
        let f = fixture();
        let task = f.planner.create_task(&new_task(&f, "Posa cavi")).unwrap();
        assert!(f.planner.delete_commessa(f.commessa.id).unwrap());
        assert!(f.planner.get_task(task.id).unwrap().is_none());
    }
}
