use std::sync::Mutex;

use rusqlite::Connection;
use timbrapp_core::types::now_rfc3339;
use tracing::{info, warn};

use crate::error::{Result, TrackingError};
use crate::types::*;

const SHIFT_COLUMNS: &str = "id, user_id, start_time, end_time, date, role, location, notes, \
     commessa_id, task_id, resource_id, created_at, updated_at";

const TIMBRATURA_COLUMNS: &str =
    "id, user_id, type, timestamp, lat, lon, synced_from_offline, created_at, updated_at";

const REQUEST_COLUMNS: &str =
    "id, user_id, type, start_date, end_date, note, status, created_at, updated_at";

fn row_to_shift(row: &rusqlite::Row<'_>) -> rusqlite::Result<Shift> {
    Ok(Shift {
        id: row.get(0)?,
        user_id: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        date: row.get(4)?,
        role: row.get(5)?,
        location: row.get(6)?,
        notes: row.get(7)?,
        commessa_id: row.get(8)?,
        task_id: row.get(9)?,
        resource_id: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

// Joined listing row: shift columns, then user, commessa and task projections.
fn row_to_shift_detail(row: &rusqlite::Row<'_>) -> rusqlite::Result<ShiftDetail> {
    let shift = row_to_shift(row)?;
    let user = ShiftUser {
        id: row.get(13)?,
        nome: row.get(14)?,
        email: row.get(15)?,
        role: row.get(16)?,
    };
    let commessa = match row.get::<_, Option<i64>>(17)? {
        Some(id) => Some(ShiftCommessa {
            id,
            codice: row.get(18)?,
            descrizione: row.get(19)?,
            cliente: row.get(20)?,
            stato: row.get(21)?,
        }),
        None => None,
    };
    let task = match row.get::<_, Option<i64>>(22)? {
        Some(id) => Some(ShiftTask {
            id,
            nome: row.get(23)?,
            descrizione: row.get(24)?,
            stato: row.get(25)?,
            durata_prevista: row.get(26)?,
            numero_risorse: row.get(27)?,
            skills: row
                .get::<_, Option<String>>(28)?
                .and_then(|s| serde_json::from_str(&s).ok()),
        }),
        None => None,
    };
    Ok(ShiftDetail { shift, user, commessa, task })
}

fn row_to_timbratura(row: &rusqlite::Row<'_>) -> rusqlite::Result<Timbratura> {
    let punch_type = PunchType::parse(&row.get::<_, String>(2)?).unwrap_or(PunchType::Start);
    Ok(Timbratura {
        id: row.get(0)?,
        user_id: row.get(1)?,
        punch_type,
        timestamp: row.get(3)?,
        lat: row.get(4)?,
        lon: row.get(5)?,
        synced_from_offline: row.get::<_, i64>(6)? != 0,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn row_to_request(row: &rusqlite::Row<'_>) -> rusqlite::Result<Request> {
    let request_type = RequestType::parse(&row.get::<_, String>(2)?).unwrap_or(RequestType::Ferie);
    let status = RequestStatus::parse(&row.get::<_, String>(6)?).unwrap_or_default();
    Ok(Request {
        id: row.get(0)?,
        user_id: row.get(1)?,
        request_type,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        note: row.get(5)?,
        status,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

const SHIFT_DETAIL_SELECT: &str = "SELECT s.id, s.user_id, s.start_time, s.end_time, s.date, \
     s.role, s.location, s.notes, s.commessa_id, s.task_id, s.resource_id, s.created_at, \
     s.updated_at, \
     u.id, u.nome, u.email, u.role, \
     c.id, c.codice, c.descrizione, c.cliente, c.stato, \
     t.id, t.nome, t.descrizione, t.stato, t.durata_prevista, t.numero_risorse, t.skills \
     FROM shifts s \
     JOIN users u ON u.id = s.user_id \
     LEFT JOIN commesse c ON c.id = s.commessa_id \
     LEFT JOIN tasks t ON t.id = s.task_id";

pub struct TrackingStore {
    db: Mutex<Connection>,
}

impl TrackingStore {
    pub fn new(conn: Connection) -> Self {
        Self { db: Mutex::new(conn) }
    }

    // ── shifts ────────────────────────────────────────────────────────────────

    pub fn list_shifts(&self, filter: &ShiftFilter) -> Result<Vec<ShiftDetail>> {
        let mut sql = format!("{} WHERE 1=1", SHIFT_DETAIL_SELECT);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(user_id) = filter.user_id {
            params.push(Box::new(user_id));
            sql.push_str(&format!(" AND s.user_id = ?{}", params.len()));
        }
        if let Some(date) = &filter.date {
            params.push(Box::new(date.clone()));
            sql.push_str(&format!(" AND s.date = ?{}", params.len()));
        }
        if let Some(from) = &filter.date_from {
            params.push(Box::new(from.clone()));
            sql.push_str(&format!(" AND s.date >= ?{}", params.len()));
        }
        if let Some(to) = &filter.date_to {
            params.push(Box::new(to.clone()));
            sql.push_str(&format!(" AND s.date <= ?{}", params.len()));
        }
        if let Some(commessa_id) = filter.commessa_id {
            params.push(Box::new(commessa_id));
            sql.push_str(&format!(" AND s.commessa_id = ?{}", params.len()));
        }
        if let Some(task_id) = filter.task_id {
            params.push(Box::new(task_id));
            sql.push_str(&format!(" AND s.task_id = ?{}", params.len()));
        }
        sql.push_str(" ORDER BY s.date, s.start_time");

        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
            row_to_shift_detail,
        )?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn get_shift(&self, id: i64) -> Result<Option<ShiftDetail>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            &format!("{} WHERE s.id = ?1", SHIFT_DETAIL_SELECT),
            rusqlite::params![id],
            row_to_shift_detail,
        ) {
            Ok(s) => Ok(Some(s)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn create_shift(&self, new: &NewShift) -> Result<ShiftDetail> {
        self.check_shift_refs(new.user_id, new.commessa_id, new.task_id)?;
        let resource_id = new.resource_id.unwrap_or(new.user_id);

        let id = {
            let db = self.db.lock().unwrap();
            let now = now_rfc3339();
            db.execute(
                "INSERT INTO shifts (user_id, start_time, end_time, date, role, location,
                 notes, commessa_id, task_id, resource_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
                rusqlite::params![
                    new.user_id,
                    new.start_time,
                    new.end_time,
                    new.date,
                    new.role,
                    new.location,
                    new.notes,
                    new.commessa_id,
                    new.task_id,
                    resource_id,
                    now
                ],
            )?;
            db.last_insert_rowid()
        };
        info!(id, user_id = new.user_id, date = %new.date, "shift created");
        self.get_shift(id)?
            .ok_or(TrackingError::NotFound { entity: "shift", id })
    }

    pub fn update_shift(&self, id: i64, upd: &UpdateShift) -> Result<Option<ShiftDetail>> {
        let current = {
            let db = self.db.lock().unwrap();
            match db.query_row(
                &format!("SELECT {} FROM shifts WHERE id = ?1", SHIFT_COLUMNS),
                rusqlite::params![id],
                row_to_shift,
            ) {
                Ok(s) => s,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        };

        let user_id = upd.user_id.unwrap_or(current.user_id);
        let commessa_id = upd.commessa_id.or(current.commessa_id);
        let task_id = upd.task_id.or(current.task_id);
        self.check_shift_refs(user_id, upd.commessa_id, upd.task_id)?;

        let resource_id = upd.resource_id.unwrap_or(current.resource_id);
        let start_time = upd.start_time.clone().unwrap_or(current.start_time);
        let end_time = upd.end_time.clone().unwrap_or(current.end_time);
        let date = upd.date.clone().unwrap_or(current.date);
        let role = upd.role.clone().or(current.role);
        let location = upd.location.clone().or(current.location);
        let notes = upd.notes.clone().or(current.notes);

        {
            let db = self.db.lock().unwrap();
            db.execute(
                "UPDATE shifts SET user_id=?1, start_time=?2, end_time=?3, date=?4, role=?5,
                 location=?6, notes=?7, commessa_id=?8, task_id=?9, resource_id=?10,
                 updated_at=?11 WHERE id=?12",
                rusqlite::params![
                    user_id,
                    start_time,
                    end_time,
                    date,
                    role,
                    location,
                    notes,
                    commessa_id,
                    task_id,
                    resource_id,
                    now_rfc3339(),
                    id
                ],
            )?;
        }
        self.get_shift(id)
    }

    pub fn delete_shift(&self, id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let rows = db.execute("DELETE FROM shifts WHERE id = ?1", rusqlite::params![id])?;
        Ok(rows > 0)
    }

    /// Referenced user/commessa/task must exist; a task sent together with a
    /// commessa must belong to it.
    fn check_shift_refs(
        &self,
        user_id: i64,
        commessa_id: Option<i64>,
        task_id: Option<i64>,
    ) -> Result<()> {
        let db = self.db.lock().unwrap();
        let user_found: bool = db
            .query_row("SELECT 1 FROM users WHERE id = ?1", rusqlite::params![user_id], |_| {
                Ok(true)
            })
            .unwrap_or(false);
        if !user_found {
            return Err(TrackingError::NotFound { entity: "user", id: user_id });
        }
        if let Some(cid) = commessa_id {
            let found: bool = db
                .query_row("SELECT 1 FROM commesse WHERE id = ?1", rusqlite::params![cid], |_| {
                    Ok(true)
                })
                .unwrap_or(false);
            if !found {
                return Err(TrackingError::NotFound { entity: "commessa", id: cid });
            }
        }
        if let Some(tid) = task_id {
            let task_commessa: Option<i64> = match db.query_row(
                "SELECT commessa_id FROM tasks WHERE id = ?1",
                rusqlite::params![tid],
                |row| row.get(0),
            ) {
                Ok(c) => Some(c),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e.into()),
            };
            let Some(task_commessa) = task_commessa else {
                return Err(TrackingError::NotFound { entity: "task", id: tid });
            };
            if let Some(cid) = commessa_id {
                if task_commessa != cid {
                    return Err(TrackingError::TaskCommessaMismatch {
                        task_id: tid,
                        commessa_id: cid,
                    });
                }
            }
        }
        Ok(())
    }

    /// Today's shifts grouped per commessa, ordered by commessa codice then
    /// start time. Shifts with no commessa land in a trailing placeholder.
    pub fn shifts_today_by_commessa(&self, today: &str) -> Result<Vec<CommessaShiftGroup>> {
        let details = self.list_shifts(&ShiftFilter {
            date: Some(today.to_string()),
            ..Default::default()
        })?;

        let mut ordered: Vec<ShiftDetail> = details;
        ordered.sort_by(|a, b| {
            let ka = a.commessa.as_ref().map(|c| c.codice.clone());
            let kb = b.commessa.as_ref().map(|c| c.codice.clone());
            // None sorts last
            match (ka, kb) {
                (Some(x), Some(y)) => x.cmp(&y).then(a.shift.start_time.cmp(&b.shift.start_time)),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.shift.start_time.cmp(&b.shift.start_time),
            }
        });

        let mut groups: Vec<CommessaShiftGroup> = Vec::new();
        for detail in ordered {
            let key = detail.shift.commessa_id;
            let turno = GroupTurno {
                id: detail.shift.id,
                user: detail.user,
                start_time: detail.shift.start_time,
                end_time: detail.shift.end_time,
                role: detail.shift.role,
                location: detail.shift.location,
                notes: detail.shift.notes,
            };
            match groups.iter_mut().find(|g| g.commessa.id == key) {
                Some(group) => group.turni.push(turno),
                None => {
                    let commessa = match detail.commessa {
                        Some(c) => GroupCommessa {
                            id: Some(c.id),
                            codice: c.codice,
                            descrizione: c.descrizione,
                        },
                        None => GroupCommessa {
                            id: None,
                            codice: "N/A".to_string(),
                            descrizione: "Senza commessa".to_string(),
                        },
                    };
                    groups.push(CommessaShiftGroup { commessa, turni: vec![turno] });
                }
            }
        }
        Ok(groups)
    }

    // ── timbrature ────────────────────────────────────────────────────────────

    /// Punches of one user, oldest first.
    pub fn list_timbrature(&self, user_id: i64) -> Result<Vec<Timbratura>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {} FROM timbrature WHERE user_id = ?1 ORDER BY timestamp",
            TIMBRATURA_COLUMNS
        ))?;
        let rows = stmt.query_map(rusqlite::params![user_id], row_to_timbratura)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Record a punch stamped with the server clock.
    pub fn create_timbratura(&self, user_id: i64, new: &NewTimbratura) -> Result<Timbratura> {
        self.insert_timbratura(user_id, new.punch_type, &now_rfc3339(), new.lat, new.lon, false)
    }

    fn insert_timbratura(
        &self,
        user_id: i64,
        punch_type: PunchType,
        timestamp: &str,
        lat: Option<f64>,
        lon: Option<f64>,
        synced_from_offline: bool,
    ) -> Result<Timbratura> {
        let db = self.db.lock().unwrap();
        let now = now_rfc3339();
        db.execute(
            "INSERT INTO timbrature (user_id, type, timestamp, lat, lon, synced_from_offline,
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            rusqlite::params![
                user_id,
                punch_type.as_str(),
                timestamp,
                lat,
                lon,
                synced_from_offline as i64,
                now
            ],
        )?;
        let id = db.last_insert_rowid();
        db.query_row(
            &format!("SELECT {} FROM timbrature WHERE id = ?1", TIMBRATURA_COLUMNS),
            rusqlite::params![id],
            row_to_timbratura,
        )
        .map_err(TrackingError::from)
    }

    /// Import a batch of offline-queued punches. Each entry succeeds or fails
    /// on its own; the batch never aborts.
    pub fn sync_offline(&self, user_id: i64, entries: &[PendingEntry]) -> Vec<SyncResult> {
        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            let (punch_type, timestamp) = match (&entry.punch_type, &entry.timestamp) {
                (Some(t), Some(ts)) => (t.as_str(), ts.as_str()),
                _ => {
                    results.push(SyncResult {
                        id: entry.id.clone(),
                        success: false,
                        server_id: None,
                        error: Some("Dati mancanti".to_string()),
                    });
                    continue;
                }
            };
            let Some(punch_type) = PunchType::parse(punch_type) else {
                results.push(SyncResult {
                    id: entry.id.clone(),
                    success: false,
                    server_id: None,
                    error: Some("Tipo timbratura non valido".to_string()),
                });
                continue;
            };
            match self.insert_timbratura(user_id, punch_type, timestamp, entry.lat, entry.lon, true)
            {
                Ok(t) => results.push(SyncResult {
                    id: entry.id.clone(),
                    success: true,
                    server_id: Some(t.id),
                    error: None,
                }),
                Err(e) => {
                    warn!(user_id, error = %e, "offline punch import failed");
                    results.push(SyncResult {
                        id: entry.id.clone(),
                        success: false,
                        server_id: None,
                        error: Some("Errore salvataggio".to_string()),
                    });
                }
            }
        }
        info!(
            user_id,
            total = entries.len(),
            ok = results.iter().filter(|r| r.success).count(),
            "offline sync processed"
        );
        results
    }

    // ── requests ──────────────────────────────────────────────────────────────

    /// Leave/permit requests of one user, newest first.
    pub fn list_requests(&self, user_id: i64) -> Result<Vec<Request>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {} FROM requests WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
            REQUEST_COLUMNS
        ))?;
        let rows = stmt.query_map(rusqlite::params![user_id], row_to_request)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn create_request(&self, user_id: i64, new: &NewRequest) -> Result<Request> {
        let db = self.db.lock().unwrap();
        let now = now_rfc3339();
        db.execute(
            "INSERT INTO requests (user_id, type, start_date, end_date, note, status,
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, ?6)",
            rusqlite::params![
                user_id,
                new.request_type.as_str(),
                new.start_date,
                new.end_date,
                new.note,
                now
            ],
        )?;
        let id = db.last_insert_rowid();
        info!(id, user_id, request_type = new.request_type.as_str(), "request created");
        db.query_row(
            &format!("SELECT {} FROM requests WHERE id = ?1", REQUEST_COLUMNS),
            rusqlite::params![id],
            row_to_request,
        )
        .map_err(TrackingError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_full_schema() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        timbrapp_users::db::init_db(&conn).unwrap();
        timbrapp_workforce::db::init_db(&conn).unwrap();
        timbrapp_planner::db::init_db(&conn).unwrap();
        crate::db::init_db(&conn).unwrap();
        conn
    }

    struct Fixture {
        store: TrackingStore,
        user_id: i64,
        commessa_id: i64,
        task_id: i64,
    }

    fn fixture() -> Fixture {
        let conn = open_full_schema();
        conn.execute(
            "INSERT INTO users (nome, email, password_hash, role, created_at, updated_at)
             VALUES ('Mario', 'mario@example.com', 'x', 'user', '2025', '2025')",
            [],
        )
        .unwrap();
        let user_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO commesse (codice, descrizione, cliente, data_inizio, stato,
             created_at, updated_at)
             VALUES ('C-001', 'Cantiere nord', 'ACME', '2025-05-01', 'attiva', '2025', '2025')",
            [],
        )
        .unwrap();
        let commessa_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO funzioni (nome, created_at, updated_at) VALUES ('Impianti', '2025', '2025')",
            [],
        )
        .unwrap();
        let funzione_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO tasks (nome, commessa_id, stato, numero_risorse, funzione_id,
             priorita, created_at, updated_at)
             VALUES ('Posa cavi', ?1, 'attivo', 1, ?2, 'media', '2025', '2025')",
            rusqlite::params![commessa_id, funzione_id],
        )
        .unwrap();
        let task_id = conn.last_insert_rowid();

        Fixture { store: TrackingStore::new(conn), user_id, commessa_id, task_id }
    }

    fn new_shift(f: &Fixture, date: &str, start: &str) -> NewShift {
        NewShift {
            user_id: f.user_id,
            resource_id: None,
            start_time: start.to_string(),
            end_time: "17:00".to_string(),
            date: date.to_string(),
            role: Some("Elettricista".to_string()),
            location: None,
            notes: None,
            commessa_id: Some(f.commessa_id),
            task_id: Some(f.task_id),
        }
    }

    #[test]
    fn shift_is_decorated_and_resource_defaults_to_user() {
        let f = fixture();
        let created = f.store.create_shift(&new_shift(&f, "2025-05-02", "08:00")).unwrap();
        assert_eq!(created.shift.resource_id, f.user_id);
        assert_eq!(created.user.nome, "Mario");
        assert_eq!(created.commessa.as_ref().unwrap().codice, "C-001");
        assert_eq!(created.task.as_ref().unwrap().nome, "Posa cavi");
    }

    #[test]
    fn shift_filters_and_ordering() {
        let f = fixture();
        f.store.create_shift(&new_shift(&f, "2025-05-03", "14:00")).unwrap();
        f.store.create_shift(&new_shift(&f, "2025-05-02", "08:00")).unwrap();
        f.store.create_shift(&new_shift(&f, "2025-05-03", "08:00")).unwrap();

        let all = f.store.list_shifts(&ShiftFilter::default()).unwrap();
        let keys: Vec<_> = all
            .iter()
            .map(|s| (s.shift.date.clone(), s.shift.start_time.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2025-05-02".to_string(), "08:00".to_string()),
                ("2025-05-03".to_string(), "08:00".to_string()),
                ("2025-05-03".to_string(), "14:00".to_string()),
            ]
        );

        let ranged = f
            .store
            .list_shifts(&ShiftFilter {
                date_from: Some("2025-05-03".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(ranged.len(), 2);

        let none = f
            .store
            .list_shifts(&ShiftFilter { user_id: Some(999), ..Default::default() })
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn shift_rejects_bad_references() {
        let f = fixture();
        let mut bad = new_shift(&f, "2025-05-02", "08:00");
        bad.user_id = 999;
        assert!(matches!(
            f.store.create_shift(&bad).unwrap_err(),
            TrackingError::NotFound { entity: "user", .. }
        ));

        // Task from another commessa is a mismatch, not a missing row.
        let conn = f.store.db.lock().unwrap();
        conn.execute(
            "INSERT INTO commesse (codice, descrizione, cliente, data_inizio, stato,
             created_at, updated_at)
             VALUES ('C-002', 'Altro', 'ACME', '2025-05-01', 'attiva', '2025', '2025')",
            [],
        )
        .unwrap();
        let other_commessa = conn.last_insert_rowid();
        drop(conn);

        let mut mismatched = new_shift(&f, "2025-05-02", "08:00");
        mismatched.commessa_id = Some(other_commessa);
        assert!(matches!(
            f.store.create_shift(&mismatched).unwrap_err(),
            TrackingError::TaskCommessaMismatch { .. }
        ));
    }

    #[test]
    fn today_grouping_buckets_missing_commessa() {
        let f = fixture();
        f.store.create_shift(&new_shift(&f, "2025-05-02", "08:00")).unwrap();
        let mut loose = new_shift(&f, "2025-05-02", "09:00");
        loose.commessa_id = None;
        loose.task_id = None;
        f.store.create_shift(&loose).unwrap();

        let groups = f.store.shifts_today_by_commessa("2025-05-02").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].commessa.codice, "C-001");
        assert_eq!(groups[1].commessa.id, None);
        assert_eq!(groups[1].commessa.descrizione, "Senza commessa");
        assert_eq!(groups[1].turni[0].user.nome, "Mario");
    }

    #[test]
    fn timbrature_are_per_user_and_ordered() {
        let f = fixture();
        f.store
            .create_timbratura(
                f.user_id,
                &NewTimbratura { punch_type: PunchType::Start, lat: Some(45.0), lon: None },
            )
            .unwrap();
        f.store
            .create_timbratura(
                f.user_id,
                &NewTimbratura { punch_type: PunchType::End, lat: None, lon: None },
            )
            .unwrap();

        let punches = f.store.list_timbrature(f.user_id).unwrap();
        assert_eq!(punches.len(), 2);
        assert_eq!(punches[0].punch_type, PunchType::Start);
        assert!(!punches[0].synced_from_offline);
        assert!(f.store.list_timbrature(999).unwrap().is_empty());
    }

    #[test]
    fn offline_sync_reports_per_entry() {
        let f = fixture();
        let entries = vec![
            PendingEntry {
                id: Some(serde_json::json!(1)),
                punch_type: Some("start".to_string()),
                timestamp: Some("2025-05-02T08:00:00Z".to_string()),
                lat: None,
                lon: None,
            },
            PendingEntry {
                id: Some(serde_json::json!(2)),
                punch_type: None,
                timestamp: Some("2025-05-02T08:05:00Z".to_string()),
                lat: None,
                lon: None,
            },
            PendingEntry {
                id: Some(serde_json::json!(3)),
                punch_type: Some("lunch".to_string()),
                timestamp: Some("2025-05-02T12:00:00Z".to_string()),
                lat: None,
                lon: None,
            },
        ];
        let results = f.store.sync_offline(f.user_id, &entries);
        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert!(results[0].server_id.is_some());
        assert!(!results[1].success);
        assert!(!results[2].success);

        let punches = f.store.list_timbrature(f.user_id).unwrap();
        assert_eq!(punches.len(), 1);
        assert!(punches[0].synced_from_offline);
    }

    #[test]
    fn requests_default_to_pending_newest_first() {
        let f = fixture();
        let first = f
            .store
            .create_request(
                f.user_id,
                &NewRequest {
                    request_type: RequestType::Ferie,
                    start_date: "2025-08-01".to_string(),
                    end_date: "2025-08-15".to_string(),
                    note: None,
                },
            )
            .unwrap();
        assert_eq!(first.status, RequestStatus::Pending);

        f.store
            .create_request(
                f.user_id,
                &NewRequest {
                    request_type: RequestType::Permesso,
                    start_date: "2025-09-01".to_string(),
                    end_date: "2025-09-01".to_string(),
                    note: Some("visita medica".to_string()),
                },
            )
            .unwrap();

        let listed = f.store.list_requests(f.user_id).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].request_type, RequestType::Permesso);
    }
}
