use std::sync::Mutex;

use rusqlite::Connection;
use timbrapp_core::types::now_rfc3339;
use tracing::info;

use crate::error::{DocumentError, Result};
use crate::types::*;

const TIPOLOGIA_COLUMNS: &str = "id, nome, created_at, updated_at";

fn row_to_tipologia(row: &rusqlite::Row<'_>) -> rusqlite::Result<Tipologia> {
    Ok(Tipologia {
        id: row.get(0)?,
        nome: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

// Joined listing row: document columns, tipologia, then the owner columns
// (NULL when the owner is not included).
fn row_to_detail(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentoDetail> {
    let stato = StatoLettura::parse(&row.get::<_, String>(5)?).unwrap_or_default();
    let documento = Documento {
        id: row.get(0)?,
        user_id: row.get(1)?,
        tipologia_id: row.get(2)?,
        nome: row.get(3)?,
        url: row.get(4)?,
        stato_lettura: stato,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    };
    let tipologia = Tipologia {
        id: row.get(8)?,
        nome: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    };
    let user = match row.get::<_, Option<i64>>(12)? {
        Some(id) => Some(DocumentoOwner { id, nome: row.get(13)?, email: row.get(14)? }),
        None => None,
    };
    Ok(DocumentoDetail { documento, tipologia, user })
}

const DETAIL_SELECT: &str = "SELECT d.id, d.user_id, d.tipologia_id, d.nome, d.url, \
     d.stato_lettura, d.created_at, d.updated_at, \
     t.id, t.nome, t.created_at, t.updated_at, \
     u.id, u.nome, u.email \
     FROM documentiuser d \
     JOIN tipologiedocumento t ON t.id = d.tipologia_id \
     JOIN users u ON u.id = d.user_id";

// Same shape without the owner, for the per-user listing.
const DETAIL_SELECT_NO_OWNER: &str = "SELECT d.id, d.user_id, d.tipologia_id, d.nome, d.url, \
     d.stato_lettura, d.created_at, d.updated_at, \
     t.id, t.nome, t.created_at, t.updated_at, \
     NULL, NULL, NULL \
     FROM documentiuser d \
     JOIN tipologiedocumento t ON t.id = d.tipologia_id";

pub struct DocumentStore {
    db: Mutex<Connection>,
}

impl DocumentStore {
    pub fn new(conn: Connection) -> Self {
        Self { db: Mutex::new(conn) }
    }

    // ── tipologie ─────────────────────────────────────────────────────────────

    pub fn list_tipologie(&self) -> Result<Vec<Tipologia>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {} FROM tipologiedocumento ORDER BY nome",
            TIPOLOGIA_COLUMNS
        ))?;
        let rows = stmt.query_map([], row_to_tipologia)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn get_tipologia(&self, id: i64) -> Result<Option<Tipologia>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            &format!("SELECT {} FROM tipologiedocumento WHERE id = ?1", TIPOLOGIA_COLUMNS),
            rusqlite::params![id],
            row_to_tipologia,
        ) {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn create_tipologia(&self, new: &NewTipologia) -> Result<Tipologia> {
        let db = self.db.lock().unwrap();
        let taken: bool = db
            .query_row(
                "SELECT 1 FROM tipologiedocumento WHERE nome = ?1",
                rusqlite::params![new.nome],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if taken {
            return Err(DocumentError::NomeTaken(new.nome.clone()));
        }
        let now = now_rfc3339();
        db.execute(
            "INSERT INTO tipologiedocumento (nome, created_at, updated_at) VALUES (?1, ?2, ?2)",
            rusqlite::params![new.nome, now],
        )?;
        let id = db.last_insert_rowid();
        info!(id, nome = %new.nome, "tipologia documento created");
        db.query_row(
            &format!("SELECT {} FROM tipologiedocumento WHERE id = ?1", TIPOLOGIA_COLUMNS),
            rusqlite::params![id],
            row_to_tipologia,
        )
        .map_err(DocumentError::from)
    }

    pub fn update_tipologia(&self, id: i64, nome: &str) -> Result<Option<Tipologia>> {
        let db = self.db.lock().unwrap();
        let rows = db.execute(
            "UPDATE tipologiedocumento SET nome = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![nome, now_rfc3339(), id],
        )?;
        if rows == 0 {
            return Ok(None);
        }
        db.query_row(
            &format!("SELECT {} FROM tipologiedocumento WHERE id = ?1", TIPOLOGIA_COLUMNS),
            rusqlite::params![id],
            row_to_tipologia,
        )
        .map(Some)
        .map_err(DocumentError::from)
    }

    pub fn delete_tipologia(&self, id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let rows =
            db.execute("DELETE FROM tipologiedocumento WHERE id = ?1", rusqlite::params![id])?;
        Ok(rows > 0)
    }

    // ── documenti ─────────────────────────────────────────────────────────────

    /// All documents with tipologia and owner attached.
    pub fn list_documenti(&self) -> Result<Vec<DocumentoDetail>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!("{} ORDER BY d.id", DETAIL_SELECT))?;
        let rows = stmt.query_map([], row_to_detail)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// One user's documents; the owner is implied so only the tipologia is
    /// attached, as the original per-user listing does.
    pub fn documenti_for_user(&self, user_id: i64) -> Result<Vec<DocumentoDetail>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "{} WHERE d.user_id = ?1 ORDER BY d.id",
            DETAIL_SELECT_NO_OWNER
        ))?;
        let rows = stmt.query_map(rusqlite::params![user_id], row_to_detail)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn get_documento(&self, id: i64) -> Result<Option<DocumentoDetail>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            &format!("{} WHERE d.id = ?1", DETAIL_SELECT),
            rusqlite::params![id],
            row_to_detail,
        ) {
            Ok(d) => Ok(Some(d)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create a document for a user. The referenced user and tipologia must
    /// exist; new documents start unread.
    pub fn create_documento(&self, new: &NewDocumento) -> Result<DocumentoDetail> {
        let id = {
            let db = self.db.lock().unwrap();
            let user_found: bool = db
                .query_row(
                    "SELECT 1 FROM users WHERE id = ?1",
                    rusqlite::params![new.user_id],
                    |_| Ok(true),
                )
                .unwrap_or(false);
            if !user_found {
                return Err(DocumentError::NotFound { entity: "user", id: new.user_id });
            }
            let tipologia_found: bool = db
                .query_row(
                    "SELECT 1 FROM tipologiedocumento WHERE id = ?1",
                    rusqlite::params![new.tipologia_id],
                    |_| Ok(true),
                )
                .unwrap_or(false);
            if !tipologia_found {
                return Err(DocumentError::NotFound { entity: "tipologia", id: new.tipologia_id });
            }

            let now = now_rfc3339();
            db.execute(
                "INSERT INTO documentiuser (user_id, tipologia_id, nome, url, stato_lettura,
                 created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, 'non letto', ?5, ?5)",
                rusqlite::params![new.user_id, new.tipologia_id, new.nome, new.url, now],
            )?;
            db.last_insert_rowid()
        };
        info!(id, user_id = new.user_id, "documento created");
        self.get_documento(id)?
            .ok_or(DocumentError::NotFound { entity: "documento", id })
    }

    pub fn set_stato_lettura(&self, id: i64, stato: StatoLettura) -> Result<Option<Documento>> {
        let db = self.db.lock().unwrap();
        let rows = db.execute(
            "UPDATE documentiuser SET stato_lettura = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![stato.as_str(), now_rfc3339(), id],
        )?;
        if rows == 0 {
            return Ok(None);
        }
        db.query_row(
            "SELECT id, user_id, tipologia_id, nome, url, stato_lettura, created_at, updated_at
             FROM documentiuser WHERE id = ?1",
            rusqlite::params![id],
            |row| {
                let stato =
                    StatoLettura::parse(&row.get::<_, String>(5)?).unwrap_or_default();
                Ok(Documento {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    tipologia_id: row.get(2)?,
                    nome: row.get(3)?,
                    url: row.get(4)?,
                    stato_lettura: stato,
                    created_at: row.get(6)?,
                    updated_at: row.get(7)?,
                })
            },
        )
        .map(Some)
        .map_err(DocumentError::from)
    }

    pub fn delete_documento(&self, id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let rows = db.execute("DELETE FROM documentiuser WHERE id = ?1", rusqlite::params![id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (DocumentStore, i64, i64) {
        let conn = Connection::open_in_memory().unwrap();
        timbrapp_users::db::init_db(&conn).unwrap();
        crate::db::init_db(&conn).unwrap();
        conn.execute(
            "INSERT INTO users (nome, email, password_hash, role, created_at, updated_at)
             VALUES ('Mario', 'mario@example.com', 'x', 'user', '2025', '2025')",
            [],
        )
        .unwrap();
        let user_id = conn.last_insert_rowid();

        let store = DocumentStore::new(conn);
        let tipologia = store
            .create_tipologia(&NewTipologia { nome: "Busta paga".to_string() })
            .unwrap();
        (store, user_id, tipologia.id)
    }

    #[test]
    fn tipologie_listed_by_name_and_unique() {
        let (store, _, _) = fixture();
        store.create_tipologia(&NewTipologia { nome: "Attestato".to_string() }).unwrap();

        let listed = store.list_tipologie().unwrap();
        assert_eq!(listed[0].nome, "Attestato");
        assert_eq!(listed[1].nome, "Busta paga");

        assert!(matches!(
            store.create_tipologia(&NewTipologia { nome: "Attestato".to_string() }),
            Err(DocumentError::NomeTaken(_))
        ));
    }

    #[test]
    fn documento_starts_unread_and_carries_relations() {
        let (store, user_id, tipologia_id) = fixture();
        let created = store
            .create_documento(&NewDocumento {
                user_id,
                tipologia_id,
                nome: "Busta paga maggio".to_string(),
                url: "/docs/2025-05.pdf".to_string(),
            })
            .unwrap();
        assert_eq!(created.documento.stato_lettura, StatoLettura::NonLetto);
        assert_eq!(created.tipologia.nome, "Busta paga");
        assert_eq!(created.user.as_ref().unwrap().nome, "Mario");

        let per_user = store.documenti_for_user(user_id).unwrap();
        assert_eq!(per_user.len(), 1);
        assert!(per_user[0].user.is_none());
    }

    #[test]
    fn documento_rejects_unknown_references() {
        let (store, user_id, tipologia_id) = fixture();
        assert!(matches!(
            store.create_documento(&NewDocumento {
                user_id: 999,
                tipologia_id,
                nome: "X".to_string(),
                url: "/x".to_string(),
            }),
            Err(DocumentError::NotFound { entity: "user", .. })
        ));
        assert!(matches!(
            store.create_documento(&NewDocumento {
                user_id,
                tipologia_id: 999,
                nome: "X".to_string(),
                url: "/x".to_string(),
            }),
            Err(DocumentError::NotFound { entity: "tipologia", .. })
        ));
    }

    #[test]
    fn stato_lettura_round_trip() {
        let (store, user_id, tipologia_id) = fixture();
        let doc = store
            .create_documento(&NewDocumento {
                user_id,
                tipologia_id,
                nome: "Contratto".to_string(),
                url: "/docs/contratto.pdf".to_string(),
            })
            .unwrap();

        let updated = store
            .set_stato_lettura(doc.documento.id, StatoLettura::Letto)
            .unwrap()
            .unwrap();
        assert_eq!(updated.stato_lettura, StatoLettura::Letto);
        assert!(store.set_stato_lettura(999, StatoLettura::Letto).unwrap().is_none());
    }

    #[test]
    fn delete_documento_reports_outcome() {
        let (store, user_id, tipologia_id) = fixture();
        let doc = store
            .create_documento(&NewDocumento {
                user_id,
                tipologia_id,
                nome: "Contratto".to_string(),
                url: "/docs/contratto.pdf".to_string(),
            })
            .unwrap();
        assert!(store.delete_documento(doc.documento.id).unwrap());
        assert!(!store.delete_documento(doc.documento.id).unwrap());
    }
}
