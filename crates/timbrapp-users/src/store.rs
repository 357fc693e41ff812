use std::str::FromStr;
use std::sync::Mutex;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rusqlite::Connection;
use timbrapp_core::types::{now_rfc3339, UserRole};
use tracing::{info, warn};

use crate::error::{Result, UserError};
use crate::types::User;

/// Map a SELECT row (column order from USER_COLUMNS) to a User.
/// Centralised here so every query in this crate stays consistent.
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role = UserRole::from_str(&row.get::<_, String>(4)?).unwrap_or_default();
    Ok(User {
        id: row.get(0)?,
        nome: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const USER_COLUMNS: &str = "id, nome, email, password_hash, role, created_at, updated_at";

/// Account store. Thread-safe: wraps its SQLite connection in a Mutex.
pub struct UserStore {
    db: Mutex<Connection>,
}

impl UserStore {
    pub fn new(conn: Connection) -> Self {
        Self { db: Mutex::new(conn) }
    }

    /// Create an account with an Argon2-hashed password.
    ///
    /// Rejects duplicate emails before the UNIQUE constraint fires so the
    /// caller gets a 409 rather than a bare constraint error.
    pub fn register(&self, nome: &str, email: &str, password: &str, role: UserRole) -> Result<User> {
        let db = self.db.lock().unwrap();

        let exists: bool = db
            .query_row(
                "SELECT 1 FROM users WHERE email = ?1",
                rusqlite::params![email],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if exists {
            return Err(UserError::EmailTaken(email.to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?
            .to_string();

        let now = now_rfc3339();
        db.execute(
            "INSERT INTO users (nome, email, password_hash, role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![nome, email, hash, role.to_string(), now],
        )?;
        let id = db.last_insert_rowid();
        info!(id, email, "user registered");

        db.query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            rusqlite::params![id],
            row_to_user,
        )
        .map_err(UserError::from)
    }

    /// Verify an email/password pair. Returns InvalidCredentials on either
    /// an unknown email or a wrong password — callers can't tell which.
    pub fn verify_login(&self, email: &str, password: &str) -> Result<User> {
        let db = self.db.lock().unwrap();
        let user = db
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
                rusqlite::params![email],
                row_to_user,
            )
            .map_err(|_| UserError::InvalidCredentials)?;
        drop(db);

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            warn!(email, "login failed: wrong password");
            return Err(UserError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Look up a user by primary key.
    pub fn get(&self, id: i64) -> Result<Option<User>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            rusqlite::params![id],
            row_to_user,
        ) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All accounts — admin listing.
    pub fn list_all(&self) -> Result<Vec<User>> {
        let db = self.db.lock().unwrap();
        let mut stmt =
            db.prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;
        let rows = stmt.query_map([], row_to_user)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> UserStore {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_db(&conn).unwrap();
        UserStore::new(conn)
    }

    #[test]
    fn register_and_login() {
        let store = store();
        let user = store
            .register("Mario", "mario@example.com", "segreto", UserRole::User)
            .unwrap();
        assert_eq!(user.email, "mario@example.com");

        let logged = store.verify_login("mario@example.com", "segreto").unwrap();
        assert_eq!(logged.id, user.id);
    }

    #[test]
    fn duplicate_email_rejected() {
        let store = store();
        store
            .register("Mario", "mario@example.com", "segreto", UserRole::User)
            .unwrap();
        let err = store
            .register("Other", "mario@example.com", "x", UserRole::User)
            .unwrap_err();
        assert!(matches!(err, UserError::EmailTaken(_)));
    }

    #[test]
    fn wrong_password_rejected() {
        let store = store();
        store
            .register("Mario", "mario@example.com", "segreto", UserRole::User)
            .unwrap();
        assert!(matches!(
            store.verify_login("mario@example.com", "sbagliata"),
            Err(UserError::InvalidCredentials)
        ));
        assert!(matches!(
            store.verify_login("nobody@example.com", "segreto"),
            Err(UserError::InvalidCredentials)
        ));
    }

    #[test]
    fn get_missing_user_is_none() {
        let store = store();
        assert!(store.get(42).unwrap().is_none());
    }
}
