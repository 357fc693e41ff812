use std::sync::Mutex;

use rusqlite::Connection;
use timbrapp_core::types::now_rfc3339;
use tracing::info;

use crate::error::{PushError, Result};
use crate::types::*;

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, endpoint, p256dh, auth, created_at, updated_at";

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, message, is_read, type, created_at, updated_at";

fn row_to_subscription(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subscription> {
    Ok(Subscription {
        id: row.get(0)?,
        user_id: row.get(1)?,
        endpoint: row.get(2)?,
        p256dh: row.get(3)?,
        auth: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn row_to_notification(row: &rusqlite::Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        message: row.get(2)?,
        is_read: row.get::<_, i64>(3)? != 0,
        kind: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub struct PushStore {
    db: Mutex<Connection>,
}

impl PushStore {
    pub fn new(conn: Connection) -> Self {
        Self { db: Mutex::new(conn) }
    }

    // ── subscriptions ─────────────────────────────────────────────────────────

    /// Upsert keyed on the endpoint: a browser re-subscribing moves the
    /// endpoint to the current user and refreshes its keys.
    pub fn save_subscription(&self, user_id: i64, new: &NewSubscription) -> Result<Subscription> {
        let db = self.db.lock().unwrap();
        let now = now_rfc3339();
        let existing: Option<i64> = match db.query_row(
            "SELECT id FROM subscriptions WHERE endpoint = ?1",
            rusqlite::params![new.endpoint],
            |row| row.get(0),
        ) {
            Ok(id) => Some(id),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        let id = match existing {
            Some(id) => {
                db.execute(
                    "UPDATE subscriptions SET user_id=?1, p256dh=?2, auth=?3, updated_at=?4
                     WHERE id=?5",
                    rusqlite::params![user_id, new.keys.p256dh, new.keys.auth, now, id],
                )?;
                info!(id, user_id, "push subscription refreshed");
                id
            }
            None => {
                db.execute(
                    "INSERT INTO subscriptions (user_id, endpoint, p256dh, auth,
                     created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                    rusqlite::params![user_id, new.endpoint, new.keys.p256dh, new.keys.auth, now],
                )?;
                let id = db.last_insert_rowid();
                info!(id, user_id, "push subscription created");
                id
            }
        };
        db.query_row(
            &format!("SELECT {} FROM subscriptions WHERE id = ?1", SUBSCRIPTION_COLUMNS),
            rusqlite::params![id],
            row_to_subscription,
        )
        .map_err(PushError::from)
    }

    pub fn subscriptions_for_user(&self, user_id: i64) -> Result<Vec<Subscription>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {} FROM subscriptions WHERE user_id = ?1 ORDER BY id",
            SUBSCRIPTION_COLUMNS
        ))?;
        let rows = stmt.query_map(rusqlite::params![user_id], row_to_subscription)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Delete a subscription only when it belongs to the user.
    pub fn delete_subscription(&self, user_id: i64, id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let rows = db.execute(
            "DELETE FROM subscriptions WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    /// Prune a subscription whose endpoint no longer accepts pushes.
    pub fn prune_subscription(&self, id: i64) -> Result<()> {
        let db = self.db.lock().unwrap();
        db.execute("DELETE FROM subscriptions WHERE id = ?1", rusqlite::params![id])?;
        info!(id, "dead push subscription pruned");
        Ok(())
    }

    // ── notifications ─────────────────────────────────────────────────────────

    /// One user's notifications, newest first.
    pub fn notifications_for_user(&self, user_id: i64) -> Result<Vec<Notification>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {} FROM notifications WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
            NOTIFICATION_COLUMNS
        ))?;
        let rows = stmt.query_map(rusqlite::params![user_id], row_to_notification)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn create_notification(&self, new: &NewNotification) -> Result<Notification> {
        let db = self.db.lock().unwrap();
        let now = now_rfc3339();
        db.execute(
            "INSERT INTO notifications (user_id, message, is_read, type, created_at, updated_at)
             VALUES (?1, ?2, 0, ?3, ?4, ?4)",
            rusqlite::params![new.user_id, new.message, new.kind, now],
        )?;
        let id = db.last_insert_rowid();
        db.query_row(
            &format!("SELECT {} FROM notifications WHERE id = ?1", NOTIFICATION_COLUMNS),
            rusqlite::params![id],
            row_to_notification,
        )
        .map_err(PushError::from)
    }

    /// Mark every unread notification of the user as read; returns the count.
    pub fn mark_all_read(&self, user_id: i64) -> Result<usize> {
        let db = self.db.lock().unwrap();
        let rows = db.execute(
            "UPDATE notifications SET is_read = 1, updated_at = ?1
             WHERE user_id = ?2 AND is_read = 0",
            rusqlite::params![now_rfc3339(), user_id],
        )?;
        Ok(rows)
    }

    /// Mark one notification as read, only when it belongs to the user.
    pub fn mark_read(&self, user_id: i64, id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let rows = db.execute(
            "UPDATE notifications SET is_read = 1, updated_at = ?1
             WHERE id = ?2 AND user_id = ?3",
            rusqlite::params![now_rfc3339(), id, user_id],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (PushStore, i64, i64) {
        let conn = Connection::open_in_memory().unwrap();
        timbrapp_users::db::init_db(&conn).unwrap();
        crate::db::init_db(&conn).unwrap();
        let mut ids = Vec::new();
        for email in ["mario@example.com", "anna@example.com"] {
            conn.execute(
                "INSERT INTO users (nome, email, password_hash, role, created_at, updated_at)
                 VALUES ('x', ?1, 'x', 'user', '2025', '2025')",
                rusqlite::params![email],
            )
            .unwrap();
            ids.push(conn.last_insert_rowid());
        }
        (PushStore::new(conn), ids[0], ids[1])
    }

    fn sub(endpoint: &str) -> NewSubscription {
        NewSubscription {
            endpoint: endpoint.to_string(),
            keys: SubscriptionKeys { p256dh: "pk".to_string(), auth: "a".to_string() },
        }
    }

    #[test]
    fn subscribe_upserts_by_endpoint() {
        let (store, mario, anna) = fixture();
        let first = store.save_subscription(mario, &sub("https://push/ep1")).unwrap();
        // Same endpoint registered by another user takes it over.
        let second = store.save_subscription(anna, &sub("https://push/ep1")).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.user_id, anna);
        assert!(store.subscriptions_for_user(mario).unwrap().is_empty());
        assert_eq!(store.subscriptions_for_user(anna).unwrap().len(), 1);
    }

    #[test]
    fn delete_is_scoped_to_owner() {
        let (store, mario, anna) = fixture();
        let s = store.save_subscription(mario, &sub("https://push/ep1")).unwrap();
        assert!(!store.delete_subscription(anna, s.id).unwrap());
        assert!(store.delete_subscription(mario, s.id).unwrap());
    }

    #[test]
    fn notifications_read_flow() {
        let (store, mario, anna) = fixture();
        for msg in ["primo", "secondo"] {
            store
                .create_notification(&NewNotification {
                    user_id: mario,
                    message: msg.to_string(),
                    kind: "system".to_string(),
                })
                .unwrap();
        }
        let other = store
            .create_notification(&NewNotification {
                user_id: anna,
                message: "altro".to_string(),
                kind: "system".to_string(),
            })
            .unwrap();

        let listed = store.notifications_for_user(mario).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].message, "secondo");
        assert!(!listed[0].is_read);

        // Cross-user mark is refused.
        assert!(!store.mark_read(mario, other.id).unwrap());
        assert!(store.mark_read(mario, listed[0].id).unwrap());
        assert_eq!(store.mark_all_read(mario).unwrap(), 1);
        assert_eq!(store.mark_all_read(mario).unwrap(), 0);
    }
}
