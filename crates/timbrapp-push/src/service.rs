use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{PushError, Result};
use crate::sender::{PushSender, SendOutcome};
use crate::store::PushStore;
use crate::types::{DeliveryResult, PushPayload};

/// Fans a payload out to every subscription of a user. Endpoints the push
/// service has forgotten are pruned; other failures are reported
/// per-subscription without aborting the fan-out.
pub struct PushService {
    store: Arc<PushStore>,
    sender: Arc<dyn PushSender>,
}

impl PushService {
    pub fn new(store: Arc<PushStore>, sender: Arc<dyn PushSender>) -> Self {
        Self { store, sender }
    }

    pub async fn send_to_user(
        &self,
        user_id: i64,
        payload: &PushPayload,
    ) -> Result<Vec<DeliveryResult>> {
        let subscriptions = self.store.subscriptions_for_user(user_id)?;
        if subscriptions.is_empty() {
            return Err(PushError::NoSubscriptions(user_id));
        }

        let mut results = Vec::with_capacity(subscriptions.len());
        for sub in subscriptions {
            match self.sender.send(&sub, payload).await {
                SendOutcome::Delivered => {
                    results.push(DeliveryResult {
                        subscription_id: sub.id,
                        success: true,
                        error: None,
                    });
                }
                SendOutcome::Gone => {
                    self.store.prune_subscription(sub.id)?;
                    results.push(DeliveryResult {
                        subscription_id: sub.id,
                        success: false,
                        error: Some("subscription expired".to_string()),
                    });
                }
                SendOutcome::Failed(err) => {
                    warn!(subscription_id = sub.id, error = %err, "push delivery failed");
                    results.push(DeliveryResult {
                        subscription_id: sub.id,
                        success: false,
                        error: Some(err),
                    });
                }
            }
        }
        info!(
            user_id,
            total = results.len(),
            ok = results.iter().filter(|r| r.success).count(),
            "push fan-out done"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewSubscription, SubscriptionKeys, Subscription};
    use async_trait::async_trait;
    use rusqlite::Connection;

    struct ScriptedSender;

    #[async_trait]
    impl PushSender for ScriptedSender {
        async fn send(&self, sub: &Subscription, _payload: &PushPayload) -> SendOutcome {
            if sub.endpoint.contains("gone") {
                SendOutcome::Gone
            } else if sub.endpoint.contains("flaky") {
                SendOutcome::Failed("timeout".to_string())
            } else {
                SendOutcome::Delivered
            }
        }
    }

    fn store_with_user() -> (Arc<PushStore>, i64) {
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
        (Arc::new(PushStore::new(conn)), user_id)
    }

    fn subscribe(store: &PushStore, user_id: i64, endpoint: &str) {
        store
            .save_subscription(
                user_id,
                &NewSubscription {
                    endpoint: endpoint.to_string(),
                    keys: SubscriptionKeys { p256dh: "pk".to_string(), auth: "a".to_string() },
                },
            )
            .unwrap();
    }

    #[tokio::test]
    async fn fan_out_prunes_gone_endpoints() {
        let (store, user_id) = store_with_user();
        subscribe(&store, user_id, "https://push/ok");
        subscribe(&store, user_id, "https://push/gone");
        subscribe(&store, user_id, "https://push/flaky");

        let service = PushService::new(store.clone(), Arc::new(ScriptedSender));
        let payload = PushPayload::new("Test", "corpo", "/", "test");
        let results = service.send_to_user(user_id, &payload).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().filter(|r| r.success).count(), 1);
        // The dead endpoint is gone from the store, the flaky one survives.
        let remaining = store.subscriptions_for_user(user_id).unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|s| !s.endpoint.contains("gone")));
    }

    #[tokio::test]
    async fn no_subscriptions_is_an_error() {
        let (store, user_id) = store_with_user();
        let service = PushService::new(store, Arc::new(ScriptedSender));
        let payload = PushPayload::new("Test", "corpo", "/", "test");
        assert!(matches!(
            service.send_to_user(user_id, &payload).await,
            Err(PushError::NoSubscriptions(_))
        ));
    }
}
