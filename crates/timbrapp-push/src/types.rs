use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Browser `PushSubscription.toJSON()` shape.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubscription {
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub is_read: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub user_id: i64,
    pub message: String,
    #[serde(default = "default_kind", rename = "type")]
    pub kind: String,
}

fn default_kind() -> String {
    "system".to_string()
}

/// Payload handed to the push sender; the service worker reads these fields.
#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub data: PushPayloadData,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushPayloadData {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl PushPayload {
    pub fn new(title: &str, body: &str, url: &str, kind: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            icon: "/icon-192x192.png".to_string(),
            data: PushPayloadData { url: url.to_string(), kind: kind.to_string() },
        }
    }
}

/// Per-subscription outcome of a delivery fan-out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub subscription_id: i64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
