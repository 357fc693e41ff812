use async_trait::async_trait;
use reqwest::StatusCode;

use crate::types::{PushPayload, Subscription};

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    /// The push service no longer knows this endpoint (404/410); the
    /// subscription should be pruned.
    Gone,
    Failed(String),
}

/// Transport seam for push delivery. The production sender POSTs to the
/// browser push service; tests substitute a scripted one.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, subscription: &Subscription, payload: &PushPayload) -> SendOutcome;
}

/// Plain HTTP sender. The payload goes out as JSON with a delivery TTL;
/// the RFC 8291 encryption envelope sits behind this trait and is not
/// implemented here.
pub struct HttpPushSender {
    client: reqwest::Client,
}

impl HttpPushSender {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl Default for HttpPushSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushSender for HttpPushSender {
    async fn send(&self, subscription: &Subscription, payload: &PushPayload) -> SendOutcome {
        let resp = self
            .client
            .post(&subscription.endpoint)
            .header("TTL", "86400")
            .json(payload)
            .send()
            .await;
        match resp {
            Ok(resp) if resp.status().is_success() => SendOutcome::Delivered,
            Ok(resp)
                if resp.status() == StatusCode::NOT_FOUND
                    || resp.status() == StatusCode::GONE =>
            {
                SendOutcome::Gone
            }
            Ok(resp) => SendOutcome::Failed(format!("push service returned {}", resp.status())),
            Err(e) => SendOutcome::Failed(e.to_string()),
        }
    }
}
