//! Web-push subscriptions, in-app notifications and the delivery fan-out.

pub mod db;
pub mod error;
pub mod sender;
pub mod service;
pub mod store;
pub mod types;

pub use sender::{HttpPushSender, PushSender};
pub use service::PushService;
pub use store::PushStore;
