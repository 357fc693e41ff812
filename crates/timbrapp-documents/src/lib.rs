//! Document management: tipologie documento and per-user document records
//! with a read/unread state.

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use store::DocumentStore;
