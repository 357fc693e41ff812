//! User accounts: registration, login and bearer-token auth.
//!
//! Passwords are hashed with Argon2; tokens are HMAC-SHA256 signed claims
//! with an expiry, verified statelessly by the server on every request.

pub mod db;
pub mod error;
pub mod store;
pub mod token;
pub mod types;

pub use store::UserStore;
pub use token::{mint_token, verify_token, Claims};
