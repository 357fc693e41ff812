//! Shared foundation for the TimbrApp workspace: configuration loading,
//! the top-level error type and the handful of types every subsystem needs.

pub mod config;
pub mod error;
pub mod types;
