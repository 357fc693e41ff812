//! Time tracking: shift scheduling, clock punches (timbrature), leave
//! requests and the offline punch-queue import.

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use store::TrackingStore;
