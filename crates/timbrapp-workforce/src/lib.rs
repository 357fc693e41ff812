//! Workforce registry: dipendenti (employees), funzioni (job functions),
//! skills, and the many-to-many funzione↔skill link table.

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use store::WorkforceStore;
