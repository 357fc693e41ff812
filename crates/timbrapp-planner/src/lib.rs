//! Work-order planning: commesse, their locations and tasks, and the
//! task↔dipendente assignment table used by the resource planner.

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use store::PlannerStore;
