pub mod auth;
pub mod commesse;
pub mod documents;
pub mod health;
pub mod planner;
pub mod shifts;
pub mod tasks;
pub mod tracking;
pub mod webpush;
pub mod workforce;
