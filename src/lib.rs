//! Ignite Call authentication storage
//!
//! Bridges the authentication framework's storage contract onto PostgreSQL
//! and carries the scheduling helpers shared across the app.

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod utils;
