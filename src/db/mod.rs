/// Database module for cmdwerk
///
/// Persists the completion index in SQLite using sqlx.

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::{Database, DatabaseStats};
pub use models::*;
