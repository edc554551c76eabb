/// cmdwerk library
///
/// History-driven command completion: read a shell history log, index
/// which word follows which, and complete command lines from that index.

pub mod complete;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod history;
pub mod index;
pub mod logging;
pub mod shell;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::{CmdwerkError, Result};
