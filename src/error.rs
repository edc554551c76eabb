/// Error types for cmdwerk
///
/// Only boundary failures live here. Bad history lines and commands that
/// fail to tokenize are counted or skipped where they happen, they never
/// become an `Err`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cmdwerk operations
#[derive(Error, Debug)]
pub enum CmdwerkError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (history file, data directory, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Line editor failure during the interactive prompt
    #[error("Prompt error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// A blocking task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// No persisted index at the expected location
    #[error("History index not found at {}", .0.display())]
    IndexNotFound(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad command line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for cmdwerk operations
pub type Result<T> = std::result::Result<T, CmdwerkError>;

impl CmdwerkError {
    /// Convert the error to a message suitable for the terminal
    pub fn user_message(&self) -> String {
        match self {
            CmdwerkError::Database(e) => {
                format!("History index could not be read or written. Details: {}", e)
            }
            CmdwerkError::Io(e) => {
                format!("File system error. Check the path and permissions. Details: {}", e)
            }
            CmdwerkError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            CmdwerkError::Readline(e) => {
                format!("Interactive prompt failed: {}", e)
            }
            CmdwerkError::Task(e) => {
                format!("Background task failed: {}", e)
            }
            CmdwerkError::IndexNotFound(path) => {
                format!(
                    "History index not found ({}).\n - To create it, use the command: cmdwerk sync",
                    path.display()
                )
            }
            CmdwerkError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            CmdwerkError::InvalidArgument(msg) => {
                format!("Invalid argument: {}", msg)
            }
        }
    }
}
