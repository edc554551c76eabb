/// Data models for database rows

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One completed sync of history into the index
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SyncRun {
    pub id: i64,
    pub history_path: String,
    pub history_lines: i64,
    pub loading_errors: i64,
    pub keys_indexed: i64,
    pub synced_at: String, // RFC 3339
}

impl SyncRun {
    /// Parse `synced_at` back into a timestamp
    pub fn synced_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::parse_from_rfc3339(&self.synced_at)
            .ok()
            .map(|dt| dt.with_timezone(&chrono::Utc))
    }
}

/// Input for recording a sync run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRunInput {
    pub history_path: String,
    pub history_lines: usize,
    pub loading_errors: usize,
    pub keys_indexed: usize,
}

/// A stored (prefix key, candidate) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PrefixCandidate {
    pub prefix_key: String,
    pub candidate: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synced_at_parses() {
        let run = SyncRun {
            id: 1,
            history_path: "/home/user/.zsh_history".to_string(),
            history_lines: 10,
            loading_errors: 0,
            keys_indexed: 4,
            synced_at: "2026-10-19T08:30:00+00:00".to_string(),
        };

        let ts = run.synced_at_utc().unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-10-19T08:30:00+00:00");
    }

    #[test]
    fn test_synced_at_garbage() {
        let run = SyncRun {
            id: 1,
            history_path: String::new(),
            history_lines: 0,
            loading_errors: 0,
            keys_indexed: 0,
            synced_at: "yesterday".to_string(),
        };

        assert!(run.synced_at_utc().is_none());
    }
}
