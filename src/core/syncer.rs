// Builds the persisted index from a history file
//
// Read first, build in memory, then swap the stored index in one go.
// A history file we cannot read never touches the database.

use crate::db::{Database, SyncRunInput};
use crate::error::Result;
use crate::history::{load_history_file, HistoryFormat};
use crate::index::CompletionIndex;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of one sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub output_path: PathBuf,
    pub history_lines: usize,
    pub loading_errors: usize,
    pub keys_indexed: usize,
    pub first_tokens: usize,
}

pub struct Syncer {
    db_path: PathBuf,
}

impl Syncer {
    /// Sync into the index at `db_path`
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Rebuild the index from the history file at `history_path`
    ///
    /// # Returns
    /// * `Ok(SyncReport)` - Counts for the user
    /// * `Err(CmdwerkError)` - History unreadable or index unwritable
    pub async fn sync(&self, history_path: &Path, format: HistoryFormat) -> Result<SyncReport> {
        let history = load_history_file(history_path, format)?;
        let index = CompletionIndex::build(&history.commands);

        let db = Database::new(&self.db_path).await?;
        db.store_index(&index).await?;
        db.record_sync_run(SyncRunInput {
            history_path: history_path.display().to_string(),
            history_lines: history.commands.len(),
            loading_errors: history.loading_errors,
            keys_indexed: index.len(),
        })
        .await?;
        db.close().await;

        info!(
            history = %history_path.display(),
            index = %self.db_path.display(),
            keys = index.len(),
            "sync complete"
        );

        Ok(SyncReport {
            output_path: self.db_path.clone(),
            history_lines: history.commands.len(),
            loading_errors: history.loading_errors,
            keys_indexed: index.len(),
            first_tokens: index.first_tokens().len(),
        })
    }
}
