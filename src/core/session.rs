/// Interactive completion session
///
/// Loads the persisted index once and hands it to the prompt. The index is
/// read-only for the life of the session.

use crate::complete::{prompt_command, HistoryCompleter};
use crate::db::Database;
use crate::error::Result;
use crate::index::CompletionIndex;
use std::path::Path;
use tracing::debug;

pub struct Session {
    completer: HistoryCompleter,
}

impl Session {
    /// Load the index stored at `db_path`
    ///
    /// # Returns
    /// * `Err(CmdwerkError::IndexNotFound)` - Nothing synced yet
    pub async fn load<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let index = load_index(db_path.as_ref()).await?;
        debug!(keys = index.len(), "session ready");

        Ok(Self::from_index(index))
    }

    pub fn from_index(index: CompletionIndex) -> Self {
        Self {
            completer: HistoryCompleter::new(index),
        }
    }

    pub fn completer(&self) -> &HistoryCompleter {
        &self.completer
    }

    pub fn index(&self) -> &CompletionIndex {
        self.completer.index()
    }

    /// Prompt for one command with completion
    ///
    /// The line editor blocks, so it runs on the blocking pool.
    pub async fn run(self) -> Result<Option<String>> {
        let completer = self.completer;
        tokio::task::spawn_blocking(move || prompt_command(completer)).await?
    }
}

/// Read the stored index and release the database
pub async fn load_index(db_path: &Path) -> Result<CompletionIndex> {
    let db = Database::open(db_path).await?;
    let index = db.load_index().await;
    db.close().await;
    index
}
