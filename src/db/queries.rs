/// SQL query functions for the history index

use crate::db::models::*;
use crate::db::Database;
use crate::error::Result;
use crate::index::CompletionIndex;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

impl Database {
    /// Replace the stored index with `index`
    ///
    /// Runs in one transaction: readers see either the old index or the new
    /// one, never a mix.
    pub async fn store_index(&self, index: &CompletionIndex) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM prefix_candidates")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM first_tokens")
            .execute(&mut *tx)
            .await?;

        for (key, candidates) in index.entries() {
            for candidate in candidates {
                sqlx::query("INSERT INTO prefix_candidates (prefix_key, candidate) VALUES (?, ?)")
                    .bind(key)
                    .bind(candidate)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        for token in index.first_tokens() {
            sqlx::query("INSERT INTO first_tokens (token) VALUES (?)")
                .bind(token)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!(
            keys = index.len(),
            candidates = index.candidate_count(),
            "stored completion index"
        );
        Ok(())
    }

    /// Load the stored index
    pub async fn load_index(&self) -> Result<CompletionIndex> {
        let rows = sqlx::query_as::<_, PrefixCandidate>(
            "SELECT prefix_key, candidate FROM prefix_candidates",
        )
        .fetch_all(self.pool())
        .await?;

        let mut index = CompletionIndex::new();
        for row in &rows {
            index.add_candidate(&row.prefix_key, &row.candidate);
        }

        let tokens = sqlx::query("SELECT token FROM first_tokens")
            .fetch_all(self.pool())
            .await?;
        for row in &tokens {
            let token: String = row.get(0);
            index.add_first_token(&token);
        }

        debug!(keys = index.len(), "loaded completion index");
        Ok(index)
    }

    /// Record a finished sync
    ///
    /// # Returns
    /// * `Ok(i64)` - The run ID
    pub async fn record_sync_run(&self, input: SyncRunInput) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO sync_runs (history_path, history_lines, loading_errors, keys_indexed, synced_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&input.history_path)
        .bind(input.history_lines as i64)
        .bind(input.loading_errors as i64)
        .bind(input.keys_indexed as i64)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// Most recent sync, if any
    pub async fn last_sync_run(&self) -> Result<Option<SyncRun>> {
        let run = sqlx::query_as::<_, SyncRun>(
            "SELECT * FROM sync_runs ORDER BY synced_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(self.pool())
        .await?;

        Ok(run)
    }
}
