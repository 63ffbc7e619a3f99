/*!
SQLite Checkpointer

Async implementation of the [`Checkpointer`] trait backed by `sqlx` and
SQLite.

## Behavior

- One row per session: `save` upserts (`INSERT .. ON CONFLICT DO UPDATE`),
  matching the last-write-wins, no-history checkpoint contract.
- The checkpoint body is stored as a JSON payload produced by the
  persistence models (see `runtimes::persistence`); `step` and `status`
  are denormalized into their own columns for operator queries.
- The schema is created idempotently on connect; there is nothing to
  migrate in a single-table latest-only store.

## Design Goals

- Keep this module focused on database I/O; pure serialization lives in
  the persistence module.
- Map every backend failure into [`CheckpointerError`] so callers see one
  error surface regardless of the storage engine.
*/

use std::sync::Arc;

use miette::Diagnostic;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use thiserror::Error;
use tracing::instrument;

use crate::{
    runtimes::checkpointer::{Checkpoint, Checkpointer, CheckpointerError, Result},
    runtimes::persistence::{PersistedCheckpoint, PersistenceError},
    utils::json_ext::JsonSerializable,
};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS checkpoints (
        session_id     TEXT PRIMARY KEY,
        format_version INTEGER NOT NULL,
        step           INTEGER NOT NULL,
        status         TEXT NOT NULL,
        payload        TEXT NOT NULL,
        updated_at     TEXT NOT NULL
    )
"#;

#[derive(Debug, Error, Diagnostic)]
pub enum SqliteCheckpointerError {
    #[error("SQLx error: {0}")]
    #[diagnostic(
        code(confab::sqlite::sqlx),
        help("Ensure the SQLite database URL is valid and accessible.")
    )]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    #[diagnostic(code(confab::sqlite::persistence))]
    Persistence(#[from] PersistenceError),
}

impl From<SqliteCheckpointerError> for CheckpointerError {
    fn from(e: SqliteCheckpointerError) -> Self {
        match e {
            SqliteCheckpointerError::Sqlx(err) => CheckpointerError::Backend {
                message: err.to_string(),
            },
            SqliteCheckpointerError::Persistence(err) => CheckpointerError::Other {
                message: err.to_string(),
            },
        }
    }
}

/// SQLite-backed checkpointer storing the latest checkpoint per session.
pub struct SqliteCheckpointer {
    /// Shared SQLite connection pool for concurrent checkpoint operations.
    pool: Arc<SqlitePool>,
}

impl std::fmt::Debug for SqliteCheckpointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCheckpointer").finish()
    }
}

impl SqliteCheckpointer {
    /// Connect (or create) a SQLite database at `database_url`.
    /// Example URL: `"sqlite://confab.db"`.
    ///
    /// The checkpoint table is created idempotently before the connection
    /// is handed back.
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str) -> std::result::Result<Self, CheckpointerError> {
        // An in-memory database exists per connection; it must stay on a
        // single pooled connection or each checkout sees a different db.
        let pool = if database_url.contains(":memory:") {
            sqlx::sqlite::SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .connect(database_url)
                .await
        } else {
            SqlitePool::connect(database_url).await
        }
        .map_err(|e| CheckpointerError::Backend {
            message: format!("connect error: {e}"),
        })?;
        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| CheckpointerError::Backend {
                message: format!("schema setup: {e}"),
            })?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    fn row_to_checkpoint(row: &SqliteRow) -> std::result::Result<Checkpoint, SqliteCheckpointerError> {
        let payload: String = row.try_get("payload")?;
        let persisted = PersistedCheckpoint::from_json_str(&payload)?;
        Ok(Checkpoint::try_from(persisted)?)
    }
}

#[async_trait::async_trait]
impl Checkpointer for SqliteCheckpointer {
    #[instrument(skip(self, checkpoint), err)]
    async fn save(&self, checkpoint: Checkpoint) -> Result<()> {
        let persisted = PersistedCheckpoint::from(&checkpoint);
        let payload = persisted
            .to_json_string()
            .map_err(SqliteCheckpointerError::from)
            .map_err(CheckpointerError::from)?;
        let status = checkpoint.status.as_str();

        sqlx::query(
            r#"
            INSERT INTO checkpoints (
                session_id,
                format_version,
                step,
                status,
                payload,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(session_id) DO UPDATE SET
                format_version = excluded.format_version,
                step = excluded.step,
                status = excluded.status,
                payload = excluded.payload,
                updated_at = excluded.updated_at
        "#,
        )
        .bind(&checkpoint.session_id)
        .bind(i64::from(persisted.format_version))
        .bind(checkpoint.step as i64)
        .bind(status)
        .bind(&payload)
        .bind(checkpoint.created_at.to_rfc3339())
        .execute(&*self.pool)
        .await
        .map_err(|e| CheckpointerError::Backend {
            message: format!("upsert checkpoint: {e}"),
        })?;

        Ok(())
    }

    #[instrument(skip(self, session_id), err)]
    async fn load(&self, session_id: &str) -> Result<Option<Checkpoint>> {
        let row: Option<SqliteRow> =
            sqlx::query("SELECT payload FROM checkpoints WHERE session_id = ?1")
                .bind(session_id)
                .fetch_optional(&*self.pool)
                .await
                .map_err(|e| CheckpointerError::Backend {
                    message: format!("select checkpoint: {e}"),
                })?;

        match row {
            Some(row) => {
                let checkpoint =
                    Self::row_to_checkpoint(&row).map_err(CheckpointerError::from)?;
                Ok(Some(checkpoint))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    async fn list_sessions(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT session_id FROM checkpoints ORDER BY session_id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| CheckpointerError::Backend {
                message: format!("list sessions: {e}"),
            })?;
        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("session_id")
                    .map_err(|e| CheckpointerError::Backend {
                        message: format!("read session id: {e}"),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupt::Interrupt;
    use crate::state::ConversationState;
    use crate::types::NodeName;

    async fn memory_store() -> SqliteCheckpointer {
        SqliteCheckpointer::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite connects")
    }

    #[tokio::test]
    /// Suspended checkpoints round-trip through the JSON payload column.
    async fn test_save_and_load_round_trip() {
        let store = memory_store().await;
        let mut state = ConversationState::new_with_human_message("book a meeting");
        state.pending_prompt = Some("what time?".into());
        let checkpoint = Checkpoint::suspended(
            "sess1",
            state,
            NodeName::SeekMoreInfo,
            Interrupt::seek_more_info("need info", "what time?"),
            3,
        );
        store.save(checkpoint.clone()).await.unwrap();

        let loaded = store.load("sess1").await.unwrap().unwrap();
        assert_eq!(loaded.session_id, checkpoint.session_id);
        assert_eq!(loaded.step, 3);
        assert_eq!(loaded.state, checkpoint.state);
        assert_eq!(loaded.suspended_at, Some(NodeName::SeekMoreInfo));
        assert_eq!(loaded.interrupt, checkpoint.interrupt);
    }

    #[tokio::test]
    /// Re-saving a session replaces its single row (last-write-wins).
    async fn test_save_overwrites_row() {
        let store = memory_store().await;
        let state = ConversationState::new();
        store
            .save(Checkpoint::terminated("sess1", state.clone(), 2))
            .await
            .unwrap();
        store
            .save(Checkpoint::terminated("sess1", state, 9))
            .await
            .unwrap();
        let loaded = store.load("sess1").await.unwrap().unwrap();
        assert_eq!(loaded.step, 9);
        assert_eq!(store.list_sessions().await.unwrap(), vec!["sess1"]);
    }

    #[tokio::test]
    /// Unknown sessions load as None, not as an error.
    async fn test_unknown_session_is_none() {
        let store = memory_store().await;
        assert!(store.load("missing").await.unwrap().is_none());
    }
}
