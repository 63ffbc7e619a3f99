use super::checkpointer::CheckpointerType;

/// Upper bound on node invocations within a single walk.
///
/// A correctly wired graph terminates or suspends well under this; hitting
/// the limit means a routing loop and is surfaced as an engine error.
pub const DEFAULT_STEP_LIMIT: u64 = 25;

/// Runtime configuration for constructing an [`Engine`](super::Engine).
///
/// Construction is explicit: build a config, hand it to
/// [`Engine::from_config`](super::Engine::from_config). There is no
/// process-global engine or lazily initialized default.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub checkpointer: CheckpointerType,
    pub sqlite_db_name: Option<String>,
    pub step_limit: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            checkpointer: CheckpointerType::InMemory,
            sqlite_db_name: Self::resolve_sqlite_db_name(None),
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }
}

impl RuntimeConfig {
    fn resolve_sqlite_db_name(provided: Option<String>) -> Option<String> {
        if let Some(name) = provided {
            return Some(name);
        }
        dotenvy::dotenv().ok();
        Some(
            std::env::var("CONFAB_SQLITE_DB")
                .or_else(|_| std::env::var("SQLITE_DB_NAME"))
                .unwrap_or_else(|_| "confab.db".to_string()),
        )
    }

    pub fn new(checkpointer: CheckpointerType, sqlite_db_name: Option<String>) -> Self {
        Self {
            checkpointer,
            sqlite_db_name: Self::resolve_sqlite_db_name(sqlite_db_name),
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    #[must_use]
    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// The SQLite connection URL for this configuration.
    ///
    /// `CONFAB_SQLITE_URL` wins when set; otherwise the configured (or
    /// env-resolved) database name is used as a file-backed database.
    #[must_use]
    pub fn sqlite_url(&self) -> String {
        if let Ok(url) = std::env::var("CONFAB_SQLITE_URL") {
            return url;
        }
        let name = self
            .sqlite_db_name
            .clone()
            .unwrap_or_else(|| "confab.db".to_string());
        format!("sqlite://{name}")
    }
}
