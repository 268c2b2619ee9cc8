//! SQLite connection handle and module migration runner.
//!
//! One connection is shared behind a mutex. Every statement runs on the
//! blocking thread pool through [`Database::call`], so async request handlers
//! never hold the runtime while SQLite works.
//!
//! Invariants:
//! - Connections are returned with `foreign_keys=ON`.
//! - A migration is applied at most once per `(module, id)` pair.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use bookstore_kernel::settings::DatabaseSettings;
use bookstore_kernel::Migration;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    Poisoned,

    #[error("database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("migration {module}/{id} failed: {source}")]
    Migration {
        module: String,
        id: String,
        #[source]
        source: rusqlite::Error,
    },
}

const MIGRATIONS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    module     TEXT NOT NULL,
    id         TEXT NOT NULL,
    applied_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
    PRIMARY KEY (module, id)
);";

/// Shared handle to the catalog database.
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the database described by `settings`.
    pub fn open(settings: &DatabaseSettings) -> DbResult<Self> {
        let started_at = Instant::now();
        let mode = if settings.is_in_memory() { "memory" } else { "file" };
        tracing::info!(target: "bookstore-db", mode, path = %settings.path, "opening database");

        let conn = if settings.is_in_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(&settings.path)
        }
        .map_err(|err| {
            tracing::error!(target: "bookstore-db", mode, error = %err, "database open failed");
            err
        })?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(Duration::from_millis(settings.busy_timeout_ms))?;

        tracing::info!(
            target: "bookstore-db",
            mode,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "database ready"
        );

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::open(&DatabaseSettings::in_memory())
    }

    /// Run `f` against the connection on the blocking thread pool.
    pub async fn call<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| DbError::Poisoned)?;
            f(&*guard).map_err(DbError::from)
        })
        .await?
    }

    /// Apply every migration not yet recorded in `schema_migrations`.
    ///
    /// All pending migrations run inside one transaction. Returns the number
    /// of migrations applied by this call.
    pub async fn migrate(&self, migrations: Vec<(String, Migration)>) -> DbResult<usize> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| DbError::Poisoned)?;
            apply_migrations(&mut *guard, &migrations)
        })
        .await?
    }
}

fn apply_migrations(conn: &mut Connection, migrations: &[(String, Migration)]) -> DbResult<usize> {
    conn.execute_batch(MIGRATIONS_TABLE_SQL)?;

    let tx = conn.transaction()?;
    let mut applied = 0;

    for (module, migration) in migrations {
        let already: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM schema_migrations WHERE module = ?1 AND id = ?2;",
                params![module, migration.id],
                |row| row.get(0),
            )
            .optional()?;
        if already.is_some() {
            continue;
        }

        tx.execute_batch(migration.up)
            .map_err(|source| DbError::Migration {
                module: module.clone(),
                id: migration.id.to_string(),
                source,
            })?;
        tx.execute(
            "INSERT INTO schema_migrations (module, id) VALUES (?1, ?2);",
            params![module, migration.id],
        )?;

        tracing::info!(
            target: "bookstore-db",
            module = %module,
            id = migration.id,
            "migration applied"
        );
        applied += 1;
    }

    tx.commit()?;
    Ok(applied)
}
