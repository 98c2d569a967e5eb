//! Database abstraction layer.
//!
//! [`TaskStore`] is the contract the service layer needs from persistence.
//! The default implementation is [`SqliteStore`]. To swap to another
//! database, implement [`TaskStore`] for the new type and change the concrete
//! type in [`crate::state::AppState`].
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required.

pub mod dao;
pub mod task;

pub use dao::{NewTask, TaskFilter, TaskPatch, TaskRecord};
pub use task::TaskStore;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// SQLite-backed task store.
///
/// Owns the connection pool. Open it once at startup with
/// [`SqliteStore::connect`] and release it with [`SqliteStore::close`] during
/// shutdown.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g.
    /// `"sqlite://tasklist.db?mode=rwc"`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        Self::migrate(pool).await
    }

    /// Private in-memory database.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to one connection that is never recycled.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Close every pooled connection; further queries fail with `PoolClosed`.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
