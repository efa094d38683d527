//! Data store gateway.
//!
//! [`EventDatabase`] is the only component that touches the SQLite file. It
//! owns the connection handle for the life of the process and hands out one
//! repository per table.

mod error;
mod event_repo;
mod guest_repo;
mod task_repo;
mod user_repo;

pub use error::DbError;
pub use event_repo::EventRepository;
pub use guest_repo::GuestRepository;
pub use task_repo::TaskRepository;
pub use user_repo::UserRepository;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};

/// Open (creating if absent) the database file and bring its schema up to date.
///
/// Safe to call on every start; already-applied migrations are skipped.
pub async fn init_db(path: &Path) -> Result<SqlitePool, DbError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .foreign_keys(true)
        .create_if_missing(true);

    // One shared handle; the app is single-user and single-process
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Opened database at {}", path.display());

    Ok(pool)
}

/// Owned handle to the event store.
pub struct EventDatabase {
    pool: SqlitePool,
    path: PathBuf,
}

impl EventDatabase {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DbError> {
        let path = path.into();
        let pool = init_db(&path).await?;
        Ok(Self { pool, path })
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn events(&self) -> EventRepository {
        EventRepository::new(self.pool.clone())
    }

    pub fn tasks(&self) -> TaskRepository {
        TaskRepository::new(self.pool.clone())
    }

    pub fn guests(&self) -> GuestRepository {
        GuestRepository::new(self.pool.clone())
    }

    /// Path backing this database
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the connection. Repositories handed out earlier stop working.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::debug!("Closed database at {}", self.path.display());
    }
}
