use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Foreign keys are off by default in SQLite and must be enabled per connection.
const CONNECTION_INIT: &str = "PRAGMA foreign_keys = ON;";

pub fn create_pool(database_url: &str) -> Result<DbPool, r2d2::Error> {
    let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
    // Remove query parameters (e.g., ?mode=rwc)
    let path = path.split('?').next().unwrap_or(path);

    let manager = if path == ":memory:" {
        SqliteConnectionManager::memory()
    } else {
        SqliteConnectionManager::file(Path::new(path))
    }
    .with_init(|conn| conn.execute_batch(CONNECTION_INIT));

    // An in-memory database lives and dies with its connection.
    let max_size = if path == ":memory:" { 1 } else { 5 };

    Pool::builder().max_size(max_size).build(manager)
}

pub fn create_memory_pool() -> Result<DbPool, r2d2::Error> {
    let manager =
        SqliteConnectionManager::memory().with_init(|conn| conn.execute_batch(CONNECTION_INIT));
    Pool::builder().max_size(1).build(manager)
}
