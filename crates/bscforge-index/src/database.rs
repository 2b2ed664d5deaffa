//! Index connection and pool management.

use crate::error::{IndexError, IndexResult};
use crate::migrations;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use tracing::info;

/// Type alias for connection pool.
pub type ConnectionPool = Pool<SqliteConnectionManager>;
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Handle to the on-disk knowledge-base index.
#[derive(Clone)]
pub struct Index {
    pool: ConnectionPool,
}

impl Index {
    /// Open the index at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> IndexResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| IndexError::Other(e.to_string()))?;
        }

        info!("Opening knowledge base at: {}", path.display());

        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;",
            )?;
            Ok(())
        });

        let pool = Pool::builder().max_size(10).build(manager)?;

        // Initialize schema
        {
            let conn = pool.get()?;
            migrations::initialize_schema(&conn)?;
        }

        Ok(Self { pool })
    }

    /// Open an in-memory index (for testing).
    pub fn open_in_memory() -> IndexResult<Self> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        // Memory DB only supports a single connection
        let pool = Pool::builder().max_size(1).build(manager)?;

        {
            let conn = pool.get()?;
            migrations::initialize_schema(&conn)?;
        }

        Ok(Self { pool })
    }

    /// Get a connection from the pool.
    pub fn conn(&self) -> IndexResult<PooledConn> {
        self.pool.get().map_err(IndexError::from)
    }

    /// Get index file size in bytes.
    pub fn file_size<P: AsRef<Path>>(path: P) -> IndexResult<i64> {
        let metadata = std::fs::metadata(path).map_err(|e| IndexError::Other(e.to_string()))?;
        Ok(metadata.len() as i64)
    }
}
