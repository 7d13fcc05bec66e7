//! Relational item store (SQLite via Diesel)
//!
//! Owns the `item` table. Connections come from an r2d2 pool; every
//! pooled connection gets WAL mode and a busy timeout so concurrent
//! writers queue inside SQLite instead of failing.

use std::path::Path;
use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use tracing::{debug, info};

use super::diesel_schema::item;
use super::models::{NewSqlItem, SqlItem};
use crate::types::{ItemwayError, Result};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type PooledConn = PooledConnection<ConnectionManager<SqliteConnection>>;

const BUSY_TIMEOUT_MS: u32 = 5_000;

/// PRAGMAs applied to each connection as the pool hands it out
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    wal: bool,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        let mut pragmas = format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS);
        if self.wal {
            pragmas.push_str(" PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        conn.batch_execute(&pragmas)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// SQLite-backed item store
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Open or create the database file and ensure the schema exists
    pub fn open(path: &Path, pool_size: u32) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Opening SQLite database at {:?}", path);

        let manager = ConnectionManager::<SqliteConnection>::new(path.to_string_lossy());
        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_customizer(Box::new(ConnectionOptions { wal: true }))
            .build(manager)
            .map_err(|e| ItemwayError::Database(format!("Failed to open SQLite: {}", e)))?;

        let store = Self { pool };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    ///
    /// Each SQLite connection to `:memory:` is its own database, so the pool
    /// holds exactly one connection and never recycles it.
    pub fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory SQLite database");

        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(Duration::from_secs(30))
            .connection_customizer(Box::new(ConnectionOptions { wal: false }))
            .build(manager)
            .map_err(|e| ItemwayError::Database(format!("Failed to open in-memory SQLite: {}", e)))?;

        let store = Self { pool };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        let mut conn = self.conn()?;

        diesel::sql_query(
            r#"
            CREATE TABLE IF NOT EXISTS item (
                id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                name VARCHAR(100) NOT NULL,
                description VARCHAR(255) NOT NULL
            )
            "#,
        )
        .execute(&mut conn)
        .map_err(|e| ItemwayError::Database(format!("Failed to create item table: {}", e)))?;

        Ok(())
    }

    fn conn(&self) -> Result<PooledConn> {
        self.pool
            .get()
            .map_err(|e| ItemwayError::Database(format!("Failed to get connection: {}", e)))
    }

    /// Insert an item and return its assigned id
    pub fn create_item(&self, name: &str, description: &str) -> Result<i32> {
        let mut conn = self.conn()?;

        // IMMEDIATE takes the write lock up front, so the id read back is ours.
        conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(item::table)
                .values(&NewSqlItem { name, description })
                .execute(conn)?;

            item::table
                .select(item::id)
                .order(item::id.desc())
                .first::<i32>(conn)
        })
        .map_err(|e| ItemwayError::Database(format!("Insert failed: {}", e)))
    }

    /// All items in insertion order
    pub fn list_items(&self) -> Result<Vec<SqlItem>> {
        let mut conn = self.conn()?;

        item::table
            .select(SqlItem::as_select())
            .order(item::id.asc())
            .load(&mut conn)
            .map_err(|e| ItemwayError::Database(format!("Query failed: {}", e)))
    }

    /// Number of stored items
    pub fn item_count(&self) -> Result<i64> {
        let mut conn = self.conn()?;

        item::table
            .count()
            .get_result(&mut conn)
            .map_err(|e| ItemwayError::Database(format!("Count failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_then_list() {
        let store = SqliteStore::open_in_memory().unwrap();

        let id = store.create_item("Widget", "A small widget").unwrap();
        assert_eq!(id, 1);

        let items = store.list_items().unwrap();
        assert_eq!(
            items,
            vec![SqlItem {
                id: 1,
                name: "Widget".to_string(),
                description: "A small widget".to_string(),
            }]
        );
    }

    #[test]
    fn test_ids_increase_in_insertion_order() {
        let store = SqliteStore::open_in_memory().unwrap();

        let first = store.create_item("a", "first").unwrap();
        let second = store.create_item("b", "second").unwrap();
        assert!(second > first);

        let names: Vec<String> = store.list_items().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(store.item_count().unwrap(), 2);
    }

    #[test]
    fn test_file_database_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("database.db");

        {
            let store = SqliteStore::open(&path, 2).unwrap();
            store.create_item("Lamp", "Desk lamp").unwrap();
        }

        let reopened = SqliteStore::open(&path, 2).unwrap();
        let items = reopened.list_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Lamp");
    }

    #[test]
    fn test_concurrent_creates_are_not_lost() {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::open(&temp.path().join("database.db"), 4).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.create_item(&format!("item-{}", i), "concurrent"))
            })
            .collect();

        let mut ids: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(store.list_items().unwrap().len(), 16);
    }
}
