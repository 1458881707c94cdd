//! SQLite backend.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use super::{PatientCollection, StorageBackend, StoreResult};

/// SQLite schema: one row per patient, record stored as a JSON object.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    record TEXT NOT NULL                         -- JSON object, without the id
);
"#;

/// Stores the collection in a SQLite database.
///
/// Same whole-collection contract as the JSON file, but each flush deletes
/// and reinserts every row inside a single transaction, so a crash leaves
/// either the old or the new collection. Rows are written in collection
/// order and read back by rowid, which preserves that order.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::initialize(Connection::open(path)?)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl StorageBackend for SqliteBackend {
    fn load(&self) -> StoreResult<PatientCollection> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare("SELECT id, record FROM patients ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut collection = PatientCollection::new();
        for row in rows {
            let (id, record_json) = row?;
            collection.insert(id, serde_json::from_str(&record_json)?);
        }
        Ok(collection)
    }

    fn flush(&self, collection: &PatientCollection) -> StoreResult<()> {
        let mut conn = self.conn.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM patients", [])?;
        {
            let mut stmt = tx.prepare("INSERT INTO patients (id, record) VALUES (?1, ?2)")?;
            for (id, record) in collection {
                let record_json = serde_json::to_string(record)?;
                stmt.execute(params![id, record_json])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
