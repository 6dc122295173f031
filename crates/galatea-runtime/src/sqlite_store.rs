//! SQLite-backed implementation of the Repository trait.
//!
//! Each aggregate kind gets its own table. The aggregate, nested
//! collections included, is stored as a JSON blob next to its id and
//! name, so a mix or a set is always read and written as a unit.

#![cfg(feature = "sqlite")]

use crate::repository::{already_exists, not_found, Entity, Repository, Transactions};
use galatea_core::error::StoreError;
use galatea_core::pagination::PageRequest;
use rusqlite::{params, Connection, OptionalExtension};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// A connection shared by every repository of one store.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Open (or create) a file-backed database.
pub fn open_connection<P: AsRef<Path>>(path: P) -> Result<SharedConnection, StoreError> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend(e.to_string()))?;
        }
    }
    let conn = Connection::open(path).map_err(backend)?;
    init_connection(conn)
}

/// Open a private in-memory database.
pub fn open_in_memory() -> Result<SharedConnection, StoreError> {
    let conn = Connection::open_in_memory().map_err(backend)?;
    init_connection(conn)
}

fn init_connection(conn: Connection) -> Result<SharedConnection, StoreError> {
    // Single writer; WAL keeps readers off the writer's back.
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
        .map_err(backend)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// SQLite repository for one entity kind.
pub struct SqliteRepository<T> {
    conn: SharedConnection,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> SqliteRepository<T> {
    /// Create the entity's table if needed and wrap the connection.
    pub fn new(conn: SharedConnection) -> Result<Self, StoreError> {
        let repo = Self {
            conn,
            _entity: PhantomData,
        };
        repo.lock()?
            .execute_batch(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    body TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_{table}_name ON {table}(name);
                "#,
                table = T::TABLE
            ))
            .map_err(backend)?;
        Ok(repo)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("connection mutex poisoned".to_string()))
    }

    fn encode(item: &T) -> Result<String, StoreError> {
        serde_json::to_string(item)
            .map_err(|e| StoreError::Corrupt(format!("{} {}: {}", T::KIND, item.key(), e)))
    }

    fn decode(body: &str) -> Result<T, StoreError> {
        serde_json::from_str(body).map_err(|e| StoreError::Corrupt(format!("{}: {}", T::KIND, e)))
    }

    fn count(conn: &Connection) -> Result<usize, StoreError> {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", T::TABLE), [], |row| row.get(0))
            .map_err(backend)?;
        Ok(count as usize)
    }
}

impl<T: Entity> Repository<T> for SqliteRepository<T> {
    fn create(&mut self, item: &T) -> Result<(), StoreError> {
        let body = Self::encode(item)?;
        let conn = self.lock()?;
        debug!(kind = T::KIND, id = item.key(), "sqlite insert");

        let inserted = conn
            .execute(
                &format!(
                    "INSERT OR IGNORE INTO {} (id, name, body) VALUES (?1, ?2, ?3)",
                    T::TABLE
                ),
                params![item.key(), item.label(), body],
            )
            .map_err(backend)?;
        if inserted == 0 {
            return Err(already_exists::<T>(item.key()));
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Result<T, StoreError> {
        let conn = self.lock()?;
        let body: Option<String> = conn
            .query_row(
                &format!("SELECT body FROM {} WHERE id = ?1", T::TABLE),
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(backend)?;

        match body {
            Some(body) => Self::decode(&body),
            None => Err(not_found::<T>(id)),
        }
    }

    fn update(&mut self, item: &T) -> Result<(), StoreError> {
        let body = Self::encode(item)?;
        let conn = self.lock()?;
        debug!(kind = T::KIND, id = item.key(), "sqlite update");

        let changed = conn
            .execute(
                &format!("UPDATE {} SET name = ?2, body = ?3 WHERE id = ?1", T::TABLE),
                params![item.key(), item.label(), body],
            )
            .map_err(backend)?;
        if changed == 0 {
            return Err(not_found::<T>(item.key()));
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        debug!(kind = T::KIND, id, "sqlite delete");

        let changed = conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1", T::TABLE), params![id])
            .map_err(backend)?;
        if changed == 0 {
            return Err(not_found::<T>(id));
        }
        Ok(())
    }

    fn list(&self, request: PageRequest) -> Result<(Vec<T>, usize), StoreError> {
        let conn = self.lock()?;
        let total = Self::count(&conn)?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT body FROM {} ORDER BY id LIMIT ?1 OFFSET ?2",
                T::TABLE
            ))
            .map_err(backend)?;
        let bodies = stmt
            .query_map(
                params![to_sql_int(request.page_size), to_sql_int(request.offset())],
                |row| row.get::<_, String>(0),
            )
            .map_err(backend)?
            .collect::<Result<Vec<String>, _>>()
            .map_err(backend)?;

        let items = bodies
            .iter()
            .map(|body| Self::decode(body))
            .collect::<Result<Vec<T>, _>>()?;
        Ok((items, total))
    }

    fn exists(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", T::TABLE),
            params![id],
            |row| row.get(0),
        )
        .map_err(backend)
    }

    fn all(&self) -> Result<Vec<T>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("SELECT body FROM {} ORDER BY id", T::TABLE))
            .map_err(backend)?;
        let bodies = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(backend)?
            .collect::<Result<Vec<String>, _>>()
            .map_err(backend)?;

        bodies.iter().map(|body| Self::decode(body)).collect()
    }
}

/// Transaction control over a connection shared by a store's repositories.
pub struct SqliteTransactions {
    conn: SharedConnection,
}

impl SqliteTransactions {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn run(&self, sql: &str) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Backend("connection mutex poisoned".to_string()))?;
        debug!(sql, "sqlite transaction");
        conn.execute_batch(sql).map_err(backend)
    }
}

impl Transactions for SqliteTransactions {
    fn begin(&self) -> Result<(), StoreError> {
        self.run("BEGIN IMMEDIATE")
    }

    fn commit(&self) -> Result<(), StoreError> {
        self.run("COMMIT")
    }

    fn rollback(&self) -> Result<(), StoreError> {
        self.run("ROLLBACK")
    }
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// SQLite integers are signed; larger values clamp instead of wrapping.
fn to_sql_int(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galatea_core::prelude::{MixedSubstrate, Substrate, SubstrateSet};

    #[test]
    fn crud_cycle() {
        let conn = open_in_memory().unwrap();
        let mut repo = SqliteRepository::<Substrate>::new(conn).unwrap();
        let sand = Substrate::new("sand", "Sand", "#c2b280");

        repo.create(&sand).unwrap();
        assert!(repo.exists("sand").unwrap());
        assert!(!repo.exists("peat").unwrap());
        assert_eq!(
            repo.create(&sand),
            Err(StoreError::AlreadyExists { kind: "substrate", id: "sand".into() })
        );

        let mut renamed = sand.clone();
        renamed.color = "#ffffff".into();
        repo.update(&renamed).unwrap();
        assert_eq!(repo.get("sand").unwrap(), renamed);

        repo.delete("sand").unwrap();
        assert!(matches!(repo.get("sand"), Err(StoreError::NotFound { .. })));
        assert!(matches!(repo.delete("sand"), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn aggregates_round_trip_with_nested_collections() {
        let conn = open_in_memory().unwrap();
        let mut sets = SqliteRepository::<SubstrateSet>::new(conn.clone()).unwrap();
        let mut mixes = SqliteRepository::<MixedSubstrate>::new(conn).unwrap();

        let sand = Substrate::new("sand", "Sand", "#c2b280");
        let peat = Substrate::new("peat", "Peat", "#3b2f2f");
        let mut mix = MixedSubstrate::new("seed", "Seed mix", "#554433");
        mix.add_substrate(sand.clone(), 25.0).unwrap();
        mix.add_substrate(peat.clone(), 75.0).unwrap();

        let mut set = SubstrateSet::new("nursery", "Nursery");
        set.add_substrate(sand).unwrap();
        set.add_substrate(peat).unwrap();
        set.add_mixed_substrate(mix.clone()).unwrap();

        mixes.create(&mix).unwrap();
        sets.create(&set).unwrap();

        assert_eq!(mixes.get("seed").unwrap(), mix);
        let loaded = sets.get("nursery").unwrap();
        assert_eq!(loaded, set);
        assert!(loaded.check_integrity().is_ok());
    }

    #[test]
    fn list_is_paged_and_ordered() {
        let conn = open_in_memory().unwrap();
        let mut repo = SqliteRepository::<Substrate>::new(conn).unwrap();
        for id in ["c", "a", "e", "b", "d"] {
            repo.create(&Substrate::new(id, id, "#000")).unwrap();
        }

        let (items, total) = repo.list(PageRequest::new(2, 2)).unwrap();
        assert_eq!(total, 5);
        let ids: Vec<_> = items.iter().map(|s| s.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["c", "d"]);
        assert_eq!(repo.all().unwrap().len(), 5);

        let (beyond, total) = repo.list(PageRequest::new(usize::MAX, 2)).unwrap();
        assert!(beyond.is_empty());
        assert_eq!(total, 5);
    }

    #[test]
    fn rollback_discards_writes_across_tables() {
        let conn = open_in_memory().unwrap();
        let mut substrates = SqliteRepository::<Substrate>::new(conn.clone()).unwrap();
        let mut sets = SqliteRepository::<SubstrateSet>::new(conn.clone()).unwrap();
        let tx = SqliteTransactions::new(conn);

        substrates.create(&Substrate::new("sand", "Sand", "#c2b280")).unwrap();
        sets.create(&SubstrateSet::new("nursery", "Nursery")).unwrap();

        tx.begin().unwrap();
        substrates.update(&Substrate::new("sand", "River sand", "#c2b280")).unwrap();
        sets.update(&SubstrateSet::new("nursery", "Greenhouse")).unwrap();
        tx.rollback().unwrap();

        assert_eq!(substrates.get("sand").unwrap().name, "Sand");
        assert_eq!(sets.get("nursery").unwrap().name, "Nursery");

        tx.begin().unwrap();
        substrates.update(&Substrate::new("sand", "River sand", "#c2b280")).unwrap();
        tx.commit().unwrap();
        assert_eq!(substrates.get("sand").unwrap().name, "River sand");
    }
}
