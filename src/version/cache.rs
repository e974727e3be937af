use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info, warn};

use crate::version::catalog::Catalog;
use crate::version::error::CacheError;
use crate::version::identifier::Version;
use crate::version::ledger::FailureLedger;

/// Bumped whenever the table layout changes; older databases are rebuilt.
const SCHEMA_VERSION: i32 = 1;

/// Result of reading the persisted catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub catalog: Catalog,
    pub ledger: FailureLedger,
    pub fetched_at: Option<DateTime<Utc>>,
    /// True when the catalog must be refetched (too old, absent or unreadable)
    pub is_stale: bool,
}

impl CacheSnapshot {
    fn empty() -> Self {
        Self {
            catalog: Catalog::default(),
            ledger: FailureLedger::default(),
            fetched_at: None,
            is_stale: true,
        }
    }
}

/// SQLite-backed store for the last fetched catalog and the failure ledger
pub struct CatalogCache {
    conn: Connection,
    refresh_interval: TimeDelta,
}

impl CatalogCache {
    /// Opens (or creates) the cache database. A file that is not a SQLite
    /// database is removed and recreated.
    pub fn open(db_path: &Path, refresh_interval_ms: i64) -> Result<Self, CacheError> {
        info!("Opening catalog cache at {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match Self::connect(db_path, refresh_interval_ms) {
            Err(CacheError::Database(e)) if e.sqlite_error_code() == Some(ErrorCode::NotADatabase) => {
                warn!("Catalog cache {:?} is unreadable, recreating it: {}", db_path, e);
                std::fs::remove_file(db_path)?;
                Self::connect(db_path, refresh_interval_ms)
            }
            result => result,
        }
    }

    /// Cache that lives only for this process
    pub fn in_memory(refresh_interval_ms: i64) -> Result<Self, CacheError> {
        Self::with_connection(Connection::open_in_memory()?, refresh_interval_ms)
    }

    fn connect(db_path: &Path, refresh_interval_ms: i64) -> Result<Self, CacheError> {
        Self::with_connection(Connection::open(db_path)?, refresh_interval_ms)
    }

    fn with_connection(conn: Connection, refresh_interval_ms: i64) -> Result<Self, CacheError> {
        let cache = Self {
            conn,
            refresh_interval: TimeDelta::milliseconds(refresh_interval_ms),
        };
        cache.create_schema()?;
        Ok(cache)
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        let current_version: i32 =
            self.conn
                .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if current_version != 0 && current_version != SCHEMA_VERSION {
            debug!(
                "Dropping cache tables from schema v{} (current v{})",
                current_version, SCHEMA_VERSION
            );
            self.conn.execute_batch(
                r#"
                DROP TABLE IF EXISTS catalog_meta;
                DROP TABLE IF EXISTS catalog_versions;
                DROP TABLE IF EXISTS failure_floors;
                "#,
            )?;
        }

        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS catalog_meta (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                fetched_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS catalog_versions (
                version TEXT PRIMARY KEY
            );
            CREATE TABLE IF NOT EXISTS failure_floors (
                minor INTEGER PRIMARY KEY,
                version TEXT NOT NULL
            );
            "#,
        )?;
        self.conn
            .pragma_update(None, "user_version", SCHEMA_VERSION)?;

        debug!("Catalog cache schema ready");
        Ok(())
    }

    /// Reads the persisted snapshot. Never fails: anything unreadable is
    /// reported as a stale, empty snapshot so the caller refetches.
    pub fn load(&self) -> CacheSnapshot {
        self.load_at(Utc::now())
    }

    pub fn load_at(&self, now: DateTime<Utc>) -> CacheSnapshot {
        match self.read(now) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Ignoring unreadable catalog cache: {}", e);
                CacheSnapshot::empty()
            }
        }
    }

    fn read(&self, now: DateTime<Utc>) -> Result<CacheSnapshot, CacheError> {
        let ledger = self
            .read_column("SELECT version FROM failure_floors")?
            .into_iter()
            .collect::<FailureLedger>();

        let fetched_at: Option<i64> = self
            .conn
            .query_row(
                "SELECT fetched_at FROM catalog_meta WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let Some(fetched_at) = fetched_at else {
            debug!("No catalog has been cached yet");
            return Ok(CacheSnapshot {
                ledger,
                ..CacheSnapshot::empty()
            });
        };

        let fetched_at = DateTime::from_timestamp_millis(fetched_at)
            .ok_or_else(|| CacheError::Corrupt(format!("bad timestamp {}", fetched_at)))?;
        let catalog = Catalog::from_versions(self.read_column("SELECT version FROM catalog_versions")?);
        let is_stale = now - fetched_at > self.refresh_interval;

        debug!(
            "Loaded {} cached versions fetched at {} (stale: {})",
            catalog.len(),
            fetched_at,
            is_stale
        );

        Ok(CacheSnapshot {
            catalog,
            ledger,
            fetched_at: Some(fetched_at),
            is_stale,
        })
    }

    fn read_column(&self, sql: &str) -> Result<Vec<Version>, CacheError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        rows.iter()
            .map(|raw| {
                raw.parse()
                    .map_err(|_| CacheError::Corrupt(format!("bad version {:?}", raw)))
            })
            .collect()
    }

    /// Replaces the persisted catalog and ledger in a single transaction.
    pub fn save(
        &mut self,
        catalog: &Catalog,
        ledger: &FailureLedger,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        debug!(
            "Saving {} versions and {} ledger floors",
            catalog.len(),
            ledger.iter().count()
        );

        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM catalog_versions", [])?;
        tx.execute("DELETE FROM failure_floors", [])?;
        {
            let mut stmt = tx.prepare("INSERT OR IGNORE INTO catalog_versions (version) VALUES (?1)")?;
            for version in catalog.versions() {
                stmt.execute([version.to_string()])?;
            }

            let mut stmt =
                tx.prepare("INSERT INTO failure_floors (minor, version) VALUES (?1, ?2)")?;
            for floor in ledger.iter() {
                stmt.execute((floor.minor, floor.to_string()))?;
            }
        }
        tx.execute(
            r#"
            INSERT INTO catalog_meta (id, fetched_at) VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET fetched_at = excluded.fetched_at
            "#,
            [fetched_at.timestamp_millis()],
        )?;

        tx.commit()?;
        info!("Catalog cache saved");
        Ok(())
    }
}

/// Removes the whole cache directory, including downloaded installers.
pub fn clear_cache_dir(dir: &Path) -> Result<(), CacheError> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {
            info!("Removed cache directory {:?}", dir);
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
