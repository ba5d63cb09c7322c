use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::data::{Item, ItemKind};
use crate::error::Result;

/// Bump when the cached listing layout changes; older caches are discarded
pub const CACHE_VERSION: &str = "1.0";

/// The Library keeps the last successful listing in a SQLite catalog.
/// It lets the gallery show something immediately at startup and
/// while the output directory cannot be read.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

impl Library {
    /// Open (or create) the catalog in the user's data directory:
    /// - Linux: ~/.local/share/xo-gallery/listing.db
    /// - macOS: ~/Library/Application Support/xo-gallery/listing.db
    /// - Windows: %APPDATA%\xo-gallery\listing.db
    pub fn open_default() -> Result<Self> {
        Self::open(&Self::default_path())
    }

    /// Open the catalog at an explicit path
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        debug!(path = %db_path.display(), "listing cache opened");

        let library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;

        Ok(library)
    }

    /// Get the path where the catalog should be stored
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("xo-gallery");
        path.push("listing.db");
        path
    }

    /// Creates the tables if they don't exist.
    fn init_schema(&self) -> Result<()> {
        // Single-row bookkeeping for the stored listing
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS listing_meta (
                id              INTEGER PRIMARY KEY CHECK (id = 1),
                version         TEXT NOT NULL,
                saved_at        INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS items (
                path            TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                modified        INTEGER NOT NULL,
                size            INTEGER NOT NULL,
                kind            TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Replace the stored listing with `items`
    pub fn save_listing(&mut self, items: &[Item]) -> Result<()> {
        self.save_listing_at(items, Utc::now())
    }

    fn save_listing_at(&mut self, items: &[Item], saved_at: DateTime<Utc>) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM items", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO items (path, name, modified, size, kind) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for item in items {
                stmt.execute(params![
                    item.path,
                    item.name,
                    item.modified.timestamp_millis(),
                    item.size as i64,
                    item.kind.as_str(),
                ])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO listing_meta (id, version, saved_at) VALUES (1, ?1, ?2)",
            params![CACHE_VERSION, saved_at.timestamp_millis()],
        )?;
        tx.commit()?;

        debug!(count = items.len(), "listing cached");
        Ok(())
    }

    /// Load the stored listing.
    ///
    /// Returns `None` when nothing is stored, and also drops the cache when it
    /// was written by another layout version or is older than `max_age`.
    pub fn load_listing(&self, max_age: Duration) -> Result<Option<Vec<Item>>> {
        self.load_listing_at(max_age, Utc::now())
    }

    fn load_listing_at(&self, max_age: Duration, now: DateTime<Utc>) -> Result<Option<Vec<Item>>> {
        let meta: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT version, saved_at FROM listing_meta WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((version, saved_at)) = meta else {
            return Ok(None);
        };

        if version != CACHE_VERSION {
            info!(%version, "listing cache version mismatch, clearing");
            self.clear()?;
            return Ok(None);
        }

        if is_stale(saved_at, max_age, now) {
            info!("listing cache too old, clearing");
            self.clear()?;
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT path, name, modified, size, kind FROM items ORDER BY modified DESC")?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (path, name, modified, size, kind) = row?;
            let (Some(kind), Some(modified)) =
                (ItemKind::parse(&kind), DateTime::from_timestamp_millis(modified))
            else {
                warn!(%path, "skipping unreadable cached item");
                continue;
            };
            items.push(Item {
                path,
                name,
                modified,
                size: size.max(0) as u64,
                kind,
            });
        }

        Ok(Some(items))
    }

    /// Drop the stored listing if it is older than `max_age`; returns whether it was dropped
    pub fn prune(&self, max_age: Duration) -> Result<bool> {
        let saved_at: Option<i64> = self
            .conn
            .query_row("SELECT saved_at FROM listing_meta WHERE id = 1", [], |row| row.get(0))
            .optional()?;

        match saved_at {
            Some(saved_at) if is_stale(saved_at, max_age, Utc::now()) => {
                self.clear()?;
                info!("pruned stale listing cache");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Remove everything stored
    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM items", [])?;
        self.conn.execute("DELETE FROM listing_meta", [])?;
        Ok(())
    }

    /// Number of cached items
    pub fn item_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn is_stale(saved_at_millis: i64, max_age: Duration, now: DateTime<Utc>) -> bool {
    let age = now.timestamp_millis().saturating_sub(saved_at_millis);
    age > max_age.as_millis() as i64
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn sample() -> Vec<Item> {
        vec![
            Item {
                path: "old.png".into(),
                name: "old.png".into(),
                modified: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
                size: 1024,
                kind: ItemKind::Image,
            },
            Item {
                path: "notes/new.txt".into(),
                name: "new.txt".into(),
                modified: Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap(),
                size: 12,
                kind: ItemKind::Text,
            },
        ]
    }

    const MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24);

    fn open_temp() -> (TempDir, Library) {
        let dir = TempDir::new().unwrap();
        let library = Library::open(&dir.path().join("cache").join("listing.db")).unwrap();
        (dir, library)
    }

    #[test]
    fn test_empty_cache_loads_nothing() {
        let (_dir, library) = open_temp();
        assert!(library.load_listing(MAX_AGE).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_listing() {
        let (_dir, mut library) = open_temp();
        library.save_listing(&sample()).unwrap();

        let items = library.load_listing(MAX_AGE).unwrap().unwrap();
        assert_eq!(items.len(), 2);
        // Newest first
        assert_eq!(items[0].path, "notes/new.txt");
        assert_eq!(items[0].kind, ItemKind::Text);
        assert_eq!(items[1], sample()[0]);
    }

    #[test]
    fn test_save_replaces_previous_listing() {
        let (_dir, mut library) = open_temp();
        library.save_listing(&sample()).unwrap();
        library.save_listing(&sample()[..1]).unwrap();
        assert_eq!(library.item_count().unwrap(), 1);
    }

    #[test]
    fn test_stale_listing_is_dropped() {
        let (_dir, mut library) = open_temp();
        let saved = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        library.save_listing_at(&sample(), saved).unwrap();

        let fresh = saved + chrono::Duration::hours(23);
        assert!(library.load_listing_at(MAX_AGE, fresh).unwrap().is_some());

        let stale = saved + chrono::Duration::hours(25);
        assert!(library.load_listing_at(MAX_AGE, stale).unwrap().is_none());
        assert_eq!(library.item_count().unwrap(), 0);
    }

    #[test]
    fn test_version_mismatch_clears() {
        let (_dir, mut library) = open_temp();
        library.save_listing(&sample()).unwrap();
        library
            .conn
            .execute("UPDATE listing_meta SET version = '0.9'", [])
            .unwrap();

        assert!(library.load_listing(MAX_AGE).unwrap().is_none());
        assert_eq!(library.item_count().unwrap(), 0);
    }

    #[test]
    fn test_prune() {
        let (_dir, mut library) = open_temp();
        library.save_listing(&sample()).unwrap();
        assert!(!library.prune(MAX_AGE).unwrap());

        library
            .save_listing_at(&sample(), Utc::now() - chrono::Duration::days(2))
            .unwrap();
        assert!(library.prune(MAX_AGE).unwrap());
        assert_eq!(library.item_count().unwrap(), 0);
    }
}
