//! SQLite-backed platform registry.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{Platform, PlatformError, PlatformRegistry};

/// Platforms present after a fresh bootstrap.
const SEED_PLATFORMS: [(&str, &str); 3] = [
    ("facebook", "Facebook"),
    ("instagram", "Instagram"),
    ("linkedin", "LinkedIn"),
];

/// SQLite-backed platform registry, seeded with the default platforms.
pub struct SqlitePlatformRegistry {
    conn: Mutex<Connection>,
}

impl SqlitePlatformRegistry {
    pub fn new(path: &Path) -> Result<Self, PlatformError> {
        let conn = Connection::open(path).map_err(|e| PlatformError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory registry (useful for testing).
    pub fn in_memory() -> Result<Self, PlatformError> {
        let conn =
            Connection::open_in_memory().map_err(|e| PlatformError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), PlatformError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS platforms (
                id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| PlatformError::Database(e.to_string()))?;

        for (id, display_name) in SEED_PLATFORMS {
            conn.execute(
                "INSERT OR IGNORE INTO platforms (id, display_name, is_active, created_at) \
                 VALUES (?, ?, 1, ?)",
                params![id, display_name, Utc::now().to_rfc3339()],
            )
            .map_err(|e| PlatformError::Database(e.to_string()))?;
        }

        Ok(())
    }

    fn row_to_platform(row: &rusqlite::Row) -> rusqlite::Result<Platform> {
        let created_at_str: String = row.get(3)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Platform {
            id: row.get(0)?,
            display_name: row.get(1)?,
            is_active: row.get::<_, i64>(2)? != 0,
            created_at,
        })
    }
}

impl PlatformRegistry for SqlitePlatformRegistry {
    fn list(&self, active_only: bool) -> Result<Vec<Platform>, PlatformError> {
        let conn = self.conn.lock().unwrap();
        let sql = if active_only {
            "SELECT id, display_name, is_active, created_at FROM platforms \
             WHERE is_active = 1 ORDER BY id"
        } else {
            "SELECT id, display_name, is_active, created_at FROM platforms ORDER BY id"
        };

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| PlatformError::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], Self::row_to_platform)
            .map_err(|e| PlatformError::Database(e.to_string()))?;

        let mut platforms = Vec::new();
        for row in rows {
            platforms.push(row.map_err(|e| PlatformError::Database(e.to_string()))?);
        }
        Ok(platforms)
    }

    fn get(&self, id: &str) -> Result<Option<Platform>, PlatformError> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT id, display_name, is_active, created_at FROM platforms WHERE id = ?",
            params![id],
            Self::row_to_platform,
        );

        match result {
            Ok(platform) => Ok(Some(platform)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(PlatformError::Database(e.to_string())),
        }
    }

    fn create(
        &self,
        id: &str,
        display_name: &str,
        is_active: bool,
    ) -> Result<Platform, PlatformError> {
        let id = id.trim().to_lowercase();
        let display_name = display_name.trim().to_string();

        if id.is_empty() {
            return Err(PlatformError::Validation("id is required".to_string()));
        }
        if display_name.is_empty() {
            return Err(PlatformError::Validation(
                "display_name is required".to_string(),
            ));
        }

        if self.get(&id)?.is_some() {
            return Err(PlatformError::AlreadyExists(id));
        }

        let created_at = Utc::now();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO platforms (id, display_name, is_active, created_at) VALUES (?, ?, ?, ?)",
            params![id, display_name, is_active as i64, created_at.to_rfc3339()],
        )
        .map_err(|e| PlatformError::Database(e.to_string()))?;

        Ok(Platform {
            id,
            display_name,
            is_active,
            created_at,
        })
    }

    fn update(
        &self,
        id: &str,
        display_name: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Platform, PlatformError> {
        let mut platform = self
            .get(id)?
            .ok_or_else(|| PlatformError::NotFound(id.to_string()))?;

        if let Some(name) = display_name {
            platform.display_name = name.trim().to_string();
        }
        if let Some(active) = is_active {
            platform.is_active = active;
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE platforms SET display_name = ?, is_active = ? WHERE id = ?",
            params![platform.display_name, platform.is_active as i64, platform.id],
        )
        .map_err(|e| PlatformError::Database(e.to_string()))?;

        Ok(platform)
    }
}
