//! Brand profile storage.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{BrandProfile, ProfileError, ProfileStatus};

/// Trait for brand profile storage backends.
pub trait ProfileStore: Send + Sync {
    /// Insert or replace a profile keyed by brand id.
    fn upsert(&self, profile: &BrandProfile) -> Result<(), ProfileError>;

    /// Get a profile by brand id.
    fn get(&self, brand_id: &str) -> Result<Option<BrandProfile>, ProfileError>;

    /// Update just the status and error fields; used by the scrape task so a
    /// crash leaves an accurate persisted status.
    fn set_status(
        &self,
        brand_id: &str,
        status: ProfileStatus,
        last_error: Option<&str>,
    ) -> Result<(), ProfileError>;
}

/// SQLite-backed profile store.
pub struct SqliteProfileStore {
    conn: Mutex<Connection>,
}

impl SqliteProfileStore {
    pub fn new(path: &Path) -> Result<Self, ProfileError> {
        let conn = Connection::open(path).map_err(|e| ProfileError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, ProfileError> {
        let conn =
            Connection::open_in_memory().map_err(|e| ProfileError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), ProfileError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS brand_profiles (
                brand_id TEXT PRIMARY KEY,
                website_url TEXT,
                status TEXT NOT NULL DEFAULT 'IDLE',
                last_error TEXT,
                last_scraped_at TEXT,
                pages_scraped TEXT,
                raw_text TEXT,
                profile_json TEXT,
                profile_summary TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| ProfileError::Database(e.to_string()))
    }

    fn row_to_profile(row: &rusqlite::Row) -> rusqlite::Result<BrandProfile> {
        let status_str: String = row.get(2)?;
        let pages_json: Option<String> = row.get(5)?;
        let profile_json: Option<String> = row.get(7)?;

        let parse_dt = |s: String| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now())
        };

        Ok(BrandProfile {
            brand_id: row.get(0)?,
            website_url: row.get(1)?,
            status: status_str.parse().unwrap_or(ProfileStatus::Idle),
            last_error: row.get(3)?,
            last_scraped_at: row
                .get::<_, Option<String>>(4)?
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            pages_scraped: pages_json
                .as_deref()
                .and_then(|json| serde_json::from_str(json).ok())
                .unwrap_or_default(),
            raw_text: row.get(6)?,
            profile: profile_json
                .as_deref()
                .and_then(|json| serde_json::from_str(json).ok()),
            profile_summary: row.get(8)?,
            created_at: parse_dt(row.get(9)?),
            updated_at: parse_dt(row.get(10)?),
        })
    }
}

impl ProfileStore for SqliteProfileStore {
    fn upsert(&self, profile: &BrandProfile) -> Result<(), ProfileError> {
        let conn = self.conn.lock().unwrap();

        let pages_json = if profile.pages_scraped.is_empty() {
            None
        } else {
            serde_json::to_string(&profile.pages_scraped).ok()
        };

        let profile_json = profile
            .profile
            .as_ref()
            .and_then(|p| serde_json::to_string(p).ok());

        conn.execute(
            "INSERT INTO brand_profiles (brand_id, website_url, status, last_error, \
             last_scraped_at, pages_scraped, raw_text, profile_json, profile_summary, \
             created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(brand_id) DO UPDATE SET website_url = excluded.website_url, \
             status = excluded.status, last_error = excluded.last_error, \
             last_scraped_at = excluded.last_scraped_at, pages_scraped = excluded.pages_scraped, \
             raw_text = excluded.raw_text, profile_json = excluded.profile_json, \
             profile_summary = excluded.profile_summary, updated_at = excluded.updated_at",
            params![
                profile.brand_id,
                profile.website_url,
                profile.status.as_str(),
                profile.last_error,
                profile.last_scraped_at.map(|dt| dt.to_rfc3339()),
                pages_json,
                profile.raw_text,
                profile_json,
                profile.profile_summary,
                profile.created_at.to_rfc3339(),
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| ProfileError::Database(e.to_string()))?;

        Ok(())
    }

    fn get(&self, brand_id: &str) -> Result<Option<BrandProfile>, ProfileError> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT brand_id, website_url, status, last_error, last_scraped_at, pages_scraped, \
             raw_text, profile_json, profile_summary, created_at, updated_at \
             FROM brand_profiles WHERE brand_id = ?",
            params![brand_id],
            Self::row_to_profile,
        );

        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ProfileError::Database(e.to_string())),
        }
    }

    fn set_status(
        &self,
        brand_id: &str,
        status: ProfileStatus,
        last_error: Option<&str>,
    ) -> Result<(), ProfileError> {
        let conn = self.conn.lock().unwrap();
        let updated = conn
            .execute(
                "UPDATE brand_profiles SET status = ?, last_error = ?, updated_at = ? \
                 WHERE brand_id = ?",
                params![
                    status.as_str(),
                    last_error,
                    Utc::now().to_rfc3339(),
                    brand_id
                ],
            )
            .map_err(|e| ProfileError::Database(e.to_string()))?;

        if updated == 0 {
            return Err(ProfileError::NotFound(brand_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_and_get() {
        let store = SqliteProfileStore::in_memory().unwrap();
        let mut profile = BrandProfile::new("acme");
        profile.website_url = Some("https://acme.example.com".to_string());
        store.upsert(&profile).unwrap();

        let fetched = store.get("acme").unwrap().unwrap();
        assert_eq!(fetched.brand_id, "acme");
        assert_eq!(fetched.status, ProfileStatus::Idle);
        assert_eq!(
            fetched.website_url.as_deref(),
            Some("https://acme.example.com")
        );
    }

    #[test]
    fn test_upsert_replaces() {
        let store = SqliteProfileStore::in_memory().unwrap();
        let mut profile = BrandProfile::new("acme");
        store.upsert(&profile).unwrap();

        profile.status = ProfileStatus::Ready;
        profile.profile_summary = Some("B2B dev tools brand".to_string());
        profile.profile = Some(serde_json::json!({"tone": {"tags": ["direct"]}}));
        profile.pages_scraped = vec!["https://acme.example.com".to_string()];
        store.upsert(&profile).unwrap();

        let fetched = store.get("acme").unwrap().unwrap();
        assert_eq!(fetched.status, ProfileStatus::Ready);
        assert_eq!(
            fetched.profile_summary.as_deref(),
            Some("B2B dev tools brand")
        );
        assert_eq!(fetched.pages_scraped.len(), 1);
        assert!(fetched.profile.is_some());
    }

    #[test]
    fn test_set_status() {
        let store = SqliteProfileStore::in_memory().unwrap();
        store.upsert(&BrandProfile::new("acme")).unwrap();

        store
            .set_status("acme", ProfileStatus::Failed, Some("timeout"))
            .unwrap();

        let fetched = store.get("acme").unwrap().unwrap();
        assert_eq!(fetched.status, ProfileStatus::Failed);
        assert_eq!(fetched.last_error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_set_status_unknown_brand() {
        let store = SqliteProfileStore::in_memory().unwrap();
        let result = store.set_status("ghost", ProfileStatus::Ready, None);
        assert!(matches!(result, Err(ProfileError::NotFound(_))));
    }

    #[test]
    fn test_get_missing_profile() {
        let store = SqliteProfileStore::in_memory().unwrap();
        assert!(store.get("nobody").unwrap().is_none());
    }
}
