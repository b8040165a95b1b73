//! SQLite-backed content store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::lifecycle::ContentStatus;
use super::store::{ContentStore, StoreError};
use super::types::{ContentFilter, ContentItem, ContentType};

/// SQLite-backed content store.
pub struct SqliteContentStore {
    conn: Mutex<Connection>,
}

const SELECT_COLUMNS: &str = "id, topic_id, brand_id, platform, content_type, status, title, \
     body_text, hashtags, media_type, media_url, media_urls, media_caption, thumbnail_url, \
     media_provider, scheduled_at, published_at, published_url, last_error, attempt_count, \
     created_at, updated_at";

impl SqliteContentStore {
    /// Open (or create) a store at the given path.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS content_items (
                id TEXT PRIMARY KEY,
                topic_id TEXT NOT NULL,
                brand_id TEXT NOT NULL,
                platform TEXT NOT NULL,
                content_type TEXT NOT NULL,
                status TEXT NOT NULL,
                title TEXT,
                body_text TEXT,
                hashtags TEXT,
                media_type TEXT,
                media_url TEXT,
                media_urls TEXT,
                media_caption TEXT,
                thumbnail_url TEXT,
                media_provider TEXT,
                scheduled_at TEXT,
                published_at TEXT,
                published_url TEXT,
                last_error TEXT,
                attempt_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_content_items_status ON content_items(status);
            CREATE INDEX IF NOT EXISTS idx_content_items_topic ON content_items(topic_id);
            CREATE INDEX IF NOT EXISTS idx_content_items_brand ON content_items(brand_id, platform);
            CREATE INDEX IF NOT EXISTS idx_content_items_updated_at ON content_items(updated_at);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn build_where_clause(filter: &ContentFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            params.push(Box::new(status.as_str().to_string()));
        }

        if let Some(ref brand_id) = filter.brand_id {
            conditions.push("brand_id = ?");
            params.push(Box::new(brand_id.clone()));
        }

        if let Some(ref platform) = filter.platform {
            conditions.push("platform = ?");
            params.push(Box::new(platform.clone()));
        }

        if let Some(content_type) = filter.content_type {
            conditions.push("content_type = ?");
            params.push(Box::new(content_type.as_str().to_string()));
        }

        if let Some(ref topic_id) = filter.topic_id {
            conditions.push("topic_id = ?");
            params.push(Box::new(topic_id.clone()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    fn row_to_raw(row: &rusqlite::Row) -> rusqlite::Result<RawRow> {
        Ok(RawRow {
            id: row.get(0)?,
            topic_id: row.get(1)?,
            brand_id: row.get(2)?,
            platform: row.get(3)?,
            content_type: row.get(4)?,
            status: row.get(5)?,
            title: row.get(6)?,
            body_text: row.get(7)?,
            hashtags: row.get(8)?,
            media_type: row.get(9)?,
            media_url: row.get(10)?,
            media_urls: row.get(11)?,
            media_caption: row.get(12)?,
            thumbnail_url: row.get(13)?,
            media_provider: row.get(14)?,
            scheduled_at: row.get(15)?,
            published_at: row.get(16)?,
            published_url: row.get(17)?,
            last_error: row.get(18)?,
            attempt_count: row.get(19)?,
            created_at: row.get(20)?,
            updated_at: row.get(21)?,
        })
    }

    fn query_items(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<ContentItem>, StoreError> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params, Self::row_to_raw)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut items = Vec::new();
        for row_result in rows {
            let raw = row_result.map_err(|e| StoreError::Database(e.to_string()))?;
            items.push(raw.into_item()?);
        }
        Ok(items)
    }

    fn counts_grouped_by(&self, column: &str) -> Result<Vec<(String, i64)>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {col}, COUNT(*) FROM content_items GROUP BY {col} ORDER BY {col}",
            col = column
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(counts)
    }
}

/// Raw row before domain parsing. Status or content type values outside the
/// taxonomy surface as `StoreError::Corrupt` instead of being repaired.
struct RawRow {
    id: String,
    topic_id: String,
    brand_id: String,
    platform: String,
    content_type: String,
    status: String,
    title: Option<String>,
    body_text: Option<String>,
    hashtags: Option<String>,
    media_type: Option<String>,
    media_url: Option<String>,
    media_urls: Option<String>,
    media_caption: Option<String>,
    thumbnail_url: Option<String>,
    media_provider: Option<String>,
    scheduled_at: Option<String>,
    published_at: Option<String>,
    published_url: Option<String>,
    last_error: Option<String>,
    attempt_count: u32,
    created_at: String,
    updated_at: String,
}

impl RawRow {
    fn into_item(self) -> Result<ContentItem, StoreError> {
        let status: ContentStatus = self.status.parse().map_err(|e| StoreError::Corrupt {
            id: self.id.clone(),
            detail: format!("{}", e),
        })?;

        let content_type: ContentType =
            self.content_type.parse().map_err(|e| StoreError::Corrupt {
                id: self.id.clone(),
                detail: e,
            })?;

        // Timestamps were written by us as RFC 3339; fall back to now rather
        // than failing the whole read if one is mangled.
        let created_at = parse_datetime(&self.created_at).unwrap_or_else(Utc::now);
        let updated_at = parse_datetime(&self.updated_at).unwrap_or_else(Utc::now);

        let media_urls: Vec<String> = self
            .media_urls
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default();

        Ok(ContentItem {
            id: self.id,
            topic_id: self.topic_id,
            brand_id: self.brand_id,
            platform: self.platform,
            content_type,
            status,
            title: self.title,
            body_text: self.body_text,
            hashtags: self.hashtags,
            media_type: self.media_type,
            media_url: self.media_url,
            media_urls,
            media_caption: self.media_caption,
            thumbnail_url: self.thumbnail_url,
            media_provider: self.media_provider,
            scheduled_at: self.scheduled_at.as_deref().and_then(parse_datetime_opt),
            published_at: self.published_at.as_deref().and_then(parse_datetime_opt),
            published_url: self.published_url,
            last_error: self.last_error,
            attempt_count: self.attempt_count,
            created_at,
            updated_at,
        })
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn parse_datetime_opt(s: &str) -> Option<DateTime<Utc>> {
    parse_datetime(s)
}

fn media_urls_json(item: &ContentItem) -> Option<String> {
    if item.media_urls.is_empty() {
        None
    } else {
        serde_json::to_string(&item.media_urls).ok()
    }
}

impl ContentStore for SqliteContentStore {
    fn insert_batch(&self, items: &[ContentItem]) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO content_items (id, topic_id, brand_id, platform, content_type, \
                     status, title, body_text, hashtags, media_type, media_url, media_urls, \
                     media_caption, thumbnail_url, media_provider, scheduled_at, published_at, \
                     published_url, last_error, attempt_count, created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .map_err(|e| StoreError::Database(e.to_string()))?;

            for item in items {
                stmt.execute(params![
                    item.id,
                    item.topic_id,
                    item.brand_id,
                    item.platform,
                    item.content_type.as_str(),
                    item.status.as_str(),
                    item.title,
                    item.body_text,
                    item.hashtags,
                    item.media_type,
                    item.media_url,
                    media_urls_json(item),
                    item.media_caption,
                    item.thumbnail_url,
                    item.media_provider,
                    item.scheduled_at.map(|dt| dt.to_rfc3339()),
                    item.published_at.map(|dt| dt.to_rfc3339()),
                    item.published_url,
                    item.last_error,
                    item.attempt_count,
                    item.created_at.to_rfc3339(),
                    item.updated_at.to_rfc3339(),
                ])
                .map_err(|e| StoreError::Database(e.to_string()))?;
            }
        }

        tx.commit().map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get(&self, id: &str) -> Result<Option<ContentItem>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {} FROM content_items WHERE id = ?",
            SELECT_COLUMNS
        );
        let result = conn.query_row(&sql, params![id], Self::row_to_raw);

        match result {
            Ok(raw) => Ok(Some(raw.into_item()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    fn get_many(&self, ids: &[String]) -> Result<Vec<ContentItem>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock().unwrap();
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM content_items WHERE id IN ({}) ORDER BY created_at ASC",
            SELECT_COLUMNS, placeholders
        );

        let params: Vec<&dyn rusqlite::ToSql> =
            ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();
        Self::query_items(&conn, &sql, &params)
    }

    fn list(&self, filter: &ContentFilter) -> Result<Vec<ContentItem>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            "SELECT {} FROM content_items {} ORDER BY updated_at DESC, created_at DESC \
             LIMIT ? OFFSET ?",
            SELECT_COLUMNS, where_clause
        );

        let mut all_params: Vec<Box<dyn rusqlite::ToSql>> = params;
        all_params.push(Box::new(filter.limit));
        all_params.push(Box::new(filter.offset));

        let param_refs: Vec<&dyn rusqlite::ToSql> = all_params.iter().map(|p| p.as_ref()).collect();
        Self::query_items(&conn, &sql, &param_refs)
    }

    fn count(&self, filter: &ContentFilter) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!("SELECT COUNT(*) FROM content_items {}", where_clause);
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn update(&self, item: &ContentItem) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let updated = update_row(&conn, item)?;
        if updated == 0 {
            return Err(StoreError::NotFound(item.id.clone()));
        }
        Ok(())
    }

    fn update_batch(&self, items: &[ContentItem]) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        for item in items {
            let updated = update_row(&tx, item)?;
            if updated == 0 {
                return Err(StoreError::NotFound(item.id.clone()));
            }
        }

        tx.commit().map_err(|e| StoreError::Database(e.to_string()))
    }

    fn counts_by_status(&self) -> Result<Vec<(String, i64)>, StoreError> {
        self.counts_grouped_by("status")
    }

    fn counts_by_platform(&self) -> Result<Vec<(String, i64)>, StoreError> {
        self.counts_grouped_by("platform")
    }

    fn counts_by_brand(&self) -> Result<Vec<(String, i64)>, StoreError> {
        self.counts_grouped_by("brand_id")
    }
}

/// Persist the mutable fields of an item. `content_type`, `topic_id`,
/// `brand_id`, `platform` and `created_at` are fixed at creation and never
/// written again.
fn update_row(conn: &Connection, item: &ContentItem) -> Result<usize, StoreError> {
    conn.execute(
        "UPDATE content_items SET status = ?, title = ?, body_text = ?, hashtags = ?, \
         media_type = ?, media_url = ?, media_urls = ?, media_caption = ?, thumbnail_url = ?, \
         media_provider = ?, scheduled_at = ?, published_at = ?, published_url = ?, \
         last_error = ?, attempt_count = ?, updated_at = ? WHERE id = ?",
        params![
            item.status.as_str(),
            item.title,
            item.body_text,
            item.hashtags,
            item.media_type,
            item.media_url,
            media_urls_json(item),
            item.media_caption,
            item.thumbnail_url,
            item.media_provider,
            item.scheduled_at.map(|dt| dt.to_rfc3339()),
            item.published_at.map(|dt| dt.to_rfc3339()),
            item.published_url,
            item.last_error,
            item.attempt_count,
            Utc::now().to_rfc3339(),
            item.id,
        ],
    )
    .map_err(|e| StoreError::Database(e.to_string()))
}
