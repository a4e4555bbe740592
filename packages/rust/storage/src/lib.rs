//! libSQL storage layer for AutoDraft.
//!
//! [`TopicRepo`] and [`DraftRepo`] are the repository seams the pipeline
//! writes through; [`Store`] is the libSQL-backed implementation of both.
//! Records are plain owned values — callers receive copies and persist
//! mutations back explicitly.

mod migrations;

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database, params};

use autodraft_shared::{
    AutodraftError, Draft, DraftId, DraftStatus, Result, Topic, TopicId, TopicStatus,
};

// ---------------------------------------------------------------------------
// Repository traits
// ---------------------------------------------------------------------------

/// Persistence operations for [`Topic`] records.
#[async_trait]
pub trait TopicRepo: Send + Sync {
    /// Insert a new topic.
    async fn create_topic(&self, topic: &Topic) -> Result<()>;

    /// Fetch a topic by id, or `None` if absent.
    async fn get_topic(&self, id: &TopicId) -> Result<Option<Topic>>;

    /// Set a topic's status. A missing id is a silent no-op.
    async fn update_topic_status(&self, id: &TopicId, status: TopicStatus) -> Result<()>;
}

/// Persistence operations for [`Draft`] records.
#[async_trait]
pub trait DraftRepo: Send + Sync {
    /// Insert a new draft.
    async fn create_draft(&self, draft: &Draft) -> Result<()>;

    /// Fetch a draft by id, or `None` if absent.
    async fn get_draft(&self, id: &DraftId) -> Result<Option<Draft>>;

    /// Persist the full record by id (upsert).
    async fn save_draft(&self, draft: &Draft) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Primary storage handle wrapping a libSQL database.
pub struct Store {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
}

impl Store {
    /// Open or create a database at `path` and apply pending migrations.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| AutodraftError::io(parent, e))?;
            }
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AutodraftError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| AutodraftError::Storage(e.to_string()))?;

        let store = Self { db, conn };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn.execute_batch(migration.sql).await.map_err(|e| {
                    AutodraftError::Storage(format!(
                        "migration v{} failed: {e}",
                        migration.version
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl TopicRepo for Store {
    async fn create_topic(&self, topic: &Topic) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO topics (id, pillar, audience, title, angle, score, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    topic.id.as_str(),
                    topic.pillar.as_str(),
                    topic.audience.as_str(),
                    topic.title.as_str(),
                    topic.angle.as_str(),
                    i64::from(topic.score),
                    topic.status.as_str(),
                    topic.created_at.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| AutodraftError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn get_topic(&self, id: &TopicId) -> Result<Option<Topic>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, pillar, audience, title, angle, score, status, created_at
                 FROM topics WHERE id = ?1",
                params![id.as_str()],
            )
            .await
            .map_err(|e| AutodraftError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_topic(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(AutodraftError::Storage(e.to_string())),
        }
    }

    async fn update_topic_status(&self, id: &TopicId, status: TopicStatus) -> Result<()> {
        self.conn
            .execute(
                "UPDATE topics SET status = ?1 WHERE id = ?2",
                params![status.as_str(), id.as_str()],
            )
            .await
            .map_err(|e| AutodraftError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl DraftRepo for Store {
    async fn create_draft(&self, draft: &Draft) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO drafts (id, topic_id, title, content_md, summary, risk_score,
                                     status, export_html_ref, last_error, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    draft.id.as_str(),
                    draft.topic_id.as_str(),
                    draft.title.as_str(),
                    draft.content_md.as_str(),
                    draft.summary.as_str(),
                    i64::from(draft.risk_score),
                    draft.status.as_str(),
                    draft.export_html_ref.as_str(),
                    draft.last_error.as_deref(),
                    draft.updated_at.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| AutodraftError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn get_draft(&self, id: &DraftId) -> Result<Option<Draft>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, topic_id, title, content_md, summary, risk_score,
                        status, export_html_ref, last_error, updated_at
                 FROM drafts WHERE id = ?1",
                params![id.as_str()],
            )
            .await
            .map_err(|e| AutodraftError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_draft(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(AutodraftError::Storage(e.to_string())),
        }
    }

    async fn save_draft(&self, draft: &Draft) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO drafts (id, topic_id, title, content_md, summary, risk_score,
                                     status, export_html_ref, last_error, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(id) DO UPDATE SET
                   topic_id = excluded.topic_id,
                   title = excluded.title,
                   content_md = excluded.content_md,
                   summary = excluded.summary,
                   risk_score = excluded.risk_score,
                   status = excluded.status,
                   export_html_ref = excluded.export_html_ref,
                   last_error = excluded.last_error,
                   updated_at = excluded.updated_at",
                params![
                    draft.id.as_str(),
                    draft.topic_id.as_str(),
                    draft.title.as_str(),
                    draft.content_md.as_str(),
                    draft.summary.as_str(),
                    i64::from(draft.risk_score),
                    draft.status.as_str(),
                    draft.export_html_ref.as_str(),
                    draft.last_error.as_deref(),
                    draft.updated_at.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| AutodraftError::Storage(e.to_string()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn get_string(row: &libsql::Row, idx: i32) -> Result<String> {
    row.get::<String>(idx)
        .map_err(|e| AutodraftError::Storage(e.to_string()))
}

fn get_timestamp(row: &libsql::Row, idx: i32) -> Result<DateTime<Utc>> {
    let s = get_string(row, idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AutodraftError::Storage(format!("invalid date: {e}")))
}

/// Convert a database row to a [`Topic`].
fn row_to_topic(row: &libsql::Row) -> Result<Topic> {
    let status_raw = get_string(row, 6)?;
    Ok(Topic {
        id: get_string(row, 0)?
            .parse()
            .map_err(|e: AutodraftError| AutodraftError::Storage(e.to_string()))?,
        pillar: get_string(row, 1)?,
        audience: get_string(row, 2)?,
        title: get_string(row, 3)?,
        angle: get_string(row, 4)?,
        score: row
            .get::<i64>(5)
            .map_err(|e| AutodraftError::Storage(e.to_string()))? as i32,
        status: TopicStatus::parse(&status_raw)
            .ok_or_else(|| AutodraftError::Storage(format!("invalid topic status: {status_raw}")))?,
        created_at: get_timestamp(row, 7)?,
    })
}

/// Convert a database row to a [`Draft`].
fn row_to_draft(row: &libsql::Row) -> Result<Draft> {
    let status_raw = get_string(row, 6)?;
    Ok(Draft {
        id: get_string(row, 0)?
            .parse()
            .map_err(|e: AutodraftError| AutodraftError::Storage(e.to_string()))?,
        topic_id: get_string(row, 1)?
            .parse()
            .map_err(|e: AutodraftError| AutodraftError::Storage(e.to_string()))?,
        title: get_string(row, 2)?,
        content_md: get_string(row, 3)?,
        summary: get_string(row, 4)?,
        risk_score: row
            .get::<i64>(5)
            .map_err(|e| AutodraftError::Storage(e.to_string()))? as i32,
        status: DraftStatus::parse(&status_raw)
            .ok_or_else(|| AutodraftError::Storage(format!("invalid draft status: {status_raw}")))?,
        export_html_ref: get_string(row, 7)?,
        last_error: row.get::<String>(8).ok(),
        updated_at: get_timestamp(row, 9)?,
    })
}
