//! SQL migration definitions for the AutoDraft database.
//!
//! Migrations are applied in order on database open. Each migration has a
//! version number and a set of SQL statements executed within a transaction.

/// A database migration with a version and SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in ascending version order.
pub(crate) fn all_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial schema: topics, drafts",
        sql: r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version   INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Proposed content ideas
CREATE TABLE IF NOT EXISTS topics (
    id         TEXT PRIMARY KEY,
    pillar     TEXT NOT NULL,
    audience   TEXT NOT NULL,
    title      TEXT NOT NULL,
    angle      TEXT NOT NULL,
    score      INTEGER NOT NULL DEFAULT 0,
    status     TEXT NOT NULL DEFAULT 'NEW',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_topics_status ON topics(status);

-- Generated draft documents
CREATE TABLE IF NOT EXISTS drafts (
    id              TEXT PRIMARY KEY,
    topic_id        TEXT NOT NULL REFERENCES topics(id),
    title           TEXT NOT NULL,
    content_md      TEXT NOT NULL,
    summary         TEXT NOT NULL,
    risk_score      INTEGER NOT NULL DEFAULT 0,
    status          TEXT NOT NULL DEFAULT 'DRAFTED',
    export_html_ref TEXT NOT NULL DEFAULT '',
    last_error      TEXT,
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_drafts_topic_id ON drafts(topic_id);

INSERT INTO schema_migrations (version) VALUES (1);
"#,
    }]
}
