//! SQLite persistence for the legal knowledge base.
//!
//! Row order is load-bearing: every table carries a `position` column and
//! reads always order by it, because corpus order is the engine's documented
//! tie-break and first-match policy.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use legal_advisor_core::{
    Article, ArticleId, CaseId, Corpus, LandmarkCase, Procedure, ProcedureId, QuickReply,
    QuickReplyId,
};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use ulid::Ulid;

const LATEST_SCHEMA_VERSION: i64 = 2;

const CREATE_SCHEMA_MIGRATIONS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS schema_migrations (
  version INTEGER PRIMARY KEY,
  applied_at TEXT NOT NULL
);
";

const MIGRATION_001_SQL: &str = r"
CREATE TABLE IF NOT EXISTS articles (
  article_id TEXT PRIMARY KEY,
  position INTEGER NOT NULL,
  number TEXT NOT NULL,
  title TEXT NOT NULL,
  description TEXT NOT NULL,
  category TEXT NOT NULL,
  keywords_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS landmark_cases (
  case_id TEXT PRIMARY KEY,
  position INTEGER NOT NULL,
  name TEXT NOT NULL,
  year INTEGER NOT NULL,
  significance TEXT NOT NULL,
  key_points_json TEXT NOT NULL,
  keywords_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS procedures (
  procedure_id TEXT PRIMARY KEY,
  position INTEGER NOT NULL,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  procedure_text TEXT NOT NULL,
  keywords_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS quick_replies (
  quick_reply_id TEXT PRIMARY KEY,
  position INTEGER NOT NULL,
  text TEXT NOT NULL,
  category TEXT NOT NULL,
  display_order INTEGER NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_articles_number ON articles(number COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS idx_articles_category ON articles(category);
CREATE INDEX IF NOT EXISTS idx_quick_replies_order ON quick_replies(display_order);
";

const MIGRATION_002_SQL: &str = r"
ALTER TABLE landmark_cases ADD COLUMN detailed_explanation TEXT;
";

pub struct SqliteStore {
    conn: Connection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaStatus {
    pub current_version: i64,
    pub target_version: i64,
    pub pending_versions: Vec<i64>,
    pub inferred_from_legacy: bool,
}

impl SqliteStore {
    /// Open a SQLite-backed corpus store and configure required runtime pragmas.
    ///
    /// # Errors
    /// Returns an error when the database cannot be opened or pragmas cannot be applied.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite database at {}", path.display()))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to configure sqlite pragmas")?;

        Ok(Self { conn })
    }

    /// Report current and target schema versions plus pending migrations.
    ///
    /// # Errors
    /// Returns an error when schema metadata cannot be read or initialized.
    pub fn schema_status(&self) -> Result<SchemaStatus> {
        self.conn
            .execute_batch(CREATE_SCHEMA_MIGRATIONS_SQL)
            .context("failed to apply schema_migrations table")?;
        let (current_version, inferred_from_legacy) = detect_effective_schema_version(&self.conn)?;
        let pending_versions = if current_version < LATEST_SCHEMA_VERSION {
            ((current_version + 1)..=LATEST_SCHEMA_VERSION).collect::<Vec<_>>()
        } else {
            Vec::new()
        };

        Ok(SchemaStatus {
            current_version,
            target_version: LATEST_SCHEMA_VERSION,
            pending_versions,
            inferred_from_legacy,
        })
    }

    /// Apply all forward migrations up to the latest supported schema version.
    ///
    /// # Errors
    /// Returns an error when migration bootstrapping or any migration step fails.
    pub fn migrate(&mut self) -> Result<()> {
        self.conn
            .execute_batch(CREATE_SCHEMA_MIGRATIONS_SQL)
            .context("failed to apply schema_migrations table")?;

        let mut version = current_schema_version(&self.conn)?;

        if version == 0 {
            version = self.bootstrap_schema_version()?;
        }

        if version < 2 {
            self.apply_migration_2()?;
            version = current_schema_version(&self.conn)?;
        }

        if version != LATEST_SCHEMA_VERSION {
            return Err(anyhow!(
                "unsupported schema version {version}; expected {LATEST_SCHEMA_VERSION}"
            ));
        }

        Ok(())
    }

    fn bootstrap_schema_version(&self) -> Result<i64> {
        let has_cases = table_exists(&self.conn, "landmark_cases")?;

        if !has_cases {
            apply_migration_1(&self.conn)?;
            return Ok(1);
        }

        if table_has_column(&self.conn, "landmark_cases", "detailed_explanation")? {
            // Database already in v2 shape but missing migration records.
            record_schema_version(&self.conn, 1)?;
            record_schema_version(&self.conn, 2)?;
            return Ok(2);
        }

        // Legacy v1 tables exist; mark version 1 and allow the standard upgrade.
        record_schema_version(&self.conn, 1)?;
        Ok(1)
    }

    fn apply_migration_2(&mut self) -> Result<()> {
        if table_has_column(&self.conn, "landmark_cases", "detailed_explanation")? {
            record_schema_version(&self.conn, 2)?;
            return Ok(());
        }

        let tx = self.conn.transaction().context("failed to start migration v2 transaction")?;
        tx.execute_batch(MIGRATION_002_SQL)
            .context("failed to add landmark_cases.detailed_explanation")?;
        tx.execute(
            "INSERT OR IGNORE INTO schema_migrations(version, applied_at) VALUES (?1, ?2)",
            params![2_i64, now_rfc3339()?],
        )
        .context("failed to record migration version 2")?;
        tx.commit().context("failed to commit migration v2")?;
        Ok(())
    }

    /// Load the full corpus snapshot in stored position order.
    ///
    /// # Errors
    /// Returns an error when rows cannot be read or decoded from `SQLite`.
    pub fn load_corpus(&self) -> Result<Corpus> {
        let mut corpus = Corpus::default();

        let mut stmt = self.conn.prepare(
            "SELECT article_id, number, title, description, category, keywords_json
             FROM articles
             ORDER BY position ASC",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id_raw: String = row.get(0)?;
            let keywords_json: String = row.get(5)?;
            corpus.articles.push(Article {
                id: ArticleId(parse_ulid(&id_raw)?),
                number: row.get(1)?,
                title: row.get(2)?,
                description: row.get(3)?,
                category: row.get(4)?,
                keywords: decode_string_list(&keywords_json)?,
            });
        }

        let mut stmt = self.conn.prepare(
            "SELECT case_id, name, year, significance, detailed_explanation,
                    key_points_json, keywords_json
             FROM landmark_cases
             ORDER BY position ASC",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id_raw: String = row.get(0)?;
            let key_points_json: String = row.get(5)?;
            let keywords_json: String = row.get(6)?;
            corpus.cases.push(LandmarkCase {
                id: CaseId(parse_ulid(&id_raw)?),
                name: row.get(1)?,
                year: row.get(2)?,
                significance: row.get(3)?,
                detailed_explanation: row.get(4)?,
                key_points: decode_string_list(&key_points_json)?,
                keywords: decode_string_list(&keywords_json)?,
            });
        }

        let mut stmt = self.conn.prepare(
            "SELECT procedure_id, name, description, procedure_text, keywords_json
             FROM procedures
             ORDER BY position ASC",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id_raw: String = row.get(0)?;
            let keywords_json: String = row.get(4)?;
            corpus.procedures.push(Procedure {
                id: ProcedureId(parse_ulid(&id_raw)?),
                name: row.get(1)?,
                description: row.get(2)?,
                procedure_text: row.get(3)?,
                keywords: decode_string_list(&keywords_json)?,
            });
        }

        let mut stmt = self.conn.prepare(
            "SELECT quick_reply_id, text, category, display_order
             FROM quick_replies
             ORDER BY position ASC",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id_raw: String = row.get(0)?;
            corpus.quick_replies.push(QuickReply {
                id: QuickReplyId(parse_ulid(&id_raw)?),
                text: row.get(1)?,
                category: row.get(2)?,
                order: row.get(3)?,
            });
        }

        Ok(corpus)
    }

    /// Replace the stored corpus with a validated snapshot in one transaction.
    ///
    /// # Errors
    /// Returns an error when validation fails or any write in the transaction fails.
    pub fn replace_corpus(&mut self, corpus: &Corpus) -> Result<()> {
        corpus.validate().map_err(|err| anyhow!("corpus validation failed: {err}"))?;

        let tx = self.conn.transaction().context("failed to start transaction")?;

        tx.execute_batch(
            "DELETE FROM articles;
             DELETE FROM landmark_cases;
             DELETE FROM procedures;
             DELETE FROM quick_replies;",
        )
        .context("failed to clear corpus tables")?;

        for (position, article) in corpus.articles.iter().enumerate() {
            tx.execute(
                "INSERT INTO articles(
                    article_id, position, number, title, description, category, keywords_json
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    article.id.to_string(),
                    position_param(position)?,
                    article.number,
                    article.title,
                    article.description,
                    article.category,
                    encode_string_list(&article.keywords)?,
                ],
            )
            .context("failed to insert article")?;
        }

        for (position, case) in corpus.cases.iter().enumerate() {
            tx.execute(
                "INSERT INTO landmark_cases(
                    case_id, position, name, year, significance, detailed_explanation,
                    key_points_json, keywords_json
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    case.id.to_string(),
                    position_param(position)?,
                    case.name,
                    case.year,
                    case.significance,
                    case.detailed_explanation,
                    encode_string_list(&case.key_points)?,
                    encode_string_list(&case.keywords)?,
                ],
            )
            .context("failed to insert landmark case")?;
        }

        for (position, procedure) in corpus.procedures.iter().enumerate() {
            tx.execute(
                "INSERT INTO procedures(
                    procedure_id, position, name, description, procedure_text, keywords_json
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    procedure.id.to_string(),
                    position_param(position)?,
                    procedure.name,
                    procedure.description,
                    procedure.procedure_text,
                    encode_string_list(&procedure.keywords)?,
                ],
            )
            .context("failed to insert procedure")?;
        }

        for (position, reply) in corpus.quick_replies.iter().enumerate() {
            tx.execute(
                "INSERT INTO quick_replies(
                    quick_reply_id, position, text, category, display_order
                ) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    reply.id.to_string(),
                    position_param(position)?,
                    reply.text,
                    reply.category,
                    reply.order,
                ],
            )
            .context("failed to insert quick reply")?;
        }

        tx.commit().context("failed to commit corpus replacement")?;
        Ok(())
    }
}

fn apply_migration_1(conn: &Connection) -> Result<()> {
    conn.execute_batch(MIGRATION_001_SQL).context("failed to apply migration v1")?;
    record_schema_version(conn, 1)?;
    Ok(())
}

fn table_exists(conn: &Connection, table_name: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            params![table_name],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("failed to check if table exists: {table_name}"))?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    if !table_exists(conn, table)? {
        return Ok(false);
    }

    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("failed to inspect table_info for {table}"))?;
    let mut rows = stmt.query([])?;

    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }

    Ok(false)
}

fn current_schema_version(conn: &Connection) -> Result<i64> {
    let version = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_migrations", [], |row| {
            row.get::<_, i64>(0)
        })
        .context("failed to read current schema version")?;
    Ok(version)
}

fn detect_effective_schema_version(conn: &Connection) -> Result<(i64, bool)> {
    let recorded = current_schema_version(conn)?;
    if recorded > 0 {
        return Ok((recorded, false));
    }

    if !table_exists(conn, "landmark_cases")? {
        return Ok((0, false));
    }

    if table_has_column(conn, "landmark_cases", "detailed_explanation")? {
        return Ok((2, true));
    }

    Ok((1, true))
}

fn record_schema_version(conn: &Connection, version: i64) -> Result<()> {
    let now = now_rfc3339()?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations(version, applied_at) VALUES (?1, ?2)",
        params![version, now],
    )
    .with_context(|| format!("failed to record migration version {version}"))?;
    Ok(())
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .context("failed to format RFC3339 timestamp")
}

fn parse_ulid(raw: &str) -> Result<Ulid> {
    Ulid::from_string(raw).with_context(|| format!("invalid ULID: {raw}"))
}

fn position_param(position: usize) -> Result<i64> {
    i64::try_from(position).context("corpus position exceeds i64 range")
}

fn encode_string_list(values: &[String]) -> Result<String> {
    serde_json::to_string(values).context("failed to serialize string list")
}

fn decode_string_list(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).with_context(|| format!("invalid string list JSON: {raw}"))
}
