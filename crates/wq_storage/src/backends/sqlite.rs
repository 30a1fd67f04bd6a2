use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::sync::Arc;
use wq_core::{
    ArticleRecord, Error, GenerationPayload, NewArticle, QuizRecord, QuizStorage, Result,
};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        summary TEXT,
        raw_html TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS quizzes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        article_id INTEGER NOT NULL REFERENCES articles(id),
        generated_at TEXT NOT NULL,
        data TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_quizzes_article ON quizzes(article_id, generated_at)",
    "CREATE INDEX IF NOT EXISTS idx_articles_created ON articles(created_at)",
];

fn db_error(context: &str, e: sqlx::Error) -> Error {
    Error::Storage(format!("{}: {}", context, e))
}

// Fixed-width UTC timestamps sort lexicographically in SQL.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("Failed to parse date {:?}: {}", raw, e)))
}

fn article_from_row(row: &SqliteRow) -> Result<ArticleRecord> {
    let created_at: String = row.try_get("created_at").map_err(|e| db_error("Bad article row", e))?;
    Ok(ArticleRecord {
        id: row.try_get("id").map_err(|e| db_error("Bad article row", e))?,
        url: row.try_get("url").map_err(|e| db_error("Bad article row", e))?,
        title: row.try_get("title").map_err(|e| db_error("Bad article row", e))?,
        summary: row
            .try_get::<Option<String>, _>("summary")
            .map_err(|e| db_error("Bad article row", e))?
            .unwrap_or_default(),
        raw_html: row
            .try_get::<Option<String>, _>("raw_html")
            .map_err(|e| db_error("Bad article row", e))?
            .unwrap_or_default(),
        created_at: parse_timestamp(&created_at)?,
    })
}

fn quiz_from_row(row: &SqliteRow) -> Result<QuizRecord> {
    let generated_at: String = row.try_get("generated_at").map_err(|e| db_error("Bad quiz row", e))?;
    let data: String = row.try_get("data").map_err(|e| db_error("Bad quiz row", e))?;
    Ok(QuizRecord {
        id: row.try_get("id").map_err(|e| db_error("Bad quiz row", e))?,
        article_id: row.try_get("article_id").map_err(|e| db_error("Bad quiz row", e))?,
        generated_at: parse_timestamp(&generated_at)?,
        payload: serde_json::from_str(&data)?,
    })
}

pub struct SQLiteStorage {
    pool: Arc<SqlitePool>,
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| db_error("Failed to connect to database", e))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| db_error(&format!("Failed to run migration {}", i), e))?;
        }

        tracing::debug!("SQLite store ready at {}", db_path.display());

        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl QuizStorage for SQLiteStorage {
    async fn find_article_by_url(&self, url: &str) -> Result<Option<ArticleRecord>> {
        let row = sqlx::query("SELECT * FROM articles WHERE url = ?")
            .bind(url)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| db_error("Failed to look up article", e))?;

        row.as_ref().map(article_from_row).transpose()
    }

    async fn create_article(&self, article: NewArticle) -> Result<ArticleRecord> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO articles (url, title, summary, raw_html, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.url)
        .bind(&article.title)
        .bind(&article.summary)
        .bind(&article.raw_html)
        .bind(format_timestamp(created_at))
        .execute(&*self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::Conflict(format!("article already exists for {}", article.url))
            }
            other => db_error("Failed to store article", other),
        })?;

        self.article_by_id(result.last_insert_rowid()).await
    }

    async fn article_by_id(&self, id: i64) -> Result<ArticleRecord> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| db_error("Failed to get article", e))?;

        match row {
            Some(row) => article_from_row(&row),
            None => Err(Error::NotFound { entity: "Article", id }),
        }
    }

    async fn latest_quiz_for_article(&self, article_id: i64) -> Result<Option<QuizRecord>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM quizzes
            WHERE article_id = ?
            ORDER BY generated_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(article_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| db_error("Failed to get latest quiz", e))?;

        row.as_ref().map(quiz_from_row).transpose()
    }

    async fn create_quiz(&self, article_id: i64, payload: &GenerationPayload) -> Result<QuizRecord> {
        let data = serde_json::to_string(payload)?;
        let result = sqlx::query(
            "INSERT INTO quizzes (article_id, generated_at, data) VALUES (?, ?, ?)",
        )
        .bind(article_id)
        .bind(format_timestamp(Utc::now()))
        .bind(data)
        .execute(&*self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                Error::NotFound { entity: "Article", id: article_id }
            }
            other => db_error("Failed to store quiz", other),
        })?;

        self.quiz_by_id(result.last_insert_rowid()).await
    }

    async fn quiz_by_id(&self, id: i64) -> Result<QuizRecord> {
        let row = sqlx::query("SELECT * FROM quizzes WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| db_error("Failed to get quiz", e))?;

        match row {
            Some(row) => quiz_from_row(&row),
            None => Err(Error::NotFound { entity: "Quiz", id }),
        }
    }

    async fn list_articles(&self, offset: usize, limit: usize) -> Result<Vec<ArticleRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM articles
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| db_error("Failed to list articles", e))?;

        rows.iter().map(article_from_row).collect()
    }
}
