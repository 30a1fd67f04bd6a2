use async_trait::async_trait;
use crate::types::{ArticleRecord, GenerationPayload, NewArticle, QuizRecord};
use crate::Result;

/// Append-only persistence for articles and their generated quizzes.
#[async_trait]
pub trait QuizStorage: Send + Sync {
    /// Look up an article by its exact URL
    async fn find_article_by_url(&self, url: &str) -> Result<Option<ArticleRecord>>;

    /// Insert a new article. Fails with `Error::Conflict` if the URL is taken.
    async fn create_article(&self, article: NewArticle) -> Result<ArticleRecord>;

    /// Fetch an article by id, `Error::NotFound` if absent
    async fn article_by_id(&self, id: i64) -> Result<ArticleRecord>;

    /// Most recently generated quiz for an article
    async fn latest_quiz_for_article(&self, article_id: i64) -> Result<Option<QuizRecord>>;

    /// Store a new quiz for an existing article
    async fn create_quiz(&self, article_id: i64, payload: &GenerationPayload) -> Result<QuizRecord>;

    /// Fetch a quiz by id, `Error::NotFound` if absent
    async fn quiz_by_id(&self, id: i64) -> Result<QuizRecord>;

    /// Articles ordered newest first
    async fn list_articles(&self, offset: usize, limit: usize) -> Result<Vec<ArticleRecord>>;
}
