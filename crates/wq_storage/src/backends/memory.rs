use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use wq_core::{
    ArticleRecord, Error, GenerationPayload, NewArticle, QuizRecord, QuizStorage, Result,
};

#[derive(Default)]
pub struct MemoryStore {
    articles: Vec<ArticleRecord>,
    quizzes: Vec<QuizRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_article_id(&self) -> i64 {
        self.articles.len() as i64 + 1
    }

    fn next_quiz_id(&self) -> i64 {
        self.quizzes.len() as i64 + 1
    }

    pub fn find_article_by_url(&self, url: &str) -> Option<ArticleRecord> {
        self.articles.iter().find(|a| a.url == url).cloned()
    }

    pub fn create_article(&mut self, article: NewArticle) -> Result<ArticleRecord> {
        if self.articles.iter().any(|a| a.url == article.url) {
            return Err(Error::Conflict(format!(
                "article already exists for {}",
                article.url
            )));
        }
        let record = ArticleRecord {
            id: self.next_article_id(),
            url: article.url,
            title: article.title,
            summary: article.summary,
            raw_html: article.raw_html,
            created_at: Utc::now(),
        };
        self.articles.push(record.clone());
        Ok(record)
    }

    pub fn article_by_id(&self, id: i64) -> Result<ArticleRecord> {
        self.articles
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(Error::NotFound { entity: "Article", id })
    }

    pub fn latest_quiz_for_article(&self, article_id: i64) -> Option<QuizRecord> {
        self.quizzes
            .iter()
            .filter(|q| q.article_id == article_id)
            .max_by_key(|q| (q.generated_at, q.id))
            .cloned()
    }

    pub fn create_quiz(&mut self, article_id: i64, payload: &GenerationPayload) -> Result<QuizRecord> {
        self.article_by_id(article_id)?;
        let record = QuizRecord {
            id: self.next_quiz_id(),
            article_id,
            generated_at: Utc::now(),
            payload: payload.clone(),
        };
        self.quizzes.push(record.clone());
        Ok(record)
    }

    pub fn quiz_by_id(&self, id: i64) -> Result<QuizRecord> {
        self.quizzes
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or(Error::NotFound { entity: "Quiz", id })
    }

    pub fn list_articles(&self, offset: usize, limit: usize) -> Vec<ArticleRecord> {
        let mut articles = self.articles.clone();
        articles.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        articles.into_iter().skip(offset).take(limit).collect()
    }
}

/// Process-local store. Contents are lost on exit.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizStorage for MemoryStorage {
    async fn find_article_by_url(&self, url: &str) -> Result<Option<ArticleRecord>> {
        let store = self.store.read().await;
        Ok(store.find_article_by_url(url))
    }

    async fn create_article(&self, article: NewArticle) -> Result<ArticleRecord> {
        let mut store = self.store.write().await;
        store.create_article(article)
    }

    async fn article_by_id(&self, id: i64) -> Result<ArticleRecord> {
        let store = self.store.read().await;
        store.article_by_id(id)
    }

    async fn latest_quiz_for_article(&self, article_id: i64) -> Result<Option<QuizRecord>> {
        let store = self.store.read().await;
        Ok(store.latest_quiz_for_article(article_id))
    }

    async fn create_quiz(&self, article_id: i64, payload: &GenerationPayload) -> Result<QuizRecord> {
        let mut store = self.store.write().await;
        store.create_quiz(article_id, payload)
    }

    async fn quiz_by_id(&self, id: i64) -> Result<QuizRecord> {
        let store = self.store.read().await;
        store.quiz_by_id(id)
    }

    async fn list_articles(&self, offset: usize, limit: usize) -> Result<Vec<ArticleRecord>> {
        let store = self.store.read().await;
        Ok(store.list_articles(offset, limit))
    }
}
