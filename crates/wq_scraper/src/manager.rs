use std::sync::Arc;
use std::time::Instant;
use wq_core::{
    ArticleSummary, Error, NewArticle, QuizResponse, QuizStatus, QuizStorage, Result,
};
use wq_inference::QuizGenerator;

use crate::logging::Logger;
use crate::scrapers::utils::parse_url;
use crate::scrapers::{PageFetcher, WikipediaExtractor};

/// Runs fetch → extract → generate → store for one URL at a time.
pub struct QuizManager {
    fetcher: Arc<dyn PageFetcher>,
    extractor: WikipediaExtractor,
    generator: QuizGenerator,
    storage: Arc<dyn QuizStorage>,
}

impl QuizManager {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        generator: QuizGenerator,
        storage: Arc<dyn QuizStorage>,
    ) -> Self {
        Self {
            fetcher,
            extractor: WikipediaExtractor::new(),
            generator,
            storage,
        }
    }

    pub fn storage(&self) -> &Arc<dyn QuizStorage> {
        &self.storage
    }

    /// Return the latest quiz for `url`, generating one if the URL has none yet.
    ///
    /// Generation problems never surface here; only invalid URLs, scrape
    /// failures and storage errors do.
    pub async fn generate(&self, url: &str) -> Result<(QuizResponse, QuizStatus)> {
        let url = parse_url(url)?.to_string();
        let logger = Logger::new().with_prefix(format!("[{}]", url));

        let existing = self.storage.find_article_by_url(&url).await?;
        if let Some(article) = &existing {
            if let Some(quiz) = self.storage.latest_quiz_for_article(article.id).await? {
                logger.info(&format!("⏭️ Returning stored quiz {}", quiz.id));
                return Ok((QuizResponse::from_records(&quiz, article), QuizStatus::Cached));
            }
        }

        logger.info("🌐 Scraping article");
        let started = Instant::now();
        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                logger.error(&format!("Scraping failed: {}", e));
                return Err(Error::Fetch(e));
            }
        };
        let extracted = self.extractor.extract(&html);
        logger.info(&format!(
            "✨ Scraped \"{}\" in {:.2}s",
            extracted.title,
            started.elapsed().as_secs_f64()
        ));

        let article = match existing {
            Some(article) => article,
            None => {
                self.storage
                    .create_article(NewArticle {
                        url: url.clone(),
                        title: extracted.title.clone(),
                        summary: extracted.summary.clone(),
                        raw_html: extracted.raw_html.clone(),
                    })
                    .await?
            }
        };

        logger.info(&format!("🤖 Generating quiz with {}", self.generator.model_name()));
        let started = Instant::now();
        let payload = self.generator.generate(&extracted).await;
        logger.info(&format!("✨ Generated in {:.2}s", started.elapsed().as_secs_f64()));

        let quiz = self.storage.create_quiz(article.id, &payload).await?;
        logger.info(&format!("💾 Stored quiz {}", quiz.id));

        Ok((QuizResponse::from_records(&quiz, &article), QuizStatus::Generated))
    }

    pub async fn quiz(&self, id: i64) -> Result<QuizResponse> {
        let quiz = self.storage.quiz_by_id(id).await?;
        let article = self.storage.article_by_id(quiz.article_id).await?;
        Ok(QuizResponse::from_records(&quiz, &article))
    }

    pub async fn history(&self, skip: usize, limit: usize) -> Result<Vec<ArticleSummary>> {
        let articles = self.storage.list_articles(skip, limit).await?;
        Ok(articles.iter().map(ArticleSummary::from).collect())
    }
}
