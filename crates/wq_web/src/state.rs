use std::sync::Arc;
use wq_scraper::QuizManager;

pub struct AppState {
    pub manager: Arc<QuizManager>,
}

impl AppState {
    pub fn new(manager: Arc<QuizManager>) -> Self {
        Self { manager }
    }
}
