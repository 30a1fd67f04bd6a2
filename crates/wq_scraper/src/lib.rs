pub mod logging;
pub mod manager;
pub mod scrapers;

pub use logging::{init_logging, Logger};
pub use manager::QuizManager;
pub use scrapers::{HttpFetcher, PageFetcher, WikipediaExtractor};

pub mod prelude {
    pub use super::manager::QuizManager;
    pub use super::scrapers::{HttpFetcher, PageFetcher};
    pub use wq_core::{Error, QuizResponse, QuizStatus, Result};
}
