use scraper::{ElementRef, Html, Selector};
use wq_core::ExtractedArticle;

use super::utils::{normalize_whitespace, truncate_chars};

/// Body text handed to the model is capped at this many characters.
pub const TEXT_BUDGET: usize = 6000;

/// Pulls the title, lead paragraph, section headings and body text out of a
/// Wikipedia article page. Missing parts come back empty; parsing never fails.
#[derive(Debug, Clone)]
pub struct WikipediaExtractor {
    title: Selector,
    content: Selector,
    heading: Selector,
    headline: Selector,
    paragraph: Selector,
}

impl Default for WikipediaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn selector(css: &str) -> Selector {
    // Only called with the literals below.
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

fn element_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

impl WikipediaExtractor {
    pub fn new() -> Self {
        Self {
            title: selector("h1#firstHeading"),
            content: selector("div.mw-parser-output"),
            heading: selector("h2"),
            headline: selector("span.mw-headline"),
            paragraph: selector("p"),
        }
    }

    pub fn extract(&self, raw_html: &str) -> ExtractedArticle {
        let document = Html::parse_document(raw_html);

        let title = document
            .select(&self.title)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let mut article = ExtractedArticle {
            title,
            raw_html: raw_html.to_string(),
            ..Default::default()
        };

        let Some(content) = document.select(&self.content).next() else {
            tracing::debug!("No main content container found");
            return article;
        };

        article.summary = content
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "p")
            .map(element_text)
            .find(|text| !text.is_empty())
            .unwrap_or_default();

        article.sections = content
            .select(&self.heading)
            .filter_map(|h2| h2.select(&self.headline).next())
            .map(element_text)
            .collect();

        let text = content
            .select(&self.paragraph)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        article.text = truncate_chars(&text, TEXT_BUDGET).to_string();

        article
    }
}
