use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_ENTITIES_PER_KIND: usize = 5;
pub const MAX_SECTIONS: usize = 8;
pub const MIN_QUESTIONS: usize = 5;
pub const MAX_QUESTIONS: usize = 10;
pub const MIN_RELATED_TOPICS: usize = 3;
pub const MAX_RELATED_TOPICS: usize = 5;
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A scraped article as persisted by the store. Unique by `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub summary: String,
    pub raw_html: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert an article; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub url: String,
    pub title: String,
    pub summary: String,
    pub raw_html: String,
}

/// One generation result. Many quizzes may point at the same article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: i64,
    pub article_id: i64,
    pub generated_at: DateTime<Utc>,
    pub payload: GenerationPayload,
}

/// Output of the extractor. Never persisted as such.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedArticle {
    pub title: String,
    pub summary: String,
    pub sections: Vec<String>,
    pub text: String,
    pub raw_html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "Easy", alias = "EASY")]
    Easy,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "Hard", alias = "HARD")]
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyEntities {
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
}

/// Structured quiz produced by the generator and stored inside a [`QuizRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub key_entities: KeyEntities,
    #[serde(default)]
    pub sections: Vec<String>,
    pub quiz: Vec<QuizQuestion>,
    #[serde(default)]
    pub related_topics: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("expected 5-10 questions, got {0}")]
    QuestionCount(usize),

    #[error("question {index} has {count} options, expected 4")]
    OptionCount { index: usize, count: usize },

    #[error("question {index} answer {answer:?} is not one of its options")]
    AnswerNotAnOption { index: usize, answer: String },

    #[error("question {0} has empty text")]
    EmptyQuestion(usize),

    #[error("expected 3-5 related topics, got {0}")]
    RelatedTopicCount(usize),
}

impl GenerationPayload {
    /// Truncates every list to its cap. Lists that are too long are
    /// trimmed, never rejected.
    pub fn normalize(mut self) -> Self {
        self.key_entities.people.truncate(MAX_ENTITIES_PER_KIND);
        self.key_entities.organizations.truncate(MAX_ENTITIES_PER_KIND);
        self.key_entities.locations.truncate(MAX_ENTITIES_PER_KIND);
        self.sections.truncate(MAX_SECTIONS);
        self.quiz.truncate(MAX_QUESTIONS);
        self.related_topics.truncate(MAX_RELATED_TOPICS);
        self
    }

    pub fn validate(&self) -> std::result::Result<(), ShapeError> {
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.quiz.len()) {
            return Err(ShapeError::QuestionCount(self.quiz.len()));
        }
        for (index, q) in self.quiz.iter().enumerate() {
            if q.question.trim().is_empty() {
                return Err(ShapeError::EmptyQuestion(index));
            }
            if q.options.len() != OPTIONS_PER_QUESTION {
                return Err(ShapeError::OptionCount {
                    index,
                    count: q.options.len(),
                });
            }
            if !q.options.iter().any(|o| o == &q.correct_answer) {
                return Err(ShapeError::AnswerNotAnOption {
                    index,
                    answer: q.correct_answer.clone(),
                });
            }
        }
        if !(MIN_RELATED_TOPICS..=MAX_RELATED_TOPICS).contains(&self.related_topics.len()) {
            return Err(ShapeError::RelatedTopicCount(self.related_topics.len()));
        }
        Ok(())
    }
}

/// Item of the `/history` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ArticleRecord> for ArticleSummary {
    fn from(article: &ArticleRecord) -> Self {
        Self {
            id: article.id,
            url: article.url.clone(),
            title: article.title.clone(),
            created_at: article.created_at,
        }
    }
}

/// Client-facing view of a quiz joined with its article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResponse {
    pub id: i64,
    pub url: Option<String>,
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_entities: Option<KeyEntities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Vec<QuizQuestion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_topics: Option<Vec<String>>,
}

impl QuizResponse {
    /// Payload title and summary win; the article fills in whatever the
    /// payload left out.
    pub fn from_records(quiz: &QuizRecord, article: &ArticleRecord) -> Self {
        let payload = &quiz.payload;
        Self {
            id: quiz.id,
            url: Some(article.url.clone()),
            title: payload.title.clone().unwrap_or_else(|| article.title.clone()),
            summary: payload
                .summary
                .clone()
                .unwrap_or_else(|| article.summary.clone()),
            key_entities: Some(payload.key_entities.clone()),
            sections: Some(payload.sections.clone()),
            quiz: Some(payload.quiz.clone()),
            related_topics: Some(payload.related_topics.clone()),
        }
    }
}

/// Whether a quiz came out of the store or was produced for this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    Cached,
    Generated,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn question(answer: &str) -> QuizQuestion {
        QuizQuestion {
            question: "Which one?".to_string(),
            options: vec![
                "A) One".to_string(),
                "B) Two".to_string(),
                "C) Three".to_string(),
                "D) Four".to_string(),
            ],
            correct_answer: answer.to_string(),
            difficulty: Difficulty::Easy,
            explanation: String::new(),
        }
    }

    fn payload(questions: usize) -> GenerationPayload {
        GenerationPayload {
            title: None,
            summary: None,
            key_entities: KeyEntities::default(),
            sections: vec![],
            quiz: (0..questions).map(|_| question("B) Two")).collect(),
            related_topics: vec!["X".to_string(), "Y".to_string(), "Z".to_string()],
        }
    }

    #[test]
    fn test_validate_question_bounds() {
        assert_eq!(payload(4).validate(), Err(ShapeError::QuestionCount(4)));
        assert!(payload(5).validate().is_ok());
        assert!(payload(10).validate().is_ok());
        assert_eq!(payload(11).validate(), Err(ShapeError::QuestionCount(11)));
    }

    #[test]
    fn test_validate_rejects_unknown_answer() {
        let mut p = payload(5);
        p.quiz[2] = question("Two");
        assert!(matches!(
            p.validate(),
            Err(ShapeError::AnswerNotAnOption { index: 2, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_three_options() {
        let mut p = payload(5);
        p.quiz[0].options.pop();
        assert_eq!(
            p.validate(),
            Err(ShapeError::OptionCount { index: 0, count: 3 })
        );
    }

    #[test]
    fn test_validate_related_topic_bounds() {
        let mut p = payload(5);
        p.related_topics.clear();
        assert_eq!(p.validate(), Err(ShapeError::RelatedTopicCount(0)));

        p.related_topics = vec!["One".to_string()];
        assert_eq!(p.validate(), Err(ShapeError::RelatedTopicCount(1)));

        p.related_topics = (0..5).map(|i| format!("T{}", i)).collect();
        assert!(p.validate().is_ok());
        p.related_topics.push("T5".to_string());
        assert_eq!(p.validate(), Err(ShapeError::RelatedTopicCount(6)));
    }

    #[test]
    fn test_validate_accepts_unlabelled_options() {
        let mut p = payload(5);
        p.quiz[1].options = ["One", "Two", "Three", "Four"].map(String::from).to_vec();
        p.quiz[1].correct_answer = "Three".to_string();
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_normalize_truncates_lists() {
        let mut p = payload(12);
        p.sections = (0..20).map(|i| format!("S{}", i)).collect();
        p.key_entities.people = (0..9).map(|i| format!("P{}", i)).collect();
        p.related_topics = (0..7).map(|i| format!("T{}", i)).collect();

        let p = p.normalize();
        assert_eq!(p.quiz.len(), MAX_QUESTIONS);
        assert_eq!(p.sections.len(), MAX_SECTIONS);
        assert_eq!(p.key_entities.people.len(), MAX_ENTITIES_PER_KIND);
        assert_eq!(p.related_topics.len(), MAX_RELATED_TOPICS);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_payload_accepts_missing_optional_fields() {
        let json = r#"{"quiz": [{"question": "Q?", "options": ["A) a", "B) b", "C) c", "D) d"],
            "correct_answer": "A) a", "difficulty": "Hard"}]}"#;
        let p: GenerationPayload = serde_json::from_str(json).unwrap();
        assert_eq!(p.title, None);
        assert_eq!(p.quiz[0].difficulty, Difficulty::Hard);
        assert!(p.quiz[0].explanation.is_empty());
    }

    #[test]
    fn test_quiz_response_falls_back_to_article() {
        let article = ArticleRecord {
            id: 3,
            url: "https://en.wikipedia.org/wiki/Rust".to_string(),
            title: "Rust".to_string(),
            summary: "A language.".to_string(),
            raw_html: String::new(),
            created_at: Utc::now(),
        };
        let mut quiz = QuizRecord {
            id: 9,
            article_id: 3,
            generated_at: Utc::now(),
            payload: payload(5),
        };

        let response = QuizResponse::from_records(&quiz, &article);
        assert_eq!(response.id, 9);
        assert_eq!(response.title, "Rust");
        assert_eq!(response.summary, "A language.");
        assert_eq!(response.url.as_deref(), Some(article.url.as_str()));

        quiz.payload.title = Some("Rust (programming language)".to_string());
        let response = QuizResponse::from_records(&quiz, &article);
        assert_eq!(response.title, "Rust (programming language)");
        assert_eq!(response.quiz.map(|q| q.len()), Some(5));
    }
}
