//! Model-free quiz used in mock mode and whenever generation fails.
//!
//! Output depends only on the article title and summary, so the same
//! input always yields a byte-identical payload.

use wq_core::{Difficulty, GenerationPayload, KeyEntities, QuizQuestion};

const SUMMARY_LIMIT: usize = 200;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn question(
    question: String,
    options: [String; 4],
    answer: usize,
    difficulty: Difficulty,
    explanation: &str,
) -> QuizQuestion {
    QuizQuestion {
        question,
        correct_answer: options[answer].clone(),
        options: options.to_vec(),
        difficulty,
        explanation: explanation.to_string(),
    }
}

fn truncate_summary(summary: &str) -> String {
    if summary.chars().count() > SUMMARY_LIMIT {
        let head: String = summary.chars().take(SUMMARY_LIMIT).collect();
        format!("{}...", head)
    } else {
        summary.to_string()
    }
}

pub fn fallback_payload(title: &str, summary: &str) -> GenerationPayload {
    let quiz = vec![
        question(
            format!("What is the main topic of this article about {}?", title),
            [
                format!("A) {}", title),
                "B) Something else".to_string(),
                "C) Another topic".to_string(),
                "D) None of the above".to_string(),
            ],
            0,
            Difficulty::Easy,
            "This is the main subject of the article.",
        ),
        question(
            "According to the article, which statement is most accurate?".to_string(),
            [
                "A) The topic is widely studied".to_string(),
                "B) The topic is rarely discussed".to_string(),
                "C) The topic doesn't exist".to_string(),
                "D) The topic is fictional".to_string(),
            ],
            0,
            Difficulty::Medium,
            "Based on the comprehensive Wikipedia article.",
        ),
        question(
            format!("What can you learn from reading about {}?", title),
            [
                "A) Historical context and facts".to_string(),
                "B) Cooking recipes".to_string(),
                "C) Weather patterns".to_string(),
                "D) Sports scores".to_string(),
            ],
            0,
            Difficulty::Easy,
            "Wikipedia articles provide factual information.",
        ),
        question(
            "Which difficulty level best describes this question?".to_string(),
            [
                "A) Easy - Basic knowledge".to_string(),
                "B) Medium - Moderate understanding".to_string(),
                "C) Hard - Expert level".to_string(),
                "D) Impossible".to_string(),
            ],
            1,
            Difficulty::Medium,
            "This tests your understanding of difficulty levels.",
        ),
        question(
            format!("What is a key characteristic of {}?", title),
            [
                "A) It has historical significance".to_string(),
                "B) It's completely unknown".to_string(),
                "C) It's purely fictional".to_string(),
                "D) It has no documentation".to_string(),
            ],
            0,
            Difficulty::Hard,
            "Most Wikipedia topics have historical or cultural significance.",
        ),
    ];

    GenerationPayload {
        title: Some(title.to_string()),
        summary: Some(truncate_summary(summary)),
        key_entities: KeyEntities {
            people: strings(&["Notable Person 1", "Notable Person 2", "Expert Researcher"]),
            organizations: strings(&["Wikipedia Foundation", "Research Institute"]),
            locations: strings(&["United States", "Europe", "Global"]),
        },
        sections: strings(&[
            "Introduction",
            "History",
            "Key Concepts",
            "Applications",
            "Criticism",
            "See Also",
        ]),
        quiz,
        related_topics: strings(&[
            "Related Topic 1",
            "Related Topic 2",
            "Further Reading",
            "See Also",
        ]),
    }
}
