use wq_core::ExtractedArticle;

pub const PROMPT_TEMPLATE: &str = r#"
You are an expert quiz generator. Given the text of a Wikipedia article, produce a JSON object with the following fields:
- title: article title (string)
- summary: a concise 2-3 sentence summary (string)
- key_entities: an object with three arrays:
    * people: list of important people mentioned (max 5)
    * organizations: list of organizations/companies mentioned (max 5)
    * locations: list of places/locations mentioned (max 5)
- sections: list of main section titles from the article (max 8)
- quiz: an array of 5-10 questions. Each question must contain:
    * question (string)
    * options (list of four strings labelled A-D)
    * correct_answer (the correct option string, e.g. "A) Option Text")
    * difficulty (one of "easy", "medium", "hard")
    * explanation (short sentence why this is correct)
- related_topics: list of 3-5 related Wikipedia topics the user might want to explore

Only output raw JSON (no markdown, no extra text). Use the following data:
Title: {title}
Summary: {summary}
Text Content:
{text}
"#;

/// Substitute `{name}` placeholders in one left-to-right pass.
///
/// Inserted values are copied verbatim and never scanned again, so braces
/// inside article text cannot be mistaken for placeholders. Braces in the
/// template that do not name a known value are kept as-is.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });
        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn build_prompt(article: &ExtractedArticle) -> String {
    render(
        PROMPT_TEMPLATE,
        &[
            ("title", article.title.as_str()),
            ("summary", article.summary.as_str()),
            ("text", article.text.as_str()),
        ],
    )
}
