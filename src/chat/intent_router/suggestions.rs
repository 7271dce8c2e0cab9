use crate::llm::CompletionClient;
use tracing::debug;

const FOLLOW_UP_SYSTEM_MESSAGE: &str =
    "You are a helpful assistant suggesting follow-up questions.";

pub fn follow_up_prompt(query: &str, count: usize) -> String {
    format!(
        "Based on this user query:\n'{}'\nGenerate {count} helpful follow-up questions. \
         Return only the questions as plain bullet points.",
        query.trim()
    )
}

/// Splits a bullet-list completion into question strings.
pub fn parse_suggestions(raw: &str, limit: usize) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim_matches(|c: char| c == '-' || c == '•' || c == '*' || c.is_whitespace()))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .take(limit)
        .collect()
}

/// Best-effort follow-up questions for `query`. A failed completion yields
/// no suggestions; it never surfaces to the user.
pub fn request_follow_ups(client: &dyn CompletionClient, query: &str, count: usize) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }
    match client.complete(FOLLOW_UP_SYSTEM_MESSAGE, &follow_up_prompt(query, count)) {
        Ok(raw) => parse_suggestions(&raw, count),
        Err(err) => {
            debug!(error = %err, "Follow-up suggestions unavailable");
            Vec::new()
        }
    }
}
