use crate::llm::LlmError;

/// Prefix of every assistant message that reports a failed completion.
pub const WARNING_MARKER: &str = "⚠️";

pub fn summary_prompt(samples: &[String]) -> String {
    format!(
        "Summarize the themes in these Telkom complaints:\n{}",
        bullet_list(samples)
    )
}

/// Prompt for questions no local handler understands: the literal query
/// plus a sample of complaints as grounding.
pub fn context_prompt(query: &str, samples: &[String]) -> String {
    format!(
        "User asked: '{}'. Use this data to answer:\n{}",
        query.trim(),
        bullet_list(samples)
    )
}

pub fn llm_failure_message(err: &LlmError) -> String {
    format!("{WARNING_MARKER} Error: {err}")
}

fn bullet_list(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
