use serde::{Deserialize, Serialize};
use std::fmt;

/// What a chat message asks the assistant to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatIntent {
    Greeting,
    HelpMenu,
    Search,
    Summarize,
    TopCity,
    TopCategory,
    AverageEngagement,
    Fallback,
}

impl ChatIntent {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChatIntent::Greeting => "greeting",
            ChatIntent::HelpMenu => "help_menu",
            ChatIntent::Search => "search",
            ChatIntent::Summarize => "summarize",
            ChatIntent::TopCity => "top_city",
            ChatIntent::TopCategory => "top_category",
            ChatIntent::AverageEngagement => "average_engagement",
            ChatIntent::Fallback => "fallback",
        }
    }

    /// Whether answering this intent calls the completion service.
    pub const fn uses_llm(&self) -> bool {
        matches!(self, ChatIntent::Summarize | ChatIntent::Fallback)
    }
}

impl fmt::Display for ChatIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Test applied to the normalized query.
#[derive(Debug, Clone, Copy)]
pub enum QueryTest {
    StartsWith(&'static [&'static str]),
    Contains(&'static [&'static str]),
}

impl QueryTest {
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            QueryTest::StartsWith(prefixes) => {
                prefixes.iter().any(|prefix| normalized.starts_with(prefix))
            }
            QueryTest::Contains(needles) => {
                needles.iter().any(|needle| normalized.contains(needle))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: ChatIntent,
    pub test: QueryTest,
}

/// Routing table, evaluated top to bottom. Anything unmatched is `Fallback`.
pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: ChatIntent::Greeting,
        test: QueryTest::StartsWith(&["hi", "hello", "hey"]),
    },
    IntentRule {
        intent: ChatIntent::HelpMenu,
        test: QueryTest::Contains(&["what can you do", "help"]),
    },
    IntentRule {
        intent: ChatIntent::Search,
        test: QueryTest::Contains(&["search", "find"]),
    },
    IntentRule {
        intent: ChatIntent::Summarize,
        test: QueryTest::Contains(&["summary", "summarize"]),
    },
    IntentRule {
        intent: ChatIntent::TopCity,
        test: QueryTest::Contains(&["top city", "most complaints"]),
    },
    IntentRule {
        intent: ChatIntent::TopCategory,
        test: QueryTest::Contains(&["top category", "common issue"]),
    },
    IntentRule {
        intent: ChatIntent::AverageEngagement,
        test: QueryTest::Contains(&["average engagement"]),
    },
];

/// Result of routing one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutedIntent {
    pub intent: ChatIntent,
    /// Search keyword; `None` for every other intent.
    pub argument: Option<String>,
    /// Lower-cased, trimmed query the rules were evaluated against.
    pub normalized: String,
}

pub struct IntentRouter {
    rules: &'static [IntentRule],
}

impl IntentRouter {
    pub fn new() -> Self {
        Self {
            rules: INTENT_RULES,
        }
    }

    pub fn rules(&self) -> &[IntentRule] {
        self.rules
    }

    pub fn route(&self, query: &str) -> RoutedIntent {
        let normalized = query.trim().to_lowercase();
        let intent = self
            .rules
            .iter()
            .find(|rule| rule.test.matches(&normalized))
            .map(|rule| rule.intent)
            .unwrap_or(ChatIntent::Fallback);
        let argument = match intent {
            ChatIntent::Search => Some(search_keyword(&normalized)),
            _ => None,
        };
        RoutedIntent {
            intent,
            argument,
            normalized,
        }
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Text after the last "search", or after the last "find" when the query
/// has no "search". May be empty.
fn search_keyword(normalized: &str) -> String {
    let marker = if normalized.contains("search") {
        "search"
    } else {
        "find"
    };
    normalized
        .rsplit_once(marker)
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}
