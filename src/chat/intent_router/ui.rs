pub const GREETING: &str =
    "👋 Hi! I'm your Telkom complaints assistant. How can I help today?";

pub const HELP_MENU: &str = "Here's what I can do:\n\
- `search <keyword>` or `find <keyword>`: count complaints mentioning a keyword\n\
- `summary`: summarize the themes in a sample of complaints\n\
- `top city`: the city with the most complaints\n\
- `top category`: the most common complaint category\n\
- `average engagement`: mean engagement per post\n\
Anything else is answered by the AI assistant from a sample of complaints.";

pub fn search_results(keyword: &str, count: usize) -> String {
    format!("🔍 Found **{count}** complaints containing '**{keyword}**'.")
}

pub fn top_city(city: &str, count: usize) -> String {
    format!("📍 Most complaints came from **{city}** ({count} posts).")
}

pub fn top_category(category: &str) -> String {
    format!("🏷️ Most common complaint category is **{category}**.")
}

pub fn average_engagement(mean: f64) -> String {
    format!("📊 The average post engagement is **{mean:.2}**.")
}

pub fn column_missing(what: &str) -> String {
    format!("No {what} data is available in this dataset.")
}
