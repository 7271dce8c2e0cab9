pub mod chat;
pub mod classification;
pub mod config;
pub mod dataset;
pub mod insights;
pub mod llm;

// Re-export commonly used types for convenience.
pub use chat::{Assistant, ChatIntent, ChatResponse, ChatSession};
pub use classification::{is_customer_comment, IssueClassifier, IssueLabel, IssueTaxonomy};
pub use config::AppConfig;
pub use dataset::{CommentRecord, Dataset};
pub use llm::{CompletionClient, LlmError};
