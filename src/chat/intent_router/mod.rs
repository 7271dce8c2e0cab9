pub mod dispatcher;
pub mod fallback;
pub mod parser;
pub mod suggestions;
pub mod ui;

pub use dispatcher::{ChatResponse, IntentDispatcher, ResponseKind, ResponsePayload};
pub use parser::{ChatIntent, IntentRouter, RoutedIntent, INTENT_RULES};
