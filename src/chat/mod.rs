pub mod history;
pub mod intent_router;

pub use history::{ChatRole, ChatTurn};
pub use intent_router::{
    ChatIntent, ChatResponse, IntentDispatcher, IntentRouter, ResponseKind, ResponsePayload,
    RoutedIntent,
};

use crate::config::ChatSettings;
use crate::dataset::Dataset;
use crate::llm::CompletionClient;
use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Everything sessions share: the read-only dataset, the completion
/// service, and the routing table. One assistant serves any number of
/// sessions.
pub struct Assistant {
    router: IntentRouter,
    dispatcher: IntentDispatcher,
}

impl Assistant {
    pub fn new(dataset: Arc<Dataset>, llm: Arc<dyn CompletionClient>, settings: ChatSettings) -> Self {
        Self {
            router: IntentRouter::new(),
            dispatcher: IntentDispatcher::new(dataset, llm, settings),
        }
    }

    pub fn router(&self) -> &IntentRouter {
        &self.router
    }

    pub fn dispatcher(&self) -> &IntentDispatcher {
        &self.dispatcher
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Processing,
}

/// Result of one processed message.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The text that was processed: a clicked suggestion or the typed input.
    pub query: String,
    pub routed: RoutedIntent,
    pub response: ChatResponse,
    /// Follow-up questions offered for the next turn; may be empty.
    pub suggestions: Vec<String>,
}

/// Per-conversation context: the append-only history, the suggestions on
/// offer, and a pending suggestion click.
pub struct ChatSession {
    session_id: Uuid,
    history: Vec<ChatTurn>,
    suggestions: Vec<String>,
    clicked_suggestion: Option<String>,
    state: SessionState,
    rng: StdRng,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Session whose context sampling is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            history: Vec::new(),
            suggestions: Vec::new(),
            clicked_suggestion: None,
            state: SessionState::AwaitingInput,
            rng,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Marks an offered suggestion as clicked. It replaces whatever is typed
    /// on the next [`ChatSession::submit`].
    pub fn click_suggestion(&mut self, index: usize) -> Result<&str> {
        let Some(suggestion) = self.suggestions.get(index) else {
            bail!(
                "No suggestion #{} on offer ({} available).",
                index + 1,
                self.suggestions.len()
            );
        };
        self.clicked_suggestion = Some(suggestion.clone());
        Ok(suggestion)
    }

    /// Processes one turn. A clicked suggestion takes priority over typed
    /// text; with neither there is nothing to do and `None` is returned.
    pub fn submit(&mut self, assistant: &Assistant, typed: Option<&str>) -> Option<TurnOutcome> {
        let query = match self.clicked_suggestion.take() {
            Some(clicked) => clicked,
            None => typed?.to_string(),
        };
        Some(self.process(assistant, query))
    }

    /// Shorthand for submitting typed text.
    pub fn handle_message(&mut self, assistant: &Assistant, message: &str) -> Option<TurnOutcome> {
        self.submit(assistant, Some(message))
    }

    fn process(&mut self, assistant: &Assistant, query: String) -> TurnOutcome {
        self.state = SessionState::Processing;
        self.history.push(ChatTurn::user(query.clone()));

        let routed = assistant.router.route(&query);
        let response = assistant.dispatcher.dispatch(&routed, &query, &mut self.rng);
        self.history.push(ChatTurn::assistant(response.message.clone()));

        let settings = assistant.dispatcher.settings();
        let suggestions = if settings.suggestions_enabled {
            intent_router::suggestions::request_follow_ups(
                assistant.dispatcher.llm(),
                &query,
                settings.suggestion_count,
            )
        } else {
            Vec::new()
        };
        debug!(
            session = %self.session_id,
            intent = %routed.intent,
            suggestions = suggestions.len(),
            "Chat turn complete"
        );
        self.suggestions = suggestions.clone();
        self.state = SessionState::AwaitingInput;

        TurnOutcome {
            query,
            routed,
            response,
            suggestions,
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
