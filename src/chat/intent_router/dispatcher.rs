use super::fallback;
use super::parser::{ChatIntent, RoutedIntent};
use super::ui;
use crate::config::ChatSettings;
use crate::dataset::{Column, CommentRecord, Dataset};
use crate::llm::CompletionClient;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Answer,
    /// The completion service failed; the message carries the warning.
    Error,
}

/// Structured data behind a response, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    None,
    Search {
        keyword: String,
        matches: Vec<CommentRecord>,
    },
    TopCity {
        city: String,
        count: usize,
    },
    TopCategory {
        category: String,
        count: usize,
    },
    AverageEngagement {
        mean: f64,
    },
    /// Number of complaint texts sent to the completion service.
    Sampled {
        sample_size: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    pub intent: ChatIntent,
    pub argument: Option<String>,
    pub kind: ResponseKind,
    pub message: String,
    pub payload: ResponsePayload,
}

impl ChatResponse {
    fn answer(routed: &RoutedIntent, message: impl Into<String>, payload: ResponsePayload) -> Self {
        Self {
            intent: routed.intent,
            argument: routed.argument.clone(),
            kind: ResponseKind::Answer,
            message: message.into(),
            payload,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ResponseKind::Error
    }
}

/// Runs routed intents against the shared dataset and completion service.
pub struct IntentDispatcher {
    dataset: Arc<Dataset>,
    llm: Arc<dyn CompletionClient>,
    settings: ChatSettings,
}

impl IntentDispatcher {
    pub fn new(dataset: Arc<Dataset>, llm: Arc<dyn CompletionClient>, settings: ChatSettings) -> Self {
        Self {
            dataset,
            llm,
            settings,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn llm(&self) -> &dyn CompletionClient {
        self.llm.as_ref()
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Produces the response for one routed message. Completion failures
    /// become an error-kind response; this never returns an error itself.
    pub fn dispatch<R: Rng + ?Sized>(
        &self,
        routed: &RoutedIntent,
        query: &str,
        rng: &mut R,
    ) -> ChatResponse {
        info!(intent = %routed.intent, "Dispatching chat intent");
        match routed.intent {
            ChatIntent::Greeting => ChatResponse::answer(routed, ui::GREETING, ResponsePayload::None),
            ChatIntent::HelpMenu => ChatResponse::answer(routed, ui::HELP_MENU, ResponsePayload::None),
            ChatIntent::Search => self.search(routed),
            ChatIntent::Summarize => {
                let samples = self.sample(rng);
                let prompt = fallback::summary_prompt(&samples);
                self.complete(routed, &prompt, samples.len())
            }
            ChatIntent::TopCity => match self.dataset.mode(Column::City) {
                Some((city, count)) => ChatResponse::answer(
                    routed,
                    ui::top_city(&city, count),
                    ResponsePayload::TopCity { city, count },
                ),
                None => ChatResponse::answer(routed, ui::column_missing("city"), ResponsePayload::None),
            },
            ChatIntent::TopCategory => match self.dataset.mode(Column::Category) {
                Some((category, count)) => ChatResponse::answer(
                    routed,
                    ui::top_category(&category),
                    ResponsePayload::TopCategory { category, count },
                ),
                None => ChatResponse::answer(
                    routed,
                    ui::column_missing("category"),
                    ResponsePayload::None,
                ),
            },
            ChatIntent::AverageEngagement => match self.dataset.mean_engagement() {
                Some(mean) => ChatResponse::answer(
                    routed,
                    ui::average_engagement(mean),
                    ResponsePayload::AverageEngagement { mean },
                ),
                None => ChatResponse::answer(
                    routed,
                    ui::column_missing("engagement"),
                    ResponsePayload::None,
                ),
            },
            ChatIntent::Fallback => {
                let samples = self.sample(rng);
                let prompt = fallback::context_prompt(query, &samples);
                self.complete(routed, &prompt, samples.len())
            }
        }
    }

    fn search(&self, routed: &RoutedIntent) -> ChatResponse {
        let keyword = routed.argument.clone().unwrap_or_default();
        let matches: Vec<CommentRecord> = self
            .dataset
            .search(&keyword)
            .into_iter()
            .cloned()
            .collect();
        debug!(keyword = %keyword, matches = matches.len(), "Keyword search finished");
        ChatResponse::answer(
            routed,
            ui::search_results(&keyword, matches.len()),
            ResponsePayload::Search { keyword, matches },
        )
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        self.dataset.sample_texts(self.settings.context_sample_size(), rng)
    }

    fn complete(&self, routed: &RoutedIntent, prompt: &str, sample_size: usize) -> ChatResponse {
        match self.llm.complete(&self.settings.assistant_persona, prompt) {
            Ok(answer) => ChatResponse::answer(routed, answer, ResponsePayload::Sampled { sample_size }),
            Err(err) => {
                warn!(intent = %routed.intent, error = %err, "Completion failed");
                ChatResponse {
                    intent: routed.intent,
                    argument: routed.argument.clone(),
                    kind: ResponseKind::Error,
                    message: fallback::llm_failure_message(&err),
                    payload: ResponsePayload::None,
                }
            }
        }
    }
}
