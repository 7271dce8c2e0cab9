//! Completion capability used by the chat assistant.
//!
//! The assistant only needs "answer this prompt"; everything about the
//! hosted service lives behind [`CompletionClient`] so sessions can run
//! against a deterministic stub.

pub mod azure;

pub use azure::AzureOpenAiClient;

use crate::config::LlmSettings;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// No usable endpoint or credentials.
    #[error("LLM is not configured: {0}")]
    Config(String),
    /// Connection, TLS, or timeout failure.
    #[error("request failed: {0}")]
    Transport(String),
    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

pub trait CompletionClient: Send + Sync {
    /// Returns the assistant message for one system + user exchange.
    fn complete(&self, system_message: &str, user_prompt: &str) -> Result<String, LlmError>;
}

impl<T: CompletionClient + ?Sized> CompletionClient for Arc<T> {
    fn complete(&self, system_message: &str, user_prompt: &str) -> Result<String, LlmError> {
        (**self).complete(system_message, user_prompt)
    }
}

impl<T: CompletionClient + ?Sized> CompletionClient for Box<T> {
    fn complete(&self, system_message: &str, user_prompt: &str) -> Result<String, LlmError> {
        (**self).complete(system_message, user_prompt)
    }
}

/// Stand-in used when no API key is available. Every call fails with a
/// configuration error, which the assistant reports like any other failure.
#[derive(Debug, Clone)]
pub struct DisabledClient {
    reason: String,
}

impl DisabledClient {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl CompletionClient for DisabledClient {
    fn complete(&self, _system_message: &str, _user_prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Config(self.reason.clone()))
    }
}

/// Builds the Azure client when a key is present, otherwise a disabled one.
pub fn client_from_settings(settings: &LlmSettings) -> Arc<dyn CompletionClient> {
    match settings.api_key() {
        Some(api_key) => match AzureOpenAiClient::new(settings, api_key) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                warn!(error = %err, "Falling back to disabled LLM client");
                Arc::new(DisabledClient::new(err.to_string()))
            }
        },
        None => Arc::new(DisabledClient::new(format!(
            "set {} to enable AI answers",
            settings.api_key_env
        ))),
    }
}
