use super::{CompletionClient, LlmError};
use crate::config::LlmSettings;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Blocking client for an Azure OpenAI chat-completions deployment.
pub struct AzureOpenAiClient {
    client: Client,
    url: String,
    api_key: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl AzureOpenAiClient {
    pub fn new(settings: &LlmSettings, api_key: impl Into<String>) -> Result<Self, LlmError> {
        let endpoint = settings.endpoint.trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(LlmError::Config("endpoint is empty".into()));
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms.max(1)))
            .build()
            .map_err(|err| LlmError::Config(err.to_string()))?;
        Ok(Self {
            client,
            url: format!(
                "{endpoint}/openai/deployments/{}/chat/completions?api-version={}",
                settings.deployment, settings.api_version
            ),
            api_key: api_key.into(),
            max_tokens: settings.max_tokens,
        })
    }
}

impl CompletionClient for AzureOpenAiClient {
    fn complete(&self, system_message: &str, user_prompt: &str) -> Result<String, LlmError> {
        let started = Instant::now();
        debug!(prompt_chars = user_prompt.len(), "Sending completion request");
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_message,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: self.max_tokens,
        };
        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .map_err(|err| LlmError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(status = status.as_u16(), "Completion request rejected");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .map_err(|err| LlmError::MalformedResponse(err.to_string()))?;
        let answer = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("no message content in choices".into()))?;

        info!(
            duration_ms = started.elapsed().as_millis() as u64,
            response_chars = answer.len(),
            "Completion request finished"
        );
        Ok(answer)
    }
}
