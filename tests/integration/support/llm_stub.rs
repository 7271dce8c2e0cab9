use complaintbase::llm::{CompletionClient, LlmError};
use std::sync::{Arc, Mutex};

const FOLLOW_UP_MARKER: &str = "Based on this user query";

#[derive(Debug, Clone)]
pub struct StubCall {
    pub system_message: String,
    pub prompt: String,
}

impl StubCall {
    pub fn is_follow_up(&self) -> bool {
        self.prompt.starts_with(FOLLOW_UP_MARKER)
    }
}

/// Deterministic completion service. Answers and follow-up requests are
/// scripted separately and every call is recorded.
pub struct StubClient {
    answer: Result<String, LlmError>,
    follow_ups: Result<String, LlmError>,
    calls: Mutex<Vec<StubCall>>,
}

impl StubClient {
    pub fn new(answer: Result<String, LlmError>, follow_ups: Result<String, LlmError>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            follow_ups,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn answering(answer: &str) -> Arc<Self> {
        Self::new(
            Ok(answer.to_string()),
            Ok("- Which city complains most?\n- What is the top category?\n- Any billing spikes?".into()),
        )
    }

    pub fn failing() -> Arc<Self> {
        let err = LlmError::Transport("connection refused".into());
        Self::new(Err(err.clone()), Err(err))
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls made to answer a question, excluding follow-up requests.
    pub fn answer_calls(&self) -> Vec<StubCall> {
        self.calls()
            .into_iter()
            .filter(|call| !call.is_follow_up())
            .collect()
    }
}

impl CompletionClient for StubClient {
    fn complete(&self, system_message: &str, user_prompt: &str) -> Result<String, LlmError> {
        let call = StubCall {
            system_message: system_message.to_string(),
            prompt: user_prompt.to_string(),
        };
        let follow_up = call.is_follow_up();
        self.calls.lock().unwrap().push(call);
        if follow_up {
            self.follow_ups.clone()
        } else {
            self.answer.clone()
        }
    }
}
