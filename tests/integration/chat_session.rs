use anyhow::Result;
use complaintbase::chat::intent_router::fallback::WARNING_MARKER;
use complaintbase::chat::SessionState;
use complaintbase::chat::{Assistant, ChatIntent, ChatRole, ResponsePayload};
use complaintbase::dataset::{Dataset, DatasetViews};
use complaintbase::llm::LlmError;

use crate::support::complaints::{assistant, session, settings};
use crate::support::llm_stub::StubClient;

#[test]
fn llm_failure_becomes_single_warning_message() {
    let client = StubClient::failing();
    let assistant = assistant(&client, settings(15));
    let mut chat = session();

    let outcome = chat.handle_message(&assistant, "tell me a joke").unwrap();
    assert!(outcome.response.is_error());
    assert!(
        outcome.response.message.starts_with(WARNING_MARKER),
        "Failure should be flagged: {}",
        outcome.response.message
    );
    assert!(outcome.response.message.contains("connection refused"));
    assert!(outcome.suggestions.is_empty());
    assert_eq!(chat.history().len(), 2);
    assert_eq!(chat.state(), SessionState::AwaitingInput);

    // The session keeps working after a failure.
    let outcome = chat.handle_message(&assistant, "top city").unwrap();
    assert!(!outcome.response.is_error());
    assert_eq!(chat.history().len(), 4);
}

#[test]
fn suggestion_failure_does_not_block_the_answer() {
    let client = StubClient::new(
        Ok("Network outages dominate.".into()),
        Err(LlmError::Status {
            status: 429,
            body: "rate limited".into(),
        }),
    );
    let assistant = assistant(&client, settings(15));
    let mut chat = session();

    let outcome = chat.handle_message(&assistant, "summarize").unwrap();
    assert_eq!(outcome.response.message, "Network outages dominate.");
    assert!(!outcome.response.is_error());
    assert!(outcome.suggestions.is_empty());
    assert!(chat.suggestions().is_empty());
}

#[test]
fn follow_up_suggestions_are_offered_and_clickable() -> Result<()> {
    let client = StubClient::answering("unused");
    let assistant = assistant(&client, settings(15));
    let mut chat = session();

    let outcome = chat.handle_message(&assistant, "hello").unwrap();
    assert_eq!(
        outcome.suggestions,
        vec![
            "Which city complains most?",
            "What is the top category?",
            "Any billing spikes?",
        ]
    );
    let follow_ups: Vec<_> = client.calls().into_iter().filter(|call| call.is_follow_up()).collect();
    assert_eq!(follow_ups.len(), 1);
    assert!(follow_ups[0].prompt.contains("'hello'"));

    assert_eq!(chat.click_suggestion(1)?, "What is the top category?");
    let outcome = chat
        .submit(&assistant, Some("search refund"))
        .expect("clicked suggestion is processed");
    assert_eq!(outcome.query, "What is the top category?");
    assert_eq!(outcome.routed.intent, ChatIntent::TopCategory);

    // The click is consumed; typed text applies again.
    let outcome = chat.submit(&assistant, Some("search refund")).unwrap();
    assert_eq!(outcome.routed.intent, ChatIntent::Search);
    Ok(())
}

#[test]
fn click_out_of_range_is_rejected() {
    let client = StubClient::answering("unused");
    let assistant = assistant(&client, settings(15));
    let mut chat = session();
    assert!(chat.click_suggestion(0).is_err());
    assert!(chat.submit(&assistant, None).is_none());
    assert!(chat.history().is_empty());
}

#[test]
fn history_is_append_only_and_alternates_roles() {
    let client = StubClient::answering("An answer.");
    let assistant = assistant(&client, settings(15));
    let mut chat = session();

    chat.handle_message(&assistant, "hi");
    let first_turn = chat.history()[0].clone();
    chat.handle_message(&assistant, "search signal");
    chat.handle_message(&assistant, "what is going on?");

    let history = chat.history();
    assert_eq!(history.len(), 6);
    assert_eq!(history[0].turn_id, first_turn.turn_id);
    assert_eq!(history[0].content, "hi");
    for (index, turn) in history.iter().enumerate() {
        let expected = if index % 2 == 0 {
            ChatRole::User
        } else {
            ChatRole::Assistant
        };
        assert_eq!(turn.role, expected, "turn {index} has the wrong role");
    }
    assert_eq!(history[5].content, "An answer.");
}

#[test]
fn sessions_sharing_an_assistant_stay_isolated() {
    let client = StubClient::answering("unused");
    let assistant = assistant(&client, settings(15));
    let mut first = session();
    let mut second = session();

    first.handle_message(&assistant, "top city");
    first.handle_message(&assistant, "top category");
    second.handle_message(&assistant, "average engagement");

    assert_eq!(first.history().len(), 4);
    assert_eq!(second.history().len(), 2);
    assert_ne!(first.session_id(), second.session_id());
    assert_eq!(second.history()[0].content, "average engagement");
}

#[test]
fn chat_searches_every_row_including_promotional_ones() {
    let export = Dataset::from_json_str(
        r#"[
            {"extract": "My router order never arrived", "city.name": "Durban"},
            {"extract": "Order placed in May, still waiting", "city.name": "Durban"},
            {"extract": "No signal again tonight", "city.name": "Pretoria"}
        ]"#,
    )
    .unwrap();
    let views = DatasetViews::new(export, true);
    assert!(views.comments.search("order").is_empty());

    let client = StubClient::answering("unused");
    let assistant = Assistant::new(views.all.clone(), client.clone(), settings(15));
    let outcome = session().handle_message(&assistant, "search order").unwrap();
    match &outcome.response.payload {
        ResponsePayload::Search { matches, .. } => assert_eq!(matches.len(), 2),
        other => panic!("expected search payload, got {other:?}"),
    }
    let outcome = session().handle_message(&assistant, "top city").unwrap();
    assert_eq!(
        outcome.response.payload,
        ResponsePayload::TopCity {
            city: "Durban".into(),
            count: 2,
        }
    );
}
