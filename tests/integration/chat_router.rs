use complaintbase::chat::intent_router::ui;
use complaintbase::chat::{Assistant, ChatIntent, IntentRouter, ResponsePayload};
use complaintbase::config::MAX_CONTEXT_SAMPLES;
use complaintbase::dataset::{Column, Dataset};
use std::sync::Arc;

use crate::support::complaints::{assistant, dataset, session, settings};
use crate::support::llm_stub::StubClient;

#[test]
fn greeting_is_answered_without_the_llm() {
    let client = StubClient::answering("unused");
    let assistant = assistant(&client, settings(15));
    let mut chat = session();

    let outcome = chat.handle_message(&assistant, "Hello there").unwrap();
    assert_eq!(outcome.routed.intent, ChatIntent::Greeting);
    assert_eq!(outcome.response.message, ui::GREETING);
    assert!(
        client.answer_calls().is_empty(),
        "Greeting must not reach the completion service: {:?}",
        client.calls()
    );
}

#[test]
fn help_menu_lists_commands() {
    let client = StubClient::answering("unused");
    let assistant = assistant(&client, settings(15));
    let outcome = session()
        .handle_message(&assistant, "what can you do?")
        .unwrap();
    assert_eq!(outcome.routed.intent, ChatIntent::HelpMenu);
    assert_eq!(outcome.response.message, ui::HELP_MENU);
    assert!(client.answer_calls().is_empty());
}

#[test]
fn search_count_matches_independent_count() {
    let client = StubClient::answering("unused");
    let assistant = assistant(&client, settings(15));
    let outcome = session()
        .handle_message(&assistant, "Search Billing")
        .unwrap();

    let expected = dataset()
        .records()
        .iter()
        .filter(|record| {
            record
                .text()
                .map(|text| text.to_lowercase().contains("billing"))
                .unwrap_or(false)
        })
        .count();
    assert_eq!(expected, 2);
    assert_eq!(outcome.routed.argument.as_deref(), Some("billing"));
    assert_eq!(outcome.response.message, ui::search_results("billing", expected));
    match &outcome.response.payload {
        ResponsePayload::Search { keyword, matches } => {
            assert_eq!(keyword, "billing");
            assert_eq!(matches.len(), expected);
        }
        other => panic!("expected search payload, got {other:?}"),
    }
    assert!(client.answer_calls().is_empty());
}

#[test]
fn top_city_and_category_use_column_modes() {
    let client = StubClient::answering("unused");
    let assistant = assistant(&client, settings(15));
    let mut chat = session();

    let (city, count) = dataset().mode(Column::City).unwrap();
    assert_eq!((city.as_str(), count), ("Johannesburg", 3));
    let outcome = chat
        .handle_message(&assistant, "Which area has the most complaints?")
        .unwrap();
    assert_eq!(outcome.routed.intent, ChatIntent::TopCity);
    assert_eq!(outcome.response.message, ui::top_city("Johannesburg", 3));

    let outcome = chat.handle_message(&assistant, "top category").unwrap();
    assert_eq!(outcome.routed.intent, ChatIntent::TopCategory);
    assert_eq!(outcome.response.message, ui::top_category("Complaint"));
}

#[test]
fn average_engagement_is_rounded_to_two_decimals() {
    let client = StubClient::answering("unused");
    let assistant = assistant(&client, settings(15));
    let outcome = session()
        .handle_message(&assistant, "average engagement please")
        .unwrap();
    assert_eq!(outcome.routed.intent, ChatIntent::AverageEngagement);
    assert!(
        outcome.response.message.contains("**5.20**"),
        "Unexpected message: {}",
        outcome.response.message
    );
}

#[test]
fn summary_sends_sampled_complaints() {
    let client = StubClient::answering("Mostly billing and network trouble.");
    let assistant = assistant(&client, settings(4));
    let outcome = session().handle_message(&assistant, "give me a summary").unwrap();

    assert_eq!(outcome.routed.intent, ChatIntent::Summarize);
    assert_eq!(outcome.response.message, "Mostly billing and network trouble.");
    assert_eq!(
        outcome.response.payload,
        ResponsePayload::Sampled { sample_size: 4 }
    );
    let calls = client.answer_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0]
        .prompt
        .starts_with("Summarize the themes in these Telkom complaints:\n"));
    assert_eq!(calls[0].system_message, "You are a Telkom complaints assistant.");
}

#[test]
fn unmatched_question_goes_to_llm_with_literal_query() {
    let client = StubClient::answering("Why did the router cross the road?");
    let assistant = assistant(&client, settings(3));
    let outcome = session().handle_message(&assistant, "tell me a joke").unwrap();

    assert_eq!(outcome.routed.intent, ChatIntent::Fallback);
    assert!(!outcome.response.is_error());
    let calls = client.answer_calls();
    assert_eq!(calls.len(), 1);
    let prompt = &calls[0].prompt;
    assert!(prompt.contains("User asked: 'tell me a joke'."), "{prompt}");
    let bullets = prompt.lines().filter(|line| line.starts_with("- ")).count();
    assert!(bullets <= 3, "sample size exceeded: {prompt}");
    assert_eq!(bullets, 3);
}

#[test]
fn router_table_order_is_first_match_wins() {
    let router = IntentRouter::new();
    let order: Vec<ChatIntent> = router.rules().iter().map(|rule| rule.intent).collect();
    assert_eq!(
        order,
        vec![
            ChatIntent::Greeting,
            ChatIntent::HelpMenu,
            ChatIntent::Search,
            ChatIntent::Summarize,
            ChatIntent::TopCity,
            ChatIntent::TopCategory,
            ChatIntent::AverageEngagement,
        ]
    );
    assert_eq!(router.route("search for a summary").intent, ChatIntent::Search);
    assert_eq!(router.route("history of complaints").intent, ChatIntent::Greeting);
}

#[test]
fn oversized_sample_setting_is_capped() {
    let rows: Vec<String> = (0..40)
        .map(|index| format!(r#"{{"extract": "Complaint number {index} about the network"}}"#))
        .collect();
    let export = Dataset::from_json_str(&rows.join("\n")).unwrap();
    let client = StubClient::answering("Lots of network complaints.");
    let assistant = Assistant::new(Arc::new(export), client.clone(), settings(5000));

    let outcome = session().handle_message(&assistant, "summary").unwrap();
    assert_eq!(
        outcome.response.payload,
        ResponsePayload::Sampled {
            sample_size: MAX_CONTEXT_SAMPLES,
        }
    );
    let prompt = &client.answer_calls()[0].prompt;
    let bullets = prompt.lines().filter(|line| line.starts_with("- ")).count();
    assert_eq!(bullets, MAX_CONTEXT_SAMPLES);
}
