//! Integration tests for PlanExec
//!
//! These tests verify end-to-end behavior of the assembled service with a
//! scripted mock LLM - the plan/execute/replan round trip, the tool
//! protocol against the airline backend, and checkpoint durability.

use std::sync::Arc;

use planexec::checkpoint::CheckpointManager;
use planexec::llm::client::mock::MockLlmClient;
use planexec::service::PlanExecuteService;
use planexec::{AirlineHandle, ChatRequest, Config, ConversationState};
use tempfile::TempDir;

fn plan_response(steps: &[&str]) -> planexec::CompletionResponse {
    MockLlmClient::tool_call_response("submit_plan", serde_json::json!({ "steps": steps }))
}

fn respond_action(text: &str) -> planexec::CompletionResponse {
    MockLlmClient::tool_call_response(
        "submit_action",
        serde_json::json!({"action": {"type": "response", "response": text}}),
    )
}

// =============================================================================
// Chat round trips
// =============================================================================

#[tokio::test]
async fn test_chat_round_trip_with_booking_tool() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let checkpoints = CheckpointManager::spawn(temp.path()).expect("Failed to spawn checkpoints");
    let airline = AirlineHandle::spawn();

    // plan -> execute (book via tool, then summarize) -> replan (respond)
    let script = vec![
        plan_response(&["Book flight DA123 for Adam"]),
        MockLlmClient::tool_call_response(
            "book_itinerary",
            serde_json::json!({"user_name": "Adam", "flight_id": "DA123"}),
        ),
        MockLlmClient::text_response("Booked DA123 for Adam."),
        respond_action("Your flight DA123 is booked."),
    ];

    let service = PlanExecuteService::new(
        Arc::new(MockLlmClient::new(script)),
        airline.clone(),
        checkpoints.clone(),
        &Config::default(),
    );

    let response = service
        .chat(&ChatRequest::new("Book me on DA123, I'm Adam", "booking"))
        .await
        .expect("chat should succeed");
    assert_eq!(response.response, "Your flight DA123 is booked.");

    // The tool call really hit the backend
    assert_eq!(airline.itinerary_count().await.unwrap(), 1);

    // And the checkpoint recorded the full transition history
    let state = checkpoints.load("booking").await.unwrap();
    assert_eq!(state.past_steps.len(), 1);
    assert_eq!(state.past_steps[0].step, "Book flight DA123 for Adam");
    assert_eq!(state.past_steps[0].result, "Booked DA123 for Adam.");
    assert!(state.plan.is_empty());
}

#[tokio::test]
async fn test_multi_turn_follow_up_on_one_thread() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let checkpoints = CheckpointManager::spawn(temp.path()).unwrap();

    let script = vec![
        // Turn 1
        plan_response(&["Compute 2+2"]),
        MockLlmClient::text_response("4"),
        respond_action("The answer is 4."),
        // Turn 2
        plan_response(&["Double the previous answer"]),
        MockLlmClient::text_response("8"),
        respond_action("Doubled, that is 8."),
    ];

    let service = PlanExecuteService::new(
        Arc::new(MockLlmClient::new(script)),
        AirlineHandle::spawn(),
        checkpoints.clone(),
        &Config::default(),
    );

    let first = service.chat(&ChatRequest::new("What is 2+2?", "math")).await.unwrap();
    assert_eq!(first.response, "The answer is 4.");

    let second = service.chat(&ChatRequest::new("Now double it", "math")).await.unwrap();
    assert_eq!(second.response, "Doubled, that is 8.");

    // One thread, both turns' steps in execution order
    let state = checkpoints.load("math").await.unwrap();
    assert_eq!(state.input, "Now double it");
    assert_eq!(state.past_steps.len(), 2);
    assert_eq!(state.past_steps[0].result, "4");
    assert_eq!(state.past_steps[1].result, "8");
}

#[tokio::test]
async fn test_concurrent_threads_share_one_checkpoint_store() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let checkpoints = CheckpointManager::spawn(temp.path()).unwrap();
    let airline = AirlineHandle::spawn();

    let service_a = PlanExecuteService::new(
        Arc::new(MockLlmClient::new(vec![
            plan_response(&["task a"]),
            MockLlmClient::text_response("a done"),
            respond_action("A finished."),
        ])),
        airline.clone(),
        checkpoints.clone(),
        &Config::default(),
    );
    let service_b = PlanExecuteService::new(
        Arc::new(MockLlmClient::new(vec![
            plan_response(&["task b"]),
            MockLlmClient::text_response("b done"),
            respond_action("B finished."),
        ])),
        airline,
        checkpoints.clone(),
        &Config::default(),
    );

    let req_a = ChatRequest::new("do a", "thread-a");
    let req_b = ChatRequest::new("do b", "thread-b");
    let (ra, rb) = tokio::join!(
        service_a.chat(&req_a),
        service_b.chat(&req_b),
    );
    assert_eq!(ra.unwrap().response, "A finished.");
    assert_eq!(rb.unwrap().response, "B finished.");

    let threads = checkpoints.list().await.unwrap();
    assert_eq!(threads, vec!["thread-a".to_string(), "thread-b".to_string()]);
}

// =============================================================================
// Checkpoint durability
// =============================================================================

#[tokio::test]
async fn test_checkpoints_survive_restart() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    let state = ConversationState {
        input: "remember me".to_string(),
        plan: vec![],
        past_steps: vec![planexec::PastStep::new("step", "result")],
        response: Some("done".to_string()),
    };

    {
        let manager = CheckpointManager::spawn(temp.path()).unwrap();
        manager.save("durable", &state).await.unwrap();
    }

    // A new manager over the same directory sees the same state
    let manager = CheckpointManager::spawn(temp.path()).unwrap();
    let loaded = manager.load("durable").await.unwrap();
    assert_eq!(loaded, state);

    // Reads without an intervening save are identical
    let again = manager.load("durable").await.unwrap();
    assert_eq!(again, loaded);
}

// =============================================================================
// Airline tool protocol
// =============================================================================

#[tokio::test]
async fn test_booking_lifecycle_through_the_tool_registry() {
    use planexec::llm::ToolCall;
    use planexec::{SearchConfig, ToolContext, ToolRegistry};

    let registry = ToolRegistry::standard();
    let airline = AirlineHandle::spawn();
    let ctx = ToolContext::new(airline.clone(), SearchConfig::default());

    let call = |name: &str, input: serde_json::Value| ToolCall {
        id: format!("call_{}", name),
        name: name.to_string(),
        input,
    };

    // Book: fresh confirmation code
    let booked = registry
        .invoke(
            &call("book_itinerary", serde_json::json!({"user_name": "Adam", "flight_id": "DA123"})),
            &ctx,
        )
        .await
        .unwrap();
    assert!(!booked.is_error);
    let itinerary: serde_json::Value = serde_json::from_str(&booked.content).unwrap();
    let code = itinerary["confirmation_number"].as_str().unwrap().to_string();

    // A second booking never reuses the code
    let second = registry
        .invoke(
            &call("book_itinerary", serde_json::json!({"user_name": "Bob", "flight_id": "DA123"})),
            &ctx,
        )
        .await
        .unwrap();
    let second_itinerary: serde_json::Value = serde_json::from_str(&second.content).unwrap();
    assert_ne!(second_itinerary["confirmation_number"].as_str().unwrap(), code);

    // Cancel removes it from the store
    let cancelled = registry
        .invoke(
            &call("modify_itinerary", serde_json::json!({"confirmation_number": code, "cancel": true})),
            &ctx,
        )
        .await
        .unwrap();
    assert!(cancelled.content.contains("has been cancelled"));

    // Fetching the cancelled code reports not found
    let fetched = registry
        .invoke(
            &call("fetch_itinerary", serde_json::json!({"confirmation_number": code})),
            &ctx,
        )
        .await
        .unwrap();
    assert!(fetched.content.contains("not found"));

    assert_eq!(airline.itinerary_count().await.unwrap(), 1);
}
