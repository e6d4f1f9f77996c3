use deskmate::api::ChatBackend;
use deskmate::capabilities::CapabilityRegistry;
use deskmate::controller::ConversationController;
use deskmate::error::{DeskmateError, Result};
use deskmate::models::{Message, StructuredReply};
use deskmate::notifier::PresentationNotifier;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// Deterministic model backend: hands out scripted replies in order and
/// fails once the script runs out.
struct StubBackend {
    replies: Mutex<VecDeque<String>>,
}

impl StubBackend {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
        })
    }

    fn refill(&self, replies: &[&str]) {
        let mut queue = self.replies.lock().unwrap();
        queue.clear();
        queue.extend(replies.iter().map(|s| s.to_string()));
    }
}

impl ChatBackend for StubBackend {
    fn complete<'a>(
        &'a self,
        _messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        let next = self.replies.lock().unwrap().pop_front();
        Box::pin(async move {
            next.ok_or_else(|| DeskmateError::Other("stub backend exhausted".to_string()))
        })
    }
}

fn test_controller(backend: Arc<dyn ChatBackend>, max_iterations: u32) -> ConversationController {
    let registry = Arc::new(CapabilityRegistry::new());
    // Unused port; notification failures are swallowed by design.
    let notifier = Arc::new(PresentationNotifier::new(59999, false));
    ConversationController::new(backend, registry, notifier, max_iterations, 30, false)
}

const TOOL_CALL_CALC: &str = r#"{"thinking":"t","action":"tool_call","tool_calls":[{"function":{"name":"calc","arguments":{"expression":"2+2"}}}]}"#;
const FINAL_FOUR: &str = r#"{"thinking":"t2","action":"final_response","response":"4"}"#;

#[tokio::test]
async fn tool_call_then_final_answer() {
    let backend = StubBackend::new(&[TOOL_CALL_CALC, FINAL_FOUR]);
    let mut controller = test_controller(backend, 10);

    let answer = controller.handle("what is 2+2").await;
    assert_eq!(answer, "4");

    // system + user + tool-result summary + terminal assistant message
    let messages = controller.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, "system");
    assert_eq!(messages[1].role, "user");
    assert_eq!(messages[1].content, "what is 2+2");
    assert_eq!(messages[2].role, "user");
    assert!(messages[2].content.contains("Tool results: calculate: 2+2 = 4"));
    assert_eq!(messages[3].role, "assistant");

    let reply: StructuredReply = serde_json::from_str(&messages[3].content).unwrap();
    assert_eq!(reply.action, "final_response");
    assert_eq!(reply.response.as_deref(), Some("4"));
}

#[tokio::test]
async fn malformed_reply_triggers_one_correction_then_succeeds() {
    let backend = StubBackend::new(&["I think the answer is 4!", FINAL_FOUR]);
    let mut controller = test_controller(backend, 10);

    let answer = controller.handle("what is 2+2").await;
    assert_eq!(answer, "4");

    let messages = controller.messages();
    let corrective: Vec<&Message> = messages
        .iter()
        .filter(|m| m.role == "user" && m.content.contains("single JSON object"))
        .collect();
    assert_eq!(corrective.len(), 1);
    assert_eq!(messages.len(), 4);
}

#[tokio::test]
async fn iteration_ceiling_gives_up() {
    let backend = StubBackend::new(&["garbage", "garbage", "garbage", "garbage", "garbage"]);
    let mut controller = test_controller(backend.clone(), 3);

    let answer = controller.handle("do something").await;
    assert!(answer.contains("within 3 iterations"));

    // Exactly the ceiling's worth of model calls were made.
    assert_eq!(backend.replies.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn transport_error_terminates_the_turn() {
    let backend = StubBackend::new(&[]);
    let mut controller = test_controller(backend, 10);

    let answer = controller.handle("hello").await;
    assert!(answer.contains("Model backend error"));
}

#[tokio::test]
async fn invariant_violation_is_terminal() {
    let backend = StubBackend::new(&[r#"{"thinking":"t","action":"final_response"}"#]);
    let mut controller = test_controller(backend, 10);

    let answer = controller.handle("hello").await;
    assert!(answer.contains("Malformed model reply"));
    assert!(answer.contains("response"));
}

#[tokio::test]
async fn reset_and_replay_is_deterministic() {
    let backend = StubBackend::new(&[TOOL_CALL_CALC, FINAL_FOUR]);
    let mut controller = test_controller(backend.clone(), 10);

    let first_answer = controller.handle("what is 2+2").await;
    let first_log: Vec<(String, String)> = controller
        .messages()
        .iter()
        .map(|m| (m.role.clone(), m.content.clone()))
        .collect();

    controller.reset();
    assert_eq!(controller.messages().len(), 1);
    backend.refill(&[TOOL_CALL_CALC, FINAL_FOUR]);

    let second_answer = controller.handle("what is 2+2").await;
    let second_log: Vec<(String, String)> = controller
        .messages()
        .iter()
        .map(|m| (m.role.clone(), m.content.clone()))
        .collect();

    assert_eq!(first_answer, second_answer);
    assert_eq!(first_log, second_log);
}

#[tokio::test]
async fn unknown_tool_is_fed_back_not_fatal() {
    let tool_call =
        r#"{"thinking":"t","action":"tool_call","tool_calls":[{"function":{"name":"frobnicate","arguments":{}}}]}"#;
    let backend = StubBackend::new(&[tool_call, FINAL_FOUR]);
    let mut controller = test_controller(backend, 10);

    let answer = controller.handle("frob it").await;
    assert_eq!(answer, "4");

    let summary = &controller.messages()[2];
    assert!(summary.content.contains("unknown tool 'frobnicate'"));
}
