use deskmate::reply::{interpret, Interpretation};

#[test]
fn plain_text_is_malformed() {
    let outcome = interpret("Sure! Let me list that directory for you.");
    match outcome {
        Interpretation::Malformed { correction } => {
            assert!(correction.contains("JSON object"));
        }
        _ => panic!("expected Malformed"),
    }
}

#[test]
fn broken_json_is_malformed() {
    let outcome = interpret("{\"thinking\": \"t\", \"action\": ");
    match outcome {
        Interpretation::Malformed { correction } => {
            assert!(correction.contains("JSON parse error"));
        }
        _ => panic!("expected Malformed"),
    }
}

#[test]
fn tool_call_without_calls_is_invalid() {
    let outcome = interpret(r#"{"thinking":"t","action":"tool_call"}"#);
    match outcome {
        Interpretation::Invalid { defect } => {
            assert!(defect.contains("tool_calls"));
        }
        _ => panic!("expected Invalid"),
    }
}

#[test]
fn tool_call_with_empty_calls_is_invalid() {
    let outcome = interpret(r#"{"thinking":"t","action":"tool_call","tool_calls":[]}"#);
    assert!(matches!(outcome, Interpretation::Invalid { .. }));
}

#[test]
fn final_response_without_response_is_invalid() {
    let outcome = interpret(r#"{"thinking":"t","action":"final_response"}"#);
    match outcome {
        Interpretation::Invalid { defect } => {
            assert!(defect.contains("response"));
        }
        _ => panic!("expected Invalid"),
    }
}

#[test]
fn unknown_action_is_invalid() {
    let outcome = interpret(r#"{"thinking":"t","action":"dance"}"#);
    match outcome {
        Interpretation::Invalid { defect } => {
            assert!(defect.contains("dance"));
        }
        _ => panic!("expected Invalid"),
    }
}

#[test]
fn valid_tool_call_round() {
    let content = r#"{
        "thinking": "need the time",
        "action": "tool_call",
        "tool_calls": [
            { "function": { "name": "get_current_time", "arguments": {} } }
        ]
    }"#;
    match interpret(content) {
        Interpretation::ToolCalls { reply, calls } => {
            assert_eq!(reply.thinking, "need the time");
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].function.name, "get_current_time");
        }
        _ => panic!("expected ToolCalls"),
    }
}

#[test]
fn valid_final_round() {
    let content = r#"{
        "thinking": "done",
        "action": "final_response",
        "response": "All set!",
        "actions": ["blink_eyes"]
    }"#;
    match interpret(content) {
        Interpretation::Final { reply } => {
            assert_eq!(reply.response.as_deref(), Some("All set!"));
            assert_eq!(reply.actions.as_deref(), Some(&["blink_eyes".to_string()][..]));
        }
        _ => panic!("expected Final"),
    }
}

#[test]
fn leading_whitespace_is_tolerated() {
    let content = "  \n  {\"thinking\":\"t\",\"action\":\"final_response\",\"response\":\"ok\"}";
    assert!(matches!(interpret(content), Interpretation::Final { .. }));
}
