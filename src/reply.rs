use crate::models::{StructuredReply, ToolCall, ACTION_FINAL_RESPONSE, ACTION_TOOL_CALL};
use serde_json::Value;

/// Classification of one raw assistant turn.
///
/// `Malformed` is recoverable: the controller appends the corrective
/// instruction and asks again. `Invalid` means the text was a well-formed
/// object that still violates the structured-reply invariant; that is
/// terminal for the turn.
pub enum Interpretation {
    Malformed { correction: String },
    Invalid { defect: String },
    ToolCalls { reply: StructuredReply, calls: Vec<ToolCall> },
    Final { reply: StructuredReply },
}

const STRICT_FORMAT_CORRECTION: &str = "Respond with a single JSON object only, no surrounding \
text. Format: {\"thinking\": \"...\", \"action\": \"tool_call\" | \"final_response\", ...}";

pub fn interpret(content: &str) -> Interpretation {
    let trimmed = content.trim();

    if !trimmed.starts_with('{') {
        return Interpretation::Malformed {
            correction: STRICT_FORMAT_CORRECTION.to_string(),
        };
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(e) => {
            return Interpretation::Malformed {
                correction: format!(
                    "JSON parse error: {}. Return a single valid JSON object. Format: \
                     {{\"thinking\": \"...\", \"action\": \"...\", ...}}",
                    e
                ),
            }
        }
    };

    let reply: StructuredReply = match serde_json::from_value(value) {
        Ok(reply) => reply,
        Err(e) => {
            return Interpretation::Invalid {
                defect: format!("reply fields have the wrong shape: {}", e),
            }
        }
    };

    match reply.action.as_str() {
        ACTION_TOOL_CALL => match reply.tool_calls.clone() {
            Some(calls) if !calls.is_empty() => Interpretation::ToolCalls { reply, calls },
            _ => Interpretation::Invalid {
                defect: "action is \"tool_call\" but tool_calls is missing or empty".to_string(),
            },
        },
        ACTION_FINAL_RESPONSE => {
            if reply.response.is_some() {
                Interpretation::Final { reply }
            } else {
                Interpretation::Invalid {
                    defect: "action is \"final_response\" but response is missing".to_string(),
                }
            }
        }
        other => Interpretation::Invalid {
            defect: format!("missing or unknown action: {:?}", other),
        },
    }
}
