use crate::models::Message;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct RequestBody {
    pub model: String,
    pub messages: Vec<Message>,
    pub stream: bool,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: Option<AssistantMessage>,
}

#[derive(Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}
