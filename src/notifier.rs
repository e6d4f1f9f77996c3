use colored::*;
use serde_json::json;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

const NOTIFY_TIMEOUT_SECS: u64 = 2;
const MAX_TAGS: usize = 3;

/// Fire-and-forget push channel to the local presentation process. Every
/// failure is swallowed: the presentation layer is optional and must never
/// stall or fail a conversation.
pub struct PresentationNotifier {
    addr: String,
    verbose: bool,
}

impl PresentationNotifier {
    pub fn new(port: u16, verbose: bool) -> Self {
        Self {
            addr: format!("127.0.0.1:{}", port),
            verbose,
        }
    }

    /// Push the final answer and its behavior tags. When the model supplied
    /// no tags, derive a small set from the text.
    pub async fn notify(&self, text: &str, actions: Option<Vec<String>>) {
        let actions = match actions {
            Some(actions) if !actions.is_empty() => actions,
            _ => derive_actions(text),
        };
        let message = json!({
            "type": "speak_and_action",
            "text": text,
            "actions": actions,
        });
        self.send(&message.to_string()).await;
    }

    /// Ask the presentation process to stop speaking.
    pub async fn interrupt(&self) {
        self.send(&json!({ "type": "stop" }).to_string()).await;
    }

    async fn send(&self, payload: &str) {
        let result = timeout(Duration::from_secs(NOTIFY_TIMEOUT_SECS), async {
            let mut stream = TcpStream::connect(&self.addr).await?;
            stream.write_all(payload.as_bytes()).await?;
            stream.shutdown().await
        })
        .await;

        if self.verbose {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => eprintln!(
                    "{}",
                    format!("[notify] presentation push failed: {}", e).dimmed()
                ),
                Err(_) => eprintln!("{}", "[notify] presentation push timed out".dimmed()),
            }
        }
    }
}

/// Keyword/emoji heuristics mapping answer text to presentation behavior
/// tags. At most three tags; a neutral idle set when nothing matches.
pub fn derive_actions(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut actions: Vec<&str> = Vec::new();

    let contains_any =
        |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if contains_any(&["happy", "glad", "great", "haha", "yay", "😊", "😄"]) {
        actions.extend(["blink_eyes", "cheek_blush"]);
    } else if contains_any(&["wow", "surprising", "amazing", "😲", "🤯"]) {
        actions.extend(["head_tilt", "blink_eyes"]);
    } else if contains_any(&["good luck", "you can do it", "keep going", "💪", "✨"]) {
        actions.extend(["magic_heart", "light_effects"]);
    } else if contains_any(&["magic", "spell", "🌟", "💫"]) {
        actions.extend(["magic_ink", "smoke_effects"]);
    } else if contains_any(&["thinking", "let me think", "hmm", "🤔", "💭"]) {
        actions.extend(["head_tilt", "eye_movement"]);
    } else if contains_any(&["?", "what", "why", "🤨"]) {
        actions.extend(["head_tilt", "brow_movement"]);
    } else if contains_any(&["hello", "hi ", "welcome", "👋"]) {
        actions.extend(["blink_eyes", "arm_movement"]);
    } else if contains_any(&["goodbye", "bye", "good night", "see you", "😴"]) {
        actions.extend(["blink_eyes", "head_tilt"]);
    }

    if text.chars().count() > 20 {
        actions.push("mouth_speak");
    }

    if actions.is_empty() {
        actions.extend(["blink_eyes", "breathing"]);
    }

    let mut deduped: Vec<String> = Vec::new();
    for action in actions {
        if !deduped.iter().any(|a| a == action) {
            deduped.push(action.to_string());
        }
        if deduped.len() == MAX_TAGS {
            break;
        }
    }
    deduped
}
