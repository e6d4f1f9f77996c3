use crate::api::ChatBackend;
use crate::capabilities::{canonical_name, CapabilityRegistry, SessionContext};
use crate::models::{Message, ToolResult};
use crate::notifier::PresentationNotifier;
use crate::prompt::build_system_prompt;
use crate::reply::{interpret, Interpretation};
use colored::*;
use std::sync::Arc;

/// Escalating efficiency warnings start at this iteration. Non-functional;
/// only surfaced on the server console.
const WARN_ITERATION: u32 = 3;
const EFFICIENCY_HINT: &str =
    " Hint: try to finish everything in your next thinking round to keep the iteration count low.";

/// Drives one conversation: append the user turn, then query the model,
/// interpret its structured reply and either dispatch tools and loop or
/// finalize. One controller per session; never shared.
pub struct ConversationController {
    backend: Arc<dyn ChatBackend>,
    registry: Arc<CapabilityRegistry>,
    notifier: Arc<PresentationNotifier>,
    session: SessionContext,
    messages: Vec<Message>,
    max_iterations: u32,
    verbose: bool,
}

impl ConversationController {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        registry: Arc<CapabilityRegistry>,
        notifier: Arc<PresentationNotifier>,
        max_iterations: u32,
        shell_timeout: u64,
        verbose: bool,
    ) -> Self {
        let system_prompt = build_system_prompt(&registry);
        Self {
            backend,
            registry,
            notifier,
            session: SessionContext::new(shell_timeout, verbose),
            messages: vec![Message::system(system_prompt)],
            max_iterations,
            verbose,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Truncate the conversation back to the system message. The only
    /// permitted reset; everything else is append-only.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    /// Process one user turn. Always returns a final answer text; internal
    /// failures become the text of that answer, never an error.
    pub async fn handle(&mut self, user_text: &str) -> String {
        // New input supersedes whatever the presentation layer is still saying.
        self.notifier.interrupt().await;
        self.messages.push(Message::user(user_text));

        let mut iteration: u32 = 0;
        loop {
            iteration += 1;
            if iteration > self.max_iterations {
                return self.fail(format!(
                    "Could not complete the task within {} iterations, giving up.",
                    self.max_iterations
                ));
            }
            if iteration >= WARN_ITERATION {
                eprintln!(
                    "{}",
                    format!(
                        "[ai] iteration {} of {}, consider simplifying the request",
                        iteration, self.max_iterations
                    )
                    .yellow()
                );
            }

            let content = match self.backend.complete(&self.messages).await {
                Ok(content) => content,
                Err(e) => return self.fail(format!("Model backend error: {}", e)),
            };

            match interpret(&content) {
                Interpretation::Malformed { correction } => {
                    if self.verbose {
                        eprintln!(
                            "{}",
                            format!("[ai] malformed reply on iteration {}, correcting", iteration)
                                .dimmed()
                        );
                    }
                    self.messages.push(Message::user(correction));
                }
                Interpretation::Invalid { defect } => {
                    return self.fail(format!("Malformed model reply: {}", defect));
                }
                Interpretation::ToolCalls { reply, calls } => {
                    println!(
                        "{}",
                        format!("[ai] thinking ({}): {}", iteration, reply.thinking).cyan()
                    );

                    let mut results = Vec::with_capacity(calls.len());
                    for call in &calls {
                        let name = canonical_name(&call.function.name);
                        println!("{}", format!("[tools] calling {}...", name).cyan());
                        let result = self
                            .registry
                            .dispatch(&call.function.name, &call.function.arguments, &self.session)
                            .await;
                        if self.verbose {
                            eprintln!("{}", format!("[tools] {} -> {}", name, result).dimmed());
                        }
                        results.push(ToolResult { tool: name, result });
                    }

                    let mut summary =
                        format!("Tool results: {}.", ToolResult::summarize(&results));
                    if iteration >= 2 {
                        summary.push_str(EFFICIENCY_HINT);
                    }
                    summary.push_str(" Generate the final reply based on these results.");
                    self.messages.push(Message::user(summary));
                }
                Interpretation::Final { reply } => {
                    let text = reply.response.clone().unwrap_or_default();
                    // Keep the full structured reply in the log so the model
                    // sees its own prior turns in later exchanges.
                    let encoded =
                        serde_json::to_string(&reply).unwrap_or_else(|_| text.clone());
                    self.messages.push(Message::assistant(encoded));
                    self.notifier.notify(&text, reply.actions.clone()).await;
                    return text;
                }
            }
        }
    }

    /// Terminal failure for the turn: the message becomes the final answer
    /// text sent back to the client.
    fn fail(&self, message: String) -> String {
        eprintln!("{}", format!("[ai] {}", message).red());
        message
    }
}
