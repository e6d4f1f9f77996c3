use crate::api::ChatBackend;
use crate::capabilities::CapabilityRegistry;
use crate::config::Config;
use crate::controller::ConversationController;
use crate::error::Result;
use crate::notifier::PresentationNotifier;
use colored::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use uuid::Uuid;

#[derive(Deserialize)]
struct ClientRequest {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct ClientReply {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

/// Accepts UI-client connections and runs one independent conversation
/// session per connection. Sessions share nothing but the read-only
/// capability registry.
pub struct AgentServer {
    config: Config,
    backend: Arc<dyn ChatBackend>,
    registry: Arc<CapabilityRegistry>,
    notifier: Arc<PresentationNotifier>,
}

impl AgentServer {
    pub fn new(
        config: Config,
        backend: Arc<dyn ChatBackend>,
        registry: Arc<CapabilityRegistry>,
        notifier: Arc<PresentationNotifier>,
    ) -> Self {
        Self {
            config,
            backend,
            registry,
            notifier,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(("127.0.0.1", self.config.listen_port)).await?;
        println!(
            "{}",
            format!("[server] listening on 127.0.0.1:{}", self.config.listen_port).green()
        );

        loop {
            let (stream, addr) = listener.accept().await?;
            println!("{}", format!("[server] client connected: {}", addr).green());

            let backend = self.backend.clone();
            let registry = self.registry.clone();
            let notifier = self.notifier.clone();
            let config = self.config.clone();
            tokio::spawn(async move {
                handle_connection(stream, backend, registry, notifier, &config).await;
                println!("{}", format!("[server] client disconnected: {}", addr).dimmed());
            });
        }
    }
}

/// One session: a fresh controller with its own system-prompt-seeded
/// conversation, fed newline-delimited JSON requests until the connection
/// closes. Malformed input is logged and skipped; the connection stays
/// open. Dropping the controller cancels the session's pending timers.
async fn handle_connection(
    stream: TcpStream,
    backend: Arc<dyn ChatBackend>,
    registry: Arc<CapabilityRegistry>,
    notifier: Arc<PresentationNotifier>,
    config: &Config,
) {
    let session_id = Uuid::new_v4();
    let mut controller = ConversationController::new(
        backend,
        registry,
        notifier,
        config.max_iterations,
        config.shell_timeout,
        config.verbose,
    );

    if config.verbose {
        eprintln!("{}", format!("[server] session {} started", session_id).dimmed());
    }

    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("[server] session {} read error: {}", session_id, e).red()
                );
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: ClientRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("[server] session {} invalid JSON: {}", session_id, e).yellow()
                );
                continue;
            }
        };

        if request.kind != "user_input" || request.text.is_empty() {
            eprintln!(
                "{}",
                format!(
                    "[server] session {} unexpected message type: {}",
                    session_id, request.kind
                )
                .yellow()
            );
            continue;
        }

        println!("{}", format!("[server] user input: {}", request.text).cyan());
        let text = controller.handle(&request.text).await;

        let reply = ClientReply {
            kind: "ai_response",
            text,
        };
        let mut payload = match serde_json::to_string(&reply) {
            Ok(payload) => payload,
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("[server] session {} encode error: {}", session_id, e).red()
                );
                continue;
            }
        };
        payload.push('\n');

        if writer.write_all(payload.as_bytes()).await.is_err() {
            break;
        }
    }
}
