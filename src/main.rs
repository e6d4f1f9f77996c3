use clap::Parser;
use colored::*;
use deskmate::api::{ChatBackend, HttpGateway};
use deskmate::capabilities::CapabilityRegistry;
use deskmate::cli::Args;
use deskmate::config::Config;
use deskmate::controller::ConversationController;
use deskmate::notifier::PresentationNotifier;
use deskmate::server::AgentServer;
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let backend: Arc<dyn ChatBackend> = match HttpGateway::new(&config) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let registry = Arc::new(CapabilityRegistry::new());
    let notifier = Arc::new(PresentationNotifier::new(
        config.presentation_port,
        config.verbose,
    ));

    let server = AgentServer::new(
        config.clone(),
        backend.clone(),
        registry.clone(),
        notifier.clone(),
    );

    if args.console {
        tokio::spawn(async move {
            if let Err(e) = server.run().await {
                eprintln!("{}", format!("[server] {}", e).red());
            }
        });

        run_console(backend, registry, notifier, &config).await;
    } else if let Err(e) = server.run().await {
        eprintln!("{}", format!("[server] {}", e).red());
        process::exit(1);
    }
}

/// Interactive stdin loop alongside the socket server. `exit` leaves,
/// `clear` truncates the conversation back to the system message.
async fn run_console(
    backend: Arc<dyn ChatBackend>,
    registry: Arc<CapabilityRegistry>,
    notifier: Arc<PresentationNotifier>,
    config: &Config,
) {
    let mut controller = ConversationController::new(
        backend,
        registry,
        notifier,
        config.max_iterations,
        config.shell_timeout,
        config.verbose,
    );

    println!("{}", "Deskmate console. Commands: exit, clear.".cyan());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let input = line.trim();
                match input.to_lowercase().as_str() {
                    "" => continue,
                    "exit" | "quit" => {
                        println!("{}", "Deskmate: see you next time!".cyan());
                        break;
                    }
                    "clear" => {
                        controller.reset();
                        println!("{}", "Deskmate: conversation history cleared.".cyan());
                        continue;
                    }
                    _ => {}
                }

                let answer = controller.handle(input).await;
                println!("{} {}", "Deskmate:".cyan(), answer);
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("{}", format!("[console] read error: {}", e).red());
                break;
            }
        }
    }
}
