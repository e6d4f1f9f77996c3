use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "deskmate")]
#[command(about = "Desktop companion AI agent server", long_about = None)]
pub struct Args {
    #[arg(long = "port", help = "Port for the agent socket server")]
    pub port: Option<u16>,

    #[arg(
        long = "presentation-port",
        help = "Port of the local presentation process"
    )]
    pub presentation_port: Option<u16>,

    #[arg(
        long = "api-endpoint",
        help = "Custom chat-completions endpoint URL"
    )]
    pub api_endpoint: Option<String>,

    #[arg(long = "model", help = "Model identifier sent to the backend")]
    pub model: Option<String>,

    #[arg(
        long = "max-iterations",
        help = "Hard ceiling on model round-trips per user turn"
    )]
    pub max_iterations: Option<u32>,

    #[arg(
        long = "console",
        help = "Also read user input from stdin alongside the socket server"
    )]
    pub console: bool,

    #[arg(short = 'v', long = "verbose", help = "Enable diagnostic output")]
    pub verbose: bool,
}
