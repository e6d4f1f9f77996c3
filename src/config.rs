use crate::cli::Args;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_API_ENDPOINT: &str = "https://spark-api-open.xf-yun.com/v2/chat/completions";
pub const DEFAULT_MODEL: &str = "x1";
pub const DEFAULT_LISTEN_PORT: u16 = 8888;
pub const DEFAULT_PRESENTATION_PORT: u16 = 12345;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_endpoint: String,
    pub model: String,
    pub listen_port: u16,
    pub presentation_port: u16,
    pub request_timeout: u64,
    pub max_iterations: u32,
    pub shell_timeout: u64,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub request_timeout: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub max_iterations: Option<u32>,
    #[serde(default)]
    pub shell_timeout: Option<u64>,
    #[serde(default)]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub presentation_port: Option<u16>,
}

impl Config {
    /// Layering: CLI args > env vars > YAML config file > defaults.
    /// The API key is only ever taken from the environment.
    pub fn from_env_and_args(args: &Args) -> Result<Self, String> {
        let file_config = FileConfig::load().unwrap_or_default();

        let api_key = env::var("DESKMATE_API_KEY")
            .map_err(|_| "DESKMATE_API_KEY environment variable not set")?;

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env::var("DESKMATE_API_ENDPOINT").ok())
            .or(file_config.api.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| env::var("DESKMATE_MODEL").ok())
            .or(file_config.api.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let listen_port = args
            .port
            .or_else(|| parse_env("DESKMATE_PORT"))
            .or(file_config.server.port)
            .unwrap_or(DEFAULT_LISTEN_PORT);

        let presentation_port = args
            .presentation_port
            .or_else(|| parse_env("DESKMATE_PRESENTATION_PORT"))
            .or(file_config.server.presentation_port)
            .unwrap_or(DEFAULT_PRESENTATION_PORT);

        let request_timeout = parse_env("DESKMATE_REQUEST_TIMEOUT")
            .or(file_config.api.request_timeout)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let max_iterations = args
            .max_iterations
            .or_else(|| parse_env("DESKMATE_MAX_ITERATIONS"))
            .or(file_config.agent.max_iterations)
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_ITERATIONS);

        let shell_timeout = parse_env("DESKMATE_SHELL_TIMEOUT")
            .or(file_config.agent.shell_timeout)
            .unwrap_or(30);

        let verbose = args.verbose
            || env::var("DESKMATE_VERBOSE")
                .ok()
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file_config.agent.verbose)
                .unwrap_or(false);

        Ok(Config {
            api_key,
            api_endpoint,
            model,
            listen_port,
            presentation_port,
            request_timeout,
            max_iterations,
            shell_timeout,
            verbose,
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

impl FileConfig {
    pub fn load() -> anyhow::Result<Self> {
        for path in Self::config_paths() {
            if path.exists() {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                let config: FileConfig = serde_yaml::from_str(&contents).with_context(|| {
                    format!("Failed to parse YAML config file: {}", path.display())
                })?;
                return Ok(config);
            }
        }
        Ok(FileConfig::default())
    }

    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Current directory first (local override)
        paths.push(PathBuf::from(".deskmate.yaml"));
        paths.push(PathBuf::from(".deskmate.yml"));

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("deskmate");
            paths.push(config_dir.join("deskmate.yaml"));
            paths.push(config_dir.join("deskmate.yml"));
        }

        paths
    }
}
