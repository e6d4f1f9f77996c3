use super::paths::{optional_str, require_str};
use super::SessionContext;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::process::Command;
use tokio::time::timeout;

const CONNECTIVITY_PROBE: &str = "8.8.8.8:53";
const CONNECTIVITY_TIMEOUT_SECS: u64 = 3;
const PING_TIMEOUT_SECS: u64 = 10;
const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

pub async fn handle_check_internet_connection(
    _args: &Value,
    _ctx: &SessionContext,
) -> Result<String, String> {
    match timeout(
        Duration::from_secs(CONNECTIVITY_TIMEOUT_SECS),
        TcpStream::connect(CONNECTIVITY_PROBE),
    )
    .await
    {
        Ok(Ok(_)) => Ok("Internet connection is up".to_string()),
        _ => Ok("No internet connection".to_string()),
    }
}

pub async fn handle_ping_host(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let host = require_str(args, "host")?;
    let count = args.get("count").and_then(|v| v.as_u64()).unwrap_or(4);

    let output = timeout(
        Duration::from_secs(PING_TIMEOUT_SECS),
        Command::new("ping")
            .arg("-c")
            .arg(count.to_string())
            .arg(host)
            .output(),
    )
    .await
    .map_err(|_| format!("ping timed out after {} seconds", PING_TIMEOUT_SECS))?
    .map_err(|e| format!("failed to run ping: {}", e))?;

    if output.status.success() {
        Ok(format!(
            "Ping {} succeeded:\n{}",
            host,
            String::from_utf8_lossy(&output.stdout).trim()
        ))
    } else {
        Err(format!(
            "ping {} failed: {}",
            host,
            String::from_utf8_lossy(&output.stderr).trim()
        ))
    }
}

pub async fn handle_download_file(args: &Value, ctx: &SessionContext) -> Result<String, String> {
    let url = require_str(args, "url")?;

    let save_path = match optional_str(args, "save_path") {
        Some(path) => PathBuf::from(path),
        None => {
            let name = url
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty() && !s.contains('?'))
                .unwrap_or("downloaded_file");
            ctx.working_dir().join(name)
        }
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .build()
        .map_err(|e| format!("failed to build HTTP client: {}", e))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("download failed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("download failed: HTTP {}", response.status()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("download failed: {}", e))?;

    tokio::fs::write(&save_path, &bytes)
        .await
        .map_err(|e| format!("failed to save file: {}", e))?;

    Ok(format!(
        "Downloaded {} bytes to {}",
        bytes.len(),
        save_path.display()
    ))
}
