use super::SessionContext;
use serde_json::Value;
use std::fs;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

const COMMAND_TIMEOUT_SECS: u64 = 10;
const MAX_PROCESS_ROWS: usize = 15;

pub fn handle_get_memory_info(_args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let meminfo = fs::read_to_string("/proc/meminfo")
        .map_err(|e| format!("memory info unavailable: {}", e))?;

    let wanted = ["MemTotal", "MemFree", "MemAvailable", "SwapTotal", "SwapFree"];
    let lines: Vec<String> = meminfo
        .lines()
        .filter(|line| wanted.iter().any(|key| line.starts_with(key)))
        .map(render_meminfo_line)
        .collect();

    if lines.is_empty() {
        return Err("memory info unavailable: unexpected /proc/meminfo format".to_string());
    }
    Ok(lines.join("\n"))
}

fn render_meminfo_line(line: &str) -> String {
    // "MemTotal:       16303528 kB"
    let mut parts = line.split_whitespace();
    let key = parts.next().unwrap_or("").trim_end_matches(':');
    let kb: f64 = parts.next().and_then(|v| v.parse().ok()).unwrap_or(0.0);
    format!("{}: {:.1} MB", key, kb / 1024.0)
}

pub fn handle_get_cpu_info(_args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let cpuinfo = fs::read_to_string("/proc/cpuinfo")
        .map_err(|e| format!("cpu info unavailable: {}", e))?;

    let model = cpuinfo
        .lines()
        .find(|line| line.starts_with("model name"))
        .and_then(|line| line.split(':').nth(1))
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let cores = cpuinfo
        .lines()
        .filter(|line| line.starts_with("processor"))
        .count();
    let loadavg = fs::read_to_string("/proc/loadavg")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    Ok(format!(
        "model: {}\ncores: {}\nload average: {}",
        model, cores, loadavg
    ))
}

pub fn handle_get_network_info(_args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let dev = fs::read_to_string("/proc/net/dev")
        .map_err(|e| format!("network info unavailable: {}", e))?;

    let mut lines = Vec::new();
    for line in dev.lines().skip(2) {
        let Some((iface, rest)) = line.split_once(':') else {
            continue;
        };
        let fields: Vec<&str> = rest.split_whitespace().collect();
        let rx = fields.first().copied().unwrap_or("0");
        let tx = fields.get(8).copied().unwrap_or("0");
        lines.push(format!("{}: rx {} bytes, tx {} bytes", iface.trim(), rx, tx));
    }

    if lines.is_empty() {
        return Err("no network interfaces found".to_string());
    }
    Ok(lines.join("\n"))
}

pub async fn handle_get_disk_usage(_args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    run_monitor_command("df", &["-h"]).await
}

pub async fn handle_get_process_list(
    _args: &Value,
    _ctx: &SessionContext,
) -> Result<String, String> {
    let output =
        run_monitor_command("ps", &["-eo", "pid,comm,pcpu,pmem", "--sort=-pmem"]).await?;
    // header plus the heaviest processes
    let shown: Vec<&str> = output.lines().take(MAX_PROCESS_ROWS + 1).collect();
    Ok(shown.join("\n"))
}

async fn run_monitor_command(program: &str, args: &[&str]) -> Result<String, String> {
    let output = timeout(
        Duration::from_secs(COMMAND_TIMEOUT_SECS),
        Command::new(program).args(args).output(),
    )
    .await
    .map_err(|_| format!("{} timed out after {} seconds", program, COMMAND_TIMEOUT_SECS))?
    .map_err(|e| format!("failed to run {}: {}", program, e))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(format!(
            "{} failed: {}",
            program,
            String::from_utf8_lossy(&output.stderr).trim()
        ))
    }
}
