use super::paths::require_str;
use super::SessionContext;
use colored::*;
use serde_json::Value;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Substring denylist for shelled-out commands. A blocklist, not a sandbox:
/// it catches the obvious destructive commands and shell metacharacters and
/// nothing more.
const DENYLIST: &[&str] = &[
    "rm -rf", "mkfs", "dd ", "chmod 777", "sudo", "passwd", "format", "fdisk", "shutdown",
    "reboot", "init ", "> /dev/", ">> /dev/", "&", "|", ";", "`", "$(",
];

pub fn is_denied(command: &str) -> bool {
    DENYLIST.iter().any(|pattern| command.contains(pattern))
}

pub async fn handle_execute_command(args: &Value, ctx: &SessionContext) -> Result<String, String> {
    let command = require_str(args, "command")?;

    if is_denied(command) {
        return Err("command refused for safety reasons".to_string());
    }

    if ctx.verbose {
        eprintln!(
            "{}",
            format!(
                "[tools] run: {} (cwd={}, timeout={}s)",
                command,
                ctx.working_dir().display(),
                ctx.shell_timeout
            )
            .dimmed()
        );
    }

    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).current_dir(ctx.working_dir());

    let output = timeout(Duration::from_secs(ctx.shell_timeout), cmd.output())
        .await
        .map_err(|_| format!("command timed out after {} seconds", ctx.shell_timeout))?
        .map_err(|e| format!("failed to run command: {}", e))?;

    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            Ok("Command succeeded (no output)".to_string())
        } else {
            Ok(stdout)
        }
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(format!("command failed: {}", stderr))
    }
}
