use super::paths::require_str;
use super::SessionContext;
use serde_json::Value;
use std::path::PathBuf;

pub fn handle_get_current_directory(
    _args: &Value,
    ctx: &SessionContext,
) -> Result<String, String> {
    Ok(format!(
        "Current working directory: {}",
        ctx.working_dir().display()
    ))
}

/// Changes the session working directory, not the process one. Concurrent
/// sessions each keep their own.
pub fn handle_change_directory(args: &Value, ctx: &SessionContext) -> Result<String, String> {
    let directory_path = require_str(args, "directory_path")?;
    let path = PathBuf::from(directory_path);

    if !path.exists() {
        return Err(format!("directory not found: {}", directory_path));
    }
    if !path.is_dir() {
        return Err(format!("path is not a directory: {}", directory_path));
    }

    ctx.set_working_dir(path);
    Ok(format!(
        "Working directory changed to: {}",
        ctx.working_dir().display()
    ))
}

pub fn handle_get_system_info(_args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let hostname = std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    Ok(format!(
        "os: {}\nfamily: {}\narch: {}\nhostname: {}\nuser: {}",
        std::env::consts::OS,
        std::env::consts::FAMILY,
        std::env::consts::ARCH,
        hostname,
        user
    ))
}

pub fn handle_get_current_time(_args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    Ok(format!(
        "Current time: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ))
}
