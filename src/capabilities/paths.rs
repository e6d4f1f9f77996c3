use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Argument keys that carry filesystem paths and get normalized before
/// dispatch.
pub fn is_path_key(key: &str) -> bool {
    key.contains("path") || key.contains("dir") || key.contains("file")
}

/// Resolve a user-provided path to an absolute one: expand a leading `~`
/// against the home directory, otherwise resolve relative paths against the
/// session working directory. Purely lexical; the target may not exist yet.
pub fn normalize_path(raw: &str, working_dir: &Path) -> PathBuf {
    if let Some(rest) = raw.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            let rest = rest.trim_start_matches('/');
            return if rest.is_empty() {
                home
            } else {
                home.join(rest)
            };
        }
    }

    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        working_dir.join(path)
    }
}

/// Rewrite every path-like string argument in place to its normalized
/// absolute form. Non-string values are left untouched.
pub fn normalize_arguments(arguments: &mut Map<String, Value>, working_dir: &Path) {
    for (key, value) in arguments.iter_mut() {
        if !is_path_key(key) {
            continue;
        }
        if let Value::String(raw) = value {
            let normalized = normalize_path(raw, working_dir);
            *value = Value::String(normalized.to_string_lossy().into_owned());
        }
    }
}

/// Fetch a required string argument, with the uniform error text handlers
/// return for missing inputs.
pub fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("Missing required argument: {}", key))
}

pub fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}
