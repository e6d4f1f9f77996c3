use super::paths::{optional_str, require_str};
use super::SessionContext;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_SEARCH_RESULTS: usize = 20;
const MAX_MATCH_LINES: usize = 10;

pub fn handle_create_file(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let file_path = require_str(args, "file_path")?;
    let content = optional_str(args, "content").unwrap_or("");

    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create parent directory: {}", e))?;
        }
    }

    fs::write(file_path, content).map_err(|e| format!("failed to create file: {}", e))?;
    Ok(format!("File created: {}", file_path))
}

pub fn handle_read_file(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let file_path = require_str(args, "file_path")?;
    let path = Path::new(file_path);

    if !path.exists() {
        return Err(format!("file not found: {}", file_path));
    }
    if !path.is_file() {
        return Err(format!("path is not a file: {}", file_path));
    }

    let content = fs::read_to_string(path).map_err(|e| format!("failed to read file: {}", e))?;
    if content.is_empty() {
        Ok("File is empty".to_string())
    } else {
        Ok(content)
    }
}

pub fn handle_list_directory(args: &Value, ctx: &SessionContext) -> Result<String, String> {
    let directory = match optional_str(args, "directory_path") {
        Some(dir) => PathBuf::from(dir),
        None => ctx.working_dir(),
    };

    if !directory.exists() {
        return Err(format!("directory not found: {}", directory.display()));
    }

    let entries =
        fs::read_dir(&directory).map_err(|e| format!("failed to read directory: {}", e))?;

    let mut lines = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("failed to read directory entry: {}", e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        if path.is_dir() {
            lines.push(format!("[dir]  {}/", name));
        } else {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            lines.push(format!("[file] {} ({} bytes)", name, size));
        }
    }

    if lines.is_empty() {
        return Ok("Directory is empty".to_string());
    }
    lines.sort();
    Ok(lines.join("\n"))
}

pub fn handle_delete_file(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let file_path = require_str(args, "file_path")?;
    let path = Path::new(file_path);

    if !path.exists() {
        return Err(format!("file not found: {}", file_path));
    }
    if !path.is_file() {
        return Err(format!("path is not a file: {}", file_path));
    }

    fs::remove_file(path).map_err(|e| format!("failed to delete file: {}", e))?;
    Ok(format!("File deleted: {}", file_path))
}

pub fn handle_copy_file(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let source = require_str(args, "source_path")?;
    let destination = require_str(args, "destination_path")?;

    if !Path::new(source).is_file() {
        return Err(format!("source is not a file: {}", source));
    }

    fs::copy(source, destination).map_err(|e| format!("failed to copy file: {}", e))?;
    Ok(format!("File copied: {} -> {}", source, destination))
}

pub fn handle_move_file(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let source = require_str(args, "source_path")?;
    let destination = require_str(args, "destination_path")?;

    if !Path::new(source).is_file() {
        return Err(format!("source is not a file: {}", source));
    }

    fs::rename(source, destination).map_err(|e| format!("failed to move file: {}", e))?;
    Ok(format!("File moved: {} -> {}", source, destination))
}

pub fn handle_rename_file(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let old_path = require_str(args, "old_path")?;
    let new_path = require_str(args, "new_path")?;

    if !Path::new(old_path).exists() {
        return Err(format!("file not found: {}", old_path));
    }

    fs::rename(old_path, new_path).map_err(|e| format!("failed to rename file: {}", e))?;
    Ok(format!("File renamed: {} -> {}", old_path, new_path))
}

pub fn handle_file_exists(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let file_path = require_str(args, "file_path")?;
    let exists = Path::new(file_path).is_file();
    Ok(format!(
        "File {}: {}",
        if exists { "exists" } else { "does not exist" },
        file_path
    ))
}

pub fn handle_directory_exists(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let directory_path = require_str(args, "directory_path")?;
    let exists = Path::new(directory_path).is_dir();
    Ok(format!(
        "Directory {}: {}",
        if exists { "exists" } else { "does not exist" },
        directory_path
    ))
}

pub fn handle_get_file_info(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let file_path = require_str(args, "file_path")?;
    let path = Path::new(file_path);

    if !path.exists() {
        return Err(format!("file not found: {}", file_path));
    }

    let metadata = fs::metadata(path).map_err(|e| format!("failed to read metadata: {}", e))?;
    let modified = metadata
        .modified()
        .ok()
        .map(|t| chrono::DateTime::<chrono::Local>::from(t).to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(format!(
        "File info {}:\nsize: {} bytes\nmodified: {}\nis_file: {}\nis_dir: {}",
        file_path,
        metadata.len(),
        modified,
        path.is_file(),
        path.is_dir()
    ))
}

pub fn handle_get_file_size(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let file_path = require_str(args, "file_path")?;
    let path = Path::new(file_path);

    if !path.exists() {
        return Err(format!("file not found: {}", file_path));
    }

    let size = fs::metadata(path)
        .map_err(|e| format!("failed to read metadata: {}", e))?
        .len();
    Ok(format!(
        "File size: {} bytes ({:.2} KB, {:.2} MB)",
        size,
        size as f64 / 1024.0,
        size as f64 / (1024.0 * 1024.0)
    ))
}

pub fn handle_search_files(args: &Value, ctx: &SessionContext) -> Result<String, String> {
    let pattern = require_str(args, "search_pattern")?;
    let search_path = match optional_str(args, "search_path") {
        Some(dir) => PathBuf::from(dir),
        None => ctx.working_dir(),
    };

    if !search_path.exists() {
        return Err(format!("search path not found: {}", search_path.display()));
    }

    let mut matches = Vec::new();
    walk_for_matches(&search_path, pattern, &mut matches);

    if matches.is_empty() {
        return Ok(format!("No files matching: {}", pattern));
    }

    let shown: Vec<String> = matches
        .iter()
        .take(MAX_SEARCH_RESULTS)
        .map(|p| p.display().to_string())
        .collect();
    Ok(format!(
        "Found {} matching files:\n{}",
        matches.len(),
        shown.join("\n")
    ))
}

fn walk_for_matches(dir: &Path, pattern: &str, matches: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk_for_matches(&path, pattern, matches);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if wildcard_match(pattern, name) {
                matches.push(path);
            }
        }
    }
}

/// Shell-style filename matching: `*`, `?` and `[...]` as glob understands
/// them. Patterns come straight from the model, so matching must stay linear;
/// an invalid pattern matches nothing.
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    glob::Pattern::new(pattern)
        .map(|p| p.matches(name))
        .unwrap_or(false)
}

/// Content search across a directory tree, as opposed to
/// `handle_search_in_file` which targets one file.
pub fn handle_search_local_files(args: &Value, ctx: &SessionContext) -> Result<String, String> {
    let search_term = require_str(args, "search_term")?;
    let search_path = match optional_str(args, "search_path") {
        Some(dir) => PathBuf::from(dir),
        None => ctx.working_dir(),
    };

    if !search_path.exists() {
        return Err(format!("search path not found: {}", search_path.display()));
    }

    let needle = search_term.to_lowercase();
    let mut hits = Vec::new();
    walk_for_content(&search_path, &needle, &mut hits);

    if hits.is_empty() {
        return Ok(format!(
            "'{}' not found under {}",
            search_term,
            search_path.display()
        ));
    }

    Ok(format!(
        "Found '{}' in {} files:\n{}",
        search_term,
        hits.len(),
        hits.join("\n")
    ))
}

fn walk_for_content(dir: &Path, needle: &str, hits: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        if hits.len() >= MAX_SEARCH_RESULTS {
            return;
        }
        let path = entry.path();
        if path.is_dir() {
            walk_for_content(&path, needle, hits);
        } else if let Ok(content) = fs::read_to_string(&path) {
            // read_to_string fails on binary files, which is the filter we want
            let count = content
                .lines()
                .filter(|line| line.to_lowercase().contains(needle))
                .count();
            if count > 0 {
                hits.push(format!("{} ({} matching lines)", path.display(), count));
            }
        }
    }
}

pub fn handle_search_in_file(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let file_path = require_str(args, "file_path")?;
    let search_term = require_str(args, "search_term")?;
    let path = Path::new(file_path);

    if !path.exists() {
        return Err(format!("file not found: {}", file_path));
    }

    let content = fs::read_to_string(path).map_err(|e| format!("failed to read file: {}", e))?;
    let needle = search_term.to_lowercase();
    let matches: Vec<String> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| line.to_lowercase().contains(&needle))
        .map(|(i, line)| format!("line {}: {}", i + 1, line.trim()))
        .collect();

    if matches.is_empty() {
        return Ok(format!("'{}' not found in file", search_term));
    }

    let shown: Vec<String> = matches.iter().take(MAX_MATCH_LINES).cloned().collect();
    Ok(format!(
        "Found {} matching lines:\n{}",
        matches.len(),
        shown.join("\n")
    ))
}

pub fn handle_create_directory(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let directory_path = require_str(args, "directory_path")?;
    fs::create_dir_all(directory_path)
        .map_err(|e| format!("failed to create directory: {}", e))?;
    Ok(format!("Directory created: {}", directory_path))
}

pub fn handle_delete_directory(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let directory_path = require_str(args, "directory_path")?;
    let path = Path::new(directory_path);

    if !path.is_dir() {
        return Err(format!("path is not a directory: {}", directory_path));
    }

    let is_protected = path == Path::new("/")
        || dirs::home_dir().map(|home| path == home).unwrap_or(false);
    if is_protected {
        return Err("refusing to delete a protected directory".to_string());
    }

    let mut entries =
        fs::read_dir(path).map_err(|e| format!("failed to read directory: {}", e))?;
    if entries.next().is_some() {
        return Err(format!("directory is not empty: {}", directory_path));
    }

    fs::remove_dir(path).map_err(|e| format!("failed to delete directory: {}", e))?;
    Ok(format!("Directory deleted: {}", directory_path))
}
