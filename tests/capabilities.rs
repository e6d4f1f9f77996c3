use deskmate::capabilities::files::{
    handle_create_file, handle_delete_directory, handle_list_directory, handle_read_file,
    handle_search_local_files, wildcard_match,
};
use deskmate::capabilities::calc::evaluate;
use deskmate::capabilities::monitor::{
    handle_get_cpu_info, handle_get_memory_info, handle_get_network_info,
};
use deskmate::capabilities::shell::is_denied;
use deskmate::capabilities::system::handle_change_directory;
use deskmate::capabilities::timers::{handle_create_reminder, handle_set_alarm};
use deskmate::capabilities::web::encode_query;
use deskmate::capabilities::SessionContext;
use deskmate::notifier::derive_actions;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn session() -> SessionContext {
    SessionContext::new(30, false)
}

#[test]
fn read_file_success() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("test.txt");
    fs::write(&file, "Hello, world!").unwrap();

    let args = json!({ "file_path": file.to_str().unwrap() });
    let result = handle_read_file(&args, &session()).unwrap();
    assert_eq!(result, "Hello, world!");
}

#[test]
fn read_file_missing_argument() {
    let result = handle_read_file(&json!({}), &session());
    assert!(result.unwrap_err().contains("Missing required argument: file_path"));
}

#[test]
fn read_file_not_found() {
    let temp = TempDir::new().unwrap();
    let args = json!({ "file_path": temp.path().join("nope.txt").to_str().unwrap() });
    let result = handle_read_file(&args, &session());
    assert!(result.unwrap_err().contains("file not found"));
}

#[test]
fn create_file_makes_parent_directories() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("a/b/c.txt");
    let args = json!({
        "file_path": file.to_str().unwrap(),
        "content": "nested"
    });

    handle_create_file(&args, &session()).unwrap();
    assert_eq!(fs::read_to_string(&file).unwrap(), "nested");
}

#[test]
fn list_directory_reports_empty() {
    let temp = TempDir::new().unwrap();
    let args = json!({ "directory_path": temp.path().to_str().unwrap() });
    let result = handle_list_directory(&args, &session()).unwrap();
    assert_eq!(result, "Directory is empty");
}

#[test]
fn delete_directory_refuses_non_empty() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("keep.txt"), "x").unwrap();

    let args = json!({ "directory_path": temp.path().to_str().unwrap() });
    let result = handle_delete_directory(&args, &session());
    assert!(result.unwrap_err().contains("not empty"));
    assert!(temp.path().exists());
}

#[test]
fn change_directory_updates_the_session() {
    let temp = TempDir::new().unwrap();
    let ctx = session();

    let args = json!({ "directory_path": temp.path().to_str().unwrap() });
    handle_change_directory(&args, &ctx).unwrap();
    assert_eq!(ctx.working_dir(), temp.path().to_path_buf());
}

#[test]
fn change_directory_rejects_missing_target() {
    let temp = TempDir::new().unwrap();
    let args = json!({ "directory_path": temp.path().join("ghost").to_str().unwrap() });
    let result = handle_change_directory(&args, &session());
    assert!(result.unwrap_err().contains("directory not found"));
}

#[test]
fn wildcard_matching() {
    assert!(wildcard_match("*.txt", "notes.txt"));
    assert!(wildcard_match("report-?.md", "report-1.md"));
    assert!(wildcard_match("*", "anything"));
    assert!(!wildcard_match("*.txt", "notes.rs"));
    assert!(!wildcard_match("report-?.md", "report-10.md"));
}

#[test]
fn wildcard_matching_stays_fast_on_star_heavy_patterns() {
    // backtracking blowup territory for a naive matcher
    let name = "a".repeat(40);
    assert!(!wildcard_match("*a*a*a*a*a*a*a*a*a*a*b", &name));
    assert!(wildcard_match("*a*a*a*a*a*a*a*a*a*a*", &name));
}

#[test]
fn search_local_files_finds_content_across_a_tree() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("sub")).unwrap();
    fs::write(temp.path().join("a.txt"), "the milk is here\nmore MILK").unwrap();
    fs::write(temp.path().join("sub/b.txt"), "nothing to see").unwrap();

    let args = json!({
        "search_term": "milk",
        "search_path": temp.path().to_str().unwrap()
    });
    let result = handle_search_local_files(&args, &session()).unwrap();
    assert!(result.contains("Found 'milk' in 1 files"));
    assert!(result.contains("a.txt (2 matching lines)"));
}

#[test]
fn search_local_files_reports_no_hits() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.txt"), "plain").unwrap();

    let args = json!({
        "search_term": "unicorn",
        "search_path": temp.path().to_str().unwrap()
    });
    let result = handle_search_local_files(&args, &session()).unwrap();
    assert!(result.contains("'unicorn' not found"));
}

#[test]
fn memory_info_reads_proc() {
    let result = handle_get_memory_info(&json!({}), &session()).unwrap();
    assert!(result.contains("MemTotal"));
}

#[test]
fn cpu_info_reads_proc() {
    let result = handle_get_cpu_info(&json!({}), &session()).unwrap();
    assert!(result.contains("cores:"));
    assert!(result.contains("load average:"));
}

#[test]
fn network_info_lists_interfaces() {
    let result = handle_get_network_info(&json!({}), &session()).unwrap();
    assert!(result.contains("rx"));
    assert!(result.contains("bytes"));
}

#[tokio::test]
async fn reminder_confirmation_carries_the_message() {
    let ctx = session();
    let args = json!({ "minutes": 1, "message": "tea time" });
    let result = handle_create_reminder(&args, &ctx).unwrap();
    assert_eq!(result, "Reminder set for 1 minutes from now - tea time");
    assert_eq!(ctx.timers.pending(), 1);
}

#[tokio::test]
async fn reminder_rejects_overflowing_minutes() {
    let ctx = session();
    let args = json!({ "minutes": u64::MAX, "message": "never" });
    let result = handle_create_reminder(&args, &ctx);
    assert_eq!(result.unwrap_err(), "minutes is too large");
    assert_eq!(ctx.timers.pending(), 0);
}

#[tokio::test]
async fn alarm_confirmation_carries_time_and_message() {
    let ctx = session();
    let args = json!({ "time_str": "00:00", "message": "midnight" });
    let result = handle_set_alarm(&args, &ctx).unwrap();
    assert!(result.starts_with("Alarm set for "));
    assert!(result.ends_with("midnight"));
    assert_eq!(ctx.timers.pending(), 1);
}

#[tokio::test]
async fn alarm_rejects_bad_time_format() {
    let ctx = session();
    let args = json!({ "time_str": "25:99" });
    let result = handle_set_alarm(&args, &ctx);
    assert!(result.unwrap_err().contains("HH:MM"));
}

#[test]
fn calculator_handles_precedence_and_parens() {
    assert_eq!(evaluate("2+2").unwrap(), 4.0);
    assert_eq!(evaluate("2+3*4").unwrap(), 14.0);
    assert_eq!(evaluate("(2+3)*4").unwrap(), 20.0);
    assert_eq!(evaluate("-3 + 5").unwrap(), 2.0);
    assert_eq!(evaluate("10 / 4").unwrap(), 2.5);
}

#[test]
fn calculator_rejects_bad_input() {
    assert!(evaluate("1/0").is_err());
    assert!(evaluate("2+").is_err());
    assert!(evaluate("(2+3").is_err());
}

#[test]
fn shell_denylist_catches_destructive_patterns() {
    assert!(is_denied("rm -rf /"));
    assert!(is_denied("echo hi | tee /etc/passwd"));
    assert!(is_denied("ls; rm x"));
    assert!(is_denied("echo `whoami`"));
    assert!(!is_denied("ls -la"));
    assert!(!is_denied("cat notes.txt"));
}

#[test]
fn query_encoding() {
    assert_eq!(encode_query("rust lang"), "rust+lang");
    assert_eq!(encode_query("a&b=c"), "a%26b%3Dc");
    assert_eq!(encode_query("safe-._~"), "safe-._~");
}

#[test]
fn derived_actions_default_to_idle() {
    let actions = derive_actions("ok");
    assert_eq!(actions, vec!["blink_eyes", "breathing"]);
}

#[test]
fn derived_actions_match_greetings_and_cap_at_three() {
    let actions = derive_actions("Hello there! Welcome back, this is going to be a long message.");
    assert!(actions.contains(&"blink_eyes".to_string()));
    assert!(actions.len() <= 3);
}
