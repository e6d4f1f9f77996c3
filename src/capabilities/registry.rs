use super::paths::normalize_arguments;
use super::{calc, files, monitor, net, shell, system, timers, web, SessionContext};
use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

type Handler = Box<
    dyn for<'a> Fn(
            &'a Value,
            &'a SessionContext,
        ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>
        + Send
        + Sync,
>;

pub struct Capability {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    handler: Handler,
}

/// Resolve a model-provided tool name through the fixed alias table.
/// Unknown names pass through unchanged and fail later at dispatch.
pub fn canonical_name(name: &str) -> String {
    let canonical = match name.to_lowercase().as_str() {
        "getfilelist" | "listfiles" | "showfiles" | "ls" => "list_directory",
        "make_directory" | "mkdir" => "create_directory",
        "remove_file" => "delete_file",
        "remove_directory" => "delete_directory",
        "check_file" => "file_exists",
        "check_directory" => "directory_exists",
        "search_web" => "web_search",
        "browse_url" => "open_url",
        "find_files" => "search_files",
        "grep" => "search_in_file",
        "find_in_files" => "search_local_files",
        "sysinfo" => "get_system_info",
        "df" | "disk_usage" => "get_disk_usage",
        "meminfo" => "get_memory_info",
        "cpuinfo" => "get_cpu_info",
        "ps" | "processes" => "get_process_list",
        "netinfo" => "get_network_info",
        "shell" | "run_command" => "execute_shell_command",
        "cd" => "change_directory",
        "pwd" => "get_current_directory",
        "ping" => "ping_host",
        "download" => "download_file",
        "time" => "get_current_time",
        "alarm" => "set_alarm",
        "reminder" => "create_reminder",
        "calc" => "calculate",
        "weather" => "get_weather",
        "translate" => "translate_text",
        _ => return name.to_string(),
    };
    canonical.to_string()
}

/// Process-wide capability table. Built once at startup and read-only
/// afterwards; sessions share it behind an `Arc`.
pub struct CapabilityRegistry {
    tools: HashMap<String, Capability>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };
        registry.register_builtins();
        registry
    }

    fn register<F>(&mut self, name: &str, description: &str, input_schema: Value, handler: F)
    where
        F: for<'a> Fn(
                &'a Value,
                &'a SessionContext,
            )
                -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>
            + Send
            + Sync
            + 'static,
    {
        self.tools.insert(
            name.to_string(),
            Capability {
                name: name.to_string(),
                description: description.to_string(),
                input_schema,
                handler: Box::new(handler),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.tools.get(name)
    }

    /// Registered capabilities, sorted by name for a deterministic system
    /// prompt.
    pub fn list(&self) -> Vec<&Capability> {
        let mut tools: Vec<&Capability> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    fn validate_arguments(&self, tool: &Capability, arguments: &Value) -> Result<(), String> {
        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&tool.input_schema)
            .map_err(|e| format!("Invalid tool schema: {}", e))?;

        if let Err(errors) = schema.validate(arguments) {
            let messages: Vec<String> = errors
                .map(|e| format!("{}: {}", e.instance_path, e))
                .collect();
            return Err(messages.join("; "));
        }
        Ok(())
    }

    /// Total dispatch: alias-correct the name, normalize path-like
    /// arguments against the session working directory, validate, invoke.
    /// Every failure mode is rendered as text; nothing escapes as an error.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
        session: &SessionContext,
    ) -> String {
        let name = canonical_name(name);

        let mut arguments = arguments.clone();
        normalize_arguments(&mut arguments, &session.working_dir());
        let arguments = Value::Object(arguments);

        let Some(tool) = self.tools.get(&name) else {
            return format!("Error: unknown tool '{}'", name);
        };

        if let Err(e) = self.validate_arguments(tool, &arguments) {
            return format!("Error: invalid arguments for '{}': {}", name, e);
        }

        match (tool.handler)(&arguments, session).await {
            Ok(text) => text,
            Err(e) => format!("Error: {}", e),
        }
    }

    fn register_builtins(&mut self) {
        self.register(
            "execute_shell_command",
            "Run a shell command and return its output. Destructive commands are refused.",
            json!({
                "type": "object",
                "properties": {
                    "command": { "type": "string", "description": "The command to run" }
                },
                "required": ["command"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(shell::handle_execute_command(args, ctx)),
        );

        self.register(
            "get_current_directory",
            "Get the session working directory.",
            json!({ "type": "object", "properties": {}, "additionalProperties": false }),
            |args, ctx| Box::pin(async move { system::handle_get_current_directory(args, ctx) }),
        );

        self.register(
            "change_directory",
            "Change the session working directory.",
            json!({
                "type": "object",
                "properties": {
                    "directory_path": { "type": "string" }
                },
                "required": ["directory_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { system::handle_change_directory(args, ctx) }),
        );

        self.register(
            "get_system_info",
            "Get basic information about the host system.",
            json!({ "type": "object", "properties": {}, "additionalProperties": false }),
            |args, ctx| Box::pin(async move { system::handle_get_system_info(args, ctx) }),
        );

        self.register(
            "get_current_time",
            "Get the current local date and time.",
            json!({ "type": "object", "properties": {}, "additionalProperties": false }),
            |args, ctx| Box::pin(async move { system::handle_get_current_time(args, ctx) }),
        );

        self.register(
            "create_file",
            "Create or overwrite a text file, creating parent directories as needed.",
            json!({
                "type": "object",
                "properties": {
                    "file_path": { "type": "string" },
                    "content": { "type": "string" }
                },
                "required": ["file_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_create_file(args, ctx) }),
        );

        self.register(
            "read_file",
            "Read the contents of a text file.",
            json!({
                "type": "object",
                "properties": {
                    "file_path": { "type": "string" }
                },
                "required": ["file_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_read_file(args, ctx) }),
        );

        self.register(
            "list_directory",
            "List the entries of a directory.",
            json!({
                "type": "object",
                "properties": {
                    "directory_path": { "type": "string" }
                },
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_list_directory(args, ctx) }),
        );

        self.register(
            "delete_file",
            "Delete a single file.",
            json!({
                "type": "object",
                "properties": {
                    "file_path": { "type": "string" }
                },
                "required": ["file_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_delete_file(args, ctx) }),
        );

        self.register(
            "copy_file",
            "Copy a file to a new location.",
            json!({
                "type": "object",
                "properties": {
                    "source_path": { "type": "string" },
                    "destination_path": { "type": "string" }
                },
                "required": ["source_path", "destination_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_copy_file(args, ctx) }),
        );

        self.register(
            "move_file",
            "Move a file to a new location.",
            json!({
                "type": "object",
                "properties": {
                    "source_path": { "type": "string" },
                    "destination_path": { "type": "string" }
                },
                "required": ["source_path", "destination_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_move_file(args, ctx) }),
        );

        self.register(
            "rename_file",
            "Rename a file.",
            json!({
                "type": "object",
                "properties": {
                    "old_path": { "type": "string" },
                    "new_path": { "type": "string" }
                },
                "required": ["old_path", "new_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_rename_file(args, ctx) }),
        );

        self.register(
            "file_exists",
            "Check whether a file exists.",
            json!({
                "type": "object",
                "properties": {
                    "file_path": { "type": "string" }
                },
                "required": ["file_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_file_exists(args, ctx) }),
        );

        self.register(
            "directory_exists",
            "Check whether a directory exists.",
            json!({
                "type": "object",
                "properties": {
                    "directory_path": { "type": "string" }
                },
                "required": ["directory_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_directory_exists(args, ctx) }),
        );

        self.register(
            "get_file_info",
            "Get size and timestamps for a file.",
            json!({
                "type": "object",
                "properties": {
                    "file_path": { "type": "string" }
                },
                "required": ["file_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_get_file_info(args, ctx) }),
        );

        self.register(
            "get_file_size",
            "Get the size of a file.",
            json!({
                "type": "object",
                "properties": {
                    "file_path": { "type": "string" }
                },
                "required": ["file_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_get_file_size(args, ctx) }),
        );

        self.register(
            "search_files",
            "Find files matching a shell-style name pattern under a directory.",
            json!({
                "type": "object",
                "properties": {
                    "search_pattern": { "type": "string" },
                    "search_path": { "type": "string" }
                },
                "required": ["search_pattern"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_search_files(args, ctx) }),
        );

        self.register(
            "search_in_file",
            "Search for a term inside a file and return matching lines.",
            json!({
                "type": "object",
                "properties": {
                    "file_path": { "type": "string" },
                    "search_term": { "type": "string" }
                },
                "required": ["file_path", "search_term"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_search_in_file(args, ctx) }),
        );

        self.register(
            "search_local_files",
            "Search for a term inside every readable file under a directory.",
            json!({
                "type": "object",
                "properties": {
                    "search_term": { "type": "string" },
                    "search_path": { "type": "string" }
                },
                "required": ["search_term"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_search_local_files(args, ctx) }),
        );

        self.register(
            "create_directory",
            "Create a directory, including parents.",
            json!({
                "type": "object",
                "properties": {
                    "directory_path": { "type": "string" }
                },
                "required": ["directory_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_create_directory(args, ctx) }),
        );

        self.register(
            "delete_directory",
            "Delete an empty directory.",
            json!({
                "type": "object",
                "properties": {
                    "directory_path": { "type": "string" }
                },
                "required": ["directory_path"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { files::handle_delete_directory(args, ctx) }),
        );

        self.register(
            "get_disk_usage",
            "Report disk usage per mounted filesystem.",
            json!({ "type": "object", "properties": {}, "additionalProperties": false }),
            |args, ctx| Box::pin(monitor::handle_get_disk_usage(args, ctx)),
        );

        self.register(
            "get_memory_info",
            "Report total, free and available memory.",
            json!({ "type": "object", "properties": {}, "additionalProperties": false }),
            |args, ctx| Box::pin(async move { monitor::handle_get_memory_info(args, ctx) }),
        );

        self.register(
            "get_cpu_info",
            "Report the CPU model, core count and load average.",
            json!({ "type": "object", "properties": {}, "additionalProperties": false }),
            |args, ctx| Box::pin(async move { monitor::handle_get_cpu_info(args, ctx) }),
        );

        self.register(
            "get_network_info",
            "Report per-interface traffic counters.",
            json!({ "type": "object", "properties": {}, "additionalProperties": false }),
            |args, ctx| Box::pin(async move { monitor::handle_get_network_info(args, ctx) }),
        );

        self.register(
            "get_process_list",
            "List the processes using the most memory.",
            json!({ "type": "object", "properties": {}, "additionalProperties": false }),
            |args, ctx| Box::pin(monitor::handle_get_process_list(args, ctx)),
        );

        self.register(
            "check_internet_connection",
            "Check whether the host has internet connectivity.",
            json!({ "type": "object", "properties": {}, "additionalProperties": false }),
            |args, ctx| Box::pin(net::handle_check_internet_connection(args, ctx)),
        );

        self.register(
            "ping_host",
            "Ping a host a few times and return the output.",
            json!({
                "type": "object",
                "properties": {
                    "host": { "type": "string" },
                    "count": { "type": "integer", "minimum": 1, "maximum": 10 }
                },
                "required": ["host"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(net::handle_ping_host(args, ctx)),
        );

        self.register(
            "download_file",
            "Download a file over HTTP and save it locally.",
            json!({
                "type": "object",
                "properties": {
                    "url": { "type": "string" },
                    "save_path": { "type": "string" }
                },
                "required": ["url"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(net::handle_download_file(args, ctx)),
        );

        self.register(
            "web_search",
            "Build a search URL for a query on a supported search engine.",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string" },
                    "search_engine": { "type": "string" }
                },
                "required": ["query"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { web::handle_web_search(args, ctx) }),
        );

        self.register(
            "open_url",
            "Normalize a URL for the presentation layer to open.",
            json!({
                "type": "object",
                "properties": {
                    "url": { "type": "string" }
                },
                "required": ["url"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { web::handle_open_url(args, ctx) }),
        );

        self.register(
            "get_weather",
            "Build a weather lookup URL, optionally for a specific city.",
            json!({
                "type": "object",
                "properties": {
                    "city": { "type": "string" }
                },
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { web::handle_get_weather(args, ctx) }),
        );

        self.register(
            "translate_text",
            "Build a translation URL for a piece of text.",
            json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "target_lang": { "type": "string" }
                },
                "required": ["text"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { web::handle_translate_text(args, ctx) }),
        );

        self.register(
            "set_alarm",
            "Set an alarm for a time of day (HH:MM). Fires on the server console.",
            json!({
                "type": "object",
                "properties": {
                    "time_str": { "type": "string" },
                    "message": { "type": "string" }
                },
                "required": ["time_str"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { timers::handle_set_alarm(args, ctx) }),
        );

        self.register(
            "create_reminder",
            "Set a reminder to fire after a number of minutes.",
            json!({
                "type": "object",
                "properties": {
                    "minutes": { "type": "integer", "minimum": 1, "maximum": 10080 },
                    "message": { "type": "string" }
                },
                "required": ["minutes"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { timers::handle_create_reminder(args, ctx) }),
        );

        self.register(
            "calculate",
            "Evaluate an arithmetic expression (+ - * / and parentheses).",
            json!({
                "type": "object",
                "properties": {
                    "expression": { "type": "string" }
                },
                "required": ["expression"],
                "additionalProperties": false
            }),
            |args, ctx| Box::pin(async move { calc::handle_calculate(args, ctx) }),
        );
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
