pub mod calc;
pub mod files;
pub mod monitor;
pub mod net;
pub mod paths;
mod registry;
pub mod shell;
pub mod system;
pub mod timers;
pub mod web;

pub use registry::{canonical_name, Capability, CapabilityRegistry};
pub use timers::TimerSet;

use std::path::PathBuf;
use std::sync::Mutex;

/// Per-session state threaded through every capability call. Each accepted
/// connection owns exactly one of these; nothing here is shared across
/// sessions.
pub struct SessionContext {
    working_dir: Mutex<PathBuf>,
    pub timers: TimerSet,
    pub shell_timeout: u64,
    pub verbose: bool,
}

impl SessionContext {
    pub fn new(shell_timeout: u64, verbose: bool) -> Self {
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self {
            working_dir: Mutex::new(working_dir),
            timers: TimerSet::new(),
            shell_timeout,
            verbose,
        }
    }

    pub fn working_dir(&self) -> PathBuf {
        self.working_dir
            .lock()
            .map(|dir| dir.clone())
            .unwrap_or_else(|_| PathBuf::from("/"))
    }

    pub fn set_working_dir(&self, dir: PathBuf) {
        if let Ok(mut guard) = self.working_dir.lock() {
            *guard = dir;
        }
    }
}
