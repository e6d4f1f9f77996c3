use super::paths::{optional_str, require_str};
use super::SessionContext;
use chrono::{Duration as ChronoDuration, Local, NaiveTime};
use colored::*;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Scheduled alarm/reminder tasks for one session. Tracked so that closing
/// the session cancels anything still pending instead of leaving detached
/// timers firing into nothing.
pub struct TimerSet {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(Vec::new()),
        }
    }

    pub fn track(&self, handle: JoinHandle<()>) {
        if let Ok(mut handles) = self.handles.lock() {
            handles.retain(|h| !h.is_finished());
            handles.push(handle);
        }
    }

    pub fn pending(&self) -> usize {
        self.handles
            .lock()
            .map(|handles| handles.iter().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }

    pub fn abort_all(&self) {
        if let Ok(mut handles) = self.handles.lock() {
            for handle in handles.drain(..) {
                handle.abort();
            }
        }
    }
}

impl Default for TimerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.abort_all();
    }
}

pub fn handle_set_alarm(args: &Value, ctx: &SessionContext) -> Result<String, String> {
    let time_str = require_str(args, "time_str")?;
    let message = optional_str(args, "message")
        .unwrap_or("Alarm!")
        .to_string();

    let alarm_time = NaiveTime::parse_from_str(time_str, "%H:%M")
        .map_err(|_| "Time must be in HH:MM format".to_string())?;

    let now = Local::now();
    let mut fire_at = now
        .date_naive()
        .and_time(alarm_time)
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| "Could not resolve alarm time".to_string())?;
    if fire_at <= now {
        fire_at += ChronoDuration::days(1);
    }

    let delay = (fire_at - now)
        .to_std()
        .map_err(|_| "Alarm time is in the past".to_string())?;

    let confirmation = format!(
        "Alarm set for {} - {}",
        fire_at.format("%Y-%m-%d %H:%M:%S"),
        message
    );
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        println!("{}", format!("[alarm] {}", message).yellow().bold());
    });
    ctx.timers.track(handle);

    Ok(confirmation)
}

pub fn handle_create_reminder(args: &Value, ctx: &SessionContext) -> Result<String, String> {
    let minutes = args
        .get("minutes")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| "Missing required argument: minutes".to_string())?;
    let message = optional_str(args, "message")
        .unwrap_or("Reminder!")
        .to_string();

    let seconds = minutes
        .checked_mul(60)
        .ok_or_else(|| "minutes is too large".to_string())?;

    let confirmation = format!("Reminder set for {} minutes from now - {}", minutes, message);
    let handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(seconds)).await;
        println!("{}", format!("[reminder] {}", message).yellow().bold());
    });
    ctx.timers.track(handle);

    Ok(confirmation)
}
