pub mod api;
pub mod capabilities;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod notifier;
pub mod prompt;
pub mod reply;
pub mod server;
