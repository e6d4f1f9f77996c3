pub mod client;
pub mod models;

pub use client::{ChatBackend, HttpGateway};
pub use models::RequestBody;
