//! HTTP API module.
//!
//! This module provides the HTTP server, the API types and the activity log
//! streamed to clients.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::{router, start_server, AppState};
pub use types::*;
