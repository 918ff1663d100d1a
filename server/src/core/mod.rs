//! Core module - server configuration, state and lifecycle
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - shared state (db, jwt, activity recorder)
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup-boundary errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
