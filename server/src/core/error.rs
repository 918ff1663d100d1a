//! Startup-boundary errors

use thiserror::Error;

/// Errors surfaced by the server lifecycle (not request handling - request
/// errors are [`AppError`](crate::utils::AppError))
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("server io error")]
    Io(#[from] std::io::Error),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Result type for server lifecycle operations
pub type Result<T> = std::result::Result<T, ServerError>;
