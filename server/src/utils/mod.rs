//! Utility module - shared helpers and types
//!
//! # Contents
//!
//! - [`AppError`] / [`AppResponse`] - application error and response types
//! - [`logger`] - tracing setup
//! - [`time`] - epoch-millis helpers

pub mod error;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResponse, AppResult};
pub use error::{ok, ok_with_message};
