//! Authentication and authorization
//!
//! - [`JwtService`] - bearer token signing and verification
//! - [`gate`] - session gate: token -> fresh [`Identity`]
//! - [`Identity`] / [`RoleTier`] - authorization evaluator
//! - [`catalog`] - static permission catalog and system role definitions
//! - [`require_auth`] / [`require_permission`] / [`require_admin`] - middleware

pub mod catalog;
pub mod evaluator;
pub mod extractor;
pub mod gate;
pub mod jwt;
pub mod middleware;

pub use evaluator::{Identity, Owned, RoleTier};
pub use gate::{AuthError, authenticate};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{IdentityExt, require_admin, require_auth, require_permission};
