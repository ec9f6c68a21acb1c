//! Authentication module
//!
//! Supports: API Key, Basic (WordPress application passwords), Bearer,
//! Custom Headers
//!
//! The `Authenticator` applies credentials to every GraphQL request.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, Location};
