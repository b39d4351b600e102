//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Session-backed authentication and role checks
//! - `session_store` - Key-value session access behind a trait

pub mod auth;
pub mod session_store;

pub use auth::{AuthError, AuthService};
pub use session_store::{MemorySessionStore, SessionError, SessionStore};
