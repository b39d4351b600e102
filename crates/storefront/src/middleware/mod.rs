//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `MemoryStore`)
//! 4. Route guards on the `/account` and `/admin` subtrees

pub mod auth;
pub mod session;

pub use auth::{
    AuthRejection, GuardDecision, SessionAuth, Visitor, evaluate, require_admin, require_auth,
};
pub use session::create_session_layer;
