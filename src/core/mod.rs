//! Core Module - Infrastructure components of the application
//!
//! - Authentication middleware and role checks
//! - Configuration
//! - Error handling
//! - Sessions
//! - Application state

pub mod auth;
pub mod config;
pub mod error;
pub mod session;
pub mod state;

// Re-exports to simplify imports
pub use auth::{admin_middleware, authentication_middleware, bearer_token, require_role};
pub use config::Config;
pub use error::AppError;
pub use session::SessionStore;
pub use state::AppState;
