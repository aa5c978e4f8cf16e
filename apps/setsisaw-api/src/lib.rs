//! setsisaw HTTP API.
//!
//! Account sign-up and sign-in, token refresh and caller introspection over
//! axum. Token handling lives in `setsisaw-auth`; this crate maps it onto
//! HTTP.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod router;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use extract::{bearer_token, AuthenticatedUser};
pub use router::app_router;
pub use state::AppState;
