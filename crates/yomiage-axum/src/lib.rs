//! Axum intake adapter for yomiage.
//!
//! The loopback HTTP surface that the game-side dialogue hook, the
//! test-speak surface, and the replay trigger talk to. Handlers are thin —
//! each runs the core text pipeline where needed and calls exactly one port
//! method.

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, serve};
pub use error::HttpError;
pub use routes::build_router;
pub use state::AppState;
