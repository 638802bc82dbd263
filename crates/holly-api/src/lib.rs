//! Holly API crate - axum HTTP surface for the holiday bot.
//!
//! Exposes the messaging endpoint used by chat clients, read-only views of
//! the holiday catalog, conversation inspection, and a health check.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
