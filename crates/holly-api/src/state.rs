//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use holly_core::HollyConfig;
use holly_dialog::HollyBot;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<HollyConfig>,
    pub bot: Arc<HollyBot>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: HollyConfig, bot: HollyBot) -> Self {
        Self {
            config: Arc::new(config),
            bot: Arc::new(bot),
            start_time: Instant::now(),
        }
    }
}
