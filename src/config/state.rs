// Application state module
// Holds the loaded configuration and the mail transports chosen at startup

use super::types::Config;
use crate::mail::Transports;

/// Application state
pub struct AppState {
    pub config: Config,
    pub transports: Transports,
}

impl AppState {
    /// Build state with transports selected from `[mail]`
    pub fn new(config: &Config) -> Self {
        Self::with_transports(config, Transports::from_config(&config.mail))
    }

    pub fn with_transports(config: &Config, transports: Transports) -> Self {
        Self {
            config: config.clone(),
            transports,
        }
    }
}
