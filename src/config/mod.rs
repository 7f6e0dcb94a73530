// Configuration module entry point
// Loads server configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;
use std::time::Duration;

// Re-export public types
pub use state::AppState;
pub use types::{Config, ContactConfig, HttpConfig, MailConfig};

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("CONTACT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("http.server_name", "contact-relay")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("contact.path", "/send_contact")?
            .set_default("contact.env_file", ".env")?
            .set_default("contact.project_root", ".")?
            .set_default("mail.client_enabled", true)?
            .set_default("mail.sendmail_command", "sendmail")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Deadline for reading a request head or body; `0` disables it
    pub fn read_timeout(&self) -> Option<Duration> {
        Some(self.performance.read_timeout)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Body size limit as a `usize`, saturating on narrow targets
    pub fn max_body_size(&self) -> usize {
        usize::try_from(self.http.max_body_size).unwrap_or(usize::MAX)
    }
}
