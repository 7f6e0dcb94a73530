//! Mail delivery capabilities
//!
//! Two seams, both selected once at startup:
//! - [`MailClient`]: the full client (display names, SMTP submission)
//! - [`DirectSend`]: the minimal raw-header primitive used as fallback

pub mod client;
pub mod error;
pub mod message;
pub mod sendmail;

use std::sync::Arc;

use crate::config::MailConfig;

pub use client::LettreClient;
pub use error::MailError;
pub use message::{compose_body, OutgoingMail, SmtpSettings};
pub use sendmail::SendmailDirect;

/// Full-featured mail client
pub trait MailClient: Send + Sync {
    /// Deliver via SMTP when `smtp` is given, via the client's default transport otherwise
    fn send(&self, mail: &OutgoingMail, smtp: Option<&SmtpSettings>) -> Result<(), MailError>;
}

/// Minimal direct-send primitive: recipient, subject, body and a CRLF-joined header block
pub trait DirectSend: Send + Sync {
    fn send(&self, to: &str, subject: &str, body: &str, headers: &str) -> Result<(), MailError>;
}

/// The transports a request may use
#[derive(Clone)]
pub struct Transports {
    /// `None` when the full client is unavailable; delivery then goes straight to `direct`
    pub client: Option<Arc<dyn MailClient>>,
    pub direct: Arc<dyn DirectSend>,
}

impl Transports {
    pub fn from_config(config: &MailConfig) -> Self {
        let client: Option<Arc<dyn MailClient>> = if config.client_enabled {
            Some(Arc::new(LettreClient::new(config.sendmail_command.clone())))
        } else {
            None
        };

        Self {
            client,
            direct: Arc::new(SendmailDirect::new(&config.sendmail_command)),
        }
    }
}
