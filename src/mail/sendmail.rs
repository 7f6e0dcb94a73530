//! Minimal direct send through the local sendmail binary
//!
//! The message is assembled by hand from the supplied header block, the way a
//! bare `To`/`Subject`/headers/body primitive would pass it to the MTA.

use lettre::address::Envelope;
use lettre::{Address, SendmailTransport, Transport};

use super::error::MailError;
use super::message::header_safe;
use super::DirectSend;

pub struct SendmailDirect {
    transport: SendmailTransport,
}

impl SendmailDirect {
    pub fn new(command: &str) -> Self {
        Self {
            transport: SendmailTransport::new_with_command(command),
        }
    }
}

impl DirectSend for SendmailDirect {
    fn send(&self, to: &str, subject: &str, body: &str, headers: &str) -> Result<(), MailError> {
        let recipient: Address = to.trim().parse()?;
        // No envelope sender: the MTA applies its own default
        let envelope = Envelope::new(None, vec![recipient])?;
        let raw = raw_message(to, subject, body, headers);
        self.transport.send_raw(&envelope, raw.as_bytes())?;
        Ok(())
    }
}

/// `To` and `Subject` first, then the caller's headers, a blank line, the body
pub fn raw_message(to: &str, subject: &str, body: &str, headers: &str) -> String {
    format!(
        "To: {}\r\nSubject: {}\r\n{headers}\r\n\r\n{body}",
        header_safe(to),
        header_safe(subject),
    )
}
