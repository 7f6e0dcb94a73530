//! Full mail client built on lettre
//!
//! Authenticated SMTP when the env file names a host, the local sendmail
//! binary otherwise.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SendmailTransport, SmtpTransport, Transport};

use super::error::MailError;
use super::message::{OutgoingMail, SmtpSettings, FROM_DISPLAY_NAME};
use super::MailClient;

pub struct LettreClient {
    sendmail_command: String,
}

impl LettreClient {
    pub fn new(sendmail_command: impl Into<String>) -> Self {
        Self {
            sendmail_command: sendmail_command.into(),
        }
    }
}

impl MailClient for LettreClient {
    fn send(&self, mail: &OutgoingMail, smtp: Option<&SmtpSettings>) -> Result<(), MailError> {
        let message = build_message(mail)?;
        match smtp {
            Some(settings) => {
                smtp_transport(settings)?.send(&message)?;
            }
            None => {
                SendmailTransport::new_with_command(&self.sendmail_command).send(&message)?;
            }
        }
        Ok(())
    }
}

/// Build the message with display names and a `Reply-To` pointing at the visitor
pub fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
    let from = Mailbox::new(Some(FROM_DISPLAY_NAME.to_string()), mail.from.parse()?);
    let reply_name = Some(mail.reply_to_name.clone()).filter(|n| !n.is_empty());
    let reply_to = Mailbox::new(reply_name, mail.reply_to.parse()?);
    let to: Mailbox = mail.to.parse()?;

    let message = Message::builder()
        .from(from)
        .reply_to(reply_to)
        .to(to)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())?;
    Ok(message)
}

/// Map `SMTP_SECURE` to a TLS mode and its conventional port
fn smtp_transport(settings: &SmtpSettings) -> Result<SmtpTransport, MailError> {
    let parameters = || TlsParameters::new(settings.host.clone());
    let mode = settings.security.as_deref().map(str::to_ascii_lowercase);

    let (tls, default_port) = match mode.as_deref() {
        None | Some("") => (Tls::Opportunistic(parameters()?), 25),
        Some("ssl") => (Tls::Wrapper(parameters()?), 465),
        Some("tls") => (Tls::Required(parameters()?), 587),
        Some(other) => {
            return Err(MailError::Config(format!(
                "unsupported SMTP_SECURE mode '{other}'"
            )))
        }
    };

    let credentials = Credentials::new(settings.username.clone(), settings.password.clone());
    Ok(SmtpTransport::builder_dangerous(settings.host.as_str())
        .port(settings.port.unwrap_or(default_port))
        .tls(tls)
        .credentials(credentials)
        .build())
}
