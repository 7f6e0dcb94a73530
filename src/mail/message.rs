//! Outgoing message composition
//!
//! Builds the relayed text and the header block used by the direct send.

use std::borrow::Cow;

/// Display name on the `From` header of client-built messages
pub const FROM_DISPLAY_NAME: &str = "Website Contact";

/// Everything needed to deliver one contact submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub reply_to_name: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    /// Header block for the direct send, CRLF-joined, no trailing separator
    pub fn direct_headers(&self) -> String {
        [
            format!("From: {}", header_safe(&self.from)),
            format!("Reply-To: {}", header_safe(&self.reply_to)),
            "MIME-Version: 1.0".to_string(),
            "Content-Type: text/plain; charset=UTF-8".to_string(),
        ]
        .join("\r\n")
    }
}

/// SMTP submission settings taken from the env file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    pub port: Option<u16>,
    /// `ssl`, `tls`, or `None` for opportunistic STARTTLS
    pub security: Option<String>,
}

/// Plain-text body relayed to the site owner
pub fn compose_body(name: &str, email: &str, subject: &str, message: &str) -> String {
    format!(
        "You have a new contact form submission:\n\n\
         Name: {name}\n\
         Email: {email}\n\
         Subject: {subject}\n\n\
         Message:\n{message}\n"
    )
}

/// Fold CR/LF into spaces so a value cannot start a new header line
pub fn header_safe(value: &str) -> Cow<'_, str> {
    if value.contains(['\r', '\n']) {
        Cow::Owned(value.replace(['\r', '\n'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
