//! Delivery of a validated submission
//!
//! The full client goes first when it exists. Its failure is logged and the
//! direct send is tried next; only the direct send's failure reaches the client.

use super::diagnostics::Diagnostics;
use super::env::EnvConfig;
use super::form::ContactSubmission;
use super::outcome::Outcome;
use crate::logger;
use crate::mail::{compose_body, OutgoingMail, SmtpSettings, Transports};

pub fn dispatch(
    submission: &ContactSubmission,
    env: &EnvConfig,
    server_host: Option<&str>,
    transports: &Transports,
    diagnostics: &Diagnostics,
) -> Outcome {
    let Some(to) = env.mail_to() else {
        diagnostics.log("MAIL_TO not configured in .env");
        logger::log_warning("Contact submission dropped: MAIL_TO not configured");
        return Outcome::RecipientMissing;
    };

    let mail = OutgoingMail {
        from: sender_address(env, server_host),
        to: to.to_string(),
        reply_to: submission.email.clone(),
        reply_to_name: submission.name.clone(),
        subject: submission.subject.clone(),
        body: compose_body(
            &submission.name,
            &submission.email,
            &submission.subject,
            &submission.message,
        ),
    };

    if let Some(client) = &transports.client {
        match client.send(&mail, smtp_settings(env).as_ref()) {
            Ok(()) => return Outcome::Sent { fallback: false },
            Err(e) => {
                diagnostics.log(&format!("Mail client error: {e}"));
                logger::log_warning(&format!("Mail client failed, using direct send: {e}"));
            }
        }
    }

    match transports
        .direct
        .send(&mail.to, &mail.subject, &mail.body, &mail.direct_headers())
    {
        Ok(()) => Outcome::Sent { fallback: true },
        Err(e) => {
            diagnostics.log("mail() failed to send.");
            logger::log_error(&format!("Direct send failed: {e}"));
            Outcome::Undeliverable
        }
    }
}

/// `MAIL_FROM`, else `no-reply@<host>` with `localhost` when the host is unknown
pub fn sender_address(env: &EnvConfig, server_host: Option<&str>) -> String {
    env.mail_from().map_or_else(
        || {
            let host = server_host.filter(|h| !h.is_empty()).unwrap_or("localhost");
            format!("no-reply@{host}")
        },
        ToString::to_string,
    )
}

/// SMTP submission is configured only when `SMTP_HOST` is non-empty
pub fn smtp_settings(env: &EnvConfig) -> Option<SmtpSettings> {
    env.smtp_host().map(|host| SmtpSettings {
        host: host.to_string(),
        username: env.smtp_user().to_string(),
        password: env.smtp_pass().to_string(),
        port: env.smtp_port(),
        security: env.smtp_secure().map(ToString::to_string),
    })
}
