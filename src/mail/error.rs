use thiserror::Error;

/// Failure of a single delivery attempt
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("sendmail error: {0}")]
    Sendmail(#[from] lettre::transport::sendmail::Error),

    #[error("{0}")]
    Config(String),
}
