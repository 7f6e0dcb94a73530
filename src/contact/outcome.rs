//! Request outcomes and their JSON shape
//!
//! Only a wrong method maps to a non-200 status; every other failure is a
//! 200 with `success: false`, which existing form clients rely on.

use hyper::StatusCode;
use serde::Serialize;

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const RECIPIENT_MISSING: &str = "Recipient (MAIL_TO) not configured.";
pub const SENT: &str = "Message sent";
pub const SENT_FALLBACK: &str = "Message sent (mail fallback)";
pub const UNDELIVERABLE: &str = "Unable to send message.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    MethodNotAllowed,
    Invalid(Vec<String>),
    RecipientMissing,
    Sent { fallback: bool },
    Undeliverable,
}

/// JSON body: `success` plus exactly one of `message`, `error`, `errors`
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ContactResponse {
    fn success(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            error: None,
            errors: None,
        }
    }

    fn error(error: &str) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
            errors: None,
        }
    }
}

impl Outcome {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::OK,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    pub fn to_response(&self) -> ContactResponse {
        match self {
            Self::MethodNotAllowed => ContactResponse::error(METHOD_NOT_ALLOWED),
            Self::Invalid(errors) => ContactResponse {
                success: false,
                message: None,
                error: None,
                errors: Some(errors.clone()),
            },
            Self::RecipientMissing => ContactResponse::error(RECIPIENT_MISSING),
            Self::Sent { fallback: false } => ContactResponse::success(SENT),
            Self::Sent { fallback: true } => ContactResponse::success(SENT_FALLBACK),
            Self::Undeliverable => ContactResponse::error(UNDELIVERABLE),
        }
    }
}
