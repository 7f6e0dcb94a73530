//! Contact endpoint handler
//!
//! Reads and decodes the body on the async side, then hands the submission to
//! `contact::process` on the blocking pool since every mail transport blocks.

use std::sync::Arc;
use std::time::Duration;

use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{CONTENT_TYPE, HOST};
use hyper::http::uri::Authority;
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::contact::{self, FormFields, Outcome};
use crate::http;
use crate::logger;

pub async fn handle_contact<B>(req: Request<B>, state: Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let outcome = if req.method() == Method::POST {
        submit(req, &state).await
    } else {
        logger::log_warning(&format!("Method not allowed: {}", req.method()));
        Outcome::MethodNotAllowed
    };
    if outcome.is_success() {
        logger::log_info("Contact message relayed");
    }

    http::build_json_response(
        outcome.status(),
        &outcome.to_response(),
        &state.config.http,
    )
}

async fn submit<B>(req: Request<B>, state: &Arc<AppState>) -> Outcome
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let server_host = server_host(&req, state.config.contact.server_name.as_deref());
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let form = read_form(
        req.into_body(),
        content_type.as_deref(),
        state.config.max_body_size(),
        state.config.read_timeout(),
    )
    .await;

    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || {
        contact::process(
            &form,
            server_host.as_deref(),
            &state.config.contact,
            &state.transports,
        )
    })
    .await
    .unwrap_or_else(|e| {
        logger::log_error(&format!("Contact task failed: {e}"));
        Outcome::Undeliverable
    })
}

/// An unreadable, oversized, stalled or malformed body yields an empty form,
/// which then fails validation like any other incomplete submission.
async fn read_form<B>(
    body: B,
    content_type: Option<&str>,
    limit: usize,
    read_timeout: Option<Duration>,
) -> FormFields
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let collect = Limited::new(body, limit).collect();
    let collected = match read_timeout {
        Some(deadline) => match tokio::time::timeout(deadline, collect).await {
            Ok(result) => result,
            Err(_) => {
                logger::log_warning(&format!(
                    "Request body not received within {} seconds",
                    deadline.as_secs()
                ));
                return FormFields::default();
            }
        },
        None => collect.await,
    };

    let bytes = match collected {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return FormFields::default();
        }
    };

    FormFields::decode(content_type, bytes)
        .await
        .unwrap_or_else(|e| {
            logger::log_warning(&format!("Failed to decode form body: {e}"));
            FormFields::default()
        })
}

/// Host used for the `no-reply@` sender: configured name, else the request's
/// `Host` header without its port.
fn server_host<B>(req: &Request<B>, configured: Option<&str>) -> Option<String> {
    if let Some(name) = configured.filter(|n| !n.is_empty()) {
        return Some(name.to_string());
    }

    req.headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Authority>().ok())
        .or_else(|| req.uri().authority().cloned())
        .map(|authority| authority.host().to_string())
        .filter(|host| !host.is_empty())
}
