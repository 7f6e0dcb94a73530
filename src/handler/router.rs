//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route matching, dispatch and
//! access logging.

use crate::config::AppState;
use crate::handler::contact;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&req, peer_addr));

    let response = route_request(req, &state).await;

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path and configuration
async fn route_request<B>(req: Request<B>, state: &Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let config = &state.config;
    let path = req.uri().path();

    // Health check endpoints (highest priority, always fast)
    if config.health.enabled
        && (path == config.health.liveness_path || path == config.health.readiness_path)
    {
        return http::build_health_response("ok", &config.http);
    }

    if path == config.contact.path {
        return contact::handle_contact(req, Arc::clone(state)).await;
    }

    http::build_404_response(&config.http)
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::mail::testing::{transports, FakeClient, FakeDirect};
    use http_body_util::BodyExt;
    use hyper::header::{ALLOW, CONTENT_TYPE};
    use hyper::{Method, StatusCode};
    use serde_json::{json, Value};
    use std::path::Path;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn state(root: &Path, client: Option<&Arc<FakeClient>>, direct: &Arc<FakeDirect>) -> Arc<AppState> {
        let mut config = Config::load_from("no-such-contact-relay-config").unwrap();
        config.logging.access_log = false;
        config.contact.project_root = root.to_string_lossy().into_owned();
        Arc::new(AppState::with_transports(&config, transports(client, direct)))
    }

    fn post(path: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header("host", "example.com:8080")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn call(req: Request<Full<Bytes>>, state: Arc<AppState>) -> (StatusCode, Value) {
        let resp = handle_request(req, state, peer()).await.unwrap();
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    const VALID: &str = "name=Jane+Doe&email=jane%40example.org&subject=Hi&message=Hello+there";

    #[tokio::test]
    async fn test_get_is_405() {
        let dir = tempfile::tempdir().unwrap();
        let direct = FakeDirect::succeeding();
        let req = Request::builder()
            .method(Method::GET)
            .uri("/send_contact")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let resp = handle_request(req, state(dir.path(), None, &direct), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "POST");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({"success": false, "error": "Method not allowed"}));
        assert_eq!(direct.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_post_with_valid_body_is_405() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "MAIL_TO=owner@example.com\n").unwrap();
        let client = FakeClient::succeeding();
        let direct = FakeDirect::succeeding();
        let state = state(dir.path(), Some(&client), &direct);

        for method in [Method::PUT, Method::DELETE] {
            let mut req = post("/send_contact", VALID);
            *req.method_mut() = method;

            let (status, json) = call(req, Arc::clone(&state)).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(json, json!({"success": false, "error": "Method not allowed"}));
        }
        assert_eq!(client.calls(), 0);
        assert_eq!(direct.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_post_lists_all_errors() {
        let dir = tempfile::tempdir().unwrap();
        let direct = FakeDirect::succeeding();

        let (status, json) = call(post("/send_contact", ""), state(dir.path(), None, &direct)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({
                "success": false,
                "errors": ["Name is required", "Valid email is required", "Message is required"]
            })
        );
    }

    #[tokio::test]
    async fn test_missing_recipient() {
        let dir = tempfile::tempdir().unwrap();
        let direct = FakeDirect::succeeding();

        let (status, json) = call(post("/send_contact", VALID), state(dir.path(), None, &direct)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"success": false, "error": "Recipient (MAIL_TO) not configured."})
        );
        assert_eq!(direct.calls(), 0);
    }

    #[tokio::test]
    async fn test_client_delivery() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "MAIL_TO=owner@example.com\n").unwrap();
        let client = FakeClient::succeeding();
        let direct = FakeDirect::succeeding();

        let (status, json) = call(
            post("/send_contact", VALID),
            state(dir.path(), Some(&client), &direct),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"success": true, "message": "Message sent"}));

        let sent = client.sent.lock().unwrap();
        assert_eq!(sent[0].0.from, "no-reply@example.com");
        assert_eq!(sent[0].0.reply_to_name, "Jane Doe");
        assert_eq!(direct.calls(), 0);
    }

    #[tokio::test]
    async fn test_fallback_delivery() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "MAIL_TO=owner@example.com\n").unwrap();
        let client = FakeClient::failing();
        let direct = FakeDirect::succeeding();

        let (_, json) = call(
            post("/send_contact", VALID),
            state(dir.path(), Some(&client), &direct),
        )
        .await;
        assert_eq!(
            json,
            json!({"success": true, "message": "Message sent (mail fallback)"})
        );
        assert_eq!(direct.calls(), 1);
    }

    #[tokio::test]
    async fn test_undeliverable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "MAIL_TO=owner@example.com\n").unwrap();
        let client = FakeClient::failing();
        let direct = FakeDirect::failing();

        let (status, json) = call(
            post("/send_contact", VALID),
            state(dir.path(), Some(&client), &direct),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"success": false, "error": "Unable to send message."}));
    }

    #[tokio::test]
    async fn test_health_and_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let direct = FakeDirect::succeeding();
        let state = state(dir.path(), None, &direct);

        let healthz = Request::builder()
            .uri("/healthz")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let (status, json) = call(healthz, Arc::clone(&state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"status": "ok"}));

        let (status, json) = call(post("/elsewhere", VALID), state).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({"success": false, "error": "Not Found"}));
        assert_eq!(direct.calls(), 0);
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/send_contact?src=footer")
            .version(Version::HTTP_10)
            .header(USER_AGENT, "curl/8.0")
            .body(())
            .unwrap();
        let entry = access_entry(&req, peer());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.path, "/send_contact");
        assert_eq!(entry.query.as_deref(), Some("src=footer"));
        assert_eq!(entry.http_version, "1.0");
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.referer, None);
    }
}
