//! HTTP response building module
//!
//! Every body this service returns is JSON.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW, CONTENT_TYPE, SERVER};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::HttpConfig;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Build a JSON response with the configured `Server` and CORS headers.
/// A 405 also advertises `Allow: POST`.
pub fn build_json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    http_config: &HttpConfig,
) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_500_response();
        }
    };

    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(SERVER, http_config.server_name.as_str());

    if status == StatusCode::METHOD_NOT_ALLOWED {
        builder = builder.header(ALLOW, "POST");
    }
    if http_config.enable_cors {
        builder = builder.header(ACCESS_CONTROL_ALLOW_ORIGIN, "*");
    }

    builder.body(Full::new(Bytes::from(json))).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build health check response
pub fn build_health_response(status: &str, http_config: &HttpConfig) -> Response<Full<Bytes>> {
    build_json_response(
        StatusCode::OK,
        &serde_json::json!({ "status": status }),
        http_config,
    )
}

/// Build 404 Not Found response
pub fn build_404_response(http_config: &HttpConfig) -> Response<Full<Bytes>> {
    build_json_response(
        StatusCode::NOT_FOUND,
        &serde_json::json!({ "success": false, "error": "Not Found" }),
        http_config,
    )
}

fn build_500_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .body(Full::new(Bytes::from(
            r#"{"success":false,"error":"Internal server error"}"#,
        )))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
