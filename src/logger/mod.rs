//! Logger module
//!
//! Operational logging for the relay process:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support
//!
//! This is the server's own log. The per-site `LOG_FILE` diagnostics live in
//! `contact::diagnostics`.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use writer::Level;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        Level::parse(&config.logging.level),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) if w.enabled(Level::Info) => w.write_info(message),
        Some(_) => {}
        None => println!("{message}"),
    }
}

fn write_error(level: Level, message: &str) {
    match writer::get() {
        Some(w) if w.enabled(level) => w.write_error(message),
        Some(_) => {}
        None => eprintln!("{message}"),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) if w.enabled(Level::Info) => w.write_access(message),
        Some(_) => {}
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Contact relay started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!(
        "Contact endpoint: POST http://{addr}{}",
        config.contact.path
    ));
    write_info(&format!(
        "Env file: {}",
        config.contact.env_path().display()
    ));
    write_info(&format!(
        "Mail client: {}",
        if config.mail.client_enabled {
            "enabled"
        } else {
            "disabled (direct send only)"
        }
    ));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(
        Level::Error,
        &format!("[ERROR] Failed to serve connection: {err:?}"),
    );
}

pub fn log_error(message: &str) {
    write_error(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_shutdown(active: usize) {
    write_info(&format!(
        "[Shutdown] Listener closed, {active} connection(s) still finishing"
    ));
}
