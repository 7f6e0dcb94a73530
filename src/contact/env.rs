//! Per-request `KEY=VALUE` configuration file
//!
//! Read fresh for every submission. An unreadable file yields an empty map.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const MAIL_TO: &str = "MAIL_TO";
pub const MAIL_FROM: &str = "MAIL_FROM";
pub const SMTP_HOST: &str = "SMTP_HOST";
pub const SMTP_USER: &str = "SMTP_USER";
pub const SMTP_PASS: &str = "SMTP_PASS";
pub const SMTP_PORT: &str = "SMTP_PORT";
pub const SMTP_SECURE: &str = "SMTP_SECURE";
pub const LOG_FILE: &str = "LOG_FILE";

/// Parsed env file, immutable once loaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    values: HashMap<String, String>,
}

impl EnvConfig {
    pub fn load(path: &Path) -> Self {
        fs::read(path).map_or_else(
            |_| Self::default(),
            |bytes| Self::parse(&String::from_utf8_lossy(&bytes)),
        )
    }

    pub fn parse(content: &str) -> Self {
        let mut values = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            values.insert(
                key.trim().to_string(),
                strip_quotes(value.trim()).to_string(),
            );
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for `key` unless it is missing or empty
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn mail_to(&self) -> Option<&str> {
        self.non_empty(MAIL_TO)
    }

    pub fn mail_from(&self) -> Option<&str> {
        self.non_empty(MAIL_FROM)
    }

    pub fn smtp_host(&self) -> Option<&str> {
        self.non_empty(SMTP_HOST)
    }

    pub fn smtp_user(&self) -> &str {
        self.get(SMTP_USER).unwrap_or_default()
    }

    pub fn smtp_pass(&self) -> &str {
        self.get(SMTP_PASS).unwrap_or_default()
    }

    /// `None` when unset, empty or not a port number
    pub fn smtp_port(&self) -> Option<u16> {
        self.non_empty(SMTP_PORT)?.parse().ok()
    }

    pub fn smtp_secure(&self) -> Option<&str> {
        self.non_empty(SMTP_SECURE)
    }

    pub fn log_file(&self) -> Option<&str> {
        self.non_empty(LOG_FILE)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Remove one layer of matching `"` or `'`. A lone quote character becomes empty.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.starts_with(quote) && value.ends_with(quote) {
            return value.get(1..value.len().saturating_sub(1)).unwrap_or_default();
        }
    }
    value
}
