//! Site diagnostics log named by `LOG_FILE`
//!
//! Best-effort: every I/O error is swallowed.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use super::env::EnvConfig;

pub struct Diagnostics {
    path: Option<PathBuf>,
}

impl Diagnostics {
    /// `LOG_FILE` is resolved against `root`; unset or empty disables logging
    pub fn new(env: &EnvConfig, root: &Path) -> Self {
        Self {
            path: env.log_file().map(|file| root.join(file)),
        }
    }

    #[cfg(test)]
    pub const fn disabled() -> Self {
        Self { path: None }
    }

    /// Append `[YYYY-MM-DD HH:MM:SS] <message>`
    pub fn log(&self, message: &str) {
        let Some(path) = &self.path else {
            return;
        };
        let line = format!("{} {message}\n", Local::now().format("[%Y-%m-%d %H:%M:%S]"));
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = file.write_all(line.as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::env::LOG_FILE;

    fn env_with_log(file: &str) -> EnvConfig {
        [(LOG_FILE, file)].into_iter().collect()
    }

    #[test]
    fn test_appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let diagnostics = Diagnostics::new(&env_with_log("contact.log"), dir.path());
        diagnostics.log("MAIL_TO not configured in .env");
        diagnostics.log("second");

        let content = std::fs::read_to_string(dir.path().join("contact.log")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        // [YYYY-MM-DD HH:MM:SS] message
        let first = lines[0];
        assert_eq!(&first[0..1], "[");
        assert_eq!(&first[20..22], "] ");
        assert!(chrono::NaiveDateTime::parse_from_str(&first[1..20], "%Y-%m-%d %H:%M:%S").is_ok());
        assert_eq!(&first[22..], "MAIL_TO not configured in .env");
        assert!(lines[1].ends_with("] second"));
    }

    #[test]
    fn test_unset_or_empty_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        Diagnostics::new(&EnvConfig::default(), dir.path()).log("ignored");
        Diagnostics::new(&env_with_log(""), dir.path()).log("ignored");
        Diagnostics::disabled().log("ignored");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unwritable_path_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let diagnostics = Diagnostics::new(&env_with_log("missing/dir/contact.log"), dir.path());
        diagnostics.log("lost");
        assert!(!dir.path().join("missing").exists());
    }
}
