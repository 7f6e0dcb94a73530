//! Contact form relay
//!
//! One submission flows through: env file load, field validation, delivery,
//! outcome. Everything here is synchronous; the HTTP layer runs it on the
//! blocking pool.

pub mod diagnostics;
pub mod dispatch;
pub mod env;
pub mod form;
pub mod outcome;

pub use diagnostics::Diagnostics;
pub use env::EnvConfig;
pub use form::{ContactSubmission, FormFields};
pub use outcome::Outcome;

use crate::config::ContactConfig;
use crate::logger;
use crate::mail::Transports;

/// Handle one POSTed form. The env file is read fresh on every call.
pub fn process(
    form: &FormFields,
    server_host: Option<&str>,
    settings: &ContactConfig,
    transports: &Transports,
) -> Outcome {
    let env_path = settings.env_path();
    let env = EnvConfig::load(&env_path);
    if env.is_empty() {
        logger::log_warning(&format!("No settings read from {}", env_path.display()));
    }

    let submission = match ContactSubmission::from_form(form) {
        Ok(submission) => submission,
        Err(errors) => return Outcome::Invalid(errors),
    };

    let diagnostics = Diagnostics::new(&env, settings.root());
    dispatch::dispatch(&submission, &env, server_host, transports, &diagnostics)
}
