//! HTTP protocol layer module
//!
//! Response builders shared by the contact endpoint and the health probes.

pub mod response;

// Re-export commonly used builders
pub use response::{build_404_response, build_health_response, build_json_response};
