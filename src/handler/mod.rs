//! Request handler module
//!
//! Routes requests to the health probes or the contact endpoint.

pub mod contact;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
