//! Tower middleware wrapped around the router.

pub mod request_log;

pub use request_log::{RequestLog, RequestLogLayer};
