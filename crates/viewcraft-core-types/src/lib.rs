//! Core types shared across the viewcraft crates
//!
//! - **Correlation types**: RequestId, TraceId, SessionId, RequestContext
//! - **Schema constants**: canonical structured-logging field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, SessionId, TraceId};
