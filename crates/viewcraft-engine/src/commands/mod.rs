//! Command orchestration layer.
//!
//! Drives the editor service through operations whose collaborators are
//! asynchronous.

pub mod engine_command;
pub mod session;
