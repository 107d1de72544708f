//! Job registry for slideshow generation.
//!
//! This crate provides:
//! - An in-memory registry of jobs keyed by ID
//! - Lifecycle transitions with terminal-state protection
//! - Monotonic progress reporting for pollers

pub mod error;
pub mod store;

pub use error::{JobsError, JobsResult};
pub use store::JobStore;
