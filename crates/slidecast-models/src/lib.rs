//! Shared data models for the Slidecast backend.
//!
//! This crate provides the pure types and transformations:
//! - Scene and script parsing
//! - Subtitle (SRT) derivation
//! - Image prompt building
//! - Job lifecycle types
//! - Encoding configuration

pub mod encoding;
pub mod job;
pub mod prompt;
pub mod scene;
pub mod script;
pub mod subtitle;

// Re-export common types
pub use encoding::EncodingConfig;
pub use job::{Job, JobId, JobState};
pub use prompt::build_image_prompt;
pub use scene::{Scene, SceneAsset, SceneError};
pub use script::{parse_script, ScriptError};
pub use subtitle::{format_srt, srt_timestamp};
