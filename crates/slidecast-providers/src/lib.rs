//! Remote asset providers for slideshow generation.
//!
//! This crate supplies:
//! - Image generation behind the [`ImageGenerator`] trait
//! - Speech synthesis behind the [`SpeechSynthesizer`] trait
//! - Shared provider configuration loaded from the environment
//!
//! Both HTTP clients guarantee a usable asset at the target path. A
//! missing API key or a failed request degrades to a locally produced
//! stand-in, a flat placeholder card for images and a silent track for
//! narration, rather than failing the job.

pub mod config;
pub mod error;
pub mod images;
pub mod tts;

pub use config::ProviderConfig;
pub use error::{ProviderError, ProviderResult};
pub use images::{AssetOrigin, ImageApiClient, ImageGenerator};
pub use tts::{SpeechApiClient, SpeechSynthesizer};
