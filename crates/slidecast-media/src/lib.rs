#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for slideshow composition.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building over any number of inputs
//! - A typed filter graph model for `-filter_complex`
//! - The cross-fade timeline compositor
//! - Duration probing via ffprobe
//! - Silent-track synthesis for the narration fallback

pub mod audio;
pub mod command;
pub mod error;
pub mod graph;
pub mod probe;
pub mod timeline;

pub use audio::write_silence;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use graph::{FilterGraph, FilterOp, FilterStep, StreamLabel, TransitionKind};
pub use probe::probe_duration;
pub use timeline::{build_timeline_graph, compose_slideshow, timeline_duration, RenderOptions};
