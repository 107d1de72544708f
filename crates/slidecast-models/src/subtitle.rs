//! SRT subtitle derivation.
//!
//! Subtitles are derived straight from scene timestamps: one cue per
//! scene, carrying the narration text. Cue times are truncated to
//! millisecond precision, never rounded up, so a cue can't leak past its
//! scene boundary.

use crate::scene::Scene;

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
///
/// Components are truncated, not rounded.
pub fn srt_timestamp(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    // Subtract before scaling so 65.123 yields 123 rather than 122.
    let millis = ((seconds - seconds.floor()) * 1000.0).floor() as u64;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Render scenes as a complete SRT document.
///
/// Cues are numbered from 1 in scene order, blocks are separated by a
/// blank line, and the document ends with a single trailing newline.
pub fn format_srt(scenes: &[Scene]) -> String {
    let blocks: Vec<String> = scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                i + 1,
                srt_timestamp(scene.start),
                srt_timestamp(scene.end),
                scene.text
            )
        })
        .collect();

    blocks.join("\n")
}
