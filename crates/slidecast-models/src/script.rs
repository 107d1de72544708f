//! Timestamped script parsing.
//!
//! A script is a plain-text document with one scene per line:
//!
//! ```text
//! (0-3.5) Welcome to the show [A sunrise over mountains]
//! (3.5-9) Let's dive in [A whiteboard covered in diagrams]
//! ```
//!
//! Lines that don't match the pattern are skipped, so titles and stage
//! directions can live alongside scene lines.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

use crate::scene::Scene;

/// Matches `(<start>-<end>) <narration> [<visual>]` at the start of a
/// trimmed line. Times are non-negative decimals; anything after the
/// closing bracket is ignored.
static SCENE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((\d*\.?\d+)-(\d*\.?\d+)\)\s*(.*?)\s*\[(.*?)\]").unwrap());

/// Script parsing error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    #[error("No scenes found in script")]
    NoScenes,
}

/// Parse a timestamped script into scenes.
///
/// Scenes come back in script order with zero-based indices. Lines that
/// don't match the scene pattern, or whose times fail validation, are
/// skipped. A script yielding no scenes at all is an error.
pub fn parse_script(script: &str) -> Result<Vec<Scene>, ScriptError> {
    let mut scenes = Vec::new();

    for (line_no, raw) in script.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = SCENE_LINE.captures(line) else {
            debug!(line = line_no + 1, "Skipping non-scene line");
            continue;
        };

        // The pattern only admits digit strings, so a parse failure
        // means overflow; treat it like any other malformed line.
        let (Ok(start), Ok(end)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) else {
            debug!(line = line_no + 1, "Skipping scene line with unparseable times");
            continue;
        };

        match Scene::new(scenes.len(), start, end, caps[3].trim(), caps[4].trim()) {
            Ok(scene) => scenes.push(scene),
            Err(e) => {
                debug!(line = line_no + 1, error = %e, "Skipping malformed scene line");
            }
        }
    }

    if scenes.is_empty() {
        return Err(ScriptError::NoScenes);
    }

    Ok(scenes)
}
