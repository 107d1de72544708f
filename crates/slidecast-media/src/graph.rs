//! Typed FFmpeg filter graph model.
//!
//! The compositor builds a `FilterGraph` of typed steps and serializes
//! it to `-filter_complex` syntax only when the command is assembled, so
//! the chain construction stays testable without string plumbing.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::MediaError;

/// A stream label inside a filter graph, without brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamLabel(String);

impl StreamLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Positional video stream of input `index`, e.g. `0:v`.
    pub fn input_video(index: usize) -> Self {
        Self(format!("{}:v", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamLabel {
    /// Bracketed form as it appears in graph syntax, e.g. `[vout]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// Cross-fade styles supported by the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionKind {
    /// Plain cross-fade
    #[default]
    Fade,
    /// Fade through black
    FadeBlack,
    /// Dissolve
    Dissolve,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Fade => "fade",
            TransitionKind::FadeBlack => "fadeblack",
            TransitionKind::Dissolve => "dissolve",
        }
    }
}

impl FromStr for TransitionKind {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fade" => Ok(TransitionKind::Fade),
            "fadeblack" => Ok(TransitionKind::FadeBlack),
            "dissolve" => Ok(TransitionKind::Dissolve),
            other => Err(MediaError::UnknownTransition(other.to_string())),
        }
    }
}

/// A single filter in a chain.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// `scale=W:H`
    Scale { width: u32, height: u32 },
    /// `setsar=1` (square pixels after scaling stills)
    SetSar,
    /// `xfade=transition=..:duration=..:offset=..`
    Xfade {
        transition: TransitionKind,
        duration: f64,
        offset: f64,
    },
    /// `subtitles='..'` (burned-in cues)
    Subtitles { path: PathBuf },
    /// `format=pix_fmt`
    Format { pix_fmt: String },
}

impl FilterOp {
    fn render(&self) -> String {
        match self {
            FilterOp::Scale { width, height } => format!("scale={}:{}", width, height),
            FilterOp::SetSar => "setsar=1".to_string(),
            FilterOp::Xfade {
                transition,
                duration,
                offset,
            } => format!(
                "xfade=transition={}:duration={:.3}:offset={:.3}",
                transition.as_str(),
                duration,
                offset
            ),
            FilterOp::Subtitles { path } => format!("subtitles={}", quote_filter_path(path)),
            FilterOp::Format { pix_fmt } => format!("format={}", pix_fmt),
        }
    }
}

/// Quote a path for use as a filter option value.
///
/// Backslashes become forward slashes and the value is wrapped in single
/// quotes with embedded quotes escaped, so Windows-style paths and
/// colons survive filter parsing.
fn quote_filter_path(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    format!("'{}'", normalized.replace('\'', r"'\''"))
}

/// One `[in..]op,op[out]` step of a filter graph.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStep {
    pub inputs: Vec<StreamLabel>,
    pub ops: Vec<FilterOp>,
    pub output: StreamLabel,
}

impl FilterStep {
    pub fn new(inputs: Vec<StreamLabel>, ops: Vec<FilterOp>, output: StreamLabel) -> Self {
        Self {
            inputs,
            ops,
            output,
        }
    }

    fn render(&self) -> String {
        let inputs: String = self.inputs.iter().map(ToString::to_string).collect();
        let ops: Vec<String> = self.ops.iter().map(FilterOp::render).collect();
        format!("{}{}{}", inputs, ops.join(","), self.output)
    }
}

/// An ordered filter graph for `-filter_complex`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGraph {
    steps: Vec<FilterStep>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: FilterStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[FilterStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Serialize to `-filter_complex` syntax.
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .map(FilterStep::render)
            .collect::<Vec<_>>()
            .join(";")
    }
}
