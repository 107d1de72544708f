//! Silent audio synthesis.
//!
//! The speech fallback writes a silent track so composition always has
//! a narration input to map.

use std::path::Path;
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Encoding a silence track never takes long; bound it anyway.
const SILENCE_TIMEOUT_SECS: u64 = 60;

/// Write `seconds` of 44.1kHz mono silence to `output`.
pub async fn write_silence(output: impl AsRef<Path>, seconds: f64) -> MediaResult<()> {
    let output = output.as_ref();
    debug!(seconds, output = %output.display(), "Writing silence track");

    let cmd = FfmpegCommand::new(output)
        .input_with_args(
            ["-f".to_string(), "lavfi".to_string()],
            "anullsrc=r=44100:cl=mono",
        )
        .output_arg("-t")
        .output_arg(format!("{:.3}", seconds))
        .output_arg("-q:a")
        .output_arg("9")
        .output_arg("-acodec")
        .output_arg("libmp3lame");

    FfmpegRunner::new()
        .with_timeout(SILENCE_TIMEOUT_SECS)
        .run(&cmd)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::probe_duration;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    #[tokio::test]
    #[ignore = "requires ffmpeg"]
    async fn test_silence_has_requested_length() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("narration.mp3");

        assert_ok!(write_silence(&path, 1.2).await);

        let duration = probe_duration(&path).await.unwrap();
        assert!((duration - 1.2).abs() < 0.2, "unexpected duration {}", duration);
    }
}
