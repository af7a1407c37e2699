use std::path::Path;
use std::process::Stdio;

use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::cover_extractor::CoverExtractor;

/// Grabs the frame one second into the video with an external `ffmpeg` binary.
pub struct FfmpegCoverExtractor {
    bin: String,
}

impl FfmpegCoverExtractor {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    fn args(video: &Path, dest: &Path) -> Vec<String> {
        vec![
            "-y".into(),
            "-loglevel".into(),
            "error".into(),
            "-ss".into(),
            "00:00:01".into(),
            "-i".into(),
            video.to_string_lossy().into_owned(),
            "-frames:v".into(),
            "1".into(),
            dest.to_string_lossy().into_owned(),
        ]
    }
}

#[async_trait]
impl CoverExtractor for FfmpegCoverExtractor {
    async fn extract(&self, video: &Path, dest: &Path) -> anyhow::Result<()> {
        let output = Command::new(&self.bin)
            .args(Self::args(video, dest))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to spawn {}", self.bin))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("ffmpeg exited with {}: {}", output.status, stderr.trim());
        }
        let meta = tokio::fs::metadata(dest)
            .await
            .with_context(|| format!("ffmpeg produced no frame at {}", dest.display()))?;
        anyhow::ensure!(meta.len() > 0, "ffmpeg wrote an empty frame");
        Ok(())
    }
}
