//! Media probing - runs ffprobe and turns its stream listing into an aspect label

mod aspect;
mod descriptor;
mod error;

pub use aspect::{classify, classify_ratio, AspectLabel};
pub use descriptor::{parse_stream_descriptor, StreamDescriptor};
pub use error::{ExecutionError, ProbeError};

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

const DEFAULT_PROGRAM: &str = "ffprobe";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Produces the raw JSON stream listing for a media file.
#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe_streams(&self, path: &Path) -> Result<Vec<u8>, ExecutionError>;
}

/// `MediaProber` backed by the ffprobe executable.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    program: String,
    timeout: Option<Duration>,
}

impl FfprobeProber {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// `None` lets the probe run for as long as it takes.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.program,
        ffmpeg.operation = "probe"
    ))]
    async fn probe_streams(&self, path: &Path) -> Result<Vec<u8>, ExecutionError> {
        let start = Instant::now();

        let mut command = Command::new(&self.program);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let spawn_error = |source| ExecutionError::Spawn {
            program: self.program.clone(),
            source,
        };

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| ExecutionError::TimedOut {
                    program: self.program.clone(),
                    timeout: limit,
                })?
                .map_err(spawn_error)?,
            None => command.output().await.map_err(spawn_error)?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(
                status = ?output.status.code(),
                stderr = %stderr,
                "ffprobe exited unsuccessfully"
            );
            return Err(ExecutionError::Exited {
                program: self.program.clone(),
                code: output.status.code(),
                stderr,
            });
        }

        tracing::debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            output_bytes = output.stdout.len(),
            "ffprobe completed"
        );

        Ok(output.stdout)
    }
}

/// Probe `path` and decode the dimensions of its video stream.
pub async fn probe_descriptor(
    prober: &dyn MediaProber,
    path: &Path,
) -> Result<StreamDescriptor, ProbeError> {
    let raw = prober.probe_streams(path).await?;
    parse_stream_descriptor(&raw)
}

/// Probe `path` and classify its video stream.
#[tracing::instrument(skip(prober))]
pub async fn classify_aspect(
    prober: &dyn MediaProber,
    path: &Path,
) -> Result<AspectLabel, ProbeError> {
    let descriptor = probe_descriptor(prober, path).await?;
    let label = descriptor.aspect()?;

    tracing::info!(
        width = descriptor.width,
        height = descriptor.height,
        aspect = %label,
        "Classified video aspect ratio"
    );

    Ok(label)
}
