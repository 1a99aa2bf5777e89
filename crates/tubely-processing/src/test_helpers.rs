//! Test doubles for code that depends on `MediaProber`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::probe::{ExecutionError, MediaProber};

#[derive(Debug, Clone)]
enum Canned {
    Output(Vec<u8>),
    Exit { code: i32, stderr: String },
    SpawnFailure,
    Timeout(Duration),
}

/// Returns canned probe output and records every path it was asked about.
#[derive(Debug)]
pub struct FakeProber {
    canned: Canned,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeProber {
    fn new(canned: Canned) -> Self {
        Self {
            canned,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_output(raw: impl Into<Vec<u8>>) -> Self {
        Self::new(Canned::Output(raw.into()))
    }

    /// Output shaped like ffprobe's for a file with one video stream.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        let raw = serde_json::json!({
            "streams": [{
                "index": 0,
                "codec_name": "h264",
                "codec_type": "video",
                "width": width,
                "height": height,
            }]
        });
        Self::with_output(raw.to_string())
    }

    pub fn failing_with_exit(code: i32, stderr: &str) -> Self {
        Self::new(Canned::Exit {
            code,
            stderr: stderr.to_string(),
        })
    }

    pub fn failing_to_spawn() -> Self {
        Self::new(Canned::SpawnFailure)
    }

    pub fn timing_out(timeout: Duration) -> Self {
        Self::new(Canned::Timeout(timeout))
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MediaProber for FakeProber {
    async fn probe_streams(&self, path: &Path) -> Result<Vec<u8>, ExecutionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(path.to_path_buf());
        }

        match &self.canned {
            Canned::Output(raw) => Ok(raw.clone()),
            Canned::Exit { code, stderr } => Err(ExecutionError::Exited {
                program: "ffprobe".to_string(),
                code: Some(*code),
                stderr: stderr.clone(),
            }),
            Canned::SpawnFailure => Err(ExecutionError::Spawn {
                program: "ffprobe".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "ffprobe not found"),
            }),
            Canned::Timeout(timeout) => Err(ExecutionError::TimedOut {
                program: "ffprobe".to_string(),
                timeout: *timeout,
            }),
        }
    }
}
