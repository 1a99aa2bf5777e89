use std::time::Duration;

/// The probe process could not produce output.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}: {stderr}", exit_label(.code))]
    Exited {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} timed out after {}s", .timeout.as_secs_f64())]
    TimedOut { program: String, timeout: Duration },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Failure to derive an aspect label from a media file.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Could not decode probe output: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("No streams found in probe output")]
    NoStream,

    #[error("Cannot calculate aspect ratio for {width}x{height}")]
    DegenerateDimensions { width: u32, height: u32 },
}

impl ProbeError {
    /// Whether the file itself is at fault rather than the probe tooling.
    pub fn is_invalid_media(&self) -> bool {
        matches!(
            self,
            ProbeError::NoStream | ProbeError::DegenerateDimensions { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_message_includes_status_and_stderr() {
        let err = ExecutionError::Exited {
            program: "ffprobe".to_string(),
            code: Some(1),
            stderr: "Invalid data found when processing input".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ffprobe exited with status 1: Invalid data found when processing input"
        );
    }

    #[test]
    fn signal_exit_is_described() {
        let err = ExecutionError::Exited {
            program: "ffprobe".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("a signal"));
    }

    #[test]
    fn media_faults_are_distinguished_from_tool_faults() {
        assert!(ProbeError::NoStream.is_invalid_media());
        assert!(ProbeError::DegenerateDimensions {
            width: 0,
            height: 720
        }
        .is_invalid_media());
        let timeout = ProbeError::from(ExecutionError::TimedOut {
            program: "ffprobe".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert!(!timeout.is_invalid_media());
    }
}
