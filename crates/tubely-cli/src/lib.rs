use anyhow::{bail, Context};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tubely_processing::{probe_descriptor, AspectLabel, MediaProber};

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TOKEN_HOURS: i64 = 1;

/// What `tubely probe` prints for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub aspect: String,
    pub prefix: String,
    pub width: u32,
    pub height: u32,
}

impl ProbeReport {
    pub fn new(label: AspectLabel, width: u32, height: u32) -> Self {
        Self {
            aspect: label.as_str().to_string(),
            prefix: label.storage_prefix().to_string(),
            width,
            height,
        }
    }
}

impl std::fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}x{}",
            self.aspect, self.prefix, self.width, self.height
        )
    }
}

pub async fn probe_file(prober: &dyn MediaProber, path: &Path) -> anyhow::Result<ProbeReport> {
    if !path.is_file() {
        bail!("{} is not a file", path.display());
    }

    let descriptor = probe_descriptor(prober, path)
        .await
        .with_context(|| format!("Failed to probe {}", path.display()))?;
    let label = descriptor.aspect()?;

    Ok(ProbeReport::new(label, descriptor.width, descriptor.height))
}

/// An explicit `--secret` wins over the environment value.
pub fn resolve_secret(arg: Option<String>, env_value: Option<String>) -> anyhow::Result<String> {
    arg.or(env_value)
        .filter(|s| !s.trim().is_empty())
        .context("No signing secret: pass --secret or set JWT_SECRET")
}

/// Probe timeout from `--timeout-secs`, then `FFPROBE_TIMEOUT_SECS`, then 60s.
/// Zero disables the timeout.
pub fn resolve_timeout(
    arg: Option<u64>,
    env_value: Option<String>,
) -> anyhow::Result<Option<Duration>> {
    let secs = match arg {
        Some(secs) => secs,
        None => env_value
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().parse::<u64>())
            .transpose()
            .context("FFPROBE_TIMEOUT_SECS must be a whole number of seconds")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    };
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

/// Token lifetime from `--hours`, then `JWT_EXPIRY_HOURS`, then one hour.
pub fn token_lifetime(
    arg: Option<i64>,
    env_value: Option<String>,
) -> anyhow::Result<chrono::Duration> {
    let hours = match arg {
        Some(hours) => hours,
        None => env_value
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().parse::<i64>())
            .transpose()
            .context("JWT_EXPIRY_HOURS must be a whole number of hours")?
            .unwrap_or(DEFAULT_TOKEN_HOURS),
    };
    if hours <= 0 {
        bail!("Token lifetime must be positive");
    }
    chrono::Duration::try_hours(hours)
        .with_context(|| format!("Token lifetime of {} hours is out of range", hours))
}

/// Initialize tracing for the CLI; logs go to stderr so stdout stays scriptable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}
