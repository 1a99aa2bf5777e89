//! Tubely CLI: classify local video files and mint development tokens.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tubely_cli::{init_tracing, probe_file, resolve_secret, resolve_timeout, token_lifetime};
use tubely_core::auth::make_jwt;
use tubely_processing::FfprobeProber;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "tubely", about = "Tubely command-line tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the aspect label, storage prefix, and dimensions of a video file
    Probe {
        /// Path to the video file
        file: PathBuf,
        /// ffprobe executable (defaults to FFPROBE_PATH, then `ffprobe`)
        #[arg(long)]
        ffprobe_path: Option<String>,
        /// Give up after this many seconds (defaults to FFPROBE_TIMEOUT_SECS, then 60); 0 waits forever
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Print JSON instead of a tab-separated line
        #[arg(long)]
        json: bool,
    },
    /// Print an access token for a user
    Token {
        /// User UUID placed in the token subject
        #[arg(long)]
        user_id: Uuid,
        /// Signing secret (defaults to JWT_SECRET)
        #[arg(long)]
        secret: Option<String>,
        /// Lifetime in hours (defaults to JWT_EXPIRY_HOURS, then 1)
        #[arg(long)]
        hours: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Probe {
            file,
            ffprobe_path,
            timeout_secs,
            json,
        } => {
            let program = ffprobe_path
                .or_else(|| std::env::var("FFPROBE_PATH").ok())
                .unwrap_or_else(|| "ffprobe".to_string());
            let timeout =
                resolve_timeout(timeout_secs, std::env::var("FFPROBE_TIMEOUT_SECS").ok())?;
            let prober = FfprobeProber::new(program).with_timeout(timeout);

            let report = probe_file(&prober, &file).await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Serialize report")?
                );
            } else {
                println!("{}", report);
            }
        }
        Commands::Token {
            user_id,
            secret,
            hours,
        } => {
            let secret = resolve_secret(secret, std::env::var("JWT_SECRET").ok())?;
            let lifetime = token_lifetime(hours, std::env::var("JWT_EXPIRY_HOURS").ok())?;

            let token = make_jwt(user_id, &secret, lifetime)?;
            tracing::debug!(user_id = %user_id, hours = lifetime.num_hours(), "Issued token");
            println!("{}", token);
        }
    }

    Ok(())
}
