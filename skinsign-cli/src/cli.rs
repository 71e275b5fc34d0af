use std::path::PathBuf;

use clap::Parser;

/// Daily check-in for a LittleSkin account.
///
/// Credentials are read from the USER_INFO environment variable as JSON:
/// {"handle": "...", "password": "..."}. Static request headers (User-Agent
/// and friends) come from a local JSON file.
#[derive(Debug, Parser)]
#[command(name = "skinsign", version, about)]
pub struct Args {
    /// Path to the JSON file with static request headers.
    #[arg(long, default_value = "headers.json")]
    pub headers: PathBuf,

    /// Site root to check in against.
    #[arg(long, default_value = "https://littleskin.cn/")]
    pub base_url: String,

    /// Total number of attempts before giving up.
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Seconds to wait between failed attempts.
    #[arg(long, default_value_t = 10)]
    pub retry_delay: u64,

    /// Skip the human-pacing pauses between requests.
    #[arg(long)]
    pub fast: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
