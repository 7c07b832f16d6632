//! Command-line interface definitions for the tech news digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials can be provided via command-line flags or environment variables;
//! anything given here overrides the config file.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the tech news digest.
///
/// Without `--send` a run only fetches headlines and renders the cards,
/// which makes it safe to try out.
///
/// # Examples
///
/// ```sh
/// # Fetch and render only
/// tech_news_digest
///
/// # Full daily run, as scheduled by cron
/// tech_news_digest --send --config ./config.yaml
///
/// # Print scheduling instructions
/// tech_news_digest --setup-cron
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Deliver the digest after rendering (default: only fetch and render)
    #[arg(long)]
    pub send: bool,

    /// Test mode: never deliver, even with --send
    #[arg(long)]
    pub test: bool,

    /// Print instructions for scheduling the daily run, then exit
    #[arg(long)]
    pub setup_cron: bool,

    /// Number of headlines to fetch
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for cards, reports and locally saved notes
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Location of the news cache file
    #[arg(long)]
    pub cache_path: Option<PathBuf>,

    /// Keep the cache in memory for this run only
    #[arg(long)]
    pub no_cache: bool,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub newsapi_key: Option<String>,

    /// GNews key
    #[arg(long, env = "GNEWS_KEY", hide_env_values = true)]
    pub gnews_key: Option<String>,

    /// TianXing key
    #[arg(long, env = "TIANXING_KEY", hide_env_values = true)]
    pub tianxing_key: Option<String>,

    /// Webhook that creates the note
    #[arg(long, env = "GETNOTE_WEBHOOK_URL")]
    pub getnote_webhook_url: Option<String>,

    /// Bearer token sent with the webhook request
    #[arg(long, env = "GETNOTE_API_KEY", hide_env_values = true)]
    pub getnote_api_key: Option<String>,
}

impl Cli {
    /// Delivery happens only with `--send` and without `--test`.
    pub fn skip_send(&self) -> bool {
        !self.send || self.test
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_dry_run() {
        let cli = Cli::parse_from(["tech_news_digest"]);
        assert!(cli.skip_send());
        assert!(!cli.setup_cron);
        assert!(!cli.no_cache);
        assert!(cli.count.is_none());
    }

    #[test]
    fn test_send_is_overridden_by_test_mode() {
        let cli = Cli::parse_from(["tech_news_digest", "--send"]);
        assert!(!cli.skip_send());

        let cli = Cli::parse_from(["tech_news_digest", "--send", "--test"]);
        assert!(cli.skip_send());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "tech_news_digest",
            "-n",
            "5",
            "-c",
            "/etc/tech_news.yaml",
            "-o",
            "/tmp/out",
        ]);

        assert_eq!(cli.count, Some(5));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/tech_news.yaml")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_cache_flags() {
        let cli = Cli::parse_from([
            "tech_news_digest",
            "--no-cache",
            "--cache-path",
            "/tmp/c.json",
            "--setup-cron",
        ]);
        assert!(cli.no_cache);
        assert!(cli.setup_cron);
        assert_eq!(cli.cache_path, Some(PathBuf::from("/tmp/c.json")));
    }
}
