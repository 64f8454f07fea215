//! Fetch command - download and unpack missing catalog entries.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

use kittidl::cli::Verbosity;
use kittidl::{default_data_root, Fetcher, FetcherConfig, HttpClient, DEFAULT_LIMIT};

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Target root directory for the extracted recordings
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Stop after this many entries, counting skipped and downloaded alike
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Report skip-or-download decisions without touching the network
    #[arg(long)]
    pub dry_run: bool,

    /// Disable progress output
    #[arg(long)]
    pub no_progress: bool,

    /// Do not output any message
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl FetchArgs {
    fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Debug,
            }
        }
    }
}

pub async fn execute(args: FetchArgs) -> Result<i32> {
    let root = args.data_dir.clone().unwrap_or_else(default_data_root);
    log::debug!("Using data root {}", root.display());

    let client = Arc::new(HttpClient::new()?);
    let fetcher = Fetcher::new(
        client,
        FetcherConfig {
            limit: args.limit,
            dry_run: args.dry_run,
            progress: !args.no_progress,
            verbosity: args.verbosity(),
        },
    );

    let summary = fetcher.run(&root).await?;

    if !args.quiet {
        let verb = if args.dry_run {
            style("Dry run:").cyan().bold()
        } else {
            style("Done:").green().bold()
        };
        eprintln!(
            "{} {} processed ({} downloaded, {} already complete) under {}",
            verb,
            summary.processed,
            summary.downloaded,
            summary.skipped,
            root.display()
        );
    }

    Ok(0)
}
