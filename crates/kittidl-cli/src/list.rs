//! List command - show catalog entries and their completion status.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

use kittidl::cli::Output;
use kittidl::{default_data_root, statuses, EntryKind};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Target root directory for the extracted recordings
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Emit the listing as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ListArgs) -> Result<i32> {
    let root = args.data_dir.unwrap_or_else(default_data_root);
    let statuses = statuses(&root);

    if args.json {
        let mut output = Output::new();
        output.set_json_mode(true);
        output.json(&statuses);
        return Ok(0);
    }

    for status in &statuses {
        let mark = if status.complete {
            style("✓").green()
        } else {
            style("·").dim()
        };
        let kind = match status.kind {
            EntryKind::Calibration => "calib",
            EntryKind::Session => "drive",
        };
        println!("{} {:<5} {}", mark, kind, status.name);
    }

    let complete = statuses.iter().filter(|s| s.complete).count();
    println!(
        "\n{}/{} complete under {}",
        complete,
        statuses.len(),
        root.display()
    );

    Ok(0)
}
