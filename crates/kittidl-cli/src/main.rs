mod fetch;
mod list;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "kittidl")]
#[command(about = "Fetch the KITTI raw recordings into a local data root")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download and unpack catalog entries that are not yet present
    Fetch(fetch::FetchArgs),

    /// Show every catalog entry and whether it is already complete
    #[command(alias = "status")]
    List(list::ListArgs),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn run() -> Result<i32> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Fetch(fetch_args) => {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| anyhow::anyhow!("Failed to create async runtime: {}", e))?;
            rt.block_on(fetch::execute(fetch_args))
        }
        Commands::List(list_args) => list::execute(list_args),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Args::command(),
                "kittidl",
                &mut std::io::stdout(),
            );
            Ok(0)
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            // Print the error chain for debugging
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}
