use std::io::Write;

use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use relay_directory::cli::Args;
use relay_directory::{DirectorySnapshot, RelayDirectoryFetcher};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn write_snapshot(args: &Args, snapshot: &DirectorySnapshot) -> Result<(), Box<dyn std::error::Error>> {
    let json = if args.pretty {
        serde_json::to_string_pretty(snapshot)?
    } else {
        serde_json::to_string(snapshot)?
    };

    match &args.output {
        Some(path) => std::fs::write(path, json)?,
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(json.as_bytes())?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.fetcher_config()?;
    let fetcher = RelayDirectoryFetcher::new(config)?;
    let snapshot = fetcher.fetch()?;
    write_snapshot(args, &snapshot)?;

    if let Some(path) = &args.output {
        eprintln!(
            "{} {} relays to {} (fetched {})",
            "wrote".green().bold(),
            snapshot.relays.len(),
            path.display(),
            snapshot.fetched_at.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
