use anyhow::{Context, Result};
use clap::CommandFactory;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod bencode;
mod cli;
mod error;
mod torrent;

use error::MakeError;

// Usage: mktorrent -a <announce-url> [options] <source>
fn main() {
    let args = cli::Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&args) {
        match err.downcast_ref::<MakeError>() {
            Some(MakeError::Config(config_err)) => {
                cli::Args::command()
                    .error(clap::error::ErrorKind::ValueValidation, config_err)
                    .exit();
            }
            _ => {
                eprintln!("error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}

fn run(args: &cli::Args) -> Result<()> {
    let config = args.to_config().map_err(MakeError::from)?;
    info!("Source: {}", config.source.display());

    let created = torrent::make_torrent(&config, |done, total| {
        debug!("hashed piece {}/{}", done, total);
    })?;

    if args.json {
        let summary = serde_json::to_string_pretty(&created.summary())
            .context("failed to serialize summary")?;
        println!("{}", summary);
    } else {
        if args.verbose {
            println!("{:#}", created.metainfo);
        } else {
            println!("{}", created.metainfo);
        }
        println!("Written to {}", created.output.display());
    }
    Ok(())
}
