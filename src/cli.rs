use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;
use crate::torrent::{MakeConfig, TrackerList};

/// Create a BitTorrent metainfo (.torrent) file from a file or directory
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// File or directory to describe
    pub source: PathBuf,

    /// Tracker announce URL; repeat the flag for more trackers.
    /// The first one becomes the primary tracker
    #[arg(short, long = "announce", value_name = "URL", required = true)]
    pub announce: Vec<String>,

    /// Comment stored in the torrent
    #[arg(short, long)]
    pub comment: Option<String>,

    /// Creator string stored in the torrent
    #[arg(long, value_name = "TEXT", default_value = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")))]
    pub created_by: String,

    /// Leave out the `created by` field
    #[arg(long)]
    pub no_created_by: bool,

    /// Piece length as a power of two, 16 to 26 (default: chosen from the total size)
    #[arg(short = 'l', long = "piece-length", value_name = "EXP")]
    pub piece_length: Option<u32>,

    /// Torrent name (default: the last component of SOURCE)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output file (default: <name>.torrent)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Set the private flag
    #[arg(short, long)]
    pub private: bool,

    /// Overwrite the output file if it exists
    #[arg(short, long)]
    pub force: bool,

    /// Print a JSON summary instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Show debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates the arguments into the configuration the builder consumes.
    pub fn to_config(&self) -> Result<MakeConfig, ConfigError> {
        let trackers = TrackerList::parse(
            self.announce
                .iter()
                .map(|url| url.trim())
                .filter(|url| !url.is_empty()),
        )?;

        let mut config = MakeConfig::new(&self.source, trackers);
        config.comment = self.comment.clone();
        config.created_by = (!self.no_created_by).then(|| self.created_by.clone());
        config.piece_size_exponent = self.piece_length;
        config.name = self.name.clone();
        config.output = self.output.clone();
        config.private = self.private;
        config.force = self.force;
        Ok(config)
    }
}
