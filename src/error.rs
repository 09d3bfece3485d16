use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems with the supplied configuration, all detected before any file
/// content is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one tracker URL is required")]
    NoTrackers,

    #[error("invalid tracker URL `{0}`: expected a udp://, http:// or https:// URL")]
    InvalidTracker(String),

    #[error("piece size exponent {0} is outside the allowed range 16..=26")]
    PieceSizeOutOfRange(u32),

    #[error("source path `{}` does not exist", .0.display())]
    MissingSource(PathBuf),

    #[error("source path `{}` contains no regular files", .0.display())]
    EmptySource(PathBuf),

    #[error("cannot derive a torrent name from `{}`", .0.display())]
    NoName(PathBuf),

    #[error("path `{}` is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("output file `{}` already exists (use --force to overwrite it)", .0.display())]
    OutputExists(PathBuf),
}

/// Everything that can abort building a torrent.
#[derive(Debug, Error)]
pub enum MakeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: expected {expected} bytes but read {actual}, was the file modified?", path.display())]
    SizeChanged {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
}

impl MakeError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MakeError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = MakeError> = std::result::Result<T, E>;
