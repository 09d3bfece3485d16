use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ConfigError;

fn tracker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(udp|https?)://\S+$").expect("tracker URL pattern is a valid regex")
    })
}

/// Ordered, validated tracker URLs. The first entry is the primary announce URL.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerList(Vec<String>);

impl TrackerList {
    /// Validates every URL and keeps them in the order given.
    pub fn parse<I, S>(urls: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls = urls
            .into_iter()
            .map(Into::into)
            .map(|url| {
                if tracker_pattern().is_match(&url) {
                    Ok(url)
                } else {
                    Err(ConfigError::InvalidTracker(url))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if urls.is_empty() {
            return Err(ConfigError::NoTrackers);
        }
        Ok(Self(urls))
    }

    pub fn primary(&self) -> &str {
        &self.0[0]
    }

    pub fn urls(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Everything needed to build one torrent, as handed over by the CLI layer.
#[derive(Debug, Clone)]
pub struct MakeConfig {
    /// File or directory to describe.
    pub source: PathBuf,
    pub trackers: TrackerList,
    pub comment: Option<String>,
    pub created_by: Option<String>,
    /// Explicit piece size as a power of two, 16..=26.
    pub piece_size_exponent: Option<u32>,
    /// Torrent name, defaults to the last component of `source`.
    pub name: Option<String>,
    /// Output file, defaults to `<name>.torrent`.
    pub output: Option<PathBuf>,
    pub private: bool,
    /// Overwrite an existing output file.
    pub force: bool,
    /// Fixed creation date in seconds since the epoch, defaults to now.
    pub creation_date: Option<i64>,
}

impl MakeConfig {
    pub fn new(source: impl Into<PathBuf>, trackers: TrackerList) -> Self {
        Self {
            source: source.into(),
            trackers,
            comment: None,
            created_by: None,
            piece_size_exponent: None,
            name: None,
            output: None,
            private: false,
            force: false,
            creation_date: None,
        }
    }
}
