//! Building a torrent from a file or directory.
//!
//! [`make_torrent`] runs the whole pipeline: validate the target, enumerate
//! the source, pick a piece length, hash, assemble and write.

mod config;
mod files;
mod hasher;
mod metainfo;
mod output;
mod piece_size;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{debug, info};

pub use config::{MakeConfig, TrackerList};
pub use files::FileSet;
pub use hasher::{hash_pieces, FsSource, PieceSource};
pub use metainfo::{FileInfo, InfoContent, TorrentInfo, TorrentMetainfo};
pub use piece_size::select_piece_length;

use crate::error::{ConfigError, Result};

/// A torrent that has been written to disk.
#[derive(Debug)]
pub struct CreatedTorrent {
    pub output: PathBuf,
    pub metainfo: TorrentMetainfo,
}

/// Machine readable description of a [`CreatedTorrent`].
#[derive(Debug, Serialize)]
pub struct TorrentSummary<'a> {
    pub name: &'a str,
    pub output: &'a Path,
    pub info_hash: String,
    pub trackers: Vec<String>,
    pub piece_length: u64,
    pub piece_count: usize,
    pub total_size: u64,
    pub private: bool,
    pub files: Vec<FileInfo>,
}

impl CreatedTorrent {
    pub fn summary(&self) -> TorrentSummary<'_> {
        let info = &self.metainfo.info;
        let files = match &info.content {
            InfoContent::Single { length } => vec![FileInfo {
                length: *length,
                path: vec![info.name.clone()],
            }],
            InfoContent::Multi { files } => files.clone(),
        };
        TorrentSummary {
            name: &info.name,
            output: &self.output,
            info_hash: hex::encode(self.metainfo.info_hash()),
            trackers: self.metainfo.trackers(),
            piece_length: info.piece_length,
            piece_count: info.total_pieces(),
            total_size: info.total_length(),
            private: info.private,
            files,
        }
    }
}

/// Torrent name: the explicit one, otherwise the last component of `source`.
pub fn resolve_name(config: &MakeConfig) -> Result<String, ConfigError> {
    if let Some(name) = &config.name {
        return Ok(name.clone());
    }

    let source = &config.source;
    let base = match source.file_name() {
        Some(name) => name.to_os_string(),
        // `.` or `..` have no file name of their own.
        None => source
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_os_string()))
            .ok_or_else(|| ConfigError::NoName(source.clone()))?,
    };
    base.into_string()
        .map_err(|_| ConfigError::NonUtf8Path(source.clone()))
}

/// Output path: the explicit one, otherwise `<name>.torrent`.
pub fn resolve_output(config: &MakeConfig, name: &str) -> PathBuf {
    config
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{name}.torrent")))
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Hashes `files` through `source` and assembles the metainfo.
pub fn build_metainfo<S, F>(
    config: &MakeConfig,
    name: String,
    files: &FileSet,
    source: &S,
    progress: F,
) -> Result<TorrentMetainfo>
where
    S: PieceSource,
    F: FnMut(u64, u64),
{
    let total_size = files.total_size();
    let piece_length = select_piece_length(total_size, config.piece_size_exponent)?;
    info!(
        "hashing {} bytes in {} files with {} byte pieces",
        total_size,
        files.files.len(),
        piece_length
    );

    let hashes = hash_pieces(source, &files.files, piece_length, progress)?;
    debug!("{} pieces", hashes.count());

    let trackers = &config.trackers;
    let announce_list = (trackers.len() > 1).then(|| {
        trackers
            .urls()
            .iter()
            .map(|url| vec![url.clone()])
            .collect()
    });

    Ok(TorrentMetainfo {
        announce: trackers.primary().to_string(),
        announce_list,
        comment: config.comment.clone(),
        created_by: config.created_by.clone(),
        creation_date: config.creation_date.unwrap_or_else(now),
        info: TorrentInfo {
            name,
            content: InfoContent::from_file_set(files),
            piece_length,
            pieces: hashes.concat(),
            private: config.private,
        },
    })
}

/// Builds the torrent described by `config` and writes it out.
///
/// Configuration problems are reported before any content is read, and
/// nothing is written unless hashing succeeded.
pub fn make_torrent<F>(config: &MakeConfig, progress: F) -> Result<CreatedTorrent>
where
    F: FnMut(u64, u64),
{
    if let Some(exp) = config.piece_size_exponent {
        select_piece_length(0, Some(exp))?;
    }
    let name = resolve_name(config)?;
    let target = resolve_output(config, &name);
    output::check_target(&target, config.force)?;

    let files = FileSet::scan(&config.source)?;
    let metainfo = build_metainfo(config, name, &files, &FsSource, progress)?;

    let bytes = metainfo.to_bytes();
    output::write_atomic(&target, &bytes, config.force)?;
    debug!("info hash {}", hex::encode(metainfo.info_hash()));

    Ok(CreatedTorrent {
        output: target,
        metainfo,
    })
}
