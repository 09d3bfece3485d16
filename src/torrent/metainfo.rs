//! BitTorrent metainfo assembly.
//!
//! A torrent file (also known as a metainfo file) contains metadata about files to be shared
//! in the BitTorrent protocol. This module turns hashed content plus user supplied metadata
//! into that file.
//!
//! # Structure
//!
//! The torrent file is a bencoded dictionary containing:
//!
//! - `announce`: URL of the primary tracker
//! - `announce-list`: every tracker, one per tier (only with more than one tracker)
//! - `comment`, `created by`: free-form text, both optional
//! - `creation date`: seconds since the Unix epoch
//! - `info`: Dictionary containing core metadata about the file(s):
//!   - `length`: Total size in bytes (single-file torrents), or
//!   - `files`: list of `{length, path}` dictionaries (multi-file torrents)
//!   - `name`: Suggested filename/directory name
//!   - `piece length`: Number of bytes per piece
//!   - `pieces`: Concatenated SHA-1 hashes of all pieces
//!   - `private`: `1` when peers should only be obtained from the trackers

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use sha1::{Digest, Sha1};

use super::files::{FileSet, Layout};
use super::hasher::PieceDigest;
use crate::bencode::BValue;

/// A built BitTorrent metainfo file.
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentMetainfo {
    /// URL of the primary tracker
    pub announce: String,
    /// All trackers, one tier each, when more than one was given
    pub announce_list: Option<Vec<Vec<String>>>,
    pub comment: Option<String>,
    pub created_by: Option<String>,
    /// Seconds since the Unix epoch
    pub creation_date: i64,
    /// Core metadata about the torrent content
    pub info: TorrentInfo,
}

/// The `info` dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentInfo {
    pub name: String,
    pub content: InfoContent,
    pub piece_length: u64,
    pub pieces: Vec<u8>,
    pub private: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InfoContent {
    Single { length: u64 },
    Multi { files: Vec<FileInfo> },
}

/// One entry of the `files` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    pub length: u64,
    pub path: Vec<String>,
}

impl InfoContent {
    /// Describes `files` in their canonical order.
    pub fn from_file_set(files: &FileSet) -> Self {
        match files.layout {
            Layout::SingleFile => InfoContent::Single {
                length: files.total_size(),
            },
            Layout::MultiFile => InfoContent::Multi {
                files: files
                    .files
                    .iter()
                    .map(|f| FileInfo {
                        length: f.length,
                        path: f.path.clone(),
                    })
                    .collect(),
            },
        }
    }
}

impl TorrentMetainfo {
    /// Calculate the SHA-1 hash of the bencoded info dictionary.
    ///
    /// This hash uniquely identifies the torrent and is used in peer protocol
    /// handshakes and tracker communications.
    pub fn info_hash(&self) -> [u8; 20] {
        let encoded = BValue::from(&self.info).to_bytes();
        Sha1::digest(&encoded).into()
    }

    /// The complete bencoded torrent file.
    pub fn to_bytes(&self) -> Vec<u8> {
        BValue::from(self).to_bytes()
    }

    pub fn trackers(&self) -> Vec<String> {
        match &self.announce_list {
            Some(tiers) => tiers.iter().flatten().cloned().collect(),
            None => vec![self.announce.clone()],
        }
    }
}

impl TorrentInfo {
    pub fn piece_hashes(&self) -> Vec<PieceDigest> {
        self.pieces
            .chunks_exact(20)
            .filter_map(|chunk| chunk.try_into().ok())
            .collect()
    }

    pub fn total_pieces(&self) -> usize {
        self.pieces.len() / 20
    }

    pub fn total_length(&self) -> u64 {
        match &self.content {
            InfoContent::Single { length } => *length,
            InfoContent::Multi { files } => files.iter().map(|f| f.length).sum(),
        }
    }
}

impl From<&FileInfo> for BValue {
    fn from(file: &FileInfo) -> Self {
        let mut dict: BTreeMap<String, BValue> = BTreeMap::new();
        dict.insert("length".into(), file.length.into());
        dict.insert(
            "path".into(),
            BValue::List(file.path.iter().map(|c| c.as_str().into()).collect()),
        );
        BValue::Dict(dict)
    }
}

impl From<&TorrentInfo> for BValue {
    fn from(info: &TorrentInfo) -> Self {
        let mut dict: BTreeMap<String, BValue> = BTreeMap::new();
        match &info.content {
            InfoContent::Single { length } => {
                dict.insert("length".into(), (*length).into());
            }
            InfoContent::Multi { files } => {
                dict.insert(
                    "files".into(),
                    BValue::List(files.iter().map(BValue::from).collect()),
                );
            }
        }
        dict.insert("name".into(), info.name.as_str().into());
        dict.insert("piece length".into(), info.piece_length.into());
        dict.insert("pieces".into(), BValue::String(info.pieces.clone()));
        if info.private {
            dict.insert("private".into(), BValue::Integer(1));
        }
        BValue::Dict(dict)
    }
}

impl From<&TorrentMetainfo> for BValue {
    fn from(meta: &TorrentMetainfo) -> Self {
        let mut dict: BTreeMap<String, BValue> = BTreeMap::new();
        dict.insert("announce".into(), meta.announce.as_str().into());
        if let Some(tiers) = &meta.announce_list {
            let tiers = tiers
                .iter()
                .map(|tier| BValue::List(tier.iter().map(|url| url.as_str().into()).collect()))
                .collect();
            dict.insert("announce-list".into(), BValue::List(tiers));
        }
        if let Some(comment) = &meta.comment {
            dict.insert("comment".into(), comment.as_str().into());
        }
        if let Some(created_by) = &meta.created_by {
            dict.insert("created by".into(), created_by.as_str().into());
        }
        dict.insert("creation date".into(), meta.creation_date.into());
        dict.insert("info".into(), BValue::from(&meta.info));
        BValue::Dict(dict)
    }
}

impl fmt::Display for TorrentMetainfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.info.name)?;
        for tracker in self.trackers() {
            writeln!(f, "Tracker URL: {}", tracker)?;
        }
        if let Some(comment) = &self.comment {
            writeln!(f, "Comment: {}", comment)?;
        }
        writeln!(f, "Length: {}", self.info.total_length())?;
        if let InfoContent::Multi { files } = &self.info.content {
            writeln!(f, "Files:")?;
            for file in files {
                writeln!(f, "  {} ({} bytes)", file.path.join("/"), file.length)?;
            }
        }
        writeln!(f, "Private: {}", if self.info.private { "yes" } else { "no" })?;
        writeln!(f, "Info Hash: {}", hex::encode(self.info_hash()))?;
        writeln!(f, "Piece Length: {}", self.info.piece_length)?;
        write!(f, "Pieces: {}", self.info.total_pieces())?;
        if f.alternate() {
            writeln!(f)?;
            writeln!(f, "Piece Hashes:")?;
            for hash in self.info.piece_hashes() {
                writeln!(f, "{}", hex::encode(hash))?;
            }
        }
        Ok(())
    }
}
