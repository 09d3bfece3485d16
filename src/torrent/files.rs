//! Source enumeration.
//!
//! Produces the canonical file order that both the piece hasher and the
//! `files` table of the info dictionary follow: regular files sorted by the
//! bytes of their full path.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ConfigError, MakeError, Result};

/// One regular file to be described by the torrent.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Where to read the content from.
    pub disk_path: PathBuf,
    /// Components relative to the source root. For a single-file source this
    /// is just the file name.
    pub path: Vec<String>,
    /// Size in bytes at enumeration time.
    pub length: u64,
}

impl SourceFile {
    pub fn new(disk_path: impl Into<PathBuf>, path: Vec<String>, length: u64) -> Self {
        Self {
            disk_path: disk_path.into(),
            path,
            length,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// The source root is a file: the info dictionary carries `length`.
    SingleFile,
    /// The source root is a directory: the info dictionary carries `files`.
    MultiFile,
}

/// Files in canonical order together with the layout they were found in.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSet {
    pub layout: Layout,
    pub files: Vec<SourceFile>,
}

impl FileSet {
    /// Builds a set from already known entries, sorting them canonically.
    pub fn new(layout: Layout, mut files: Vec<SourceFile>) -> Self {
        sort_canonical(&mut files);
        Self { layout, files }
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.length).sum()
    }

    /// Walks `root` and collects every regular file below it.
    ///
    /// Symbolic links inside a directory tree are skipped.
    pub fn scan(root: &Path) -> Result<Self> {
        let meta = fs::metadata(root).map_err(|_| ConfigError::MissingSource(root.to_path_buf()))?;

        if meta.is_file() {
            let name = root
                .file_name()
                .ok_or_else(|| ConfigError::NoName(root.to_path_buf()))?;
            let name = name
                .to_str()
                .ok_or_else(|| ConfigError::NonUtf8Path(root.to_path_buf()))?;
            debug!("single file source {} ({} bytes)", root.display(), meta.len());
            return Ok(Self::new(
                Layout::SingleFile,
                vec![SourceFile::new(root, vec![name.to_string()], meta.len())],
            ));
        }

        let mut files = Vec::new();
        walk(root, &mut Vec::new(), &mut files)?;
        if files.is_empty() {
            return Err(ConfigError::EmptySource(root.to_path_buf()).into());
        }
        debug!("found {} files under {}", files.len(), root.display());
        Ok(Self::new(Layout::MultiFile, files))
    }
}

/// Depth-first traversal collecting regular files into `out`.
fn walk(dir: &Path, prefix: &mut Vec<String>, out: &mut Vec<SourceFile>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| MakeError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| MakeError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| MakeError::io(&path, e))?;

        let name = entry
            .file_name()
            .into_string()
            .map_err(|_| ConfigError::NonUtf8Path(path.clone()))?;

        if file_type.is_symlink() {
            warn!("skipping symbolic link {}", path.display());
        } else if file_type.is_dir() {
            prefix.push(name);
            walk(&path, prefix, out)?;
            prefix.pop();
        } else if file_type.is_file() {
            let length = entry.metadata().map_err(|e| MakeError::io(&path, e))?.len();
            let mut components = prefix.clone();
            components.push(name);
            out.push(SourceFile::new(path, components, length));
        } else {
            debug!("skipping special file {}", path.display());
        }
    }
    Ok(())
}

/// Sorts by the raw bytes of the full path, so `a-c` sorts before `a/b`.
fn sort_canonical(files: &mut [SourceFile]) {
    files.sort_by(|a, b| {
        a.disk_path
            .as_os_str()
            .as_encoded_bytes()
            .cmp(b.disk_path.as_os_str().as_encoded_bytes())
    });
}
