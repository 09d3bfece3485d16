//! Piece hashing.
//!
//! All files are treated as one continuous byte stream in canonical order and
//! cut into `piece_length` windows. Windows may span file boundaries; the bytes
//! of an unfinished window are carried over in a [`PieceBuffer`] to the next
//! file. Every full window and the final non-empty remainder get one SHA-1.

use std::fs::File;
use std::io::{self, Read};

use sha1::{Digest, Sha1};
use tracing::{debug, trace};

use super::files::SourceFile;
use crate::error::{MakeError, Result};

/// SHA-1 digest of a single piece.
pub type PieceDigest = [u8; 20];

const READ_CHUNK: usize = 64 * 1024;

/// Opens the content of a [`SourceFile`] for sequential reading.
pub trait PieceSource {
    type Reader: Read;

    fn open(&self, file: &SourceFile) -> io::Result<Self::Reader>;
}

/// Reads files from disk via their `disk_path`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl PieceSource for FsSource {
    type Reader = File;

    fn open(&self, file: &SourceFile) -> io::Result<File> {
        File::open(&file.disk_path)
    }
}

/// Accumulates bytes towards the current piece, independent of how the
/// underlying readers buffer.
#[derive(Debug)]
pub struct PieceBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl PieceBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Bytes still missing before the piece is complete.
    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.bytes.len()
    }

    /// Appends as much of `data` as fits and returns how many bytes were taken.
    pub fn fill(&mut self, data: &[u8]) -> usize {
        let taken = data.len().min(self.remaining_capacity());
        self.bytes.extend_from_slice(&data[..taken]);
        taken
    }

    pub fn is_full(&self) -> bool {
        self.bytes.len() == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hashes the accumulated bytes and empties the buffer.
    pub fn digest(&mut self) -> PieceDigest {
        let digest = Sha1::digest(&self.bytes).into();
        self.bytes.clear();
        digest
    }
}

/// Result of hashing a whole file set.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceHashes {
    digests: Vec<PieceDigest>,
}

impl PieceHashes {
    #[cfg(test)]
    pub fn digests(&self) -> &[PieceDigest] {
        &self.digests
    }

    pub fn count(&self) -> usize {
        self.digests.len()
    }

    /// The digests concatenated, as stored under the `pieces` key.
    pub fn concat(&self) -> Vec<u8> {
        self.digests.concat()
    }
}

/// Number of pieces `total_size` bytes split into; zero bytes give zero pieces.
pub fn piece_count(total_size: u64, piece_length: u64) -> u64 {
    total_size.div_ceil(piece_length)
}

/// Hashes `files` in the order given.
///
/// `progress` is called with `(pieces_done, pieces_total)` after every piece.
pub fn hash_pieces<S, F>(
    source: &S,
    files: &[SourceFile],
    piece_length: u64,
    mut progress: F,
) -> Result<PieceHashes>
where
    S: PieceSource,
    F: FnMut(u64, u64),
{
    let capacity = piece_length as usize;
    let total_size: u64 = files.iter().map(|f| f.length).sum();
    let total = piece_count(total_size, piece_length);

    let mut buffer = PieceBuffer::new(capacity);
    let mut digests = Vec::with_capacity(total as usize);
    let mut chunk = vec![0u8; READ_CHUNK.min(capacity)];

    for file in files {
        trace!("hashing {}", file.disk_path.display());
        let mut reader = source
            .open(file)
            .map_err(|e| MakeError::io(&file.disk_path, e))?;

        let mut read_total = 0u64;
        loop {
            let want = chunk.len().min(buffer.remaining_capacity());
            let n = match reader.read(&mut chunk[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(MakeError::io(&file.disk_path, e)),
            };
            read_total += n as u64;
            buffer.fill(&chunk[..n]);

            if buffer.is_full() {
                digests.push(buffer.digest());
                progress(digests.len() as u64, total);
            }
        }

        if read_total != file.length {
            return Err(MakeError::SizeChanged {
                path: file.disk_path.clone(),
                expected: file.length,
                actual: read_total,
            });
        }
    }

    if !buffer.is_empty() {
        digests.push(buffer.digest());
        progress(digests.len() as u64, total);
    }

    debug!("hashed {} pieces of {} bytes", digests.len(), piece_length);
    Ok(PieceHashes { digests })
}
