//! Piece length selection.
//!
//! An explicit exponent must lie in [`MIN_EXPONENT`]..=[`MAX_EXPONENT`]. Without
//! one the exponent starts at [`DEFAULT_EXPONENT`] and grows until pieces drop
//! to about [`TARGET_PIECES`] per torrent, never past [`MAX_AUTO_EXPONENT`].

use crate::error::ConfigError;

pub const MIN_EXPONENT: u32 = 16;
pub const MAX_EXPONENT: u32 = 26;
pub const DEFAULT_EXPONENT: u32 = 18;
pub const MAX_AUTO_EXPONENT: u32 = 24;
pub const TARGET_PIECES: u64 = 2048;

/// Returns the piece length in bytes for `total_size` bytes of content.
pub fn select_piece_length(total_size: u64, exponent: Option<u32>) -> Result<u64, ConfigError> {
    let exponent = match exponent {
        Some(exp) if (MIN_EXPONENT..=MAX_EXPONENT).contains(&exp) => exp,
        Some(exp) => return Err(ConfigError::PieceSizeOutOfRange(exp)),
        None => auto_exponent(total_size),
    };
    Ok(1 << exponent)
}

/// Grows while `2^exponent < total_size / TARGET_PIECES` in exact arithmetic,
/// i.e. while `2^exponent * TARGET_PIECES < total_size`.
fn auto_exponent(total_size: u64) -> u32 {
    let mut exponent = DEFAULT_EXPONENT;
    while exponent < MAX_AUTO_EXPONENT && (1u64 << exponent) * TARGET_PIECES < total_size {
        exponent += 1;
    }
    exponent
}
