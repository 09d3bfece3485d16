use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ConfigError, MakeError, Result};

/// Fails early when `path` exists and may not be replaced.
pub fn check_target(path: &Path, force: bool) -> Result<(), ConfigError> {
    if !force && path.exists() {
        return Err(ConfigError::OutputExists(path.to_path_buf()));
    }
    Ok(())
}

/// Writes `bytes` to `path` through a temporary file in the same directory,
/// so the target either holds the complete torrent or is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8], force: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| MakeError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| MakeError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| MakeError::io(tmp.path(), e))?;

    let persisted = if force {
        tmp.persist(path)
    } else {
        tmp.persist_noclobber(path)
    };
    persisted.map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            MakeError::Config(ConfigError::OutputExists(path.to_path_buf()))
        } else {
            MakeError::io(path, e.error)
        }
    })?;

    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
