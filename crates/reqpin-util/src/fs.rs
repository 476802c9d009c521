use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::ReqpinError;

/// Path argument meaning "standard output" for output destinations.
pub const STDOUT_MARKER: &str = "-";

/// Read a file to a string, mapping failures to a [`ReqpinError::Io`] that
/// names the path.
pub fn read_to_string(path: &Path) -> Result<String, ReqpinError> {
    std::fs::read_to_string(path).map_err(|e| {
        ReqpinError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", path.display()),
        ))
    })
}

/// Resolve `target` relative to the directory containing `including_file`.
///
/// Absolute targets are returned unchanged.
pub fn resolve_relative(including_file: &Path, target: &str) -> PathBuf {
    let target = Path::new(target);
    if target.is_absolute() {
        return target.to_path_buf();
    }
    match including_file.parent() {
        Some(dir) => dir.join(target),
        None => target.to_path_buf(),
    }
}

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Write `contents` to `destination`, where [`STDOUT_MARKER`] means stdout.
///
/// Parent directories of file destinations are created on demand.
pub fn write_output(destination: &str, contents: &str) -> Result<(), ReqpinError> {
    if destination == STDOUT_MARKER {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(contents.as_bytes())?;
        lock.flush()?;
        return Ok(());
    }
    let path = Path::new(destination);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    tracing::debug!(path = %path.display(), bytes = contents.len(), "writing output");
    std::fs::write(path, contents)?;
    Ok(())
}
