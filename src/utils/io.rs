//! File I/O primitives with consistent error handling.
//!
//! All text is read and written as UTF-8. A file that is not valid UTF-8
//! fails the read like any other I/O error.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })
}

/// Overwrite a file with UTF-8 text.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("write {}", path.display())))
    })
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}
