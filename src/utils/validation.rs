//! Input validation primitives.

use std::path::Path;

use crate::error::{Error, Result};

/// Require a path to exist and be a directory.
pub fn require_dir<'a>(path: &'a Path, field: &str) -> Result<&'a Path> {
    if path.is_dir() {
        return Ok(path);
    }

    let problem = if path.exists() {
        "Path is not a directory"
    } else {
        "Directory does not exist"
    };

    Err(Error::validation_invalid_argument(
        field,
        problem,
        Some(path.display().to_string()),
        None,
    ))
}
