//! File selection: which files under a root get rewritten.
//!
//! Every candidate lives one directory below the root, and the directory's
//! name is the candidate's target identifier.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::validation;

/// How candidate files are discovered under a root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selector {
    /// Glob relative to the root, e.g. `*/page.tsx`.
    Glob { pattern: String },
    /// Immediate subdirectories holding `file_name`, minus `exclude`.
    Subdirectories {
        file_name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude: Vec<String>,
    },
}

impl Selector {
    pub fn glob(pattern: impl Into<String>) -> Self {
        Selector::Glob {
            pattern: pattern.into(),
        }
    }

    pub fn subdirectories(file_name: impl Into<String>) -> Self {
        Selector::Subdirectories {
            file_name: file_name.into(),
            exclude: Vec::new(),
        }
    }

    pub fn excluding<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            Selector::Subdirectories {
                file_name,
                mut exclude,
            } => {
                exclude.extend(ids.into_iter().map(Into::into));
                Selector::Subdirectories { file_name, exclude }
            }
            glob => glob,
        }
    }
}

/// A file to rewrite and the target identifier it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub target: String,
}

/// Enumerate candidates under `root`, sorted by target.
///
/// Entries that are not directories, and directories without the required
/// file, are skipped without error.
pub fn select(selector: &Selector, root: &Path) -> Result<Vec<Candidate>> {
    validation::require_dir(root, "root")?;

    let mut candidates = match selector {
        Selector::Glob { pattern } => select_glob(root, pattern)?,
        Selector::Subdirectories { file_name, exclude } => {
            select_subdirectories(root, file_name, exclude)?
        }
    };

    candidates.sort_by(|a, b| a.target.cmp(&b.target).then_with(|| a.path.cmp(&b.path)));
    Ok(candidates)
}

fn select_glob(root: &Path, pattern: &str) -> Result<Vec<Candidate>> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let full = format!("{}/{}", escaped_root.trim_end_matches('/'), pattern);

    let paths = glob::glob(&full).map_err(|e| {
        Error::validation_invalid_argument(
            "selector.pattern",
            e.to_string(),
            Some(pattern.to_string()),
            None,
        )
    })?;

    let mut candidates = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("glob {}", full)))
        })?;
        if !path.is_file() {
            continue;
        }
        let Some(target) = target_of(&path) else {
            continue;
        };
        candidates.push(Candidate { path, target });
    }

    Ok(candidates)
}

fn select_subdirectories(
    root: &Path,
    file_name: &str,
    exclude: &[String],
) -> Result<Vec<Candidate>> {
    let entries = fs::read_dir(root).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("list {}", root.display())))
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("list {}", root.display())))
        })?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }

        let target = entry.file_name().to_string_lossy().to_string();
        if exclude.iter().any(|id| id == &target) {
            continue;
        }

        let path = dir.join(file_name);
        if !path.is_file() {
            continue;
        }
        candidates.push(Candidate { path, target });
    }

    Ok(candidates)
}

fn target_of(path: &Path) -> Option<String> {
    path.parent()?
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tools_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for id in ["hash", "base64", "aes"] {
            fs::create_dir(root.join(id)).unwrap();
            fs::write(root.join(id).join("page.tsx"), "export default function P() {}\n")
                .unwrap();
        }
        // Directory without the page file.
        fs::create_dir(root.join("empty")).unwrap();
        fs::write(root.join("empty").join("layout.tsx"), "").unwrap();
        // Loose file at the root.
        fs::write(root.join("page.tsx"), "").unwrap();
        // Directory named like the required file.
        fs::create_dir_all(root.join("odd").join("page.tsx")).unwrap();
        dir
    }

    fn targets(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.target.as_str()).collect()
    }

    #[test]
    fn glob_selects_one_level_and_sorts() {
        let dir = tools_tree();
        let found = select(&Selector::glob("*/page.tsx"), dir.path()).unwrap();

        assert_eq!(targets(&found), vec!["aes", "base64", "hash"]);
        assert!(found.iter().all(|c| c.path.is_file()));
    }

    #[test]
    fn subdirectories_skip_non_dirs_and_missing_files() {
        let dir = tools_tree();
        let found = select(&Selector::subdirectories("page.tsx"), dir.path()).unwrap();

        assert_eq!(targets(&found), vec!["aes", "base64", "hash"]);
        assert_eq!(found[2].path, dir.path().join("hash").join("page.tsx"));
    }

    #[test]
    fn subdirectories_honour_exclusions() {
        let dir = tools_tree();
        let selector = Selector::subdirectories("page.tsx").excluding(["base64", "hash"]);
        let found = select(&selector, dir.path()).unwrap();

        assert_eq!(targets(&found), vec!["aes"]);
    }

    #[test]
    fn empty_root_selects_nothing() {
        let dir = TempDir::new().unwrap();
        let found = select(&Selector::glob("*/page.tsx"), dir.path()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn missing_root_is_a_validation_error() {
        let err = select(
            &Selector::subdirectories("page.tsx"),
            Path::new("/nonexistent/src/app/tools"),
        )
        .unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn excluding_has_no_effect_on_glob() {
        let selector = Selector::glob("*/page.tsx").excluding(["hash"]);
        assert_eq!(selector, Selector::glob("*/page.tsx"));
    }

    #[test]
    fn selector_deserializes_from_tagged_json() {
        let selector: Selector = serde_json::from_str(
            r#"{ "kind": "subdirectories", "file_name": "page.tsx", "exclude": ["hash"] }"#,
        )
        .unwrap();
        assert_eq!(
            selector,
            Selector::subdirectories("page.tsx").excluding(["hash"])
        );
    }
}
