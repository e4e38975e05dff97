//! Sweep driver: select, rewrite and persist every candidate under a root.
//!
//! Files are processed strictly one at a time. An I/O error aborts the run at
//! that file; files already written stay written.

use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::io;
use crate::presets::Preset;
use crate::rewrite::{self, RuleHit};
use crate::selector::{self, Candidate};

#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOptions {
    /// Compute and report changes without writing anything.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Changed,
    Unchanged,
    /// The table's skip guard was already present.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub target: String,
    /// Path relative to the sweep root.
    pub file: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<RuleHit>,
}

/// A file whose rewritten text would change again on a second pass.
#[derive(Debug, Clone, Serialize)]
pub struct SweepWarning {
    pub kind: String,
    pub target: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub preset: String,
    pub root: String,
    pub dry_run: bool,
    pub files: Vec<FileOutcome>,
    /// Target identifiers of changed files, in processing order.
    pub changed: Vec<String>,
    pub total_changed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SweepWarning>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub follow_up: Vec<String>,
}

/// Write `rewritten` over `path` when it differs from `original`.
///
/// Returns whether the content changed. With `write` false nothing touches disk.
pub fn persist(path: &Path, original: &str, rewritten: &str, write: bool) -> Result<bool> {
    if rewritten == original {
        return Ok(false);
    }
    if write {
        io::write_text(path, rewritten)?;
    }
    Ok(true)
}

/// Rewrite one candidate. Reads once, writes at most once.
pub fn sweep_file(
    preset: &Preset,
    candidate: &Candidate,
    root: &Path,
    options: SweepOptions,
    warnings: &mut Vec<SweepWarning>,
) -> Result<FileOutcome> {
    let file = candidate
        .path
        .strip_prefix(root)
        .unwrap_or(&candidate.path)
        .to_string_lossy()
        .to_string();

    let original = io::read_text(&candidate.path)?;

    if preset.table.should_skip(&original) {
        return Ok(FileOutcome {
            target: candidate.target.clone(),
            file,
            status: FileStatus::Skipped,
            hits: Vec::new(),
        });
    }

    let rules = preset.table.rules_for(&candidate.target);
    let result = rewrite::rewrite(&original, &rules, &candidate.target);
    let changed = persist(&candidate.path, &original, &result.text, !options.dry_run)?;

    // A rewrite that now trips the skip guard will not be touched again.
    if changed
        && !preset.table.should_skip(&result.text)
        && !rewrite::is_fixed_point(&result.text, &rules, &candidate.target)
    {
        warnings.push(SweepWarning {
            kind: "not_idempotent".to_string(),
            target: candidate.target.clone(),
            message: format!(
                "Rewritten {} still matches rules; a second run would change it again",
                file
            ),
        });
    }

    Ok(FileOutcome {
        target: candidate.target.clone(),
        file,
        status: if changed {
            FileStatus::Changed
        } else {
            FileStatus::Unchanged
        },
        hits: result.hits,
    })
}

/// Run `preset` over every candidate under `root`.
pub fn sweep(preset: &Preset, root: &Path, options: SweepOptions) -> Result<SweepReport> {
    sweep_with(preset, root, options, |_| {})
}

/// Like [`sweep`], handing each outcome to `on_file` as soon as its file is done.
///
/// When a file fails, the error's details gain `changed`: the targets already
/// rewritten (or, in a dry run, found to need rewriting) before the failure.
pub fn sweep_with<F>(
    preset: &Preset,
    root: &Path,
    options: SweepOptions,
    mut on_file: F,
) -> Result<SweepReport>
where
    F: FnMut(&FileOutcome),
{
    let candidates = selector::select(&preset.selector, root)?;
    log_status!("sweep", "{} candidate file(s) under {}", candidates.len(), root.display());

    let mut files = Vec::with_capacity(candidates.len());
    let mut changed: Vec<String> = Vec::new();
    let mut warnings = Vec::new();

    for candidate in &candidates {
        let outcome = sweep_file(preset, candidate, root, options, &mut warnings)
            .map_err(|e| e.with_detail("changed", &changed))?;
        log_status!("sweep", "{}", status_line(&outcome));
        on_file(&outcome);
        if outcome.status == FileStatus::Changed {
            changed.push(outcome.target.clone());
        }
        files.push(outcome);
    }

    let total_changed = changed.len();
    let follow_up = if total_changed > 0 {
        preset.table.follow_up().to_vec()
    } else {
        Vec::new()
    };

    Ok(SweepReport {
        preset: preset.name.clone(),
        root: root.display().to_string(),
        dry_run: options.dry_run,
        files,
        changed,
        total_changed,
        warnings,
        follow_up,
    })
}

/// One report line for a finished file.
pub fn status_line(outcome: &FileOutcome) -> String {
    match outcome.status {
        FileStatus::Changed => format!("✓ {}", outcome.target),
        FileStatus::Unchanged => format!("- {} (no changes)", outcome.target),
        FileStatus::Skipped => format!("- {} (already done)", outcome.target),
    }
}

/// Human-readable report: one line per file, a summary, then follow-up steps.
pub fn render_text(report: &SweepReport) -> String {
    let mut out = String::new();

    for outcome in &report.files {
        out.push_str(&status_line(outcome));
        out.push('\n');
    }
    out.push_str(&render_summary(report));

    out
}

/// Everything after the per-file lines: warnings, totals and next steps.
pub fn render_summary(report: &SweepReport) -> String {
    let mut out = String::new();

    for warning in &report.warnings {
        out.push_str(&format!("! {}: {}\n", warning.target, warning.message));
    }

    let verb = if report.dry_run { "Would rewrite" } else { "Rewrote" };
    out.push_str(&format!("\n{} {} file(s)\n", verb, report.total_changed));

    if !report.follow_up.is_empty() {
        out.push_str("\nNext steps:\n");
        for (i, step) in report.follow_up.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, step));
        }
    }

    out
}
