use clap::Args;

use i18n_sweep::io;
use i18n_sweep::sweep::{self, FileOutcome, SweepOptions, SweepReport};

use crate::commands::{resolve_preset, CmdResult};

#[derive(Args)]
pub struct SweepArgs {
    /// Built-in preset name (see `i18n-sweep presets`)
    #[arg(long, conflicts_with = "rules", required_unless_present = "rules")]
    pub preset: Option<String>,

    /// Rule file (.json or .toml) instead of a built-in preset
    #[arg(long, value_name = "FILE")]
    pub rules: Option<String>,

    /// Directory whose subdirectories hold the files to rewrite
    #[arg(long, value_name = "DIR")]
    pub root: String,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Print a plain-text report instead of JSON
    #[arg(long)]
    pub text: bool,
}

fn run_sweep<F>(args: &SweepArgs, on_file: F) -> i18n_sweep::Result<SweepReport>
where
    F: FnMut(&FileOutcome),
{
    let preset = resolve_preset(args.preset.as_deref(), args.rules.as_deref())?;
    let root = io::expand_path(&args.root);

    sweep::sweep_with(
        &preset,
        &root,
        SweepOptions {
            dry_run: args.dry_run,
        },
        on_file,
    )
}

pub fn run(args: SweepArgs) -> CmdResult<SweepReport> {
    Ok((run_sweep(&args, |_| {})?, 0))
}

/// Status lines go to stdout as each file finishes, so a run that stops
/// partway still shows what it already rewrote.
pub fn run_text(args: SweepArgs) -> i18n_sweep::Result<(String, i32)> {
    let report = run_sweep(&args, |outcome| println!("{}", sweep::status_line(outcome)))?;
    Ok((sweep::render_summary(&report), 0))
}
