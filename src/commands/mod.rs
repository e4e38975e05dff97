use i18n_sweep::io;
use i18n_sweep::Preset;

pub type CmdResult<T> = i18n_sweep::Result<(T, i32)>;

pub mod presets;
pub mod sweep;

/// Resolve a preset name or `--rules FILE` to a preset.
///
/// A rule-file preset is named after the file stem.
pub(crate) fn resolve_preset(
    preset: Option<&str>,
    rules: Option<&str>,
) -> i18n_sweep::Result<Preset> {
    match (preset, rules) {
        (Some(name), None) => i18n_sweep::presets::find(name),
        (None, Some(raw)) => {
            let path = io::expand_path(raw);
            let file = i18n_sweep::rules::load_rule_file(&path)?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| raw.to_string());
            Preset::from_rule_file(name, &file)
        }
        (Some(_), Some(_)) => Err(i18n_sweep::Error::validation_invalid_argument(
            "preset",
            "Use either a preset name or --rules, not both",
            None,
            None,
        )),
        (None, None) => Err(i18n_sweep::Error::validation_invalid_argument(
            "preset",
            "A preset name or --rules file is required",
            None,
            Some(i18n_sweep::presets::names()),
        )),
    }
}

pub(crate) fn run_text(command: crate::Commands) -> i18n_sweep::Result<(String, i32)> {
    match command {
        crate::Commands::Sweep(args) => sweep::run_text(args),
        _ => Err(i18n_sweep::Error::validation_invalid_argument(
            "output_mode",
            "Command does not support text output",
            None,
            None,
        )),
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $module:ident :: $handler:ident) => {
        crate::output::map_cmd_result_to_json($module::$handler($args))
    };
    ($args:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args))
    };
}

pub(crate) fn run_json(command: crate::Commands) -> (i18n_sweep::Result<serde_json::Value>, i32) {
    crate::tty::status("i18n-sweep is working...");

    match command {
        crate::Commands::Sweep(args) => dispatch!(args, sweep),
        crate::Commands::Presets(args) => dispatch!(args, presets),
        crate::Commands::Rules(args) => dispatch!(args, presets::run_rules),
    }
}
