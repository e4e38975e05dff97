use clap::Args;
use serde::Serialize;

use i18n_sweep::rules::{RuleOrder, TableView};
use i18n_sweep::Selector;

use crate::commands::{resolve_preset, CmdResult};

#[derive(Args)]
pub struct PresetsArgs {}

#[derive(Args)]
pub struct RulesArgs {
    /// Built-in preset name
    #[arg(conflicts_with = "rules", required_unless_present = "rules")]
    pub preset: Option<String>,

    /// Rule file (.json or .toml) to show instead
    #[arg(long, value_name = "FILE")]
    pub rules: Option<String>,
}

#[derive(Serialize)]
pub struct PresetSummary {
    pub name: String,
    pub description: String,
    pub selector: Selector,
    pub order: RuleOrder,
}

#[derive(Serialize)]
pub struct PresetsOutput {
    pub presets: Vec<PresetSummary>,
}

#[derive(Serialize)]
pub struct RulesOutput {
    pub name: String,
    pub description: String,
    pub selector: Selector,
    pub table: TableView,
}

pub fn run(_args: PresetsArgs) -> CmdResult<PresetsOutput> {
    let presets = i18n_sweep::presets::all()?
        .into_iter()
        .map(|p| PresetSummary {
            order: p.table.order(),
            name: p.name,
            description: p.description,
            selector: p.selector,
        })
        .collect();

    Ok((PresetsOutput { presets }, 0))
}

pub fn run_rules(args: RulesArgs) -> CmdResult<RulesOutput> {
    let preset = resolve_preset(args.preset.as_deref(), args.rules.as_deref())?;

    Ok((
        RulesOutput {
            table: preset.table.view(),
            name: preset.name,
            description: preset.description,
            selector: preset.selector,
        },
        0,
    ))
}
