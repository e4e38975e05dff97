//! Rule files: rule tables declared in JSON or TOML instead of built in.
//!
//! ```json
//! {
//!   "order": "target_first",
//!   "selector": { "kind": "glob", "pattern": "*/page.tsx" },
//!   "common": [
//!     { "find": ">复制<", "replace": ">{t(\"common.copy\")}<" }
//!   ],
//!   "targets": {
//!     "hash": [
//!       { "find": "placeholder=\"([^\"]*)\"", "regex": true, "template": true,
//!         "replace": "placeholder={t(\"toolPages.{{target}}.input\")}" }
//!     ]
//!   }
//! }
//! ```
//!
//! Computed replacements cannot be expressed in a rule file.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::{Rule, RuleOrder, RuleTable};
use crate::error::{Error, Result};
use crate::io;
use crate::selector::Selector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFileFormat {
    Json,
    Toml,
}

impl RuleFileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(RuleFileFormat::Json),
            Some("toml") => Ok(RuleFileFormat::Toml),
            other => Err(Error::validation_invalid_argument(
                "rules",
                format!(
                    "Unsupported rule file extension '{}'. Use .json or .toml",
                    other.unwrap_or("")
                ),
                Some(path.display().to_string()),
                None,
            )),
        }
    }
}

/// One rule as written in a rule file.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    pub find: String,
    pub replace: String,
    /// Treat `find` as a regular expression.
    #[serde(default)]
    pub regex: bool,
    /// Substitute `{{target}}` (and capture groups, for regex rules) in `replace`.
    /// Write `${1}` rather than `$1` when the reference is followed by a word character.
    #[serde(default)]
    pub template: bool,
}

impl RuleSpec {
    fn to_rule(&self) -> Result<Rule> {
        match (self.regex, self.template) {
            (false, false) => Ok(Rule::literal(&self.find, &self.replace)),
            (false, true) => Ok(Rule::literal_template(&self.find, &self.replace)),
            (true, false) => Rule::pattern(&self.find, &self.replace),
            (true, true) => Rule::template(&self.find, &self.replace),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: RuleOrder,
    pub selector: Selector,
    #[serde(default)]
    pub skip_if_contains: Option<String>,
    #[serde(default)]
    pub follow_up: Vec<String>,
    #[serde(default)]
    pub common: Vec<RuleSpec>,
    #[serde(default)]
    pub targets: BTreeMap<String, Vec<RuleSpec>>,
}

impl RuleFile {
    /// Compile every rule. Fails on the first invalid pattern.
    pub fn build(&self) -> Result<RuleTable> {
        let mut table = RuleTable::new(self.order);

        for spec in &self.common {
            table = table.with_common(spec.to_rule()?);
        }
        for (target, specs) in &self.targets {
            for spec in specs {
                table = table.with_target(target, spec.to_rule()?);
            }
        }
        if let Some(marker) = &self.skip_if_contains {
            table = table.with_skip_guard(marker.clone());
        }
        for step in &self.follow_up {
            table = table.with_follow_up(step.clone());
        }

        Ok(table)
    }
}

pub fn parse_rule_file(content: &str, format: RuleFileFormat, source: &str) -> Result<RuleFile> {
    match format {
        RuleFileFormat::Json => {
            serde_json::from_str(content).map_err(|e| Error::config_invalid_json(source, e))
        }
        RuleFileFormat::Toml => {
            toml::from_str(content).map_err(|e| Error::config_invalid_toml(source, e))
        }
    }
}

pub fn load_rule_file(path: &Path) -> Result<RuleFile> {
    let format = RuleFileFormat::from_path(path)?;
    let content = io::read_text(path)?;
    parse_rule_file(&content, format, &path.display().to_string())
}
