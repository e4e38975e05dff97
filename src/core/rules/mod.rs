//! Rule tables: ordered match/replace rules, split into common and per-target sequences.
//!
//! A `RuleTable` is built once (from a preset or a rule file) and handed to the
//! rewrite engine by reference. Nothing here mutates after construction.

mod file;

pub use file::{load_rule_file, parse_rule_file, RuleFile, RuleFileFormat, RuleSpec};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// What a rule looks for in the current text.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exact substring; every occurrence is replaced.
    Literal(String),
    /// Regular expression; every non-overlapping match is replaced.
    Pattern(Regex),
}

impl Matcher {
    pub fn as_str(&self) -> &str {
        match self {
            Matcher::Literal(s) => s,
            Matcher::Pattern(re) => re.as_str(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Matcher::Literal(_) => "literal",
            Matcher::Pattern(_) => "pattern",
        }
    }
}

/// A named pure function from regex captures to replacement text.
#[derive(Clone)]
pub struct Computed {
    name: String,
    func: Arc<dyn Fn(&Captures<'_>) -> String + Send + Sync>,
}

impl Computed {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, caps: &Captures<'_>) -> String {
        (self.func)(caps)
    }
}

impl fmt::Debug for Computed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed").field("name", &self.name).finish()
    }
}

/// What a rule puts in place of each match.
#[derive(Debug, Clone)]
pub enum Replacement {
    /// Inserted verbatim. `$` has no special meaning.
    Literal(String),
    /// `{{target}}` is substituted with the target identifier. Pattern rules
    /// additionally expand `$1` / `${name}` capture references. A reference
    /// followed by a letter, digit or `_` must be braced: `$1abc` names the
    /// group `1abc` and expands to nothing, `${1}abc` does what it looks like.
    Template(String),
    /// Function of the match; output is used verbatim. Pattern rules only.
    Computed(Computed),
}

impl Replacement {
    fn kind(&self) -> &'static str {
        match self {
            Replacement::Literal(_) => "literal",
            Replacement::Template(_) => "template",
            Replacement::Computed(_) => "computed",
        }
    }

    fn display(&self) -> &str {
        match self {
            Replacement::Literal(s) | Replacement::Template(s) => s,
            Replacement::Computed(c) => c.name(),
        }
    }
}

/// One `(matcher, replacement)` pair.
#[derive(Debug, Clone)]
pub struct Rule {
    matcher: Matcher,
    replacement: Replacement,
}

impl Rule {
    /// Build a rule from parts. A computed replacement needs a pattern matcher.
    pub fn new(matcher: Matcher, replacement: Replacement) -> Result<Self> {
        if let (Matcher::Literal(find), Replacement::Computed(c)) = (&matcher, &replacement) {
            return Err(Error::config_invalid_value(
                "replace",
                Some(c.name().to_string()),
                format!(
                    "Computed replacement requires a pattern matcher (literal matcher '{}')",
                    find
                ),
            ));
        }
        Ok(Self {
            matcher,
            replacement,
        })
    }

    /// Exact substring → verbatim text.
    pub fn literal(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            matcher: Matcher::Literal(find.into()),
            replacement: Replacement::Literal(replace.into()),
        }
    }

    /// Exact substring → text with `{{target}}` substituted.
    pub fn literal_template(find: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            matcher: Matcher::Literal(find.into()),
            replacement: Replacement::Template(template.into()),
        }
    }

    /// Regex → verbatim text.
    pub fn pattern(pattern: &str, replace: impl Into<String>) -> Result<Self> {
        Ok(Self {
            matcher: Matcher::Pattern(compile(pattern)?),
            replacement: Replacement::Literal(replace.into()),
        })
    }

    /// Regex → template with `{{target}}` and capture-group expansion.
    pub fn template(pattern: &str, template: impl Into<String>) -> Result<Self> {
        Ok(Self {
            matcher: Matcher::Pattern(compile(pattern)?),
            replacement: Replacement::Template(template.into()),
        })
    }

    /// Regex → computed text.
    pub fn computed(pattern: &str, computed: Computed) -> Result<Self> {
        Ok(Self {
            matcher: Matcher::Pattern(compile(pattern)?),
            replacement: Replacement::Computed(computed),
        })
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn replacement(&self) -> &Replacement {
        &self.replacement
    }

    /// Short label used in hit reports.
    pub fn label(&self) -> String {
        self.matcher.as_str().to_string()
    }

    pub fn view(&self) -> RuleView {
        RuleView {
            matcher: self.matcher.kind().to_string(),
            find: self.matcher.as_str().to_string(),
            replacement: self.replacement.kind().to_string(),
            replace: self.replacement.display().to_string(),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::validation_invalid_pattern(pattern, e))
}

/// Which rule sequence runs first for a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOrder {
    #[default]
    CommonFirst,
    TargetFirst,
}

/// Common rules, per-target rules, and the order they combine in.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    order: RuleOrder,
    common: Vec<Rule>,
    targets: BTreeMap<String, Vec<Rule>>,
    skip_if_contains: Option<String>,
    follow_up: Vec<String>,
}

impl RuleTable {
    pub fn new(order: RuleOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn with_common(mut self, rule: Rule) -> Self {
        self.common.push(rule);
        self
    }

    pub fn with_target(mut self, target: &str, rule: Rule) -> Self {
        self.targets
            .entry(target.to_string())
            .or_default()
            .push(rule);
        self
    }

    /// Files already containing `marker` are left alone.
    pub fn with_skip_guard(mut self, marker: impl Into<String>) -> Self {
        self.skip_if_contains = Some(marker.into());
        self
    }

    /// Manual step to print after a run that changed something.
    pub fn with_follow_up(mut self, step: impl Into<String>) -> Self {
        self.follow_up.push(step.into());
        self
    }

    pub fn order(&self) -> RuleOrder {
        self.order
    }

    pub fn target_rules(&self, target: &str) -> &[Rule] {
        self.targets.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn follow_up(&self) -> &[String] {
        &self.follow_up
    }

    pub fn skip_guard(&self) -> Option<&str> {
        self.skip_if_contains.as_deref()
    }

    /// True when the skip guard is set and `content` already contains it.
    pub fn should_skip(&self, content: &str) -> bool {
        self.skip_if_contains
            .as_deref()
            .is_some_and(|marker| content.contains(marker))
    }

    /// The full ordered rule sequence for one target.
    pub fn rules_for(&self, target: &str) -> Vec<&Rule> {
        let specific = self.target_rules(target);
        match self.order {
            RuleOrder::CommonFirst => self.common.iter().chain(specific).collect(),
            RuleOrder::TargetFirst => specific.iter().chain(&self.common).collect(),
        }
    }

    pub fn view(&self) -> TableView {
        TableView {
            order: self.order,
            skip_if_contains: self.skip_if_contains.clone(),
            common: self.common.iter().map(Rule::view).collect(),
            targets: self
                .targets
                .iter()
                .map(|(id, rules)| (id.clone(), rules.iter().map(Rule::view).collect()))
                .collect(),
            follow_up: self.follow_up.clone(),
        }
    }
}

// ============================================================================
// Serializable views (for `i18n-sweep rules`)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RuleView {
    pub matcher: String,
    pub find: String,
    pub replacement: String,
    pub replace: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub order: RuleOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_if_contains: Option<String>,
    pub common: Vec<RuleView>,
    pub targets: BTreeMap<String, Vec<RuleView>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub follow_up: Vec<String>,
}
