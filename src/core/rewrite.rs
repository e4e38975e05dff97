//! Rewrite engine: apply an ordered rule sequence to one file's text.
//!
//! Rules run one after another against the *current* text, so a later rule
//! sees what earlier rules produced. Overlaps between rules are resolved by
//! that order alone. A rule whose replacement can be matched again (by itself
//! or a later rule) makes the result order-dependent and non-idempotent;
//! `is_fixed_point` detects that after the fact but nothing corrects it.

use regex::{Captures, NoExpand};
use serde::Serialize;
use std::borrow::Cow;

use crate::rules::{Matcher, Replacement, Rule, RuleTable};
use crate::template::{self, TemplateVars};

/// How many times one rule fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    pub rule: String,
    pub hits: usize,
}

/// Result of one rewrite pass.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub text: String,
    /// Rules that matched at least once, in application order.
    pub hits: Vec<RuleHit>,
}

impl Rewrite {
    pub fn total_hits(&self) -> usize {
        self.hits.iter().map(|h| h.hits).sum()
    }
}

/// Apply `rules` in order to `text` for `target`.
pub fn rewrite(text: &str, rules: &[&Rule], target: &str) -> Rewrite {
    let mut current = text.to_string();
    let mut hits = Vec::new();

    for rule in rules {
        let (next, count) = apply_rule(rule, &current, target);
        if count > 0 {
            hits.push(RuleHit {
                rule: rule.label(),
                hits: count,
            });
            current = next.into_owned();
        }
    }

    Rewrite {
        text: current,
        hits,
    }
}

/// Rewrite with the table's rule sequence for `target`.
pub fn rewrite_with_table(text: &str, table: &RuleTable, target: &str) -> Rewrite {
    rewrite(text, &table.rules_for(target), target)
}

/// True when another pass over `text` would change nothing.
pub fn is_fixed_point(text: &str, rules: &[&Rule], target: &str) -> bool {
    rewrite(text, rules, target).text == text
}

fn apply_rule<'t>(rule: &Rule, text: &'t str, target: &str) -> (Cow<'t, str>, usize) {
    match rule.matcher() {
        Matcher::Literal(find) => {
            if find.is_empty() {
                return (Cow::Borrowed(text), 0);
            }
            let count = text.matches(find.as_str()).count();
            if count == 0 {
                return (Cow::Borrowed(text), 0);
            }
            let with = match rule.replacement() {
                Replacement::Literal(s) => Cow::Borrowed(s.as_str()),
                Replacement::Template(t) => Cow::Owned(render_target(t, target, false)),
                // Rule::new refuses this pairing.
                Replacement::Computed(_) => return (Cow::Borrowed(text), 0),
            };
            (Cow::Owned(text.replace(find.as_str(), &with)), count)
        }
        Matcher::Pattern(regex) => {
            let count = regex.find_iter(text).count();
            if count == 0 {
                return (Cow::Borrowed(text), 0);
            }
            let replaced = match rule.replacement() {
                Replacement::Literal(s) => regex.replace_all(text, NoExpand(s)),
                Replacement::Template(t) => {
                    let expanded = render_target(t, target, true);
                    regex.replace_all(text, expanded.as_str())
                }
                Replacement::Computed(computed) => {
                    regex.replace_all(text, |caps: &Captures<'_>| computed.call(caps))
                }
            };
            (replaced, count)
        }
    }
}

fn render_target(template_text: &str, target: &str, for_expansion: bool) -> String {
    if !template::is_present(template_text, TemplateVars::TARGET) {
        return template_text.to_string();
    }
    let value = if for_expansion {
        template::escape_expansion(target)
    } else {
        target.to_string()
    };
    template::render(template_text, &[(TemplateVars::TARGET, value.as_str())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Computed, RuleOrder};

    fn run(text: &str, rules: &[Rule], target: &str) -> Rewrite {
        let refs: Vec<&Rule> = rules.iter().collect();
        rewrite(text, &refs, target)
    }

    #[test]
    fn no_match_is_a_no_op() {
        let rules = vec![
            Rule::literal(">复制<", ">{t(\"common.copy\")}<"),
            Rule::pattern(r#""压缩""#, "{t(\"common.compress\")}").unwrap(),
        ];
        let text = "<div className=\"p-4\">hello</div>\n";
        let out = run(text, &rules, "hash");

        assert_eq!(out.text, text);
        assert!(out.hits.is_empty());
    }

    #[test]
    fn single_literal_occurrence_preserves_surroundings() {
        let rules = vec![Rule::literal(
            "placeholder=\"输入文本...\"",
            "placeholder={t(\"common.inputPlaceholder\")}",
        )];
        let text = "<textarea\n  className=\"w-full\"\n  placeholder=\"输入文本...\"\n/>\n";
        let out = run(text, &rules, "base64");

        assert_eq!(
            out.text,
            "<textarea\n  className=\"w-full\"\n  placeholder={t(\"common.inputPlaceholder\")}\n/>\n"
        );
        assert_eq!(out.total_hits(), 1);
    }

    #[test]
    fn literal_replaces_every_occurrence() {
        let rules = vec![Rule::literal(">清空<", ">{t(\"common.clear\")}<")];
        let out = run("<b>清空</b><i>清空</i>", &rules, "x");

        assert_eq!(out.text, "<b>{t(\"common.clear\")}</b><i>{t(\"common.clear\")}</i>");
        assert_eq!(out.hits, vec![RuleHit { rule: ">清空<".into(), hits: 2 }]);
    }

    #[test]
    fn literal_replacement_keeps_dollar_signs() {
        let rules = vec![Rule::pattern("price", "$1 cost").unwrap()];
        let out = run("price", &rules, "x");
        assert_eq!(out.text, "$1 cost");
    }

    #[test]
    fn later_rules_see_earlier_output() {
        let rules = vec![Rule::literal("a", "b"), Rule::literal("b", "c")];
        let out = run("a", &rules, "x");
        assert_eq!(out.text, "c");
    }

    #[test]
    fn template_substitutes_target_and_groups() {
        let rules = vec![Rule::template(
            r#"placeholder="([^"]*[\x{4e00}-\x{9fa5}][^"]*)""#,
            r#"placeholder={t("toolPages.{{target}}.PLACEHOLDER_KEY")} /* "${1}" */"#,
        )
        .unwrap()];
        let out = run(r#"<input placeholder="输入数字" />"#, &rules, "bmi-calculator");

        assert_eq!(
            out.text,
            r#"<input placeholder={t("toolPages.bmi-calculator.PLACEHOLDER_KEY")} /* "输入数字" */ />"#
        );
    }

    #[test]
    fn template_target_with_dollar_is_not_expanded() {
        let rules = vec![Rule::template("ID", "{{target}}").unwrap()];
        let out = run("ID", &rules, "a$1b");
        assert_eq!(out.text, "a$1b");
    }

    #[test]
    fn literal_template_substitutes_target() {
        let rules = vec![Rule::literal_template("<Tool>", "<Tool id=\"{{target}}\">")];
        let out = run("<Tool>", &rules, "uuid-generator");
        assert_eq!(out.text, "<Tool id=\"uuid-generator\">");
    }

    #[test]
    fn computed_receives_full_match() {
        let upper = Computed::new("upper", |caps| caps[0].to_uppercase());
        let rules = vec![Rule::computed(r"\bok\b", upper).unwrap()];
        let out = run("ok then ok", &rules, "x");

        assert_eq!(out.text, "OK then OK");
        assert_eq!(out.total_hits(), 2);
    }

    #[test]
    fn rewritten_text_is_a_fixed_point_when_rules_cannot_rematch() {
        let table = RuleTable::new(RuleOrder::CommonFirst)
            .with_common(Rule::literal(">下载<", ">{t(\"common.download\")}<"));
        let first = rewrite_with_table("<a>下载</a>", &table, "x");

        assert!(is_fixed_point(&first.text, &table.rules_for("x"), "x"));
        let second = rewrite_with_table(&first.text, &table, "x");
        assert_eq!(second.text, first.text);
        assert!(second.hits.is_empty());
    }

    #[test]
    fn self_matching_replacement_is_not_a_fixed_point() {
        let rules = vec![Rule::literal("复制", "复制结果")];
        let refs: Vec<&Rule> = rules.iter().collect();
        let first = rewrite("复制", &refs, "x");

        assert_eq!(first.text, "复制结果");
        assert!(!is_fixed_point(&first.text, &refs, "x"));
    }

    #[test]
    fn empty_literal_never_matches() {
        let rules = vec![Rule::literal("", "x")];
        let out = run("abc", &rules, "t");
        assert_eq!(out.text, "abc");
        assert!(out.hits.is_empty());
    }
}
