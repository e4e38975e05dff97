//! Built-in presets: rule tables bundled with the file selector they run over.
//!
//! Each preset targets a Next.js-style tools tree (`<root>/<tool-id>/page.tsx`)
//! and rewrites hardcoded Chinese UI strings into `t("...")` lookups.

use regex::Captures;

use crate::error::{Error, Result};
use crate::rules::{Computed, Rule, RuleFile, RuleOrder, RuleTable};
use crate::selector::Selector;

/// A named rule table plus the selector it runs with.
#[derive(Debug, Clone)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub selector: Selector,
    pub table: RuleTable,
}

impl Preset {
    /// Build an ad-hoc preset from a loaded rule file.
    pub fn from_rule_file(name: impl Into<String>, file: &RuleFile) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            description: file.description.clone().unwrap_or_default(),
            selector: file.selector.clone(),
            table: file.build()?,
        })
    }
}

pub const COMMON_STRINGS: &str = "common-strings";
pub const TOOL_LABELS: &str = "tool-labels";
pub const TEXT_LITERALS: &str = "text-literals";
pub const USE_TRANSLATION: &str = "use-translation";

pub const PRESET_NAMES: &[&str] = &[COMMON_STRINGS, TOOL_LABELS, TEXT_LITERALS, USE_TRANSLATION];

pub fn names() -> Vec<String> {
    PRESET_NAMES.iter().map(|n| n.to_string()).collect()
}

pub fn find(name: &str) -> Result<Preset> {
    match name {
        COMMON_STRINGS => common_strings(),
        TOOL_LABELS => tool_labels(),
        TEXT_LITERALS => text_literals(),
        USE_TRANSLATION => use_translation(),
        other => Err(Error::preset_not_found(other, names())),
    }
}

pub fn all() -> Result<Vec<Preset>> {
    PRESET_NAMES.iter().map(|name| find(name)).collect()
}

// ============================================================================
// common-strings
// ============================================================================

/// Placeholder and image-compress label patterns shared by every tool page.
///
/// Placeholder patterns stop at the text and leave the closing quote in place.
fn common_strings() -> Result<Preset> {
    const COMMON: &[(&str, &str)] = &[
        (r#"placeholder="输入文本\.\.\."#, r#"placeholder={t("common.inputPlaceholder")}"#),
        (r#"placeholder="输入要转换的文本\.\.\."#, r#"placeholder={t("common.inputPlaceholder")}"#),
        (r#"placeholder="结果\.\.\."#, r#"placeholder={t("common.resultPlaceholder")}"#),
        (r#"placeholder="输入 URL 或文本\.\.\."#, r#"placeholder={t("common.inputPlaceholder")}"#),
        (r#"placeholder="输入文本或 URL"#, r#"placeholder={t("toolPages.qrcode.inputPlaceholder")}"#),
        (r#"placeholder="搜索状态码或名称\.\.\."#, r#"placeholder={t("toolPages.http-status.searchPlaceholder")}"#),
        (r#"placeholder="粘贴 Base64 字符串\.\.\."#, r#"placeholder={t("toolPages.image-to-base64.base64Placeholder")}"#),
        (r#"placeholder="Key（16/24/32 字符）"#, r#"placeholder={t("toolPages.aes.keyPlaceholder")}"#),
        (r#"placeholder="天数"#, r#"placeholder={t("toolPages.date-calculator.daysPlaceholder")}"#),
        (r#""压缩""#, r#"{t("common.compress")}"#),
        (r#""质量:"#, r#"{t("toolPages.image-compress.quality")}:"#),
        (r#""节省:"#, r#"{t("toolPages.image-compress.saved")}:"#),
        (r#""下载压缩图片""#, r#"{t("toolPages.image-compress.downloadCompressed")}"#),
        (r#""点击或拖拽上传图片""#, r#"{t("toolPages.image-compress.uploadHint")}"#),
        (r#""支持 JPG、PNG、WebP""#, r#"{t("toolPages.image-compress.supportFormats")}"#),
    ];

    let mut table = RuleTable::new(RuleOrder::CommonFirst);
    for (pattern, replace) in COMMON {
        table = table.with_common(Rule::pattern(pattern, *replace)?);
    }
    table = table.with_target(
        "qrcode",
        Rule::pattern(
            r#"placeholder="输入文本或 URL"#,
            r#"placeholder={t("toolPages.qrcode.inputPlaceholder")}"#,
        )?,
    );

    Ok(Preset {
        name: COMMON_STRINGS.to_string(),
        description: "Shared placeholder and image-compress label patterns".to_string(),
        selector: Selector::glob("*/page.tsx"),
        table,
    })
}

// ============================================================================
// tool-labels
// ============================================================================

/// Button words matched between `>`/`"` and `<`/`"`.
const BUTTON_LABELS: &[(&str, &str)] = &[
    ("转换", "convert"),
    ("生成", "generate"),
    ("解析", "parse"),
    ("保存", "save"),
];

/// Per-tool quoted labels, applied before the shared rules.
const TOOL_LABEL_TARGETS: &[(&str, &[(&str, &str)])] = &[
    (
        "case-converter",
        &[
            (r#""大写""#, r#"{t("toolPages.case-converter.uppercase")}"#),
            (r#""小写""#, r#"{t("toolPages.case-converter.lowercase")}"#),
            (r#""首字母大写""#, r#"{t("toolPages.case-converter.capitalize")}"#),
            (r#""驼峰""#, r#"{t("toolPages.case-converter.camelCase")}"#),
        ],
    ),
    (
        "chinese-converter",
        &[
            (r#""繁简转换工具""#, r#"{t("toolPages.chinese-converter.title")}"#),
            (r#""转换模式""#, r#"{t("toolPages.chinese-converter.mode")}"#),
            (r#""输入""#, r#"{t("common.input")}"#),
            (r#""输出""#, r#"{t("common.output")}"#),
        ],
    ),
    (
        "image-crop",
        &[
            (r#""宽""#, r#"{t("toolPages.image-crop.width")}"#),
            (r#""高""#, r#"{t("toolPages.image-crop.height")}"#),
        ],
    ),
    (
        "password-generator",
        &[
            (r#""弱""#, r#"{t("toolPages.password-generator.weak")}"#),
            (r#""中""#, r#"{t("toolPages.password-generator.medium")}"#),
            (r#""强""#, r#"{t("toolPages.password-generator.strong")}"#),
        ],
    ),
];

/// Rewrites `word` inside the delimited match: to the `t()` marker when the
/// match already contains `{`, otherwise to the bare key followed by `"`.
fn button_label(word: &'static str, key: &'static str) -> Result<Rule> {
    let pattern = format!(r#"[">]{}[<"]"#, regex::escape(word));
    let marker = format!(r#"{{t("common.{}")}}"#, key);
    let fallback = format!(r#"{}""#, key);

    let computed = Computed::new(format!("button-label:{}", key), move |caps: &Captures<'_>| {
        let whole = &caps[0];
        let with = if whole.contains('{') { &marker } else { &fallback };
        whole.replace(word, with)
    });

    Rule::computed(&pattern, computed)
}

fn tool_labels() -> Result<Preset> {
    let mut table = RuleTable::new(RuleOrder::TargetFirst);

    for (target, rules) in TOOL_LABEL_TARGETS {
        for (pattern, replace) in *rules {
            table = table.with_target(target, Rule::pattern(pattern, *replace)?);
        }
    }

    for (word, key) in BUTTON_LABELS {
        table = table.with_common(button_label(*word, *key)?);
    }

    table = table
        .with_common(Rule::template(
            r#"placeholder="([^"]*[\x{4e00}-\x{9fa5}][^"]*)""#,
            r#"placeholder={t("toolPages.{{target}}.PLACEHOLDER_KEY")} /* TODO: 翻译 "${1}" */"#,
        )?)
        .with_follow_up("Review placeholders marked TODO and give each a real translation key")
        .with_follow_up("Add the missing keys to the i18n locale files")
        .with_follow_up("Run `npm run build` to verify");

    Ok(Preset {
        name: TOOL_LABELS.to_string(),
        description: "Per-tool quoted labels, shared button words and placeholder markers"
            .to_string(),
        selector: Selector::glob("*/page.tsx"),
        table,
    })
}

// ============================================================================
// text-literals
// ============================================================================

const TEXT_LITERALS_COMMON: &[(&str, &str)] = &[
    (r#"placeholder="输入文本...""#, r#"placeholder={t("common.inputPlaceholder")}"#),
    (r#"placeholder="结果...""#, r#"placeholder={t("common.resultPlaceholder")}"#),
    (">复制<", r#">{t("common.copy")}<"#),
    (">复制结果<", r#">{t("common.copyResult")}<"#),
    (">编码<", r#">{t("common.encode")}<"#),
    (">解码<", r#">{t("common.decode")}<"#),
    (">格式化<", r#">{t("common.format")}<"#),
    (">压缩<", r#">{t("common.compress")}<"#),
    (">生成<", r#">{t("common.generate")}<"#),
    (">清空<", r#">{t("common.clear")}<"#),
    (">下载<", r#">{t("common.download")}<"#),
];

const TEXT_LITERALS_TARGETS: &[(&str, &[(&str, &str)])] = &[
    (
        "url-encoder",
        &[(
            r#"placeholder="输入文本或 URL...""#,
            r#"placeholder={t("toolPages.url-encoder.inputPlaceholder")}"#,
        )],
    ),
    (
        "hash",
        &[(
            r#"placeholder="输入要计算哈希的文本...""#,
            r#"placeholder={t("toolPages.hash.inputPlaceholder")}"#,
        )],
    ),
    (
        "timestamp",
        &[
            ("当前时间", r#"{t("toolPages.timestamp.currentTime")}"#),
            ("秒:", r#"{t("toolPages.timestamp.seconds")}:"#),
            ("毫秒:", r#"{t("toolPages.timestamp.milliseconds")}:"#),
            (">复制秒<", r#">{t("toolPages.timestamp.copySeconds")}<"#),
            (">复制毫秒<", r#">{t("toolPages.timestamp.copyMilliseconds")}<"#),
        ],
    ),
    (
        "qrcode",
        &[
            (
                r#"placeholder="输入文本或 URL...""#,
                r#"placeholder={t("toolPages.qrcode.inputPlaceholder")}"#,
            ),
            ("尺寸", r#"{t("toolPages.qrcode.size")}"#),
        ],
    ),
    (
        "password-generator",
        &[
            ("长度", r#"{t("toolPages.password-generator.length")}"#),
            ("包含大写", r#"{t("toolPages.password-generator.includeUppercase")}"#),
            ("包含小写", r#"{t("toolPages.password-generator.includeLowercase")}"#),
            ("包含数字", r#"{t("toolPages.password-generator.includeNumbers")}"#),
            ("包含符号", r#"{t("toolPages.password-generator.includeSymbols")}"#),
        ],
    ),
    (
        "uuid-generator",
        &[
            ("数量", r#"{t("toolPages.uuid-generator.count")}"#),
            (">批量生成<", r#">{t("toolPages.uuid-generator.batchGenerate")}<"#),
            (">复制全部<", r#">{t("toolPages.uuid-generator.copyAll")}<"#),
        ],
    ),
    (
        "word-counter",
        &[
            ("字符", r#"{t("toolPages.word-counter.characters")}"#),
            ("单词", r#"{t("toolPages.word-counter.words")}"#),
            ("行数", r#"{t("toolPages.word-counter.lines")}"#),
        ],
    ),
    (
        "case-converter",
        &[
            (">小写<", r#">{t("toolPages.case-converter.lower")}<"#),
            (">大写<", r#">{t("toolPages.case-converter.upper")}<"#),
            (">驼峰<", r#">{t("toolPages.case-converter.camel")}<"#),
            (">下划线<", r#">{t("toolPages.case-converter.snake")}<"#),
        ],
    ),
    (
        "random-number",
        &[
            ("最小值", r#"{t("toolPages.random-number.min")}"#),
            ("最大值", r#"{t("toolPages.random-number.max")}"#),
            ("生成数量", r#"{t("toolPages.random-number.count")}"#),
        ],
    ),
];

fn text_literals() -> Result<Preset> {
    let mut table = RuleTable::new(RuleOrder::CommonFirst);

    for (find, replace) in TEXT_LITERALS_COMMON {
        table = table.with_common(Rule::literal(*find, *replace));
    }
    for (target, rules) in TEXT_LITERALS_TARGETS {
        for (find, replace) in *rules {
            table = table.with_target(target, Rule::literal(*find, *replace));
        }
    }

    Ok(Preset {
        name: TEXT_LITERALS.to_string(),
        description: "Exact-substring table for buttons, placeholders and per-tool labels"
            .to_string(),
        selector: Selector::subdirectories("page.tsx"),
        table,
    })
}

// ============================================================================
// use-translation
// ============================================================================

/// Tools that were migrated by hand before this preset existed.
const ALREADY_MIGRATED: &[&str] = &["base64", "json-formatter", "url-encoder", "hash"];

fn use_translation() -> Result<Preset> {
    let table = RuleTable::new(RuleOrder::CommonFirst)
        .with_skip_guard("useTranslation")
        .with_common(Rule::literal(
            r#"from "@/components/ToolLayout";"#,
            "from \"@/components/ToolLayout\";\nimport { useTranslation } from \"@/i18n\";",
        ))
        .with_common(Rule::template(
            r"(export default function \w+\([^)]*\)\s*\{)",
            "${1}\n  const { t } = useTranslation();",
        )?)
        .with_common(Rule::template(
            r#"<ToolLayout\s+title="[^"]*"\s+description="[^"]*">"#,
            r#"<ToolLayout toolId="{{target}}">"#,
        )?);

    Ok(Preset {
        name: USE_TRANSLATION.to_string(),
        description: "Wire useTranslation into tool pages and key ToolLayout by tool id"
            .to_string(),
        selector: Selector::subdirectories("page.tsx").excluding(ALREADY_MIGRATED.iter().copied()),
        table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::{is_fixed_point, rewrite_with_table};

    #[test]
    fn every_preset_builds() {
        let presets = all().unwrap();
        let built: Vec<&str> = presets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(built, PRESET_NAMES);
    }

    #[test]
    fn unknown_preset_lists_available() {
        let err = find("nope").unwrap_err();
        assert_eq!(err.code.as_str(), "preset.not_found");
        assert_eq!(err.details["available"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn text_literals_rewrites_input_placeholder_exactly() {
        let preset = find(TEXT_LITERALS).unwrap();
        let text = "<textarea value={input} placeholder=\"输入文本...\" rows={6} />";
        let out = rewrite_with_table(text, &preset.table, "base64");

        assert_eq!(
            out.text,
            "<textarea value={input} placeholder={t(\"common.inputPlaceholder\")} rows={6} />"
        );
    }

    #[test]
    fn text_literals_seconds_rule_rewrites_inside_milliseconds() {
        // `秒:` runs before `毫秒:` and consumes its suffix.
        let preset = find(TEXT_LITERALS).unwrap();
        let out = rewrite_with_table("<span>毫秒:</span>", &preset.table, "timestamp");

        assert_eq!(out.text, "<span>毫{t(\"toolPages.timestamp.seconds\")}:</span>");
        assert!(out.hits.iter().all(|h| h.rule != "毫秒:"));
    }

    #[test]
    fn tool_labels_target_rule_only_applies_to_its_target() {
        let preset = find(TOOL_LABELS).unwrap();
        let text = r#"<Button label="大写" />"#;

        let own = rewrite_with_table(text, &preset.table, "case-converter");
        assert_eq!(own.text, r#"<Button label={t("toolPages.case-converter.uppercase")} />"#);

        let other = rewrite_with_table(text, &preset.table, "word-counter");
        assert_eq!(other.text, text);
    }

    #[test]
    fn tool_labels_placeholder_template_uses_target_and_text() {
        let preset = find(TOOL_LABELS).unwrap();
        let out = rewrite_with_table(r#"<input placeholder="输入身高" />"#, &preset.table, "bmi-calculator");

        assert_eq!(
            out.text,
            r#"<input placeholder={t("toolPages.bmi-calculator.PLACEHOLDER_KEY")} /* TODO: 翻译 "输入身高" */ />"#
        );
        assert!(is_fixed_point(&out.text, &preset.table.rules_for("bmi-calculator"), "bmi-calculator"));
    }

    #[test]
    fn tool_labels_button_words_use_fallback_without_brace() {
        let preset = find(TOOL_LABELS).unwrap();
        let out = rewrite_with_table("<button>转换</button>", &preset.table, "base64");
        assert_eq!(out.text, "<button>convert\"</button>");
    }

    #[test]
    fn tool_labels_follow_up_is_present() {
        let preset = find(TOOL_LABELS).unwrap();
        assert_eq!(preset.table.follow_up().len(), 3);
    }

    #[test]
    fn common_strings_rewrites_compress_label() {
        let preset = find(COMMON_STRINGS).unwrap();
        let out = rewrite_with_table(r#"<Button text="压缩" />"#, &preset.table, "image-compress");
        assert_eq!(out.text, r#"<Button text={t("common.compress")} />"#);
    }

    #[test]
    fn use_translation_wires_hook_and_tool_layout() {
        let preset = find(USE_TRANSLATION).unwrap();
        let page = concat!(
            "import ToolLayout from \"@/components/ToolLayout\";\n",
            "\n",
            "export default function UuidPage() {\n",
            "  return (\n",
            "    <ToolLayout title=\"UUID 生成器\" description=\"生成 UUID\">\n",
            "    </ToolLayout>\n",
            "  );\n",
            "}\n",
        );
        let out = rewrite_with_table(page, &preset.table, "uuid-generator");

        let expected = concat!(
            "import ToolLayout from \"@/components/ToolLayout\";\n",
            "import { useTranslation } from \"@/i18n\";\n",
            "\n",
            "export default function UuidPage() {\n",
            "  const { t } = useTranslation();\n",
            "  return (\n",
            "    <ToolLayout toolId=\"uuid-generator\">\n",
            "    </ToolLayout>\n",
            "  );\n",
            "}\n",
        );
        assert_eq!(out.text, expected);
        assert!(preset.table.should_skip(&out.text));
    }

    #[test]
    fn use_translation_excludes_migrated_tools() {
        let preset = find(USE_TRANSLATION).unwrap();
        assert_eq!(
            preset.selector,
            Selector::subdirectories("page.tsx")
                .excluding(["base64", "json-formatter", "url-encoder", "hash"])
        );
    }
}
