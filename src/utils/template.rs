//! String template rendering utilities.

pub struct TemplateVars;

impl TemplateVars {
    pub const TARGET: &'static str = "target";
}

pub fn render(template: &str, variables: &[(&str, &str)]) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}

pub fn is_present(template: &str, key: &str) -> bool {
    let placeholder = format!("{{{{{}}}}}", key);
    template.contains(&placeholder)
}

/// Escape `$` so a value survives regex replacement expansion unchanged.
pub fn escape_expansion(value: &str) -> String {
    value.replace('$', "$$")
}
