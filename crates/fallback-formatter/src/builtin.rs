//! Small renderers shipped with the crate.

use regex::Regex;
use serde_json::json;

use crate::{
    editor::{FieldKind, SettingsField},
    errors::RendererError,
    item::Item,
    registry::RendererRegistry,
    renderer::{
        RenderResult, RenderedElement, Renderer, RendererDescriptor, Settings, bool_setting,
        string_setting, usize_setting,
    },
};

/// Value types the built-in renderers understand.
pub const TEXT_TYPES: [&str; 4] = ["string", "string_long", "text", "text_long"];

pub const DEFAULT_MAX_LENGTH: usize = 64;

pub fn register_all(registry: &mut RendererRegistry) {
    registry.register_fn(
        RendererDescriptor::new("plain", "Plain text").value_types(TEXT_TYPES),
        |_, _| Box::new(PlainRenderer),
    );
    registry.register_fn(
        RendererDescriptor::new("prefixed", "Prefixed text")
            .value_types(TEXT_TYPES)
            .default_setting("prefix", ""),
        |settings, _| Box::new(PrefixedRenderer::from_settings(settings)),
    );
    registry.register_fn(
        RendererDescriptor::new("pattern", "Pattern match")
            .value_types(TEXT_TYPES)
            .default_setting("pattern", "")
            .default_setting("prefix", "")
            .default_setting("deny", false),
        |settings, _| Box::new(PatternRenderer::from_settings(settings)),
    );
    registry.register_fn(
        RendererDescriptor::new("trimmed", "Trimmed")
            .value_types(TEXT_TYPES)
            .default_setting("max_length", DEFAULT_MAX_LENGTH),
        |settings, _| Box::new(TrimmedRenderer::from_settings(settings)),
    );
    registry.register_fn(
        RendererDescriptor::new("numbered", "Numbered").value_types(TEXT_TYPES),
        |_, _| Box::new(NumberedRenderer),
    );
}

fn render_texts<F>(items: &[Item], mut render: F) -> RenderResult
where
    F: FnMut(&Item, &str) -> Option<RenderedElement>,
{
    items
        .iter()
        .filter_map(|item| {
            let text = item.text()?;
            render(item, text).map(|element| (item.delta, element))
        })
        .collect()
}

/// Text as-is; empty strings are declined.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, items: &[Item]) -> Result<RenderResult, RendererError> {
        Ok(render_texts(items, |_, text| {
            (!text.is_empty()).then(|| RenderedElement::markup(text))
        }))
    }
}

/// Text behind a fixed prefix.
#[derive(Debug, Default, Clone)]
pub struct PrefixedRenderer {
    pub prefix: String,
}

impl PrefixedRenderer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            prefix: string_setting(settings, "prefix", "").to_string(),
        }
    }
}

impl Renderer for PrefixedRenderer {
    fn render(&self, items: &[Item]) -> Result<RenderResult, RendererError> {
        Ok(render_texts(items, |_, text| {
            Some(RenderedElement::markup(format!("{}{text}", self.prefix)))
        }))
    }

    fn settings_form(&self) -> Vec<SettingsField> {
        vec![SettingsField::new("prefix", "Prefix", FieldKind::String).default_value("")]
    }

    fn settings_summary(&self) -> Vec<String> {
        if self.prefix.is_empty() {
            Vec::new()
        } else {
            vec![format!("Prefix: {}", self.prefix)]
        }
    }
}

/// Only values matching a regular expression; `deny` hides the matches.
#[derive(Debug)]
pub struct PatternRenderer {
    pattern: Result<Option<Regex>, String>,
    source: String,
    prefix: String,
    deny: bool,
}

impl PatternRenderer {
    pub fn from_settings(settings: &Settings) -> Self {
        let source = string_setting(settings, "pattern", "").to_string();
        let pattern = if source.is_empty() {
            Ok(None)
        } else {
            Regex::new(&source)
                .map(Some)
                .map_err(|err| format!("invalid pattern `{source}`: {err}"))
        };
        Self {
            pattern,
            source,
            prefix: string_setting(settings, "prefix", "").to_string(),
            deny: bool_setting(settings, "deny", false),
        }
    }
}

impl Renderer for PatternRenderer {
    fn render(&self, items: &[Item]) -> Result<RenderResult, RendererError> {
        let Some(pattern) = self.pattern.as_ref().map_err(|err| err.as_str())? else {
            return Ok(RenderResult::new());
        };
        Ok(render_texts(items, |_, text| {
            if !pattern.is_match(text) {
                return None;
            }
            let element = RenderedElement::markup(format!("{}{text}", self.prefix));
            Some(if self.deny { element.hidden() } else { element })
        }))
    }

    fn settings_form(&self) -> Vec<SettingsField> {
        vec![
            SettingsField::new("pattern", "Pattern", FieldKind::String)
                .default_value("")
                .help("Regular expression a value must match."),
            SettingsField::new("prefix", "Prefix", FieldKind::String).default_value(""),
            SettingsField::new("deny", "Matching values", FieldKind::Choice)
                .default_value(false)
                .choices([json!(false), json!(true)])
                .help("`false` shows matches, `true` hides them."),
        ]
    }

    fn settings_summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.source.is_empty() {
            lines.push("No pattern".to_string());
        } else {
            lines.push(format!("Pattern: {}", self.source));
        }
        if !self.prefix.is_empty() {
            lines.push(format!("Prefix: {}", self.prefix));
        }
        if self.deny {
            lines.push("Hides matches".to_string());
        }
        lines
    }
}

/// Text cut to a maximum number of characters.
#[derive(Debug, Clone, Copy)]
pub struct TrimmedRenderer {
    pub max_length: usize,
}

impl Default for TrimmedRenderer {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl TrimmedRenderer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_length: usize_setting(settings, "max_length", DEFAULT_MAX_LENGTH),
        }
    }
}

impl Renderer for TrimmedRenderer {
    fn render(&self, items: &[Item]) -> Result<RenderResult, RendererError> {
        Ok(render_texts(items, |_, text| {
            let (trimmed, _) = truncate_chars(text, self.max_length);
            (!trimmed.is_empty()).then(|| RenderedElement::markup(trimmed))
        }))
    }

    fn settings_form(&self) -> Vec<SettingsField> {
        vec![
            SettingsField::new("max_length", "Maximum length", FieldKind::Number)
                .default_value(DEFAULT_MAX_LENGTH),
        ]
    }

    fn settings_summary(&self) -> Vec<String> {
        vec![format!("Trimmed to {} characters", self.max_length)]
    }
}

/// Position within the whole list, e.g. `2 of 3: Banana`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberedRenderer;

impl Renderer for NumberedRenderer {
    fn render(&self, items: &[Item]) -> Result<RenderResult, RendererError> {
        let total = items.len();
        Ok(render_texts(items, |item, text| {
            Some(RenderedElement::markup(format!(
                "{} of {total}: {text}",
                item.delta + 1
            )))
        }))
    }
}

/// Truncate to at most `max` characters, appending ellipsis if truncated.
pub fn truncate_chars(text: &str, max: usize) -> (String, bool) {
    if max == 0 {
        return (String::new(), !text.is_empty());
    }
    let char_count = text.chars().count();
    if char_count <= max {
        return (text.to_string(), false);
    }
    let truncated: String = text.chars().take(max.saturating_sub(1)).collect();
    (format!("{truncated}\u{2026}"), true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::FieldItems;
    use serde_json::Value;

    fn settings(value: Value) -> Settings {
        value.as_object().cloned().expect("object")
    }

    fn texts(result: &RenderResult) -> Vec<(usize, String, bool)> {
        result
            .iter()
            .map(|(delta, element)| {
                (
                    *delta,
                    element.content.as_str().unwrap_or_default().to_string(),
                    element.visible,
                )
            })
            .collect()
    }

    fn fruit() -> FieldItems {
        FieldItems::from_values(["Apple", "Banana", "Carrot"])
    }

    #[test]
    fn truncate_chars_no_op() {
        let (result, truncated) = truncate_chars("hello", 10);
        assert_eq!(result, "hello");
        assert!(!truncated);
    }

    #[test]
    fn truncate_chars_cuts() {
        let (result, truncated) = truncate_chars("hello world", 6);
        assert!(truncated);
        assert_eq!(result, "hello\u{2026}");
    }

    #[test]
    fn plain_declines_empty_text() {
        let items = FieldItems::from_values([json!(""), json!("x"), json!(3)]);
        let result = PlainRenderer.render(items.as_slice()).expect("render");
        assert_eq!(texts(&result), vec![(1, "x".to_string(), true)]);
    }

    #[test]
    fn pattern_claims_matches_only() {
        let renderer = PatternRenderer::from_settings(&settings(json!({
            "pattern": "^B", "prefix": "B: "
        })));
        let result = renderer.render(fruit().as_slice()).expect("render");
        assert_eq!(texts(&result), vec![(1, "B: Banana".to_string(), true)]);
    }

    #[test]
    fn pattern_deny_hides_matches() {
        let renderer = PatternRenderer::from_settings(&settings(json!({
            "pattern": "^A", "prefix": "A: ", "deny": true
        })));
        let result = renderer.render(fruit().as_slice()).expect("render");
        assert_eq!(texts(&result), vec![(0, "A: Apple".to_string(), false)]);
        assert!(renderer.settings_summary().contains(&"Hides matches".to_string()));
    }

    #[test]
    fn pattern_form_offers_deny_choices() {
        let renderer = PatternRenderer::from_settings(&Settings::new());
        let form = renderer.settings_form();
        let deny = form.iter().find(|field| field.name == "deny").expect("deny field");
        assert_eq!(deny.kind, FieldKind::Choice);
        assert_eq!(deny.choices, vec![json!(false), json!(true)]);
        assert_eq!(deny.default, Some(json!(false)));
    }

    #[test]
    fn pattern_without_expression_matches_nothing() {
        let renderer = PatternRenderer::from_settings(&Settings::new());
        assert!(renderer.render(fruit().as_slice()).expect("render").is_empty());
    }

    #[test]
    fn invalid_pattern_is_a_render_error() {
        let renderer = PatternRenderer::from_settings(&settings(json!({ "pattern": "(" })));
        let err = renderer.render(fruit().as_slice()).unwrap_err();
        assert!(err.to_string().contains("invalid pattern"));
    }

    #[test]
    fn numbered_uses_whole_list() {
        let result = NumberedRenderer.render(fruit().as_slice()).expect("render");
        assert_eq!(result[&1].content, json!("2 of 3: Banana"));
    }

    #[test]
    fn trimmed_respects_max_length() {
        let renderer = TrimmedRenderer::from_settings(&settings(json!({ "max_length": 4 })));
        let result = renderer.render(fruit().as_slice()).expect("render");
        assert_eq!(result[&1].content, json!("Ban\u{2026}"));
        assert_eq!(
            renderer.settings_summary(),
            vec!["Trimmed to 4 characters".to_string()]
        );
    }

    #[test]
    fn builtins_apply_to_text_types() {
        let registry = RendererRegistry::with_builtins();
        let ids: Vec<_> = registry
            .list_applicable("text")
            .into_iter()
            .map(|descriptor| descriptor.id.as_str())
            .collect();
        assert_eq!(ids, vec!["plain", "prefixed", "pattern", "trimmed", "numbered"]);
        assert!(registry.list_applicable("integer").is_empty());
    }
}
