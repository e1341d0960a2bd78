use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    context::RenderContext, editor::SettingsField, errors::RendererError, item::Item,
};

/// Renderer settings: a flat JSON object.
pub type Settings = Map<String, Value>;

/// Delta-indexed output of one renderer invocation.
///
/// A delta missing from the map means the renderer produced nothing for it.
pub type RenderResult = BTreeMap<usize, RenderedElement>;

fn default_visible() -> bool {
    true
}

/// One rendered slot. Invisible elements never claim their delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedElement {
    pub content: Value,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl RenderedElement {
    pub fn markup(text: impl Into<String>) -> Self {
        Self {
            content: Value::String(text.into()),
            visible: true,
        }
    }

    pub fn hidden(self) -> Self {
        Self {
            visible: false,
            ..self
        }
    }
}

/// Whether a descriptor is a regular renderer or a chain of renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    Standard,
    Chain,
}

/// Static description of a registered renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererDescriptor {
    pub id: String,
    pub label: String,
    pub value_types: Vec<String>,
    #[serde(default)]
    pub default_settings: Settings,
    pub kind: RendererKind,
}

impl RendererDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value_types: Vec::new(),
            default_settings: Settings::new(),
            kind: RendererKind::Standard,
        }
    }

    pub fn value_types<I, S>(mut self, value_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_types = value_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_settings.insert(key.into(), value.into());
        self
    }

    pub fn chain(mut self) -> Self {
        self.kind = RendererKind::Chain;
        self
    }

    pub fn supports(&self, value_type: &str) -> bool {
        self.value_types.iter().any(|candidate| candidate == value_type)
    }
}

/// A configured renderer, ready to render one item list.
pub trait Renderer {
    /// Called once before `render`, with the same items.
    fn prepare(&mut self, _items: &[Item]) {}

    /// Renders the full item list. Deltas the renderer declines are left out.
    fn render(&self, items: &[Item]) -> Result<RenderResult, RendererError>;

    /// Fields the renderer wants in its settings sub-form.
    fn settings_form(&self) -> Vec<SettingsField> {
        Vec::new()
    }

    /// One-line descriptions of the active settings.
    fn settings_summary(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Builds renderer instances for one registered id.
pub trait RendererFactory: Send + Sync {
    fn descriptor(&self) -> &RendererDescriptor;

    /// Runtime capability check on top of the declared value types.
    fn is_applicable(&self, value_type: &str) -> bool {
        self.descriptor().supports(value_type)
    }

    fn create(&self, settings: &Settings, context: &RenderContext) -> Box<dyn Renderer>;
}

/// Factory backed by a descriptor and a constructor function.
pub struct FnFactory<F> {
    descriptor: RendererDescriptor,
    build: F,
}

impl<F> FnFactory<F>
where
    F: Fn(&Settings, &RenderContext) -> Box<dyn Renderer> + Send + Sync,
{
    pub fn new(descriptor: RendererDescriptor, build: F) -> Self {
        Self { descriptor, build }
    }
}

impl<F> RendererFactory for FnFactory<F>
where
    F: Fn(&Settings, &RenderContext) -> Box<dyn Renderer> + Send + Sync,
{
    fn descriptor(&self) -> &RendererDescriptor {
        &self.descriptor
    }

    fn create(&self, settings: &Settings, context: &RenderContext) -> Box<dyn Renderer> {
        (self.build)(settings, context)
    }
}

/// Reads a string setting, falling back to `default`.
pub fn string_setting<'a>(settings: &'a Settings, key: &str, default: &'a str) -> &'a str {
    settings.get(key).and_then(Value::as_str).unwrap_or(default)
}

/// Reads a boolean setting; accepts `true`/`false` and `0`/`1`.
pub fn bool_setting(settings: &Settings, key: &str, default: bool) -> bool {
    match settings.get(key) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_i64().map(|n| n != 0).unwrap_or(default),
        _ => default,
    }
}

/// Reads an unsigned integer setting, falling back to `default`.
pub fn usize_setting(settings: &Settings, key: &str, default: usize) -> usize {
    settings
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|value| usize::try_from(value).ok())
        .unwrap_or(default)
}
