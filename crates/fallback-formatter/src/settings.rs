use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::renderer::Settings;

/// Persisted settings of a fallback formatter: `{ "formatters": { id: config } }`.
///
/// Map order matters: it is the order used for default weights and for
/// breaking ties between equal weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackSettings {
    #[serde(default)]
    pub formatters: IndexMap<String, RendererConfig>,
}

impl FallbackSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends (or replaces) the configuration of one renderer.
    pub fn with(mut self, id: impl Into<String>, config: RendererConfig) -> Self {
        self.formatters.insert(id.into(), config);
        self
    }

    pub fn enabled_ids(&self) -> impl Iterator<Item = &str> {
        self.formatters
            .iter()
            .filter(|(_, config)| config.status)
            .map(|(id, _)| id.as_str())
    }
}

/// Raw per-renderer configuration, as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendererConfig {
    #[serde(default, deserialize_with = "flag")]
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl RendererConfig {
    pub fn enabled() -> Self {
        Self {
            status: true,
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings
            .get_or_insert_with(Settings::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Stored status flags show up both as booleans and as `0`/`1`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => flag,
        Flag::Int(value) => value != 0,
        Flag::Text(text) => matches!(text.trim(), "1" | "true"),
    })
}

/// One resolved chain entry: descriptor data merged with its configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainEntry {
    pub id: String,
    pub label: String,
    pub enabled: bool,
    pub weight: i32,
    pub settings: Settings,
}

/// Ordered renderer chain produced by resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveChain {
    pub entries: Vec<ChainEntry>,
}

impl EffectiveChain {
    pub fn iter(&self) -> std::slice::Iter<'_, ChainEntry> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a EffectiveChain {
    type Item = &'a ChainEntry;
    type IntoIter = std::slice::Iter<'a, ChainEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
