//! Settings form and summary descriptions for a fallback chain.
//!
//! These are plain data; drawing the table (drag handles, AJAX refresh) is
//! left to whatever front end consumes them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    context::RenderContext,
    registry::RendererRegistry,
    renderer::Settings,
    resolver::resolve,
    settings::{FallbackSettings, RendererConfig},
};

/// Range of the weight selector: `-WEIGHT_DELTA..=WEIGHT_DELTA`.
pub const WEIGHT_DELTA: i32 = 50;

pub const FORM_TITLE: &str = "Formatter processing order";
pub const EMPTY_SUMMARY: &str = "No formatters selected yet.";

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Bool,
    Number,
    Choice,
}

/// One input of a renderer's settings sub-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsField {
    pub name: String,
    pub title: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Value>,
}

impl SettingsField {
    pub fn new(name: impl Into<String>, title: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            kind,
            default: None,
            help: None,
            choices: Vec::new(),
        }
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }
}

/// Table region a row is dragged into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub enabled: bool,
    pub title: String,
    pub empty_message: String,
}

fn regions() -> Vec<Region> {
    vec![
        Region {
            enabled: true,
            title: "Enabled".into(),
            empty_message: "No field is enabled.".into(),
        },
        Region {
            enabled: false,
            title: "Disabled".into(),
            empty_message: "No field is disabled.".into(),
        },
    ]
}

/// One row of the processing-order table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRow {
    pub id: String,
    pub label: String,
    pub weight: i32,
    pub status: bool,
    /// Current values of the renderer's own settings.
    pub values: Settings,
    /// The renderer's sub-form; only shown while the row is enabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SettingsField>,
}

/// Processing-order table for every renderer applicable to a value type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsForm {
    pub title: String,
    pub weight_delta: i32,
    pub regions: Vec<Region>,
    pub rows: Vec<SettingsRow>,
}

impl SettingsForm {
    pub fn row(&self, id: &str) -> Option<&SettingsRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn row_mut(&mut self, id: &str) -> Option<&mut SettingsRow> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    /// Settings as they would be saved from the current state of the form.
    ///
    /// Weights are written explicitly, clamped to the selector range.
    pub fn to_settings(&self) -> FallbackSettings {
        let formatters = self
            .rows
            .iter()
            .map(|row| {
                let config = RendererConfig {
                    status: row.status,
                    weight: Some(row.weight.clamp(-self.weight_delta, self.weight_delta)),
                    settings: Some(row.values.clone()),
                };
                (row.id.clone(), config)
            })
            .collect();
        FallbackSettings { formatters }
    }
}

/// Builds the settings table, including disabled renderers.
pub fn settings_form(
    registry: &RendererRegistry,
    value_type: &str,
    raw: &FallbackSettings,
    context: &RenderContext,
) -> SettingsForm {
    let chain = resolve(registry, value_type, raw, false);
    let rows = chain
        .iter()
        .map(|entry| {
            let fields = match registry.instantiate(&entry.id, &entry.settings, context) {
                Ok(renderer) => renderer.settings_form(),
                Err(err) => {
                    tracing::warn!(renderer = %entry.id, error = %err, "no settings form");
                    Vec::new()
                }
            };
            SettingsRow {
                id: entry.id.clone(),
                label: entry.label.clone(),
                weight: entry.weight,
                status: entry.enabled,
                values: entry.settings.clone(),
                fields,
            }
        })
        .collect();

    SettingsForm {
        title: FORM_TITLE.to_string(),
        weight_delta: WEIGHT_DELTA,
        regions: regions(),
        rows,
    }
}

/// One line of the settings summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryLine {
    Formatter { label: String, details: String },
    Unknown { id: String },
    Invalid { label: String },
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLine::Formatter { label, details } if details.is_empty() => {
                write!(f, "{label}")
            }
            SummaryLine::Formatter { label, details } => write!(f, "{label}: {details}"),
            SummaryLine::Unknown { id } => write!(f, "Unknown formatter {id}."),
            SummaryLine::Invalid { label } => write!(f, "Invalid formatter {label}."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSummary {
    Empty,
    Lines(Vec<SummaryLine>),
}

impl SettingsSummary {
    pub fn lines(&self) -> &[SummaryLine] {
        match self {
            SettingsSummary::Empty => &[],
            SettingsSummary::Lines(lines) => lines,
        }
    }
}

impl fmt::Display for SettingsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsSummary::Empty => write!(f, "{EMPTY_SUMMARY}"),
            SettingsSummary::Lines(lines) => {
                for (index, line) in lines.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}. {line}", index + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Summarizes the enabled renderers in processing order.
///
/// Enabled ids that are not registered, or registered but unusable for
/// `value_type`, are flagged after the resolved lines.
pub fn settings_summary(
    registry: &RendererRegistry,
    value_type: &str,
    raw: &FallbackSettings,
    context: &RenderContext,
) -> SettingsSummary {
    let chain = resolve(registry, value_type, raw, true);
    let mut lines: Vec<SummaryLine> = chain
        .iter()
        .map(
            |entry| match registry.instantiate(&entry.id, &entry.settings, context) {
                Ok(renderer) => SummaryLine::Formatter {
                    label: entry.label.clone(),
                    details: renderer.settings_summary().join(", "),
                },
                Err(_) => SummaryLine::Unknown {
                    id: entry.id.clone(),
                },
            },
        )
        .collect();

    for id in raw.enabled_ids() {
        match registry.descriptor(id) {
            None => lines.push(SummaryLine::Unknown { id: id.to_string() }),
            Some(descriptor) if !registry.is_applicable(id, value_type) => {
                lines.push(SummaryLine::Invalid {
                    label: descriptor.label.clone(),
                })
            }
            Some(_) => {}
        }
    }

    if lines.is_empty() {
        SettingsSummary::Empty
    } else {
        SettingsSummary::Lines(lines)
    }
}
