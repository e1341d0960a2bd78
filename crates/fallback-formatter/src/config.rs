//! On-disk formatter configuration.

use std::{fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    context::RenderContext,
    errors::ConfigError,
    settings::{FallbackSettings, RendererConfig},
};

pub const FORMATTER_CONFIG_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    FORMATTER_CONFIG_SCHEMA_VERSION
}

fn default_value_type() -> String {
    "string".to_string()
}

/// A fallback formatter configuration for one field, as stored in a file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FormatterConfigFile {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default = "default_value_type")]
    pub value_type: String,
    #[serde(default)]
    pub formatters: IndexMap<String, RendererConfig>,
    #[serde(default)]
    pub context: RenderContext,
}

impl Default for FormatterConfigFile {
    fn default() -> Self {
        Self {
            schema_version: FORMATTER_CONFIG_SCHEMA_VERSION,
            value_type: default_value_type(),
            formatters: IndexMap::new(),
            context: RenderContext::default(),
        }
    }
}

impl FormatterConfigFile {
    /// Loads a `.json`, `.yaml` or `.yml` file and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let config = match extension.as_deref() {
            Some("json") => Self::from_json(&contents)?,
            Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ));
            }
        };
        tracing::debug!(
            path = %path.display(),
            value_type = %config.value_type,
            formatters = config.formatters.len(),
            "loaded formatter configuration"
        );
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_version != FORMATTER_CONFIG_SCHEMA_VERSION {
            return Err(ConfigError::UnsupportedSchemaVersion {
                expected: FORMATTER_CONFIG_SCHEMA_VERSION,
                got: self.schema_version,
            });
        }
        Ok(())
    }

    pub fn settings(&self) -> FallbackSettings {
        FallbackSettings {
            formatters: self.formatters.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip_defaults() {
        let cfg = FormatterConfigFile::default();
        let json = serde_json::to_string(&cfg).expect("serialize");
        let decoded = FormatterConfigFile::from_json(&json).expect("deserialize");
        assert_eq!(decoded, cfg);
    }

    #[test]
    fn rejects_unknown_fields() {
        let json = r#"{"schema_version":1,"value_type":"text","extra":42}"#;
        let err = FormatterConfigFile::from_json(json).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn rejects_unsupported_schema_version() {
        let err = FormatterConfigFile::from_json(r#"{"schema_version":999}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedSchemaVersion {
                expected: 1,
                got: 999
            }
        ));
    }

    #[test]
    fn yaml_keeps_formatter_order() {
        let yaml = "value_type: text\nformatters:\n  pattern:\n    status: 1\n  prefixed:\n    status: true\n    weight: -1\n";
        let cfg = FormatterConfigFile::from_yaml(yaml).expect("parse");
        let ids: Vec<_> = cfg.formatters.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["pattern", "prefixed"]);
        assert_eq!(cfg.context.view_mode, "default");
    }
}
