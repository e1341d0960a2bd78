use serde::{Deserialize, Serialize};

fn default_view_mode() -> String {
    "default".to_string()
}

fn default_langcode() -> String {
    "und".to_string()
}

/// Context handed to renderer factories about where the output will be shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderContext {
    #[serde(default = "default_view_mode")]
    pub view_mode: String,
    #[serde(default = "default_langcode")]
    pub langcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            view_mode: default_view_mode(),
            langcode: default_langcode(),
            entity_id: None,
        }
    }
}

impl RenderContext {
    pub fn new(view_mode: impl Into<String>) -> Self {
        Self {
            view_mode: view_mode.into(),
            ..Self::default()
        }
    }

    pub fn with_langcode(mut self, langcode: impl Into<String>) -> Self {
        self.langcode = langcode.into();
        self
    }

    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }
}
