use std::sync::Arc;

use serde_json::Value;

use crate::{
    compositor::{CompositeOutput, compose},
    context::RenderContext,
    editor::{self, SettingsForm, SettingsSummary},
    errors::RendererError,
    item::{FieldItems, Item},
    registry::RendererRegistry,
    renderer::{RenderResult, RenderedElement, Renderer, RendererDescriptor, RendererFactory, Settings},
    resolver::resolve,
    settings::{EffectiveChain, FallbackSettings},
};

pub const FALLBACK_ID: &str = "fallback";
pub const FALLBACK_LABEL: &str = "Fallback";

/// Renders a field through a chain of renderers, first visible output wins.
#[derive(Debug, Clone)]
pub struct FallbackFormatter {
    registry: Arc<RendererRegistry>,
    value_type: String,
    settings: FallbackSettings,
    context: RenderContext,
}

impl FallbackFormatter {
    pub fn new(
        registry: Arc<RendererRegistry>,
        value_type: impl Into<String>,
        settings: FallbackSettings,
    ) -> Self {
        Self {
            registry,
            value_type: value_type.into(),
            settings,
            context: RenderContext::default(),
        }
    }

    pub fn with_context(mut self, context: RenderContext) -> Self {
        self.context = context;
        self
    }

    /// Settings of a newly added fallback formatter: no renderers configured.
    pub fn default_settings() -> FallbackSettings {
        FallbackSettings::default()
    }

    pub fn settings(&self) -> &FallbackSettings {
        &self.settings
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    /// Enabled renderers in processing order.
    pub fn chain(&self) -> EffectiveChain {
        resolve(&self.registry, &self.value_type, &self.settings, true)
    }

    pub fn view_elements(&self, items: &[Item]) -> CompositeOutput {
        self.view_with_context(items, &self.context)
    }

    /// Renders a whole field. The field's entity id reaches the renderers
    /// unless the formatter context already names one.
    pub fn view_field(&self, field: &FieldItems) -> CompositeOutput {
        match (&field.entity_id, &self.context.entity_id) {
            (Some(entity_id), None) => {
                let context = self.context.clone().with_entity(entity_id.clone());
                self.view_with_context(field.as_slice(), &context)
            }
            _ => self.view_with_context(field.as_slice(), &self.context),
        }
    }

    fn view_with_context(&self, items: &[Item], context: &RenderContext) -> CompositeOutput {
        let chain = self.chain();
        tracing::debug!(
            value_type = %self.value_type,
            renderers = chain.len(),
            items = items.len(),
            entity = ?context.entity_id,
            "rendering fallback chain"
        );
        compose(&self.registry, items, &chain, context)
    }

    pub fn settings_form(&self) -> SettingsForm {
        editor::settings_form(&self.registry, &self.value_type, &self.settings, &self.context)
    }

    pub fn settings_summary(&self) -> SettingsSummary {
        editor::settings_summary(&self.registry, &self.value_type, &self.settings, &self.context)
    }
}

impl Renderer for FallbackFormatter {
    fn render(&self, items: &[Item]) -> Result<RenderResult, RendererError> {
        Ok(self
            .view_elements(items)
            .elements
            .into_iter()
            .map(|(delta, claimed)| {
                (
                    delta,
                    RenderedElement {
                        content: claimed.content,
                        visible: true,
                    },
                )
            })
            .collect())
    }

    fn settings_summary(&self) -> Vec<String> {
        self.settings_summary()
            .lines()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

/// Registers fallback chains for one value type inside another registry.
///
/// Its descriptor has the chain kind, so resolution never nests it.
pub struct ChainFactory {
    descriptor: RendererDescriptor,
    inner: Arc<RendererRegistry>,
    value_type: String,
}

impl ChainFactory {
    pub fn new(inner: Arc<RendererRegistry>, value_type: impl Into<String>) -> Self {
        let value_type = value_type.into();
        let descriptor = RendererDescriptor::new(FALLBACK_ID, FALLBACK_LABEL)
            .value_types([value_type.clone()])
            .default_setting("formatters", Value::Object(Default::default()))
            .chain();
        Self {
            descriptor,
            inner,
            value_type,
        }
    }
}

impl RendererFactory for ChainFactory {
    fn descriptor(&self) -> &RendererDescriptor {
        &self.descriptor
    }

    fn create(&self, settings: &Settings, context: &RenderContext) -> Box<dyn Renderer> {
        let settings = serde_json::from_value(Value::Object(settings.clone())).unwrap_or_else(
            |err| {
                tracing::warn!(error = %err, "invalid fallback settings, using defaults");
                FallbackSettings::default()
            },
        );
        Box::new(
            FallbackFormatter::new(Arc::clone(&self.inner), self.value_type.clone(), settings)
                .with_context(context.clone()),
        )
    }
}
