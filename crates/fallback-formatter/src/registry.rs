use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{
    builtin,
    context::RenderContext,
    errors::FallbackError,
    renderer::{
        FnFactory, Renderer, RendererDescriptor, RendererFactory, RendererKind, Settings,
    },
};

/// Renderer factories keyed by id, in registration order.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    factories: IndexMap<String, Arc<dyn RendererFactory>>,
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("ids", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the renderers shipped in this crate.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Registers a factory. A factory with the same id is replaced in place.
    pub fn register(&mut self, factory: impl RendererFactory + 'static) {
        let id = factory.descriptor().id.clone();
        self.factories.insert(id, Arc::new(factory));
    }

    pub fn register_fn<F>(&mut self, descriptor: RendererDescriptor, build: F)
    where
        F: Fn(&Settings, &RenderContext) -> Box<dyn Renderer> + Send + Sync + 'static,
    {
        self.register(FnFactory::new(descriptor, build));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn descriptor(&self, id: &str) -> Option<&RendererDescriptor> {
        self.factories.get(id).map(|factory| factory.descriptor())
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &RendererDescriptor> {
        self.factories.values().map(|factory| factory.descriptor())
    }

    /// Whether `id` may take part in a chain for `value_type`.
    pub fn is_applicable(&self, id: &str, value_type: &str) -> bool {
        self.factories
            .get(id)
            .is_some_and(|factory| Self::chainable(factory, value_type))
    }

    /// Descriptors usable inside a fallback chain for `value_type`.
    ///
    /// Chain renderers are never returned, so a chain cannot nest another chain.
    pub fn list_applicable(&self, value_type: &str) -> Vec<&RendererDescriptor> {
        self.factories
            .values()
            .filter(|factory| Self::chainable(factory, value_type))
            .map(|factory| factory.descriptor())
            .collect()
    }

    pub fn instantiate(
        &self,
        id: &str,
        settings: &Settings,
        context: &RenderContext,
    ) -> Result<Box<dyn Renderer>, FallbackError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| FallbackError::unknown_renderer(id))?;
        Ok(factory.create(settings, context))
    }

    fn chainable(factory: &Arc<dyn RendererFactory>, value_type: &str) -> bool {
        factory.descriptor().kind != RendererKind::Chain && factory.is_applicable(value_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::RendererError,
        item::Item,
        renderer::{RenderResult, RenderedElement},
    };

    struct Echo;

    impl Renderer for Echo {
        fn render(&self, items: &[Item]) -> Result<RenderResult, RendererError> {
            Ok(items
                .iter()
                .map(|item| (item.delta, RenderedElement::markup(item.value.to_string())))
                .collect())
        }
    }

    fn registry() -> RendererRegistry {
        let mut registry = RendererRegistry::new();
        registry.register_fn(
            RendererDescriptor::new("echo", "Echo").value_types(["string"]),
            |_, _| Box::new(Echo),
        );
        registry.register_fn(
            RendererDescriptor::new("numbers", "Numbers").value_types(["integer"]),
            |_, _| Box::new(Echo),
        );
        registry.register_fn(
            RendererDescriptor::new("fallback", "Fallback")
                .value_types(["string"])
                .chain(),
            |_, _| Box::new(Echo),
        );
        registry
    }

    #[test]
    fn list_applicable_skips_chains_and_other_types() {
        let registry = registry();
        let ids: Vec<_> = registry
            .list_applicable("string")
            .into_iter()
            .map(|descriptor| descriptor.id.as_str())
            .collect();
        assert_eq!(ids, vec!["echo"]);
        assert!(registry.contains("fallback"));
        assert!(!registry.is_applicable("fallback", "string"));
    }

    #[test]
    fn instantiate_unknown_id_fails() {
        let registry = registry();
        let err = registry
            .instantiate("nope", &Settings::new(), &RenderContext::default())
            .err()
            .expect("unknown id");
        assert!(matches!(err, FallbackError::UnknownRenderer { ref id } if id == "nope"));
    }

    #[test]
    fn register_replaces_same_id_in_place() {
        let mut registry = registry();
        registry.register_fn(
            RendererDescriptor::new("echo", "Echo v2").value_types(["string"]),
            |_, _| Box::new(Echo),
        );
        let labels: Vec<_> = registry.descriptors().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Echo v2", "Numbers", "Fallback"]);
    }
}
