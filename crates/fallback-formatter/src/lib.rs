//! Fallback formatter: render a multi-value field through an ordered chain of
//! renderers, letting the first renderer with visible output claim each value.

pub mod builtin;
pub mod compositor;
pub mod config;
pub mod context;
pub mod editor;
pub mod errors;
pub mod formatter;
pub mod item;
pub mod registry;
pub mod renderer;
pub mod resolver;
pub mod settings;

pub use compositor::{ClaimedElement, CompositeOutput, compose};
pub use config::FormatterConfigFile;
pub use context::RenderContext;
pub use editor::{FieldKind, SettingsField, SettingsForm, SettingsRow, SettingsSummary, SummaryLine};
pub use errors::{ConfigError, FallbackError, RendererError};
pub use formatter::{ChainFactory, FALLBACK_ID, FallbackFormatter};
pub use item::{FieldItems, Item};
pub use registry::RendererRegistry;
pub use renderer::{
    FnFactory, RenderResult, RenderedElement, Renderer, RendererDescriptor, RendererFactory,
    RendererKind, Settings,
};
pub use resolver::resolve;
pub use settings::{ChainEntry, EffectiveChain, FallbackSettings, RendererConfig};
