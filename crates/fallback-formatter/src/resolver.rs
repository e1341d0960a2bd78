//! Normalizes raw fallback settings into an ordered renderer chain.

use indexmap::IndexMap;

use crate::{
    registry::RendererRegistry,
    renderer::{RendererDescriptor, Settings},
    settings::{ChainEntry, EffectiveChain, FallbackSettings, RendererConfig},
};

/// Resolves `raw` against the renderers applicable to `value_type`.
///
/// Every applicable renderer ends up in the chain (new ones disabled), ids
/// that are not applicable are dropped, missing weights follow merged order,
/// and explicit settings are layered over each renderer's defaults. With
/// `filter_enabled` only enabled entries are kept. The result is sorted by
/// weight; equal weights keep their merged order.
pub fn resolve(
    registry: &RendererRegistry,
    value_type: &str,
    raw: &FallbackSettings,
    filter_enabled: bool,
) -> EffectiveChain {
    let allowed: IndexMap<&str, &RendererDescriptor> = registry
        .list_applicable(value_type)
        .into_iter()
        .map(|descriptor| (descriptor.id.as_str(), descriptor))
        .collect();

    let mut merged: Vec<(&str, Option<&RendererConfig>)> = Vec::new();
    for (id, config) in &raw.formatters {
        if allowed.contains_key(id.as_str()) {
            merged.push((id.as_str(), Some(config)));
        } else {
            tracing::debug!(renderer = %id, value_type, "dropping inapplicable renderer from chain");
        }
    }
    for id in allowed.keys() {
        if !raw.formatters.contains_key(*id) {
            merged.push((*id, None));
        }
    }

    let mut entries: Vec<ChainEntry> = merged
        .into_iter()
        .enumerate()
        .filter_map(|(position, (id, config))| {
            let descriptor = allowed.get(id)?;
            let default_weight = i32::try_from(position).unwrap_or(i32::MAX);
            Some(merge_entry(descriptor, config, default_weight))
        })
        .filter(|entry| !filter_enabled || entry.enabled)
        .collect();

    // `sort_by_key` is stable, which keeps merged order for equal weights.
    entries.sort_by_key(|entry| entry.weight);

    EffectiveChain { entries }
}

fn merge_entry(
    descriptor: &RendererDescriptor,
    config: Option<&RendererConfig>,
    default_weight: i32,
) -> ChainEntry {
    let mut settings: Settings = descriptor.default_settings.clone();
    if let Some(explicit) = config.and_then(|config| config.settings.as_ref()) {
        for (key, value) in explicit {
            settings.insert(key.clone(), value.clone());
        }
    }

    ChainEntry {
        id: descriptor.id.clone(),
        label: descriptor.label.clone(),
        enabled: config.is_some_and(|config| config.status),
        weight: config
            .and_then(|config| config.weight)
            .unwrap_or(default_weight),
        settings,
    }
}
