//! First-success-wins composition of a renderer chain over an item list.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    context::RenderContext,
    errors::FallbackError,
    item::Item,
    registry::RendererRegistry,
    renderer::RenderResult,
    settings::{ChainEntry, EffectiveChain},
};

/// Output for one delta together with the renderer that claimed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimedElement {
    pub renderer: String,
    pub content: Value,
}

/// Composite rendering, keyed and iterated by ascending delta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeOutput {
    pub elements: BTreeMap<usize, ClaimedElement>,
}

impl CompositeOutput {
    pub fn get(&self, delta: usize) -> Option<&ClaimedElement> {
        self.elements.get(&delta)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ClaimedElement)> {
        self.elements.iter().map(|(delta, element)| (*delta, element))
    }

    pub fn deltas(&self) -> Vec<usize> {
        self.elements.keys().copied().collect()
    }

    /// Rendered content only, without the claiming renderer.
    pub fn contents(&self) -> BTreeMap<usize, Value> {
        self.elements
            .iter()
            .map(|(delta, element)| (*delta, element.content.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Runs `chain` in order over `items`.
///
/// Each renderer sees the full item list but may only claim deltas nobody
/// claimed before it, and only with visible elements. Iteration stops as
/// soon as every delta is claimed. A renderer that cannot be created or
/// fails to render is logged and skipped. Unclaimed deltas are absent from
/// the output.
pub fn compose(
    registry: &RendererRegistry,
    items: &[Item],
    chain: &EffectiveChain,
    context: &RenderContext,
) -> CompositeOutput {
    let mut remaining: BTreeSet<usize> = items.iter().map(|item| item.delta).collect();
    let mut output = CompositeOutput::default();

    for entry in chain {
        if remaining.is_empty() {
            tracing::trace!(renderer = %entry.id, "all deltas claimed, skipping rest of chain");
            break;
        }

        let result = match invoke(registry, entry, items, context) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(renderer = %entry.id, error = %err, "renderer skipped");
                continue;
            }
        };

        let mut claimed = 0usize;
        for (delta, element) in result {
            if !element.visible || !remaining.remove(&delta) {
                continue;
            }
            output.elements.insert(
                delta,
                ClaimedElement {
                    renderer: entry.id.clone(),
                    content: element.content,
                },
            );
            claimed += 1;
        }

        tracing::debug!(
            renderer = %entry.id,
            claimed,
            remaining = remaining.len(),
            "chain entry rendered"
        );
    }

    output
}

fn invoke(
    registry: &RendererRegistry,
    entry: &ChainEntry,
    items: &[Item],
    context: &RenderContext,
) -> Result<RenderResult, FallbackError> {
    let mut renderer = registry.instantiate(&entry.id, &entry.settings, context)?;
    renderer.prepare(items);
    renderer
        .render(items)
        .map_err(|source| FallbackError::render(&entry.id, source))
}
