use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One value of a multi-value field, identified by its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub delta: usize,
    pub value: Value,
}

impl Item {
    pub fn new(delta: usize, value: impl Into<Value>) -> Self {
        Self {
            delta,
            value: value.into(),
        }
    }

    /// Text of the item: either a bare string or the `value` key of an object.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Value::String(text) => Some(text.as_str()),
            Value::Object(map) => map.get("value").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Ordered item list attached to a field on an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldItems {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl FieldItems {
    /// Builds a list where each value's delta is its position.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let items = values
            .into_iter()
            .enumerate()
            .map(|(delta, value)| Item::new(delta, value))
            .collect();
        Self {
            entity_id: None,
            items,
        }
    }

    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn deltas(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().map(|item| item.delta)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
