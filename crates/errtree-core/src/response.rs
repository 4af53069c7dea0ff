//! API response projection
//!
//! Converts an error tree into nested key → value detail. Leaves contribute
//! `{target: message}`, inner nodes `{target: {merged children}}`. Two
//! contributions under the same key become a list instead of overwriting
//! each other, and the final shape is normalized so every field maps to a
//! list of messages or to a nested object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codes;
use crate::node::ErrorNode;

/// Projected detail keyed by target
pub type DetailMap = BTreeMap<String, Detail>;

/// One projected value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Detail {
    Text(String),
    List(Vec<Detail>),
    Map(DetailMap),
}

impl Detail {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Detail::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Detail]> {
        match self {
            Detail::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&DetailMap> {
        match self {
            Detail::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Detail {
    fn from(text: &str) -> Self {
        Detail::Text(text.to_string())
    }
}

impl From<String> for Detail {
    fn from(text: String) -> Self {
        Detail::Text(text)
    }
}

/// Serialized error response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrResponse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trace_id: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub code: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: DetailMap,
}

fn is_zero(code: &u32) -> bool {
    *code == 0
}

impl ErrResponse {
    /// Project `err`: its own message, code and trace id, its children as `errors`
    pub fn from_error(err: &ErrorNode) -> Self {
        Self {
            message: err.message().to_string(),
            trace_id: err.trace_id().to_string(),
            code: err.code(),
            errors: normalize(project_children(err)),
        }
    }

    pub fn status_code(&self) -> u16 {
        codes::status_code(self.code)
    }
}

impl From<&ErrorNode> for ErrResponse {
    fn from(err: &ErrorNode) -> Self {
        Self::from_error(err)
    }
}

/// Contribution of one node, before normalization
pub fn project(node: &ErrorNode) -> DetailMap {
    let value = if node.nodes().next().is_none() {
        Detail::Text(node.message().to_string())
    } else {
        Detail::Map(project_children(node))
    };
    let mut out = DetailMap::new();
    out.insert(node.target().to_string(), value);
    out
}

/// Merged contributions of a node's children; foreign causes are skipped
pub fn project_children(node: &ErrorNode) -> DetailMap {
    let mut merged = DetailMap::new();
    for child in node.nodes() {
        for (key, value) in project(child) {
            merge(&mut merged, key, value);
        }
    }
    merged
}

/// Store `value` under `key`, turning a collision into a list
pub fn merge(map: &mut DetailMap, key: String, value: Detail) {
    match map.remove(&key) {
        None => {
            map.insert(key, value);
        }
        Some(Detail::List(mut items)) => {
            items.push(value);
            map.insert(key, Detail::List(items));
        }
        Some(existing) => {
            map.insert(key, Detail::List(vec![existing, value]));
        }
    }
}

/// Promote bare strings to one-element lists and collapse `{"": v}` to `v`
pub fn normalize(map: DetailMap) -> DetailMap {
    map.into_iter()
        .map(|(key, value)| (key, normalize_value(value)))
        .collect()
}

fn normalize_value(value: Detail) -> Detail {
    match value {
        Detail::Text(text) => Detail::List(vec![Detail::Text(text)]),
        Detail::List(items) => Detail::List(items.into_iter().map(normalize_item).collect()),
        Detail::Map(map) => {
            let mut map = normalize(map);
            if map.len() == 1 {
                if let Some(inner) = map.remove("") {
                    return inner;
                }
            }
            Detail::Map(map)
        }
    }
}

// list elements stay strings; only nested objects are normalized
fn normalize_item(item: Detail) -> Detail {
    match item {
        Detail::Map(_) => normalize_value(item),
        other => other,
    }
}
