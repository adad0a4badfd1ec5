//! Placeholder attributes and how a placeholder element is read.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use widgetry_dom::{node, Handle};

/// Widget type identifier.
pub const TYPE_ATTR: &str = "data-widget-type";
/// JSON-encoded widget configuration.
pub const CONFIG_ATTR: &str = "data-widget-config";
/// Names a content area inside a placeholder.
pub const CONTENT_ATTR: &str = "data-widget-content";

/// Markup without this substring cannot contain a placeholder.
pub const MARKER: &str = TYPE_ATTR;

/// Why a placeholder-shaped element is left as inert markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InertReason {
    MissingAttribute { name: String },
    EmptyType,
    InvalidConfig { reason: String },
}

impl fmt::Display for InertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InertReason::MissingAttribute { name } => write!(f, "missing attribute {}", name),
            InertReason::EmptyType => write!(f, "empty widget type"),
            InertReason::InvalidConfig { reason } => write!(f, "invalid config: {}", reason),
        }
    }
}

/// A validated placeholder: non-empty type and an object-valued config.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub widget_type: String,
    pub config: Map<String, Value>,
}

impl Placeholder {
    pub fn read(element: &Handle) -> Result<Self, InertReason> {
        let widget_type = node::attr(element, TYPE_ATTR).ok_or_else(|| missing(TYPE_ATTR))?;
        let raw_config = node::attr(element, CONFIG_ATTR).ok_or_else(|| missing(CONFIG_ATTR))?;

        if widget_type.is_empty() {
            return Err(InertReason::EmptyType);
        }

        let config = match serde_json::from_str::<Value>(&raw_config) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(InertReason::InvalidConfig {
                    reason: format!("expected a JSON object, found {}", json_kind(&other)),
                })
            }
            Err(e) => {
                return Err(InertReason::InvalidConfig {
                    reason: e.to_string(),
                })
            }
        };

        Ok(Self {
            widget_type,
            config,
        })
    }
}

/// True for any element carrying both the type and config attributes,
/// whether or not their values are usable.
pub fn is_candidate(element: &Handle) -> bool {
    node::has_attr(element, TYPE_ATTR) && node::has_attr(element, CONFIG_ATTR)
}

/// Direct child elements tagged as content areas, in order, with their names.
pub fn content_areas(placeholder: &Handle) -> Vec<(String, Handle)> {
    node::element_children(placeholder)
        .into_iter()
        .filter_map(|child| node::attr(&child, CONTENT_ATTR).map(|name| (name, child)))
        .collect()
}

fn missing(name: &str) -> InertReason {
    InertReason::MissingAttribute {
        name: name.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
