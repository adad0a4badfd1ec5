use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use widgetry_resolver::{RenderError, RenderResult};

/// How one widget type is rendered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDefinition {
    /// Human-readable name, exposed to templates as `label`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Template name; defaults to `<type>.html`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Content areas in declaration order
    #[serde(default)]
    pub areas: Vec<String>,

    /// Config values used when the stored config omits them
    #[serde(default)]
    pub defaults: Map<String, Value>,
}

/// Widget definitions keyed by widget type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetManifest {
    widgets: BTreeMap<String, WidgetDefinition>,
}

impl WidgetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> RenderResult<Self> {
        serde_json::from_str(json).map_err(|e| RenderError::Manifest(e.to_string()))
    }

    pub fn load(path: &Path) -> RenderResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| RenderError::Manifest(format!("{}: {}", path.display(), e)))
    }

    pub fn to_json(&self) -> RenderResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RenderError::Manifest(e.to_string()))
    }

    pub fn insert(&mut self, widget_type: impl Into<String>, definition: WidgetDefinition) {
        self.widgets.insert(widget_type.into(), definition);
    }

    pub fn get(&self, widget_type: &str) -> Option<&WidgetDefinition> {
        self.widgets.get(widget_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &WidgetDefinition)> {
        self.widgets.iter()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
