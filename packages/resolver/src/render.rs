use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised by a render capability
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a renderer needs to produce markup for one placeholder.
///
/// `content` holds each area's markup with nested widgets already expanded,
/// keyed by area name in the order the areas appear in the placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    #[serde(rename = "type")]
    pub widget_type: String,
    pub config: Map<String, Value>,
    pub content: IndexMap<String, String>,
}

impl RenderRequest {
    pub fn new(widget_type: impl Into<String>, config: Map<String, Value>) -> Self {
        Self {
            widget_type: widget_type.into(),
            config,
            content: IndexMap::new(),
        }
    }

    pub fn with_area(mut self, name: impl Into<String>, html: impl Into<String>) -> Self {
        self.content.insert(name.into(), html.into());
        self
    }

    pub fn area(&self, name: &str) -> Option<&str> {
        self.content.get(name).map(String::as_str)
    }
}

/// The capability that turns a [`RenderRequest`] into markup.
///
/// Implementations must be pure with respect to the request: the resolver may
/// call them in any nesting order and from parallel workers.
pub trait Render: Send + Sync {
    fn render(&self, request: &RenderRequest) -> RenderResult<String>;
}

impl<F> Render for F
where
    F: Fn(&RenderRequest) -> RenderResult<String> + Send + Sync,
{
    fn render(&self, request: &RenderRequest) -> RenderResult<String> {
        self(request)
    }
}
