//! # Widgetry Resolver
//!
//! Expands widget placeholders embedded in stored rich-text HTML.
//!
//! ## Wire format
//!
//! ```html
//! <div data-widget-type="slice" data-widget-config='{"mode":"image"}'>
//!   <div data-widget-content="content"> ...may contain nested widgets... </div>
//!   <div data-widget-content="image"> ... </div>
//! </div>
//! ```
//!
//! The attribute names and the JSON encoding of the config are the contract
//! with the editor that authors this markup.
//!
//! ## Resolution order
//!
//! Placeholders are resolved innermost first. Each content area is drained
//! into a string and resolved on its own before the enclosing placeholder is
//! rendered, so a renderer only ever sees fully expanded content.
//!
//! ## Leniency
//!
//! A placeholder with an empty type or a config that is not a JSON object is
//! left exactly as stored. Missing content areas are simply absent from the
//! [`RenderRequest`]. Only serializer and renderer failures surface as
//! errors.
//!
//! ## Recursion
//!
//! Recursion depth equals widget nesting depth. Set
//! [`ResolveOptions::max_depth`] when resolving untrusted content.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use widgetry_resolver::{RenderRequest, RenderResult, WidgetResolver};
//!
//! let resolver = WidgetResolver::new(|request: &RenderRequest| -> RenderResult<String> {
//!     Ok(format!("<section class=\"{}\">{}</section>", request.widget_type,
//!         request.content.values().cloned().collect::<String>()))
//! });
//! let html = resolver.resolve(stored_html)?;
//! ```

pub mod inspect;
pub mod render;
pub mod replace;
pub mod resolver;
pub mod widget;


pub use inspect::{inspect, PlaceholderReport, PlaceholderStatus};
pub use render::{Render, RenderError, RenderRequest, RenderResult};
pub use replace::replace_node;
pub use resolver::{ResolveError, ResolveOptions, ResolveResult, ResolveStats, WidgetResolver};
pub use widget::{InertReason, Placeholder, CONFIG_ATTR, CONTENT_ATTR, MARKER, TYPE_ATTR};
