//! Template-backed widget rendering.
//!
//! [`TemplateRenderer`] implements [`widgetry_resolver::Render`] on top of
//! minijinja. A [`WidgetManifest`] (usually `widgets.json`) describes each
//! widget type: its label, template, declared content areas and config
//! defaults. Templates are looked up as:
//!
//! 1. the template named by the widget's definition, if any (it must exist)
//! 2. `<type>.html`
//! 3. the built-in [`FALLBACK_TEMPLATE`]
//!
//! ```ignore
//! let manifest = WidgetManifest::load(Path::new("widgets.json"))?;
//! let mut renderer = TemplateRenderer::new()?.with_definitions(manifest);
//! renderer.load_templates(Path::new("templates"))?;
//!
//! let resolver = WidgetResolver::new(renderer);
//! let html = resolver.resolve(stored)?;
//! ```

pub mod manifest;
pub mod template;

pub use manifest::{WidgetDefinition, WidgetManifest};
pub use template::{TemplateRenderer, FALLBACK_TEMPLATE};
