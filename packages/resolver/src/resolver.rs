use crate::render::{Render, RenderError, RenderRequest};
use crate::replace::replace_node;
use crate::widget::{content_areas, is_candidate, Placeholder, MARKER};
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, instrument};
use widgetry_dom::{node, DomError, Fragment};

pub type ResolveResult<T> = Result<T, ResolveError>;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Widgets are nested deeper than the allowed {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Options for widget resolution
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Deepest placeholder nesting level allowed; top-level placeholders are
    /// level 1. `None` leaves nesting unbounded.
    pub max_depth: Option<usize>,
}

/// Counters gathered over one top-level [`WidgetResolver::resolve`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub rendered: usize,
    pub skipped: usize,
    pub deepest: usize,
}

/// Expands every widget placeholder in a fragment, innermost first.
pub struct WidgetResolver<R> {
    renderer: R,
    options: ResolveOptions,
}

impl<R: Render> WidgetResolver<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_options(renderer, ResolveOptions::default())
    }

    pub fn with_options(renderer: R, options: ResolveOptions) -> Self {
        Self { renderer, options }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Resolve a fragment, returning the expanded markup.
    pub fn resolve(&self, html: &str) -> ResolveResult<String> {
        self.resolve_with_stats(html).map(|(output, _)| output)
    }

    /// Resolve a fragment and report what happened along the way.
    #[instrument(skip_all, fields(bytes = html.len()))]
    pub fn resolve_with_stats(&self, html: &str) -> ResolveResult<(String, ResolveStats)> {
        let mut stats = ResolveStats::default();
        let output = self.resolve_at(html, 0, &mut stats)?;

        debug!(
            rendered = stats.rendered,
            skipped = stats.skipped,
            deepest = stats.deepest,
            "Widget resolution complete"
        );

        Ok((output, stats))
    }

    /// `depth` is the nesting level of the markup being resolved; placeholders
    /// found in it sit one level deeper.
    fn resolve_at(
        &self,
        html: &str,
        depth: usize,
        stats: &mut ResolveStats,
    ) -> ResolveResult<String> {
        if !html.contains(MARKER) {
            return Ok(html.to_string());
        }

        let fragment = Fragment::parse(html);
        let level = depth + 1;

        for element in fragment.select(is_candidate) {
            // Placeholders inside an already-drained or replaced ancestor are
            // no longer reachable; the ancestor's content areas were resolved
            // on their own.
            if !fragment.contains(&element) {
                continue;
            }

            let Ok(placeholder) = Placeholder::read(&element) else {
                stats.skipped += 1;
                continue;
            };

            if let Some(limit) = self.options.max_depth {
                if level > limit {
                    return Err(ResolveError::NestingTooDeep { limit });
                }
            }
            stats.deepest = stats.deepest.max(level);

            let mut content = IndexMap::new();
            for (area, container) in content_areas(&element) {
                let raw = node::drain_inner_html(&container)?;
                let resolved = self.resolve_at(&raw, level, stats)?;
                content.insert(area, resolved);
            }

            let request = RenderRequest {
                widget_type: placeholder.widget_type,
                config: placeholder.config,
                content,
            };

            let rendered = self.renderer.render(&request)?;
            stats.rendered += 1;

            replace_node(&element, &rendered)?;
        }

        Ok(fragment.serialize()?)
    }
}
