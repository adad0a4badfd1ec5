//! Read-only placeholder reports.
//!
//! Walks a fragment the same way the resolver does but never drains, renders,
//! or replaces anything. Used to audit stored content for placeholders that
//! will fall back to their raw markup or be dropped with an enclosing widget.

use crate::widget::{
    content_areas, is_candidate, InertReason, Placeholder, CONTENT_ATTR, MARKER, TYPE_ATTR,
};
use serde::Serialize;
use std::rc::Rc;
use widgetry_dom::{node, Fragment, Handle};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaceholderStatus {
    Valid,
    Inert { reason: InertReason },
    /// Sits inside an enclosing widget but outside its content areas, so it
    /// is removed along with that widget and never rendered.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderReport {
    #[serde(rename = "type")]
    pub widget_type: String,
    /// 1 for top-level placeholders, +1 per enclosing widget that will be
    /// rendered.
    pub depth: usize,
    pub areas: Vec<String>,
    pub status: PlaceholderStatus,
}

impl PlaceholderReport {
    pub fn is_valid(&self) -> bool {
        matches!(self.status, PlaceholderStatus::Valid)
    }
}

/// Report every placeholder-shaped element in document order.
pub fn inspect(html: &str) -> Vec<PlaceholderReport> {
    if !html.contains(MARKER) {
        return Vec::new();
    }

    let fragment = Fragment::parse(html);
    fragment
        .select(is_candidate)
        .iter()
        .map(|element| {
            let (depth, reachable) = placement(element, &fragment);
            let status = match Placeholder::read(element) {
                _ if !reachable => PlaceholderStatus::Discarded,
                Ok(_) => PlaceholderStatus::Valid,
                Err(reason) => PlaceholderStatus::Inert { reason },
            };

            PlaceholderReport {
                widget_type: node::attr(element, TYPE_ATTR).unwrap_or_default(),
                depth,
                areas: content_areas(element)
                    .into_iter()
                    .map(|(name, _)| name)
                    .collect(),
                status,
            }
        })
        .collect()
}

/// Nesting level as the resolver sees it, and whether resolution reaches the
/// element at all. Inert ancestors stay in place and add no level; a valid
/// ancestor only passes on what sits in one of its content areas.
fn placement(element: &Handle, fragment: &Fragment) -> (usize, bool) {
    let mut depth = 1;
    let mut reachable = true;
    let mut child = element.clone();
    let mut current = node::parent(element);

    while let Some(ancestor) = current {
        if Rc::ptr_eq(&ancestor, fragment.root()) {
            break;
        }
        if is_candidate(&ancestor) && Placeholder::read(&ancestor).is_ok() {
            depth += 1;
            if Rc::ptr_eq(&child, element) || !node::has_attr(&child, CONTENT_ATTR) {
                reachable = false;
            }
        }
        current = node::parent(&ancestor);
        child = ancestor;
    }

    (depth, reachable)
}
