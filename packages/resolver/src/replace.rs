use widgetry_dom::{node, DomError, DomResult, Fragment, Handle};

/// Replaces `target` with the nodes parsed from `replacement`.
///
/// The parsed top-level nodes are moved, with their descendants, into the
/// target's tree directly before it, then the target is removed. An empty
/// replacement leaves a single empty text node in the target's slot.
/// Siblings on either side keep their order and are not touched.
pub fn replace_node(target: &Handle, replacement: &str) -> DomResult<()> {
    if node::parent(target).is_none() {
        return Err(DomError::Detached);
    }

    if replacement.is_empty() {
        node::insert_before(target, node::text(""))?;
    } else {
        let rendered = Fragment::parse(replacement);
        for child in rendered.children() {
            node::insert_before(target, child)?;
        }
    }

    node::detach(target);
    Ok(())
}
