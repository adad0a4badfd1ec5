//! Node-level operations on `markup5ever_rcdom` handles.
//!
//! Parent links are weak references held in a `Cell`, so every read takes the
//! link out and puts it back. Every mutation here keeps the parent link and the
//! parent's child list in agreement.

use crate::error::{DomError, DomResult};
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Returns the node's parent, if it still has one.
pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(Weak::upgrade);
    node.parent.set(weak);
    parent
}

/// True when `ancestor` appears somewhere on the node's parent chain.
pub fn is_descendant_of(node: &Handle, ancestor: &Handle) -> bool {
    let mut current = parent(node);
    while let Some(candidate) = current {
        if Rc::ptr_eq(&candidate, ancestor) {
            return true;
        }
        current = parent(&candidate);
    }
    false
}

pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

/// Local tag name of an element node.
pub fn tag_name(node: &Handle) -> Option<String> {
    match node.data {
        NodeData::Element { ref name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// Reads an attribute value by local name.
pub fn attr(node: &Handle, name: &str) -> Option<String> {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attribute| &*attribute.name.local == name)
            .map(|attribute| attribute.value.to_string()),
        _ => None,
    }
}

pub fn has_attr(node: &Handle, name: &str) -> bool {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .any(|attribute| &*attribute.name.local == name),
        _ => false,
    }
}

/// Snapshot of the node's children.
pub fn children(node: &Handle) -> Vec<Handle> {
    node.children.borrow().clone()
}

/// Snapshot of the node's element children, skipping text and comments.
pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| is_element(child))
        .cloned()
        .collect()
}

/// Every element below `root` in document order, `root` excluded.
pub fn descendant_elements(root: &Handle) -> Vec<Handle> {
    let mut found = Vec::new();
    let mut stack: Vec<Handle> = children(root).into_iter().rev().collect();

    while let Some(node) = stack.pop() {
        if is_element(&node) {
            found.push(node.clone());
        }
        stack.extend(children(&node).into_iter().rev());
    }

    found
}

/// Removes the node from its parent. Returns the former parent.
pub fn detach(node: &Handle) -> Option<Handle> {
    let former = parent(node);
    if let Some(ref parent) = former {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
    }
    node.parent.set(None);
    former
}

/// Inserts `node` immediately before `sibling`, moving it out of wherever it
/// currently lives (including another document).
pub fn insert_before(sibling: &Handle, node: Handle) -> DomResult<()> {
    let parent = parent(sibling).ok_or(DomError::Detached)?;
    detach(&node);

    let index = parent
        .children
        .borrow()
        .iter()
        .position(|child| Rc::ptr_eq(child, sibling))
        .ok_or(DomError::Detached)?;

    node.parent.set(Some(Rc::downgrade(&parent)));
    parent.children.borrow_mut().insert(index, node);
    Ok(())
}

/// Creates a free-standing text node.
pub fn text(contents: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(contents.to_string().into()),
        },
    })
}

/// Serializes the node itself, including its descendants.
pub fn outer_html(node: &Handle) -> DomResult<String> {
    write_html(node, TraversalScope::IncludeNode)
}

/// Serializes the node's children, excluding the node itself.
pub fn inner_html(node: &Handle) -> DomResult<String> {
    write_html(node, TraversalScope::ChildrenOnly(None))
}

/// Removes every child of `node` in order and returns their concatenated
/// markup. The node is left empty.
pub fn drain_inner_html(node: &Handle) -> DomResult<String> {
    let mut html = String::new();

    loop {
        let first = node.children.borrow().first().cloned();
        let Some(child) = first else {
            break;
        };
        detach(&child);
        html.push_str(&outer_html(&child)?);
    }

    Ok(html)
}

fn write_html(node: &Handle, scope: TraversalScope) -> DomResult<String> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };

    let serializable = SerializableHandle::from(node.clone());
    serialize(&mut output, &serializable, opts)?;

    Ok(String::from_utf8(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fragment;

    #[test]
    fn test_attr_lookup() {
        let fragment = Fragment::parse(r#"<div data-a="1" class="x"></div>"#);
        let div = &fragment.children()[0];

        assert_eq!(attr(div, "data-a"), Some("1".to_string()));
        assert_eq!(attr(div, "class"), Some("x".to_string()));
        assert_eq!(attr(div, "id"), None);
        assert!(has_attr(div, "data-a"));
        assert!(!has_attr(div, "data-b"));
        assert_eq!(tag_name(div), Some("div".to_string()));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let fragment = Fragment::parse(
            "<div id=\"a\"><p id=\"b\"><em id=\"c\">x</em></p></div><span id=\"d\"></span>",
        );

        let ids: Vec<String> = descendant_elements(fragment.root())
            .iter()
            .filter_map(|node| attr(node, "id"))
            .collect();

        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_insert_before_and_detach() {
        let fragment = Fragment::parse("<p>one</p><p>three</p>");
        let three = fragment.children()[1].clone();

        insert_before(&three, text("two")).unwrap();
        assert_eq!(fragment.serialize().unwrap(), "<p>one</p>two<p>three</p>");

        let former = detach(&three);
        assert!(former.is_some());
        assert!(parent(&three).is_none());
        assert_eq!(fragment.serialize().unwrap(), "<p>one</p>two");
    }

    #[test]
    fn test_insert_before_detached_sibling() {
        let fragment = Fragment::parse("<p>one</p>");
        let p = fragment.children()[0].clone();
        detach(&p);

        let result = insert_before(&p, text("x"));
        assert!(matches!(result, Err(DomError::Detached)));
    }

    #[test]
    fn test_drain_inner_html_empties_node() {
        let fragment =
            Fragment::parse("<div><p>a</p>text<!-- note --><b>c</b></div>");
        let div = fragment.children()[0].clone();

        let html = drain_inner_html(&div).unwrap();

        assert_eq!(html, "<p>a</p>text<!-- note --><b>c</b>");
        assert!(children(&div).is_empty());
        assert_eq!(fragment.serialize().unwrap(), "<div></div>");
    }

    #[test]
    fn test_descendant_check_after_detach() {
        let fragment = Fragment::parse("<div><section><p>deep</p></section></div>");
        let div = fragment.children()[0].clone();
        let section = children(&div)[0].clone();
        let p = children(&section)[0].clone();

        assert!(is_descendant_of(&p, fragment.root()));

        detach(&section);

        // p still has a parent, but the chain no longer reaches the body
        assert!(parent(&p).is_some());
        assert!(!is_descendant_of(&p, fragment.root()));
    }
}
