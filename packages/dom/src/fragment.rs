use crate::error::DomResult;
use crate::node;
use html5ever::tendril::TendrilSink;
use html5ever::{local_name, ns, parse_fragment, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, RcDom};

/// A parsed HTML fragment.
///
/// Markup is parsed in the context of a `<body>` element, so every node in the
/// input (including `<style>`, `<script>`, `<link>` and leading whitespace)
/// stays in the fragment. The tree builder hangs the parsed nodes off a
/// synthetic `<html>` root; its children are the fragment's top-level nodes
/// and the only part that is serialized back out.
pub struct Fragment {
    // Owns the tree. Dropping a node empties the child lists of its whole
    // subtree, so the dom must outlive every handle taken from it.
    _dom: RcDom,
    root: Handle,
}

impl Fragment {
    pub fn parse(html: &str) -> Self {
        let context = QualName::new(None, ns!(html), local_name!("body"));
        let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new(), false)
            .one(html);

        // The tree builder always appends the root before tokenizing
        let root = node::element_children(&dom.document)
            .into_iter()
            .next()
            .unwrap_or_else(|| dom.document.clone());

        Self { _dom: dom, root }
    }

    /// The container whose children are the fragment's top-level nodes.
    pub fn root(&self) -> &Handle {
        &self.root
    }

    /// Top-level nodes in order.
    pub fn children(&self) -> Vec<Handle> {
        node::children(&self.root)
    }

    /// Every element for which `predicate` holds, in document order.
    ///
    /// The result is a snapshot: later mutations do not change it, so callers
    /// that mutate while iterating should check [`Fragment::contains`] before
    /// acting on each node.
    pub fn select<P>(&self, predicate: P) -> Vec<Handle>
    where
        P: Fn(&Handle) -> bool,
    {
        node::descendant_elements(&self.root)
            .into_iter()
            .filter(|candidate| predicate(candidate))
            .collect()
    }

    /// True while `handle` is still reachable from the fragment root.
    pub fn contains(&self, handle: &Handle) -> bool {
        node::is_descendant_of(handle, &self.root)
    }

    pub fn serialize(&self) -> DomResult<String> {
        node::inner_html(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_simple_fragment() {
        let html = r#"<p>before</p><div class="card" data-x="1"><span>inside</span></div><p>after</p>"#;
        let fragment = Fragment::parse(html);
        assert_eq!(fragment.serialize().unwrap(), html);
    }

    #[test]
    fn test_empty_fragment() {
        let fragment = Fragment::parse("");
        assert!(fragment.children().is_empty());
        assert_eq!(fragment.serialize().unwrap(), "");
    }

    #[test]
    fn test_text_only_fragment() {
        let fragment = Fragment::parse("Fish &amp; chips");
        assert_eq!(fragment.children().len(), 1);
        assert_eq!(fragment.serialize().unwrap(), "Fish &amp; chips");
    }

    #[test]
    fn test_head_elements_stay_in_fragment() {
        let html = concat!(
            r#"<style>.x{color:red}</style>"#,
            r#"<link rel="stylesheet" href="a.css">"#,
            r#"<script>init()</script>"#,
            r#"<meta charset="utf-8">"#,
            r#"<p>a</p>"#,
        );
        let fragment = Fragment::parse(html);

        assert_eq!(fragment.children().len(), 5);
        assert_eq!(fragment.serialize().unwrap(), html);
    }

    #[test]
    fn test_leading_whitespace_is_kept() {
        let fragment = Fragment::parse("\n  <p>a</p>");
        assert_eq!(fragment.serialize().unwrap(), "\n  <p>a</p>");
    }

    #[test]
    fn test_select_matches_nested_elements() {
        let fragment = Fragment::parse(
            r#"<div data-mark="1"><p><span data-mark="2"></span></p></div><i data-mark="3"></i>"#,
        );

        let marks: Vec<String> = fragment
            .select(|handle| node::has_attr(handle, "data-mark"))
            .iter()
            .filter_map(|handle| node::attr(handle, "data-mark"))
            .collect();

        assert_eq!(marks, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_contains_tracks_detachment() {
        let fragment = Fragment::parse("<div><p>x</p></div>");
        let selected = fragment.select(|handle| node::tag_name(handle).as_deref() == Some("p"));
        let p = selected[0].clone();

        assert!(fragment.contains(&p));

        let div = fragment.children()[0].clone();
        node::detach(&div);

        assert!(!fragment.contains(&p));
    }
}
