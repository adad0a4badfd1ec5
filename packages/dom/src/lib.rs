//! # Widgetry DOM
//!
//! HTML fragment trees backed by `html5ever` and `markup5ever_rcdom`.
//!
//! Parsing and serialization are delegated entirely to html5ever; entity
//! handling and markup repair are its responsibility. This crate only adds the
//! node operations widget resolution needs: predicate queries in document
//! order, attribute reads, attachment checks, and in-place splicing.
//!
//! ```rust,ignore
//! use widgetry_dom::{node, Fragment};
//!
//! let fragment = Fragment::parse("<p>one</p><p>two</p>");
//! let second = fragment.children()[1].clone();
//! node::insert_before(&second, node::text("between"))?;
//! assert_eq!(fragment.serialize()?, "<p>one</p>between<p>two</p>");
//! ```

pub mod error;
pub mod fragment;
pub mod node;

pub use error::{DomError, DomResult};
pub use fragment::Fragment;
pub use markup5ever_rcdom::Handle;
