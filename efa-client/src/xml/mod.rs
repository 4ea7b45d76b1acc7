//! Permissive XML tree for EFA responses.
//!
//! EFA documents are walked by tag name regardless of nesting depth, so the
//! response parsers work on an owned element tree rather than directly on
//! `quick-xml` events.

mod dom;

pub use dom::{Document, Element, Node};
