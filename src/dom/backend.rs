use std::fmt::Debug;
use std::hash::Hash;

/// Read/write surface the ranking pipeline needs from a host document tree.
///
/// The host tree is external: this crate never creates or destroys nodes,
/// it only reads them, rewrites title text, reorders children, and resets
/// scroll offsets. `Node` handles must be cheap, copyable ids; holding one
/// in a marker set must not keep a removed subtree alive.
///
/// The in-memory [`Document`](crate::dom::Document) implements this trait
/// and doubles as the test substrate; an embedder can implement it over a
/// real page instead.
pub trait DomBackend {
    /// Non-owning element handle
    type Node: Copy + Eq + Hash + Debug;

    /// Root element of the watched tree
    fn root(&self) -> Self::Node;

    /// Tag name of an element
    fn tag(&self, node: Self::Node) -> String;

    /// Class list of an element (class attribute split on whitespace)
    fn classes(&self, node: Self::Node) -> Vec<String>;

    /// Attribute value by name
    fn attr(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Concatenated text content of the element and its descendants
    fn text(&self, node: Self::Node) -> String;

    /// Parent element, if any
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Child elements in document order
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Replace the element's entire visible text with `text`.
    ///
    /// Matches DOM `textContent` assignment: after the call,
    /// [`text`](Self::text) on this element returns exactly `text`, with
    /// any previous descendant text gone.
    fn set_text(&mut self, node: Self::Node, text: &str);

    /// Move the listed children of `container` to the end of its child
    /// list, in the given order, as one batch.
    ///
    /// Children not listed keep their relative order at the front. Handles
    /// in `units` that are not currently children of `container` are
    /// ignored. The child identity multiset is unchanged: this is a pure
    /// reordering, never a removal or duplication.
    fn move_to_end(&mut self, container: Self::Node, units: &[Self::Node]);

    /// Reset the element's horizontal scroll offset to the start
    fn reset_scroll(&mut self, node: Self::Node);
}
