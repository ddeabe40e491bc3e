use std::collections::HashMap;

/// Handle to a node in a [`Document`](crate::dom::Document) arena.
///
/// Copyable and non-owning: holding a `NodeId` never keeps a detached
/// subtree alive, which is what makes the processed-marker sets safe to
/// retain for the lifetime of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single element stored in the document arena
#[derive(Debug, Clone)]
pub struct NodeData {
    /// HTML tag name (e.g., "div", "section", "span")
    pub tag_name: String,

    /// Element attributes (id, class, data-*, etc.)
    pub attributes: HashMap<String, String>,

    /// Text owned directly by this element (not including descendants)
    pub text: String,

    /// Parent element, if any
    pub parent: Option<NodeId>,

    /// Child elements, in document order
    pub children: Vec<NodeId>,

    /// Horizontal scroll offset, in pixels
    pub scroll_left: f64,
}

impl NodeData {
    pub(crate) fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
            scroll_left: 0.0,
        }
    }

    /// Check if the element carries a specific class
    pub fn has_class(&self, class_name: &str) -> bool {
        if let Some(classes) = self.attributes.get("class") {
            classes.split_whitespace().any(|c| c == class_name)
        } else {
            false
        }
    }

    /// Check if the element is a specific tag (ASCII case-insensitive)
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }
}
