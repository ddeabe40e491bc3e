use crate::dom::backend::DomBackend;
use crate::dom::node::{NodeData, NodeId};
use crate::error::{RankerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serialized element subtree, importable into a [`Document`].
///
/// Matches the JSON shape a host-side extraction script would emit: tag,
/// attribute map, own text, nested children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// HTML tag name
    pub tag_name: String,

    /// Element attributes
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Text owned directly by the element
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// Arena-backed in-memory document tree.
///
/// Serves two roles: the reference implementation of [`DomBackend`] that
/// every test runs against, and a substrate an embedder can populate from
/// a snapshot of a real page. Nodes are never freed, so handles stay valid
/// for the lifetime of the document, matching the process-lifetime model
/// of the pipeline (markers and counters reset on reload, not before).
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,

    /// When true, appended nodes are recorded in the change journal
    tracking: bool,

    /// Nodes appended since the journal was last drained
    added: Vec<NodeId>,
}

impl Document {
    /// Create a document with a single root element
    pub fn new(root_tag: impl Into<String>) -> Self {
        Self {
            nodes: vec![NodeData::new(root_tag)],
            root: NodeId(0),
            tracking: false,
            added: Vec::new(),
        }
    }

    /// Import a document from a JSON snapshot of a page subtree
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: NodeSnapshot = serde_json::from_str(json)
            .map_err(|e| RankerError::SnapshotParse(format!("Failed to parse snapshot JSON: {}", e)))?;
        Ok(Self::from_snapshot(&snapshot))
    }

    /// Build a document from an in-memory snapshot tree
    pub fn from_snapshot(snapshot: &NodeSnapshot) -> Self {
        let mut doc = Document::new(&snapshot.tag_name);
        let root = doc.root;
        doc.nodes[root.index()].attributes = snapshot.attributes.clone();
        doc.nodes[root.index()].text = snapshot.text.clone();
        for child in &snapshot.children {
            doc.import_subtree(root, child);
        }
        doc
    }

    fn import_subtree(&mut self, parent: NodeId, snapshot: &NodeSnapshot) {
        let node = self.append(parent, &snapshot.tag_name);
        self.nodes[node.index()].attributes = snapshot.attributes.clone();
        self.nodes[node.index()].text = snapshot.text.clone();
        for child in &snapshot.children {
            self.import_subtree(node, child);
        }
    }

    /// Append a new child element under `parent` and return its handle
    pub fn append(&mut self, parent: NodeId, tag: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut data = NodeData::new(tag);
        data.parent = Some(parent);
        self.nodes.push(data);
        self.nodes[parent.index()].children.push(id);
        if self.tracking {
            self.added.push(id);
        }
        id
    }

    /// Set an attribute on an element
    pub fn set_attr(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        self.nodes[node.index()]
            .attributes
            .insert(name.into(), value.into());
    }

    /// Detach an element from its parent (host-side removal; the pipeline
    /// itself never calls this)
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|&c| c != node);
        }
    }

    /// Direct access to node data
    pub fn node(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.index()]
    }

    /// Current horizontal scroll offset of an element
    pub fn scroll_left(&self, node: NodeId) -> f64 {
        self.nodes[node.index()].scroll_left
    }

    /// Set the horizontal scroll offset of an element
    pub fn set_scroll_left(&mut self, node: NodeId, offset: f64) {
        self.nodes[node.index()].scroll_left = offset;
    }

    /// Start recording appended nodes in the change journal.
    ///
    /// Models the host subscription boundary: once active, batches of
    /// added nodes can be drained with [`take_added`](Self::take_added)
    /// and fed to the controller, the way a mutation-observer callback
    /// delivers `addedNodes`.
    pub fn track_changes(&mut self) {
        self.tracking = true;
    }

    /// Stop recording appended nodes and discard any undrained batch
    pub fn untrack_changes(&mut self) {
        self.tracking = false;
        self.added.clear();
    }

    /// Drain the batch of nodes appended since the last drain
    pub fn take_added(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.added)
    }

    /// Total number of elements in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the document holds only its root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

impl DomBackend for Document {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.root
    }

    fn tag(&self, node: NodeId) -> String {
        self.nodes[node.index()].tag_name.clone()
    }

    fn classes(&self, node: NodeId) -> Vec<String> {
        self.nodes[node.index()]
            .attributes
            .get("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes[node.index()].attributes.get(name).cloned()
    }

    fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.index()].children.clone()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.index()].text = text.to_string();
        // textContent semantics: descendant text is replaced too
        let children = self.nodes[node.index()].children.clone();
        for child in children {
            self.clear_text(child);
        }
    }

    fn move_to_end(&mut self, container: NodeId, units: &[NodeId]) {
        let current = &self.nodes[container.index()].children;

        // Only children of this container move; stale handles are skipped
        let moving: Vec<NodeId> = units
            .iter()
            .copied()
            .filter(|u| current.contains(u))
            .collect();

        let mut reordered: Vec<NodeId> = current
            .iter()
            .copied()
            .filter(|c| !moving.contains(c))
            .collect();
        reordered.extend(&moving);

        self.nodes[container.index()].children = reordered;
    }

    fn reset_scroll(&mut self, node: NodeId) {
        self.nodes[node.index()].scroll_left = 0.0;
    }
}

impl Document {
    fn collect_text(&self, node: NodeId, out: &mut String) {
        let data = &self.nodes[node.index()];
        out.push_str(&data.text);
        for &child in &data.children {
            self.collect_text(child, out);
        }
    }

    fn clear_text(&mut self, node: NodeId) {
        self.nodes[node.index()].text.clear();
        let children = self.nodes[node.index()].children.clone();
        for child in children {
            self.clear_text(child);
        }
    }
}
