//! Arena-backed document.
//!
//! All nodes live in one `Vec`; a [`NodeId`] is an index into it. Removing a
//! node only detaches it, so ids handed out earlier never dangle.

use scraper::{ElementRef, Html};

use crate::dom::node::{ElementData, NodeData, NodeId};
use crate::dom::tree::TextTree;
use crate::error::{PagemarkError, Result};
use crate::html;

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Node {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// An in-memory HTML document.
///
/// A parsed document also keeps the `scraper` tree it was read from, which
/// answers CSS selector queries for the nodes that came from the markup.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    doctype: Option<String>,
    source: Option<Html>,
    /// Arena node for each source node, in source pre-order.
    source_nodes: Vec<Option<NodeId>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the root node.
    pub fn new() -> Self {
        Document {
            nodes: vec![Node::new(NodeData::Document)],
            doctype: None,
            source: None,
            source_nodes: Vec::new(),
        }
    }

    /// Parse an HTML document or fragment.
    ///
    /// Parsing never fails: malformed markup is recovered the way a browser
    /// would recover it.
    pub fn parse(markup: &str) -> Self {
        html::parse(markup)
    }

    /// Serialize the whole document back to HTML.
    pub fn to_html(&self) -> String {
        html::serialize(self, self.root())
    }

    /// Serialize the children of `node` (the equivalent of `innerHTML`).
    pub fn inner_html(&self, node: NodeId) -> String {
        self.children(node)
            .iter()
            .map(|&child| html::serialize(self, child))
            .collect()
    }

    /// Doctype name read from the source, e.g. `html`.
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    pub fn set_doctype(&mut self, doctype: Option<String>) {
        self.doctype = doctype;
    }

    /// Payload of a node.
    pub fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.index()).map(|n| &n.data)
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Whether `node` is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        node == self.root() || self.is_ancestor(self.root(), node)
    }

    /// The `body` element, if the document has one.
    pub fn body(&self) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&n| self.tag(n) == Some("body"))
    }

    /// Append a freshly read node under `parent` without the checks of
    /// [`TextTree::insert_before`].
    pub(crate) fn push_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.push(data);
        if let Some(node) = self.nodes.get_mut(parent.index()) {
            node.children.push(id);
            if let Some(child) = self.nodes.get_mut(id.index()) {
                child.parent = Some(parent);
            }
        }
        id
    }

    pub(crate) fn set_source(&mut self, source: Html, source_nodes: Vec<Option<NodeId>>) {
        self.source = Some(source);
        self.source_nodes = source_nodes;
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.index())
            .ok_or_else(|| PagemarkError::invalid_node(format!("{id} is out of range")))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .ok_or_else(|| PagemarkError::invalid_node(format!("{id} is out of range")))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData> {
        self.node_mut(id)?
            .data
            .as_element_mut()
            .ok_or_else(|| PagemarkError::invalid_node(format!("{id} is not an element")))
    }

    fn detach(&mut self, id: NodeId) -> Result<()> {
        if let Some(parent) = self.node(id)?.parent {
            self.node_mut(parent)?.children.retain(|&c| c != id);
            self.node_mut(id)?.parent = None;
        }
        Ok(())
    }
}

impl TextTree for Document {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        self.data(node)?.as_element().map(ElementData::tag)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.data(node)?.as_text()
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.data(node)?.as_element()?.attr(name)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.data(node)
            .and_then(NodeData::as_element)
            .is_some_and(|element| element.has_class(class))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index())?.parent
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.index())
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(tag)))
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.element_mut(node)?.set_attr(name, value);
        Ok(())
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.element_mut(node)?.add_class(class);
        Ok(())
    }

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.element_mut(node)?.remove_class(class);
        Ok(())
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        match &mut self.node_mut(node)?.data {
            NodeData::Text(existing) => {
                *existing = text.to_string();
                Ok(())
            }
            _ => Err(PagemarkError::invalid_node(format!(
                "{node} is not a text node"
            ))),
        }
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        if child == self.root() || child == parent || self.is_ancestor(child, parent) {
            return Err(PagemarkError::invalid_node(format!(
                "cannot insert {child} under {parent}"
            )));
        }
        if matches!(self.node(parent)?.data, NodeData::Text(_) | NodeData::Comment(_)) {
            return Err(PagemarkError::invalid_node(format!(
                "{parent} is a text or comment node and cannot have children"
            )));
        }
        self.node(child)?;
        self.detach(child)?;

        let siblings = &self.node(parent)?.children;
        let position = match reference {
            Some(reference) => siblings.iter().position(|&c| c == reference).ok_or_else(|| {
                PagemarkError::invalid_node(format!("{reference} is not a child of {parent}"))
            })?,
            None => siblings.len(),
        };

        self.node_mut(parent)?.children.insert(position, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn remove(&mut self, node: NodeId) -> Result<()> {
        if node == self.root() {
            return Err(PagemarkError::invalid_node("the root cannot be removed"));
        }
        self.detach(node)
    }

    fn select(&self, selector: &scraper::Selector) -> Vec<NodeId> {
        let Some(source) = &self.source else {
            return Vec::new();
        };
        source
            .tree
            .root()
            .descendants()
            .zip(&self.source_nodes)
            .filter_map(|(node, &ours)| {
                let element = ElementRef::wrap(node)?;
                let ours = ours?;
                selector.matches(&element).then_some(ours)
            })
            .filter(|&node| self.is_attached(node))
            .collect()
    }
}
