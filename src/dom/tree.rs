//! The capability trait the search engine is written against.

use crate::dom::node::NodeId;
use crate::error::{PagemarkError, Result};

/// A mutable tree of elements and text nodes.
///
/// Implementors provide the primitive reads and mutations; traversal, text
/// extraction and normalization are provided on top of them so every
/// implementation behaves the same way.
pub trait TextTree {
    /// The root node. It is neither an element nor a text node.
    fn root(&self) -> NodeId;

    /// Tag name, or `None` if `node` is not an element.
    fn tag(&self, node: NodeId) -> Option<&str>;

    /// Text of a text node, or `None` for any other node.
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Attribute value of an element.
    fn attr(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Whether the element carries `class` in its class list.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children in document order. Empty for text nodes.
    fn children(&self, node: NodeId) -> &[NodeId];

    fn create_element(&mut self, tag: &str) -> NodeId;

    fn create_text(&mut self, text: &str) -> NodeId;

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()>;

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<()>;

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()>;

    /// Replace the contents of a text node.
    fn set_text(&mut self, node: NodeId, text: &str) -> Result<()>;

    /// Insert `child` under `parent` before `reference`, or last when
    /// `reference` is `None`. A `child` that is already attached is moved.
    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()>;

    /// Detach `node` (and its subtree) from its parent.
    fn remove(&mut self, node: NodeId) -> Result<()>;

    /// Attached elements matching a CSS selector, in document order.
    ///
    /// Selectors are evaluated against the markup the tree was read from, so
    /// elements created afterwards never match.
    fn select(&self, selector: &scraper::Selector) -> Vec<NodeId>;

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_before(parent, child, None)
    }

    /// Put `new` in the position currently held by `old`, detaching `old`.
    fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        let parent = self
            .parent(old)
            .ok_or_else(|| PagemarkError::invalid_node(format!("{old} has no parent")))?;
        self.insert_before(parent, new, Some(old))?;
        self.remove(old)
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.tag(node).is_some()
    }

    fn is_text(&self, node: NodeId) -> bool {
        self.text(node).is_some()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&n| n == node)?;
        siblings.get(position + 1).copied()
    }

    fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
            .collect()
    }

    /// All nodes below `node` in document (pre-)order, excluding `node`.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Whether `ancestor` is a proper ancestor of `node`.
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Concatenated text of all descendant text nodes.
    fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.text(node) {
            return text.to_string();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// First attached element whose `id` attribute equals `id`.
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&n| self.attr(n, "id") == Some(id))
    }

    /// First attached element carrying `class`.
    fn first_with_class(&self, class: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&n| self.has_class(n, class))
    }

    /// All attached elements carrying `class`, in document order.
    fn all_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    /// Merge adjacent text nodes and drop empty ones throughout the subtree
    /// rooted at `node`.
    fn normalize(&mut self, node: NodeId) -> Result<()> {
        let children = self.children(node).to_vec();
        let mut run_head: Option<NodeId> = None;
        for child in children {
            let Some(text) = self.text(child).map(str::to_string) else {
                run_head = None;
                self.normalize(child)?;
                continue;
            };
            if text.is_empty() {
                self.remove(child)?;
                continue;
            }
            match run_head {
                Some(head) => {
                    let merged = format!("{}{}", self.text(head).unwrap_or_default(), text);
                    self.set_text(head, &merged)?;
                    self.remove(child)?;
                }
                None => run_head = Some(child),
            }
        }
        Ok(())
    }
}
