//! Scanning the scope and wrapping matches in marker elements.
//!
//! Highlighting works on text nodes, never on serialized markup: each text
//! node holding a match is split around it and the matched text is moved
//! into a marker element. [`Highlighter::restore`] is the exact inverse.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::dom::{NodeId, TextTree};
use crate::error::{PagemarkError, Result};
use crate::query::MatchPattern;
use crate::scope::{Eligibility, SearchScope};

/// How highlight markers look in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerStyle {
    /// Tag of the wrapper element (e.g. "mark").
    pub tag: String,
    /// Class identifying every marker.
    pub class: String,
    /// Extra class carried by the first marker of a search.
    pub active_class: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        MarkerStyle {
            tag: "mark".to_string(),
            class: "search-highlight".to_string(),
            active_class: "search-highlight-active".to_string(),
        }
    }
}

impl MarkerStyle {
    fn is_marker<T: TextTree + ?Sized>(&self, tree: &T, node: NodeId) -> bool {
        tree.tag(node) == Some(self.tag.as_str()) && tree.has_class(node, &self.class)
    }
}

/// A scope element that was not scanned, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedElement {
    pub node: NodeId,
    pub tag: String,
    pub reason: Eligibility,
}

/// Outcome of one highlighting pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightReport {
    /// Total matches highlighted.
    pub total: usize,
    /// Matches per scanned element, in document order.
    pub per_element: Vec<(NodeId, usize)>,
    /// Marker elements created, in document order.
    pub highlights: Vec<NodeId>,
    /// Scope elements left untouched.
    pub skipped: Vec<SkippedElement>,
}

impl HighlightReport {
    /// The first marker, which carries the active class.
    pub fn active(&self) -> Option<NodeId> {
        self.highlights.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Applies and removes highlight markers within a [`SearchScope`].
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    scope: SearchScope,
    style: MarkerStyle,
}

impl Highlighter {
    pub fn new(scope: SearchScope, style: MarkerStyle) -> Self {
        Highlighter { scope, style }
    }

    pub fn scope(&self) -> &SearchScope {
        &self.scope
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    /// Wrap every match of `pattern` inside the eligible scope elements.
    ///
    /// The tree is expected to be free of markers; callers restore first.
    pub fn highlight<T: TextTree + ?Sized>(
        &self,
        tree: &mut T,
        pattern: &MatchPattern,
    ) -> Result<HighlightReport> {
        let mut report = HighlightReport::default();
        let mut visited: HashSet<NodeId> = HashSet::new();

        // Eligibility reflects the document as read, before any marker
        // is inserted.
        for (element, eligibility) in self.scope.classify(tree) {
            let tag = tree.tag(element).unwrap_or_default().to_string();
            match eligibility {
                Eligibility::Eligible => {}
                Eligibility::Malformed => {
                    warn!(
                        "skipping: {}",
                        PagemarkError::malformed(format!(
                            "<{tag}> {element} has block-level children"
                        ))
                    );
                    report.skipped.push(SkippedElement {
                        node: element,
                        tag,
                        reason: Eligibility::Malformed,
                    });
                    continue;
                }
                reason => {
                    trace!(%element, %tag, ?reason, "element not eligible");
                    report.skipped.push(SkippedElement {
                        node: element,
                        tag,
                        reason,
                    });
                    continue;
                }
            }

            let text_nodes = self.pending_text_nodes(tree, element, &visited);
            if text_nodes.is_empty() {
                trace!(%element, %tag, "text already scanned through an enclosing element");
                continue;
            }
            if !pattern.is_match(&tree.text_content(element)) {
                visited.extend(text_nodes);
                continue;
            }

            let count = self.highlight_text_nodes(
                tree,
                text_nodes,
                pattern,
                &mut visited,
                &mut report.highlights,
            )?;
            if count == 0 {
                debug!(%element, %tag, "text matched only across markup boundaries");
                continue;
            }
            debug!(%element, %tag, count, "highlighted element");
            report.per_element.push((element, count));
            report.total += count;
        }

        if let Some(first) = report.active() {
            tree.add_class(first, &self.style.active_class)?;
        }
        Ok(report)
    }

    /// Text nodes under `element` not yet scanned and not inside a marker.
    fn pending_text_nodes<T: TextTree + ?Sized>(
        &self,
        tree: &T,
        element: NodeId,
        visited: &HashSet<NodeId>,
    ) -> Vec<NodeId> {
        tree.descendants(element)
            .into_iter()
            .filter(|&n| tree.is_text(n) && !visited.contains(&n))
            .filter(|&n| !self.inside_marker(tree, n, element))
            .collect()
    }

    fn highlight_text_nodes<T: TextTree + ?Sized>(
        &self,
        tree: &mut T,
        text_nodes: Vec<NodeId>,
        pattern: &MatchPattern,
        visited: &mut HashSet<NodeId>,
        highlights: &mut Vec<NodeId>,
    ) -> Result<usize> {
        let mut count = 0;
        for node in text_nodes {
            visited.insert(node);
            let text = tree.text(node).unwrap_or_default().to_string();
            let ranges = pattern.find_ranges(&text);
            if ranges.is_empty() {
                continue;
            }
            let parent = tree
                .parent(node)
                .ok_or_else(|| PagemarkError::invalid_node(format!("{node} has no parent")))?;

            let mut cursor = 0;
            for range in ranges {
                if range.start > cursor {
                    let before = tree.create_text(&text[cursor..range.start]);
                    tree.insert_before(parent, before, Some(node))?;
                    visited.insert(before);
                }
                let marker = tree.create_element(&self.style.tag);
                tree.add_class(marker, &self.style.class)?;
                let inner = tree.create_text(&text[range.clone()]);
                tree.append_child(marker, inner)?;
                tree.insert_before(parent, marker, Some(node))?;
                highlights.push(marker);
                count += 1;
                cursor = range.end;
            }

            // The original node keeps whatever follows the last match.
            if cursor < text.len() {
                tree.set_text(node, &text[cursor..])?;
            } else {
                tree.remove(node)?;
            }
        }
        Ok(count)
    }

    fn inside_marker<T: TextTree + ?Sized>(&self, tree: &T, node: NodeId, stop: NodeId) -> bool {
        let mut current = tree.parent(node);
        while let Some(parent) = current {
            if self.style.is_marker(tree, parent) {
                return true;
            }
            if parent == stop {
                return false;
            }
            current = tree.parent(parent);
        }
        false
    }

    /// Replace every marker with its plain text and re-merge the text runs
    /// it split. Returns the number of markers removed.
    ///
    /// Idempotent: a tree without markers is left untouched.
    pub fn restore<T: TextTree + ?Sized>(&self, tree: &mut T) -> Result<usize> {
        let view: &T = tree;
        let markers: Vec<NodeId> = view
            .all_with_class(&self.style.class)
            .into_iter()
            .filter(|&n| self.style.is_marker(view, n))
            .collect();

        let mut parents: Vec<NodeId> = Vec::new();
        for &marker in &markers {
            let Some(parent) = tree.parent(marker) else {
                continue;
            };
            let text = tree.text_content(marker);
            let plain = tree.create_text(&text);
            tree.replace(marker, plain)?;
            if !parents.contains(&parent) {
                parents.push(parent);
            }
        }
        for parent in parents {
            tree.normalize(parent)?;
        }

        if !markers.is_empty() {
            debug!(removed = markers.len(), "restored highlighted text");
        }
        Ok(markers.len())
    }
}
