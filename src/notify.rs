//! The result notification and the restore path.
//!
//! A [`Notifier`] owns the single notification slot. At most one
//! notification element exists in the tree at any time: showing a new one
//! always removes the previous one first.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::{NodeId, TextTree};
use crate::error::Result;
use crate::highlight::Highlighter;
use crate::scope::Selector;

/// Identity and placement of the notification element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationStyle {
    /// Fixed id of the notification element.
    pub id: String,
    /// Class of the notification element.
    pub class: String,
    /// Class of the dismiss button.
    pub dismiss_class: String,
    /// Label of the dismiss button.
    pub dismiss_label: String,
    /// The notification is inserted right after the first element matching
    /// this selector, or at the top of the body when it matches nothing or
    /// is unset.
    pub anchor: Option<Selector>,
}

impl Default for NotificationStyle {
    fn default() -> Self {
        NotificationStyle {
            id: "searchNotification".to_string(),
            class: "search-notification".to_string(),
            dismiss_class: "search-notification-dismiss".to_string(),
            dismiss_label: "Clear".to_string(),
            anchor: Selector::parse(".navbar").ok(),
        }
    }
}

fn results_word(count: usize) -> &'static str {
    if count == 1 { "result" } else { "results" }
}

/// Manages the single notification element.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    style: NotificationStyle,
    current: Option<NodeId>,
}

impl Notifier {
    pub fn new(style: NotificationStyle) -> Self {
        Notifier {
            style,
            current: None,
        }
    }

    pub fn style(&self) -> &NotificationStyle {
        &self.style
    }

    /// The notification element currently shown, if any.
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Plain-text message, e.g. `Found 2 results for "daily"`.
    pub fn message(count: usize, query: &str) -> String {
        format!("Found {count} {} for \"{query}\"", results_word(count))
    }

    /// Replace any existing notification with one reporting `count` matches
    /// for `query`. Returns the new notification element.
    pub fn show<T: TextTree + ?Sized>(
        &mut self,
        tree: &mut T,
        count: usize,
        query: &str,
    ) -> Result<NodeId> {
        self.dismiss(tree)?;

        let notification = tree.create_element("div");
        tree.set_attr(notification, "id", &self.style.id)?;
        tree.add_class(notification, &self.style.class)?;

        // The query goes into a text node, so it can never become markup.
        let message = tree.create_element("span");
        let parts = [
            Segment::Text("Found ".to_string()),
            Segment::Strong(count.to_string()),
            Segment::Text(format!(" {} for \"", results_word(count))),
            Segment::Strong(query.to_string()),
            Segment::Text("\"".to_string()),
        ];
        for part in parts {
            let node = match part {
                Segment::Text(text) => tree.create_text(&text),
                Segment::Strong(text) => {
                    let strong = tree.create_element("strong");
                    let inner = tree.create_text(&text);
                    tree.append_child(strong, inner)?;
                    strong
                }
            };
            tree.append_child(message, node)?;
        }
        tree.append_child(notification, message)?;

        let button = tree.create_element("button");
        tree.set_attr(button, "type", "button")?;
        tree.add_class(button, &self.style.dismiss_class)?;
        let label = tree.create_text(&self.style.dismiss_label);
        tree.append_child(button, label)?;
        tree.append_child(notification, button)?;

        self.insert(tree, notification)?;
        self.current = Some(notification);
        debug!(%notification, count, "showing search notification");
        Ok(notification)
    }

    fn insert<T: TextTree + ?Sized>(&self, tree: &mut T, notification: NodeId) -> Result<()> {
        if let Some(anchor) = self
            .style
            .anchor
            .as_ref()
            .and_then(|selector| selector.find_first(tree))
            && let Some(parent) = tree.parent(anchor)
        {
            let next = tree.next_sibling(anchor);
            return tree.insert_before(parent, notification, next);
        }

        let body = tree
            .descendants(tree.root())
            .into_iter()
            .find(|&n| tree.tag(n) == Some("body"))
            .unwrap_or_else(|| tree.root());
        let first = tree.children(body).first().copied();
        tree.insert_before(body, notification, first)
    }

    /// Remove the notification, whether it is the one this notifier created
    /// or any other element carrying the fixed id. Returns whether anything
    /// was removed.
    pub fn dismiss<T: TextTree + ?Sized>(&mut self, tree: &mut T) -> Result<bool> {
        let mut removed = false;
        if let Some(current) = self.current.take()
            && tree.parent(current).is_some()
        {
            tree.remove(current)?;
            removed = true;
        }
        while let Some(stale) = tree.element_by_id(&self.style.id) {
            tree.remove(stale)?;
            removed = true;
        }
        Ok(removed)
    }

    /// Remove every highlight (restoring the original text runs) and the
    /// notification. Calling it with nothing to clear is a no-op.
    pub fn clear<T: TextTree + ?Sized>(
        &mut self,
        tree: &mut T,
        highlighter: &Highlighter,
    ) -> Result<usize> {
        let restored = highlighter.restore(tree)?;
        self.dismiss(tree)?;
        Ok(restored)
    }
}

enum Segment {
    Text(String),
    Strong(String),
}
