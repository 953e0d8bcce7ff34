//! Which parts of a document are searched.
//!
//! A [`SearchScope`] is built from CSS [`Selector`]s: the elements to scan,
//! the regions never to enter (navigation, footer), the leaf whitelist of
//! tags that may be highlighted even when they have element children, and
//! the inline tags such children are allowed to be.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dom::{NodeId, TextTree};
use crate::error::{PagemarkError, Result};

/// A CSS selector (or selector list) such as `p`, `.card-body > h2` or
/// `#main, footer`.
///
/// Selectors compare and serialize by their source text.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector {
    source: String,
    compiled: scraper::Selector,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let source = input.trim();
        if source.is_empty() {
            return Err(PagemarkError::parse("empty selector"));
        }
        let compiled = scraper::Selector::parse(source)
            .map_err(|e| PagemarkError::parse(format!("invalid selector '{source}': {e:?}")))?;
        Ok(Selector {
            source: source.to_string(),
            compiled,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Attached elements matching this selector, in document order.
    pub fn select<T: TextTree + ?Sized>(&self, tree: &T) -> Vec<NodeId> {
        tree.select(&self.compiled)
    }

    pub fn matches<T: TextTree + ?Sized>(&self, tree: &T, node: NodeId) -> bool {
        self.select(tree).contains(&node)
    }

    /// First attached element matching this selector, in document order.
    pub fn find_first<T: TextTree + ?Sized>(&self, tree: &T) -> Option<NodeId> {
        self.select(tree).into_iter().next()
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Selector {}

impl Hash for Selector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl FromStr for Selector {
    type Err = PagemarkError;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

impl TryFrom<String> for Selector {
    type Error = PagemarkError;

    fn try_from(value: String) -> Result<Self> {
        Selector::parse(&value)
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.source
    }
}

/// Why an element in scope was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    /// May be scanned and highlighted.
    Eligible,
    /// Lies inside an excluded region such as the navigation bar.
    Excluded,
    /// Has element children and its tag is not on the leaf whitelist.
    Structural,
    /// Whitelisted, but contains children that are not inline markup.
    Malformed,
}

/// The selector-defined set of elements a search may touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchScope {
    include: Vec<Selector>,
    exclude: Vec<Selector>,
    leaf_tags: Vec<String>,
    inline_tags: Vec<String>,
}

impl Default for SearchScope {
    fn default() -> Self {
        SearchScope::new(
            default_include(),
            default_exclude(),
            default_leaf_tags(),
            default_inline_tags(),
        )
    }
}

impl SearchScope {
    pub fn new(
        include: Vec<Selector>,
        exclude: Vec<Selector>,
        leaf_tags: Vec<String>,
        inline_tags: Vec<String>,
    ) -> Self {
        let lower = |tags: Vec<String>| -> Vec<String> {
            tags.into_iter().map(|t| t.to_ascii_lowercase()).collect()
        };
        SearchScope {
            include,
            exclude,
            leaf_tags: lower(leaf_tags),
            inline_tags: lower(inline_tags),
        }
    }

    pub fn include(&self) -> &[Selector] {
        &self.include
    }

    pub fn exclude(&self) -> &[Selector] {
        &self.exclude
    }

    pub fn is_leaf_tag(&self, tag: &str) -> bool {
        self.leaf_tags.iter().any(|t| t == tag)
    }

    pub fn is_inline_tag(&self, tag: &str) -> bool {
        self.inline_tags.iter().any(|t| t == tag)
    }

    /// Elements matching any include selector, in document order.
    pub fn elements<T: TextTree + ?Sized>(&self, tree: &T) -> Vec<NodeId> {
        let included: HashSet<NodeId> = self
            .include
            .iter()
            .flat_map(|selector| selector.select(tree))
            .collect();
        tree.descendants(tree.root())
            .into_iter()
            .filter(|n| included.contains(n))
            .collect()
    }

    /// Whether `node` is, or lies inside, an excluded region.
    pub fn is_excluded<T: TextTree + ?Sized>(&self, tree: &T, node: NodeId) -> bool {
        is_within(tree, node, &self.excluded_regions(tree))
    }

    /// Classify an element in scope.
    ///
    /// Elements without element children are always eligible. Elements with
    /// children are eligible only when their tag is on the leaf whitelist and
    /// every descendant element is inline markup.
    pub fn eligibility<T: TextTree + ?Sized>(&self, tree: &T, node: NodeId) -> Eligibility {
        self.classify_one(tree, node, &self.excluded_regions(tree))
    }

    /// Every element in scope with its eligibility, in document order.
    pub fn classify<T: TextTree + ?Sized>(&self, tree: &T) -> Vec<(NodeId, Eligibility)> {
        let excluded = self.excluded_regions(tree);
        self.elements(tree)
            .into_iter()
            .map(|node| (node, self.classify_one(tree, node, &excluded)))
            .collect()
    }

    fn excluded_regions<T: TextTree + ?Sized>(&self, tree: &T) -> HashSet<NodeId> {
        self.exclude
            .iter()
            .flat_map(|selector| selector.select(tree))
            .collect()
    }

    fn classify_one<T: TextTree + ?Sized>(
        &self,
        tree: &T,
        node: NodeId,
        excluded: &HashSet<NodeId>,
    ) -> Eligibility {
        if is_within(tree, node, excluded) {
            return Eligibility::Excluded;
        }
        if tree.element_children(node).is_empty() {
            return Eligibility::Eligible;
        }
        match tree.tag(node) {
            Some(tag) if self.is_leaf_tag(tag) => {}
            _ => return Eligibility::Structural,
        }
        let all_inline = tree
            .descendants(node)
            .into_iter()
            .filter_map(|n| tree.tag(n))
            .all(|tag| self.is_inline_tag(tag));
        if all_inline {
            Eligibility::Eligible
        } else {
            Eligibility::Malformed
        }
    }
}

fn is_within<T: TextTree + ?Sized>(tree: &T, node: NodeId, regions: &HashSet<NodeId>) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if regions.contains(&n) {
            return true;
        }
        current = tree.parent(n);
    }
    false
}

pub fn default_include() -> Vec<Selector> {
    [
        ".section",
        ".hero",
        ".card-body",
        ".card-header",
        "h1",
        "h2",
        "h3",
        "h4",
        "p",
        "li",
        "td",
        "th",
    ]
    .iter()
    .filter_map(|s| Selector::parse(s).ok())
    .collect()
}

pub fn default_exclude() -> Vec<Selector> {
    ["nav", "footer", ".navbar", ".footer"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
}

pub fn default_leaf_tags() -> Vec<String> {
    ["td", "th", "li", "p"].iter().map(|s| s.to_string()).collect()
}

pub fn default_inline_tags() -> Vec<String> {
    [
        "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "del", "dfn", "em", "i",
        "ins", "kbd", "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time",
        "u", "var", "wbr",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
