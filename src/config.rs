//! Engine configuration.
//!
//! [`EngineConfig`] collects every tunable of the search engine. Its default
//! matches a typical dashboard page: content containers and text tags are
//! searched, the navigation bar and footer are not, and highlights are
//! `<mark class="search-highlight">` elements.
//!
//! # Example
//!
//! ```
//! use pagemark::config::EngineConfig;
//!
//! let config = EngineConfig::builder()
//!     .min_query_chars(3)
//!     .highlight_class("hit")
//!     .build()
//!     .unwrap();
//! assert_eq!(config.min_query_chars, 3);
//! assert_eq!(config.marker.class, "hit");
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PagemarkError, Result};
use crate::highlight::MarkerStyle;
use crate::notify::NotificationStyle;
use crate::query::DEFAULT_MIN_QUERY_CHARS;
use crate::scope::{
    SearchScope, Selector, default_exclude, default_include, default_inline_tags,
    default_leaf_tags,
};
use crate::viewport::ScrollBlock;

/// Configuration for [`SearchEngine`](crate::engine::SearchEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Minimum trimmed query length, in characters.
    pub min_query_chars: usize,
    /// Elements to scan.
    pub include: Vec<Selector>,
    /// Regions never searched (navigation, footer).
    pub exclude: Vec<Selector>,
    /// Tags that may be highlighted even when they contain elements.
    pub leaf_tags: Vec<String>,
    /// Tags allowed inside a whitelisted element.
    pub inline_tags: Vec<String>,
    /// Highlight marker appearance.
    pub marker: MarkerStyle,
    /// Notification identity and placement.
    pub notification: NotificationStyle,
    /// Alignment used when scrolling to the first result.
    pub scroll_block: ScrollBlock,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            include: default_include(),
            exclude: default_exclude(),
            leaf_tags: default_leaf_tags(),
            inline_tags: default_inline_tags(),
            marker: MarkerStyle::default(),
            notification: NotificationStyle::default(),
            scroll_block: ScrollBlock::Center,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check values that deserialize fine but cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.min_query_chars == 0 {
            return Err(PagemarkError::config("min_query_chars must be at least 1"));
        }
        if self.include.is_empty() {
            return Err(PagemarkError::config("include must name at least one selector"));
        }

        let required = [
            ("marker.tag", &self.marker.tag),
            ("marker.class", &self.marker.class),
            ("marker.active_class", &self.marker.active_class),
            ("notification.id", &self.notification.id),
            ("notification.class", &self.notification.class),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(PagemarkError::config(format!("{name} must not be empty")));
            }
            if value.contains(char::is_whitespace) {
                return Err(PagemarkError::config(format!(
                    "{name} must be a single token, got '{value}'"
                )));
            }
        }

        if self.marker.class == self.marker.active_class {
            return Err(PagemarkError::config(
                "marker.class and marker.active_class must differ",
            ));
        }
        if !self.inline_tags.iter().any(|t| t.eq_ignore_ascii_case(&self.marker.tag)) {
            return Err(PagemarkError::config(format!(
                "marker.tag '{}' must be listed in inline_tags",
                self.marker.tag
            )));
        }
        Ok(())
    }

    /// The search scope described by this configuration.
    pub fn scope(&self) -> SearchScope {
        SearchScope::new(
            self.include.clone(),
            self.exclude.clone(),
            self.leaf_tags.clone(),
            self.inline_tags.clone(),
        )
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_query_chars(mut self, chars: usize) -> Self {
        self.config.min_query_chars = chars;
        self
    }

    pub fn include(mut self, selectors: Vec<Selector>) -> Self {
        self.config.include = selectors;
        self
    }

    pub fn exclude(mut self, selectors: Vec<Selector>) -> Self {
        self.config.exclude = selectors;
        self
    }

    pub fn leaf_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.config.leaf_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn highlight_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.config.marker.tag = tag.into();
        self
    }

    pub fn highlight_class<S: Into<String>>(mut self, class: S) -> Self {
        self.config.marker.class = class.into();
        self
    }

    pub fn active_class<S: Into<String>>(mut self, class: S) -> Self {
        self.config.marker.active_class = class.into();
        self
    }

    pub fn notification_id<S: Into<String>>(mut self, id: S) -> Self {
        self.config.notification.id = id.into();
        self
    }

    pub fn notification_anchor(mut self, anchor: Selector) -> Self {
        self.config.notification.anchor = Some(anchor);
        self
    }

    pub fn scroll_block(mut self, block: ScrollBlock) -> Self {
        self.config.scroll_block = block;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
