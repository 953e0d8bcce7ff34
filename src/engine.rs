//! The search cycle and the input controller.
//!
//! [`SearchEngine`] runs one search: normalize the query, restore the tree,
//! highlight, then notify. [`SearchController`] sits in front of it and maps
//! input events (enter, escape, the notification's dismiss button) onto
//! engine calls and user-facing feedback.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::dom::{NodeId, TextTree};
use crate::error::{PagemarkError, Result};
use crate::highlight::{HighlightReport, Highlighter};
use crate::notify::Notifier;
use crate::query;
use crate::viewport::{NoViewport, Viewport};

/// Result of a search that found at least one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// The trimmed query.
    pub query: String,
    /// Total number of highlights.
    pub count: usize,
    /// Message shown in the notification.
    pub message: String,
    /// The notification element.
    pub notification: NodeId,
    /// Highlight details.
    pub report: HighlightReport,
}

impl SearchOutcome {
    /// The highlight carrying the active class.
    pub fn active(&self) -> Option<NodeId> {
        self.report.active()
    }
}

/// Composes the normalizer, highlighter and notifier.
#[derive(Debug)]
pub struct SearchEngine<V: Viewport = NoViewport> {
    config: EngineConfig,
    highlighter: Highlighter,
    notifier: Notifier,
    viewport: V,
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::new(EngineConfig::default())
    }
}

impl SearchEngine {
    /// Create an engine without a viewport.
    pub fn new(config: EngineConfig) -> Self {
        SearchEngine::with_viewport(config, NoViewport)
    }
}

impl<V: Viewport> SearchEngine<V> {
    pub fn with_viewport(config: EngineConfig, viewport: V) -> Self {
        let highlighter = Highlighter::new(config.scope(), config.marker.clone());
        let notifier = Notifier::new(config.notification.clone());
        SearchEngine {
            config,
            highlighter,
            notifier,
            viewport,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// The notification currently shown, if any.
    pub fn notification(&self) -> Option<NodeId> {
        self.notifier.current()
    }

    /// Search `tree` for `raw` and highlight every match.
    ///
    /// A query that is too short fails with [`PagemarkError::TooShort`]
    /// before anything is touched. Otherwise previous highlights and the
    /// notification are removed first, so a search that finds nothing
    /// leaves a clean tree and fails with [`PagemarkError::NoMatches`].
    pub fn search<T: TextTree + ?Sized>(&mut self, tree: &mut T, raw: &str) -> Result<SearchOutcome> {
        let pattern = query::normalize(raw, self.config.min_query_chars)?;
        let query = pattern.query().to_string();

        let restored = self.notifier.clear(tree, &self.highlighter)?;
        if restored > 0 {
            debug!(restored, "cleared previous search");
        }

        let report = match self.highlighter.highlight(tree, &pattern) {
            Ok(report) => report,
            Err(e) => {
                // Leave the tree as it was before this search.
                self.highlighter.restore(tree)?;
                return Err(e);
            }
        };

        if report.is_empty() {
            info!(%query, skipped = report.skipped.len(), "no results");
            return Err(PagemarkError::no_matches(query));
        }

        let count = report.total;
        let notification = self.notifier.show(tree, count, &query)?;
        if let Some(active) = report.active() {
            self.viewport.scroll_into_view(active, self.config.scroll_block);
        }

        info!(
            %query,
            count,
            elements = report.per_element.len(),
            skipped = report.skipped.len(),
            "search complete"
        );
        Ok(SearchOutcome {
            message: Notifier::message(count, &query),
            query,
            count,
            notification,
            report,
        })
    }

    /// Remove every highlight and the notification. Returns the number of
    /// highlights removed.
    pub fn clear<T: TextTree + ?Sized>(&mut self, tree: &mut T) -> Result<usize> {
        let removed = self.notifier.clear(tree, &self.highlighter)?;
        info!(removed, "search cleared");
        Ok(removed)
    }
}

/// Input events driving a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Enter pressed with the given input value.
    Submit(String),
    /// Escape pressed in the input.
    Cancel,
    /// The notification's dismiss button.
    Dismiss,
}

/// What the user should see after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Feedback {
    /// Nothing happened (empty submit).
    Ignored,
    /// The query was too short.
    Rejected(String),
    /// The query was valid but matched nothing.
    NoResults(String),
    /// Matches were highlighted.
    Found { count: usize, message: String },
    /// Highlights and notification were removed.
    Cleared,
}

impl Feedback {
    pub fn message(&self) -> Option<&str> {
        match self {
            Feedback::Rejected(msg) | Feedback::NoResults(msg) => Some(msg),
            Feedback::Found { message, .. } => Some(message),
            Feedback::Ignored | Feedback::Cleared => None,
        }
    }
}

/// Holds the search input's value and dispatches [`TriggerEvent`]s.
#[derive(Debug)]
pub struct SearchController<V: Viewport = NoViewport> {
    engine: SearchEngine<V>,
    value: String,
}

impl<V: Viewport> SearchController<V> {
    pub fn new(engine: SearchEngine<V>) -> Self {
        SearchController {
            engine,
            value: String::new(),
        }
    }

    pub fn engine(&self) -> &SearchEngine<V> {
        &self.engine
    }

    /// Current content of the search input.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn handle<T: TextTree + ?Sized>(
        &mut self,
        tree: &mut T,
        event: TriggerEvent,
    ) -> Result<Feedback> {
        match event {
            TriggerEvent::Submit(raw) => {
                self.value = raw;
                if self.value.trim().is_empty() {
                    return Ok(Feedback::Ignored);
                }
                match self.engine.search(tree, &self.value) {
                    Ok(outcome) => Ok(Feedback::Found {
                        count: outcome.count,
                        message: outcome.message,
                    }),
                    Err(e @ PagemarkError::TooShort { .. }) => Ok(Feedback::Rejected(e.to_string())),
                    Err(e @ PagemarkError::NoMatches(_)) => Ok(Feedback::NoResults(e.to_string())),
                    Err(e) => Err(e),
                }
            }
            TriggerEvent::Cancel | TriggerEvent::Dismiss => {
                self.engine.clear(tree)?;
                self.value.clear();
                Ok(Feedback::Cleared)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::scope::Selector;
    use crate::viewport::{RecordingViewport, ScrollBlock};

    const PAGE: &str = "<body><nav class=\"navbar\"><ul><li>Daily</li></ul></nav>\
        <main><p>Daily rounds happen daily.</p><div class=\"card-body\"><div>daily</div></div></main>\
        <footer><p>daily</p></footer></body>";

    fn recording_engine() -> SearchEngine<RecordingViewport> {
        SearchEngine::with_viewport(EngineConfig::default(), RecordingViewport::new())
    }

    #[test]
    fn test_search_highlights_and_notifies() {
        let mut doc = Document::parse(PAGE);
        let mut engine = recording_engine();

        let outcome = engine.search(&mut doc, "  daily ").unwrap();
        assert_eq!(outcome.query, "daily");
        assert_eq!(outcome.count, 2);
        assert_eq!(outcome.message, "Found 2 results for \"daily\"");
        assert_eq!(engine.notification(), Some(outcome.notification));

        let active = outcome.active().unwrap();
        assert!(doc.has_class(active, "search-highlight-active"));
        assert_eq!(engine.viewport().last(), Some((active, ScrollBlock::Center)));
    }

    #[test]
    fn test_too_short_does_not_touch_tree() {
        let mut doc = Document::parse(PAGE);
        let mut engine = recording_engine();
        engine.search(&mut doc, "daily").unwrap();
        let before = doc.to_html();

        let result = engine.search(&mut doc, " d ");
        assert!(matches!(result, Err(PagemarkError::TooShort { min: 2, actual: 1 })));
        assert_eq!(doc.to_html(), before);
        assert_eq!(engine.viewport().requests().len(), 1);
    }

    #[test]
    fn test_no_matches_clears_previous_search() {
        let original = Document::parse(PAGE).to_html();
        let mut doc = Document::parse(PAGE);
        let mut engine = SearchEngine::default();
        engine.search(&mut doc, "daily").unwrap();

        let result = engine.search(&mut doc, "weekly");
        match result {
            Err(e @ PagemarkError::NoMatches(_)) => {
                assert_eq!(e.to_string(), "No results found for \"weekly\"");
            }
            other => panic!("expected NoMatches, got {other:?}"),
        }
        assert_eq!(doc.to_html(), original);
        assert_eq!(engine.notification(), None);
    }

    #[test]
    fn test_repeated_search_replaces_highlights() {
        let mut doc = Document::parse(PAGE);
        let mut engine = SearchEngine::default();
        engine.search(&mut doc, "daily").unwrap();
        let outcome = engine.search(&mut doc, "rounds").unwrap();

        assert_eq!(outcome.count, 1);
        assert_eq!(doc.all_with_class("search-highlight").len(), 1);
        assert_eq!(doc.all_with_class("search-notification").len(), 1);
    }

    #[test]
    fn test_clear_restores_document() {
        let mut doc = Document::parse(PAGE);
        let original = doc.to_html();
        let mut engine = SearchEngine::default();
        engine.search(&mut doc, "daily").unwrap();

        assert_eq!(engine.clear(&mut doc).unwrap(), 2);
        assert_eq!(doc.to_html(), original);
        assert_eq!(engine.clear(&mut doc).unwrap(), 0);
    }

    #[test]
    fn test_custom_configuration() {
        let config = EngineConfig::builder()
            .min_query_chars(3)
            .exclude(Vec::new())
            .notification_anchor(Selector::parse("main").unwrap())
            .build()
            .unwrap();
        let mut doc = Document::parse(PAGE);
        let mut engine = SearchEngine::new(config);

        assert!(matches!(
            engine.search(&mut doc, "da"),
            Err(PagemarkError::TooShort { min: 3, .. })
        ));

        // Navigation and footer are searched once nothing is excluded.
        let outcome = engine.search(&mut doc, "daily").unwrap();
        assert_eq!(outcome.count, 4);
        let main = Selector::parse("main").unwrap().find_first(&doc).unwrap();
        assert_eq!(doc.next_sibling(main), Some(outcome.notification));
    }

    #[test]
    fn test_controller_events() {
        let mut doc = Document::parse(PAGE);
        let original = doc.to_html();
        let mut controller = SearchController::new(SearchEngine::default());

        let feedback = controller
            .handle(&mut doc, TriggerEvent::Submit("   ".to_string()))
            .unwrap();
        assert_eq!(feedback, Feedback::Ignored);
        assert_eq!(doc.to_html(), original);

        let feedback = controller
            .handle(&mut doc, TriggerEvent::Submit("d".to_string()))
            .unwrap();
        assert_eq!(
            feedback.message(),
            Some("Please enter at least 2 characters to search")
        );

        let feedback = controller
            .handle(&mut doc, TriggerEvent::Submit("zebra".to_string()))
            .unwrap();
        assert_eq!(feedback, Feedback::NoResults("No results found for \"zebra\"".to_string()));

        let feedback = controller
            .handle(&mut doc, TriggerEvent::Submit("daily".to_string()))
            .unwrap();
        assert_eq!(
            feedback,
            Feedback::Found {
                count: 2,
                message: "Found 2 results for \"daily\"".to_string()
            }
        );
        assert_eq!(controller.value(), "daily");

        let feedback = controller.handle(&mut doc, TriggerEvent::Cancel).unwrap();
        assert_eq!(feedback, Feedback::Cleared);
        assert_eq!(controller.value(), "");
        assert_eq!(doc.to_html(), original);
    }

    #[test]
    fn test_dismiss_clears_everything() {
        let mut doc = Document::parse(PAGE);
        let original = doc.to_html();
        let mut controller = SearchController::new(SearchEngine::default());
        controller
            .handle(&mut doc, TriggerEvent::Submit("rounds".to_string()))
            .unwrap();

        controller.handle(&mut doc, TriggerEvent::Dismiss).unwrap();
        assert_eq!(doc.to_html(), original);
        assert!(controller.engine().notification().is_none());
    }
}
