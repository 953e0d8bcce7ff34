//! # Pagemark
//!
//! In-page content search and highlighting for HTML documents.
//!
//! ## Features
//!
//! - Literal, case-insensitive queries (metacharacters never interpreted)
//! - Highlights inserted by splitting text nodes, never by rewriting markup
//! - Lossless restore of the original text runs
//! - A single result notification with escaped user text
//! - Configurable search scope, marker and notification styles

pub mod cli;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod html;
pub mod notify;
pub mod query;
pub mod scope;
pub mod viewport;

pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::dom::{Document, NodeId, TextTree};
    pub use crate::engine::{Feedback, SearchController, SearchEngine, SearchOutcome, TriggerEvent};
    pub use crate::error::{PagemarkError, Result};
    pub use crate::highlight::{HighlightReport, Highlighter, MarkerStyle};
    pub use crate::notify::{NotificationStyle, Notifier};
    pub use crate::query::{MatchPattern, normalize};
    pub use crate::scope::{SearchScope, Selector};
    pub use crate::viewport::{NoViewport, RecordingViewport, ScrollBlock, Viewport};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
