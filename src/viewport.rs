//! Scrolling collaborator.
//!
//! The engine does not render anything. When a search produces results it
//! asks a [`Viewport`] to bring the active highlight into view.

use serde::{Deserialize, Serialize};

use crate::dom::NodeId;

/// Vertical alignment of a node scrolled into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

pub trait Viewport {
    fn scroll_into_view(&mut self, node: NodeId, block: ScrollBlock);
}

/// A viewport that ignores scroll requests, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoViewport;

impl Viewport for NoViewport {
    fn scroll_into_view(&mut self, _node: NodeId, _block: ScrollBlock) {}
}

/// A viewport that remembers every request. Useful in tests and for callers
/// that apply scrolling later.
#[derive(Debug, Clone, Default)]
pub struct RecordingViewport {
    requests: Vec<(NodeId, ScrollBlock)>,
}

impl RecordingViewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[(NodeId, ScrollBlock)] {
        &self.requests
    }

    pub fn last(&self) -> Option<(NodeId, ScrollBlock)> {
        self.requests.last().copied()
    }
}

impl Viewport for RecordingViewport {
    fn scroll_into_view(&mut self, node: NodeId, block: ScrollBlock) {
        self.requests.push((node, block));
    }
}
