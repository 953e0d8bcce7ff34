//! In-memory document tree.
//!
//! The search engine never talks to a concrete document type. It is written
//! against the [`TextTree`] capability trait, and [`Document`] is the
//! arena-backed implementation used by the CLI and the tests.

pub mod document;
pub mod node;
pub mod tree;

pub use document::Document;
pub use node::{ElementData, NodeData, NodeId};
pub use tree::TextTree;
