//! Command Line Interface for the pagemark search engine.

pub mod args;
pub mod commands;
pub mod logging;
pub mod output;

// Re-export commonly used types
pub use args::*;
pub use commands::*;
pub use logging::init_logging;
pub use output::*;
