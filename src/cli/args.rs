//! Command line argument parsing for the pagemark CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pagemark - search and highlight text inside HTML pages
#[derive(Parser, Debug, Clone)]
#[command(name = "pagemark")]
#[command(about = "Search an HTML page and highlight every match")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Pagemark Contributors")]
#[command(long_about = None)]
pub struct PagemarkArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PagemarkArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Highlight every match of a query in an HTML file
    Search(SearchArgs),

    /// Remove highlights and the result notification from an HTML file
    Clear(ClearArgs),
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// HTML file to search
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Text to look for
    #[arg(value_name = "QUERY", allow_hyphen_values = true)]
    pub query: String,

    /// Where to write the highlighted document (stdout when omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Engine configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the minimum query length
    #[arg(long, value_name = "CHARS")]
    pub min_chars: Option<usize>,
}

/// Arguments for clearing a highlighted document
#[derive(Parser, Debug, Clone)]
pub struct ClearArgs {
    /// Previously highlighted HTML file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the restored document (stdout when omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Engine configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
