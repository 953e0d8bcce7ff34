//! Command implementations for the pagemark CLI.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::EngineConfig;
use crate::dom::Document;
use crate::engine::SearchEngine;
use crate::error::Result;

/// Execute a CLI command.
pub fn execute_command(args: PagemarkArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => search_document(search_args.clone(), &args),
        Command::Clear(clear_args) => clear_document(clear_args.clone(), &args),
    }
}

/// Highlight every match of the query and write the resulting document.
fn search_document(args: SearchArgs, cli_args: &PagemarkArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(min_chars) = args.min_chars {
        config.min_query_chars = min_chars;
        config.validate()?;
    }

    let mut doc = read_document(&args.input)?;
    let mut engine = SearchEngine::new(config);
    let outcome = engine.search(&mut doc, &args.query)?;

    write_document(&doc, args.output.as_deref())?;

    let summary = SearchSummary {
        input: args.input.display().to_string(),
        output: args.output.as_ref().map(|p| p.display().to_string()),
        query: outcome.query,
        count: outcome.count,
        message: outcome.message.clone(),
        elements: outcome.report.per_element.len(),
        skipped: outcome.report.skipped.len(),
    };
    report(&outcome.message, &summary, args.output.is_some(), cli_args)
}

/// Strip highlights and the notification from a previously searched document.
fn clear_document(args: ClearArgs, cli_args: &PagemarkArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut doc = read_document(&args.input)?;
    let mut engine = SearchEngine::new(config);
    let removed = engine.clear(&mut doc)?;

    write_document(&doc, args.output.as_deref())?;

    let summary = ClearSummary {
        input: args.input.display().to_string(),
        output: args.output.as_ref().map(|p| p.display().to_string()),
        removed,
    };
    let message = format!("Removed {removed} highlight(s)");
    report(&message, &summary, args.output.is_some(), cli_args)
}

/// The summary goes to stdout unless stdout already carries the document.
fn report<T: serde::Serialize>(
    message: &str,
    summary: &T,
    to_stdout: bool,
    cli_args: &PagemarkArgs,
) -> Result<()> {
    if to_stdout {
        output_result(&mut io::stdout().lock(), message, summary, cli_args)
    } else {
        output_result(&mut io::stderr().lock(), message, summary, cli_args)
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            EngineConfig::from_json_file(path)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn read_document(path: &Path) -> Result<Document> {
    let markup = fs::read_to_string(path)?;
    let doc = Document::parse(&markup);
    info!(path = %path.display(), nodes = doc.len(), "loaded document");
    Ok(doc)
}

fn write_document(doc: &Document, output: Option<&Path>) -> Result<()> {
    let html = doc.to_html();
    match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, html)?;
            debug!(path = %path.display(), "wrote document");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
