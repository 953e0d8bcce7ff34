//! Pagemark CLI binary.

use clap::Parser;
use pagemark::cli::{args::*, commands::*, logging::init_logging};
use std::process;

fn main() {
    // Parse command line arguments using clap
    let args = PagemarkArgs::parse();

    init_logging(args.verbosity());

    // Execute the command
    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
