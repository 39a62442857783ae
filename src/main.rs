//! Entry point for the zarrdump application.
//! Handles CLI parsing, logging setup, and dispatch to the reporter with the
//! exit codes the CLI contract fixes.

use std::io;
use std::process;

use clap::Parser;

use zarrdump::cli::Args;
use zarrdump::dataset::OpenOptions;
use zarrdump::report::write_report;

fn main() {
    // Diagnostics go to stderr so stdout carries only the report bytes.
    init_tracing();

    // Parse command-line arguments
    let args = Args::parse();
    let variables = args.variable_list();

    // Stored values pass through unmodified: both decode switches stay off.
    let mut stdout = io::stdout();
    match write_report(
        &args.file,
        variables.as_deref(),
        OpenOptions::raw(),
        &mut stdout,
    ) {
        Ok(()) => {}
        Err(err) => {
            println!("{err}");
            process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber, honoring `RUST_LOG` when set.
fn init_tracing() {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) => directives,
        Err(_) => "warn".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
