//! `notemoc` entry point.
//!
//! # Responsibility
//! - Parse arguments, optionally start file logging, run one migration.
//! - Print a human-readable summary; exit non-zero on failure.

mod cli;

use clap::Parser;
use cli::Cli;
use log::error;
use notemoc_core::{
    default_log_level, init_logging, FsSink, JsonFileNoteStore, MigrationResult, Migrator,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(result) => {
            print_summary(&result, cli.dry_run);
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("event=cli_run module=cli status=error error={}", message);
            eprintln!("notemoc error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<MigrationResult, String> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| err.to_string())?;
    }

    let config = cli.migration_config().map_err(|err| err.to_string())?;
    let store = JsonFileNoteStore::new(&cli.input);
    let sink = FsSink;
    Migrator::new(&store, &sink)
        .run(&config)
        .map_err(|err| err.to_string())
}

fn print_summary(result: &MigrationResult, dry_run: bool) {
    if dry_run {
        println!("dry run: nothing was written");
    }
    println!("output: {}", result.output_path.display());
    println!("notes exported: {}", result.notes_exported);
    println!("MOCs created: {}", result.mocs_created);
    println!("tags processed: {}", result.tags_processed);
    println!("duration: {} ms", result.duration.as_millis());
    for warning in &result.warnings {
        println!("warning: {warning}");
    }
    for problem in &result.errors {
        println!("error: {problem}");
    }
}
