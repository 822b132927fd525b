//! phrase-sentiment CLI binary.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use phrase_sentiment::cli::args::*;
use phrase_sentiment::cli::commands::*;

fn main() {
    // Parse command line arguments using clap
    let args = SentimentArgs::parse();

    // Map verbosity onto a log level
    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // Pipeline stages and timings
        _ => LevelFilter::Debug, // Matrix sizes and per-epoch progress
    };

    // RUST_LOG still wins when set.
    Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    // Execute the command
    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
