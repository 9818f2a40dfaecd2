//! dtdhint - DTD content-model completion hints
//!
//! # Usage
//!
//! ```bash
//! # What may follow <title> inside <book>?
//! dtdhint hint -g book.toml book title
//!
//! # Evaluate a content model directly
//! dtdhint eval "(a,b?,c)" a
//! ```

use std::fs::OpenOptions;
use std::sync::Mutex;

use dtdhint::cli::CliInterface;
use dtdhint::error::Result;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Run the subcommand and print its output
fn run() -> Result<()> {
    let cli = CliInterface::new()?;
    initialize_logging(&cli)?;

    let output = cli.run()?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Initialize logging from the effective configuration
///
/// Logs go to stderr, or are appended to `logging.file` when set.
fn initialize_logging(cli: &CliInterface) -> Result<()> {
    let logging = &cli.config().logging;
    let level = logging.level.to_tracing_level();

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    match (&logging.file, logging.timestamps) {
        (Some(path), timestamps) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            if timestamps {
                builder.init();
            } else {
                builder.without_time().init();
            }
        }
        (None, true) => builder.with_writer(std::io::stderr).init(),
        (None, false) => builder.with_writer(std::io::stderr).without_time().init(),
    }
    Ok(())
}
