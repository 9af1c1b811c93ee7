// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (quiet unless FOLIO_LOG asks for more)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = invalid HTML, 2 = error)
// =============================================================================

mod cli; // src/cli.rs - command-line parsing
mod inspect; // src/inspect.rs - the inspect subcommand
mod page; // src/page/ - page behaviors
mod validator; // src/validator/ - batch HTML validation

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, InspectArgs, ValidateArgs};
use page::FixedViewport;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use validator::{NuValidatorClient, OutputMode};

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected failure (unreadable directory, bad input file, ...)
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout only ever carries the report
fn init_logging() {
    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => handle_validate(args).await,
        Commands::Inspect(args) => handle_inspect(args),
    }
}

// Handles the 'validate' subcommand
async fn handle_validate(args: ValidateArgs) -> Result<i32> {
    // Build the HTTP client once; it is reused for every file
    let timeout = args.timeout.map(Duration::from_secs);
    let service = NuValidatorClient::new(args.endpoint, timeout)?;

    // Decide how to show results
    let mode = if args.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    // Run and convert the result to an exit code (0 = all valid, 1 = failures)
    // Errors listing the directory bubble up to main as exit code 2
    let mut stdout = std::io::stdout();
    let status = validator::run_directory(&service, &args.dir, mode, &mut stdout).await?;
    Ok(status.exit_code())
}

// Handles the 'inspect' subcommand
fn handle_inspect(args: InspectArgs) -> Result<i32> {
    // A fixed-size window stands in for the browser
    let viewport = FixedViewport::new(args.viewport_width, args.slide_width);

    // Load the page, replay the events, and collect what happened
    let report = inspect::inspect_file(&args.file, viewport, &args.events)?;

    // Print it either as JSON (for scripts) or human-readable text
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        inspect::print_report(&report);
    }

    Ok(0)
}
