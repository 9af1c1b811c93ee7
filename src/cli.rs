// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands, one per tool in this repo:
// - validate: check every .html file in a directory with an HTML validator
// - inspect:  load one page, attach the site's behaviors and report on them
//
// Every validator flag has a default that reproduces the plain behavior:
// current directory, public W3C checker, no timeout, text output.
// =============================================================================

use crate::inspect::Step;
use crate::page::DEFAULT_ELEMENT_WIDTH;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version,
    about = "Page behaviors and HTML validation for a static portfolio site",
    long_about = "folio validates the HTML files of a static site against the Nu HTML Checker \
                  and lets you inspect how the site's page behaviors (menu, carousel, keyboard \
                  access, smooth scrolling, lazy images) attach to a page."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate every .html file in a directory
    ///
    /// Exits 0 when every file is valid (or there are none), 1 otherwise.
    ///
    /// Example: folio validate --dir public
    Validate(ValidateArgs),

    /// Load a page, attach its behaviors and report what they did
    ///
    /// Example: folio inspect index.html --event click:.carousel-btn.next
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory whose .html files are validated (not recursive)
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Validator endpoint accepting a POSTed document and answering JSON
    #[arg(
        long,
        env = "FOLIO_VALIDATOR_URL",
        default_value = crate::validator::DEFAULT_ENDPOINT
    )]
    pub endpoint: Url,

    /// Give up on a single request after this many seconds (default: wait forever)
    #[arg(long, env = "FOLIO_VALIDATOR_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Print all results as one JSON document at the end
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// HTML file to load
    pub file: PathBuf,

    /// Window width in CSS pixels
    #[arg(long, default_value_t = 1280)]
    pub viewport_width: u32,

    /// Width of elements that don't carry a data-width attribute
    #[arg(long, default_value_t = DEFAULT_ELEMENT_WIDTH)]
    pub slide_width: f64,

    /// Event to replay after load, in order; repeatable
    ///
    /// click:<selector>, key:<selector>:<key>, resize:<width>, back
    #[arg(long = "event", value_name = "EVENT")]
    pub events: Vec<Step>,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_defaults() {
        let cli = Cli::try_parse_from(["folio", "validate"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.dir, PathBuf::from("."));
        assert_eq!(args.timeout, None);
        assert!(!args.json);
        assert_eq!(args.endpoint.host_str(), Some("validator.w3.org"));
    }

    #[test]
    fn test_inspect_events_in_order() {
        let cli = Cli::try_parse_from([
            "folio",
            "inspect",
            "index.html",
            "--event",
            "click:#hamburger",
            "--event",
            "resize:500",
        ])
        .unwrap();
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(
            args.events,
            vec![Step::Click("#hamburger".to_string()), Step::Resize(500)]
        );
    }

    #[test]
    fn test_rejects_bad_endpoint_and_event() {
        assert!(Cli::try_parse_from(["folio", "validate", "--endpoint", "not a url"]).is_err());
        assert!(Cli::try_parse_from(["folio", "inspect", "a.html", "--event", "hover:x"]).is_err());
    }
}
