// src/validator/mod.rs
// =============================================================================
// Batch validation of a site's HTML files against an external validator.
//
// Submodules:
// - service: the validator boundary (trait, reply types, errors)
// - nu: HTTP client for the Nu HTML Checker
// - run: listing files, validating them in order, reporting, exit status
// =============================================================================

mod nu;
mod run;
mod service;

pub use nu::{NuValidatorClient, DEFAULT_ENDPOINT};
pub use run::{run_directory, OutputMode};
