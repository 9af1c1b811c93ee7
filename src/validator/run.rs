// src/validator/run.rs
// =============================================================================
// One validation run over a directory.
//
// How it works:
// 1. List the .html files directly inside the directory (no recursion)
// 2. If there are none, say so ("[]" in JSON mode) and succeed
// 3. Validate them one at a time, in file-name order
// 4. Report each file as soon as its answer arrives
// 5. Fold all outcomes into a single pass/fail status
//
// Only one request is in flight at any time, so output order is file order.
// A failing call only fails that file; the run always reaches the end.
// =============================================================================

use super::service::{Diagnostic, ValidationService};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Extension that marks a file for validation
pub const MARKUP_EXTENSION: &str = ".html";

pub const NO_FILES_MESSAGE: &str = "No HTML files found in this directory.";

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Invalid { messages: Vec<Diagnostic> },
    /// The service call itself failed
    Errored { detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub file: String,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Where a report line goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    Stdout(String),
    Stderr(String),
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self.verdict, Verdict::Valid)
    }

    /// The lines printed for this file
    pub fn report_lines(&self) -> Vec<ReportLine> {
        match &self.verdict {
            Verdict::Valid => vec![ReportLine::Stdout(format!("{}: HTML is valid!", self.file))],
            Verdict::Invalid { messages } => {
                let mut lines = vec![ReportLine::Stdout(format!(
                    "{}: HTML is not valid :(",
                    self.file
                ))];
                lines.extend(messages.iter().map(|m| {
                    let line = m.line.map_or_else(|| "?".to_string(), |l| l.to_string());
                    ReportLine::Stdout(format!("{} at line {}: {}", m.category, line, m.text))
                }));
                lines
            }
            Verdict::Errored { detail } => vec![ReportLine::Stderr(format!(
                "{}: Validation error: {}",
                self.file, detail
            ))],
        }
    }

    /// Writes the report lines: stdout lines go to `out`, error lines to stderr
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for line in self.report_lines() {
            match line {
                ReportLine::Stdout(text) => writeln!(out, "{}", text)?,
                // Transport errors always go to stderr, whatever `out` is
                ReportLine::Stderr(text) => eprintln!("{}", text),
            }
        }
        Ok(())
    }
}

/// Overall result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Passed,
    Failed,
}

impl RunStatus {
    /// Failed as soon as any file failed or errored
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        outcomes.iter().fold(RunStatus::Passed, |status, outcome| {
            if outcome.is_failure() {
                RunStatus::Failed
            } else {
                status
            }
        })
    }

    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Passed => 0,
            RunStatus::Failed => 1,
        }
    }
}

/// Lists the markup files directly inside `dir`, sorted by name
pub fn discover_markup_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory {}", dir.display()))?;

    // Keep regular files whose name ends in ".html"
    // Subdirectories are never entered, even if they are named "x.html"
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list directory {}", dir.display()))?;
        let name = entry.file_name();
        // Non-UTF-8 names can't end in ".html" as far as we're concerned
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.ends_with(MARKUP_EXTENSION) && entry.path().is_file() {
            files.push(entry.path());
        }
    }

    // read_dir order is platform-dependent
    files.sort();
    tracing::info!(count = files.len(), dir = %dir.display(), "markup files found");
    Ok(files)
}

// Validates one file, turning a failed call into an Errored verdict
async fn check_file<S>(service: &S, path: PathBuf) -> FileOutcome
where
    S: ValidationService + ?Sized,
{
    // Reports name the file the way it was listed, not the full path
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    // Ask the service and sort its answer into one of three verdicts
    let verdict = match service.validate(&path).await {
        Ok(report) if report.is_valid() => Verdict::Valid,
        // A negative answer keeps every diagnostic, in the order given
        Ok(report) => Verdict::Invalid {
            messages: report.messages,
        },
        // The call itself broke: record it and carry on with the next file
        Err(e) => {
            tracing::debug!(file = %file, error = ?e, "validation call failed");
            Verdict::Errored {
                detail: e.to_string(),
            }
        }
    };

    FileOutcome { file, verdict }
}

/// Validates `files` strictly one after another, in order
///
/// `on_outcome` sees each outcome as soon as it is known.
pub async fn validate_files<S, F>(service: &S, files: Vec<PathBuf>, on_outcome: F) -> Vec<FileOutcome>
where
    S: ValidationService + ?Sized,
    F: FnMut(&FileOutcome),
{
    // `then` waits for each future before starting the next
    stream::iter(files)
        .then(|path| check_file(service, path))
        .inspect(on_outcome)
        .collect()
        .await
}

/// How results are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One line per file as results arrive
    Text,
    /// A single JSON document after the run
    Json,
}

/// Runs the whole validation over `dir`, writing the report to `out`
///
/// In JSON mode `out` receives exactly one JSON document, even when the
/// directory holds no markup files.
pub async fn run_directory<S, W>(
    service: &S,
    dir: &Path,
    mode: OutputMode,
    out: &mut W,
) -> Result<RunStatus>
where
    S: ValidationService + ?Sized,
    W: Write,
{
    // Step 1: find the files to validate
    let files = discover_markup_files(dir)?;

    // Step 2: nothing to do is not a failure
    // JSON consumers still get a document: an empty outcome list
    if files.is_empty() {
        match mode {
            OutputMode::Text => writeln!(out, "{}", NO_FILES_MESSAGE)?,
            OutputMode::Json => writeln!(out, "[]")?,
        }
        return Ok(RunStatus::Passed);
    }

    // Step 3: validate one by one, printing text results as they arrive
    // The callback can't use `?`, so the first write error is kept for later
    let mut write_error = None;
    let outcomes = validate_files(service, files, |outcome| {
        if mode == OutputMode::Text && write_error.is_none() {
            if let Err(e) = outcome.write_to(out) {
                write_error = Some(e);
            }
        }
    })
    .await;

    if let Some(e) = write_error {
        return Err(e).context("Failed to write report");
    }

    // Step 4: JSON mode prints everything at once, after the run
    if mode == OutputMode::Json {
        serde_json::to_writer_pretty(&mut *out, &outcomes)?;
        writeln!(out)?;
    }

    // Step 5: one bad file fails the whole run
    Ok(RunStatus::from_outcomes(&outcomes))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a fold instead of a `has_errors` flag?
//    - The run's status is computed from the outcomes after the fact
//    - Nothing outside the loop needs to be mutable
//    - RunStatus::from_outcomes can be tested with a plain slice
//
// 2. What does StreamExt::then do?
//    - It maps every item to a future and awaits it before pulling the next
//    - Compare buffer_unordered(N), which runs N at once and reorders results
//
// 3. Why `S: ValidationService + ?Sized`?
//    - ?Sized lets callers pass a `&dyn ValidationService` as well as a
//      concrete type like NuValidatorClient
// -----------------------------------------------------------------------------
