// src/inspect.rs
// =============================================================================
// The `inspect` subcommand: load a page, attach the behaviors, optionally
// replay some events, and report what happened.
//
// Events are given on the command line as small strings:
//   click:<selector>           click the first element matching <selector>
//   key:<selector>:<key>       keydown on it (Enter, Space, Tab, ...)
//   resize:<width>             resize the window
//   back                       back/forward navigation
//
// A selector that matches nothing is reported as a warning and skipped; the
// page itself would have done nothing either.
// =============================================================================

use crate::page::{
    CarouselState, Effect, Event, FixedViewport, Key, LoadingDecision, Page, Target, Trigger,
    Viewport,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

/// One simulated event from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Click(String),
    Key(String, String),
    Resize(u32),
    Back,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "back" {
            return Ok(Step::Back);
        }

        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <kind>:<argument>, got '{}'", s))?;

        match kind {
            "click" if !rest.is_empty() => Ok(Step::Click(rest.to_string())),
            "key" => {
                // Selectors can contain ':' (e.g. a:not(.x)), keys can't
                let (selector, key) = rest
                    .rsplit_once(':')
                    .filter(|(sel, key)| !sel.is_empty() && !key.is_empty())
                    .ok_or_else(|| format!("expected key:<selector>:<key>, got '{}'", s))?;
                Ok(Step::Key(selector.to_string(), key.to_string()))
            }
            "resize" => rest
                .parse::<u32>()
                .map(Step::Resize)
                .map_err(|e| format!("invalid width '{}': {}", rest, e)),
            _ => Err(format!("unknown event '{}'", s)),
        }
    }
}

// Turns a step into an event for this page
// Returns None when the selector matches nothing
fn resolve<V: Viewport>(page: &Page<V>, step: &Step) -> Option<Event> {
    match step {
        Step::Click(selector) => page.document().select_first(selector).map(Event::Click),
        Step::Key(selector, key) => page
            .document()
            .select_first(selector)
            .map(|node| Event::KeyDown(node, Key::parse(key))),
        Step::Resize(width) => Some(Event::Resize(*width)),
        Step::Back => Some(Event::HistoryNavigation),
    }
}

/// A binding as shown in reports
#[derive(Debug, Clone, Serialize)]
pub struct BindingReport {
    pub selector: String,
    pub element: String,
    pub trigger: Trigger,
    pub action: String,
}

/// Lazy-loading outcome for one image
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub element: String,
    pub src: Option<String>,
    pub decision: LoadingDecision,
}

/// Everything `inspect` found out about a page
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub file: String,
    pub viewport_width: u32,
    pub bindings: Vec<BindingReport>,
    pub images: Vec<ImageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav_open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carousel: Option<CarouselState>,
    pub effects: Vec<Effect>,
}

/// Loads a page, replays `steps` and builds the report
pub fn inspect_source(
    file: &str,
    source: &str,
    viewport: FixedViewport,
    steps: &[Step],
) -> PageReport {
    let mut page = Page::load(source, viewport);

    for step in steps {
        match resolve(&page, step) {
            Some(event) => {
                page.dispatch(event);
            }
            None => tracing::warn!(?step, "no element matches, event skipped"),
        }
    }

    build_report(file, &page)
}

/// Reads `path` and inspects it
pub fn inspect_file(path: &Path, viewport: FixedViewport, steps: &[Step]) -> Result<PageReport> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(inspect_source(&path.display().to_string(), &source, viewport, steps))
}

fn build_report<V: Viewport>(file: &str, page: &Page<V>) -> PageReport {
    let document = page.document();

    let bindings = page
        .bindings()
        .iter()
        .map(|binding| BindingReport {
            selector: binding.selector.to_string(),
            element: match binding.target {
                Target::Element(node) => document.describe(node),
                Target::Window => "window".to_string(),
            },
            trigger: binding.trigger,
            action: binding.describe(document),
        })
        .collect();

    let images = page
        .lazy_loading()
        .iter()
        .map(|(node, decision)| ImageReport {
            element: document.describe(*node),
            src: document.attr(*node, "src"),
            decision: *decision,
        })
        .collect();

    let nav_open = document
        .element_by_id("nav")
        .map(|nav| document.has_class(nav, "active"));

    PageReport {
        file: file.to_string(),
        viewport_width: page.viewport().inner_width(),
        bindings,
        images,
        nav_open,
        carousel: page.carousel(),
        effects: page.effects().to_vec(),
    }
}

/// Prints a report in the human-readable layout
pub fn print_report(report: &PageReport) {
    println!("🔍 Inspecting page: {}", report.file);
    println!("📐 Viewport width: {}px", report.viewport_width);
    println!();

    if report.bindings.is_empty() {
        println!("🔗 No behaviors attached");
    } else {
        println!("🔗 Bindings ({}):", report.bindings.len());
        println!("   {:<20} {:<36} {}", "EVENT", "ELEMENT", "ACTION");
        for binding in &report.bindings {
            let element = if binding.element.chars().count() > 33 {
                let head: String = binding.element.chars().take(33).collect();
                format!("{}...", head)
            } else {
                binding.element.clone()
            };
            println!(
                "   {:<20} {:<36} {}",
                format!("{:?}", binding.trigger),
                element,
                binding.action
            );
        }
    }
    println!();

    let lazy = report
        .images
        .iter()
        .filter(|i| i.decision == LoadingDecision::Lazy)
        .count();
    println!(
        "🖼️  Images without a loading attribute: {} ({} lazy, {} kept eager)",
        report.images.len(),
        lazy,
        report.images.len() - lazy
    );

    if let Some(open) = report.nav_open {
        println!("🍔 Navigation menu: {}", if open { "open" } else { "closed" });
    }

    if let Some(carousel) = &report.carousel {
        println!(
            "🎠 Carousel: slide {} of {}, transform {}",
            carousel.cursor + 1,
            carousel.slide_count,
            carousel.transform.as_deref().unwrap_or("(native scrolling)")
        );
    }

    if !report.effects.is_empty() {
        println!("📋 Effects:");
        for effect in &report.effects {
            match effect {
                Effect::SmoothScroll { target } => println!("   smooth scroll -> #{}", target),
                Effect::Navigate { href } => println!("   navigate -> {}", href),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <button id="hamburger"></button><nav id="nav"></nav>
        <div class="carousel-track">
          <div class="project-slide"></div><div class="project-slide"></div>
        </div>
        <button class="carousel-btn next">next</button>
        <a href="#nav">menu</a>
    "##;

    #[test]
    fn test_parse_steps() {
        assert_eq!("back".parse::<Step>(), Ok(Step::Back));
        assert_eq!("resize:640".parse::<Step>(), Ok(Step::Resize(640)));
        assert_eq!(
            "click:.carousel-btn.next".parse::<Step>(),
            Ok(Step::Click(".carousel-btn.next".to_string()))
        );
        assert_eq!(
            "key:a:not(.x):Enter".parse::<Step>(),
            Ok(Step::Key("a:not(.x)".to_string(), "Enter".to_string()))
        );
    }

    #[test]
    fn test_parse_bad_steps() {
        assert!("resize:wide".parse::<Step>().is_err());
        assert!("hover:#x".parse::<Step>().is_err());
        assert!("click:".parse::<Step>().is_err());
        assert!("key:#x".parse::<Step>().is_err());
        assert!("nonsense".parse::<Step>().is_err());
    }

    #[test]
    fn test_inspect_replays_steps() {
        let steps = vec![
            Step::Click("#hamburger".to_string()),
            Step::Key(".carousel-btn.next".to_string(), "Enter".to_string()),
            Step::Click("a".to_string()),
            Step::Click("#does-not-exist".to_string()),
        ];
        let report = inspect_source("index.html", PAGE, FixedViewport::new(1280, 300.0), &steps);

        assert_eq!(report.nav_open, Some(true));
        let carousel = report.carousel.unwrap();
        assert_eq!(carousel.cursor, 1);
        assert_eq!(carousel.transform.as_deref(), Some("translateX(-320px)"));
        assert_eq!(
            report.effects,
            vec![Effect::SmoothScroll {
                target: "nav".to_string()
            }]
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = inspect_source("index.html", PAGE, FixedViewport::new(600, 300.0), &[]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["viewport_width"], 600);
        assert_eq!(json["carousel"]["transform"], serde_json::Value::Null);
        assert!(json["bindings"].as_array().unwrap().len() >= 4);
    }
}
