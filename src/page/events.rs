// src/page/events.rs
// =============================================================================
// A loaded page and the events that can happen to it.
//
// `Page::load` does what the site does on DOMContentLoaded: wire every
// behavior, put the carousel in its initial position and add lazy-loading
// hints. After that, `Page::dispatch` feeds one event at a time through the
// matching bindings. Each event runs to completion before the next one.
//
// Things only a real browser can do (scroll, follow a link) are not
// performed. They are recorded as `Effect`s in the order they were asked for.
// =============================================================================

use super::bindings::{self, Action, Binding, LoadingDecision, Target, Trigger, Wiring};
use super::carousel::{Carousel, CarouselState};
use super::document::Document;
use super::viewport::Viewport;
use ego_tree::NodeId;
use serde::Serialize;

/// A key as reported by a keydown event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Other(String),
}

impl Key {
    /// Parses a `KeyboardEvent.key` value ("Enter", " ") or the name "Space"
    pub fn parse(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            " " | "Space" | "Spacebar" => Key::Space,
            other => Key::Other(other.to_string()),
        }
    }

    fn activates(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

/// Something that happened to the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Click(NodeId),
    KeyDown(NodeId, Key),
    /// Window resized to the given width
    Resize(u32),
    /// Back/forward navigation restored the page
    HistoryNavigation,
}

/// A request to the browser the behaviors made
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    SmoothScroll { target: String },
    Navigate { href: String },
}

/// A page with its behaviors attached
#[derive(Debug)]
pub struct Page<V: Viewport> {
    document: Document,
    viewport: V,
    bindings: Vec<Binding>,
    carousel: Option<Carousel>,
    lazy_loading: Vec<(NodeId, LoadingDecision)>,
    effects: Vec<Effect>,
}

impl<V: Viewport> Page<V> {
    /// Parses `source` and runs page initialization
    pub fn load(source: &str, viewport: V) -> Self {
        let mut document = Document::parse(source);
        let Wiring { bindings, carousel } = bindings::wire(&document);

        if let Some(carousel) = &carousel {
            carousel.reposition(&mut document, &viewport);
        }
        let lazy_loading = bindings::apply_lazy_loading(&mut document);

        Self {
            document,
            viewport,
            bindings,
            carousel,
            lazy_loading,
            effects: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn lazy_loading(&self) -> &[(NodeId, LoadingDecision)] {
        &self.lazy_loading
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn carousel(&self) -> Option<CarouselState> {
        self.carousel.as_ref().map(|c| c.state(&self.document))
    }

    /// Delivers one event to every binding listening for it
    ///
    /// Returns true if a handler suppressed the browser's default action.
    pub fn dispatch(&mut self, event: Event) -> bool {
        tracing::debug!(?event, "dispatching");

        let (target, trigger) = match &event {
            Event::Click(node) => (Target::Element(*node), Trigger::Click),
            Event::KeyDown(node, _) => (Target::Element(*node), Trigger::KeyDown),
            Event::Resize(width) => {
                self.viewport.resize(*width);
                (Target::Window, Trigger::Resize)
            }
            Event::HistoryNavigation => (Target::Window, Trigger::HistoryNavigation),
        };

        let actions: Vec<Action> = self
            .bindings
            .iter()
            .filter(|b| b.target == target && b.trigger == trigger)
            .map(|b| b.action.clone())
            .collect();

        let mut default_prevented = false;
        for action in actions {
            default_prevented |= self.run(action, target, &event);
        }
        default_prevented
    }

    // Runs one action; returns true if it prevented the default
    fn run(&mut self, action: Action, target: Target, event: &Event) -> bool {
        match action {
            Action::ToggleClass { container, class } => {
                self.document.toggle_class(container, class);
                false
            }
            Action::CarouselNext => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.next(&mut self.document, &self.viewport);
                }
                false
            }
            Action::CarouselPrevious => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.previous(&mut self.document, &self.viewport);
                }
                false
            }
            Action::CarouselReposition => {
                if let Some(carousel) = &self.carousel {
                    carousel.reposition(&mut self.document, &self.viewport);
                }
                false
            }
            Action::ClickOnKey => match (event, target) {
                (Event::KeyDown(_, key), Target::Element(node)) if key.activates() => {
                    self.dispatch(Event::Click(node));
                    true
                }
                _ => false,
            },
            Action::NavigateOnKey { href } => match event {
                Event::KeyDown(_, key) if key.activates() => {
                    self.effects.push(Effect::Navigate { href });
                    true
                }
                _ => false,
            },
            Action::SmoothScroll { fragment } => {
                // Jump navigation is always suppressed, even for dead anchors
                if self.document.element_by_id(&fragment).is_some() {
                    self.effects.push(Effect::SmoothScroll { target: fragment });
                }
                true
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why collect the actions before running them?
//    - Running an action needs `&mut self`
//    - Iterating self.bindings borrows self immutably
//    - Cloning the few matching actions first ends that borrow
//
// 2. Why is Page generic over V?
//    - Anything that can answer the Viewport questions will do
//    - The tests use a viewport whose width changes behind the page's back
// -----------------------------------------------------------------------------
