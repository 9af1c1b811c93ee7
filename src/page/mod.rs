// src/page/mod.rs
// =============================================================================
// The site's page behaviors.
//
// Submodules:
// - document: the parsed page plus the changes the behaviors make to it
// - viewport: window width and element measurement
// - carousel: the project carousel's cursor and positioning
// - bindings: which element listens for which event, and lazy-load hints
// - events: a loaded page that events can be dispatched to
//
// None of the behaviors depend on each other. Each one looks for its own
// elements and quietly does nothing when they are missing.
// =============================================================================

mod bindings;
mod carousel;
mod document;
mod events;
mod viewport;

pub use bindings::{LoadingDecision, Target, Trigger};
pub use carousel::CarouselState;
pub use events::{Effect, Event, Key, Page};
pub use viewport::{FixedViewport, Viewport, DEFAULT_ELEMENT_WIDTH};
