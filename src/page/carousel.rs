// src/page/carousel.rs
// =============================================================================
// The project carousel.
//
// The carousel is a cursor over an ordered list of slides. next/previous move
// the cursor one step and stop at either end (no wrap-around). After every
// move the track element is shifted left so the selected slide is in view.
//
// On narrow screens the carousel does nothing at all: the track is a plain
// horizontally scrollable strip and the browser handles it natively.
// =============================================================================

use super::document::Document;
use super::viewport::Viewport;
use ego_tree::NodeId;
use serde::Serialize;

/// Viewport widths at or below this use native scrolling
pub const MOBILE_BREAKPOINT: u32 = 700;

/// Gap between slides, added to each slide's measured width
pub const SLIDE_GAP: f64 = 20.0;

/// Cursor and element handles for one carousel
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    track: NodeId,
    slides: Vec<NodeId>,
    cursor: usize,
}

/// Snapshot of the carousel for reports
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CarouselState {
    pub cursor: usize,
    pub slide_count: usize,
    pub transform: Option<String>,
}

impl Carousel {
    pub fn new(track: NodeId, slides: Vec<NodeId>) -> Self {
        Self {
            track,
            slides,
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Advances one slide unless already on the last one
    pub fn next(&mut self, document: &mut Document, viewport: &impl Viewport) {
        if self.cursor + 1 < self.slides.len() {
            self.cursor += 1;
            self.reposition(document, viewport);
        }
    }

    /// Goes back one slide unless already on the first one
    pub fn previous(&mut self, document: &mut Document, viewport: &impl Viewport) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.reposition(document, viewport);
        }
    }

    /// Writes the track's transform for the current cursor
    ///
    /// Leaves the track untouched at or below `MOBILE_BREAKPOINT`, and when
    /// there are no slides to measure.
    pub fn reposition(&self, document: &mut Document, viewport: &impl Viewport) {
        if viewport.inner_width() <= MOBILE_BREAKPOINT {
            return;
        }
        let Some(&first) = self.slides.first() else {
            return;
        };

        let step = viewport.offset_width(document, first) + SLIDE_GAP;
        let offset = self.cursor as f64 * step;
        tracing::debug!(cursor = self.cursor, offset, "repositioning carousel");
        document.set_transform(self.track, format!("translateX(-{offset}px)"));
    }

    pub fn state(&self, document: &Document) -> CarouselState {
        CarouselState {
            cursor: self.cursor(),
            slide_count: self.slide_count(),
            transform: document.transform(self.track).map(str::to_string),
        }
    }
}
