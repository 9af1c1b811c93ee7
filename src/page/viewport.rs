// src/page/viewport.rs
// =============================================================================
// The rendering environment as the behaviors see it: how wide the window is
// and how wide an element is laid out.
//
// A browser answers these from real layout. `FixedViewport` answers them from
// numbers we choose, which is what `folio inspect` and the tests use.
// =============================================================================

use super::document::Document;
use ego_tree::NodeId;

/// Element width used when nothing better is known
pub const DEFAULT_ELEMENT_WIDTH: f64 = 300.0;

/// Layout questions the behaviors need answered
pub trait Viewport {
    /// Current window width in CSS pixels
    fn inner_width(&self) -> u32;

    /// Laid-out width of an element in CSS pixels
    fn offset_width(&self, document: &Document, node: NodeId) -> f64;

    /// Called when a resize notification arrives
    fn resize(&mut self, width: u32);
}

/// A viewport with fixed measurements
///
/// Element widths come from a `data-width` attribute when the markup has
/// one, so fixtures can describe slides of different sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedViewport {
    pub width: u32,
    pub default_element_width: f64,
}

impl FixedViewport {
    /// A width that is negative or not finite is replaced by `DEFAULT_ELEMENT_WIDTH`
    pub fn new(width: u32, default_element_width: f64) -> Self {
        Self {
            width,
            default_element_width: usable_width(default_element_width)
                .unwrap_or(DEFAULT_ELEMENT_WIDTH),
        }
    }
}

impl Viewport for FixedViewport {
    fn inner_width(&self) -> u32 {
        self.width
    }

    fn offset_width(&self, document: &Document, node: NodeId) -> f64 {
        document
            .attr(node, "data-width")
            .and_then(|w| w.trim().parse::<f64>().ok())
            .and_then(usable_width)
            .unwrap_or(self.default_element_width)
    }

    fn resize(&mut self, width: u32) {
        self.width = width;
    }
}

// "NaN", "inf" and "-5" all parse as f64 but can't be a laid-out width
fn usable_width(width: f64) -> Option<f64> {
    (width.is_finite() && width >= 0.0).then_some(width)
}
