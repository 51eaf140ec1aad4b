//! Animated transitions between two surfaces.
//!
//! A transition is a single session bound to one source and one destination:
//!
//! ```text
//! init_transition(src, dst)      snapshot into offscreen buffers, start motion
//! loop { animate() -> paint() }  until animate() returns false
//! cleanup()                      release buffers and surfaces
//! ```
//!
//! Surfaces and buffers belong to the UI thread, so sessions hold their
//! surfaces as `Rc` and are not `Send`.

pub mod common;

pub use common::{CommonTransition, SlideOrientation, TransitionKind, TransitionPhase};

use std::rc::Rc;

use crate::graphics::Graphics;
use crate::primitives::Rect;

/// Title, content and menu areas of a dialog, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogRegions {
    pub title: Rect,
    pub content: Rect,
    pub menu: Rect,
}

impl DialogRegions {
    /// The part of a dialog that moves during a slide.
    pub fn moving(&self) -> Rect {
        let top = self.title.y.min(self.content.y);
        let left = self.title.x.min(self.content.x);
        let right = self.title.right().max(self.content.right());
        let bottom = self.title.bottom().max(self.content.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Something a transition can snapshot and paint: a form or a dialog.
pub trait Surface {
    /// Absolute screen bounds.
    fn bounds(&self) -> Rect;

    /// Paint in screen coordinates.
    fn paint(&self, g: &mut Graphics<'_>);

    /// `Some` when this surface is a dialog.
    fn dialog_regions(&self) -> Option<DialogRegions> {
        None
    }

    /// Whether alpha compositing is available for this surface.
    fn native_alpha(&self) -> bool {
        true
    }
}

/// One transition session.
pub trait Transition {
    /// Bind to a source and destination and prepare the first frame.
    fn init_transition(&mut self, source: Rc<dyn Surface>, destination: Rc<dyn Surface>);

    /// Advance. Returns true while another frame should be painted.
    fn animate(&mut self) -> bool;

    /// Paint the current frame in screen coordinates.
    fn paint(&mut self, g: &mut Graphics<'_>);

    /// Release buffers and surfaces. Painting afterwards does nothing.
    fn cleanup(&mut self);

    /// A fresh, uninitialized transition with the same configuration,
    /// running the other way when `reverse` is set.
    fn copy(&self, reverse: bool) -> Box<dyn Transition>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_moving_region() {
        let regions = DialogRegions {
            title: Rect::new(10, 50, 100, 20),
            content: Rect::new(10, 70, 100, 60),
            menu: Rect::new(0, 180, 120, 20),
        };
        assert_eq!(regions.moving(), Rect::new(10, 50, 100, 80));
    }
}
