//! BoxLayout - children stacked along one axis.
//!
//! Each child gets its preferred size along the axis, clipped to the room
//! left (zero once none is left), and the full cross-axis size minus its
//! margins. Under RTL an X-axis box is filled from the right.

use crate::component::{LayoutChild, LayoutParent};
use crate::primitives::{Rect, Size};

use super::{outer_size, LayoutManager};

/// Stacking direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Single-axis stacking layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxLayout {
    axis: Axis,
}

impl BoxLayout {
    pub fn new(axis: Axis) -> Self {
        Self { axis }
    }

    /// Left to right (right to left under RTL).
    pub fn x() -> Self {
        Self::new(Axis::X)
    }

    /// Top to bottom.
    pub fn y() -> Self {
        Self::new(Axis::Y)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }
}

impl LayoutManager for BoxLayout {
    fn name(&self) -> &'static str {
        "BoxLayout"
    }

    fn layout_container(&mut self, parent: &LayoutParent, children: &mut [LayoutChild]) {
        let content = parent.content();
        let rtl = parent.rtl;
        // Distance consumed from the leading edge of the axis.
        let mut offset = 0;

        for child in children.iter_mut() {
            let m = child.margin().mirrored(rtl);
            let preferred = child.preferred_size();
            match self.axis {
                Axis::Y => {
                    offset += m.top;
                    let room = content.height - offset - m.bottom;
                    let height = preferred.height.min(room).max(0);
                    child.set_bounds(Rect::new(
                        content.x + m.left,
                        content.y + offset.min(content.height),
                        (content.width - m.horizontal()).max(0),
                        height,
                    ));
                    offset += height + m.bottom;
                }
                Axis::X => {
                    // The leading margin is on the right under RTL.
                    let (lead, trail) = if rtl { (m.right, m.left) } else { (m.left, m.right) };
                    offset += lead;
                    let room = content.width - offset - trail;
                    let width = preferred.width.min(room).max(0);
                    let leading = offset.min(content.width);
                    let x = if rtl {
                        content.right() - leading - width
                    } else {
                        content.x + leading
                    };
                    child.set_bounds(Rect::new(
                        x,
                        content.y + m.top,
                        width,
                        (content.height - m.vertical()).max(0),
                    ));
                    offset += width + trail;
                }
            }
        }
    }

    fn preferred_size(&self, parent: &LayoutParent, children: &[LayoutChild]) -> Size {
        let mut along = 0;
        let mut across = 0;
        for child in children {
            let outer = outer_size(child);
            match self.axis {
                Axis::Y => {
                    along += outer.height;
                    across = across.max(outer.width);
                }
                Axis::X => {
                    along += outer.width;
                    across = across.max(outer.height);
                }
            }
        }
        let (width, height) = match self.axis {
            Axis::Y => (across, along),
            Axis::X => (along, across),
        };
        Size::new(
            width + parent.padding.horizontal() + parent.side_gap,
            height + parent.padding.vertical() + parent.bottom_gap,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, ComponentId, Container};
    use crate::primitives::Insets;

    fn row(rtl: bool, margin: Insets) -> (Container, Vec<ComponentId>) {
        let mut c = Container::new(BoxLayout::x()).rtl(rtl).padding(Insets::all(5));
        let ids = [30, 20, 40]
            .into_iter()
            .map(|w| c.add(Component::sized(w, 10).margin(margin)).expect("add"))
            .collect();
        c.set_bounds(Rect::new(0, 0, 210, 50));
        c.layout_container();
        (c, ids)
    }

    #[test]
    fn test_y_axis_stacks_with_margins() {
        let mut c = Container::new(BoxLayout::y());
        let m = Insets::new(2, 1, 3, 4);
        let a = c.add(Component::sized(10, 20).margin(m)).expect("a");
        let b = c.add(Component::sized(10, 30).margin(m)).expect("b");
        c.set_bounds(Rect::new(0, 0, 100, 200));
        c.layout_container();

        assert_eq!(c.child(a).expect("a").bounds(), Rect::new(4, 2, 95, 20));
        assert_eq!(c.child(b).expect("b").bounds(), Rect::new(4, 27, 95, 30));
    }

    #[test]
    fn test_overflow_clips_then_zeroes() {
        let mut c = Container::new(BoxLayout::y());
        let ids: Vec<_> = (0..3)
            .map(|_| c.add(Component::sized(10, 40)).expect("add"))
            .collect();
        c.set_bounds(Rect::new(0, 0, 10, 60));
        c.layout_container();

        let heights: Vec<_> = ids.iter().map(|id| c.child(*id).expect("child").bounds().height).collect();
        assert_eq!(heights, [40, 20, 0]);
    }

    #[test]
    fn test_x_axis_rtl_mirrors_around_center() {
        let margin = Insets::new(0, 2, 0, 6);
        let (ltr, ltr_ids) = row(false, margin);
        let (rtl, rtl_ids) = row(true, margin);
        let center2 = 210; // twice the horizontal center

        for (l, r) in ltr_ids.iter().zip(&rtl_ids) {
            let lb = ltr.child(*l).expect("ltr").bounds();
            let rb = rtl.child(*r).expect("rtl").bounds();
            assert_eq!(lb.width, rb.width);
            assert_eq!(lb.x + rb.right(), center2, "{lb:?} vs {rb:?} not mirrored");
            assert_eq!(lb.y, rb.y);
        }
    }

    #[test]
    fn test_x_axis_ltr_positions() {
        let (c, ids) = row(false, Insets::ZERO);
        let xs: Vec<_> = ids.iter().map(|id| c.child(*id).expect("child").bounds().x).collect();
        assert_eq!(xs, [5, 35, 55]);
        assert_eq!(c.child(ids[0]).expect("first").bounds().height, 40);
    }

    #[test]
    fn test_preferred_size() {
        let mut c = Container::new(BoxLayout::x()).padding(Insets::all(1));
        c.add(Component::sized(10, 5).margin(Insets::all(1))).expect("a");
        c.add(Component::sized(20, 8)).expect("b");
        assert_eq!(c.preferred_size(), Size::new(12 + 20 + 2, 8 + 2));

        let mut v = Container::new(BoxLayout::y());
        v.add(Component::sized(10, 5)).expect("a");
        v.add(Component::sized(20, 8)).expect("b");
        assert_eq!(v.preferred_size(), Size::new(20, 13));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let (mut c, ids) = row(true, Insets::all(2));
        let first: Vec<_> = ids.iter().map(|id| c.child(*id).expect("child").bounds()).collect();
        c.layout_container();
        let second: Vec<_> = ids.iter().map(|id| c.child(*id).expect("child").bounds()).collect();
        assert_eq!(first, second);
    }
}
