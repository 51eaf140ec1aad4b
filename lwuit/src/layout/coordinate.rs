//! CoordinateLayout - absolute positions scaled with the container.
//!
//! Positions are declared against a reference size. Each pass rescales them
//! to the current container size and then adopts that size as the new
//! reference, so a container resized from 100 to 200 wide moves a child at
//! x = 10 to x = 20.

use indexmap::IndexMap;

use crate::component::{ComponentId, LayoutChild, LayoutParent};
use crate::error::LayoutError;
use crate::primitives::{Point, Rect, Size};

use super::{Constraint, LayoutManager};

#[derive(Debug, Clone)]
pub struct CoordinateLayout {
    reference: Size,
    positions: IndexMap<ComponentId, Point>,
}

impl CoordinateLayout {
    pub fn new(reference: Size) -> Self {
        Self {
            reference,
            positions: IndexMap::new(),
        }
    }

    /// The size positions are currently expressed against.
    pub fn reference(&self) -> Size {
        self.reference
    }

    pub fn position_of(&self, id: ComponentId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    /// Move a child. The point is in reference coordinates.
    pub fn set_position(&mut self, id: ComponentId, at: Point) {
        self.positions.insert(id, at);
    }
}

fn scale(value: i32, to: i32, from: i32) -> i32 {
    if from <= 0 || to <= 0 {
        return value;
    }
    (value as i64 * to as i64 / from as i64) as i32
}

impl LayoutManager for CoordinateLayout {
    fn name(&self) -> &'static str {
        "CoordinateLayout"
    }

    fn layout_container(&mut self, parent: &LayoutParent, children: &mut [LayoutChild]) {
        let content = parent.content();
        let current = content.size();

        for child in children.iter_mut() {
            let id = child.id();
            let declared = self
                .positions
                .get(&id)
                .copied()
                .unwrap_or_else(|| child.bounds().origin());
            let at = Point::new(
                scale(declared.x, current.width, self.reference.width),
                scale(declared.y, current.height, self.reference.height),
            );
            let size = child.preferred_size();
            // Under RTL positions are measured from the right edge.
            let x = if parent.rtl {
                content.right() - at.x - size.width
            } else {
                content.x + at.x
            };
            child.set_bounds(Rect::from_origin_size(Point::new(x, content.y + at.y), size));
            self.positions.insert(id, at);
        }

        if !current.is_empty() && current != self.reference {
            tracing::trace!(from = ?self.reference, to = ?current, "coordinate reference rescaled");
            self.reference = current;
        }
    }

    fn preferred_size(&self, parent: &LayoutParent, children: &[LayoutChild]) -> Size {
        let mut width = 0;
        let mut height = 0;
        for child in children {
            let at = self
                .positions
                .get(&child.id())
                .copied()
                .unwrap_or_else(|| child.bounds().origin());
            let size = child.preferred_size();
            width = width.max(at.x + size.width);
            height = height.max(at.y + size.height);
        }
        Size::new(
            width + parent.padding.horizontal() + parent.side_gap,
            height + parent.padding.vertical() + parent.bottom_gap,
        )
    }

    fn add_constraint(
        &mut self,
        id: ComponentId,
        constraint: Option<Constraint>,
    ) -> Result<(), LayoutError> {
        match constraint {
            Some(Constraint::At(point)) => {
                self.positions.insert(id, point);
                Ok(())
            }
            // Falls back to the child's own x/y at layout time.
            None => Ok(()),
            Some(other) => Err(LayoutError::InvalidConstraint {
                layout: self.name(),
                reason: format!("expected a position, got {other:?}"),
            }),
        }
    }

    fn remove_constraint(&mut self, id: ComponentId) {
        self.positions.shift_remove(&id);
    }

    fn constraint_of(&self, id: ComponentId) -> Option<Constraint> {
        self.position_of(id).map(Constraint::At)
    }

    fn is_overlap_supported(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, Container};

    #[test]
    fn test_positions_scale_with_container() {
        let mut c = Container::new(CoordinateLayout::new(Size::new(100, 100)));
        let a = c
            .add_with(Point::new(10, 20), Component::sized(30, 10))
            .expect("a");
        c.set_bounds(Rect::new(0, 0, 200, 50));
        c.layout_container();

        assert_eq!(c.child(a).expect("a").bounds(), Rect::new(20, 10, 30, 10));
    }

    #[test]
    fn test_rtl_measures_from_the_right() {
        let place = |rtl: bool| {
            let mut c = Container::new(CoordinateLayout::new(Size::new(100, 100))).rtl(rtl);
            let a = c
                .add_with(Point::new(10, 0), Component::sized(30, 10))
                .expect("a");
            c.set_bounds(Rect::new(0, 0, 100, 100));
            c.layout_container();
            c.child(a).expect("a").bounds()
        };
        assert_eq!(place(false), Rect::new(10, 0, 30, 10));
        assert_eq!(place(true), Rect::new(60, 0, 30, 10));
    }

    #[test]
    fn test_reference_follows_container() {
        let mut layout = CoordinateLayout::new(Size::new(100, 100));
        let mut children = vec![LayoutChild::from(Component::sized(5, 5))];
        let id = children[0].id();
        layout.add_constraint(id, Some(Point::new(50, 50).into())).expect("at");

        let parent = LayoutParent::new(Size::new(200, 200));
        layout.layout_container(&parent, &mut children);
        assert_eq!(layout.reference(), Size::new(200, 200));
        assert_eq!(layout.position_of(id), Some(Point::new(100, 100)));

        // A second pass at the same size is stable.
        layout.layout_container(&parent, &mut children);
        assert_eq!(children[0].bounds(), Rect::new(100, 100, 5, 5));
    }

    #[test]
    fn test_children_may_overlap() {
        let mut c = Container::new(CoordinateLayout::new(Size::new(50, 50)));
        let a = c.add_with(Point::new(0, 0), Component::sized(30, 30)).expect("a");
        let b = c.add_with(Point::new(10, 10), Component::sized(30, 30)).expect("b");
        c.set_bounds(Rect::new(0, 0, 50, 50));
        c.layout_container();

        let (ra, rb) = (
            c.child(a).expect("a").bounds(),
            c.child(b).expect("b").bounds(),
        );
        assert!(ra.intersects(&rb));
        assert!(c.layout().is_overlap_supported());
    }

    #[test]
    fn test_preferred_size_is_furthest_extent() {
        let mut c = Container::new(CoordinateLayout::new(Size::new(50, 50)));
        c.add_with(Point::new(40, 0), Component::sized(20, 5)).expect("a");
        c.add_with(Point::new(0, 30), Component::sized(5, 15)).expect("b");
        assert_eq!(c.preferred_size(), Size::new(60, 45));
    }
}
