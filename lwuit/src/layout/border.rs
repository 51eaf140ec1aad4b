//! BorderLayout - five named regions.
//!
//! NORTH and SOUTH take the full width at their preferred height, EAST and
//! WEST take the remaining height at their preferred width, and CENTER gets
//! whatever is left. Under RTL the components placed EAST and WEST trade
//! sides.

use indexmap::IndexMap;

use crate::component::{ComponentId, LayoutChild, LayoutParent};
use crate::error::LayoutError;
use crate::primitives::{Rect, Size};

use super::{outer_size, Constraint, LayoutManager};

/// Region tag for a [`BorderLayout`] child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderRegion {
    North,
    South,
    East,
    West,
    Center,
}

impl BorderRegion {
    pub const ALL: [BorderRegion; 5] = [
        BorderRegion::North,
        BorderRegion::South,
        BorderRegion::East,
        BorderRegion::West,
        BorderRegion::Center,
    ];

    fn slot(self) -> usize {
        match self {
            BorderRegion::North => 0,
            BorderRegion::South => 1,
            BorderRegion::East => 2,
            BorderRegion::West => 3,
            BorderRegion::Center => 4,
        }
    }
}

/// A layout with at most one child per [`BorderRegion`].
#[derive(Debug, Clone, Default)]
pub struct BorderLayout {
    regions: IndexMap<ComponentId, BorderRegion>,
}

impl BorderLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// The child currently assigned to a region.
    pub fn occupant(&self, region: BorderRegion) -> Option<ComponentId> {
        self.regions
            .iter()
            .find_map(|(id, r)| (*r == region).then_some(*id))
    }

    pub fn region_of(&self, id: ComponentId) -> Option<BorderRegion> {
        self.regions.get(&id).copied()
    }

    /// Index of the child in each region, in [`BorderRegion::ALL`] order.
    fn slots(&self, children: &[LayoutChild]) -> [Option<usize>; 5] {
        let mut slots = [None; 5];
        for (index, child) in children.iter().enumerate() {
            if let Some(region) = self.regions.get(&child.id()) {
                slots[region.slot()] = Some(index);
            }
        }
        slots
    }
}

impl LayoutManager for BorderLayout {
    fn name(&self) -> &'static str {
        "BorderLayout"
    }

    fn layout_container(&mut self, parent: &LayoutParent, children: &mut [LayoutChild]) {
        let [north, south, mut east, mut west, center] = self.slots(children);
        if parent.rtl {
            std::mem::swap(&mut east, &mut west);
        }

        let content = parent.content();
        let mut top = content.y;
        let mut bottom = content.bottom();
        let mut left = content.x;
        let mut right = content.right();

        if let Some(i) = north {
            let child = &mut children[i];
            let m = child.margin().mirrored(parent.rtl);
            let height = child
                .preferred_size()
                .height
                .min(bottom - top - m.vertical())
                .max(0);
            child.set_bounds(Rect::new(
                left + m.left,
                top + m.top,
                (right - left - m.horizontal()).max(0),
                height,
            ));
            top += height + m.vertical();
        }

        if let Some(i) = south {
            let child = &mut children[i];
            let m = child.margin().mirrored(parent.rtl);
            let height = child
                .preferred_size()
                .height
                .min(bottom - top - m.vertical())
                .max(0);
            child.set_bounds(Rect::new(
                left + m.left,
                bottom - height - m.bottom,
                (right - left - m.horizontal()).max(0),
                height,
            ));
            bottom -= height + m.vertical();
        }

        if let Some(i) = east {
            let child = &mut children[i];
            let m = child.margin().mirrored(parent.rtl);
            let width = child
                .preferred_size()
                .width
                .min(right - left - m.horizontal())
                .max(0);
            child.set_bounds(Rect::new(
                right - width - m.right,
                top + m.top,
                width,
                (bottom - top - m.vertical()).max(0),
            ));
            right -= width + m.horizontal();
        }

        if let Some(i) = west {
            let child = &mut children[i];
            let m = child.margin().mirrored(parent.rtl);
            let width = child
                .preferred_size()
                .width
                .min(right - left - m.horizontal())
                .max(0);
            child.set_bounds(Rect::new(
                left + m.left,
                top + m.top,
                width,
                (bottom - top - m.vertical()).max(0),
            ));
            left += width + m.horizontal();
        }

        if let Some(i) = center {
            let child = &mut children[i];
            let m = child.margin().mirrored(parent.rtl);
            child.set_bounds(Rect::new(
                left + m.left,
                top + m.top,
                (right - left - m.horizontal()).max(0),
                (bottom - top - m.vertical()).max(0),
            ));
        }
    }

    fn preferred_size(&self, parent: &LayoutParent, children: &[LayoutChild]) -> Size {
        let slots = self.slots(children);
        let size_of = |region: BorderRegion| {
            slots[region.slot()]
                .map(|i| outer_size(&children[i]))
                .unwrap_or(Size::ZERO)
        };
        let north = size_of(BorderRegion::North);
        let south = size_of(BorderRegion::South);
        let east = size_of(BorderRegion::East);
        let west = size_of(BorderRegion::West);
        let center = size_of(BorderRegion::Center);

        let width = (east.width + west.width + center.width)
            .max(north.width)
            .max(south.width);
        let height = north.height + south.height + east.height.max(west.height).max(center.height);

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
        let region = match constraint {
            Some(Constraint::Border(region)) => region,
            None => return Err(LayoutError::MissingConstraint { layout: self.name(), id }),
            Some(other) => {
                return Err(LayoutError::InvalidConstraint {
                    layout: self.name(),
                    reason: format!("expected a border region, got {other:?}"),
                });
            }
        };
        if let Some(occupant) = self.occupant(region).filter(|occ| *occ != id) {
            return Err(LayoutError::RegionOccupied { region, occupant });
        }
        self.regions.insert(id, region);
        Ok(())
    }

    fn remove_constraint(&mut self, id: ComponentId) {
        self.regions.shift_remove(&id);
    }

    fn constraint_of(&self, id: ComponentId) -> Option<Constraint> {
        self.region_of(id).map(Constraint::Border)
    }
}
