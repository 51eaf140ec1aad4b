//! Layout System for LWUIT
//!
//! Each layout manager turns a container's children plus their constraints
//! into child bounds, and answers how big the container wants to be.
//!
//! # Architecture
//!
//! ```text
//! Container::add_with(constraint) -> LayoutManager::add_constraint (validate, all-or-nothing)
//! Container::layout_container()   -> LayoutManager::layout_container (assign bounds)
//! Container::preferred_size()     -> LayoutManager::preferred_size (pure)
//! ```
//!
//! The managers form a closed set, dispatched through the [`Layout`] enum.

pub mod border;
pub mod box_layout;
pub mod coordinate;
pub mod flow;
pub mod grid;
pub mod table;

pub use border::{BorderLayout, BorderRegion};
pub use box_layout::{Axis, BoxLayout};
pub use coordinate::CoordinateLayout;
pub use flow::FlowLayout;
pub use grid::GridLayout;
pub use table::{TableConstraint, TableLayout};

use crate::component::{ComponentId, LayoutChild, LayoutParent};
use crate::error::LayoutError;
use crate::primitives::{Point, Size};

// =========================================================================
// Alignment
// =========================================================================

/// Horizontal alignment of a child within the space it was given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HAlign {
    /// Swap LEFT and RIGHT under RTL.
    pub fn mirrored(self, rtl: bool) -> Self {
        match (self, rtl) {
            (HAlign::Left, true) => HAlign::Right,
            (HAlign::Right, true) => HAlign::Left,
            (align, _) => align,
        }
    }

    /// Offset of an item of `used` size inside `available`.
    pub fn offset(self, available: i32, used: i32) -> i32 {
        let free = (available - used).max(0);
        match self {
            HAlign::Left => 0,
            HAlign::Center => free / 2,
            HAlign::Right => free,
        }
    }
}

/// Vertical alignment of a child within the space it was given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

impl VAlign {
    pub fn offset(self, available: i32, used: i32) -> i32 {
        let free = (available - used).max(0);
        match self {
            VAlign::Top => 0,
            VAlign::Center => free / 2,
            VAlign::Bottom => free,
        }
    }
}

// =========================================================================
// Constraint
// =========================================================================

/// Per-child data interpreted by the owning container's layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Border(BorderRegion),
    Table(TableConstraint),
    /// Explicit position for [`CoordinateLayout`].
    At(Point),
}

impl From<BorderRegion> for Constraint {
    fn from(region: BorderRegion) -> Self {
        Constraint::Border(region)
    }
}

impl From<TableConstraint> for Constraint {
    fn from(constraint: TableConstraint) -> Self {
        Constraint::Table(constraint)
    }
}

impl From<Point> for Constraint {
    fn from(point: Point) -> Self {
        Constraint::At(point)
    }
}

// =========================================================================
// LayoutManager
// =========================================================================

/// The interface every layout manager implements.
pub trait LayoutManager {
    /// Human-readable name for logs and errors.
    fn name(&self) -> &'static str;

    /// Assign bounds to every child. Calling twice with the same children
    /// and constraints yields the same geometry.
    fn layout_container(&mut self, parent: &LayoutParent, children: &mut [LayoutChild]);

    /// The smallest container size holding every child at its preferred
    /// size, including padding and margins. Does not touch child bounds.
    fn preferred_size(&self, parent: &LayoutParent, children: &[LayoutChild]) -> Size;

    /// Associate a constraint with a child about to be added. On error
    /// nothing is recorded.
    fn add_constraint(
        &mut self,
        id: ComponentId,
        constraint: Option<Constraint>,
    ) -> Result<(), LayoutError> {
        match constraint {
            None => Ok(()),
            Some(other) => Err(LayoutError::InvalidConstraint {
                layout: self.name(),
                reason: format!("{} takes no constraints (got {other:?} for {id})", self.name()),
            }),
        }
    }

    /// Forget a child's constraint.
    fn remove_constraint(&mut self, _id: ComponentId) {}

    /// The constraint recorded for a child, if any.
    fn constraint_of(&self, _id: ComponentId) -> Option<Constraint> {
        None
    }

    /// Whether children may overlap.
    fn is_overlap_supported(&self) -> bool {
        false
    }
}

// =========================================================================
// Layout
// =========================================================================

/// One of the built-in layout managers.
#[derive(Debug, Clone)]
pub enum Layout {
    Border(BorderLayout),
    Box(BoxLayout),
    Flow(FlowLayout),
    Grid(GridLayout),
    Coordinate(CoordinateLayout),
    Table(TableLayout),
}

macro_rules! dispatch {
    ($self:expr, $layout:ident => $body:expr) => {
        match $self {
            Layout::Border($layout) => $body,
            Layout::Box($layout) => $body,
            Layout::Flow($layout) => $body,
            Layout::Grid($layout) => $body,
            Layout::Coordinate($layout) => $body,
            Layout::Table($layout) => $body,
        }
    };
}

impl LayoutManager for Layout {
    fn name(&self) -> &'static str {
        dispatch!(self, l => l.name())
    }

    fn layout_container(&mut self, parent: &LayoutParent, children: &mut [LayoutChild]) {
        dispatch!(self, l => l.layout_container(parent, children))
    }

    fn preferred_size(&self, parent: &LayoutParent, children: &[LayoutChild]) -> Size {
        dispatch!(self, l => l.preferred_size(parent, children))
    }

    fn add_constraint(
        &mut self,
        id: ComponentId,
        constraint: Option<Constraint>,
    ) -> Result<(), LayoutError> {
        dispatch!(self, l => l.add_constraint(id, constraint))
    }

    fn remove_constraint(&mut self, id: ComponentId) {
        dispatch!(self, l => l.remove_constraint(id))
    }

    fn constraint_of(&self, id: ComponentId) -> Option<Constraint> {
        dispatch!(self, l => l.constraint_of(id))
    }

    fn is_overlap_supported(&self) -> bool {
        dispatch!(self, l => l.is_overlap_supported())
    }
}

impl From<BorderLayout> for Layout {
    fn from(layout: BorderLayout) -> Self {
        Layout::Border(layout)
    }
}

impl From<BoxLayout> for Layout {
    fn from(layout: BoxLayout) -> Self {
        Layout::Box(layout)
    }
}

impl From<FlowLayout> for Layout {
    fn from(layout: FlowLayout) -> Self {
        Layout::Flow(layout)
    }
}

impl From<GridLayout> for Layout {
    fn from(layout: GridLayout) -> Self {
        Layout::Grid(layout)
    }
}

impl From<CoordinateLayout> for Layout {
    fn from(layout: CoordinateLayout) -> Self {
        Layout::Coordinate(layout)
    }
}

impl From<TableLayout> for Layout {
    fn from(layout: TableLayout) -> Self {
        Layout::Table(layout)
    }
}

/// Preferred size of a child including its margin.
#[inline]
pub(crate) fn outer_size(child: &LayoutChild) -> Size {
    child.preferred_size().inflate(&child.margin())
}
