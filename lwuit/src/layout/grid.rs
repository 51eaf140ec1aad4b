//! GridLayout - equal cells, filled row by row.

use crate::component::{LayoutChild, LayoutParent};
use crate::error::LayoutError;
use crate::primitives::{Rect, Size};

use super::{outer_size, LayoutManager};

/// A fixed number of columns with equal-sized cells.
///
/// The declared row count is a minimum: extra children add rows, and every
/// row shrinks to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    rows: usize,
    columns: usize,
}

impl GridLayout {
    pub fn new(rows: usize, columns: usize) -> Result<Self, LayoutError> {
        if rows == 0 || columns == 0 {
            return Err(LayoutError::InvalidGrid { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Rows needed for `count` children.
    pub fn effective_rows(&self, count: usize) -> usize {
        self.rows.max(count.div_ceil(self.columns))
    }
}

impl LayoutManager for GridLayout {
    fn name(&self) -> &'static str {
        "GridLayout"
    }

    fn layout_container(&mut self, parent: &LayoutParent, children: &mut [LayoutChild]) {
        let content = parent.content();
        let columns = self.columns as i32;
        let rows = self.effective_rows(children.len()) as i32;
        let cell_width = content.width / columns;
        let cell_height = content.height / rows;

        for (i, child) in children.iter_mut().enumerate() {
            let row = i as i32 / columns;
            let mut column = i as i32 % columns;
            if parent.rtl {
                column = columns - 1 - column;
            }
            let m = child.margin().mirrored(parent.rtl);
            child.set_bounds(Rect::new(
                content.x + column * cell_width + m.left,
                content.y + row * cell_height + m.top,
                (cell_width - m.horizontal()).max(0),
                (cell_height - m.vertical()).max(0),
            ));
        }
    }

    fn preferred_size(&self, parent: &LayoutParent, children: &[LayoutChild]) -> Size {
        let cell = children.iter().map(outer_size).fold(Size::ZERO, |acc, s| {
            Size::new(acc.width.max(s.width), acc.height.max(s.height))
        });
        let rows = self.effective_rows(children.len()) as i32;
        Size::new(
            cell.width * self.columns as i32 + parent.padding.horizontal() + parent.side_gap,
            cell.height * rows + parent.padding.vertical() + parent.bottom_gap,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, Container};
    use crate::primitives::Insets;

    #[test]
    fn test_rejects_empty_grid() {
        assert_eq!(
            GridLayout::new(0, 3),
            Err(LayoutError::InvalidGrid { rows: 0, columns: 3 })
        );
        assert!(GridLayout::new(2, 0).is_err());
    }

    #[test]
    fn test_extra_children_add_rows() {
        let mut c = Container::new(GridLayout::new(2, 2).expect("grid"));
        let ids: Vec<_> = (0..5)
            .map(|_| c.add(Component::sized(10, 10)).expect("add"))
            .collect();
        c.set_bounds(Rect::new(0, 0, 120, 90));
        c.layout_container();

        for id in &ids {
            let b = c.child(*id).expect("child").bounds();
            assert_eq!(b.height, 30, "three effective rows share the height");
            assert_eq!(b.width, 60);
        }
        let last = c.child(ids[4]).expect("last").bounds();
        assert_eq!((last.x, last.y), (0, 60));
    }

    #[test]
    fn test_rtl_mirrors_columns() {
        let mut c = Container::new(GridLayout::new(1, 3).expect("grid")).rtl(true);
        let first = c.add(Component::sized(10, 10)).expect("first");
        c.add(Component::sized(10, 10)).expect("second");
        c.set_bounds(Rect::new(0, 0, 90, 30));
        c.layout_container();

        assert_eq!(c.child(first).expect("first").bounds().x, 60);
    }

    #[test]
    fn test_margins_inset_the_cell() {
        let mut c = Container::new(GridLayout::new(1, 2).expect("grid"));
        let a = c
            .add(Component::sized(10, 10).margin(Insets::all(2)))
            .expect("a");
        c.set_bounds(Rect::new(0, 0, 100, 50));
        c.layout_container();
        assert_eq!(c.child(a).expect("a").bounds(), Rect::new(2, 2, 46, 46));
    }

    #[test]
    fn test_preferred_size_uses_largest_child() {
        let mut c = Container::new(GridLayout::new(1, 2).expect("grid")).padding(Insets::all(1));
        c.add(Component::sized(10, 30)).expect("a");
        c.add(Component::sized(25, 5)).expect("b");
        c.add(Component::sized(5, 5)).expect("c");
        assert_eq!(c.preferred_size(), Size::new(25 * 2 + 2, 30 * 2 + 2));
    }
}
