//! TableLayout - rows and columns with spans, percentages and alignment.
//!
//! Every child occupies one origin cell and, when it spans, the cells to its
//! right and below. Column widths come from the widest non-spanning child in
//! each column (or a percentage of the available width); rows likewise.
//!
//! # Placement
//!
//! A [`TableConstraint`] may leave out its row, column, or both. Missing
//! coordinates are filled with the first free cell in row-major order. When
//! the table is full, auto-placement appends rows; explicit coordinates never
//! grow the table and fail with [`LayoutError::CellOutOfRange`] instead.

use indexmap::IndexMap;

use crate::component::{ComponentId, LayoutChild, LayoutParent};
use crate::config::TableDefaults;
use crate::error::LayoutError;
use crate::primitives::{Rect, Size};

use super::{outer_size, Constraint, HAlign, LayoutManager, VAlign};

// =========================================================================
// TableConstraint
// =========================================================================

/// Where a child sits in a [`TableLayout`] and how it fills its cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConstraint {
    pub row: Option<usize>,
    pub column: Option<usize>,
    /// Columns covered, at least 1.
    pub span_h: usize,
    /// Rows covered, at least 1.
    pub span_v: usize,
    /// Column width as a share of the available width.
    pub width_percent: Option<u8>,
    /// Row height as a share of the available height.
    pub height_percent: Option<u8>,
    /// `None` stretches the child across the cell width.
    pub align: Option<HAlign>,
    /// `None` stretches the child across the cell height.
    pub valign: Option<VAlign>,
}

impl Default for TableConstraint {
    fn default() -> Self {
        Self {
            row: None,
            column: None,
            span_h: 1,
            span_v: 1,
            width_percent: None,
            height_percent: None,
            align: None,
            valign: None,
        }
    }
}

impl TableConstraint {
    /// Auto-placed, single cell, filling.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(row: usize, column: usize) -> Self {
        Self {
            row: Some(row),
            column: Some(column),
            ..Self::default()
        }
    }

    pub fn row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn span_h(mut self, columns: usize) -> Self {
        self.span_h = columns.max(1);
        self
    }

    pub fn span_v(mut self, rows: usize) -> Self {
        self.span_v = rows.max(1);
        self
    }

    pub fn width_percent(mut self, percent: u8) -> Self {
        self.width_percent = Some(percent);
        self
    }

    pub fn height_percent(mut self, percent: u8) -> Self {
        self.height_percent = Some(percent);
        self
    }

    pub fn align(mut self, align: HAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = Some(valign);
        self
    }

    fn validate(&self, layout: &'static str) -> Result<(), LayoutError> {
        let reason = if self.span_h == 0 || self.span_v == 0 {
            Some(format!("spans must be at least 1, got {}x{}", self.span_h, self.span_v))
        } else if let Some(p) = self.width_percent.filter(|p| *p > 100) {
            Some(format!("width percentage {p} exceeds 100"))
        } else {
            self.height_percent
                .filter(|p| *p > 100)
                .map(|p| format!("height percentage {p} exceeds 100"))
        };
        match reason {
            Some(reason) => Err(LayoutError::InvalidConstraint { layout, reason }),
            None => Ok(()),
        }
    }
}

// =========================================================================
// TableLayout
// =========================================================================

/// Occupancy of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    /// Top-left cell of a child.
    Origin(ComponentId),
    /// Covered by a span from another cell.
    Spanned(ComponentId),
}

/// A child's resolved cell.
#[derive(Debug, Clone)]
struct Placement {
    row: usize,
    column: usize,
    constraint: TableConstraint,
}

#[derive(Debug, Clone)]
pub struct TableLayout {
    rows: usize,
    columns: usize,
    /// Row-major, `rows * columns` long.
    cells: Vec<Cell>,
    placements: IndexMap<ComponentId, Placement>,
    defaults: TableDefaults,
}

impl TableLayout {
    pub fn new(rows: usize, columns: usize) -> Result<Self, LayoutError> {
        if rows == 0 || columns == 0 {
            return Err(LayoutError::InvalidGrid { rows, columns });
        }
        Ok(Self {
            rows,
            columns,
            cells: vec![Cell::Empty; rows * columns],
            placements: IndexMap::new(),
            defaults: TableDefaults::default(),
        })
    }

    /// Size empty tracks from the toolkit defaults.
    pub fn with_defaults(mut self, defaults: &TableDefaults) -> Self {
        self.defaults = *defaults;
        self
    }

    /// Current row count, including rows added by auto-placement.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Resolved `(row, column)` of a child.
    pub fn cell_of(&self, id: ComponentId) -> Option<(usize, usize)> {
        self.placements.get(&id).map(|p| (p.row, p.column))
    }

    /// The child whose span covers a cell.
    pub fn occupant(&self, row: usize, column: usize) -> Option<ComponentId> {
        match self.cell(row, column) {
            Cell::Empty => None,
            Cell::Origin(id) | Cell::Spanned(id) => Some(id),
        }
    }

    /// Cells past the last row read as empty, so placement can look ahead
    /// into rows that would be appended.
    fn cell(&self, row: usize, column: usize) -> Cell {
        if row >= self.rows || column >= self.columns {
            return Cell::Empty;
        }
        self.cells[row * self.columns + column]
    }

    /// Check that a `span_v x span_h` block at `(row, column)` is free.
    fn check_free(
        &self,
        row: usize,
        column: usize,
        span_h: usize,
        span_v: usize,
    ) -> Result<(), LayoutError> {
        for r in row..row + span_v {
            for c in column..column + span_h {
                if self.cell(r, c) != Cell::Empty {
                    return Err(LayoutError::CellOccupied { row: r, column: c });
                }
            }
        }
        Ok(())
    }

    fn out_of_range(&self, row: usize, column: usize) -> LayoutError {
        LayoutError::CellOutOfRange {
            row,
            column,
            rows: self.rows,
            columns: self.columns,
        }
    }

    /// Pick the origin cell for a constraint without changing anything.
    fn resolve(&self, constraint: &TableConstraint) -> Result<(usize, usize), LayoutError> {
        let (span_h, span_v) = (constraint.span_h, constraint.span_v);

        match (constraint.row, constraint.column) {
            (Some(row), Some(column)) => {
                if column + span_h > self.columns || row + span_v > self.rows {
                    return Err(self.out_of_range(row, column));
                }
                self.check_free(row, column, span_h, span_v)?;
                Ok((row, column))
            }
            (Some(row), None) => {
                if row + span_v > self.rows || span_h > self.columns {
                    return Err(self.out_of_range(row, 0));
                }
                let mut first_error = None;
                for column in 0..=self.columns - span_h {
                    match self.check_free(row, column, span_h, span_v) {
                        Ok(()) => return Ok((row, column)),
                        Err(err) => {
                            first_error.get_or_insert(err);
                        }
                    }
                }
                Err(first_error.unwrap_or_else(|| self.out_of_range(row, 0)))
            }
            (None, column) => {
                let columns = match column {
                    Some(c) if c + span_h > self.columns => {
                        return Err(self.out_of_range(self.rows, c));
                    }
                    Some(c) => c..c + 1,
                    None if span_h > self.columns => {
                        return Err(self.out_of_range(self.rows, 0));
                    }
                    None => 0..self.columns - span_h + 1,
                };
                // Row `self.rows` is entirely empty, so this always lands.
                for row in 0..=self.rows {
                    for c in columns.clone() {
                        if self.check_free(row, c, span_h, span_v).is_ok() {
                            return Ok((row, c));
                        }
                    }
                }
                Err(self.out_of_range(self.rows, columns.start))
            }
        }
    }

    fn fill(&mut self, id: ComponentId, row: usize, column: usize, span_h: usize, span_v: usize) {
        let needed = row + span_v;
        if needed > self.rows {
            tracing::debug!(from = self.rows, to = needed, "table grows for auto-placed child");
            self.rows = needed;
            self.cells.resize(self.rows * self.columns, Cell::Empty);
        }
        for r in row..row + span_v {
            for c in column..column + span_h {
                let cell = if (r, c) == (row, column) {
                    Cell::Origin(id)
                } else {
                    Cell::Spanned(id)
                };
                self.cells[r * self.columns + c] = cell;
            }
        }
    }

    /// Size every track along one axis.
    ///
    /// `entries` yields `(track, span, percent, preferred outer extent)` per
    /// child. Only single-track children size their track during layout;
    /// for preferred sizes spanning children widen the tracks they cover.
    fn track_sizes(
        &self,
        count: usize,
        entries: impl Iterator<Item = (usize, usize, Option<u8>, i32)>,
        available: i32,
        default_percent: Option<u8>,
        scrollable: bool,
        use_percent: bool,
    ) -> Vec<i32> {
        let mut sizes = vec![0; count];
        let mut percents: Vec<Option<u8>> = vec![None; count];
        let mut used = vec![false; count];

        let mut spanning = Vec::new();

        for (track, span, percent, extent) in entries {
            for t in track..(track + span).min(count) {
                used[t] = true;
            }
            if track >= count {
                continue;
            }
            if span != 1 {
                spanning.push((track, span, extent));
                continue;
            }
            match percent.filter(|_| use_percent) {
                Some(p) => percents[track] = Some(percents[track].map_or(p, |q| q.max(p))),
                None => sizes[track] = sizes[track].max(extent),
            }
        }

        if !use_percent {
            // Spanning children must still fit: the last spanned track takes
            // whatever the single-track pass left short.
            for (track, span, extent) in spanning {
                let end = (track + span).min(count);
                let covered: i32 = sizes[track..end].iter().sum();
                if covered < extent {
                    sizes[end - 1] += extent - covered;
                }
            }
            return sizes;
        }

        for t in 0..count {
            if !used[t] && percents[t].is_none() {
                percents[t] = default_percent;
            }
            if let Some(p) = percents[t] {
                sizes[t] = available * p as i32 / 100;
            }
        }

        let total: i32 = sizes.iter().sum();
        if !scrollable && total > available {
            let flexible: i32 = (0..count)
                .filter(|t| percents[*t].is_none())
                .map(|t| sizes[t])
                .sum();
            if flexible > 0 {
                let target = (flexible - (total - available)).max(0);
                for t in (0..count).filter(|t| percents[*t].is_none()) {
                    sizes[t] = (sizes[t] as i64 * target as i64 / flexible as i64) as i32;
                }
            }
        }
        sizes
    }

    fn column_widths(&self, children: &[LayoutChild], available: i32, scrollable: bool, use_percent: bool) -> Vec<i32> {
        let entries = children.iter().filter_map(|child| {
            let p = self.placements.get(&child.id())?;
            let c = &p.constraint;
            Some((p.column, c.span_h, c.width_percent, outer_size(child).width))
        });
        self.track_sizes(
            self.columns,
            entries,
            available,
            self.defaults.column_width_percent,
            scrollable,
            use_percent,
        )
    }

    fn row_heights(&self, children: &[LayoutChild], available: i32, scrollable: bool, use_percent: bool) -> Vec<i32> {
        let entries = children.iter().filter_map(|child| {
            let p = self.placements.get(&child.id())?;
            let c = &p.constraint;
            Some((p.row, c.span_v, c.height_percent, outer_size(child).height))
        });
        self.track_sizes(
            self.rows,
            entries,
            available,
            self.defaults.row_height_percent,
            scrollable,
            use_percent,
        )
    }
}

/// Start offset of every track.
fn offsets(sizes: &[i32]) -> Vec<i32> {
    sizes
        .iter()
        .scan(0, |acc, size| {
            let start = *acc;
            *acc += size;
            Some(start)
        })
        .collect()
}

impl LayoutManager for TableLayout {
    fn name(&self) -> &'static str {
        "TableLayout"
    }

    fn layout_container(&mut self, parent: &LayoutParent, children: &mut [LayoutChild]) {
        let content = parent.content();
        let widths = self.column_widths(children, content.width, parent.scrollable_x, true);
        let heights = self.row_heights(children, content.height, parent.scrollable_y, true);
        let xs = offsets(&widths);
        let ys = offsets(&heights);

        for child in children.iter_mut() {
            let Some(p) = self.placements.get(&child.id()) else {
                tracing::warn!(child = %child.id(), "table child without a placement");
                continue;
            };
            let c = &p.constraint;
            let col_end = (p.column + c.span_h).min(self.columns);
            let row_end = (p.row + c.span_v).min(self.rows);
            let cell_width: i32 = widths[p.column..col_end].iter().sum();
            let cell_height: i32 = heights[p.row..row_end].iter().sum();

            let cell_x = if parent.rtl {
                content.x + content.width - xs[p.column] - cell_width
            } else {
                content.x + xs[p.column]
            };
            let cell = Rect::new(cell_x, content.y + ys[p.row], cell_width, cell_height);

            let m = child.margin().mirrored(parent.rtl);
            let inner = cell.deflate(&m);
            let preferred = child.preferred_size();

            let (x, width) = match c.align {
                None => (inner.x, inner.width),
                Some(align) => {
                    let width = preferred.width.min(inner.width);
                    (inner.x + align.mirrored(parent.rtl).offset(inner.width, width), width)
                }
            };
            let (y, height) = match c.valign {
                None => (inner.y, inner.height),
                Some(valign) => {
                    let height = preferred.height.min(inner.height);
                    (inner.y + valign.offset(inner.height, height), height)
                }
            };
            child.set_bounds(Rect::new(x, y, width, height));
        }
    }

    fn preferred_size(&self, parent: &LayoutParent, children: &[LayoutChild]) -> Size {
        let width: i32 = self.column_widths(children, 0, true, false).iter().sum();
        let height: i32 = self.row_heights(children, 0, true, false).iter().sum();
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
        let constraint = match constraint {
            Some(Constraint::Table(c)) => c,
            None => TableConstraint::new(),
            Some(other) => {
                return Err(LayoutError::InvalidConstraint {
                    layout: self.name(),
                    reason: format!("expected a table constraint, got {other:?}"),
                });
            }
        };
        constraint.validate(self.name())?;
        if self.placements.contains_key(&id) {
            return Err(LayoutError::InvalidConstraint {
                layout: self.name(),
                reason: format!("{id} is already placed"),
            });
        }

        let (row, column) = self.resolve(&constraint)?;
        self.fill(id, row, column, constraint.span_h, constraint.span_v);
        self.placements.insert(id, Placement { row, column, constraint });
        Ok(())
    }

    fn remove_constraint(&mut self, id: ComponentId) {
        if self.placements.shift_remove(&id).is_some() {
            for cell in &mut self.cells {
                if matches!(cell, Cell::Origin(owner) | Cell::Spanned(owner) if *owner == id) {
                    *cell = Cell::Empty;
                }
            }
        }
    }

    fn constraint_of(&self, id: ComponentId) -> Option<Constraint> {
        self.placements.get(&id).map(|p| {
            Constraint::Table(TableConstraint {
                row: Some(p.row),
                column: Some(p.column),
                ..p.constraint.clone()
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, Container};
    use crate::layout::Layout;
    use crate::primitives::Insets;

    fn bounds(c: &Container, id: ComponentId) -> Rect {
        c.child(id).expect("child").bounds()
    }

    #[test]
    fn test_span_reserves_covered_cell() {
        let mut c = Container::new(TableLayout::new(2, 3).expect("table"));
        let wide = c
            .add_with(TableConstraint::at(0, 0).span_h(2), Component::sized(10, 10))
            .expect("wide");

        let err = c
            .add_with(TableConstraint::at(0, 1), Component::sized(10, 10))
            .unwrap_err();
        assert_eq!(err, LayoutError::CellOccupied { row: 0, column: 1 });
        assert_eq!(c.len(), 1);

        c.add_with(TableConstraint::at(0, 2), Component::sized(10, 10))
            .expect("free cell next to the span");

        c.remove(wide);
        c.add_with(TableConstraint::at(0, 1), Component::sized(10, 10))
            .expect("span released on remove");
    }

    #[test]
    fn test_auto_placement_grows_rows() {
        let mut c = Container::new(TableLayout::new(1, 2).expect("table"));
        let ids: Vec<_> = (0..3)
            .map(|_| c.add(Component::sized(10, 10)).expect("add"))
            .collect();

        let Layout::Table(table) = c.layout() else {
            panic!("table layout expected");
        };
        assert_eq!(table.rows(), 2);
        assert_eq!(table.cell_of(ids[1]), Some((0, 1)));
        assert_eq!(table.cell_of(ids[2]), Some((1, 0)));
    }

    #[test]
    fn test_explicit_cell_out_of_range() {
        let mut table = TableLayout::new(2, 2).expect("table");
        let err = table
            .add_constraint(ComponentId::new(), Some(TableConstraint::at(5, 0).into()))
            .unwrap_err();
        assert!(matches!(err, LayoutError::CellOutOfRange { row: 5, .. }));

        let err = table
            .add_constraint(ComponentId::new(), Some(TableConstraint::at(1, 1).span_v(2).into()))
            .unwrap_err();
        assert!(matches!(err, LayoutError::CellOutOfRange { .. }), "span leaves the grid");
        assert_eq!(table.rows(), 2);
    }

    #[test]
    fn test_invalid_constraint_values() {
        let mut table = TableLayout::new(1, 1).expect("table");
        let zero_span = TableConstraint { span_h: 0, ..TableConstraint::new() };
        assert!(matches!(
            table.add_constraint(ComponentId::new(), Some(zero_span.into())),
            Err(LayoutError::InvalidConstraint { .. })
        ));
        assert!(matches!(
            table.add_constraint(ComponentId::new(), Some(TableConstraint::new().width_percent(120).into())),
            Err(LayoutError::InvalidConstraint { .. })
        ));
    }

    #[test]
    fn test_columns_take_widest_child() {
        let mut c = Container::new(TableLayout::new(2, 2).expect("table"));
        let a = c.add(Component::sized(30, 10)).expect("a");
        let b = c.add(Component::sized(20, 15)).expect("b");
        let d = c.add(Component::sized(10, 5)).expect("d");
        c.set_bounds(Rect::new(0, 0, 100, 100));
        c.layout_container();

        assert_eq!(bounds(&c, a), Rect::new(0, 0, 30, 15));
        assert_eq!(bounds(&c, b), Rect::new(30, 0, 20, 15));
        assert_eq!(bounds(&c, d), Rect::new(0, 15, 30, 5));
    }

    #[test]
    fn test_percentage_columns() {
        let mut c = Container::new(TableLayout::new(1, 2).expect("table"));
        let a = c
            .add_with(TableConstraint::new().width_percent(50), Component::sized(10, 10))
            .expect("a");
        let b = c.add(Component::sized(20, 10)).expect("b");
        c.set_bounds(Rect::new(0, 0, 100, 10));
        c.layout_container();

        assert_eq!(bounds(&c, a).width, 50);
        assert_eq!(bounds(&c, b).x, 50);
    }

    #[test]
    fn test_flexible_columns_shrink_unless_scrollable() {
        let build = |scrollable: bool| {
            let mut c = Container::new(TableLayout::new(1, 2).expect("table")).scrollable(scrollable, false);
            let a = c.add(Component::sized(60, 10)).expect("a");
            let b = c.add(Component::sized(40, 10)).expect("b");
            c.set_bounds(Rect::new(0, 0, 50, 10));
            c.layout_container();
            (bounds(&c, a).width, bounds(&c, b).width)
        };
        assert_eq!(build(false), (30, 20));
        assert_eq!(build(true), (60, 40));
    }

    #[test]
    fn test_spanning_cell_gets_sum_of_columns() {
        let mut c = Container::new(TableLayout::new(2, 2).expect("table"));
        let wide = c
            .add_with(TableConstraint::at(0, 0).span_h(2), Component::sized(5, 10))
            .expect("wide");
        c.add_with(TableConstraint::at(1, 0), Component::sized(30, 10)).expect("a");
        c.add_with(TableConstraint::at(1, 1), Component::sized(20, 10)).expect("b");
        c.set_bounds(Rect::new(0, 0, 100, 100));
        c.layout_container();

        assert_eq!(bounds(&c, wide).width, 50);
    }

    #[test]
    fn test_vertical_span_gets_sum_of_rows() {
        let mut c = Container::new(TableLayout::new(3, 2).expect("table"));
        let tall = c
            .add_with(TableConstraint::at(0, 0).span_v(2), Component::sized(10, 5))
            .expect("tall");
        c.add_with(TableConstraint::at(0, 1), Component::sized(10, 15)).expect("a");
        c.add_with(TableConstraint::at(1, 1), Component::sized(10, 25)).expect("b");
        c.set_bounds(Rect::new(0, 0, 100, 100));
        c.layout_container();

        assert_eq!(bounds(&c, tall), Rect::new(0, 0, 10, 40));
    }

    #[test]
    fn test_rtl_span_covers_mirrored_columns() {
        let mut c = Container::new(TableLayout::new(2, 3).expect("table")).rtl(true);
        let wide = c
            .add_with(TableConstraint::at(0, 0).span_h(2), Component::sized(5, 10))
            .expect("wide");
        let last = c
            .add_with(TableConstraint::at(0, 2), Component::sized(30, 10))
            .expect("last");
        for (column, width) in [10, 20, 30].into_iter().enumerate() {
            c.add_with(TableConstraint::at(1, column), Component::sized(width, 10))
                .expect("row 1");
        }
        c.set_bounds(Rect::new(0, 0, 100, 20));
        c.layout_container();

        // Columns 0 and 1 (10 + 20) sit at the right edge.
        assert_eq!(bounds(&c, wide), Rect::new(70, 0, 30, 10));
        assert_eq!(bounds(&c, last), Rect::new(40, 0, 30, 10));
    }

    #[test]
    fn test_preferred_size_holds_spanning_children() {
        let mut alone = Container::new(TableLayout::new(1, 2).expect("table"));
        alone
            .add_with(TableConstraint::at(0, 0).span_h(2), Component::sized(80, 20))
            .expect("wide");
        assert_eq!(alone.preferred_size(), Size::new(80, 20));

        let mut mixed = Container::new(TableLayout::new(2, 2).expect("table"));
        mixed
            .add_with(TableConstraint::at(0, 0).span_h(2), Component::sized(80, 10))
            .expect("wide");
        mixed.add_with(TableConstraint::at(1, 0), Component::sized(30, 10)).expect("a");
        mixed.add_with(TableConstraint::at(1, 1), Component::sized(20, 10)).expect("b");
        assert_eq!(mixed.preferred_size(), Size::new(80, 20));

        let mut tall = Container::new(TableLayout::new(2, 1).expect("table"));
        tall.add_with(TableConstraint::at(0, 0).span_v(2), Component::sized(10, 50))
            .expect("tall");
        assert_eq!(tall.preferred_size().height, 50);
    }

    #[test]
    fn test_alignment_and_rtl() {
        let build = |rtl: bool, align: HAlign| {
            let mut c = Container::new(TableLayout::new(1, 1).expect("table")).rtl(rtl);
            let a = c
                .add_with(
                    TableConstraint::new().width_percent(100).align(align).valign(VAlign::Bottom),
                    Component::sized(20, 10),
                )
                .expect("a");
            c.set_bounds(Rect::new(0, 0, 100, 30));
            c.layout_container();
            bounds(&c, a)
        };
        assert_eq!(build(false, HAlign::Center), Rect::new(40, 0, 20, 10));
        assert_eq!(build(false, HAlign::Left).x, 0);
        assert_eq!(build(true, HAlign::Left).x, 80, "LEFT becomes RIGHT under RTL");
    }

    #[test]
    fn test_rtl_mirrors_columns() {
        let mut c = Container::new(TableLayout::new(1, 2).expect("table"))
            .rtl(true)
            .padding(Insets::all(0));
        let a = c.add(Component::sized(30, 10)).expect("a");
        let b = c.add(Component::sized(20, 10)).expect("b");
        c.set_bounds(Rect::new(0, 0, 100, 10));
        c.layout_container();

        assert_eq!(bounds(&c, a), Rect::new(70, 0, 30, 10));
        assert_eq!(bounds(&c, b), Rect::new(50, 0, 20, 10));
    }

    #[test]
    fn test_empty_tracks_use_defaults() {
        let defaults = TableDefaults {
            column_width_percent: Some(25),
            row_height_percent: None,
        };
        let mut c = Container::new(TableLayout::new(1, 2).expect("table").with_defaults(&defaults));
        c.add_with(TableConstraint::at(0, 1), Component::sized(10, 10)).expect("b");
        let Layout::Table(table) = c.layout() else {
            panic!("table layout expected");
        };
        let widths = table.column_widths(c.children(), 200, false, true);
        assert_eq!(widths, [50, 10]);
    }

    #[test]
    fn test_preferred_size_ignores_percentages() {
        let mut c = Container::new(TableLayout::new(1, 2).expect("table")).padding(Insets::all(1));
        c.add_with(TableConstraint::new().width_percent(90), Component::sized(10, 10))
            .expect("a");
        c.add(Component::sized(20, 12).margin(Insets::all(2))).expect("b");
        assert_eq!(c.preferred_size(), Size::new(10 + 24 + 2, 16 + 2));
    }
}
