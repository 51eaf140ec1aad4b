//! FlowLayout - wrapping rows of children at their preferred size.
//!
//! Children are placed along a row until the next one would overflow the
//! container width, then wrap to a new row. Once a row is complete its
//! leftover width is distributed according to the horizontal alignment.

use crate::component::{LayoutChild, LayoutParent};
use crate::primitives::{Rect, Size};

use super::{outer_size, HAlign, LayoutManager, VAlign};

// =========================================================================
// FlowLayout
// =========================================================================

/// A flow layout that wraps children like words on a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowLayout {
    /// Where a row's leftover width goes.
    align: HAlign,
    /// Placement of shorter children within the row height.
    valign: VAlign,
}

impl FlowLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_align(align: HAlign) -> Self {
        Self {
            align,
            ..Self::default()
        }
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }

    pub fn align(&self) -> HAlign {
        self.align
    }

    pub fn vertical_align(&self) -> VAlign {
        self.valign
    }

    /// Settle one finished row.
    ///
    /// While a row is built, each child's `x` holds its distance from the
    /// leading edge. Here it becomes a real coordinate: packed against the
    /// left, reversed under RTL, then shifted by the aligned leftover.
    fn move_components(
        &self,
        parent: &LayoutParent,
        row: &mut [LayoutChild],
        used: i32,
        row_height: i32,
    ) {
        let content = parent.content();
        let shift = self.align.mirrored(parent.rtl).offset(content.width, used);

        for child in row.iter_mut() {
            let m = child.margin().mirrored(parent.rtl);
            let b = child.bounds();
            let packed = if parent.rtl { used - b.x - b.width } else { b.x };
            let y = b.y + self.valign.offset(row_height, b.height + m.vertical());
            child.set_bounds(Rect::new(content.x + shift + packed, y, b.width, b.height));
        }
    }
}

impl LayoutManager for FlowLayout {
    fn name(&self) -> &'static str {
        "FlowLayout"
    }

    fn layout_container(&mut self, parent: &LayoutParent, children: &mut [LayoutChild]) {
        let content = parent.content();
        let rtl = parent.rtl;

        let mut row_start = 0;
        let mut x = 0;
        let mut y = 0;
        let mut row_height = 0;

        for i in 0..children.len() {
            let outer = outer_size(&children[i]);

            // Wrap to the next row (never before the first child of a row)
            if x > 0 && x + outer.width > content.width {
                self.move_components(parent, &mut children[row_start..i], x, row_height);
                y += row_height;
                x = 0;
                row_height = 0;
                row_start = i;
            }

            let child = &mut children[i];
            let m = child.margin().mirrored(rtl);
            let (lead, trail) = if rtl { (m.right, m.left) } else { (m.left, m.right) };
            let preferred = child.preferred_size();
            let width = preferred.width.min(content.width - m.horizontal()).max(0);

            child.set_bounds(Rect::new(
                x + lead,
                content.y + y + m.top,
                width,
                preferred.height,
            ));
            x += lead + width + trail;
            row_height = row_height.max(preferred.height + m.vertical());
        }

        if row_start < children.len() {
            self.move_components(parent, &mut children[row_start..], x, row_height);
        }
    }

    fn preferred_size(&self, parent: &LayoutParent, children: &[LayoutChild]) -> Size {
        let available = parent.content().width;
        // Before the container has a width there is nothing to wrap against.
        let wrap = parent.size.width > 0;

        let mut width = 0;
        let mut height = 0;
        let mut row_width = 0;
        let mut row_height = 0;

        for child in children {
            let outer = outer_size(child);
            if wrap && row_width > 0 && row_width + outer.width > available {
                width = width.max(row_width);
                height += row_height;
                row_width = 0;
                row_height = 0;
            }
            row_width += outer.width;
            row_height = row_height.max(outer.height);
        }
        width = width.max(row_width);
        height += row_height;

        Size::new(
            width + parent.padding.horizontal() + parent.side_gap,
            height + parent.padding.vertical() + parent.bottom_gap,
        )
    }
}
