//! Components and containers.
//!
//! A [`Container`] owns an ordered list of [`LayoutChild`] values and one
//! [`Layout`]. Geometry is recomputed on demand: mutations mark the
//! container invalid and [`Container::layout_container`] assigns bounds to
//! every child, then recurses into nested containers.
//!
//! Child bounds are relative to the parent container's origin.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::ToolkitConfig;
use crate::error::LayoutError;
use crate::layout::{Constraint, Layout, LayoutManager};
use crate::primitives::{Insets, Point, Rect, Size};

/// Counter for generating unique component IDs.
static COMPONENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of a component. Layout constraints are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

impl ComponentId {
    /// Create a new unique ID.
    pub fn new() -> Self {
        Self(COMPONENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =========================================================================
// Component
// =========================================================================

/// A leaf component: geometry plus the preferred size its content asks for.
///
/// Layouts read `preferred_size` and `margin` and write `bounds`.
#[derive(Debug)]
pub struct Component {
    id: ComponentId,
    name: Option<String>,
    bounds: Rect,
    preferred: Size,
    margin: Insets,
}

impl Component {
    pub fn new(preferred: Size) -> Self {
        Self {
            id: ComponentId::new(),
            name: None,
            bounds: Rect::ZERO,
            preferred,
            margin: Insets::ZERO,
        }
    }

    /// Convenience for `Component::new(Size::new(width, height))`.
    pub fn sized(width: i32, height: i32) -> Self {
        Self::new(Size::new(width, height))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn preferred_size(&self) -> Size {
        self.preferred
    }

    /// Change the content size. The owning container must be laid out again.
    pub fn set_preferred_size(&mut self, preferred: Size) {
        self.preferred = preferred;
    }

    pub fn margins(&self) -> Insets {
        self.margin
    }

    pub fn set_margin(&mut self, margin: Insets) {
        self.margin = margin;
    }
}

// =========================================================================
// LayoutChild
// =========================================================================

/// A child of a container: either a leaf or a nested container.
///
/// Nested containers are boxed to keep the enum small.
#[derive(Debug)]
pub enum LayoutChild {
    Component(Component),
    Container(Box<Container>),
}

impl LayoutChild {
    pub fn id(&self) -> ComponentId {
        match self {
            LayoutChild::Component(c) => c.id(),
            LayoutChild::Container(c) => c.id(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            LayoutChild::Component(c) => c.name(),
            LayoutChild::Container(c) => c.name(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            LayoutChild::Component(c) => c.bounds(),
            LayoutChild::Container(c) => c.bounds(),
        }
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        match self {
            LayoutChild::Component(c) => c.set_bounds(bounds),
            LayoutChild::Container(c) => c.set_bounds(bounds),
        }
    }

    pub fn margin(&self) -> Insets {
        match self {
            LayoutChild::Component(c) => c.margins(),
            LayoutChild::Container(c) => c.margins(),
        }
    }

    /// Preferred size, excluding margin. Containers ask their layout.
    pub fn preferred_size(&self) -> Size {
        match self {
            LayoutChild::Component(c) => c.preferred_size(),
            LayoutChild::Container(c) => c.preferred_size(),
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            LayoutChild::Container(c) => Some(c),
            LayoutChild::Component(_) => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match self {
            LayoutChild::Container(c) => Some(c),
            LayoutChild::Component(_) => None,
        }
    }
}

impl From<Component> for LayoutChild {
    fn from(component: Component) -> Self {
        LayoutChild::Component(component)
    }
}

impl From<Container> for LayoutChild {
    fn from(container: Container) -> Self {
        LayoutChild::Container(Box::new(container))
    }
}

// =========================================================================
// LayoutParent
// =========================================================================

/// What a layout reads from the container it arranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutParent {
    /// Container size (not including its own margin).
    pub size: Size,
    pub padding: Insets,
    /// Width reserved for a vertical scrollbar.
    pub side_gap: i32,
    /// Height reserved for a horizontal scrollbar.
    pub bottom_gap: i32,
    pub rtl: bool,
    pub scrollable_x: bool,
    pub scrollable_y: bool,
}

impl LayoutParent {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// The area children are laid out in, relative to the container origin.
    ///
    /// Padding is mirrored under RTL and the side gap sits on the trailing
    /// edge, so it moves left.
    pub fn content(&self) -> Rect {
        let padding = self.padding.mirrored(self.rtl);
        let x = padding.left + if self.rtl { self.side_gap } else { 0 };
        Rect::new(
            x,
            padding.top,
            (self.size.width - padding.horizontal() - self.side_gap).max(0),
            (self.size.height - padding.vertical() - self.bottom_gap).max(0),
        )
    }
}

// =========================================================================
// Container
// =========================================================================

/// A component that owns children and a layout.
#[derive(Debug)]
pub struct Container {
    base: Component,
    preferred_override: Option<Size>,
    layout: Layout,
    children: Vec<LayoutChild>,
    padding: Insets,
    scrollable_x: bool,
    scrollable_y: bool,
    scrollbar_thickness: i32,
    rtl: bool,
    valid: bool,
}

impl Container {
    pub fn new(layout: impl Into<Layout>) -> Self {
        Self {
            base: Component::new(Size::ZERO),
            preferred_override: None,
            layout: layout.into(),
            children: Vec::new(),
            padding: Insets::ZERO,
            scrollable_x: false,
            scrollable_y: false,
            scrollbar_thickness: 0,
            rtl: false,
            valid: false,
        }
    }

    /// Create a container that takes RTL mode and scrollbar thickness from
    /// the toolkit config.
    pub fn with_config(layout: impl Into<Layout>, config: &ToolkitConfig) -> Self {
        let mut container = Self::new(layout);
        container.rtl = config.rtl;
        container.scrollbar_thickness = config.scrollbar_thickness.max(0);
        container
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.base = self.base.named(name);
        self
    }

    pub fn padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn margin(mut self, margin: Insets) -> Self {
        self.base.set_margin(margin);
        self
    }

    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn scrollable(mut self, x: bool, y: bool) -> Self {
        self.scrollable_x = x;
        self.scrollable_y = y;
        self
    }

    /// Fix the preferred size instead of asking the layout.
    pub fn preferred(mut self, size: Size) -> Self {
        self.preferred_override = Some(size);
        self
    }

    pub fn id(&self) -> ComponentId {
        self.base.id()
    }

    pub fn name(&self) -> Option<&str> {
        self.base.name()
    }

    pub fn bounds(&self) -> Rect {
        self.base.bounds()
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        if bounds.size() != self.base.bounds().size() {
            self.valid = false;
        }
        self.base.set_bounds(bounds);
    }

    /// Resize in place, keeping the origin.
    pub fn set_size(&mut self, size: Size) {
        let origin = self.base.bounds().origin();
        self.set_bounds(Rect::from_origin_size(origin, size));
    }

    pub fn margins(&self) -> Insets {
        self.base.margins()
    }

    pub fn is_rtl(&self) -> bool {
        self.rtl
    }

    pub fn set_rtl(&mut self, rtl: bool) {
        self.rtl = rtl;
        self.valid = false;
    }

    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
        self.valid = false;
    }

    pub fn set_scrollable(&mut self, x: bool, y: bool) {
        self.scrollable_x = x;
        self.scrollable_y = y;
        self.valid = false;
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Swap the layout. Existing constraints do not carry over, so only
    /// children the new layout accepts without a constraint may remain.
    pub fn set_layout(&mut self, layout: impl Into<Layout>) -> Result<(), LayoutError> {
        let mut layout = layout.into();
        for child in &self.children {
            layout.add_constraint(child.id(), None)?;
        }
        self.layout = layout;
        self.valid = false;
        Ok(())
    }

    pub fn children(&self) -> &[LayoutChild] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn index_of(&self, id: ComponentId) -> Option<usize> {
        self.children.iter().position(|c| c.id() == id)
    }

    pub fn child(&self, id: ComponentId) -> Option<&LayoutChild> {
        self.children.iter().find(|c| c.id() == id)
    }

    pub fn child_mut(&mut self, id: ComponentId) -> Option<&mut LayoutChild> {
        self.children.iter_mut().find(|c| c.id() == id)
    }

    /// Find a descendant at any depth.
    pub fn find(&self, id: ComponentId) -> Option<&LayoutChild> {
        for child in &self.children {
            if child.id() == id {
                return Some(child);
            }
            if let Some(found) = child.as_container().and_then(|c| c.find(id)) {
                return Some(found);
            }
        }
        None
    }

    /// Find a descendant at any depth, mutably.
    pub fn find_mut(&mut self, id: ComponentId) -> Option<&mut LayoutChild> {
        let index = self.children.iter().position(|c| c.id() == id);
        if let Some(index) = index {
            return self.children.get_mut(index);
        }
        self.children
            .iter_mut()
            .filter_map(LayoutChild::as_container_mut)
            .find_map(|c| c.find_mut(id))
    }

    // =====================================================================
    // Mutation
    // =====================================================================

    /// Append a child that needs no constraint.
    pub fn add(&mut self, child: impl Into<LayoutChild>) -> Result<ComponentId, LayoutError> {
        self.insert_child(self.children.len(), None, child.into())
    }

    /// Append a child with a layout constraint.
    pub fn add_with(
        &mut self,
        constraint: impl Into<Constraint>,
        child: impl Into<LayoutChild>,
    ) -> Result<ComponentId, LayoutError> {
        self.insert_child(self.children.len(), Some(constraint.into()), child.into())
    }

    /// Insert a child at `index` (clamped to the child count).
    pub fn insert(
        &mut self,
        index: usize,
        constraint: Option<Constraint>,
        child: impl Into<LayoutChild>,
    ) -> Result<ComponentId, LayoutError> {
        let index = index.min(self.children.len());
        self.insert_child(index, constraint, child.into())
    }

    fn insert_child(
        &mut self,
        index: usize,
        constraint: Option<Constraint>,
        child: LayoutChild,
    ) -> Result<ComponentId, LayoutError> {
        let id = child.id();
        // The layout validates first; on error the child is dropped and
        // nothing about this container has changed.
        self.layout.add_constraint(id, constraint)?;
        self.children.insert(index, child);
        self.valid = false;
        tracing::trace!(container = %self.id(), child = %id, index, "child added");
        Ok(id)
    }

    /// Detach a child and its constraint.
    pub fn remove(&mut self, id: ComponentId) -> Option<LayoutChild> {
        let index = self.index_of(id)?;
        self.layout.remove_constraint(id);
        self.valid = false;
        tracing::trace!(container = %self.id(), child = %id, "child removed");
        Some(self.children.remove(index))
    }

    /// Remove every child.
    pub fn clear(&mut self) -> Vec<LayoutChild> {
        for child in &self.children {
            self.layout.remove_constraint(child.id());
        }
        self.valid = false;
        std::mem::take(&mut self.children)
    }

    /// Put `replacement` where `current` was, inheriting its constraint.
    /// Returns the removed child.
    pub fn replace(
        &mut self,
        current: ComponentId,
        replacement: impl Into<LayoutChild>,
    ) -> Result<LayoutChild, LayoutError> {
        let index = self
            .index_of(current)
            .ok_or(LayoutError::UnknownComponent(current))?;
        let replacement = replacement.into();
        let constraint = self.layout.constraint_of(current);

        self.layout.remove_constraint(current);
        if let Err(err) = self.layout.add_constraint(replacement.id(), constraint.clone()) {
            // Restore the original association before reporting.
            self.layout.add_constraint(current, constraint)?;
            return Err(err);
        }
        self.valid = false;
        Ok(std::mem::replace(&mut self.children[index], replacement))
    }

    // =====================================================================
    // Layout
    // =====================================================================

    pub fn layout_parent(&self) -> LayoutParent {
        let thickness = self.scrollbar_thickness;
        LayoutParent {
            size: self.base.bounds().size(),
            padding: self.padding,
            side_gap: if self.scrollable_y { thickness } else { 0 },
            bottom_gap: if self.scrollable_x { thickness } else { 0 },
            rtl: self.rtl,
            scrollable_x: self.scrollable_x,
            scrollable_y: self.scrollable_y,
        }
    }

    /// Mark geometry stale.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Assign bounds to every child, then lay out nested containers.
    pub fn layout_container(&mut self) {
        let parent = self.layout_parent();
        tracing::debug!(
            container = %self.id(),
            layout = self.layout.name(),
            children = self.children.len(),
            width = parent.size.width,
            height = parent.size.height,
            "layout pass"
        );
        self.layout.layout_container(&parent, &mut self.children);
        for child in &mut self.children {
            if let LayoutChild::Container(nested) = child {
                nested.layout_container();
            }
        }
        self.valid = true;
    }

    /// Lay out only if something changed since the last pass.
    pub fn revalidate(&mut self) {
        if !self.valid {
            self.layout_container();
        }
    }

    /// The size this container wants: its layout's answer unless fixed.
    pub fn preferred_size(&self) -> Size {
        if let Some(size) = self.preferred_override {
            return size;
        }
        self.layout
            .preferred_size(&self.layout_parent(), &self.children)
    }

    /// Bounds of a descendant in this container's coordinate space.
    pub fn absolute_bounds_of(&self, id: ComponentId) -> Option<Rect> {
        self.absolute_bounds_from(id, self.bounds().origin())
    }

    fn absolute_bounds_from(&self, id: ComponentId, origin: Point) -> Option<Rect> {
        for child in &self.children {
            let bounds = child.bounds().translate(origin);
            if child.id() == id {
                return Some(bounds);
            }
            if let Some(found) = child
                .as_container()
                .and_then(|c| c.absolute_bounds_from(id, bounds.origin()))
            {
                return Some(found);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BorderLayout, BorderRegion, BoxLayout, FlowLayout};

    #[test]
    fn test_component_ids_are_unique() {
        let a = Component::sized(1, 1);
        let b = Component::sized(1, 1);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_content_rect_accounts_for_gaps() {
        let parent = LayoutParent {
            size: Size::new(100, 50),
            padding: Insets::all(5),
            side_gap: 4,
            bottom_gap: 2,
            ..LayoutParent::default()
        };
        assert_eq!(parent.content(), Rect::new(5, 5, 86, 38));

        let rtl = LayoutParent { rtl: true, ..parent };
        assert_eq!(rtl.content(), Rect::new(9, 5, 86, 38));
    }

    #[test]
    fn test_failed_add_leaves_container_untouched() {
        let mut form = Container::new(BorderLayout::new());
        let north = form
            .add_with(BorderRegion::North, Component::sized(10, 10))
            .expect("first north");
        form.layout_container();
        assert!(form.is_valid());

        let err = form.add(Component::sized(10, 10)).unwrap_err();
        assert!(matches!(err, LayoutError::MissingConstraint { .. }));
        assert_eq!(form.len(), 1);
        assert!(form.is_valid(), "failed add must not invalidate");
        assert_eq!(form.children()[0].id(), north);
    }

    #[test]
    fn test_remove_and_replace_keep_constraint() {
        let mut form = Container::new(BorderLayout::new());
        let old = form
            .add_with(BorderRegion::Center, Component::sized(10, 10))
            .expect("center");
        let replacement = Component::sized(20, 20);
        let new_id = replacement.id();

        let removed = form.replace(old, replacement).expect("replace");
        assert_eq!(removed.id(), old);
        assert_eq!(
            form.layout().constraint_of(new_id),
            Some(Constraint::Border(BorderRegion::Center))
        );

        // Region is free again once removed.
        form.remove(new_id).expect("present");
        form.add_with(BorderRegion::Center, Component::sized(5, 5))
            .expect("center reusable");
    }

    #[test]
    fn test_nested_layout_and_absolute_bounds() {
        let mut inner = Container::new(BoxLayout::x()).padding(Insets::all(2));
        let leaf = inner.add(Component::sized(10, 10)).expect("leaf");

        let mut root = Container::new(BoxLayout::y());
        root.add(inner).expect("inner");
        root.set_bounds(Rect::new(100, 200, 50, 40));
        root.layout_container();

        let abs = root.absolute_bounds_of(leaf).expect("found");
        assert_eq!(abs.x, 102);
        assert_eq!(abs.y, 202);
        assert_eq!(abs.width, 10);
    }

    #[test]
    fn test_preferred_override() {
        let c = Container::new(FlowLayout::new()).preferred(Size::new(7, 8));
        assert_eq!(c.preferred_size(), Size::new(7, 8));
    }

    #[test]
    fn test_resize_invalidates() {
        let mut c = Container::new(FlowLayout::new());
        c.set_size(Size::new(10, 10));
        c.layout_container();
        assert!(c.is_valid());
        c.set_size(Size::new(20, 10));
        assert!(!c.is_valid());
    }
}
