//! Expandable tree widget.
//!
//! A [`Tree`] shows the nodes of a [`TreeModel`] as rows stacked in a
//! vertical [`BoxLayout`]. Each row is a [`BorderLayout`] container with an
//! expander icon in the west region and the label in the center, indented by
//! its depth. Expanding a node inserts its children right after it;
//! collapsing removes every visible descendant.
//!
//! Expand and collapse hand back the vertical slide the caller should run
//! between the old and new tree surfaces: forward when opening, reversed when
//! closing.

use std::sync::Arc;

use lwuit::{
    BorderLayout, BorderRegion, BoxLayout, Clock, CommonTransition, Component, ComponentId,
    Container, DispatchError, EventDispatcher, Insets, LayoutError, ListenerId, SelectionEvent,
    SlideOrientation, SystemClock, ToolkitConfig, TransitionKind,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("no row {index} in a tree of {len} rows")]
    NoSuchRow { index: usize, len: usize },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Source of tree structure.
pub trait TreeModel<T> {
    /// Children of `parent`, or the top-level nodes when `parent` is `None`.
    fn children(&self, parent: Option<&T>) -> Vec<T>;

    /// Leaves have no expander and never expand.
    fn is_leaf(&self, node: &T) -> bool;

    /// Width reserved for the node's label.
    fn label_width(&self, _node: &T) -> i32 {
        100
    }
}

/// Per-row state. Rows are kept in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<T> {
    pub object: T,
    /// Row index of the parent node.
    pub parent: Option<usize>,
    pub expanded: bool,
    pub depth: usize,
    row: ComponentId,
}

impl<T> TreeNode<T> {
    /// Id of the row container inside the tree.
    pub fn row(&self) -> ComponentId {
        self.row
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStyle {
    pub row_height: i32,
    /// Horizontal offset per depth level.
    pub indent: i32,
    pub icon_width: i32,
}

impl Default for TreeStyle {
    fn default() -> Self {
        Self {
            row_height: 20,
            indent: 16,
            icon_width: 16,
        }
    }
}

pub struct Tree<T> {
    model: Box<dyn TreeModel<T>>,
    config: ToolkitConfig,
    style: TreeStyle,
    container: Container,
    nodes: Vec<TreeNode<T>>,
    selected: Option<usize>,
    dispatcher: EventDispatcher,
    clock: Arc<dyn Clock>,
}

impl<T> Tree<T> {
    /// A tree showing the model's top-level nodes, collapsed.
    ///
    /// Selection events are delivered inline and transitions use the system
    /// clock until replaced with [`Tree::with_dispatcher`] and
    /// [`Tree::with_clock`].
    pub fn new(model: impl TreeModel<T> + 'static, config: &ToolkitConfig) -> Result<Self, TreeError> {
        let mut tree = Self {
            model: Box::new(model),
            config: config.clone(),
            style: TreeStyle::default(),
            container: Container::with_config(BoxLayout::y(), config),
            nodes: Vec::new(),
            selected: None,
            dispatcher: EventDispatcher::inline(),
            clock: Arc::new(SystemClock::new()),
        };
        tree.reload()?;
        Ok(tree)
    }

    /// Rebuild every row with a new style. Collapses the tree.
    pub fn with_style(mut self, style: TreeStyle) -> Result<Self, TreeError> {
        self.style = style;
        self.reload()?;
        Ok(self)
    }

    pub fn with_dispatcher(mut self, dispatcher: EventDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Drop all rows and show the top-level nodes again.
    pub fn reload(&mut self) -> Result<(), TreeError> {
        self.container.clear();
        self.nodes.clear();
        self.selected = None;
        for object in self.model.children(None) {
            let row = self.build_row(&object, 0)?;
            let id = self.container.add(row)?;
            self.nodes.push(TreeNode {
                object,
                parent: None,
                expanded: false,
                depth: 0,
                row: id,
            });
        }
        tracing::debug!(rows = self.nodes.len(), "tree loaded");
        Ok(())
    }

    fn build_row(&self, object: &T, depth: usize) -> Result<Container, LayoutError> {
        let indent = self.style.indent * depth as i32;
        let mut row = Container::with_config(BorderLayout::new(), &self.config)
            .margin(Insets::new(0, 0, 0, indent));
        let icon = if self.model.is_leaf(object) { "leaf" } else { "expander" };
        row.add_with(
            BorderRegion::West,
            Component::sized(self.style.icon_width, self.style.row_height).named(icon),
        )?;
        row.add_with(
            BorderRegion::Center,
            Component::sized(self.model.label_width(object), self.style.row_height).named("label"),
        )?;
        Ok(row)
    }

    fn slide(&self, reverse: bool) -> CommonTransition {
        CommonTransition::from_config(TransitionKind::Slide, &self.config, self.clock.clone())
            .orientation(SlideOrientation::Vertical)
            .forward(!reverse)
    }

    fn check(&self, index: usize) -> Result<&TreeNode<T>, TreeError> {
        self.nodes.get(index).ok_or(TreeError::NoSuchRow {
            index,
            len: self.nodes.len(),
        })
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<&TreeNode<T>> {
        self.nodes.get(index)
    }

    /// Visible nodes in display order.
    pub fn nodes(&self) -> &[TreeNode<T>] {
        &self.nodes
    }

    /// Row index of the node whose row container has `id`.
    pub fn index_of_row(&self, id: ComponentId) -> Option<usize> {
        self.nodes.iter().position(|n| n.row == id)
    }

    pub fn style(&self) -> TreeStyle {
        self.style
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    // =====================================================================
    // Expand / collapse
    // =====================================================================

    /// Show the children of the node at `index` right after it.
    ///
    /// Returns `None` for leaves and nodes that are already expanded.
    pub fn expand(&mut self, index: usize) -> Result<Option<CommonTransition>, TreeError> {
        let node = self.check(index)?;
        if node.expanded || self.model.is_leaf(&node.object) {
            return Ok(None);
        }
        let depth = node.depth + 1;
        let children = self.model.children(Some(&node.object));

        let mut rows = Vec::with_capacity(children.len());
        for object in &children {
            rows.push(self.build_row(object, depth)?);
        }
        let mut inserted = Vec::with_capacity(children.len());
        for (offset, (object, row)) in children.into_iter().zip(rows).enumerate() {
            let id = self.container.insert(index + 1 + offset, None, row)?;
            inserted.push(TreeNode {
                object,
                parent: Some(index),
                expanded: false,
                depth,
                row: id,
            });
        }

        let count = inserted.len();
        for node in &mut self.nodes[index + 1..] {
            if let Some(parent) = node.parent.as_mut().filter(|p| **p > index) {
                *parent += count;
            }
        }
        self.nodes.splice(index + 1..index + 1, inserted);
        if let Some(selected) = self.selected.as_mut().filter(|s| **s > index) {
            *selected += count;
        }
        self.nodes[index].expanded = true;

        tracing::debug!(index, children = count, "node expanded");
        Ok(Some(self.slide(false)))
    }

    /// Hide every visible descendant of the node at `index`.
    ///
    /// Returns `None` when the node is not expanded. A selection inside the
    /// removed rows is cleared and reported to selection listeners.
    pub fn collapse(&mut self, index: usize) -> Result<Option<CommonTransition>, TreeError> {
        let node = self.check(index)?;
        if !node.expanded {
            return Ok(None);
        }
        let depth = node.depth;
        let end = self.nodes[index + 1..]
            .iter()
            .position(|n| n.depth <= depth)
            .map_or(self.nodes.len(), |p| index + 1 + p);

        let removed: Vec<_> = self.nodes.drain(index + 1..end).collect();
        for node in &removed {
            self.container.remove(node.row);
        }
        let count = removed.len();
        for node in &mut self.nodes[index + 1..] {
            if let Some(parent) = node.parent.as_mut().filter(|p| **p > index) {
                *parent -= count;
            }
        }
        self.nodes[index].expanded = false;
        tracing::debug!(index, removed = count, "node collapsed");

        match self.selected {
            Some(s) if s > index && s < end => self.select(None)?,
            Some(s) if s >= end => self.selected = Some(s - count),
            _ => {}
        }
        Ok(Some(self.slide(true)))
    }

    /// Expand a collapsed node or collapse an expanded one.
    pub fn toggle(&mut self, index: usize) -> Result<Option<CommonTransition>, TreeError> {
        if self.check(index)?.expanded {
            self.collapse(index)
        } else {
            self.expand(index)
        }
    }

    // =====================================================================
    // Selection
    // =====================================================================

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_node(&self) -> Option<&TreeNode<T>> {
        self.selected.and_then(|i| self.nodes.get(i))
    }

    /// Change the selected row and notify selection listeners.
    pub fn select(&mut self, index: Option<usize>) -> Result<(), TreeError> {
        if let Some(index) = index {
            self.check(index)?;
        }
        if index == self.selected {
            return Ok(());
        }
        let old = std::mem::replace(&mut self.selected, index);
        self.dispatcher
            .fire_selection(SelectionEvent { old, new: index })?;
        Ok(())
    }

    pub fn add_selection_listener(
        &self,
        f: impl Fn(&SelectionEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.dispatcher.add_selection_listener(f)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.nodes)
            .field("selected", &self.selected)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use lwuit::Rect;

    /// docs/guide.md, src/{main.rs, lib/mod.rs}, README
    struct Files;

    impl TreeModel<&'static str> for Files {
        fn children(&self, parent: Option<&&'static str>) -> Vec<&'static str> {
            match parent.copied() {
                None => vec!["docs", "src", "README"],
                Some("docs") => vec!["guide.md"],
                Some("src") => vec!["main.rs", "lib"],
                Some("lib") => vec!["mod.rs"],
                Some(_) => Vec::new(),
            }
        }

        fn is_leaf(&self, node: &&'static str) -> bool {
            node.contains('.') || *node == "README"
        }
    }

    fn tree() -> Tree<&'static str> {
        Tree::new(Files, &ToolkitConfig::default()).expect("tree")
    }

    fn names(tree: &Tree<&'static str>) -> Vec<&'static str> {
        tree.nodes().iter().map(|n| n.object).collect()
    }

    #[test]
    fn test_top_level_rows() {
        let tree = tree();
        assert_eq!(names(&tree), ["docs", "src", "README"]);
        assert!(tree.nodes().iter().all(|n| n.depth == 0 && n.parent.is_none()));
        assert_eq!(tree.container().len(), 3);
    }

    #[test]
    fn test_expand_inserts_after_node() {
        let mut tree = tree();
        let transition = tree.expand(1).expect("expand").expect("transition");

        assert_eq!(names(&tree), ["docs", "src", "main.rs", "lib", "README"]);
        assert_eq!(tree.node(2).map(|n| (n.parent, n.depth)), Some((Some(1), 1)));
        assert!(tree.node(1).expect("src").expanded);
        assert_eq!(tree.container().len(), 5);
        assert_eq!(tree.container().index_of(tree.nodes()[3].row()), Some(3));

        assert_eq!(transition.kind(), TransitionKind::Slide);
        assert_eq!(transition.slide_orientation(), SlideOrientation::Vertical);
        assert!(transition.is_forward());
    }

    #[test]
    fn test_expand_leaf_or_open_node_is_noop() {
        let mut tree = tree();
        assert!(tree.expand(2).expect("leaf").is_none());
        assert!(tree.expand(1).expect("first").is_some());
        assert!(tree.expand(1).expect("second").is_none());
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_collapse_removes_all_descendants() {
        let mut tree = tree();
        tree.expand(1).expect("src");
        tree.expand(3).expect("lib");
        assert_eq!(names(&tree), ["docs", "src", "main.rs", "lib", "mod.rs", "README"]);

        let transition = tree.collapse(1).expect("collapse").expect("transition");
        assert_eq!(names(&tree), ["docs", "src", "README"]);
        assert_eq!(tree.container().len(), 3);
        assert!(!tree.node(1).expect("src").expanded);
        assert!(!transition.is_forward());

        assert!(tree.collapse(1).expect("again").is_none());
    }

    #[test]
    fn test_parent_indices_follow_insertions() {
        let mut tree = tree();
        tree.expand(1).expect("src");
        tree.expand(3).expect("lib");
        tree.expand(0).expect("docs");

        assert_eq!(
            names(&tree),
            ["docs", "guide.md", "src", "main.rs", "lib", "mod.rs", "README"]
        );
        let parents: Vec<_> = tree.nodes().iter().map(|n| n.parent).collect();
        assert_eq!(
            parents,
            [None, Some(0), None, Some(2), Some(2), Some(4), None]
        );

        tree.collapse(0).expect("docs");
        let parents: Vec<_> = tree.nodes().iter().map(|n| n.parent).collect();
        assert_eq!(parents, [None, None, Some(1), Some(1), Some(3), None]);
    }

    #[test]
    fn test_toggle() {
        let mut tree = tree();
        assert!(tree.toggle(1).expect("open").expect("slide").is_forward());
        assert!(!tree.toggle(1).expect("close").expect("slide").is_forward());
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_out_of_range() {
        let mut tree = tree();
        assert!(matches!(
            tree.expand(9),
            Err(TreeError::NoSuchRow { index: 9, len: 3 })
        ));
        assert!(tree.select(Some(3)).is_err());
    }

    #[test]
    fn test_selection_events() {
        let mut tree = tree();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        tree.add_selection_listener(move |e| sink.lock().unwrap().push(*e));

        tree.expand(1).expect("src");
        tree.select(Some(3)).expect("select lib");
        tree.select(Some(3)).expect("same row");
        tree.collapse(1).expect("collapse");

        assert_eq!(tree.selected(), None);
        assert_eq!(
            *seen.lock().unwrap(),
            [
                SelectionEvent { old: None, new: Some(3) },
                SelectionEvent { old: Some(3), new: None },
            ]
        );
    }

    #[test]
    fn test_selection_shifts_with_rows() {
        let mut tree = tree();
        tree.select(Some(2)).expect("README");
        tree.expand(1).expect("src");
        assert_eq!(tree.selected_node().map(|n| n.object), Some("README"));
        tree.collapse(1).expect("src");
        assert_eq!(tree.selected(), Some(2));
    }

    #[test]
    fn test_rows_indent_by_depth() {
        let mut tree = tree();
        tree.expand(1).expect("src");
        tree.expand(3).expect("lib");
        let container = tree.container_mut();
        container.set_bounds(Rect::new(0, 0, 200, 400));
        container.layout_container();

        let bounds: Vec<_> = tree
            .nodes()
            .iter()
            .map(|n| tree.container().child(n.row()).expect("row").bounds())
            .collect();
        assert_eq!(bounds[1], Rect::new(0, 20, 200, 20));
        assert_eq!(bounds[2], Rect::new(16, 40, 184, 20));
        assert_eq!(bounds[4], Rect::new(32, 80, 168, 20));
    }

    #[test]
    fn test_style_rebuilds_rows() {
        let style = TreeStyle {
            row_height: 30,
            indent: 10,
            icon_width: 12,
        };
        let mut tree = tree().with_style(style).expect("style");
        tree.expand(1).expect("src");
        assert_eq!(tree.container().preferred_size().height, 5 * 30);
        assert_eq!(tree.style(), style);
    }
}
