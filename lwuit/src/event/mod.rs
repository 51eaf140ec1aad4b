//! Events and their delivery.
//!
//! Listeners always run on the UI thread. [`EventDispatcher`] snapshots its
//! listeners and either calls them directly (already on the UI thread) or
//! hands the snapshot to the [`UiExecutor`] and waits for delivery.

pub mod dispatcher;
pub mod ui_thread;

pub use dispatcher::{EventDispatcher, ListenerId};
pub use ui_thread::{InlineExecutor, Job, UiExecutor, UiThread};

use crate::component::ComponentId;
use crate::primitives::Point;

/// A command was triggered: a button press, a menu item, a key binding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionEvent {
    pub source: Option<ComponentId>,
    pub command: Option<String>,
    /// Pointer position for pointer-triggered actions.
    pub point: Option<Point>,
    consumed: bool,
}

impl ActionEvent {
    pub fn new(source: Option<ComponentId>) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn at(mut self, point: Point) -> Self {
        self.point = Some(point);
        self
    }

    /// Stop delivery to the listeners after this one.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataChange {
    Added,
    Removed,
    Changed,
}

/// A model changed at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChangedEvent {
    pub change: DataChange,
    pub index: usize,
}

/// The selected index moved. `None` means nothing selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEvent {
    pub old: Option<usize>,
    pub new: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusEvent {
    pub component: ComponentId,
    pub gained: bool,
}

/// A style property changed. Delivered without waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEvent {
    pub component: Option<ComponentId>,
    pub property: String,
}

/// Any event, tagged by kind. This is what crosses to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Action(ActionEvent),
    DataChanged(DataChangedEvent),
    Selection(SelectionEvent),
    Focus(FocusEvent),
    Style(StyleEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Action(_) => EventKind::Action,
            Event::DataChanged(_) => EventKind::DataChanged,
            Event::Selection(_) => EventKind::Selection,
            Event::Focus(_) => EventKind::Focus,
            Event::Style(_) => EventKind::Style,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Action,
    DataChanged,
    Selection,
    Focus,
    Style,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_event_consumption() {
        let mut event = ActionEvent::new(None).with_command("ok");
        assert!(!event.is_consumed());
        event.consume();
        assert!(event.is_consumed());
        assert_eq!(event.command.as_deref(), Some("ok"));
    }

    #[test]
    fn test_event_kind() {
        let event = Event::Selection(SelectionEvent { old: None, new: Some(2) });
        assert_eq!(event.kind(), EventKind::Selection);
    }
}
