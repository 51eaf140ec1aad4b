//! Thread-safe listener registry with delivery on the UI thread.
//!
//! # Delivery
//!
//! ```text
//! fire_*(event)
//!   -> snapshot listeners of that kind (mutex held only here)
//!   -> on UI thread?  yes: call them now
//!                     no:  queue (snapshot, event) on the UI thread and
//!                          block on a bounded(1) rendezvous for the result
//! ```
//!
//! Only one marshalled dispatch may be waiting per dispatcher. A second
//! thread arriving meanwhile gets [`DispatchError::Busy`] instead of
//! queueing behind it.
//!
//! A listener that panics during a marshalled dispatch fails that call with
//! [`DispatchError::ListenerPanicked`]; the UI thread keeps running.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::error::DispatchError;

use super::ui_thread::{InlineExecutor, UiExecutor, panic_message};
use super::{
    ActionEvent, DataChangedEvent, Event, EventKind, FocusEvent, SelectionEvent, StyleEvent,
};

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type ActionFn = dyn Fn(&mut ActionEvent) + Send + Sync;
type DataChangedFn = dyn Fn(&DataChangedEvent) + Send + Sync;
type SelectionFn = dyn Fn(&SelectionEvent) + Send + Sync;
type FocusFn = dyn Fn(&FocusEvent) + Send + Sync;
type StyleFn = dyn Fn(&StyleEvent) + Send + Sync;

#[derive(Clone)]
enum Listener {
    Action(Arc<ActionFn>),
    DataChanged(Arc<DataChangedFn>),
    Selection(Arc<SelectionFn>),
    Focus(Arc<FocusFn>),
    Style(Arc<StyleFn>),
}

impl Listener {
    fn kind(&self) -> EventKind {
        match self {
            Listener::Action(_) => EventKind::Action,
            Listener::DataChanged(_) => EventKind::DataChanged,
            Listener::Selection(_) => EventKind::Selection,
            Listener::Focus(_) => EventKind::Focus,
            Listener::Style(_) => EventKind::Style,
        }
    }
}

/// Call every listener in the snapshot. Action delivery stops at the first
/// listener that consumes the event.
fn deliver(listeners: &[Listener], mut event: Event) -> Event {
    for listener in listeners {
        match (listener, &mut event) {
            (Listener::Action(f), Event::Action(e)) => {
                if e.is_consumed() {
                    break;
                }
                f(e);
            }
            (Listener::DataChanged(f), Event::DataChanged(e)) => f(e),
            (Listener::Selection(f), Event::Selection(e)) => f(e),
            (Listener::Focus(f), Event::Focus(e)) => f(e),
            (Listener::Style(f), Event::Style(e)) => f(e),
            _ => {}
        }
    }
    event
}

/// Owns a component's listeners of every kind.
pub struct EventDispatcher {
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    executor: Arc<dyn UiExecutor>,
    /// Held for the duration of one marshalled dispatch.
    in_flight: Mutex<()>,
    next_id: AtomicU64,
}

impl EventDispatcher {
    pub fn new(executor: Arc<dyn UiExecutor>) -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            executor,
            in_flight: Mutex::new(()),
            next_id: AtomicU64::new(1),
        }
    }

    /// A dispatcher that delivers on the calling thread.
    pub fn inline() -> Self {
        Self::new(Arc::new(InlineExecutor))
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        // A listener list stays consistent even if a holder panicked.
        self.listeners.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn register(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, listener));
        id
    }

    pub fn add_action_listener(
        &self,
        f: impl Fn(&mut ActionEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.register(Listener::Action(Arc::new(f)))
    }

    pub fn add_data_changed_listener(
        &self,
        f: impl Fn(&DataChangedEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.register(Listener::DataChanged(Arc::new(f)))
    }

    pub fn add_selection_listener(
        &self,
        f: impl Fn(&SelectionEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.register(Listener::Selection(Arc::new(f)))
    }

    pub fn add_focus_listener(&self, f: impl Fn(&FocusEvent) + Send + Sync + 'static) -> ListenerId {
        self.register(Listener::Focus(Arc::new(f)))
    }

    pub fn add_style_listener(&self, f: impl Fn(&StyleEvent) + Send + Sync + 'static) -> ListenerId {
        self.register(Listener::Style(Arc::new(f)))
    }

    /// Unregister a listener. Returns false if it was not registered.
    ///
    /// A dispatch that already took its snapshot still calls it.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn has_listeners(&self) -> bool {
        !self.lock_listeners().is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    fn snapshot(&self, kind: EventKind) -> Vec<Listener> {
        self.lock_listeners()
            .iter()
            .filter(|(_, l)| l.kind() == kind)
            .map(|(_, l)| l.clone())
            .collect()
    }

    /// Deliver on the UI thread and wait for the delivered event.
    fn dispatch(&self, event: Event) -> Result<Event, DispatchError> {
        let listeners = self.snapshot(event.kind());
        if listeners.is_empty() {
            return Ok(event);
        }
        if self.executor.is_ui_thread() {
            return Ok(deliver(&listeners, event));
        }

        let _guard = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                tracing::debug!(kind = ?event.kind(), "dispatch rejected: another is in flight");
                return Err(DispatchError::Busy);
            }
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        let (tx, rx) = crossbeam_channel::bounded(1);
        self.executor.call_serially(Box::new(move || {
            let kind = event.kind();
            let result = panic::catch_unwind(AssertUnwindSafe(|| deliver(&listeners, event)))
                .map_err(|payload| {
                    tracing::error!(?kind, message = panic_message(&*payload), "listener panicked");
                    DispatchError::ListenerPanicked
                });
            let _ = tx.send(result);
        }))?;
        rx.recv().map_err(|_| DispatchError::Disconnected)?
    }

    /// Fire an action event. Returns the event as the last listener left it,
    /// so callers can check [`ActionEvent::is_consumed`].
    pub fn fire_action(&self, event: ActionEvent) -> Result<ActionEvent, DispatchError> {
        match self.dispatch(Event::Action(event))? {
            Event::Action(event) => Ok(event),
            other => unreachable!("action dispatch returned {other:?}"),
        }
    }

    pub fn fire_data_changed(&self, event: DataChangedEvent) -> Result<(), DispatchError> {
        self.dispatch(Event::DataChanged(event)).map(drop)
    }

    pub fn fire_selection(&self, event: SelectionEvent) -> Result<(), DispatchError> {
        self.dispatch(Event::Selection(event)).map(drop)
    }

    pub fn fire_focus(&self, event: FocusEvent) -> Result<(), DispatchError> {
        self.dispatch(Event::Focus(event)).map(drop)
    }

    /// Fire a style change without waiting for delivery.
    pub fn fire_style(&self, event: StyleEvent) -> Result<(), DispatchError> {
        let listeners = self.snapshot(EventKind::Style);
        if listeners.is_empty() {
            return Ok(());
        }
        let event = Event::Style(event);
        if self.executor.is_ui_thread() {
            deliver(&listeners, event);
            return Ok(());
        }
        self.executor.call_serially(Box::new(move || {
            deliver(&listeners, event);
        }))
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::UiThread;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn test_consumed_action_stops_delivery() {
        let dispatcher = EventDispatcher::inline();
        let calls = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let calls = calls.clone();
            dispatcher.add_action_listener(move |e| {
                calls.fetch_add(1, Ordering::SeqCst);
                e.consume();
            });
        }

        let event = dispatcher.fire_action(ActionEvent::new(None)).expect("fire");
        assert!(event.is_consumed());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let dispatcher = EventDispatcher::inline();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let order = order.clone();
            dispatcher.add_selection_listener(move |_| order.lock().expect("lock").push(i));
        }
        dispatcher
            .fire_selection(SelectionEvent { old: None, new: Some(0) })
            .expect("fire");
        assert_eq!(*order.lock().expect("lock"), [0, 1, 2]);
    }

    #[test]
    fn test_remove_listener() {
        let dispatcher = EventDispatcher::inline();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let id = dispatcher.add_focus_listener(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert!(dispatcher.remove_listener(id));
        assert!(!dispatcher.remove_listener(id));

        let component = crate::component::ComponentId::new();
        dispatcher
            .fire_focus(FocusEvent { component, gained: true })
            .expect("fire");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!dispatcher.has_listeners());
    }

    #[test]
    fn test_marshals_onto_ui_thread() {
        let ui = Arc::new(UiThread::spawn().expect("spawn"));
        let dispatcher = EventDispatcher::new(ui.clone());
        let ui_check = ui.clone();
        let on_ui = Arc::new(Mutex::new(None));
        let seen = on_ui.clone();
        dispatcher.add_action_listener(move |e| {
            *seen.lock().expect("lock") = Some(ui_check.is_ui_thread());
            e.consume();
        });

        let event = dispatcher
            .fire_action(ActionEvent::new(None).with_command("go"))
            .expect("fire");
        assert!(event.is_consumed(), "consumed flag travels back");
        assert_eq!(*on_ui.lock().expect("lock"), Some(true));
    }

    #[test]
    fn test_second_marshal_is_busy() {
        let ui = Arc::new(UiThread::spawn().expect("spawn"));
        let dispatcher = Arc::new(EventDispatcher::new(ui.clone()));
        let (entered_tx, entered_rx) = crossbeam_channel::bounded::<()>(1);
        let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(1);
        dispatcher.add_action_listener(move |_| {
            let _ = entered_tx.send(());
            let _ = release_rx.recv();
        });

        let first = {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || dispatcher.fire_action(ActionEvent::new(None)))
        };
        entered_rx.recv().expect("listener entered");

        assert_eq!(
            dispatcher.fire_action(ActionEvent::new(None)),
            Err(DispatchError::Busy)
        );

        release_tx.send(()).expect("release");
        assert!(first.join().expect("join").is_ok());
    }

    #[test]
    fn test_stopped_ui_thread_disconnects() {
        let ui = Arc::new(UiThread::spawn().expect("spawn"));
        let dispatcher = EventDispatcher::new(ui.clone());
        dispatcher.add_data_changed_listener(|_| {});
        ui.shutdown();

        let event = DataChangedEvent {
            change: crate::event::DataChange::Added,
            index: 0,
        };
        assert_eq!(dispatcher.fire_data_changed(event), Err(DispatchError::Disconnected));
    }

    #[test]
    fn test_style_events_do_not_wait() {
        let ui = Arc::new(UiThread::spawn().expect("spawn"));
        let dispatcher = EventDispatcher::new(ui.clone());
        let (tx, rx) = crossbeam_channel::unbounded();
        dispatcher.add_style_listener(move |e| {
            let _ = tx.send(e.property.clone());
        });

        dispatcher
            .fire_style(StyleEvent { component: None, property: "bgColor".into() })
            .expect("fire");
        assert_eq!(rx.recv().expect("delivered").as_str(), "bgColor");
    }

    #[test]
    fn test_panicking_listener_does_not_stop_delivery() {
        let ui = Arc::new(UiThread::spawn().expect("spawn"));
        let dispatcher = EventDispatcher::new(ui.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        dispatcher.add_selection_listener(move |_| {
            if c.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("first selection fails");
            }
        });

        let event = SelectionEvent { old: None, new: Some(1) };
        assert_eq!(
            dispatcher.fire_selection(event),
            Err(DispatchError::ListenerPanicked)
        );
        assert_eq!(dispatcher.fire_selection(event), Ok(()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(ui.is_running());
    }
}
