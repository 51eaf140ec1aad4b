//! LWUIT: a lightweight widget toolkit core.
//!
//! The pieces a widget toolkit is built on, without any widgets or native
//! backend:
//! - Layout managers (border, box, flow, grid, coordinate, table) with RTL
//!   mirroring
//! - Time-based motion for animation
//! - An event dispatcher that delivers on a single UI thread
//! - Animated transitions composited into offscreen images
//!
//! # Architecture
//!
//! A [`Container`] owns its children and one [`Layout`]. Layouts never hold
//! components; they keep per-child constraints keyed by [`ComponentId`] and
//! assign bounds when the container is laid out. Transitions paint
//! [`Surface`]s into a [`Graphics`] backed by an `image::RgbaImage`.
//!
//! # Usage
//!
//! ```
//! use lwuit::{BorderLayout, BorderRegion, Component, Container, Rect};
//!
//! let mut form = Container::new(BorderLayout::new());
//! let title = form.add_with(BorderRegion::North, Component::sized(100, 20)).unwrap();
//! form.add_with(BorderRegion::Center, Component::sized(100, 100)).unwrap();
//! form.set_bounds(Rect::new(0, 0, 240, 320));
//! form.layout_container();
//!
//! assert_eq!(form.child(title).unwrap().bounds(), Rect::new(0, 0, 240, 20));
//! ```

// Core primitives
pub mod error;
pub mod primitives;

// Configuration
pub mod config;

// Components and layout
pub mod component;
pub mod layout;

// Animation
pub mod motion;

// Events
pub mod event;

// Rendering
pub mod graphics;
pub mod transition;

// Re-export core types
pub use component::{Component, ComponentId, Container, LayoutChild, LayoutParent};
pub use config::{TableDefaults, ToolkitConfig};
pub use error::{ConfigError, DispatchError, LayoutError};
pub use event::{
    ActionEvent, DataChange, DataChangedEvent, Event, EventDispatcher, FocusEvent,
    InlineExecutor, ListenerId, SelectionEvent, StyleEvent, UiExecutor, UiThread,
};
pub use graphics::Graphics;
pub use layout::{
    Axis, BorderLayout, BorderRegion, BoxLayout, Constraint, CoordinateLayout, FlowLayout,
    GridLayout, HAlign, Layout, LayoutManager, TableConstraint, TableLayout, VAlign,
};
pub use motion::{Clock, MAX_FRICTION_SECONDS, ManualClock, Motion, MotionStyle, SystemClock};
pub use primitives::{Color, Insets, Point, Rect, Size};
pub use transition::{
    CommonTransition, DialogRegions, SlideOrientation, Surface, Transition, TransitionKind,
    TransitionPhase,
};
