//! Toolkit error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::component::ComponentId;

/// Configuration errors raised synchronously by layouts and containers.
///
/// These are programmer errors: the call that produced one has left the
/// layout untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{layout} requires a constraint for component {id}")]
    MissingConstraint { layout: &'static str, id: ComponentId },

    #[error("invalid constraint for {layout}: {reason}")]
    InvalidConstraint { layout: &'static str, reason: String },

    #[error("border region {region:?} already holds component {occupant}")]
    RegionOccupied {
        region: crate::layout::BorderRegion,
        occupant: ComponentId,
    },

    #[error("table cell ({row}, {column}) is already occupied")]
    CellOccupied { row: usize, column: usize },

    #[error("table cell ({row}, {column}) is outside a {rows}x{columns} table")]
    CellOutOfRange {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    #[error("grid dimensions must be positive, got {rows}x{columns}")]
    InvalidGrid { rows: usize, columns: usize },

    #[error("component {0} is not a child of this container")]
    UnknownComponent(ComponentId),
}

/// Errors from marshalling an event onto the UI thread.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// Another thread is already blocked on this dispatcher's rendezvous.
    #[error("a marshalled dispatch is already in flight on this dispatcher")]
    Busy,

    /// The UI thread has shut down.
    #[error("the UI thread is no longer running")]
    Disconnected,

    /// A listener panicked on the UI thread. Later dispatches still run.
    #[error("an event listener panicked")]
    ListenerPanicked,
}

/// Errors loading a [`ToolkitConfig`](crate::config::ToolkitConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
