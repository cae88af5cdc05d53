//! # Workflow Canvas
//!
//! The interaction core of a visual workflow editor: a pannable, zoomable
//! canvas of typed nodes joined by curved connections.
//!
//! The host owns the canonical [`GraphDocument`]. The canvas keeps an
//! optimistic working copy, turns pointer and keyboard input into gestures
//! and reports their outcome as [`CanvasEvent`]s. It never writes back to the
//! host's data directly.
//!
//! ## Features
//!
//! - **Backend-Agnostic Input** - Abstract [`PointerEvent`]s with optional
//!   backend-resolved targets
//! - **Explicit Viewport** - Every geometry and hit-test function receives
//!   the [`Viewport`] it works in
//! - **Incremental Routing** - Dragging a node recomputes only its incident
//!   connections
//! - **Pluggable Validation** - Compose [`ConnectionValidator`]s to decide
//!   which connections may be authored
//! - **Optional** `layout` (Sugiyama auto-arrange) and `slint` (model sync)
//!   features
//!
//! ## Quick Start
//!
//! ```
//! use workflow_canvas::{CanvasController, CanvasEvent, GraphDocument, PointerEvent};
//!
//! let json = r#"{
//!     "nodes": [
//!         {"id": "n1", "type": "input", "label": "Input", "position": {"x": 0, "y": 0}},
//!         {"id": "n2", "type": "llm", "label": "Summarize", "position": {"x": 200, "y": 0}}
//!     ],
//!     "connections": []
//! }"#;
//!
//! let mut canvas = CanvasController::new();
//! canvas.set_document(GraphDocument::from_json(json).unwrap());
//!
//! canvas.handle_pointer(PointerEvent::down(0.0, 0.0));
//! canvas.handle_pointer(PointerEvent::move_to(30.0, -10.0));
//! let event = canvas.handle_pointer(PointerEvent::up(30.0, -10.0));
//!
//! assert!(matches!(event, Some(CanvasEvent::NodeMoved { .. })));
//! ```
//!
//! ## Building Blocks
//!
//! - [`ViewportController`] - Pan and anchored zoom within configured limits
//! - [`NodeDragController`] - One node drag at a time, reported once on release
//! - [`ConnectionAuthoring`] - The press-output, press-input state machine
//! - [`ConnectionRouter`] - Cached connection curves and the invalidation set
//! - [`SelectionManager`] - Single node or connection selection
//! - [`hit_test`] - Screen point to [`PointerTarget`]

pub mod authoring;
pub mod config;
pub mod controller;
pub mod document;
pub mod drag;
pub mod error;
pub mod events;
pub mod geometry;
pub mod hit_test;
pub mod input;
#[cfg(feature = "layout")]
pub mod layout;
pub mod path;
pub mod routing;
pub mod selection;
#[cfg(feature = "slint")]
pub mod slint_bridge;
pub mod validation;
pub mod viewport;

pub use authoring::{AuthoringState, ConnectionAuthoring};
pub use config::CanvasConfig;
pub use controller::CanvasController;
pub use document::{
    Connection, ConnectionId, ConnectionKey, DocumentIssue, GraphDocument, HandleId, Node,
    NodeId, NodeKind, Point, ValidationReport, Viewport,
};
pub use drag::NodeDragController;
pub use error::{DocumentError, Result};
pub use events::{CanvasEvent, EventSink, FnSink};
pub use geometry::{ConnectionGeometry, PortSide, Rect};
pub use hit_test::{find_connection_at, find_node_at, find_port_at};
pub use input::{Key, PointerEvent, PointerTarget};
#[cfg(feature = "layout")]
pub use layout::{arrange, Direction, LayoutConfig};
pub use path::CubicBezier;
pub use routing::{ConnectionRouter, Invalidation};
pub use selection::{SelectedEntity, SelectionChange, SelectionManager};
#[cfg(feature = "slint")]
pub use slint_bridge::SlintBridge;
pub use validation::{
    BasicConnectionValidator, CompositeValidator, ConnectionValidator, NoDuplicatesValidator,
    ValidationError, ValidationResult,
};
pub use viewport::ViewportController;
