//! Abstract pointer and keyboard input.
//!
//! Rendering backends translate their native events into these types. A
//! backend that already knows what is under the pointer passes it as
//! `target`; otherwise it leaves `target` as `None` and the controller
//! resolves it with the built-in hit test.

use crate::document::{ConnectionId, HandleId, NodeId, Point};

/// What a pointer press landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty canvas
    Background,
    /// The body of a node (anything that is not a port)
    NodeBody(NodeId),
    /// A node's output port
    OutputPort {
        node_id: NodeId,
        handle: Option<HandleId>,
    },
    /// A node's input port
    InputPort {
        node_id: NodeId,
        handle: Option<HandleId>,
    },
    /// A connection curve
    Connection(ConnectionId),
}

impl PointerTarget {
    pub fn output(node_id: impl Into<NodeId>) -> Self {
        Self::OutputPort {
            node_id: node_id.into(),
            handle: None,
        }
    }

    pub fn input(node_id: impl Into<NodeId>) -> Self {
        Self::InputPort {
            node_id: node_id.into(),
            handle: None,
        }
    }

    pub fn node(node_id: impl Into<NodeId>) -> Self {
        Self::NodeBody(node_id.into())
    }
}

/// Pointer events in screen space
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Down {
        position: Point,
        target: Option<PointerTarget>,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
    DoubleClick {
        position: Point,
        target: Option<PointerTarget>,
    },
    /// Scroll wheel; positive `delta_y` scrolls down (zooms out)
    Wheel {
        position: Point,
        delta_y: f64,
    },
    /// The pointer left the interactive surface
    Leave,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self::Down {
            position: Point::new(x, y),
            target: None,
        }
    }

    pub fn down_on(x: f64, y: f64, target: PointerTarget) -> Self {
        Self::Down {
            position: Point::new(x, y),
            target: Some(target),
        }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Self::Move {
            position: Point::new(x, y),
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::Up {
            position: Point::new(x, y),
        }
    }
}

/// Keyboard commands the editor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    ZoomIn,
    ZoomOut,
    ResetView,
}
