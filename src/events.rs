//! Event types sent from the editor to the host
//!
//! These are the only way the editor talks back: the host stays the sole
//! writer of the canonical document and applies (or ignores) each event.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::document::{Connection, ConnectionId, Node, NodeId, Point};

/// Events emitted by the editor, each at most once per user gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CanvasEvent {
    /// A node was clicked into the selection
    NodeSelected { node: Node },

    /// A connection was clicked into the selection
    ConnectionSelected { connection: Connection },

    /// A node drag finished at `position`
    #[serde(rename_all = "camelCase")]
    NodeMoved { node_id: NodeId, position: Point },

    /// The user completed an authoring gesture
    ConnectionCreated { connection: Connection },

    /// The user asked to delete a connection
    #[serde(rename_all = "camelCase")]
    ConnectionDeleted { connection_id: ConnectionId },
}

impl CanvasEvent {
    pub fn node_moved(node_id: impl Into<NodeId>, position: Point) -> Self {
        Self::NodeMoved {
            node_id: node_id.into(),
            position,
        }
    }
}

/// Receiver for editor events
///
/// This abstracts over however the host consumes events (a UI framework
/// callback, a channel, a plain vector in tests).
pub trait EventSink {
    fn send(&mut self, event: CanvasEvent);
}

impl EventSink for Vec<CanvasEvent> {
    fn send(&mut self, event: CanvasEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Rc<RefCell<S>> {
    fn send(&mut self, event: CanvasEvent) {
        self.borrow_mut().send(event);
    }
}

/// Adapts a closure into an [`EventSink`]
pub struct FnSink<F>(pub F);

impl<F> EventSink for FnSink<F>
where
    F: FnMut(CanvasEvent),
{
    fn send(&mut self, event: CanvasEvent) {
        (self.0)(event);
    }
}
