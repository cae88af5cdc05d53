//! Pointer drags → node position updates.
//!
//! Intermediate frames only touch the working document; the host hears
//! about the drag once, from [`NodeDragController::end_drag`].

use crate::document::{GraphDocument, NodeId, Point, Viewport};
use crate::events::CanvasEvent;
use crate::viewport::screen_delta_to_document;

#[derive(Debug, Clone, PartialEq)]
struct ActiveDrag {
    node_id: NodeId,
    start_position: Point,
    start_pointer: Point,
    /// Cumulative document-space delta
    delta: Point,
}

/// Tracks the single active node drag
#[derive(Debug, Default)]
pub struct NodeDragController {
    active: Option<ActiveDrag>,
}

impl NodeDragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging `node_id`.
    ///
    /// Returns `false` (and changes nothing) while another drag is active or
    /// when the node does not exist.
    pub fn begin_drag(&mut self, doc: &GraphDocument, node_id: &str, pointer: Point) -> bool {
        if let Some(active) = &self.active {
            log::debug!(
                "ignoring drag of '{}' while '{}' is being dragged",
                node_id,
                active.node_id
            );
            return false;
        }
        let Some(node) = doc.node(node_id) else {
            return false;
        };
        self.active = Some(ActiveDrag {
            node_id: node.id.clone(),
            start_position: node.position,
            start_pointer: pointer,
            delta: Point::ORIGIN,
        });
        true
    }

    /// Apply a screen-space pointer delta to the dragged node.
    ///
    /// Writes `start + cumulative delta` into the working document and
    /// returns the dragged node's id so the caller can recompute its
    /// incident connections. `None` when nothing is being dragged or the
    /// node has been removed.
    pub fn update_drag(
        &mut self,
        doc: &mut GraphDocument,
        viewport: &Viewport,
        pointer_delta: Point,
    ) -> Option<&str> {
        let active = self.active.as_mut()?;
        let node = doc.node_mut(&active.node_id)?;

        active.delta = active.delta + screen_delta_to_document(viewport, pointer_delta);
        node.position = active.start_position + active.delta;
        log::trace!("drag '{}' -> ({}, {})", active.node_id, node.position.x, node.position.y);

        Some(active.node_id.as_str())
    }

    /// Finish the drag and report the final position.
    ///
    /// Returns no event if the node disappeared during the drag.
    pub fn end_drag(&mut self, doc: &GraphDocument) -> Option<CanvasEvent> {
        let active = self.active.take()?;
        let Some(node) = doc.node(&active.node_id) else {
            log::debug!("dragged node '{}' vanished; dropping drag", active.node_id);
            return None;
        };
        Some(CanvasEvent::node_moved(active.node_id, node.position))
    }

    /// Abandon the drag and put the node back where it started.
    ///
    /// Returns the node id if a position was restored.
    pub fn cancel_drag(&mut self, doc: &mut GraphDocument) -> Option<NodeId> {
        let active = self.active.take()?;
        let node = doc.node_mut(&active.node_id)?;
        node.position = active.start_position;
        Some(active.node_id)
    }

    /// Drop the drag without touching the document
    pub fn forget(&mut self) {
        self.active = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn dragged_node_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.node_id.as_str())
    }

    /// Where the pointer was pressed
    pub fn start_pointer(&self) -> Option<Point> {
        self.active.as_ref().map(|a| a.start_pointer)
    }

    /// Cumulative document-space delta of the active drag
    pub fn delta(&self) -> Option<Point> {
        self.active.as_ref().map(|a| a.delta)
    }
}
