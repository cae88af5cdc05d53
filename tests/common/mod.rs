//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use workflow_canvas::{
    CanvasController, CanvasEvent, Connection, GraphDocument, Node, NodeKind, Point, PointerEvent,
    PointerTarget,
};

/// Records every event delivered to the controller's sink.
#[derive(Default, Clone)]
pub struct EventRecorder {
    pub events: Rc<RefCell<Vec<CanvasEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<CanvasEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn node_moved(&self) -> Vec<(String, Point)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                CanvasEvent::NodeMoved { node_id, position } => Some((node_id.clone(), *position)),
                _ => None,
            })
            .collect()
    }

    pub fn connections_created(&self) -> Vec<Connection> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                CanvasEvent::ConnectionCreated { connection } => Some(connection.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn connections_deleted(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                CanvasEvent::ConnectionDeleted { connection_id } => Some(connection_id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn selected_nodes(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                CanvasEvent::NodeSelected { node } => Some(node.id.clone()),
                _ => None,
            })
            .collect()
    }
}

/// n1 (input) at the origin, n2 (output) at (200, 0)
pub fn two_node_document() -> GraphDocument {
    GraphDocument::new(
        vec![
            Node::new("n1", NodeKind::Input, "Input", Point::new(0.0, 0.0)),
            Node::new("n2", NodeKind::Output, "Output", Point::new(200.0, 0.0)),
        ],
        vec![],
    )
}

/// A controller over `doc` with an [`EventRecorder`] installed as sink
pub struct CanvasHarness {
    pub canvas: CanvasController,
    pub recorder: EventRecorder,
}

impl CanvasHarness {
    pub fn new() -> Self {
        Self::with_document(two_node_document())
    }

    pub fn with_document(doc: GraphDocument) -> Self {
        let recorder = EventRecorder::new();
        let mut canvas = CanvasController::new();
        canvas.set_event_sink(recorder.events.clone());
        canvas.set_document(doc);
        Self { canvas, recorder }
    }

    /// Press, move in `steps` equal frames, release
    pub fn drag(&mut self, from: Point, to: Point, steps: usize) -> Option<CanvasEvent> {
        self.canvas.handle_pointer(PointerEvent::down(from.x, from.y));
        for i in 1..=steps {
            let x = from.x + (to.x - from.x) * i as f64 / steps as f64;
            let y = from.y + (to.y - from.y) * i as f64 / steps as f64;
            self.canvas.handle_pointer(PointerEvent::move_to(x, y));
        }
        self.canvas.handle_pointer(PointerEvent::up(to.x, to.y))
    }

    /// Press `target` at the origin without hit testing
    pub fn press(&mut self, target: PointerTarget) -> Option<CanvasEvent> {
        self.canvas
            .handle_pointer(PointerEvent::down_on(0.0, 0.0, target))
    }

    /// Author a connection from `source`'s output port to `target`'s input port
    pub fn connect(&mut self, source: &str, target: &str) -> Option<CanvasEvent> {
        self.press(PointerTarget::output(source));
        self.press(PointerTarget::input(target))
    }

    pub fn position(&self, node_id: &str) -> Point {
        self.canvas
            .document()
            .node(node_id)
            .map(|n| n.position)
            .unwrap_or_else(|| panic!("node {node_id} not in document"))
    }
}
