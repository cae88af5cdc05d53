//! High-level controller for workflow canvas applications.
//!
//! The [`CanvasController`] ties the viewport, drag, authoring and selection
//! state machines to one optimistic working copy of the host's document.
//! The host feeds it pointer and keyboard input and receives
//! [`CanvasEvent`]s back; it applies (or ignores) those events to its own
//! canonical document and re-supplies the result.
//!
//! # Example
//!
//! ```
//! use workflow_canvas::{CanvasController, CanvasEvent, GraphDocument, Node, NodeKind, Point, PointerEvent};
//!
//! let mut canvas = CanvasController::new();
//! canvas.set_document(GraphDocument::new(
//!     vec![
//!         Node::new("n1", NodeKind::Input, "Input", Point::new(0.0, 0.0)),
//!         Node::new("n2", NodeKind::Output, "Output", Point::new(200.0, 0.0)),
//!     ],
//!     vec![],
//! ));
//!
//! // Output port of n1, then input port of n2
//! canvas.handle_pointer(PointerEvent::down(75.0, 0.0));
//! let event = canvas.handle_pointer(PointerEvent::down(125.0, 0.0));
//!
//! match event {
//!     Some(CanvasEvent::ConnectionCreated { connection }) => {
//!         assert_eq!((connection.source.as_str(), connection.target.as_str()), ("n1", "n2"));
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use crate::authoring::ConnectionAuthoring;
use crate::config::CanvasConfig;
use crate::document::{Connection, GraphDocument, Node, NodeId, Point, Viewport};
use crate::drag::NodeDragController;
use crate::events::{CanvasEvent, EventSink};
use crate::geometry::{ConnectionGeometry, Rect};
use crate::hit_test;
use crate::input::{Key, PointerEvent, PointerTarget};
use crate::path::CubicBezier;
use crate::routing::{ConnectionRouter, Invalidation};
use crate::selection::{SelectedEntity, SelectionChange, SelectionManager};
use crate::validation::{CompositeValidator, ConnectionValidator};
use crate::viewport::ViewportController;

/// Pointer gesture in progress between a press and its release
#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    /// Pressed on a node body; becomes a drag once the pointer travels
    NodePress {
        node_id: NodeId,
        origin: Point,
        last: Point,
        moved: bool,
    },
    Pan {
        last: Point,
    },
}

/// Controller that owns the editor state and maps input to events.
///
/// This handles:
/// - The working copy of nodes, connections and viewport
/// - Connection routing with incremental invalidation
/// - Hit testing (unless the backend supplies targets)
/// - Drag, pan, zoom, authoring and selection gestures
///
/// All methods take `&mut self`; wrap it in `Rc<RefCell<_>>` to share it
/// across UI callbacks.
pub struct CanvasController {
    config: CanvasConfig,
    doc: GraphDocument,
    viewport: ViewportController,
    router: ConnectionRouter,
    drag: NodeDragController,
    authoring: ConnectionAuthoring,
    selection: SelectionManager,
    validator: Box<dyn ConnectionValidator>,
    sink: Option<Box<dyn EventSink>>,
    surface_size: (f64, f64),
    gesture: Gesture,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasController {
    /// Create a controller with default settings.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            config,
            doc: GraphDocument::default(),
            viewport: ViewportController::new(&config),
            router: ConnectionRouter::new(ConnectionGeometry::new(&config)),
            drag: NodeDragController::new(),
            authoring: ConnectionAuthoring::new(),
            selection: SelectionManager::new(),
            validator: Box::new(CompositeValidator::standard()),
            sink: None,
            surface_size: (0.0, 0.0),
            gesture: Gesture::Idle,
        }
    }

    /// Replace the connection rules (default: [`CompositeValidator::standard`]).
    pub fn with_validator(mut self, validator: impl ConnectionValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Deliver every event to `sink` in addition to returning it.
    pub fn set_event_sink(&mut self, sink: impl EventSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    // === Host inputs ===

    /// Replace the working copy, viewport included.
    pub fn set_document(&mut self, doc: GraphDocument) {
        let viewport = doc.viewport;
        self.doc = doc;
        self.viewport.set_viewport(viewport);
        self.doc.viewport = self.viewport.viewport();
        self.reconcile();
    }

    pub fn set_nodes(&mut self, nodes: Vec<Node>) {
        self.doc.nodes = nodes;
        self.reconcile();
    }

    pub fn set_connections(&mut self, connections: Vec<Connection>) {
        self.doc.connections = connections;
        self.reconcile();
    }

    /// Adopt the host's selection without emitting an event.
    ///
    /// The id is looked up among nodes first, then connections; an unknown
    /// id clears the selection.
    pub fn set_selected_id(&mut self, id: Option<&str>) {
        let entity = id.and_then(|id| self.entity_for_id(id));
        if id.is_some() && entity.is_none() {
            log::debug!("selected id {:?} is not in the document; clearing selection", id);
        }
        self.invalidate_selection();
        self.selection.set_selected(entity);
        self.invalidate_selection();
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport.set_viewport(viewport);
        self.sync_viewport();
    }

    /// Size of the drawing surface in screen pixels, used to anchor the
    /// zoom commands on its centre.
    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.surface_size = (width.max(0.0), height.max(0.0));
    }

    // === Commands ===

    /// Zoom in one step around the centre of the surface.
    ///
    /// Until [`set_surface_size`](Self::set_surface_size) is called the
    /// surface is empty and the anchor is the screen origin.
    pub fn zoom_in(&mut self) {
        self.viewport.zoom_by(self.config.zoom_in_factor, self.surface_centre());
        self.sync_viewport();
    }

    /// Zoom out one step, anchored like [`zoom_in`](Self::zoom_in).
    pub fn zoom_out(&mut self) {
        self.viewport.zoom_by(self.config.zoom_out_factor, self.surface_centre());
        self.sync_viewport();
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
        self.sync_viewport();
    }

    /// Abandon every gesture in progress.
    ///
    /// A drag in progress puts its node back where it started.
    pub fn cancel_gestures(&mut self) {
        if let Some(node_id) = self.drag.cancel_drag(&mut self.doc) {
            self.router.recompute_for_node(&self.doc, &node_id);
        }
        self.authoring.cancel();
        self.gesture = Gesture::Idle;
    }

    /// Request deletion of a connection.
    ///
    /// The working copy drops it immediately; an unknown id is a no-op.
    pub fn delete_connection(&mut self, id: &str) -> Option<CanvasEvent> {
        let removed = self.doc.remove_connection(id)?;
        self.router.remove(&removed.id);
        if self.selection.selected_connection() == Some(id) {
            self.selection.clear();
        }
        self.emit(CanvasEvent::ConnectionDeleted {
            connection_id: removed.id,
        })
    }

    // === Input ===

    /// Handle a pointer event, returning the event it produced, if any.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<CanvasEvent> {
        match event {
            PointerEvent::Down { position, target } => {
                let target = target.unwrap_or_else(|| self.resolve(position));
                self.pointer_down(position, target)
            }
            PointerEvent::Move { position } => {
                self.pointer_move(position);
                None
            }
            PointerEvent::Up { position } => self.pointer_up(position),
            PointerEvent::DoubleClick { position, target } => {
                let target = target.unwrap_or_else(|| self.resolve(position));
                match target {
                    PointerTarget::Connection(id) => self.delete_connection(&id),
                    _ => None,
                }
            }
            PointerEvent::Wheel { position, delta_y } => {
                let factor = 2f64.powf(-delta_y * self.config.wheel_sensitivity);
                self.viewport.zoom_by(factor, position);
                self.sync_viewport();
                None
            }
            PointerEvent::Leave => {
                self.cancel_gestures();
                None
            }
        }
    }

    /// Handle a keyboard command.
    pub fn handle_key(&mut self, key: Key) -> Option<CanvasEvent> {
        match key {
            Key::Delete | Key::Backspace => {
                let id = self.selection.selected_connection()?.to_string();
                self.delete_connection(&id)
            }
            Key::Escape => {
                self.cancel_gestures();
                None
            }
            Key::ZoomIn => {
                self.zoom_in();
                None
            }
            Key::ZoomOut => {
                self.zoom_out();
                None
            }
            Key::ResetView => {
                self.reset_view();
                None
            }
        }
    }

    fn pointer_down(&mut self, position: Point, target: PointerTarget) -> Option<CanvasEvent> {
        if self.gesture != Gesture::Idle {
            log::debug!("ignoring press while another gesture is active");
            return None;
        }

        match target {
            PointerTarget::OutputPort { node_id, handle } => {
                if !self.doc.contains_node(&node_id) {
                    return None;
                }
                self.authoring.press_output_port(&node_id, handle.as_deref());
                self.authoring
                    .update_pointer(self.viewport.to_document_space(position));
                None
            }
            PointerTarget::InputPort { node_id, handle } => {
                let connection = self.authoring.press_input_port(
                    &self.doc,
                    self.validator.as_ref(),
                    &node_id,
                    handle.as_deref(),
                )?;
                self.router.insert(&self.doc, &connection);
                self.doc.connections.push(connection.clone());
                self.emit(CanvasEvent::ConnectionCreated { connection })
            }
            PointerTarget::NodeBody(node_id) => {
                if self.drag.begin_drag(&self.doc, &node_id, position) {
                    self.gesture = Gesture::NodePress {
                        node_id,
                        origin: position,
                        last: position,
                        moved: false,
                    };
                }
                None
            }
            PointerTarget::Connection(id) => self.select(SelectedEntity::Connection(id)),
            PointerTarget::Background => {
                self.authoring.press_background();
                self.gesture = Gesture::Pan { last: position };
                None
            }
        }
    }

    fn pointer_move(&mut self, position: Point) {
        let threshold = self.config.drag_threshold;
        match &mut self.gesture {
            Gesture::NodePress {
                origin, last, moved, ..
            } => {
                if !*moved && position.distance_sq(*origin) <= threshold * threshold {
                    return;
                }
                *moved = true;
                let delta = position - *last;
                *last = position;

                let viewport = self.viewport.viewport();
                if let Some(node_id) = self.drag.update_drag(&mut self.doc, &viewport, delta) {
                    self.router.recompute_for_node(&self.doc, node_id);
                }
            }
            Gesture::Pan { last } => {
                let delta = position - *last;
                *last = position;
                log::trace!("pan by ({}, {})", delta.x, delta.y);
                self.viewport.pan(delta.x, delta.y);
                self.sync_viewport();
            }
            Gesture::Idle => {
                if self.authoring.is_connecting() {
                    self.authoring
                        .update_pointer(self.viewport.to_document_space(position));
                }
            }
        }
    }

    fn pointer_up(&mut self, position: Point) -> Option<CanvasEvent> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::NodePress {
                node_id,
                last,
                moved,
                ..
            } => {
                if !moved {
                    self.drag.forget();
                    return self.select(SelectedEntity::Node(node_id));
                }
                if position != last {
                    let viewport = self.viewport.viewport();
                    if let Some(node_id) =
                        self.drag.update_drag(&mut self.doc, &viewport, position - last)
                    {
                        self.router.recompute_for_node(&self.doc, node_id);
                    }
                }
                let event = self.drag.end_drag(&self.doc)?;
                self.emit(event)
            }
            Gesture::Pan { .. } | Gesture::Idle => None,
        }
    }

    fn select(&mut self, entity: SelectedEntity) -> Option<CanvasEvent> {
        // Targets supplied by a backend may be stale
        if !self.entity_exists(&entity) {
            return None;
        }

        self.invalidate_selection();
        let change = self.selection.select(entity);
        self.invalidate_selection();

        match change? {
            SelectionChange::Selected(SelectedEntity::Node(id)) => {
                let node = self.doc.node(&id)?.clone();
                self.emit(CanvasEvent::NodeSelected { node })
            }
            SelectionChange::Selected(SelectedEntity::Connection(id)) => {
                let connection = self.doc.connection(&id)?.clone();
                self.emit(CanvasEvent::ConnectionSelected { connection })
            }
        }
    }

    // === Render queries ===

    /// The working copy
    pub fn document(&self) -> &GraphDocument {
        &self.doc
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    /// Document-space curve of a connection, `None` for missing endpoints
    pub fn connection_curve(&self, id: &str) -> Option<&CubicBezier> {
        self.router.curve(id)
    }

    /// Screen-space SVG path of a connection
    pub fn connection_svg_path(&self, id: &str) -> Option<String> {
        let viewport = self.viewport.viewport();
        self.router
            .curve(id)
            .map(|curve| curve.to_screen(&viewport).to_svg_path())
    }

    /// Document-space rubber-band curve while authoring a connection
    pub fn preview_curve(&self) -> Option<CubicBezier> {
        self.authoring.preview_curve(&self.doc, self.router.geometry())
    }

    /// Screen-space SVG path of the rubber-band curve
    pub fn preview_svg_path(&self) -> Option<String> {
        let viewport = self.viewport.viewport();
        self.preview_curve()
            .map(|curve| curve.to_screen(&viewport).to_svg_path())
    }

    /// Screen-space footprint of a node
    pub fn node_screen_rect(&self, id: &str) -> Option<Rect> {
        let node = self.doc.node(id)?;
        let rect = self.router.geometry().node_rect(node);
        let top_left = self.viewport.to_screen_space(Point::new(rect.x, rect.y));
        let zoom = self.viewport.zoom();
        Some(Rect {
            x: top_left.x,
            y: top_left.y,
            width: rect.width * zoom,
            height: rect.height * zoom,
        })
    }

    /// What is under a screen point
    pub fn target_at(&self, screen_point: Point) -> PointerTarget {
        self.resolve(screen_point)
    }

    /// Drain the set of ids whose rendering changed
    pub fn take_invalidation(&mut self) -> Invalidation {
        self.router.take_invalidation()
    }

    pub fn is_connecting(&self) -> bool {
        self.authoring.is_connecting()
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Pan { .. })
    }

    pub fn dragged_node_id(&self) -> Option<&str> {
        self.drag.dragged_node_id()
    }

    pub fn selected(&self) -> Option<&SelectedEntity> {
        self.selection.selected()
    }

    // === Layout ===

    /// Lay out the working copy and report every node that moved.
    #[cfg(feature = "layout")]
    pub fn auto_arrange(&mut self, config: &crate::layout::LayoutConfig) -> Vec<CanvasEvent> {
        self.cancel_gestures();
        let mut events = Vec::new();
        for (node_id, position) in crate::layout::arrange(&self.doc, config) {
            let Some(node) = self.doc.node_mut(&node_id) else {
                continue;
            };
            if node.position == position {
                continue;
            }
            node.position = position;
            self.router.recompute_for_node(&self.doc, &node_id);
            events.extend(self.emit(CanvasEvent::node_moved(node_id, position)));
        }
        events
    }

    // === Internals ===

    fn resolve(&self, screen_point: Point) -> PointerTarget {
        hit_test::resolve(
            &self.doc,
            &self.viewport.viewport(),
            &self.router,
            &self.config,
            screen_point,
        )
    }

    fn emit(&mut self, event: CanvasEvent) -> Option<CanvasEvent> {
        if let Some(sink) = self.sink.as_mut() {
            sink.send(event.clone());
        }
        Some(event)
    }

    fn entity_for_id(&self, id: &str) -> Option<SelectedEntity> {
        if self.doc.contains_node(id) {
            Some(SelectedEntity::Node(id.to_string()))
        } else if self.doc.contains_connection(id) {
            Some(SelectedEntity::Connection(id.to_string()))
        } else {
            None
        }
    }

    fn entity_exists(&self, entity: &SelectedEntity) -> bool {
        match entity {
            SelectedEntity::Node(id) => self.doc.contains_node(id),
            SelectedEntity::Connection(id) => self.doc.contains_connection(id),
        }
    }

    fn invalidate_selection(&mut self) {
        match self.selection.selected() {
            Some(SelectedEntity::Node(id)) => self.router.invalidate_node(id),
            Some(SelectedEntity::Connection(id)) => self.router.invalidate_connection(id),
            None => {}
        }
    }

    fn sync_viewport(&mut self) {
        self.doc.viewport = self.viewport.viewport();
        self.router.invalidate_all();
    }

    fn surface_centre(&self) -> Point {
        Point::new(self.surface_size.0 * 0.5, self.surface_size.1 * 0.5)
    }

    /// Bring transient state in line with a re-supplied document.
    fn reconcile(&mut self) {
        if let Some(node_id) = self.drag.dragged_node_id() {
            if !self.doc.contains_node(node_id) {
                log::debug!("dragged node '{}' was removed; dropping drag", node_id);
                self.drag.forget();
                self.gesture = Gesture::Idle;
            }
        }
        self.authoring.reconcile(&self.doc);

        let stale = self
            .selection
            .selected()
            .is_some_and(|entity| !self.entity_exists(entity));
        if stale {
            self.selection.clear();
        }

        self.router.rebuild(&self.doc);
    }
}
