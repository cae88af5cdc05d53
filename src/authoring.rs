//! Connection authoring: press an output port, then an input port.
//!
//! The machine has two states. While `Connecting` it remembers the anchored
//! output port and the pointer's last document position so a rubber-band
//! preview can be drawn.

use crate::document::{Connection, ConnectionId, GraphDocument, HandleId, NodeId, Point};
use crate::geometry::ConnectionGeometry;
use crate::path::CubicBezier;
use crate::validation::{ConnectionValidator, ValidationResult};

const CONNECTION_ID_PREFIX: &str = "conn-";

/// Current authoring state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthoringState {
    #[default]
    Idle,
    Connecting {
        from_node_id: NodeId,
        from_handle: Option<HandleId>,
    },
}

/// Drives the press-output → press-input gesture
#[derive(Debug, Default)]
pub struct ConnectionAuthoring {
    state: AuthoringState,
    pointer: Option<Point>,
    next_id: u64,
}

impl ConnectionAuthoring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AuthoringState {
        &self.state
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.state, AuthoringState::Connecting { .. })
    }

    /// Anchor a connection on an output port.
    ///
    /// While already connecting this re-anchors, including on the port that
    /// is already anchored.
    pub fn press_output_port(&mut self, node_id: &str, handle: Option<&str>) {
        if let AuthoringState::Connecting { from_node_id, .. } = &self.state {
            log::debug!("re-anchoring connection from '{}' to '{}'", from_node_id, node_id);
        }
        self.state = AuthoringState::Connecting {
            from_node_id: node_id.to_string(),
            from_handle: handle.map(str::to_string),
        };
        self.pointer = None;
    }

    /// Complete (or reject) the gesture on an input port.
    ///
    /// Always ends in `Idle`. Returns the new connection when `validator`
    /// accepts it; the caller is responsible for inserting it.
    pub fn press_input_port(
        &mut self,
        doc: &GraphDocument,
        validator: &dyn ConnectionValidator,
        node_id: &str,
        handle: Option<&str>,
    ) -> Option<Connection> {
        let AuthoringState::Connecting {
            from_node_id,
            from_handle,
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };
        self.pointer = None;

        let mut candidate = Connection::new(String::new(), from_node_id, node_id)
            .with_handles(from_handle, handle.map(str::to_string));

        match validator.validate(&candidate, doc) {
            ValidationResult::Valid => {
                candidate.id = self.fresh_id(doc);
                Some(candidate)
            }
            ValidationResult::Invalid(reason) => {
                log::debug!(
                    "rejected connection {} -> {}: {}",
                    candidate.source,
                    candidate.target,
                    reason
                );
                None
            }
        }
    }

    /// Clicking empty canvas abandons the gesture
    pub fn press_background(&mut self) {
        self.cancel();
    }

    pub fn cancel(&mut self) {
        self.state = AuthoringState::Idle;
        self.pointer = None;
    }

    /// Record the pointer's document position for the preview curve
    pub fn update_pointer(&mut self, document_point: Point) {
        if self.is_connecting() {
            self.pointer = Some(document_point);
        }
    }

    /// Rubber-band curve from the anchored output port to the pointer.
    ///
    /// `None` when idle, before the pointer has moved, or when the anchor node
    /// has been removed.
    pub fn preview_curve(&self, doc: &GraphDocument, geometry: &ConnectionGeometry) -> Option<CubicBezier> {
        let AuthoringState::Connecting { from_node_id, .. } = &self.state else {
            return None;
        };
        let source = doc.node(from_node_id)?;
        Some(geometry.curve_to_point(source, self.pointer?))
    }

    /// Drop the anchor if its node no longer exists
    pub fn reconcile(&mut self, doc: &GraphDocument) {
        if let AuthoringState::Connecting { from_node_id, .. } = &self.state {
            if !doc.contains_node(from_node_id) {
                log::debug!("anchor node '{}' vanished; cancelling connection", from_node_id);
                self.cancel();
            }
        }
    }

    fn fresh_id(&mut self, doc: &GraphDocument) -> ConnectionId {
        loop {
            self.next_id += 1;
            let id = format!("{}{}", CONNECTION_ID_PREFIX, self.next_id);
            if !doc.contains_connection(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Node, NodeKind};
    use crate::validation::CompositeValidator;

    fn doc() -> GraphDocument {
        GraphDocument::new(
            vec![
                Node::new("n1", NodeKind::Input, "In", Point::new(0.0, 0.0)),
                Node::new("n2", NodeKind::Output, "Out", Point::new(200.0, 0.0)),
                Node::new("n3", NodeKind::Llm, "LLM", Point::new(400.0, 0.0)),
            ],
            vec![],
        )
    }

    fn connecting(node: &str) -> AuthoringState {
        AuthoringState::Connecting {
            from_node_id: node.to_string(),
            from_handle: None,
        }
    }

    // ========================================================================
    // press_output_port()
    // ========================================================================

    #[test]
    fn test_output_port_starts_connecting() {
        let mut authoring = ConnectionAuthoring::new();
        authoring.press_output_port("n1", None);
        assert_eq!(authoring.state(), &connecting("n1"));
    }

    #[test]
    fn test_other_output_port_reanchors() {
        let mut authoring = ConnectionAuthoring::new();
        authoring.press_output_port("n1", None);
        authoring.press_output_port("n3", Some("out"));
        assert_eq!(
            authoring.state(),
            &AuthoringState::Connecting {
                from_node_id: "n3".into(),
                from_handle: Some("out".into()),
            }
        );
    }

    #[test]
    fn test_same_output_port_stays_anchored() {
        let mut authoring = ConnectionAuthoring::new();
        authoring.press_output_port("n1", None);
        authoring.press_output_port("n1", None);
        assert_eq!(authoring.state(), &connecting("n1"));
    }

    // ========================================================================
    // press_input_port()
    // ========================================================================

    #[test]
    fn test_input_port_creates_connection() {
        let doc = doc();
        let validator = CompositeValidator::standard();
        let mut authoring = ConnectionAuthoring::new();

        authoring.press_output_port("n1", None);
        let connection = authoring
            .press_input_port(&doc, &validator, "n2", None)
            .expect("connection");

        assert_eq!(connection.source, "n1");
        assert_eq!(connection.target, "n2");
        assert_eq!(connection.id, "conn-1");
        assert_eq!(authoring.state(), &AuthoringState::Idle);
    }

    #[test]
    fn test_input_port_keeps_handles() {
        let doc = doc();
        let validator = CompositeValidator::standard();
        let mut authoring = ConnectionAuthoring::new();

        authoring.press_output_port("n1", Some("result"));
        let connection = authoring
            .press_input_port(&doc, &validator, "n3", Some("prompt"))
            .unwrap();

        assert_eq!(connection.source_handle.as_deref(), Some("result"));
        assert_eq!(connection.target_handle.as_deref(), Some("prompt"));
    }

    #[test]
    fn test_self_connection_rejected() {
        let doc = doc();
        let validator = CompositeValidator::standard();
        let mut authoring = ConnectionAuthoring::new();

        authoring.press_output_port("n1", None);
        assert!(authoring.press_input_port(&doc, &validator, "n1", None).is_none());
        assert_eq!(authoring.state(), &AuthoringState::Idle);
    }

    #[test]
    fn test_duplicate_connection_rejected() {
        let mut doc = doc();
        doc.connections.push(Connection::new("c1", "n1", "n2"));
        let validator = CompositeValidator::standard();
        let mut authoring = ConnectionAuthoring::new();

        authoring.press_output_port("n1", None);
        assert!(authoring.press_input_port(&doc, &validator, "n2", None).is_none());
        assert!(!authoring.is_connecting());
    }

    #[test]
    fn test_input_port_while_idle_is_noop() {
        let doc = doc();
        let validator = CompositeValidator::standard();
        let mut authoring = ConnectionAuthoring::new();
        assert!(authoring.press_input_port(&doc, &validator, "n2", None).is_none());
        assert_eq!(authoring.state(), &AuthoringState::Idle);
    }

    #[test]
    fn test_fresh_ids_skip_existing() {
        let mut doc = doc();
        doc.connections.push(Connection::new("conn-1", "n2", "n3"));
        doc.connections.push(Connection::new("conn-2", "n3", "n1"));
        let validator = CompositeValidator::standard();
        let mut authoring = ConnectionAuthoring::new();

        authoring.press_output_port("n1", None);
        let connection = authoring.press_input_port(&doc, &validator, "n2", None).unwrap();
        assert_eq!(connection.id, "conn-3");
    }

    // ========================================================================
    // cancel() / press_background() / preview
    // ========================================================================

    #[test]
    fn test_background_press_cancels() {
        let mut authoring = ConnectionAuthoring::new();
        authoring.press_output_port("n1", None);
        authoring.press_background();
        assert_eq!(authoring.state(), &AuthoringState::Idle);

        // Idempotent
        authoring.press_background();
        assert_eq!(authoring.state(), &AuthoringState::Idle);
    }

    #[test]
    fn test_preview_follows_pointer() {
        let doc = doc();
        let geometry = ConnectionGeometry::default();
        let mut authoring = ConnectionAuthoring::new();

        authoring.update_pointer(Point::new(10.0, 10.0));
        assert!(authoring.preview_curve(&doc, &geometry).is_none());

        authoring.press_output_port("n1", None);
        assert!(authoring.preview_curve(&doc, &geometry).is_none());

        authoring.update_pointer(Point::new(300.0, 80.0));
        let curve = authoring.preview_curve(&doc, &geometry).unwrap();
        assert_eq!(curve.start(), Point::new(75.0, 0.0));
        assert_eq!(curve.end(), Point::new(300.0, 80.0));

        authoring.cancel();
        assert!(authoring.preview_curve(&doc, &geometry).is_none());
    }

    #[test]
    fn test_reconcile_drops_vanished_anchor() {
        let mut doc = doc();
        let mut authoring = ConnectionAuthoring::new();
        authoring.press_output_port("n1", None);

        authoring.reconcile(&doc);
        assert!(authoring.is_connecting());

        doc.nodes.retain(|n| n.id != "n1");
        authoring.reconcile(&doc);
        assert!(!authoring.is_connecting());
    }
}
