//! Connection curve cache with targeted recompute.
//!
//! [`ConnectionRouter`] keeps one computed curve per connection. Moving a
//! node recomputes only the connections touching it and records what changed
//! in an [`Invalidation`] set, so a renderer can redraw just the affected
//! node and its incident connections.
//!
//! # Example
//!
//! ```
//! use workflow_canvas::{ConnectionRouter, GraphDocument, Node, NodeKind, Connection, Point};
//!
//! let mut doc = GraphDocument::new(
//!     vec![
//!         Node::new("a", NodeKind::Input, "A", Point::new(0.0, 0.0)),
//!         Node::new("b", NodeKind::Output, "B", Point::new(300.0, 0.0)),
//!     ],
//!     vec![Connection::new("c", "a", "b")],
//! );
//! let mut router = ConnectionRouter::default();
//! router.rebuild(&doc);
//!
//! doc.node_mut("b").unwrap().position = Point::new(300.0, 120.0);
//! router.recompute_for_node(&doc, "b");
//!
//! let dirty = router.take_invalidation();
//! assert!(dirty.connections.contains("c"));
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::document::{Connection, ConnectionId, GraphDocument, NodeId};
use crate::geometry::ConnectionGeometry;
use crate::path::CubicBezier;

/// Ids whose rendering changed since the last drain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invalidation {
    /// Everything must be redrawn (document replaced, viewport changed)
    pub full: bool,
    pub nodes: BTreeSet<NodeId>,
    pub connections: BTreeSet<ConnectionId>,
}

impl Invalidation {
    pub fn is_empty(&self) -> bool {
        !self.full && self.nodes.is_empty() && self.connections.is_empty()
    }
}

/// Caches connection curves in document space
#[derive(Debug, Clone, Default)]
pub struct ConnectionRouter {
    geometry: ConnectionGeometry,
    curves: HashMap<ConnectionId, CubicBezier>,
    invalidation: Invalidation,
}

impl ConnectionRouter {
    pub fn new(geometry: ConnectionGeometry) -> Self {
        Self {
            geometry,
            curves: HashMap::new(),
            invalidation: Invalidation::default(),
        }
    }

    pub fn geometry(&self) -> &ConnectionGeometry {
        &self.geometry
    }

    /// Recompute every curve.
    ///
    /// Call this whenever the host re-supplies the document.
    pub fn rebuild(&mut self, doc: &GraphDocument) {
        self.curves.clear();
        for connection in &doc.connections {
            self.route(doc, connection);
        }
        self.invalidate_all();
    }

    /// Recompute the curves of every connection touching `node_id`.
    ///
    /// Returns the ids of the recomputed connections.
    pub fn recompute_for_node(&mut self, doc: &GraphDocument, node_id: &str) -> Vec<ConnectionId> {
        let touched: Vec<&Connection> = doc.connections_touching(node_id).collect();
        let mut ids = Vec::with_capacity(touched.len());
        for connection in touched {
            self.route(doc, connection);
            self.invalidation.connections.insert(connection.id.clone());
            ids.push(connection.id.clone());
        }
        self.invalidation.nodes.insert(node_id.to_string());
        ids
    }

    /// Route a newly added connection
    pub fn insert(&mut self, doc: &GraphDocument, connection: &Connection) {
        self.route(doc, connection);
        self.invalidation.connections.insert(connection.id.clone());
    }

    /// Forget a removed connection
    pub fn remove(&mut self, id: &str) {
        self.curves.remove(id);
        self.invalidation.connections.insert(id.to_string());
    }

    /// The cached curve, `None` when an endpoint node is missing
    pub fn curve(&self, id: &str) -> Option<&CubicBezier> {
        self.curves.get(id)
    }

    /// Number of routable connections
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Mark everything dirty
    pub fn invalidate_all(&mut self) {
        self.invalidation.full = true;
    }

    /// Mark a single node dirty (selection highlight, label change)
    pub fn invalidate_node(&mut self, node_id: &str) {
        self.invalidation.nodes.insert(node_id.to_string());
    }

    pub fn invalidate_connection(&mut self, id: &str) {
        self.invalidation.connections.insert(id.to_string());
    }

    /// Drain the invalidation set
    pub fn take_invalidation(&mut self) -> Invalidation {
        std::mem::take(&mut self.invalidation)
    }

    fn route(&mut self, doc: &GraphDocument, connection: &Connection) {
        match self.geometry.connection_curve(doc, connection) {
            Some(curve) => {
                self.curves.insert(connection.id.clone(), curve);
            }
            None => {
                log::debug!(
                    "connection '{}' has a missing endpoint; skipping its path",
                    connection.id
                );
                self.curves.remove(&connection.id);
            }
        }
    }
}
