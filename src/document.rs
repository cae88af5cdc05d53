//! Graph document types
//!
//! These types define the plain data the host hands to the editor: typed,
//! positioned nodes, directed connections between their ports, and the
//! viewport transform. They carry no behaviour beyond lookups and the
//! structural validation report.

use std::collections::HashSet;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{DocumentError, Result};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for a connection
pub type ConnectionId = String;

/// Port discriminator for nodes with more than one port per side
pub type HandleId = String;

/// A 2D point or vector, used for both document and screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale both components
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Squared euclidean distance to another point
    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// The type tag of a node
///
/// The editor only uses the tag for display; it never interprets what a
/// given kind means for workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Workflow entry point
    Input,
    /// Workflow result
    Output,
    /// Language model step
    Llm,
    /// Invocation of a registered MCP tool
    McpTool,
    /// Data reshaping step
    Transform,
    /// Branching step
    Condition,
}

impl NodeKind {
    /// All kinds in palette order
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Input,
        NodeKind::Output,
        NodeKind::Llm,
        NodeKind::McpTool,
        NodeKind::Transform,
        NodeKind::Condition,
    ];

    /// The serialized tag (`"mcp-tool"` etc.)
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Input => "input",
            NodeKind::Output => "output",
            NodeKind::Llm => "llm",
            NodeKind::McpTool => "mcp-tool",
            NodeKind::Transform => "transform",
            NodeKind::Condition => "condition",
        }
    }

    /// Glyph shown in the node header
    pub fn icon(&self) -> &'static str {
        match self {
            NodeKind::Input | NodeKind::Output => "→",
            NodeKind::Llm => "🧠",
            NodeKind::McpTool => "⚙",
            NodeKind::Transform => "↻",
            NodeKind::Condition => "?",
        }
    }
}

fn empty_data() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A typed, positioned unit in the workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub label: String,
    /// Centre of the node footprint in document space
    pub position: Point,
    /// Type-specific payload, passed through untouched
    #[serde(default = "empty_data")]
    pub data: serde_json::Value,
    /// Opaque reference to an external tool definition
    #[serde(default, alias = "mcpToolId", skip_serializing_if = "Option::is_none")]
    pub tool_ref: Option<String>,
}

impl Node {
    /// Create a node with an empty payload
    pub fn new(
        id: impl Into<NodeId>,
        kind: NodeKind,
        label: impl Into<String>,
        position: Point,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            position,
            data: empty_data(),
            tool_ref: None,
        }
    }

    /// Set the opaque payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Set the tool reference
    pub fn with_tool_ref(mut self, tool_ref: impl Into<String>) -> Self {
        self.tool_ref = Some(tool_ref.into());
        self
    }
}

/// A directed edge from a node's output port to another node's input port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<HandleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<HandleId>,
}

impl Connection {
    /// Create a connection between the default ports of two nodes
    pub fn new(
        id: impl Into<ConnectionId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Set the port discriminators
    pub fn with_handles(
        mut self,
        source_handle: Option<HandleId>,
        target_handle: Option<HandleId>,
    ) -> Self {
        self.source_handle = source_handle;
        self.target_handle = target_handle;
        self
    }

    /// The ordered endpoint tuple used for duplicate detection
    pub fn key(&self) -> ConnectionKey<'_> {
        ConnectionKey {
            source: &self.source,
            source_handle: self.source_handle.as_deref(),
            target: &self.target,
            target_handle: self.target_handle.as_deref(),
        }
    }

    /// Whether either endpoint is the given node
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Borrowed `(source, sourceHandle, target, targetHandle)` tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionKey<'a> {
    pub source: &'a str,
    pub source_handle: Option<&'a str>,
    pub target: &'a str,
    pub target_handle: Option<&'a str>,
}

/// Pan/zoom transform between document space and screen space
///
/// `screen = document * zoom + (x, y)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Viewport {
    pub const IDENTITY: Viewport = Viewport {
        x: 0.0,
        y: 0.0,
        zoom: 1.0,
    };

    pub const fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self { x, y, zoom }
    }
}

/// The aggregate the host owns: nodes, connections and viewport
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub viewport: Viewport,
}

impl GraphDocument {
    pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self {
            nodes,
            connections,
            viewport: Viewport::default(),
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Parse a document from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn contains_connection(&self, id: &str) -> bool {
        self.connection(id).is_some()
    }

    /// Connections with the given node at either end
    pub fn connections_touching<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.touches(node_id))
    }

    /// Check whether a connection with the same ordered endpoint tuple exists
    pub fn has_connection(&self, key: &ConnectionKey<'_>) -> bool {
        self.connections.iter().any(|c| c.key() == *key)
    }

    /// Remove a connection by id, returning it if present
    pub fn remove_connection(&mut self, id: &str) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.id == id)?;
        Some(self.connections.remove(index))
    }

    /// Check the structural invariants of the document
    ///
    /// Node semantics (required payload fields, tool references) are not
    /// inspected.
    pub fn validate(&self) -> ValidationReport {
        let mut issues = Vec::new();

        let mut node_ids = HashSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id.as_str()) {
                issues.push(DocumentIssue::DuplicateNodeId(node.id.clone()));
            }
        }

        let mut connection_ids = HashSet::new();
        let mut seen_keys: Vec<(ConnectionKey<'_>, &str)> = Vec::new();
        for conn in &self.connections {
            if !connection_ids.insert(conn.id.as_str()) {
                issues.push(DocumentIssue::DuplicateConnectionId(conn.id.clone()));
            }
            if !node_ids.contains(conn.source.as_str()) {
                issues.push(DocumentIssue::DanglingSource {
                    connection: conn.id.clone(),
                    node: conn.source.clone(),
                });
            }
            if !node_ids.contains(conn.target.as_str()) {
                issues.push(DocumentIssue::DanglingTarget {
                    connection: conn.id.clone(),
                    node: conn.target.clone(),
                });
            }
            if conn.source == conn.target {
                issues.push(DocumentIssue::SelfLoop(conn.id.clone()));
            }

            let key = conn.key();
            if let Some((_, existing)) = seen_keys.iter().find(|(k, _)| *k == key) {
                issues.push(DocumentIssue::DuplicateConnection {
                    connection: conn.id.clone(),
                    existing: (*existing).to_string(),
                });
            } else {
                seen_keys.push((key, conn.id.as_str()));
            }
        }

        ValidationReport { issues }
    }
}

/// A single structural problem found by [`GraphDocument::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentIssue {
    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(NodeId),
    #[error("duplicate connection id '{0}'")]
    DuplicateConnectionId(ConnectionId),
    #[error("connection '{connection}': source node '{node}' not found")]
    DanglingSource { connection: ConnectionId, node: NodeId },
    #[error("connection '{connection}': target node '{node}' not found")]
    DanglingTarget { connection: ConnectionId, node: NodeId },
    #[error("connection '{0}' connects a node to itself")]
    SelfLoop(ConnectionId),
    #[error("connection '{connection}' duplicates '{existing}'")]
    DuplicateConnection {
        connection: ConnectionId,
        existing: ConnectionId,
    },
}

/// Outcome of structural validation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    issues: Vec<DocumentIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[DocumentIssue] {
        &self.issues
    }

    /// Convert a non-empty report into [`DocumentError::Invalid`]
    pub fn into_result(self) -> Result<()> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(DocumentError::Invalid(self.issues))
        }
    }
}
