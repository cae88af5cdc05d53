//! Node footprints, port anchors and connection curves.
//!
//! Every node shares one rectangular footprint centred on its position. The
//! output port sits on the right edge and the input port on the left edge;
//! all handles of a side share that anchor.

use crate::config::CanvasConfig;
use crate::document::{Connection, GraphDocument, Node, Point};
use crate::path::CubicBezier;

/// Which side of a node a port is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortSide {
    Input,
    Output,
}

/// Axis-aligned rectangle, `x`/`y` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Computes node and connection geometry from the shared footprint
#[derive(Debug, Clone, Copy)]
pub struct ConnectionGeometry {
    half_width: f64,
    half_height: f64,
    min_offset: f64,
    straight_threshold: f64,
}

impl Default for ConnectionGeometry {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl ConnectionGeometry {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            half_width: config.half_width(),
            half_height: config.half_height(),
            min_offset: config.bezier_min_offset,
            straight_threshold: config.straight_line_threshold,
        }
    }

    /// Distance from a node's centre to either port, in document units
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Document-space footprint of a node
    pub fn node_rect(&self, node: &Node) -> Rect {
        Rect {
            x: node.position.x - self.half_width,
            y: node.position.y - self.half_height,
            width: self.half_width * 2.0,
            height: self.half_height * 2.0,
        }
    }

    /// Document-space anchor of a port
    pub fn port_position(&self, node: &Node, side: PortSide) -> Point {
        match side {
            PortSide::Output => Point::new(node.position.x + self.half_width, node.position.y),
            PortSide::Input => Point::new(node.position.x - self.half_width, node.position.y),
        }
    }

    /// Curve from the source output port to the target input port
    pub fn curve_between(&self, source: &Node, target: &Node) -> CubicBezier {
        self.curve_to_point(source, self.port_position(target, PortSide::Input))
    }

    /// Curve from a node's output port to an arbitrary document point
    pub fn curve_to_point(&self, source: &Node, end: Point) -> CubicBezier {
        CubicBezier::from_endpoints(
            self.port_position(source, PortSide::Output),
            end,
            self.min_offset,
            self.straight_threshold,
        )
    }

    /// Curve for a connection, or `None` when an endpoint node is missing
    pub fn connection_curve(&self, doc: &GraphDocument, connection: &Connection) -> Option<CubicBezier> {
        let source = doc.node(&connection.source)?;
        let target = doc.node(&connection.target)?;
        Some(self.curve_between(source, target))
    }
}
