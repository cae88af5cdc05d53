//! Resolve a screen point to what is under it.
//!
//! Radii are in screen pixels so hit areas do not shrink when zooming out.
//! Priority is ports, then node bodies, then connections.

use crate::config::CanvasConfig;
use crate::document::{ConnectionId, GraphDocument, Node, Point, Viewport};
use crate::geometry::{ConnectionGeometry, PortSide};
use crate::input::PointerTarget;
use crate::routing::ConnectionRouter;
use crate::viewport::{to_document_space, to_screen_space};

/// Find the port within `hit_radius` screen pixels of `screen_point`.
///
/// Nodes are searched topmost first; on a node the output port wins over
/// the input port. The radius never exceeds a quarter of the node's drawn
/// width, so a zoomed-out node keeps a body that can still be dragged.
pub fn find_port_at(
    doc: &GraphDocument,
    viewport: &Viewport,
    geometry: &ConnectionGeometry,
    screen_point: Point,
    hit_radius: f64,
) -> Option<PointerTarget> {
    let hit_radius = hit_radius.min(geometry.half_width() * viewport.zoom * 0.5);
    let hit_radius_sq = hit_radius * hit_radius;
    let within = |node: &Node, side: PortSide| {
        let port = to_screen_space(viewport, geometry.port_position(node, side));
        port.distance_sq(screen_point) <= hit_radius_sq
    };

    doc.nodes.iter().rev().find_map(|node| {
        if within(node, PortSide::Output) {
            Some(PointerTarget::output(node.id.clone()))
        } else if within(node, PortSide::Input) {
            Some(PointerTarget::input(node.id.clone()))
        } else {
            None
        }
    })
}

/// Find the topmost node whose footprint contains `screen_point`.
///
/// Later nodes are drawn over earlier ones.
pub fn find_node_at<'a>(
    doc: &'a GraphDocument,
    viewport: &Viewport,
    geometry: &ConnectionGeometry,
    screen_point: Point,
) -> Option<&'a Node> {
    let point = to_document_space(viewport, screen_point);
    doc.nodes
        .iter()
        .rev()
        .find(|node| geometry.node_rect(node).contains(point))
}

/// Find the connection closest to `screen_point`, if closer than
/// `hover_distance` screen pixels.
pub fn find_connection_at(
    doc: &GraphDocument,
    viewport: &Viewport,
    router: &ConnectionRouter,
    screen_point: Point,
    hover_distance: f64,
    hit_samples: usize,
) -> Option<ConnectionId> {
    let mut closest: Option<&str> = None;
    let mut closest_distance = hover_distance;

    for connection in &doc.connections {
        let Some(curve) = router.curve(&connection.id) else {
            continue;
        };
        let distance = curve.to_screen(viewport).distance_to(screen_point, hit_samples);
        if distance < closest_distance {
            closest_distance = distance;
            closest = Some(connection.id.as_str());
        }
    }

    closest.map(str::to_string)
}

/// Resolve what a pointer at `screen_point` is over
pub fn resolve(
    doc: &GraphDocument,
    viewport: &Viewport,
    router: &ConnectionRouter,
    config: &CanvasConfig,
    screen_point: Point,
) -> PointerTarget {
    let geometry = router.geometry();

    if let Some(port) = find_port_at(doc, viewport, geometry, screen_point, config.port_hit_radius) {
        return port;
    }
    if let Some(node) = find_node_at(doc, viewport, geometry, screen_point) {
        return PointerTarget::NodeBody(node.id.clone());
    }
    find_connection_at(
        doc,
        viewport,
        router,
        screen_point,
        config.connection_hover_distance,
        config.hit_samples,
    )
    .map(PointerTarget::Connection)
    .unwrap_or(PointerTarget::Background)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Connection, NodeKind};

    fn doc() -> GraphDocument {
        GraphDocument::new(
            vec![
                Node::new("n1", NodeKind::Input, "In", Point::new(0.0, 0.0)),
                Node::new("n2", NodeKind::Output, "Out", Point::new(200.0, 0.0)),
            ],
            vec![Connection::new("c1", "n1", "n2")],
        )
    }

    fn resolve_at(doc: &GraphDocument, viewport: &Viewport, x: f64, y: f64) -> PointerTarget {
        let mut router = ConnectionRouter::default();
        router.rebuild(doc);
        resolve(doc, viewport, &router, &CanvasConfig::default(), Point::new(x, y))
    }

    // ========================================================================
    // find_port_at()
    // ========================================================================

    #[test]
    fn test_port_hit_at_node_edge() {
        let doc = doc();
        let geometry = ConnectionGeometry::default();
        let viewport = Viewport::IDENTITY;

        assert_eq!(
            find_port_at(&doc, &viewport, &geometry, Point::new(76.0, 1.0), 8.0),
            Some(PointerTarget::output("n1"))
        );
        assert_eq!(
            find_port_at(&doc, &viewport, &geometry, Point::new(125.0, 0.0), 8.0),
            Some(PointerTarget::input("n2"))
        );
    }

    #[test]
    fn test_port_boundary_radius() {
        let doc = doc();
        let geometry = ConnectionGeometry::default();
        let viewport = Viewport::IDENTITY;

        // Exactly at radius distance
        assert!(find_port_at(&doc, &viewport, &geometry, Point::new(83.0, 0.0), 8.0).is_some());
        // Just outside radius
        assert!(find_port_at(&doc, &viewport, &geometry, Point::new(83.1, 0.0), 8.0).is_none());
    }

    #[test]
    fn test_port_radius_is_in_screen_pixels() {
        let doc = GraphDocument::new(
            vec![Node::new("n1", NodeKind::Input, "In", Point::new(0.0, 0.0))],
            vec![],
        );
        let geometry = ConnectionGeometry::default();
        let viewport = Viewport::new(0.0, 0.0, 2.0);

        // Output port of n1 is drawn at (150, 0) on screen
        assert!(find_port_at(&doc, &viewport, &geometry, Point::new(157.0, 0.0), 8.0).is_some());
        assert!(find_port_at(&doc, &viewport, &geometry, Point::new(159.0, 0.0), 8.0).is_none());
    }

    #[test]
    fn test_port_radius_shrinks_with_small_nodes() {
        let doc = GraphDocument::new(
            vec![Node::new("n", NodeKind::Llm, "LLM", Point::ORIGIN)],
            vec![],
        );
        let geometry = ConnectionGeometry::default();
        // The node is drawn 15 px wide, ports 7.5 px from its centre
        let viewport = Viewport::new(0.0, 0.0, 0.1);

        assert_eq!(find_port_at(&doc, &viewport, &geometry, Point::ORIGIN, 8.0), None);
        assert_eq!(
            find_port_at(&doc, &viewport, &geometry, Point::new(7.5, 0.0), 8.0),
            Some(PointerTarget::output("n"))
        );
        assert_eq!(
            find_port_at(&doc, &viewport, &geometry, Point::new(-6.0, 0.0), 8.0),
            Some(PointerTarget::input("n"))
        );
        assert_eq!(resolve_at(&doc, &viewport, 0.0, 0.0), PointerTarget::node("n"));
    }

    // ========================================================================
    // find_node_at()
    // ========================================================================

    #[test]
    fn test_topmost_node_wins() {
        let mut doc = doc();
        doc.nodes
            .push(Node::new("n3", NodeKind::Llm, "LLM", Point::new(50.0, 0.0)));
        let geometry = ConnectionGeometry::default();

        let node = find_node_at(&doc, &Viewport::IDENTITY, &geometry, Point::new(30.0, 0.0));
        assert_eq!(node.map(|n| n.id.as_str()), Some("n3"));
    }

    #[test]
    fn test_node_hit_respects_viewport() {
        let doc = doc();
        let geometry = ConnectionGeometry::default();
        let viewport = Viewport::new(100.0, 100.0, 1.0);

        assert!(find_node_at(&doc, &viewport, &geometry, Point::new(0.0, 0.0)).is_none());
        let node = find_node_at(&doc, &viewport, &geometry, Point::new(100.0, 100.0));
        assert_eq!(node.map(|n| n.id.as_str()), Some("n1"));
    }

    // ========================================================================
    // resolve()
    // ========================================================================

    #[test]
    fn test_resolve_priority() {
        let doc = doc();
        let viewport = Viewport::IDENTITY;

        assert_eq!(resolve_at(&doc, &viewport, 75.0, 0.0), PointerTarget::output("n1"));
        assert_eq!(resolve_at(&doc, &viewport, 0.0, 10.0), PointerTarget::node("n1"));
        assert_eq!(
            resolve_at(&doc, &viewport, 100.0, 3.0),
            PointerTarget::Connection("c1".into())
        );
        assert_eq!(resolve_at(&doc, &viewport, 100.0, 20.0), PointerTarget::Background);
    }

    #[test]
    fn test_resolve_skips_dangling_connections() {
        let mut doc = doc();
        doc.connections.push(Connection::new("c2", "n1", "gone"));
        assert_eq!(resolve_at(&doc, &Viewport::IDENTITY, 100.0, 40.0), PointerTarget::Background);
    }

    #[test]
    fn test_resolve_empty_document() {
        let doc = GraphDocument::default();
        assert_eq!(resolve_at(&doc, &Viewport::IDENTITY, 0.0, 0.0), PointerTarget::Background);
    }
}
