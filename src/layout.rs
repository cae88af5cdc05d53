//! Sugiyama hierarchical layout of a workflow document.
//!
//! Layers follow the connection direction, left to right by default so the
//! result reads like the horizontal port layout of the canvas. Layout is done
//! by the `rust-sugiyama` crate; this module maps string node ids to the dense
//! indices it expects and back.
//!
//! Requires the `layout` feature to be enabled.

use std::collections::{BTreeSet, HashMap};

use crate::document::{GraphDocument, NodeId, Point};

/// Layout direction for the Sugiyama algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Direction {
    /// Layers flow left to right (default).
    #[default]
    LeftToRight,
    /// Layers flow top to bottom.
    TopToBottom,
}

/// Configuration for [`arrange`].
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct LayoutConfig {
    /// Minimum spacing between vertices (default: 0.0, which uses the
    /// `rust-sugiyama` default of 10.0).
    pub vertex_spacing: f64,
    /// Minimum edge length between layers (default: 0, which uses the
    /// `rust-sugiyama` default of 1).
    pub minimum_length: u32,
    /// Whether to include dummy vertices in the layout (default: false).
    pub dummy_vertices: bool,
    /// Layout direction (default: [`Direction::LeftToRight`]).
    pub direction: Direction,
    /// Node footprint `(width, height)` in document units (default: 150 × 60).
    pub node_size: (f64, f64),
    /// Gap between disconnected components (default: 60.0).
    pub component_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vertex_spacing: 0.0,
            minimum_length: 0,
            dummy_vertices: false,
            direction: Direction::LeftToRight,
            node_size: (150.0, 60.0),
            component_gap: 60.0,
        }
    }
}

/// Compute new positions for every node of `doc`.
///
/// Self-loops and connections with a missing endpoint are skipped, and
/// parallel connections between the same pair of nodes count once. The
/// result is in document order; duplicate node ids keep their first
/// occurrence.
pub fn arrange(doc: &GraphDocument, config: &LayoutConfig) -> Vec<(NodeId, Point)> {
    if doc.nodes.is_empty() {
        return Vec::new();
    }

    let horizontal = config.direction == Direction::LeftToRight;

    let mut id_to_idx: HashMap<&str, u32> = HashMap::new();
    let mut idx_to_id: Vec<&str> = Vec::with_capacity(doc.nodes.len());
    for node in &doc.nodes {
        if let std::collections::hash_map::Entry::Vacant(e) = id_to_idx.entry(node.id.as_str()) {
            e.insert(idx_to_id.len() as u32);
            idx_to_id.push(node.id.as_str());
        }
    }

    // For horizontal layout, swap width/height so the algorithm spaces layers
    // along what will become the x-axis.
    let (w, h) = config.node_size;
    let size = if horizontal { (h, w) } else { (w, h) };
    let vertices: Vec<(u32, (f64, f64))> = (0..idx_to_id.len() as u32).map(|idx| (idx, size)).collect();

    let edges: Vec<(u32, u32)> = doc
        .connections
        .iter()
        .filter_map(|c| {
            let src = *id_to_idx.get(c.source.as_str())?;
            let dst = *id_to_idx.get(c.target.as_str())?;
            (src != dst).then_some((src, dst))
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut sg_config = rust_sugiyama::configure::Config {
        dummy_vertices: config.dummy_vertices,
        ..Default::default()
    };
    if config.vertex_spacing > 0.0 {
        sg_config.vertex_spacing = config.vertex_spacing;
    }
    if config.minimum_length > 0 {
        sg_config.minimum_length = config.minimum_length;
    }

    // Vec<(Vec<(usize, (f64, f64))>, f64, f64)>: one entry per connected component
    let subgraphs = rust_sugiyama::from_vertices_and_edges(&vertices, &edges, &sg_config);

    // Components are laid out independently; stack them along the cross axis
    // so they do not overlap.
    let mut positions: HashMap<usize, Point> = HashMap::with_capacity(idx_to_id.len());
    let mut cursor = 0.0;
    for (layout, _width, _height) in &subgraphs {
        let min_x = layout.iter().map(|&(_, (x, _))| x).fold(f64::INFINITY, f64::min);
        let max_x = layout.iter().map(|&(_, (x, _))| x).fold(f64::NEG_INFINITY, f64::max);
        if !min_x.is_finite() {
            continue;
        }
        for &(idx, (x, y)) in layout {
            let x = x - min_x + cursor;
            let (px, py) = if horizontal { (y, x) } else { (x, y) };
            positions.insert(idx, Point::new(px, py));
        }
        cursor += max_x - min_x + size.0 + config.component_gap;
    }

    idx_to_id
        .iter()
        .enumerate()
        .filter_map(|(idx, id)| positions.get(&idx).map(|p| (id.to_string(), *p)))
        .collect()
}
