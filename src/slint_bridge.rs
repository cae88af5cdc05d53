//! Mirror canvas state into Slint models.
//!
//! [`SlintBridge`] writes the screen-space connection paths and node
//! rectangles of a [`CanvasController`] into caller-provided `VecModel`s.
//! Rows are updated in place, so Slint only re-renders what changed.
//!
//! Requires the `slint` feature to be enabled.
//!
//! # Example
//!
//! ```ignore
//! use workflow_canvas::{CanvasController, SlintBridge};
//!
//! let paths = Rc::new(VecModel::<ConnectionPath>::default());
//! let mut bridge = SlintBridge::new();
//! bridge.bind_connection_paths(paths.clone(), |id, path, selected| ConnectionPath {
//!     id,
//!     path,
//!     selected,
//! });
//! window.set_connection_paths(ModelRc::from(paths));
//!
//! // After each input event
//! bridge.sync(&canvas);
//! ```

use std::rc::Rc;

use slint::{Model, SharedString, VecModel};

use crate::controller::CanvasController;

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer {
    fn sync(&self, canvas: &CanvasController);
}

/// Update existing rows or add new ones, then remove excess rows
fn sync_rows<P: Clone + 'static>(model: &VecModel<P>, items: impl Iterator<Item = P>) {
    let mut len = 0;
    for (i, item) in items.enumerate() {
        if i < model.row_count() {
            model.set_row_data(i, item);
        } else {
            model.push(item);
        }
        len = i + 1;
    }
    while model.row_count() > len {
        model.remove(model.row_count() - 1);
    }
}

struct ConnectionPathSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for ConnectionPathSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(SharedString, SharedString, bool) -> P,
{
    fn sync(&self, canvas: &CanvasController) {
        let selected = canvas.selected();
        let rows = canvas.document().connections.iter().filter_map(|c| {
            // Connections with a missing endpoint have no path and no row
            let path = canvas.connection_svg_path(&c.id)?;
            let is_selected = selected.is_some_and(|s| {
                matches!(s, crate::selection::SelectedEntity::Connection(id) if *id == c.id)
            });
            Some((self.constructor)(
                SharedString::from(c.id.as_str()),
                SharedString::from(path.as_str()),
                is_selected,
            ))
        });
        sync_rows(&self.model, rows);
    }
}

struct NodeRectSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for NodeRectSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(SharedString, f32, f32, f32, f32, bool) -> P,
{
    fn sync(&self, canvas: &CanvasController) {
        let selected_node = canvas.selected().and_then(|s| match s {
            crate::selection::SelectedEntity::Node(id) => Some(id.as_str()),
            _ => None,
        });
        let rows = canvas.document().nodes.iter().filter_map(|node| {
            let rect = canvas.node_screen_rect(&node.id)?;
            Some((self.constructor)(
                SharedString::from(node.id.as_str()),
                rect.x as f32,
                rect.y as f32,
                rect.width as f32,
                rect.height as f32,
                selected_node == Some(node.id.as_str()),
            ))
        });
        sync_rows(&self.model, rows);
    }
}

/// Keeps bound Slint models in step with a [`CanvasController`]
#[derive(Default)]
pub struct SlintBridge {
    syncers: Vec<Box<dyn ModelSyncer>>,
}

impl SlintBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a model receiving one row per routable connection.
    ///
    /// `constructor` builds a row from `(connection_id, svg_path, selected)`.
    pub fn bind_connection_paths<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(SharedString, SharedString, bool) -> P + 'static,
    {
        self.syncers
            .push(Box::new(ConnectionPathSyncer { model, constructor }));
    }

    /// Bind a model receiving one row per node.
    ///
    /// `constructor` builds a row from `(node_id, x, y, width, height, selected)`
    /// in screen space.
    pub fn bind_node_rects<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(SharedString, f32, f32, f32, f32, bool) -> P + 'static,
    {
        self.syncers.push(Box::new(NodeRectSyncer { model, constructor }));
    }

    /// Push the current state into every bound model
    pub fn sync(&self, canvas: &CanvasController) {
        for syncer in &self.syncers {
            syncer.sync(canvas);
        }
    }

    /// Screen-space rubber-band path, empty when not authoring
    pub fn preview_path(&self, canvas: &CanvasController) -> SharedString {
        canvas
            .preview_svg_path()
            .map(|p| SharedString::from(p.as_str()))
            .unwrap_or_default()
    }
}
