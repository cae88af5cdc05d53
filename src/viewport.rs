//! Pan/zoom transform between document space and screen space.
//!
//! The [`ViewportController`] owns the single current [`Viewport`]. Every
//! geometry and hit-test computation receives the viewport explicitly, so
//! none of them read ambient state.

use crate::config::CanvasConfig;
use crate::document::{Point, Viewport};

/// Owns the viewport and keeps its zoom inside the configured range.
#[derive(Debug, Clone)]
pub struct ViewportController {
    viewport: Viewport,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl ViewportController {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            viewport: Viewport::IDENTITY,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    /// The current transform.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    /// Adopt a viewport supplied by the host, clamping its zoom.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        let zoom = self.clamp_zoom(viewport.zoom);
        self.viewport = Viewport::new(finite_or(viewport.x, 0.0), finite_or(viewport.y, 0.0), zoom);
    }

    /// Translate the view by a screen-space delta.
    ///
    /// The translation is kept in screen units, so the content under the
    /// pointer follows it exactly: `(dx, dy)` on screen is `(dx, dy) / zoom`
    /// in document space.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.viewport.x += dx;
        self.viewport.y += dy;
    }

    /// Multiply the zoom by `factor`, keeping `anchor` fixed on screen.
    ///
    /// Non-finite or non-positive factors are ignored.
    pub fn zoom_by(&mut self, factor: f64, anchor: Point) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        self.zoom_to(self.viewport.zoom * factor, anchor);
    }

    /// Set an absolute zoom level, keeping `anchor` fixed on screen.
    pub fn zoom_to(&mut self, zoom: f64, anchor: Point) {
        if !(anchor.x.is_finite() && anchor.y.is_finite()) {
            return;
        }
        let pinned = self.to_document_space(anchor);
        let zoom = self.clamp_zoom(zoom);
        self.viewport = Viewport::new(anchor.x - pinned.x * zoom, anchor.y - pinned.y * zoom, zoom);
    }

    /// Back to `{0, 0, 1}`.
    pub fn reset(&mut self) {
        self.viewport = Viewport::IDENTITY;
    }

    pub fn to_document_space(&self, screen: Point) -> Point {
        to_document_space(&self.viewport, screen)
    }

    pub fn to_screen_space(&self, document: Point) -> Point {
        to_screen_space(&self.viewport, document)
    }

    /// Convert a pointer delta (no translation) into document units.
    pub fn screen_delta_to_document(&self, delta: Point) -> Point {
        screen_delta_to_document(&self.viewport, delta)
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.viewport.zoom.clamp(self.min_zoom, self.max_zoom);
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// `(screen - pan) / zoom`
pub fn to_document_space(viewport: &Viewport, screen: Point) -> Point {
    Point::new(
        (screen.x - viewport.x) / viewport.zoom,
        (screen.y - viewport.y) / viewport.zoom,
    )
}

/// `document * zoom + pan`
pub fn to_screen_space(viewport: &Viewport, document: Point) -> Point {
    Point::new(
        document.x * viewport.zoom + viewport.x,
        document.y * viewport.zoom + viewport.y,
    )
}

pub fn screen_delta_to_document(viewport: &Viewport, delta: Point) -> Point {
    delta.scale(1.0 / viewport.zoom)
}
