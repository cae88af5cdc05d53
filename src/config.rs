//! Tunable constants for the canvas.

use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, Result};

/// Canvas configuration.
///
/// Every field has a default, so a partial JSON object such as
/// `{"maxZoom": 4.0}` is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Lower zoom bound (default: 0.1)
    pub min_zoom: f64,
    /// Upper zoom bound (default: 3.0)
    pub max_zoom: f64,
    /// Factor applied by `zoom_in` (default: 1.2)
    pub zoom_in_factor: f64,
    /// Factor applied by `zoom_out` (default: 0.8)
    pub zoom_out_factor: f64,
    /// Wheel zoom factor is `2^(-delta_y * wheel_sensitivity)` (default: 0.002)
    pub wheel_sensitivity: f64,
    /// Node footprint width in document units (default: 150.0)
    pub node_width: f64,
    /// Node footprint height in document units (default: 60.0)
    pub node_height: f64,
    /// Port hit radius in screen pixels (default: 8.0)
    pub port_hit_radius: f64,
    /// Maximum pointer distance to a connection curve in screen pixels (default: 6.0)
    pub connection_hover_distance: f64,
    /// Minimum horizontal control point offset for curves (default: 50.0)
    pub bezier_min_offset: f64,
    /// Connections shorter than this are drawn straight (default: 10.0)
    pub straight_line_threshold: f64,
    /// Samples used for point-to-curve distance (default: 20)
    pub hit_samples: usize,
    /// Pointer travel in screen pixels before a press becomes a drag (default: 0.0)
    pub drag_threshold: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 3.0,
            zoom_in_factor: 1.2,
            zoom_out_factor: 0.8,
            wheel_sensitivity: 0.002,
            node_width: 150.0,
            node_height: 60.0,
            port_hit_radius: 8.0,
            connection_hover_distance: 6.0,
            bezier_min_offset: 50.0,
            straight_line_threshold: 10.0,
            hit_samples: 20,
            drag_threshold: 0.0,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CanvasConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(DocumentError::config("minZoom must be a positive number"));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            return Err(DocumentError::config("maxZoom must not be below minZoom"));
        }
        if !(self.zoom_in_factor > 0.0 && self.zoom_out_factor > 0.0) {
            return Err(DocumentError::config("zoom step factors must be positive"));
        }
        if !(self.node_width > 0.0 && self.node_height > 0.0) {
            return Err(DocumentError::config("node footprint must be positive"));
        }
        if self.port_hit_radius < 0.0 || self.connection_hover_distance < 0.0 {
            return Err(DocumentError::config("hit distances must not be negative"));
        }
        Ok(())
    }

    /// Half the node width: the horizontal distance from centre to a port.
    pub fn half_width(&self) -> f64 {
        self.node_width * 0.5
    }

    pub fn half_height(&self) -> f64 {
        self.node_height * 0.5
    }
}
