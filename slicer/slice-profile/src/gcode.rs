//! Machine G-code templates.

use serde::{Deserialize, Serialize};

/// Per-machine G-code fragments with `*x`/`*y` substitution tokens.
///
/// The script assembler replaces the first occurrence of each token per
/// line: `*x` carries the value that varies per layer (image number, Z
/// position, delay milliseconds), `*y` the feed rate.
///
/// Defaults target the ChiTu LCD board dialect.
///
/// # Example
///
/// ```
/// use slice_profile::GcodeTemplates;
///
/// let gcode = GcodeTemplates::default();
/// assert!(gcode.show_image.contains("*x"));
/// assert!(gcode.move_to.contains("*y"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcodeTemplates {
    /// Display a layer image: `*x` is the 1-based layer number.
    pub show_image: String,
    /// Move the platform: `*x` is the Z position in mm, `*y` the feed
    /// rate in mm/min.
    pub move_to: String,
    /// Dwell: `*x` is the delay in milliseconds.
    pub delay: String,
    /// Turn the UV light on.
    pub light_on: String,
    /// Turn the UV light off.
    pub light_off: String,
    /// Emitted once before the first layer.
    pub start: String,
    /// Emitted once after the last layer: `*x` is the workspace height
    /// in mm.
    pub end: String,
}

impl Default for GcodeTemplates {
    fn default() -> Self {
        Self {
            show_image: "M6054 \"*x.png\"".to_string(),
            move_to: "G0 Z*x F*y".to_string(),
            delay: "G4 P*x".to_string(),
            light_on: "M106 S255".to_string(),
            light_off: "M106 S0".to_string(),
            start: "G21\nG90\nM106 S0\nG28 Z0".to_string(),
            end: "M106 S0\nG1 Z*x F25\nM18".to_string(),
        }
    }
}
