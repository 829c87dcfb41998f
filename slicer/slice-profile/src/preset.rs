//! Support strut dimension presets.

use serde::{Deserialize, Serialize};

/// Support strut dimensions, all in millimetres.
///
/// These are the values a user tunes per resin and part weight. The
/// geometry builder converts them to scene units before constructing
/// struts; this record stays in printer terms so profiles read naturally.
///
/// # Example
///
/// ```
/// use slice_profile::SupportPreset;
///
/// let preset = SupportPreset::default();
/// assert!(preset.head < preset.body);
/// assert!(preset.body < preset.platform_width);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportPreset {
    /// Tip radius where the strut meets the model, in mm.
    pub head: f64,
    /// Radius of the touchpoint and anchor spheres, in mm.
    pub connection_sphere: f64,
    /// Body tube radius, in mm.
    pub body: f64,
    /// Platform foot radius at the plate, in mm.
    pub platform_width: f64,
    /// Platform foot height, in mm.
    pub platform_height: f64,
}

impl Default for SupportPreset {
    /// Medium supports for a desktop resin printer.
    fn default() -> Self {
        Self {
            head: 0.4,
            connection_sphere: 0.6,
            body: 1.0,
            platform_width: 3.0,
            platform_height: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_is_positive() {
        let preset = SupportPreset::default();
        for value in [
            preset.head,
            preset.connection_sphere,
            preset.body,
            preset.platform_width,
            preset.platform_height,
        ] {
            assert!(value > 0.0);
        }
    }
}
