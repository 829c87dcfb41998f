//! The printer profile record.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::gcode::GcodeTemplates;
use crate::preset::SupportPreset;
use crate::MM_TO_UNITS;

/// LCD panel resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Horizontal pixel count.
    pub x: u32,
    /// Vertical pixel count.
    pub y: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        // 4K mono LCD panel.
        Self { x: 3840, y: 2400 }
    }
}

/// Physical build volume in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    /// Plate width along X, in mm.
    pub size_x: f64,
    /// Plate depth along Y, in mm.
    pub size_y: f64,
    /// Vertical travel along Z, in mm.
    pub height: f64,
}

impl Workspace {
    /// Plate width in scene units.
    #[must_use]
    pub fn size_x_units(&self) -> f64 {
        self.size_x * MM_TO_UNITS
    }

    /// Plate depth in scene units.
    #[must_use]
    pub fn size_y_units(&self) -> f64 {
        self.size_y * MM_TO_UNITS
    }

    /// Vertical travel in scene units.
    ///
    /// # Example
    ///
    /// ```
    /// use slice_profile::Workspace;
    ///
    /// let workspace = Workspace { size_x: 192.0, size_y: 120.0, height: 250.0 };
    /// assert!((workspace.height_units() - 25.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn height_units(&self) -> f64 {
        self.height * MM_TO_UNITS
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            size_x: 192.0,
            size_y: 120.0,
            height: 250.0,
        }
    }
}

/// Exposure and motion settings for one print.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintSettings {
    /// Layer height in mm.
    pub layer_height: f64,
    /// Exposure per normal layer, in seconds.
    pub exposure_time: f64,
    /// Exposure per bottom layer, in seconds.
    pub bottom_exposure_time: f64,
    /// How many of the first layers use the bottom exposure.
    pub bottom_layers: u32,
    /// Lift above the layer position between exposures, in mm.
    pub lifting_height: f64,
    /// Lift feed rate in mm/min.
    pub lifting_speed: f64,
    /// Light-off settle delay per layer, in seconds.
    pub delay_time: f64,
}

impl PrintSettings {
    /// Layer pitch in scene units.
    ///
    /// # Example
    ///
    /// ```
    /// use slice_profile::PrintSettings;
    ///
    /// let settings = PrintSettings { layer_height: 0.05, ..PrintSettings::default() };
    /// assert!((settings.layer_pitch_units() - 0.005).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn layer_pitch_units(&self) -> f64 {
        self.layer_height * MM_TO_UNITS
    }
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            layer_height: 0.05,
            exposure_time: 2.5,
            bottom_exposure_time: 30.0,
            bottom_layers: 5,
            lifting_height: 5.0,
            lifting_speed: 65.0,
            delay_time: 0.5,
        }
    }
}

/// Everything the pipeline needs to know about one printer.
///
/// The profile is immutable for the duration of a slicing run: workers
/// share it by reference and nothing mutates it mid-run.
///
/// # Example
///
/// ```
/// use slice_profile::PrinterProfile;
///
/// let profile = PrinterProfile::default();
/// assert!(profile.validate().is_ok());
/// assert_eq!(profile.resolution.x, 3840);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterProfile {
    /// Printer display name, written into the script header.
    pub name: String,
    /// LCD resolution.
    pub resolution: Resolution,
    /// Physical build volume.
    pub workspace: Workspace,
    /// Exposure and motion settings.
    pub print_settings: PrintSettings,
    /// Decimal digits used when formatting Z positions.
    pub sharpness: usize,
    /// Machine G-code templates.
    pub gcode: GcodeTemplates,
    /// Support strut dimensions in millimetres.
    pub support_preset: SupportPreset,
}

impl PrinterProfile {
    /// Check the physically meaningful fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] when the layer height is not positive,
    /// the resolution has a zero axis or the workspace has a non-positive
    /// dimension.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.print_settings.layer_height <= 0.0 {
            return Err(ProfileError::InvalidLayerHeight(
                self.print_settings.layer_height,
            ));
        }
        if self.resolution.x == 0 || self.resolution.y == 0 {
            return Err(ProfileError::ZeroResolution {
                x: self.resolution.x,
                y: self.resolution.y,
            });
        }
        if self.workspace.size_x <= 0.0
            || self.workspace.size_y <= 0.0
            || self.workspace.height <= 0.0
        {
            return Err(ProfileError::InvalidWorkspace {
                x: self.workspace.size_x,
                y: self.workspace.size_y,
                z: self.workspace.height,
            });
        }
        Ok(())
    }
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self {
            name: "Generic 4K Mono LCD".to_string(),
            resolution: Resolution::default(),
            workspace: Workspace::default(),
            print_settings: PrintSettings::default(),
            sharpness: 2,
            gcode: GcodeTemplates::default(),
            support_preset: SupportPreset::default(),
        }
    }
}
