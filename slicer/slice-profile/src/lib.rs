//! Printer profiles for the slicing pipeline.
//!
//! A [`PrinterProfile`] is the single configuration record every other
//! stage reads: LCD resolution, build volume, exposure timings, G-code
//! templates and the support preset. Profiles serialize with serde so a
//! slicing run can snapshot one and hand it to workers unchanged.
//!
//! # Units
//!
//! Printer hardware speaks millimetres; scene geometry uses scene units
//! with 1 unit = 10 mm. [`MM_TO_UNITS`] is the conversion every consumer
//! applies, and the `*_units` helpers apply it for the common fields.
//!
//! # Quick Start
//!
//! ```
//! use slice_profile::PrinterProfile;
//!
//! let profile = PrinterProfile::default();
//! profile.validate().unwrap();
//!
//! // Layer pitch in scene units drives the slicing layer count.
//! let pitch = profile.print_settings.layer_pitch_units();
//! assert!((pitch - 0.005).abs() < 1e-12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod gcode;
mod preset;
mod profile;

pub use error::ProfileError;
pub use gcode::GcodeTemplates;
pub use preset::SupportPreset;
pub use profile::{PrintSettings, PrinterProfile, Resolution, Workspace};

/// Millimetres to scene units: 1 scene unit = 10 mm.
pub const MM_TO_UNITS: f64 = 0.1;
