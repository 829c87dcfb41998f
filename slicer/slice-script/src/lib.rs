//! Print script assembly for masked-LCD resin printers.
//!
//! The slicing pipeline pairs every exposure image with a block of
//! machine commands. This crate turns a [`slice_profile::PrinterProfile`]
//! into those blocks: a `;key:value` metadata header, a machine start
//! block, one lift-settle-expose block per layer, and an end block that
//! parks the platform. Template tokens (`*x`, `*y`) are filled
//! first-occurrence-only, matching how the templates are written.
//!
//! # Quick Start
//!
//! ```
//! use slice_profile::PrinterProfile;
//! use slice_script::ScriptAssembler;
//!
//! let profile = PrinterProfile::default();
//! let assembler = ScriptAssembler::new(&profile, 2);
//!
//! let script = assembler.build("benchy");
//! assert!(script.starts_with(";fileName:benchy"));
//! assert!(script.contains("M6054 \"1.png\""));
//! assert!(script.ends_with(";END_GCODE_END"));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod assemble;

pub use assemble::ScriptAssembler;
