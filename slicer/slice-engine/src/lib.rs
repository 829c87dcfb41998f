//! Slicing orchestration for resin printing.
//!
//! A [`SliceEngine`] owns the scene registry, a [`SliceStorage`] sink
//! and an event callback. One run walks `Preparing`, `Slicing` and
//! `Finalizing`: the scene is snapshotted, layers are partitioned into
//! contiguous chunks across a fixed pool of worker threads, each layer
//! becomes a PNG exposure mask in storage, and the per-layer script
//! fragments assemble into the final print script in ascending layer
//! order regardless of completion order.
//!
//! Support generation plugs the routing stack in ahead of slicing:
//! [`SliceEngine::generate_supports`] scans the scene for unsupported
//! surfaces, routes each touchpoint past obstacles, builds the strut
//! meshes and attaches them to their registry slots so the next run
//! prints them along with the models.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use mesh_types::unit_cube;
//! use slice_engine::{MemoryStorage, RunOutcome, SceneMesh, SliceEngine};
//! use slice_profile::{PrintSettings, PrinterProfile, Resolution, Workspace};
//!
//! # fn main() -> Result<(), slice_engine::SliceError> {
//! let profile = PrinterProfile {
//!     resolution: Resolution { x: 32, y: 32 },
//!     workspace: Workspace {
//!         size_x: 160.0,
//!         size_y: 160.0,
//!         height: 160.0,
//!     },
//!     print_settings: PrintSettings {
//!         layer_height: 5.0,
//!         ..PrintSettings::default()
//!     },
//!     ..PrinterProfile::default()
//! };
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let mut engine = SliceEngine::new(profile, storage.clone(), |_| {}).with_workers(2);
//!
//! let mut cube = unit_cube();
//! cube.scale_uniform(4.0);
//! engine.registry_mut().insert(SceneMesh::new(cube));
//!
//! let summary = engine.run("cube")?;
//! assert_eq!(summary.outcome, RunOutcome::Completed);
//! assert_eq!(summary.layer_count, 8);
//! assert_eq!(storage.image_count(), 8);
//! assert!(storage.text("cube.gcode").is_some());
//! # Ok(())
//! # }
//! ```
//!
//! # Guarantees
//!
//! - Layer images land in storage as `{index + 1}.png`; the script
//!   covers layers `[0, layer_count)` in ascending order.
//! - Progress events are monotonic within a run.
//! - Cancellation is cooperative and clean: storage sees no image
//!   writes after the flag is armed, and the run ends `Idle` with a
//!   `Cancelled` outcome rather than an error.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod engine;
mod error;
mod registry;
mod storage;
mod supports;
mod worker;

pub use engine::{CancelHandle, EngineEvent, RunOutcome, RunSummary, SliceEngine, SlicerState};
pub use error::{SliceError, SliceResult};
pub use registry::{MeshId, MeshRegistry, SceneMesh, WorldExtrema};
pub use storage::{DirectoryStorage, MemoryStorage, SliceStorage};
pub use supports::{generate_supports, SupportReport};
pub use worker::{LayerJob, WorkerResult};
