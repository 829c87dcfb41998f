//! Layer workers: each one rasterizes a contiguous chunk of layers.
//!
//! Workers share nothing mutable. A chunk carries an `Arc` of the scene
//! snapshot plus copies of everything else, and results stream back over
//! one shared mpsc channel. Panics are caught and surfaced as
//! [`WorkerResult::Failed`] so the orchestrator can fail the run.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use mesh_types::IndexedMesh;
use slice_profile::PrinterProfile;
use slice_raster::{encode_png, section_at_height, RasterTarget};
use slice_script::ScriptAssembler;
use tracing::trace;

/// One layer of a chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerJob {
    /// Zero-based layer index.
    pub layer_index: u32,
    /// This layer's share of the printable height, in `[0, 1)`.
    pub height_fraction: f64,
}

/// Messages a worker streams back to the orchestrator.
#[derive(Debug)]
pub enum WorkerResult {
    /// One layer finished.
    LayerDone {
        /// Zero-based layer index.
        layer_index: u32,
        /// PNG-encoded exposure mask.
        png: Vec<u8>,
        /// The layer's print script fragment.
        fragment: String,
    },
    /// A worker exhausted its chunk.
    ChunkDone {
        /// Which worker finished.
        worker_id: usize,
    },
    /// A worker hit an unrecoverable error. Fatal to the run.
    Failed {
        /// Which worker failed.
        worker_id: usize,
        /// What went wrong.
        message: String,
    },
}

/// Everything one worker needs for its chunk of layers.
pub(crate) struct ChunkJob {
    pub(crate) worker_id: usize,
    pub(crate) snapshot: Arc<IndexedMesh>,
    pub(crate) profile: PrinterProfile,
    pub(crate) target: RasterTarget,
    pub(crate) grid_height: f64,
    pub(crate) layer_count: u32,
    pub(crate) jobs: Vec<LayerJob>,
}

/// Run one chunk to completion, reporting over `results`.
///
/// Always ends with exactly one [`WorkerResult::ChunkDone`] or
/// [`WorkerResult::Failed`]. Send failures mean the orchestrator hung
/// up; the trailing send is best-effort.
pub(crate) fn process_chunk(chunk: ChunkJob, results: &Sender<WorkerResult>) {
    let worker_id = chunk.worker_id;
    match catch_unwind(AssertUnwindSafe(|| run_chunk(&chunk, results))) {
        Ok(Ok(())) => {
            let _ = results.send(WorkerResult::ChunkDone { worker_id });
        }
        Ok(Err(message)) => {
            let _ = results.send(WorkerResult::Failed { worker_id, message });
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            let _ = results.send(WorkerResult::Failed { worker_id, message });
        }
    }
}

fn run_chunk(chunk: &ChunkJob, results: &Sender<WorkerResult>) -> Result<(), String> {
    let assembler = ScriptAssembler::new(&chunk.profile, chunk.layer_count);
    for job in &chunk.jobs {
        let z = job.height_fraction * chunk.grid_height;
        let segments = section_at_height(&chunk.snapshot, z);
        let image = chunk.target.rasterize(&segments);
        let png = encode_png(&image).map_err(|err| err.to_string())?;
        let fragment = assembler.layer_block(job.layer_index);
        trace!(layer = job.layer_index, z, segments = segments.len(), "layer rasterized");

        let done = WorkerResult::LayerDone {
            layer_index: job.layer_index,
            png,
            fragment,
        };
        if results.send(done).is_err() {
            return Err("result channel closed".to_string());
        }
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
