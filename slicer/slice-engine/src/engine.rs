//! The slicing orchestrator.
//!
//! One [`SliceEngine`] owns the scene registry, a storage sink and an
//! event callback. [`SliceEngine::run`] drives a full run through
//! `Preparing`, `Slicing` and `Finalizing`, farming layers out to a
//! fixed pool of worker threads and assembling the print script from
//! their fragments in layer order.

use std::num::NonZeroUsize;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use mesh_collide::SceneIndex;
use mesh_types::IndexedMesh;
use slice_profile::PrinterProfile;
use slice_raster::RasterTarget;
use slice_script::ScriptAssembler;
use support_types::{RouteConfig, ScanConfig};
use tracing::{debug, info};

use crate::error::{SliceError, SliceResult};
use crate::registry::MeshRegistry;
use crate::storage::SliceStorage;
use crate::supports::{self, SupportReport};
use crate::worker::{self, ChunkJob, LayerJob, WorkerResult};

/// Lifecycle state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlicerState {
    /// No run in progress.
    Idle,
    /// Validating inputs and preparing storage.
    Preparing,
    /// Workers are rasterizing layers.
    Slicing,
    /// Assembling and writing the print script.
    Finalizing,
}

/// Events the engine reports through its callback.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The engine moved to a new lifecycle state.
    StateChanged(SlicerState),
    /// Fraction of layers completed, in `[0, 1]`. Monotonic per run.
    Progress(f64),
    /// Human-readable progress line.
    Log(String),
    /// The run completed.
    Finished {
        /// Storage root holding the artifacts.
        path: PathBuf,
    },
    /// The run was cancelled. Not an error.
    Cancelled,
    /// The run failed.
    Failed {
        /// What went wrong.
        message: String,
    },
}

/// Cooperative cancellation flag shared between the caller and a run.
///
/// Armed from any thread; the orchestrator checks it before every
/// result write. Each run starts with the flag cleared.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// A fresh, unarmed handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the flag. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the flag is armed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every layer sliced and the script written.
    Completed,
    /// Cancelled partway through. Not an error.
    Cancelled,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Layers in the run.
    pub layer_count: u32,
    /// Storage root holding the artifacts.
    pub output: PathBuf,
}

/// Orchestrates slicing runs over a scene.
pub struct SliceEngine {
    profile: PrinterProfile,
    registry: MeshRegistry,
    storage: Arc<dyn SliceStorage>,
    events: Box<dyn Fn(EngineEvent) + Send>,
    workers: usize,
    state: SlicerState,
    cancel: CancelHandle,
    scene_index: Option<SceneIndex>,
}

impl SliceEngine {
    /// An idle engine over an empty scene.
    ///
    /// The worker count defaults to the available parallelism; override
    /// it with [`SliceEngine::with_workers`].
    pub fn new(
        profile: PrinterProfile,
        storage: Arc<dyn SliceStorage>,
        on_event: impl Fn(EngineEvent) + Send + 'static,
    ) -> Self {
        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self {
            profile,
            registry: MeshRegistry::new(),
            storage,
            events: Box::new(on_event),
            workers,
            state: SlicerState::Idle,
            cancel: CancelHandle::new(),
            scene_index: None,
        }
    }

    /// Override the worker thread count. Clamped to at least one.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// The active printer profile.
    #[must_use]
    pub fn profile(&self) -> &PrinterProfile {
        &self.profile
    }

    /// Mutable access to the printer profile. Validated at run start.
    pub fn profile_mut(&mut self) -> &mut PrinterProfile {
        &mut self.profile
    }

    /// The scene registry.
    #[must_use]
    pub fn registry(&self) -> &MeshRegistry {
        &self.registry
    }

    /// Mutable access to the scene registry.
    pub fn registry_mut(&mut self) -> &mut MeshRegistry {
        &mut self.registry
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SlicerState {
        self.state
    }

    /// A handle for cancelling the current or next run.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Regenerate supports for the whole scene using the profile's
    /// support preset.
    pub fn generate_supports(
        &mut self,
        scan_config: &ScanConfig,
        route_config: &RouteConfig,
    ) -> SupportReport {
        supports::generate_supports(
            &mut self.registry,
            &mut self.scene_index,
            &self.profile.support_preset,
            scan_config,
            route_config,
        )
    }

    /// Slice the scene into per-layer images plus a print script named
    /// `{file_name}.gcode`.
    ///
    /// # Errors
    ///
    /// Fails on an empty scene, an invalid profile, storage failures or
    /// a worker failure. Every failure is also reported through the
    /// event callback before the state returns to `Idle`. Cancellation
    /// is not a failure; it yields [`RunOutcome::Cancelled`].
    pub fn run(&mut self, file_name: &str) -> SliceResult<RunSummary> {
        match self.run_inner(file_name) {
            Ok(summary) => Ok(summary),
            Err(err) => {
                self.emit(EngineEvent::Failed {
                    message: err.to_string(),
                });
                self.set_state(SlicerState::Idle);
                Err(err)
            }
        }
    }

    fn run_inner(&mut self, file_name: &str) -> SliceResult<RunSummary> {
        self.cancel.reset();
        self.set_state(SlicerState::Preparing);
        self.emit(EngineEvent::Progress(0.0));

        self.profile.validate()?;
        self.storage.prepare().map_err(SliceError::Storage)?;
        self.registry.update_all();

        let workspace = self.profile.workspace;
        let grid_height = workspace.height_units();
        let top = self
            .registry
            .iter()
            .filter_map(|(_, scene)| scene.extrema().map(|extrema| extrema.max_z.z))
            .fold(f64::NEG_INFINITY, f64::max);
        if !top.is_finite() {
            return Err(SliceError::EmptyScene);
        }

        let slice_to = top.min(grid_height);
        let pitch = self.profile.print_settings.layer_pitch_units();
        let raw_count = (slice_to / pitch).ceil();
        if !raw_count.is_finite() || raw_count <= 0.0 {
            return Err(SliceError::EmptyScene);
        }
        // Layer counts fit in u32.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let layer_count = raw_count as u32;
        info!(layer_count, slice_to, "run prepared");
        self.emit(EngineEvent::Log(format!("slicing {layer_count} layers")));

        let snapshot = Arc::new(self.registry.world_snapshot());
        let target = RasterTarget::new(
            self.profile.resolution.x,
            self.profile.resolution.y,
            workspace.size_x_units(),
            workspace.size_y_units(),
        )?;

        self.set_state(SlicerState::Slicing);
        let (receiver, handles, chunk_count) =
            self.spawn_workers(&snapshot, &target, grid_height, slice_to, layer_count)?;

        let mut fragments: Vec<Option<String>> = vec![None; layer_count as usize];
        let cancelled =
            self.collect_results(&receiver, chunk_count, layer_count, &mut fragments)?;

        if cancelled {
            drop(receiver);
            for handle in handles {
                let _ = handle.join();
            }
            info!("run cancelled");
            self.emit(EngineEvent::Cancelled);
            self.set_state(SlicerState::Idle);
            return Ok(RunSummary {
                outcome: RunOutcome::Cancelled,
                layer_count,
                output: self.storage.root(),
            });
        }

        for handle in handles {
            let _ = handle.join();
        }

        self.set_state(SlicerState::Finalizing);
        let collected: Vec<String> = fragments.into_iter().flatten().collect();
        debug_assert_eq!(collected.len(), layer_count as usize);
        let script =
            ScriptAssembler::new(&self.profile, layer_count).assemble(file_name, &collected);
        let name = format!("{file_name}.gcode");
        self.storage
            .write_text(&name, &script)
            .map_err(|source| SliceError::IoWrite { name, source })?;

        info!(layer_count, "run complete");
        self.emit(EngineEvent::Finished {
            path: self.storage.root(),
        });
        self.set_state(SlicerState::Idle);
        Ok(RunSummary {
            outcome: RunOutcome::Completed,
            layer_count,
            output: self.storage.root(),
        })
    }

    fn spawn_workers(
        &self,
        snapshot: &Arc<IndexedMesh>,
        target: &RasterTarget,
        grid_height: f64,
        slice_to: f64,
        layer_count: u32,
    ) -> SliceResult<(Receiver<WorkerResult>, Vec<JoinHandle<()>>, usize)> {
        let chunks = partition_layers(layer_count, self.workers);
        let chunk_count = chunks.len();
        let (sender, receiver) = mpsc::channel();
        let mut handles = Vec::with_capacity(chunk_count);

        for (worker_id, range) in chunks.into_iter().enumerate() {
            let jobs: Vec<LayerJob> = range
                .map(|layer_index| LayerJob {
                    layer_index,
                    height_fraction: f64::from(layer_index) / f64::from(layer_count) * slice_to
                        / grid_height,
                })
                .collect();
            let chunk = ChunkJob {
                worker_id,
                snapshot: Arc::clone(snapshot),
                profile: self.profile.clone(),
                target: target.clone(),
                grid_height,
                layer_count,
                jobs,
            };
            let results = sender.clone();
            let handle = thread::Builder::new()
                .name(format!("slice-worker-{worker_id}"))
                .spawn(move || worker::process_chunk(chunk, &results))
                .map_err(|source| SliceError::WorkerSpawn { worker_id, source })?;
            handles.push(handle);
        }
        Ok((receiver, handles, chunk_count))
    }

    /// Collect worker results until every chunk reports done.
    ///
    /// Returns whether the run was cancelled. After the cancel flag is
    /// armed, pending results are drained and discarded and storage
    /// sees no further writes.
    fn collect_results(
        &self,
        receiver: &Receiver<WorkerResult>,
        chunk_count: usize,
        layer_count: u32,
        fragments: &mut [Option<String>],
    ) -> SliceResult<bool> {
        let mut chunks_done = 0_usize;
        let mut received = 0_u32;
        let mut progress = 0.0_f64;

        while chunks_done < chunk_count {
            let Ok(result) = receiver.recv() else {
                if self.cancel.is_cancelled() {
                    return Ok(true);
                }
                return Err(SliceError::WorkerFailed {
                    worker_id: 0,
                    message: "result channel closed early".to_string(),
                });
            };
            match result {
                WorkerResult::LayerDone {
                    layer_index,
                    png,
                    fragment,
                } => {
                    if self.cancel.is_cancelled() {
                        continue;
                    }
                    let name = format!("{}.png", layer_index + 1);
                    self.storage
                        .write_image(&name, &png)
                        .map_err(|source| SliceError::IoWrite { name, source })?;
                    if let Some(slot) = fragments.get_mut(layer_index as usize) {
                        *slot = Some(fragment);
                    }
                    received += 1;
                    let fraction = f64::from(received) / f64::from(layer_count);
                    if fraction > progress {
                        progress = fraction;
                        self.emit(EngineEvent::Progress(progress));
                    }
                }
                WorkerResult::ChunkDone { worker_id } => {
                    debug!(worker_id, "chunk complete");
                    chunks_done += 1;
                }
                WorkerResult::Failed { worker_id, message } => {
                    if self.cancel.is_cancelled() {
                        chunks_done += 1;
                    } else {
                        return Err(SliceError::WorkerFailed { worker_id, message });
                    }
                }
            }
        }
        Ok(self.cancel.is_cancelled())
    }

    fn emit(&self, event: EngineEvent) {
        (self.events)(event);
    }

    fn set_state(&mut self, state: SlicerState) {
        if self.state != state {
            self.state = state;
            self.emit(EngineEvent::StateChanged(state));
        }
    }
}

/// Split `[0, total)` into contiguous ascending chunks, one per worker.
///
/// The last chunk absorbs the remainder; fewer chunks come back when
/// there are fewer layers than workers.
fn partition_layers(total: u32, workers: usize) -> Vec<Range<u32>> {
    if total == 0 {
        return Vec::new();
    }
    // Chunk counts never exceed the layer total.
    #[allow(clippy::cast_possible_truncation)]
    let chunk_count = (total as usize).min(workers.max(1)) as u32;
    let base = total / chunk_count;
    let mut chunks = Vec::with_capacity(chunk_count as usize);
    let mut start = 0_u32;
    for index in 0..chunk_count {
        let end = if index + 1 == chunk_count {
            total
        } else {
            start + base
        };
        chunks.push(start..end);
        start = end;
    }
    chunks
}
