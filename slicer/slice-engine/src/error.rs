//! Errors surfaced by a slicing run.

use slice_profile::ProfileError;
use slice_raster::RasterError;
use std::io;
use thiserror::Error;

/// Result type for engine operations.
pub type SliceResult<T> = Result<T, SliceError>;

/// Errors that abort a slicing run.
///
/// Cancellation is not among them: a cancelled run finishes with a
/// summary, not an error.
#[derive(Debug, Error)]
pub enum SliceError {
    /// The registry holds no mesh that rises above the platform.
    #[error("scene holds no sliceable meshes")]
    EmptyScene,

    /// The printer profile failed validation.
    #[error("printer profile rejected: {0}")]
    Profile(#[from] ProfileError),

    /// The raster target could not be set up.
    #[error("raster setup failed: {0}")]
    Raster(#[from] RasterError),

    /// Storage preparation failed.
    #[error("storage preparation failed: {0}")]
    Storage(#[source] io::Error),

    /// A layer image or the script file could not be written.
    #[error("writing {name} failed: {source}")]
    IoWrite {
        /// Storage-relative name of the artifact.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A worker thread could not be started.
    #[error("worker {worker_id} failed to start: {source}")]
    WorkerSpawn {
        /// Index of the worker that failed to spawn.
        worker_id: usize,
        /// Underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// A worker reported a fatal failure mid-run.
    #[error("worker {worker_id} failed: {message}")]
    WorkerFailed {
        /// Index of the failing worker.
        worker_id: usize,
        /// Failure description carried back over the result channel.
        message: String,
    },
}
