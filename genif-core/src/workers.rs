//! Worker pool for data-parallel loops
//!
//! Every parallel region in the forest (split assignment, density counting,
//! prediction, ensemble fitting) runs inside one explicitly sized `rayon`
//! pool. The pool is shared by cloning the handle, so an ensemble and all of
//! its tree copies use the same threads; a tree fitted from a pool worker
//! re-enters the pool instead of spawning more threads.

use core::fmt;
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::errors::{GenifError, GenifResult};

/// Resolve a requested worker count
///
/// `None` or `Some(0)` fall back to the detected hardware parallelism,
/// minimum 1.
pub fn resolve_worker_count(requested: Option<usize>) -> usize {
    match requested {
        Some(workers) if workers > 0 => workers,
        _ => std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
    }
}

/// Shared handle to a fixed-size thread pool
#[derive(Clone)]
pub struct WorkerPool {
    pool: Arc<ThreadPool>,
    workers: usize,
}

impl WorkerPool {
    /// Create a pool with exactly `workers` threads
    pub fn new(workers: usize) -> GenifResult<Self> {
        if workers == 0 {
            return Err(GenifError::InvalidConfig {
                reason: "worker count needs to be greater than zero",
            });
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("genif-worker-{i}"))
            .build()
            .map_err(|e| GenifError::ThreadPool { reason: e.to_string() })?;

        log::debug!("Worker pool started with {} threads", workers);

        Ok(Self {
            pool: Arc::new(pool),
            workers,
        })
    }

    /// Create a pool sized by [`resolve_worker_count`]
    pub fn from_request(requested: Option<usize>) -> GenifResult<Self> {
        Self::new(resolve_worker_count(requested))
    }

    /// Number of worker threads
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `op` inside the pool and block until it returns
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .finish()
    }
}
