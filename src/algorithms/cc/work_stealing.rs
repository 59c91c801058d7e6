use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::algorithms::cc::{relax_vertex, Relax};
use crate::config::RAYON_MIN_LEN;
use crate::error::CCError;
use crate::types::CSRGraph;

/// Parallel-for over all vertices on a rayon pool; rayon's work stealing
/// decides how the range is split.
///
/// Every vertex whose label shrinks sets the shared change flag with
/// `fetch_or`.
pub struct WorkStealing {
    pool: ThreadPool,
    min_len: usize,
}

impl WorkStealing {
    /// Creates a pool of `thread_num` threads, or rayon's default size when `None`.
    ///
    /// # Errors
    /// Returns [`CCError::InvalidThreadCount`] for zero threads and
    /// [`CCError::ThreadPool`] if the pool cannot be started.
    pub fn new(thread_num: Option<usize>) -> Result<Self, CCError> {
        if thread_num == Some(0) {
            return Err(CCError::InvalidThreadCount);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(thread_num.unwrap_or(0))
            .thread_name(|index| format!("cc-steal-{index}"))
            .build()
            .map_err(|source| CCError::ThreadPool { source })?;
        Ok(Self {
            pool,
            min_len: RAYON_MIN_LEN,
        })
    }

    /// Sets the smallest number of vertices a task is split down to.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len.max(1);
        self
    }
}

impl Relax for WorkStealing {
    fn name(&self) -> &'static str {
        "work-stealing"
    }

    fn degree(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn relax(&self, graph: &CSRGraph, current: &[u32], next: &mut [u32]) -> bool {
        let any_changed = AtomicBool::new(false);

        self.pool.install(|| {
            next.par_iter_mut()
                .enumerate()
                .with_min_len(self.min_len)
                .for_each(|(vertex, slot)| {
                    let best = relax_vertex(graph, current, vertex);
                    *slot = best;
                    if best != current[vertex] {
                        any_changed.fetch_or(true, Ordering::Relaxed);
                    }
                });
        });

        any_changed.load(Ordering::Relaxed)
    }
}
