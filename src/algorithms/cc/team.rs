use std::sync::atomic::{AtomicBool, Ordering};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::algorithms::cc::{relax_range, Relax};
use crate::error::CCError;
use crate::types::CSRGraph;

/// Static schedule on a persistent rayon pool.
///
/// The pool is built once and reused by every pass. Each pass cuts the vertex
/// range into one contiguous block per pool thread and spawns one task per
/// block inside a scope; a block accumulates its own change flag and publishes
/// it with a single `fetch_or` when it is done.
pub struct StaticTeam {
    pool: ThreadPool,
}

impl StaticTeam {
    /// Creates a team of `thread_num` threads, or rayon's default size when `None`.
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
            .thread_name(|index| format!("cc-team-{index}"))
            .build()
            .map_err(|source| CCError::ThreadPool { source })?;
        Ok(Self { pool })
    }
}

impl Relax for StaticTeam {
    fn name(&self) -> &'static str {
        "team"
    }

    fn degree(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn relax(&self, graph: &CSRGraph, current: &[u32], next: &mut [u32]) -> bool {
        if next.is_empty() {
            return false;
        }
        let block = next.len().div_ceil(self.degree());
        let any_changed = AtomicBool::new(false);

        self.pool.scope(|scope| {
            for (index, slice) in next.chunks_mut(block).enumerate() {
                let any_changed = &any_changed;
                scope.spawn(move |_| {
                    if relax_range(graph, current, slice, index * block) {
                        any_changed.fetch_or(true, Ordering::Relaxed);
                    }
                });
            }
        });

        // The scope has joined every block.
        any_changed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::cc::SequentialScan;

    #[test]
    fn test_pool_size() {
        assert_eq!(StaticTeam::new(Some(3)).unwrap().degree(), 3);
        assert!(StaticTeam::new(None).unwrap().degree() >= 1);
        assert!(matches!(StaticTeam::new(Some(0)), Err(CCError::InvalidThreadCount)));
    }

    #[test]
    fn test_pass_matches_sequential() {
        let edges: Vec<(u32, u32)> = (0..40).map(|v| (v, (v * 13 + 5) % 41)).collect();
        let graph = CSRGraph::from_edges(41, &edges).unwrap();
        let current: Vec<u32> = (0..41).map(|v| (v * 17) % 41).collect();

        let mut expected = vec![0; 41];
        let expected_changed = SequentialScan.relax(&graph, &current, &mut expected);

        for thread_num in [1, 2, 4, 7] {
            let team = StaticTeam::new(Some(thread_num)).unwrap();
            let mut next = vec![0; 41];
            assert_eq!(team.relax(&graph, &current, &mut next), expected_changed);
            assert_eq!(next, expected, "thread_num = {thread_num}");
        }
    }

    /// The pool survives across passes.
    #[test]
    fn test_reused_across_passes() {
        let graph = CSRGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let team = StaticTeam::new(Some(2)).unwrap();
        let mut current = vec![0, 1, 2];
        let mut next = vec![0; 3];

        assert!(team.relax(&graph, &current, &mut next));
        std::mem::swap(&mut current, &mut next);
        assert!(team.relax(&graph, &current, &mut next));
        std::mem::swap(&mut current, &mut next);
        assert!(!team.relax(&graph, &current, &mut next));
        assert_eq!(next, vec![0, 0, 0]);
    }
}
