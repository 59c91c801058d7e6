use std::panic;
use std::thread;

use crate::algorithms::cc::{relax_range, Relax};
use crate::error::CCError;
use crate::types::CSRGraph;

/// Splits the vertex range into `thread_num` contiguous chunks and relaxes
/// each chunk on its own scoped thread.
///
/// Threads are spawned at the start of every pass and joined at its end; the
/// join is the barrier after which the per-thread change flags are OR-ed.
/// Chunks have `ceil(n / thread_num)` vertices, so trailing workers may get
/// fewer vertices or none, in which case no thread is spawned for them.
#[derive(Debug, Clone, Copy)]
pub struct ChunkedThreads {
    thread_num: usize,
}

/// Everything one worker needs for its chunk of a pass.
struct ChunkTask<'a> {
    /// Vertex id of the first slot of `next`.
    start: usize,
    graph: &'a CSRGraph,
    current: &'a [u32],
    next: &'a mut [u32],
}

impl ChunkTask<'_> {
    fn run(self) -> bool {
        relax_range(self.graph, self.current, self.next, self.start)
    }
}

impl ChunkedThreads {
    /// Creates a strategy running each pass on `thread_num` threads.
    ///
    /// # Errors
    /// Returns [`CCError::InvalidThreadCount`] if `thread_num` is zero.
    pub fn new(thread_num: usize) -> Result<Self, CCError> {
        if thread_num == 0 {
            return Err(CCError::InvalidThreadCount);
        }
        Ok(Self { thread_num })
    }
}

impl Relax for ChunkedThreads {
    fn name(&self) -> &'static str {
        "chunked"
    }

    fn degree(&self) -> usize {
        self.thread_num
    }

    fn relax(&self, graph: &CSRGraph, current: &[u32], next: &mut [u32]) -> bool {
        if next.is_empty() {
            return false;
        }
        let chunk = next.len().div_ceil(self.thread_num);

        thread::scope(|scope| {
            let workers: Vec<_> = next
                .chunks_mut(chunk)
                .enumerate()
                .map(|(index, slice)| {
                    let task = ChunkTask {
                        start: index * chunk,
                        graph,
                        current,
                        next: slice,
                    };
                    scope.spawn(move || task.run())
                })
                .collect();

            // Join every worker before deciding; a panicking worker takes the pass down with it.
            workers.into_iter().fold(false, |changed, worker| {
                let worker_changed = worker
                    .join()
                    .unwrap_or_else(|payload| panic::resume_unwind(payload));
                changed | worker_changed
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::cc::SequentialScan;

    #[test]
    fn test_zero_threads_rejected() {
        assert!(matches!(ChunkedThreads::new(0), Err(CCError::InvalidThreadCount)));
    }

    /// More threads than vertices leaves the surplus workers idle.
    #[test]
    fn test_more_threads_than_vertices() {
        let graph = CSRGraph::from_edges(3, &[(1, 2)]).unwrap();
        let current = vec![0, 1, 2];
        let mut next = vec![0; 3];

        let strategy = ChunkedThreads::new(16).unwrap();
        assert!(strategy.relax(&graph, &current, &mut next));
        assert_eq!(next, vec![0, 1, 1]);
        assert_eq!(strategy.degree(), 16);
    }

    /// Uneven chunking yields the same pass as the sequential scan.
    #[test]
    fn test_uneven_chunks_match_sequential() {
        let edges: Vec<(u32, u32)> = (0..10).map(|v| (v, (v * 7 + 3) % 11)).collect();
        let graph = CSRGraph::from_edges(11, &edges).unwrap();
        let current: Vec<u32> = (0..11).rev().collect();

        let mut expected = vec![0; 11];
        let expected_changed = SequentialScan.relax(&graph, &current, &mut expected);

        for thread_num in 1..=12 {
            let mut next = vec![0; 11];
            let changed = ChunkedThreads::new(thread_num)
                .unwrap()
                .relax(&graph, &current, &mut next);
            assert_eq!(changed, expected_changed);
            assert_eq!(next, expected, "thread_num = {thread_num}");
        }
    }

    #[test]
    fn test_empty_pass() {
        let graph = CSRGraph::empty();
        let strategy = ChunkedThreads::new(4).unwrap();
        assert!(!strategy.relax(&graph, &[], &mut []));
    }
}
