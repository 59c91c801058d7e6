use crate::algorithms::cc::{relax_range, Relax};
use crate::types::CSRGraph;

/// Single-threaded pass over vertices `0..n` in index order.
///
/// This is the reference every parallel strategy is checked against.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialScan;

impl Relax for SequentialScan {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn degree(&self) -> usize {
        1
    }

    fn relax(&self, graph: &CSRGraph, current: &[u32], next: &mut [u32]) -> bool {
        relax_range(graph, current, next, 0)
    }
}
