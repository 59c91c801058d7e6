use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::algorithms::count::count_components;
use crate::error::CCError;
use crate::types::graph_query::GraphQuery;
use crate::types::{CSRGraph, LabelBuffers};

pub mod chunked;
pub mod sequential;
pub mod team;
pub mod work_stealing;

pub use chunked::ChunkedThreads;
pub use sequential::SequentialScan;
pub use team::StaticTeam;
pub use work_stealing::WorkStealing;

/// The execution strategies a propagation pass can run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// One thread, vertices in index order.
    #[default]
    Sequential,
    /// Fresh scoped threads per pass, one contiguous chunk each.
    Chunked,
    /// Rayon pool, one static block per pool thread.
    Team,
    /// Rayon parallel iterator with work stealing.
    WorkStealing,
}

impl StrategyKind {
    /// Every strategy, in the order they are compared.
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Sequential,
        StrategyKind::Chunked,
        StrategyKind::Team,
        StrategyKind::WorkStealing,
    ];

    /// Stable lowercase name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Sequential => "sequential",
            StrategyKind::Chunked => "chunked",
            StrategyKind::Team => "team",
            StrategyKind::WorkStealing => "work-stealing",
        }
    }

    /// Value of the `impl` column in run reports.
    ///
    /// The figure scripts group runs by the threading runtime each strategy
    /// stands in for: `pthreads` for fresh threads per pass, `openmp` for the
    /// static team and `opencilk` for work stealing.
    pub fn impl_name(self) -> &'static str {
        match self {
            StrategyKind::Sequential => "sequential",
            StrategyKind::Chunked => "pthreads",
            StrategyKind::Team => "openmp",
            StrategyKind::WorkStealing => "opencilk",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for a connected components run.
///
/// # Fields
///
/// * `strategy` - Which execution strategy drives the propagation passes.
/// * `thread_num` - Worker count for the parallel strategies. Required by
///   [`StrategyKind::Chunked`]; the rayon strategies fall back to rayon's
///   default pool size when it is `None`. Ignored by the sequential scan.
#[derive(Debug, Clone, Default)]
pub struct CCConfig {
    pub strategy: StrategyKind,
    pub thread_num: Option<usize>,
}

impl CCConfig {
    /// Builds the strategy this configuration describes.
    ///
    /// # Errors
    /// Returns [`CCError::InvalidThreadCount`] for a zero worker count,
    /// [`CCError::MissingThreadCount`] if the chunked strategy has no worker
    /// count, and [`CCError::ThreadPool`] if a rayon pool cannot be built.
    pub fn build_strategy(&self) -> Result<Box<dyn Relax>, CCError> {
        if self.thread_num == Some(0) {
            return Err(CCError::InvalidThreadCount);
        }
        let strategy: Box<dyn Relax> = match self.strategy {
            StrategyKind::Sequential => Box::new(SequentialScan),
            StrategyKind::Chunked => {
                let thread_num = self.thread_num.ok_or(CCError::MissingThreadCount {
                    strategy: StrategyKind::Chunked.name(),
                })?;
                Box::new(ChunkedThreads::new(thread_num)?)
            }
            StrategyKind::Team => Box::new(StaticTeam::new(self.thread_num)?),
            StrategyKind::WorkStealing => Box::new(WorkStealing::new(self.thread_num)?),
        };
        Ok(strategy)
    }
}

/// One propagation pass over every vertex.
///
/// Implementations compute, for every vertex `v`, the minimum of `current[v]`
/// and the `current` labels of its neighbors, and store it in `next[v]`. They
/// read only `current` and write only `next`, which makes the outcome of a pass
/// independent of the order in which vertices are visited.
///
/// Both slices must hold one entry per vertex of `graph`.
pub trait Relax: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Number of workers a pass runs on.
    fn degree(&self) -> usize;

    /// Performs one pass and returns whether any label changed.
    fn relax(&self, graph: &CSRGraph, current: &[u32], next: &mut [u32]) -> bool;
}

impl<R: Relax + ?Sized> Relax for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn degree(&self) -> usize {
        (**self).degree()
    }

    fn relax(&self, graph: &CSRGraph, current: &[u32], next: &mut [u32]) -> bool {
        (**self).relax(graph, current, next)
    }
}

/// Smallest label among a vertex and its neighbors, read from `current`.
#[inline]
pub(crate) fn relax_vertex<G: GraphQuery + ?Sized>(graph: &G, current: &[u32], vertex: usize) -> u32 {
    graph
        .read_neighbor(vertex)
        .iter()
        .fold(current[vertex], |best, &neighbor| best.min(current[neighbor as usize]))
}

/// Relaxes the vertices `start..start + next.len()` into `next`.
///
/// Returns `true` if any of them got a smaller label.
pub(crate) fn relax_range(graph: &CSRGraph, current: &[u32], next: &mut [u32], start: usize) -> bool {
    let mut changed = false;
    for (vertex, slot) in (start..).zip(next.iter_mut()) {
        let best = relax_vertex(graph, current, vertex);
        changed |= best != current[vertex];
        *slot = best;
    }
    changed
}

/// Outcome of a converged propagation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CCResult {
    /// Final label of every vertex: the smallest vertex id of its component.
    pub labels: Vec<u32>,
    /// Passes performed, including the last pass that changed nothing.
    pub iterations: usize,
    /// Number of workers the strategy ran on.
    pub degree: usize,
}

impl CCResult {
    /// Number of distinct labels, i.e. connected components.
    pub fn component_count(&self) -> usize {
        count_components(&self.labels)
    }
}

/// The label propagation fixed-point loop over one graph.
///
/// Owns the two label buffers and the strategy; borrows the graph for the
/// whole run. Every [`Propagation::step`] runs one full pass and swaps the
/// buffers; [`Propagation::run`] steps until a pass changes nothing.
pub struct Propagation<'g, S> {
    graph: &'g CSRGraph,
    strategy: S,
    labels: LabelBuffers,
    iterations: usize,
}

impl<'g, S: Relax> Propagation<'g, S> {
    /// Starts from the identity labelling.
    pub fn new(graph: &'g CSRGraph, strategy: S) -> Self {
        Self {
            graph,
            strategy,
            labels: LabelBuffers::identity(graph.vertex_count),
            iterations: 0,
        }
    }

    /// Starts from an existing labelling, e.g. the result of an earlier run.
    ///
    /// # Errors
    /// Returns [`CCError::LabelLengthMismatch`] if `labels` does not hold
    /// exactly one entry per vertex.
    pub fn resume(graph: &'g CSRGraph, strategy: S, labels: Vec<u32>) -> Result<Self, CCError> {
        if labels.len() != graph.vertex_count {
            return Err(CCError::LabelLengthMismatch {
                expected: graph.vertex_count,
                found: labels.len(),
            });
        }
        Ok(Self {
            graph,
            strategy,
            labels: LabelBuffers::from_labels(labels),
            iterations: 0,
        })
    }

    /// Labels after the last completed pass.
    pub fn labels(&self) -> &[u32] {
        self.labels.current()
    }

    /// Passes performed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Runs one pass and returns whether any label changed.
    ///
    /// A graph without vertices has nothing to relax; no pass is counted.
    pub fn step(&mut self) -> bool {
        if self.labels.is_empty() {
            return false;
        }
        let (current, next) = self.labels.split();
        let changed = self.strategy.relax(self.graph, current, next);
        self.labels.swap();
        self.iterations += 1;
        debug!(iteration = self.iterations, changed, "propagation pass");
        changed
    }

    /// Steps until the labelling is a fixed point.
    #[instrument(skip_all, fields(strategy = self.strategy.name(), vertices = self.graph.vertex_count))]
    pub fn run(mut self) -> CCResult {
        while self.step() {}
        info!(
            iterations = self.iterations,
            degree = self.strategy.degree(),
            "propagation converged"
        );
        CCResult {
            degree: self.strategy.degree(),
            iterations: self.iterations,
            labels: self.labels.into_labels(),
        }
    }
}

/// Trait for computing connected components of an undirected graph.
///
/// # Methods
///
/// * `count_cc` - Returns the number of connected components.
/// * `cc` - Returns the converged labelling with run statistics.
pub trait CC {
    fn count_cc(&self, cc_config: &CCConfig) -> Result<usize, CCError>;
    fn cc(&self, cc_config: &CCConfig) -> Result<CCResult, CCError>;
}

/// Controller for connected components runs over one loaded graph.
///
/// # Fields
///
/// * `graph` - Shared read-only graph every run borrows.
pub struct CCController {
    graph: Arc<CSRGraph>,
}

impl CCController {
    /// Creates a new controller over the given graph.
    pub fn new(graph: Arc<CSRGraph>) -> Self {
        Self { graph }
    }

    /// The graph runs are performed on.
    pub fn graph(&self) -> &CSRGraph {
        &self.graph
    }

    /// Propagates labels to convergence with an already built strategy.
    ///
    /// Building a rayon pool is not part of the run, so callers timing the
    /// propagation build the strategy first and time only this call.
    pub fn run_with<S: Relax>(&self, strategy: S) -> CCResult {
        Propagation::new(&self.graph, strategy).run()
    }
}

impl CC for CCController {
    /// Returns the number of connected components under the given configuration.
    fn count_cc(&self, cc_config: &CCConfig) -> Result<usize, CCError> {
        Ok(self.cc(cc_config)?.component_count())
    }

    /// Builds the configured strategy and propagates labels to convergence.
    ///
    /// # Errors
    ///
    /// Fails only while building the strategy; the propagation itself cannot fail.
    fn cc(&self, cc_config: &CCConfig) -> Result<CCResult, CCError> {
        let strategy = cc_config.build_strategy()?;
        Ok(self.run_with(strategy))
    }
}
