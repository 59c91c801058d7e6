//! Timing and reporting of connected components runs.
//!
//! A run is timed with [`measure`] and summarised as a [`RunRecord`], which
//! renders as human-readable status lines, as a CSV row or, through serde, as
//! YAML.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use tracing::info;

use crate::algorithms::cc::{CCResult, StrategyKind};
use crate::algorithms::count::largest_component;

/// Header line of the CSV report, one column per [`RunRecord`] field.
pub const CSV_HEADER: &str = "graph,vertices,edges,components,impl,threads,time,iterations";

/// A measured value together with the wall time it took to produce.
///
/// # Type Parameters
/// - `T`: The type of the return value from the measured closure.
#[derive(Debug)]
pub struct ExecutionResult<T> {
    pub result: T,
    pub duration: Duration,
}

/// Runs `f` and measures its wall time.
pub fn measure<F, R>(f: F) -> ExecutionResult<R>
where
    F: FnOnce() -> R,
{
    let start_time = Instant::now();
    let result = f();
    ExecutionResult {
        result,
        duration: start_time.elapsed(),
    }
}

/// Runs `f`, logs its wall time under `operation` and returns its value.
pub fn measure_and_log<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let execution = measure(f);
    info!(
        operation,
        elapsed_us = execution.duration.as_micros() as u64,
        "operation finished"
    );
    execution.result
}

/// Times a block and logs the elapsed time, yielding the block's value.
///
/// # Arguments
/// - `$name`: An expression that evaluates to a string slice naming the operation.
/// - `$code`: The block to run.
#[macro_export]
macro_rules! measure_logged {
    ($name:expr, $code:block) => {{
        $crate::report::measure_and_log($name, || $code)
    }};
}

/// Size of the largest component and the label that identifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComponentSize {
    pub label: u32,
    pub vertices: usize,
}

/// Summary of one strategy run over one graph.
///
/// Serialized field names follow the CSV columns, so the YAML report and the
/// CSV report carry the same keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    /// Name of the graph, usually the file stem.
    pub graph: String,
    pub vertices: usize,
    /// Stored neighbor entries, i.e. twice the undirected edge count.
    pub edges: usize,
    pub components: usize,
    /// Serialized as [`StrategyKind::impl_name`].
    #[serde(rename = "impl", serialize_with = "serialize_impl_name")]
    pub strategy: StrategyKind,
    pub threads: usize,
    /// Propagation time in seconds.
    pub time: f64,
    pub iterations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest: Option<ComponentSize>,
}

impl RunRecord {
    /// Builds the record of a finished run.
    pub fn new(
        graph: impl Into<String>,
        edges: usize,
        strategy: StrategyKind,
        run: &ExecutionResult<CCResult>,
    ) -> Self {
        let result = &run.result;
        Self {
            graph: graph.into(),
            vertices: result.labels.len(),
            edges,
            components: result.component_count(),
            strategy,
            threads: result.degree,
            time: run.duration.as_secs_f64(),
            iterations: result.iterations,
            largest: largest_component(&result.labels)
                .map(|(label, vertices)| ComponentSize { label, vertices }),
        }
    }

    /// The record as one CSV line matching [`CSV_HEADER`], without newline.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{:.6},{}",
            csv_field(&self.graph),
            self.vertices,
            self.edges,
            self.components,
            self.strategy.impl_name(),
            self.threads,
            self.time,
            self.iterations
        )
    }

    /// Status lines of the run, one per line, without trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "Using {} threads", self.threads);
        let _ = writeln!(
            text,
            "{} algorithm converged in {} iterations",
            strategy_title(self.strategy),
            self.iterations
        );
        let _ = writeln!(text, "Number of connected components: {}", self.components);
        if let Some(largest) = self.largest {
            let _ = writeln!(
                text,
                "Largest component: {} vertices (label {})",
                largest.vertices, largest.label
            );
        }
        let _ = write!(text, "Propagation time: {:.6} s", self.time);
        text
    }
}

/// The `Graph loaded` status line.
pub fn graph_summary(vertices: usize, edges: usize) -> String {
    format!("Graph loaded: {vertices} vertices, {edges} edges")
}

/// Serializes a list of run records as a YAML sequence.
///
/// # Errors
/// Returns the serializer error; plain records never produce one in practice.
pub fn to_yaml(records: &[RunRecord]) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(records)
}

fn serialize_impl_name<S: Serializer>(strategy: &StrategyKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(strategy.impl_name())
}

fn strategy_title(strategy: StrategyKind) -> &'static str {
    match strategy {
        StrategyKind::Sequential => "Sequential",
        StrategyKind::Chunked => "Chunked",
        StrategyKind::Team => "Team",
        StrategyKind::WorkStealing => "Work-stealing",
    }
}

/// Quotes a CSV field if it contains a separator, quote or line break.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_owned()
    }
}
