use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Violations of the CSR layout detected while assembling a [`crate::CSRGraph`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The offset array does not have `vertex_count + 1` entries.
    #[error("offset array has {found} entries, expected {expected}")]
    OffsetLength {
        /// Required number of offsets.
        expected: usize,
        /// Number of offsets supplied.
        found: usize,
    },
    /// The offset array does not start at zero.
    #[error("offset array must start at 0, found {found}")]
    OffsetStart {
        /// First offset supplied.
        found: usize,
    },
    /// An offset is smaller than its predecessor.
    #[error("offsets decrease at vertex {vertex}")]
    OffsetOrder {
        /// Vertex whose neighbor range ends before it starts.
        vertex: usize,
    },
    /// The last offset does not match the neighbor list length.
    #[error("last offset is {last}, but the neighbor list holds {len} entries")]
    OffsetEnd {
        /// Final offset supplied.
        last: usize,
        /// Length of the neighbor list.
        len: usize,
    },
    /// A neighbor or edge endpoint is not a vertex of the graph.
    #[error("vertex {vertex} is out of range for a graph of {vertex_count} vertices")]
    VertexOutOfRange {
        /// Offending vertex id.
        vertex: u64,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
    /// The graph has more vertices than a `u32` label can address.
    #[error("graph with {vertex_count} vertices exceeds the u32 vertex id space")]
    TooManyVertices {
        /// Requested number of vertices.
        vertex_count: u64,
    },
}

/// Failures raised while reading a Matrix Market file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input ended before a size line was found.
    #[error("file ended before header")]
    MissingHeader,
    /// The size line does not hold three integers.
    #[error("malformed header on line {line}: `{content}`")]
    MalformedHeader {
        /// 1-based line number of the header.
        line: usize,
        /// Raw header text.
        content: String,
    },
    /// The matrix is not square and cannot describe a graph.
    #[error("matrix must be square to represent a graph, found {rows}x{cols}")]
    NotSquare {
        /// Declared row count.
        rows: u64,
        /// Declared column count.
        cols: u64,
    },
    /// An entry line does not start with two integers.
    #[error("malformed entry on line {line}: `{content}`")]
    MalformedEntry {
        /// 1-based line number of the entry.
        line: usize,
        /// Raw entry text.
        content: String,
    },
    /// An entry refers to a row or column outside `1..=n`.
    #[error("entry ({row}, {col}) on line {line} is outside a {vertex_count}x{vertex_count} matrix")]
    EntryOutOfRange {
        /// 1-based line number of the entry.
        line: usize,
        /// 1-based row index.
        row: u64,
        /// 1-based column index.
        col: u64,
        /// Matrix dimension.
        vertex_count: u64,
    },
    /// The parsed entries could not be assembled into a CSR graph.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Failures raised while preparing a label propagation run.
#[derive(Debug, Error)]
pub enum CCError {
    /// A worker count of zero was requested.
    #[error("thread count must be greater than zero")]
    InvalidThreadCount,
    /// The chunked strategy was selected without a worker count.
    #[error("the {strategy} strategy requires a thread count")]
    MissingThreadCount {
        /// Name of the strategy that needs the count.
        strategy: &'static str,
    },
    /// Rayon refused to build the worker pool.
    #[error("failed to build worker pool: {source}")]
    ThreadPool {
        /// Error reported by rayon.
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
    /// Starting labels do not cover every vertex exactly once.
    #[error("starting labels hold {found} entries, but the graph has {expected} vertices")]
    LabelLengthMismatch {
        /// Number of vertices in the graph.
        expected: usize,
        /// Number of labels supplied.
        found: usize,
    },
}
