//! Matrix Market loader.
//!
//! Reads the coordinate form of a square sparse matrix and turns its pattern
//! into an undirected [`CSRGraph`]:
//!
//! ```text
//! %%MatrixMarket matrix coordinate pattern general
//! % any number of comment lines
//! 4 4 3          <- rows cols nonzeros
//! 1 2            <- row col [value], 1-based
//! 2 3
//! 3 4
//! ```
//!
//! Values after the two indices are ignored, self-loops are dropped and every
//! entry is inserted in both directions.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, instrument, warn};

use crate::config::{PROGRESS_TEMPLATE, READ_BUFFER_SIZE};
use crate::error::{GraphError, LoadError};
use crate::types::CSRGraph;

/// Upper bound on the edge buffer reserved from the declared nonzero count.
const MAX_EDGE_RESERVATION: u64 = 1 << 24;

/// Options controlling how a graph file is loaded.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Draw a progress bar on stderr while entries are parsed.
    pub show_progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            show_progress: true,
        }
    }
}

impl CSRGraph {
    /// Loads a graph from a Matrix Market file.
    ///
    /// # Errors
    /// Returns [`LoadError::Io`] if the file cannot be opened or read, and the
    /// format variants of [`LoadError`] if the header or an entry is invalid.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_mtx_file(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        parse_mtx(reader, path, options)
    }

    /// Loads a graph from Matrix Market text supplied by a reader.
    ///
    /// # Errors
    /// Same as [`CSRGraph::from_mtx_file`], with I/O errors reported against
    /// the placeholder path `<reader>`.
    pub fn from_mtx_reader<R: BufRead>(reader: R, options: LoadOptions) -> Result<Self, LoadError> {
        parse_mtx(reader, Path::new("<reader>"), options)
    }
}

fn parse_mtx<R: BufRead>(reader: R, path: &Path, options: LoadOptions) -> Result<CSRGraph, LoadError> {
    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut lines = reader.lines().enumerate();

    // Step 1. Skip comments and blank lines up to the size line.
    let (header_line, header) = loop {
        let Some((index, line)) = lines.next() else {
            return Err(LoadError::MissingHeader);
        };
        let line = line.map_err(io_error)?;
        if is_skippable(&line) {
            continue;
        }
        break (index + 1, line);
    };

    let [rows, cols, nonzeros] =
        parse_fields::<3>(&header).ok_or_else(|| LoadError::MalformedHeader {
            line: header_line,
            content: header.trim().to_owned(),
        })?;
    if rows != cols {
        return Err(LoadError::NotSquare { rows, cols });
    }
    if rows > u64::from(u32::MAX) {
        return Err(GraphError::TooManyVertices { vertex_count: rows }.into());
    }
    let vertex_count = rows;

    let pb = if options.show_progress {
        ProgressBar::new(nonzeros)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb.set_message("Graph Loading.");

    // Step 2. Collect 0-based entries.
    let mut edges = Vec::<(u32, u32)>::with_capacity(nonzeros.min(MAX_EDGE_RESERVATION) as usize);
    for (index, line) in lines {
        let line = line.map_err(io_error)?;
        if is_skippable(&line) {
            continue;
        }
        let [row, col] = parse_fields::<2>(&line).ok_or_else(|| LoadError::MalformedEntry {
            line: index + 1,
            content: line.trim().to_owned(),
        })?;
        let in_range = |i: u64| (1..=vertex_count).contains(&i);
        if !in_range(row) || !in_range(col) {
            return Err(LoadError::EntryOutOfRange {
                line: index + 1,
                row,
                col,
                vertex_count,
            });
        }
        // Both indices are at most u32::MAX, so the 0-based values fit.
        edges.push(((row - 1) as u32, (col - 1) as u32));
        pb.inc(1);
    }
    pb.finish_with_message("Graph Loaded.");

    if edges.len() as u64 != nonzeros {
        warn!(
            declared = nonzeros,
            found = edges.len(),
            "entry count differs from header"
        );
    }

    // Step 3. Symmetrize into CSR.
    let graph = CSRGraph::from_edges(vertex_count as usize, &edges)?;
    info!(
        vertices = graph.vertex_count,
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('%')
}

/// Parses the first `N` whitespace-separated fields of a line as integers.
fn parse_fields<const N: usize>(line: &str) -> Option<[u64; N]> {
    let mut tokens = line.split_whitespace();
    let mut fields = [0u64; N];
    for field in &mut fields {
        *field = tokens.next()?.parse().ok()?;
    }
    Some(fields)
}

#[cfg(test)]
mod test_mtx {
    use std::io::Cursor;

    use super::*;
    use crate::types::graph_query::GraphQuery;

    fn quiet() -> LoadOptions {
        LoadOptions {
            show_progress: false,
        }
    }

    fn load(text: &str) -> Result<CSRGraph, LoadError> {
        CSRGraph::from_mtx_reader(Cursor::new(text), quiet())
    }

    /// Tests the file loading functionality against the path fixture.
    #[test]
    fn test_read_from_file() {
        let graph = CSRGraph::from_mtx_file("data/path4.mtx", quiet()).unwrap();
        assert_eq!(4, graph.vertex_count);
        assert_eq!(5, graph.offsets.len());
        assert_eq!(6, graph.neighbor_list.len());
        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(3, 2));
    }

    #[test]
    fn test_banner_comments_and_weights() {
        let graph = load(
            "%%MatrixMarket matrix coordinate real general\n\
             % a comment\n\
             \n\
             3 3 2\n\
             1 2 0.5\n\
             % trailing comment\n\
             3 2 1e-3\n",
        )
        .unwrap();
        assert_eq!(graph.vertex_count, 3);
        assert_eq!(graph.read_neighbor(1), &[0, 2]);
    }

    #[test]
    fn test_self_loops_dropped() {
        let graph = load("2 2 3\n1 1\n1 2\n2 2\n").unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.read_neighbor(0), &[1]);
    }

    #[test]
    fn test_header_without_entries() {
        let graph = load("% comment\n5 5 0\n").unwrap();
        assert_eq!(graph.vertex_count, 5);
        assert_eq!(graph.edge_count(), 0);

        let empty = load("0 0 0\n").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(load(""), Err(LoadError::MissingHeader)));
        assert!(matches!(load("% only\n%comments\n"), Err(LoadError::MissingHeader)));
    }

    #[test]
    fn test_malformed_header() {
        let err = load("%c\n3 3\n").unwrap_err();
        assert!(matches!(err, LoadError::MalformedHeader { line: 2, .. }), "{err}");
        assert!(matches!(load("a b c\n"), Err(LoadError::MalformedHeader { line: 1, .. })));
    }

    #[test]
    fn test_non_square_rejected() {
        let err = load("3 4 1\n1 2\n").unwrap_err();
        assert!(matches!(err, LoadError::NotSquare { rows: 3, cols: 4 }));
        assert_eq!(err.to_string(), "matrix must be square to represent a graph, found 3x4");
    }

    #[test]
    fn test_bad_entries() {
        assert!(matches!(
            load("2 2 1\n1 x\n"),
            Err(LoadError::MalformedEntry { line: 2, .. })
        ));
        assert!(matches!(
            load("2 2 1\n1 3\n"),
            Err(LoadError::EntryOutOfRange { line: 2, row: 1, col: 3, vertex_count: 2 })
        ));
        assert!(matches!(
            load("2 2 1\n0 1\n"),
            Err(LoadError::EntryOutOfRange { row: 0, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = CSRGraph::from_mtx_file("data/does-not-exist.mtx", quiet()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_parse_fields() {
        assert_eq!(parse_fields::<2>(" 4   7 1.0"), Some([4, 7]));
        assert_eq!(parse_fields::<3>("4 7"), None);
        assert_eq!(parse_fields::<2>("-1 2"), None);
    }
}
