use crate::error::GraphError;
use crate::types::graph_query::GraphQuery;

pub mod graph_query;
pub mod labels;
pub mod mtx;

pub use labels::LabelBuffers;
pub use mtx::LoadOptions;

/// A CSR (Compressed Sparse Row) representation of an undirected graph.
///
/// Vertex ids are continuous integers `0..vertex_count`. Every edge is stored
/// in both directions and self-loops are never present, so the neighbor list
/// of a vertex is its full undirected adjacency.
///
/// # Performance Notes
/// The layout is immutable once built. Neighbor lookups are a pair of offset
/// reads followed by a slice of `neighbor_list`, which keeps the relaxation
/// loop free of allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CSRGraph {
    /// Total number of vertices in the graph
    pub vertex_count: usize,

    /// Offset array that indicates where each vertex's adjacency list begins
    /// For each vertex i, its neighbors are stored in neighbor_list[offsets[i] to offsets[i+1]]
    /// Length: vertex_count + 1
    pub offsets: Vec<usize>,

    /// Flattened adjacency list containing all neighbors of all vertices
    /// Segmented according to the offsets array
    pub neighbor_list: Vec<u32>,
}

impl CSRGraph {
    /// Creates a graph with no vertices.
    pub fn empty() -> Self {
        Self {
            vertex_count: 0,
            offsets: vec![0],
            neighbor_list: Vec::new(),
        }
    }

    /// Assembles a graph from raw CSR arrays, checking every layout invariant.
    ///
    /// Symmetry of the adjacency is not re-checked here; callers handing in
    /// directed data get directed propagation.
    ///
    /// # Errors
    /// Returns [`GraphError`] if the offsets are not a non-decreasing sequence
    /// of `vertex_count + 1` values spanning `neighbor_list`, or if a neighbor
    /// id is not a vertex of the graph.
    pub fn from_parts(
        vertex_count: usize,
        offsets: Vec<usize>,
        neighbor_list: Vec<u32>,
    ) -> Result<Self, GraphError> {
        check_vertex_count(vertex_count as u64)?;
        if offsets.len() != vertex_count + 1 {
            return Err(GraphError::OffsetLength {
                expected: vertex_count + 1,
                found: offsets.len(),
            });
        }
        if offsets[0] != 0 {
            return Err(GraphError::OffsetStart { found: offsets[0] });
        }
        if let Some(vertex) = offsets.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(GraphError::OffsetOrder { vertex });
        }
        let last = offsets[vertex_count];
        if last != neighbor_list.len() {
            return Err(GraphError::OffsetEnd {
                last,
                len: neighbor_list.len(),
            });
        }
        if let Some(&vertex) = neighbor_list.iter().find(|&&u| u as usize >= vertex_count) {
            return Err(GraphError::VertexOutOfRange {
                vertex: u64::from(vertex),
                vertex_count,
            });
        }

        Ok(Self {
            vertex_count,
            offsets,
            neighbor_list,
        })
    }

    /// Builds an undirected graph from 0-based edge pairs.
    ///
    /// Self-loops are dropped and every remaining pair is inserted in both
    /// directions. Duplicate pairs are kept as parallel entries.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexOutOfRange`] if an endpoint is not below
    /// `vertex_count`, or [`GraphError::TooManyVertices`] if the vertex count
    /// does not fit a `u32` id.
    pub fn from_edges(vertex_count: usize, edges: &[(u32, u32)]) -> Result<Self, GraphError> {
        check_vertex_count(vertex_count as u64)?;

        // Step 1. Count the degree of every vertex, skipping self-loops.
        let mut degrees = vec![0usize; vertex_count];
        for &(src, dst) in edges {
            for endpoint in [src, dst] {
                if endpoint as usize >= vertex_count {
                    return Err(GraphError::VertexOutOfRange {
                        vertex: u64::from(endpoint),
                        vertex_count,
                    });
                }
            }
            if src != dst {
                degrees[src as usize] += 1;
                degrees[dst as usize] += 1;
            }
        }

        // Step 2. Prefix sum of degrees gives the offset array.
        let mut offsets = Vec::with_capacity(vertex_count + 1);
        offsets.push(0usize);
        let mut running = 0usize;
        for degree in &degrees {
            running += degree;
            offsets.push(running);
        }

        // Step 3. Fill the neighbor list with one cursor per vertex.
        let mut cursor = offsets[..vertex_count].to_vec();
        let mut neighbor_list = vec![0u32; running];
        for &(src, dst) in edges.iter().filter(|(src, dst)| src != dst) {
            neighbor_list[cursor[src as usize]] = dst;
            cursor[src as usize] += 1;
            neighbor_list[cursor[dst as usize]] = src;
            cursor[dst as usize] += 1;
        }

        Ok(Self {
            vertex_count,
            offsets,
            neighbor_list,
        })
    }

    /// Number of stored adjacency entries, i.e. twice the undirected edge count.
    pub fn edge_count(&self) -> usize {
        self.neighbor_list.len()
    }

    /// Returns `true` if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }
}

impl Default for CSRGraph {
    fn default() -> Self {
        Self::empty()
    }
}

fn check_vertex_count(vertex_count: u64) -> Result<(), GraphError> {
    if vertex_count > u64::from(u32::MAX) {
        return Err(GraphError::TooManyVertices { vertex_count });
    }
    Ok(())
}

impl GraphQuery for CSRGraph {
    #[inline]
    fn read_neighbor(&self, vertex_id: usize) -> &[u32] {
        if vertex_id >= self.vertex_count {
            return &[];
        }
        &self.neighbor_list[self.offsets[vertex_id]..self.offsets[vertex_id + 1]]
    }

    fn has_vertex(&self, vertex_id: usize) -> bool {
        vertex_id < self.vertex_count
    }

    fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}
