/// Read-only queries over an in-memory graph.
///
/// This trait is what the propagation strategies are written against: each
/// vertex update reads the neighbor slice of one vertex and nothing else.
/// Vertex ids are dense `usize` indices; neighbor entries are `u32` ids.
pub trait GraphQuery {
    /// Retrieves all neighbors of a given vertex.
    ///
    /// # Parameters
    ///
    /// * `vertex_id` - The vertex whose neighbors are being queried.
    ///
    /// # Returns
    ///
    /// The neighbor slice, empty if the vertex does not exist or has no
    /// neighbors.
    fn read_neighbor(&self, vertex_id: usize) -> &[u32];

    /// Checks if a specific vertex exists in the graph.
    fn has_vertex(&self, vertex_id: usize) -> bool;

    /// Number of vertices in the graph.
    fn vertex_count(&self) -> usize;

    /// Number of neighbor entries of a vertex.
    fn degree(&self, vertex_id: usize) -> usize {
        self.read_neighbor(vertex_id).len()
    }

    /// Determines if an edge exists between two specified vertices.
    ///
    /// # Returns
    ///
    /// `true` if `dst_id` appears in the neighbor list of `src_id`.
    fn has_edge(&self, src_id: usize, dst_id: usize) -> bool {
        self.has_vertex(src_id)
            && self
                .read_neighbor(src_id)
                .iter()
                .any(|&vertex_id| vertex_id as usize == dst_id)
    }

    /// Retrieves the ids of all vertices in the graph.
    fn vertex_list(&self) -> Vec<usize> {
        (0..self.vertex_count()).collect()
    }
}
