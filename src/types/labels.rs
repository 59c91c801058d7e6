use std::mem;

/// The pair of label buffers a propagation run works on.
///
/// `current` holds the labelling produced by the last completed pass and is
/// only read during a pass; `next` receives the labels computed by the pass.
/// [`LabelBuffers::swap`] exchanges the two buffers without copying, so after
/// a pass the freshly written labels become `current`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelBuffers {
    current: Vec<u32>,
    next: Vec<u32>,
}

impl LabelBuffers {
    /// Creates buffers for `vertex_count` vertices with every vertex labelled by its own id.
    pub fn identity(vertex_count: usize) -> Self {
        // Vertex counts are capped at u32::MAX by the graph constructors.
        let current: Vec<u32> = (0..vertex_count as u32).collect();
        let next = vec![0u32; vertex_count];
        Self { current, next }
    }

    /// Creates buffers that start from an existing labelling.
    pub fn from_labels(labels: Vec<u32>) -> Self {
        let next = vec![0u32; labels.len()];
        Self {
            current: labels,
            next,
        }
    }

    /// Number of labelled vertices.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Returns `true` if there are no vertices to label.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// The labelling produced by the last completed pass.
    pub fn current(&self) -> &[u32] {
        &self.current
    }

    /// Borrows `current` for reading and `next` for writing at the same time.
    pub fn split(&mut self) -> (&[u32], &mut [u32]) {
        (&self.current, &mut self.next)
    }

    /// Exchanges `current` and `next`.
    pub fn swap(&mut self) {
        mem::swap(&mut self.current, &mut self.next);
    }

    /// Consumes the buffers and returns the current labelling.
    pub fn into_labels(self) -> Vec<u32> {
        self.current
    }
}
