//! Shared utilities for graph algorithms
//!
//! Provides a read-only, dense view of the graph topology for algorithm
//! execution.

use crate::graph::{Graph, VertexId};
use rustc_hash::FxHashMap;

/// A dense, integer-indexed view of the graph topology.
///
/// Traversal algorithms iterate over vertices and neighbors far more often
/// than they do random lookups, so the id-keyed store is projected onto
/// dense indices (0..N) with plain adjacency vectors.
///
/// Edge direction flags are ignored: two vertices are neighbors when any
/// edge is incident to both. Parallel edges produce repeated neighbor
/// entries; visited bookkeeping in the algorithms absorbs them.
pub struct GraphView {
    /// Number of vertices
    pub vertex_count: usize,
    /// Mapping from dense index (0..N) back to VertexId
    pub index_to_vertex: Vec<VertexId>,
    /// Mapping from VertexId to dense index
    pub vertex_to_index: FxHashMap<VertexId, usize>,
    /// Neighbors by dense index, both directions merged
    pub neighbors: Vec<Vec<usize>>,
}

impl GraphView {
    /// Build a view over every vertex of the graph
    pub fn new(graph: &Graph) -> Self {
        let ids: Vec<VertexId> = graph.vertices().map(|v| v.id).collect();
        Self::build(graph, ids)
    }

    /// Build a view over a vertex subset
    ///
    /// Edges with an endpoint outside the subset are ignored.
    pub fn of_subset(graph: &Graph, subset: &[VertexId]) -> Self {
        Self::build(graph, subset.to_vec())
    }

    fn build(graph: &Graph, ids: Vec<VertexId>) -> Self {
        let mut vertex_to_index = FxHashMap::default();
        vertex_to_index.reserve(ids.len());
        for (idx, id) in ids.iter().enumerate() {
            vertex_to_index.insert(*id, idx);
        }

        let vertex_count = ids.len();
        let mut neighbors = vec![Vec::new(); vertex_count];

        for edge in graph.edges() {
            let (Some(&u), Some(&v)) = (
                vertex_to_index.get(&edge.source),
                vertex_to_index.get(&edge.target),
            ) else {
                continue;
            };
            if u == v {
                // Self-loop: a vertex is trivially its own neighbor; skip it
                // so traversals don't revisit.
                continue;
            }
            neighbors[u].push(v);
            neighbors[v].push(u);
        }

        Self {
            vertex_count,
            index_to_vertex: ids,
            vertex_to_index,
            neighbors,
        }
    }

    /// Number of incident non-self-loop edge endpoints at a vertex (by index)
    pub fn degree(&self, idx: usize) -> usize {
        self.neighbors[idx].len()
    }
}
