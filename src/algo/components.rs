//! Connected-component decomposition
//!
//! "Connected" here means reachable through incident edges with direction
//! ignored, not Tarjan-style strong connectivity.

use super::view::GraphView;
use crate::graph::{Graph, VertexId};

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            self.parent[i] = self.find(self.parent[i]); // Path compression
        }
        self.parent[i]
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Decompose a graph into connected components
///
/// Every vertex appears in exactly one group and the union of the groups is
/// the graph's vertex set. Groups are ordered by first appearance of a
/// member in insertion order, as are the vertices within each group. O(V+E).
pub fn connected_components(graph: &Graph) -> Vec<Vec<VertexId>> {
    components_of_view(&GraphView::new(graph))
}

/// Decompose a vertex subset into connected components
///
/// Only edges with both endpoints in the subset connect vertices.
pub fn connected_components_of(graph: &Graph, subset: &[VertexId]) -> Vec<Vec<VertexId>> {
    components_of_view(&GraphView::of_subset(graph, subset))
}

/// Components sorted ascending by vertex count
///
/// The layout binner consumes components smallest-first, so ties keep the
/// first-appearance order (the sort is stable).
pub fn components_ascending_by_size(graph: &Graph) -> Vec<Vec<VertexId>> {
    let mut components = connected_components(graph);
    components.sort_by_key(|component| component.len());
    components
}

fn components_of_view(view: &GraphView) -> Vec<Vec<VertexId>> {
    let n = view.vertex_count;
    let mut uf = UnionFind::new(n);

    for u in 0..n {
        for &v in &view.neighbors[u] {
            uf.union(u, v);
        }
    }

    // Group by root, keeping first-appearance order
    let mut root_to_group: Vec<Option<usize>> = vec![None; n];
    let mut groups: Vec<Vec<VertexId>> = Vec::new();

    for i in 0..n {
        let root = uf.find(i);
        let group_idx = match root_to_group[root] {
            Some(idx) => idx,
            None => {
                root_to_group[root] = Some(groups.len());
                groups.push(Vec::new());
                groups.len() - 1
            }
        };
        groups[group_idx].push(view.index_to_vertex[i]);
    }

    groups
}
