//! Layout save/restore and grid snapping

use crate::graph::{Graph, Location, VertexId};
use serde::{Deserialize, Serialize};

/// A vertex-id -> coordinate capture of a laid-out graph
///
/// Restoring puts back exactly the captured coordinates; vertices absent
/// from the snapshot (or since removed from the graph) are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    entries: Vec<(VertexId, Location)>,
}

impl LayoutSnapshot {
    /// Capture the current location of every vertex
    pub fn capture(graph: &Graph) -> Self {
        LayoutSnapshot {
            entries: graph.vertices().map(|v| (v.id, v.location)).collect(),
        }
    }

    /// Apply the captured coordinates, returning how many vertices matched
    pub fn restore(&self, graph: &mut Graph) -> usize {
        let mut restored = 0;
        for &(id, location) in &self.entries {
            if let Some(vertex) = graph.vertex_mut(id) {
                vertex.set_location(location);
                restored += 1;
            }
        }
        restored
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Round every vertex coordinate to the nearest multiple of `grid_size`
///
/// Used to deduplicate visually-overlapping vertices. A non-positive grid
/// size leaves the graph untouched.
pub fn snap_to_grid(graph: &mut Graph, grid_size: f64) {
    if grid_size <= 0.0 {
        return;
    }

    for id in graph.vertex_ids() {
        if let Some(vertex) = graph.vertex_mut(id) {
            let snapped = Location::new(
                (vertex.location.x / grid_size).round() * grid_size,
                (vertex.location.y / grid_size).round() * grid_size,
            );
            vertex.set_location(snapped);
        }
    }
}
