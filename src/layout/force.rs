//! Fruchterman-Reingold force-directed layout
//!
//! Repulsion between all vertex pairs, attraction along edges, displacement
//! capped by a temperature that cools over a fixed number of iterations.
//! Components small enough to bin are laid out independently inside grid
//! bins before the main pass runs on whatever is left.

use super::binner::RectangleBinner;
use super::Rect;
use crate::algo::components_ascending_by_size;
use crate::graph::{Graph, Location, VertexId};
use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Tunables for the layout engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Force-directed iterations per pass
    pub iterations: usize,

    /// Empty border kept inside the layout rectangle
    pub margin: f64,

    /// Components with at most this many vertices are placed in bins
    pub max_vertices_per_bin: usize,

    /// Side length of each square bin
    pub bin_length: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            iterations: 10,
            margin: 6.0,
            max_vertices_per_bin: 3,
            bin_length: 16.0,
        }
    }
}

/// What a layout pass did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOutcome {
    /// Components placed into bins
    pub binned_components: usize,
    /// Rectangle the non-binned remainder was laid out in
    pub remaining_rect: Rect,
}

/// Force-directed layout engine
#[derive(Debug, Clone, Default)]
pub struct ForceDirectedLayout {
    pub config: LayoutConfig,
}

impl ForceDirectedLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        ForceDirectedLayout { config }
    }

    /// Assign locations to every vertex inside `rect`
    ///
    /// Components are visited in ascending vertex-count order so the
    /// smallest ones claim bins first; anything over the threshold, or left
    /// without a bin, is laid out together in the remaining rectangle.
    /// Initial positions are randomized unless the graph is already marked
    /// laid out. Marks the graph laid out on completion.
    pub fn lay_out(&self, graph: &mut Graph, rect: Rect) -> LayoutOutcome {
        if graph.is_empty() {
            return LayoutOutcome {
                binned_components: 0,
                remaining_rect: rect,
            };
        }

        let randomize = !graph.is_laid_out();
        let components = components_ascending_by_size(graph);
        let mut binner = RectangleBinner::new(rect, self.config.bin_length);
        let mut remainder: Vec<VertexId> = Vec::new();
        let mut binned_components = 0;

        for component in components {
            if component.len() <= self.config.max_vertices_per_bin {
                if let Some(bin) = binner.next_bin() {
                    self.lay_out_subset(graph, &component, bin, randomize);
                    binned_components += 1;
                    continue;
                }
            }
            remainder.extend(component);
        }

        let remaining_rect = if binned_components == 0 {
            rect
        } else {
            // Bins can eat the whole rectangle; fall back to all of it.
            binner.remaining_rect().unwrap_or(rect)
        };

        if !remainder.is_empty() {
            self.lay_out_subset(graph, &remainder, remaining_rect, randomize);
        }

        debug!(
            "laid out {} vertices ({} binned components)",
            graph.vertex_count(),
            binned_components
        );
        graph.mark_laid_out();

        LayoutOutcome {
            binned_components,
            remaining_rect,
        }
    }

    /// Run the force-directed pass on a vertex subset within a rectangle
    fn lay_out_subset(&self, graph: &mut Graph, vertices: &[VertexId], rect: Rect, randomize: bool) {
        if vertices.is_empty() {
            return;
        }

        let bounds = rect.inset(self.config.margin);

        if vertices.len() == 1 {
            if let Some(vertex) = graph.vertex_mut(vertices[0]) {
                vertex.set_location(bounds.center());
            }
            return;
        }

        let mut index_of: FxHashMap<VertexId, usize> = FxHashMap::default();
        for (i, &id) in vertices.iter().enumerate() {
            index_of.insert(id, i);
        }

        // Edges with both endpoints in the subset, self-loops skipped
        let mut springs: Vec<(usize, usize)> = Vec::new();
        for edge in graph.edges() {
            if edge.is_self_loop() {
                continue;
            }
            if let (Some(&i), Some(&j)) = (index_of.get(&edge.source), index_of.get(&edge.target)) {
                springs.push((i, j));
            }
        }

        let n = vertices.len();
        let mut positions: Vec<Location> = Vec::with_capacity(n);
        if randomize {
            let mut rng = rand::thread_rng();
            for _ in 0..n {
                positions.push(Location::new(
                    rng.gen_range(bounds.left..=bounds.right()),
                    rng.gen_range(bounds.top..=bounds.bottom()),
                ));
            }
        } else {
            for &id in vertices {
                let location = graph.vertex(id).map(|v| v.location).unwrap_or_default();
                positions.push(location);
            }
        }

        let area = (bounds.width * bounds.height).max(f64::EPSILON);
        let k = (area / n as f64).sqrt().max(1e-9);
        let mut temperature = bounds.width.max(bounds.height) / 10.0;
        let cooling = temperature / (self.config.iterations as f64 + 1.0);

        for _ in 0..self.config.iterations {
            let mut displacement = vec![(0.0f64, 0.0f64); n];

            // Repulsion between all pairs
            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = positions[i].x - positions[j].x;
                    let dy = positions[i].y - positions[j].y;
                    let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                    let force = k * k / dist;
                    let (ux, uy) = (dx / dist, dy / dist);
                    displacement[i].0 += ux * force;
                    displacement[i].1 += uy * force;
                    displacement[j].0 -= ux * force;
                    displacement[j].1 -= uy * force;
                }
            }

            // Attraction along edges
            for &(i, j) in &springs {
                let dx = positions[i].x - positions[j].x;
                let dy = positions[i].y - positions[j].y;
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let force = dist * dist / k;
                let (ux, uy) = (dx / dist, dy / dist);
                displacement[i].0 -= ux * force;
                displacement[i].1 -= uy * force;
                displacement[j].0 += ux * force;
                displacement[j].1 += uy * force;
            }

            // Apply, capped by the temperature, clamped into bounds
            for i in 0..n {
                let (dx, dy) = displacement[i];
                let length = (dx * dx + dy * dy).sqrt();
                if length > 0.0 {
                    let capped = length.min(temperature);
                    positions[i].x += dx / length * capped;
                    positions[i].y += dy / length * capped;
                }
                positions[i].x = positions[i].x.clamp(bounds.left, bounds.right());
                positions[i].y = positions[i].y.clamp(bounds.top, bounds.bottom());
            }

            temperature = (temperature - cooling).max(0.0);
        }

        for (i, &id) in vertices.iter().enumerate() {
            if let Some(vertex) = graph.vertex_mut(id) {
                vertex.set_location(positions[i]);
            }
        }
    }
}
