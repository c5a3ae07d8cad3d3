//! Structural graph metrics
//!
//! Density, duplicate-edge detection, connected-component statistics and
//! geodesic distances, computed as one pass with cooperative cancellation.
//! The calculator is designed to run on a worker thread while the owning
//! thread keeps interacting with its collaborators; the cancel flag is
//! polled between phases, never preemptively.

mod geodesic;

pub use geodesic::{BfsProvider, ExternalToolProvider, GeodesicProvider};

use crate::algo::connected_components;
use crate::graph::{Directedness, Graph, VertexId};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while computing metrics
///
/// External-tool failures abort the whole computation; there are no partial
/// results.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("I/O error while invoking the geodesic tool: {0}")]
    Io(#[from] std::io::Error),

    #[error("Geodesic tool exited with status {status:?}")]
    ToolFailed { status: Option<i32> },

    #[error("Geodesic tool did not finish within {seconds} seconds")]
    ToolTimeout { seconds: u64 },

    #[error("Malformed geodesic tool output: {0}")]
    MalformedToolOutput(String),
}

pub type MetricsResult<T> = Result<T, MetricsError>;

/// Shared flag for cooperative cancellation
///
/// Cloned into whatever thread runs the computation; the calculator polls
/// it before each expensive phase.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the computation holding this flag
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a cancelable computation
///
/// Cancellation is a distinct no-result outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Computation<T> {
    Complete(T),
    Canceled,
}

impl<T> Computation<T> {
    pub fn is_canceled(&self) -> bool {
        matches!(self, Computation::Canceled)
    }

    /// The completed value, or `None` when canceled
    pub fn into_complete(self) -> Option<T> {
        match self {
            Computation::Complete(value) => Some(value),
            Computation::Canceled => None,
        }
    }
}

/// Maximum and average shortest-path length over the graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicStats {
    pub maximum: f64,
    pub average: f64,
}

/// Edge classification counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeTally {
    /// Endpoint-pair groups, counting parallel edges once
    pub unique_edges: usize,
    /// Edges belonging to a group with more than one member
    pub edges_with_duplicates: usize,
    /// Edges whose endpoints are the same vertex
    pub self_loops: usize,
}

/// Connected-component statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComponentSummary {
    pub component_count: usize,
    /// Components consisting of a single vertex
    pub singleton_count: usize,
    /// Vertices in the largest component
    pub max_component_vertices: usize,
    /// Unique edges in the most edge-rich component (each edge counted
    /// once even though it is reachable from both endpoints)
    pub max_component_edges: usize,
}

/// Per-vertex degree statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeStats {
    pub minimum: usize,
    pub maximum: usize,
    pub average: f64,
}

/// Full structural-metrics result object
#[derive(Debug, Clone, PartialEq)]
pub struct GraphMetrics {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub edges: EdgeTally,
    /// `None` when the graph has one vertex or fewer
    pub density: Option<f64>,
    pub components: ComponentSummary,
    /// `None` when the graph has no vertices
    pub degrees: Option<DegreeStats>,
    /// `None` when the graph has no vertices
    pub geodesic: Option<GeodesicStats>,
}

/// Computes the full [`GraphMetrics`] for a graph
///
/// The geodesic phase is delegated to a pluggable [`GeodesicProvider`];
/// the in-process [`BfsProvider`] is the default, with
/// [`ExternalToolProvider`] available for the subprocess pipeline.
pub struct MetricsCalculator {
    geodesic: Box<dyn GeodesicProvider>,
}

impl MetricsCalculator {
    pub fn new() -> Self {
        MetricsCalculator {
            geodesic: Box::new(BfsProvider),
        }
    }

    pub fn with_provider(provider: Box<dyn GeodesicProvider>) -> Self {
        MetricsCalculator { geodesic: provider }
    }

    /// Compute all metrics, polling the cancel flag between phases
    pub fn compute(
        &self,
        graph: &Graph,
        cancel: &CancelFlag,
    ) -> MetricsResult<Computation<GraphMetrics>> {
        if cancel.is_canceled() {
            return Ok(Computation::Canceled);
        }
        let edges = edge_tally(graph);
        let density = density(graph, &edges);

        if cancel.is_canceled() {
            return Ok(Computation::Canceled);
        }
        let components = component_summary(graph);

        if cancel.is_canceled() {
            return Ok(Computation::Canceled);
        }
        let degrees = degree_stats(graph);

        if cancel.is_canceled() {
            return Ok(Computation::Canceled);
        }
        let geodesic = if graph.is_empty() {
            None
        } else {
            self.geodesic.compute(graph)?
        };

        let metrics = GraphMetrics {
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
            edges,
            density,
            components,
            degrees,
            geodesic,
        };
        info!(
            "computed metrics: {} vertices, {} edges, {} components",
            metrics.vertex_count, metrics.edge_count, metrics.components.component_count
        );
        Ok(Computation::Complete(metrics))
    }
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Group edges by normalized endpoint pair and classify them
fn edge_tally(graph: &Graph) -> EdgeTally {
    let mut groups: FxHashMap<(VertexId, VertexId, bool), usize> = FxHashMap::default();
    let mut self_loops = 0;

    for edge in graph.edges() {
        if edge.is_self_loop() {
            self_loops += 1;
        }
        *groups.entry(edge.grouping_key()).or_insert(0) += 1;
    }

    let edges_with_duplicates = groups
        .values()
        .filter(|&&count| count > 1)
        .sum::<usize>();

    EdgeTally {
        unique_edges: groups.len(),
        edges_with_duplicates,
        self_loops,
    }
}

/// Ratio of actual to possible edges, self-loops excluded
///
/// Undirected: `2E / (V * (V-1))`. The directed case halves that, since the
/// directed edge capacity is doubled. Undefined for V <= 1. Rounding
/// artifacts below zero are clamped.
fn density(graph: &Graph, edges: &EdgeTally) -> Option<f64> {
    let v = graph.vertex_count();
    if v <= 1 {
        return None;
    }

    let non_self_loop_edges = (graph.edge_count() - edges.self_loops) as f64;
    let v = v as f64;
    let mut density = 2.0 * non_self_loop_edges / (v * (v - 1.0));
    if graph.directedness() != Directedness::Undirected {
        density /= 2.0;
    }
    Some(density.max(0.0))
}

fn component_summary(graph: &Graph) -> ComponentSummary {
    let components = connected_components(graph);
    if components.is_empty() {
        return ComponentSummary::default();
    }

    let mut vertex_component: FxHashMap<VertexId, usize> = FxHashMap::default();
    for (idx, component) in components.iter().enumerate() {
        for &id in component {
            vertex_component.insert(id, idx);
        }
    }

    // Each edge lands in exactly one component, so counting this way counts
    // every edge once.
    let mut edge_counts = vec![0usize; components.len()];
    for edge in graph.edges() {
        if let Some(&idx) = vertex_component.get(&edge.source) {
            edge_counts[idx] += 1;
        }
    }

    ComponentSummary {
        component_count: components.len(),
        singleton_count: components.iter().filter(|c| c.len() == 1).count(),
        max_component_vertices: components.iter().map(|c| c.len()).max().unwrap_or(0),
        max_component_edges: edge_counts.iter().copied().max().unwrap_or(0),
    }
}

fn degree_stats(graph: &Graph) -> Option<DegreeStats> {
    if graph.is_empty() {
        return None;
    }

    let mut minimum = usize::MAX;
    let mut maximum = 0;
    let mut total = 0usize;
    for vertex in graph.vertices() {
        let degree = graph.degree(vertex.id);
        minimum = minimum.min(degree);
        maximum = maximum.max(degree);
        total += degree;
    }

    Some(DegreeStats {
        minimum,
        maximum,
        average: total as f64 / graph.vertex_count() as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        let mut graph = Graph::new_undirected();
        let v1 = graph.add_vertex();
        let v2 = graph.add_vertex();
        let v3 = graph.add_vertex();
        graph.add_edge(v1, v2, false).unwrap();
        graph.add_edge(v2, v3, false).unwrap();
        graph.add_edge(v3, v1, false).unwrap();
        graph
    }

    #[test]
    fn test_triangle_density_is_one() {
        let graph = triangle();
        let metrics = MetricsCalculator::new()
            .compute(&graph, &CancelFlag::new())
            .unwrap()
            .into_complete()
            .unwrap();
        assert_eq!(metrics.density, Some(1.0));
    }

    #[test]
    fn test_density_undefined_for_tiny_graphs() {
        let mut graph = Graph::new_undirected();
        let calc = MetricsCalculator::new();
        let metrics = calc
            .compute(&graph, &CancelFlag::new())
            .unwrap()
            .into_complete()
            .unwrap();
        assert_eq!(metrics.density, None);

        graph.add_vertex();
        let metrics = calc
            .compute(&graph, &CancelFlag::new())
            .unwrap()
            .into_complete()
            .unwrap();
        assert_eq!(metrics.density, None);
    }

    #[test]
    fn test_directed_density_halved() {
        let mut graph = Graph::new_directed();
        let v1 = graph.add_vertex();
        let v2 = graph.add_vertex();
        graph.add_edge(v1, v2, true).unwrap();

        let metrics = MetricsCalculator::new()
            .compute(&graph, &CancelFlag::new())
            .unwrap()
            .into_complete()
            .unwrap();
        // Undirected formula would give 1.0; directed halves it
        assert_eq!(metrics.density, Some(0.5));
    }

    #[test]
    fn test_self_loops_excluded_from_density() {
        let mut graph = Graph::new_undirected();
        let v1 = graph.add_vertex();
        let v2 = graph.add_vertex();
        graph.add_edge(v1, v2, false).unwrap();
        graph.add_edge(v1, v1, false).unwrap();

        let metrics = MetricsCalculator::new()
            .compute(&graph, &CancelFlag::new())
            .unwrap()
            .into_complete()
            .unwrap();
        assert_eq!(metrics.density, Some(1.0));
        assert_eq!(metrics.edges.self_loops, 1);
    }

    #[test]
    fn test_duplicate_edge_tally() {
        let mut graph = Graph::new_undirected();
        let v1 = graph.add_vertex();
        let v2 = graph.add_vertex();
        let v3 = graph.add_vertex();
        graph.add_edge(v1, v2, false).unwrap();
        graph.add_edge(v2, v1, false).unwrap(); // duplicate of the first
        graph.add_edge(v2, v3, false).unwrap();

        let tally = edge_tally(&graph);
        assert_eq!(tally.unique_edges, 2);
        assert_eq!(tally.edges_with_duplicates, 2);
        assert_eq!(tally.self_loops, 0);
    }

    #[test]
    fn test_directed_reverse_is_not_duplicate() {
        let mut graph = Graph::new_directed();
        let v1 = graph.add_vertex();
        let v2 = graph.add_vertex();
        graph.add_edge(v1, v2, true).unwrap();
        graph.add_edge(v2, v1, true).unwrap();

        let tally = edge_tally(&graph);
        assert_eq!(tally.unique_edges, 2);
        assert_eq!(tally.edges_with_duplicates, 0);
    }

    #[test]
    fn test_component_summary() {
        let mut graph = Graph::new_undirected();
        // Component 1: 3 vertices, 3 edges
        let v1 = graph.add_vertex();
        let v2 = graph.add_vertex();
        let v3 = graph.add_vertex();
        graph.add_edge(v1, v2, false).unwrap();
        graph.add_edge(v2, v3, false).unwrap();
        graph.add_edge(v3, v1, false).unwrap();
        // Component 2: 2 vertices, 1 edge
        let v4 = graph.add_vertex();
        let v5 = graph.add_vertex();
        graph.add_edge(v4, v5, false).unwrap();
        // Components 3 and 4: singletons
        graph.add_vertex();
        graph.add_vertex();

        let summary = component_summary(&graph);
        assert_eq!(summary.component_count, 4);
        assert_eq!(summary.singleton_count, 2);
        assert_eq!(summary.max_component_vertices, 3);
        assert_eq!(summary.max_component_edges, 3);
    }

    #[test]
    fn test_degree_stats() {
        let mut graph = Graph::new_undirected();
        let hub = graph.add_vertex();
        for _ in 0..3 {
            let leaf = graph.add_vertex();
            graph.add_edge(hub, leaf, false).unwrap();
        }

        let stats = degree_stats(&graph).unwrap();
        assert_eq!(stats.minimum, 1);
        assert_eq!(stats.maximum, 3);
        assert_eq!(stats.average, 1.5);
    }

    #[test]
    fn test_cancellation_before_start() {
        let graph = triangle();
        let cancel = CancelFlag::new();
        cancel.cancel();

        let outcome = MetricsCalculator::new().compute(&graph, &cancel).unwrap();
        assert!(outcome.is_canceled());
        assert!(outcome.into_complete().is_none());
    }

    #[test]
    fn test_empty_graph_skips_geodesic() {
        let graph = Graph::new_undirected();
        let metrics = MetricsCalculator::new()
            .compute(&graph, &CancelFlag::new())
            .unwrap()
            .into_complete()
            .unwrap();
        assert_eq!(metrics.geodesic, None);
        assert_eq!(metrics.degrees, None);
    }

    #[test]
    fn test_geodesic_through_calculator() {
        let mut graph = Graph::new_undirected();
        let v1 = graph.add_vertex();
        let v2 = graph.add_vertex();
        let v3 = graph.add_vertex();
        graph.add_edge(v1, v2, false).unwrap();
        graph.add_edge(v2, v3, false).unwrap();

        let metrics = MetricsCalculator::new()
            .compute(&graph, &CancelFlag::new())
            .unwrap()
            .into_complete()
            .unwrap();
        let geodesic = metrics.geodesic.unwrap();
        assert_eq!(geodesic.maximum, 2.0);
    }
}
