//! Netgraph: an in-memory graph engine
//!
//! A mutable graph data structure with structural-metrics algorithms, a
//! force-directed layout engine, and a GraphML interchange codec.
//!
//! # Architecture
//!
//! - `graph`: vertex/edge collections, identity, incidence bookkeeping and
//!   change notifications; the leaf component everything else reads.
//! - `algo`: connected-component decomposition over the graph store.
//! - `metrics`: density, duplicate-edge detection, component metrics and
//!   geodesic-distance statistics, with cooperative cancellation.
//! - `layout`: Fruchterman-Reingold force-directed layout with component
//!   binning, layout snapshots and grid snapping.
//! - `graphml`: bidirectional GraphML mapping.
//!
//! Data flows in from the GraphML codec or an external producer, through
//! the analyzers, and back out through the codec or a rendering
//! collaborator. A single logical owner performs graph mutations; long
//! computations are designed to run on a worker thread with a pollable
//! cancel flag.
//!
//! # Example Usage
//!
//! ```rust
//! use netgraph::graph::Graph;
//! use netgraph::layout::{ForceDirectedLayout, Rect};
//! use netgraph::metrics::{CancelFlag, MetricsCalculator};
//!
//! // Build a small graph
//! let mut graph = Graph::new_undirected();
//! let alice = graph.add_vertex_named("alice");
//! let bob = graph.add_vertex_named("bob");
//! graph.add_edge(alice, bob, false).unwrap();
//!
//! // Compute structural metrics
//! let metrics = MetricsCalculator::new()
//!     .compute(&graph, &CancelFlag::new())
//!     .unwrap()
//!     .into_complete()
//!     .unwrap();
//! assert_eq!(metrics.density, Some(1.0));
//!
//! // Assign coordinates
//! ForceDirectedLayout::new().lay_out(&mut graph, Rect::new(0.0, 0.0, 800.0, 600.0));
//! assert!(graph.is_laid_out());
//! ```

#![warn(clippy::all)]

pub mod algo;
pub mod graph;
pub mod graphml;
pub mod layout;
pub mod metrics;

// Re-export main types for convenience
pub use graph::{
    Directedness, Edge, EdgeId, Graph, GraphError, GraphEvent, GraphResult, Location,
    MetadataMap, MetadataValue, Vertex, VertexId,
};

pub use algo::{components_ascending_by_size, connected_components, connected_components_of};

pub use metrics::{
    BfsProvider, CancelFlag, Computation, ExternalToolProvider, GeodesicProvider, GeodesicStats,
    GraphMetrics, MetricsCalculator, MetricsError, MetricsResult,
};

pub use layout::{
    snap_to_grid, ForceDirectedLayout, LayoutConfig, LayoutSnapshot, Rect, RectangleBinner,
};

pub use graphml::{
    read_graphml, read_graphml_file, write_graphml, write_graphml_file, GraphMlError,
    GraphMlResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
