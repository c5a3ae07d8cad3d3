//! In-memory graph storage
//!
//! The graph owns its vertex and edge collections. Lookups are hash-indexed
//! (id -> entity) while iteration stays in insertion order, and that order is
//! stable across removals. A single logical writer mutates a graph instance;
//! there is no internal locking.

use super::edge::Edge;
use super::event::{GraphEvent, GraphListener, ListenerId, ListenerRegistry};
use super::metadata::{MetadataMap, MetadataValue};
use super::types::{Directedness, EdgeId, VertexId};
use super::vertex::Vertex;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors that can occur during graph mutations
///
/// A failed mutation leaves the graph unchanged.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("Vertex {0} not found")]
    VertexNotFound(VertexId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Vertex {0} already exists")]
    VertexAlreadyExists(VertexId),

    #[error("Edge {0} already exists")]
    EdgeAlreadyExists(EdgeId),

    #[error("Invalid edge: endpoint vertex {0} does not exist")]
    EndpointNotFound(VertexId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// An in-memory graph
///
/// Storage layout:
/// - vertices: VertexId -> Vertex (insertion-ordered)
/// - edges: EdgeId -> Edge (insertion-ordered)
/// - incidence: VertexId -> Vec<EdgeId> (edges touching each vertex)
///
/// Ids increase monotonically and are never recycled within a graph
/// instance, so an id observed once stays unambiguous for the graph's
/// lifetime even after removals.
pub struct Graph {
    /// Graph-level directedness convention
    directedness: Directedness,

    /// Vertex storage
    vertices: IndexMap<VertexId, Vertex>,

    /// Edge storage
    edges: IndexMap<EdgeId, Edge>,

    /// Incident edges for each vertex
    incidence: FxHashMap<VertexId, Vec<EdgeId>>,

    /// Graph-level metadata
    metadata: MetadataMap,

    /// Next vertex ID
    next_vertex_id: u64,

    /// Next edge ID
    next_edge_id: u64,

    /// Set by the layout engine; any vertex/edge mutation clears it
    laid_out: bool,

    /// Change listeners
    listeners: ListenerRegistry,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(directedness: Directedness) -> Self {
        Graph {
            directedness,
            vertices: IndexMap::new(),
            edges: IndexMap::new(),
            incidence: FxHashMap::default(),
            metadata: MetadataMap::new(),
            next_vertex_id: 1,
            next_edge_id: 1,
            laid_out: false,
            listeners: ListenerRegistry::default(),
        }
    }

    /// Create a new empty directed graph
    pub fn new_directed() -> Self {
        Self::new(Directedness::Directed)
    }

    /// Create a new empty undirected graph
    pub fn new_undirected() -> Self {
        Self::new(Directedness::Undirected)
    }

    /// Graph-level directedness convention
    pub fn directedness(&self) -> Directedness {
        self.directedness
    }

    // ============================================================
    // Vertices
    // ============================================================

    /// Create an unnamed vertex with an auto-assigned ID
    pub fn add_vertex(&mut self) -> VertexId {
        let id = self.next_vertex_id();
        self.attach_vertex(Vertex::new(id));
        id
    }

    /// Create a named vertex with an auto-assigned ID
    pub fn add_vertex_named(&mut self, name: impl Into<String>) -> VertexId {
        let id = self.next_vertex_id();
        self.attach_vertex(Vertex::new_named(id, name));
        id
    }

    /// Attach a detached vertex, preserving its ID
    ///
    /// Fails with [`GraphError::VertexAlreadyExists`] when the ID is already
    /// occupied: a vertex can belong to at most one graph at a time, and
    /// re-adding one that was never detached is an invariant violation.
    pub fn insert_vertex(&mut self, vertex: Vertex) -> GraphResult<VertexId> {
        let id = vertex.id;
        if self.vertices.contains_key(&id) {
            return Err(GraphError::VertexAlreadyExists(id));
        }
        if id.as_u64() >= self.next_vertex_id {
            self.next_vertex_id = id.as_u64() + 1;
        }
        self.attach_vertex(vertex);
        Ok(id)
    }

    fn attach_vertex(&mut self, vertex: Vertex) {
        let id = vertex.id;
        self.vertices.insert(id, vertex);
        self.incidence.entry(id).or_default();
        self.laid_out = false;
        self.listeners.notify(&GraphEvent::VertexAdded { id });
    }

    /// Remove a vertex, detaching its incident edges first
    ///
    /// Returns the detached vertex, or `None` when the ID is unknown.
    /// Each cascaded edge removal fires its own event before the vertex
    /// removal event.
    pub fn remove_vertex(&mut self, id: VertexId) -> Option<Vertex> {
        if !self.vertices.contains_key(&id) {
            return None;
        }

        let incident: Vec<EdgeId> = self.incidence.get(&id).cloned().unwrap_or_default();
        for edge_id in incident {
            self.remove_edge(edge_id);
        }

        let vertex = self.vertices.shift_remove(&id)?;
        self.incidence.remove(&id);
        self.laid_out = false;
        self.listeners.notify(&GraphEvent::VertexRemoved { id });
        Some(vertex)
    }

    /// Remove the first vertex with the given name
    pub fn remove_vertex_by_name(&mut self, name: &str) -> Option<Vertex> {
        let id = self.find_vertex_by_name(name)?.id;
        self.remove_vertex(id)
    }

    /// Get a vertex by ID
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    /// Get a mutable vertex by ID
    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(&id)
    }

    /// Check if a vertex exists
    pub fn has_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Find the first vertex with the given name, in insertion order
    ///
    /// Names are not unique; by-id lookup is the authoritative one.
    pub fn find_vertex_by_name(&self, name: &str) -> Option<&Vertex> {
        self.vertices
            .values()
            .find(|v| v.name.as_deref() == Some(name))
    }

    /// Iterate vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Iterate vertices in reverse insertion order
    ///
    /// Used by draw-most-recent-on-top consumers.
    pub fn vertices_rev(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values().rev()
    }

    /// All vertex IDs in insertion order
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys().copied().collect()
    }

    /// Get total number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // ============================================================
    // Edges
    // ============================================================

    /// Create an edge between two existing vertices
    ///
    /// Self-loops and parallel edges between the same pair are permitted.
    pub fn add_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        directed: bool,
    ) -> GraphResult<EdgeId> {
        self.validate_endpoints(source, target)?;
        let id = self.next_edge_id();
        self.attach_edge(Edge::new(id, source, target, directed));
        Ok(id)
    }

    /// Create a named edge between two existing vertices
    pub fn add_edge_named(
        &mut self,
        name: impl Into<String>,
        source: VertexId,
        target: VertexId,
        directed: bool,
    ) -> GraphResult<EdgeId> {
        self.validate_endpoints(source, target)?;
        let id = self.next_edge_id();
        self.attach_edge(Edge::new_named(id, name, source, target, directed));
        Ok(id)
    }

    /// Attach a detached edge, preserving its ID
    ///
    /// Both endpoints must already belong to this graph. Fails without
    /// partial mutation.
    pub fn insert_edge(&mut self, edge: Edge) -> GraphResult<EdgeId> {
        let id = edge.id;
        if self.edges.contains_key(&id) {
            return Err(GraphError::EdgeAlreadyExists(id));
        }
        self.validate_endpoints(edge.source, edge.target)?;
        if id.as_u64() >= self.next_edge_id {
            self.next_edge_id = id.as_u64() + 1;
        }
        self.attach_edge(edge);
        Ok(id)
    }

    fn validate_endpoints(&self, source: VertexId, target: VertexId) -> GraphResult<()> {
        if !self.has_vertex(source) {
            return Err(GraphError::EndpointNotFound(source));
        }
        if !self.has_vertex(target) {
            return Err(GraphError::EndpointNotFound(target));
        }
        Ok(())
    }

    fn attach_edge(&mut self, edge: Edge) {
        let id = edge.id;
        let (source, target) = (edge.source, edge.target);
        self.edges.insert(id, edge);
        self.incidence.entry(source).or_default().push(id);
        if source != target {
            self.incidence.entry(target).or_default().push(id);
        }
        self.laid_out = false;
        self.listeners.notify(&GraphEvent::EdgeAdded { id });
    }

    /// Remove an edge
    ///
    /// Returns the detached edge, or `None` when the ID is unknown.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.shift_remove(&id)?;
        if let Some(incident) = self.incidence.get_mut(&edge.source) {
            incident.retain(|&eid| eid != id);
        }
        if edge.source != edge.target {
            if let Some(incident) = self.incidence.get_mut(&edge.target) {
                incident.retain(|&eid| eid != id);
            }
        }
        self.laid_out = false;
        self.listeners.notify(&GraphEvent::EdgeRemoved { id });
        Some(edge)
    }

    /// Remove the first edge with the given name
    pub fn remove_edge_by_name(&mut self, name: &str) -> Option<Edge> {
        let id = self.find_edge_by_name(name)?.id;
        self.remove_edge(id)
    }

    /// Get an edge by ID
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Get a mutable edge by ID
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(&id)
    }

    /// Check if an edge exists
    pub fn has_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Find the first edge with the given name, in insertion order
    pub fn find_edge_by_name(&self, name: &str) -> Option<&Edge> {
        self.edges
            .values()
            .find(|e| e.name.as_deref() == Some(name))
    }

    /// Iterate edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Iterate edges in reverse insertion order
    pub fn edges_rev(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values().rev()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges incident to a vertex (a self-loop appears once)
    pub fn incident_edges(&self, id: VertexId) -> &[EdgeId] {
        self.incidence
            .get(&id)
            .map(|edges| edges.as_slice())
            .unwrap_or(&[])
    }

    /// Number of edges incident to a vertex
    pub fn degree(&self, id: VertexId) -> usize {
        self.incident_edges(id).len()
    }

    // ============================================================
    // Whole-graph operations
    // ============================================================

    /// Remove all vertices and, as a consequence, all edges
    ///
    /// Fires a single `Cleared` event. Id counters are not reset: ids stay
    /// unique for the lifetime of the graph instance.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.incidence.clear();
        self.laid_out = false;
        self.listeners.notify(&GraphEvent::Cleared);
    }

    /// Check whether the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    // ============================================================
    // Graph-level metadata
    // ============================================================

    /// Set a graph-level metadata value
    pub fn set_metadata(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Option<MetadataValue> {
        self.metadata.insert(key.into(), value.into())
    }

    /// Get a graph-level metadata value
    pub fn metadata(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }

    /// Remove a graph-level metadata value
    pub fn remove_metadata(&mut self, key: &str) -> Option<MetadataValue> {
        self.metadata.remove(key)
    }

    /// Check if a graph-level metadata key is present
    pub fn has_metadata(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }

    // ============================================================
    // Layout state
    // ============================================================

    /// Whether the current vertex locations come from a completed layout pass
    ///
    /// Any vertex/edge mutation clears this flag; drawing collaborators use
    /// it to decide whether a fresh layout pass is required.
    pub fn is_laid_out(&self) -> bool {
        self.laid_out
    }

    /// Mark the graph as laid out; called by the layout engine on success
    pub fn mark_laid_out(&mut self) {
        self.laid_out = true;
    }

    // ============================================================
    // Change notifications
    // ============================================================

    /// Register a change listener, invoked synchronously on mutation
    pub fn subscribe(&mut self, listener: GraphListener) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Remove a previously registered listener
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn next_vertex_id(&mut self) -> VertexId {
        let id = self.next_vertex_id;
        self.next_vertex_id += 1;
        VertexId::new(id)
    }

    fn next_edge_id(&mut self) -> EdgeId {
        let id = self.next_edge_id;
        self.next_edge_id += 1;
        EdgeId::new(id)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new_undirected()
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("directedness", &self.directedness)
            .field("vertices", &self.vertices.len())
            .field("edges", &self.edges.len())
            .field("laid_out", &self.laid_out)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
