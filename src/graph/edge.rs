//! Edge implementation
//!
//! Edges connect exactly two endpoint vertices of the same graph. The two
//! endpoint references are immutable after creation; "moving" an edge means
//! removing it and adding a new one. Self-loops and parallel edges between
//! the same pair are permitted.

use super::metadata::{MetadataMap, MetadataValue};
use super::types::{EdgeId, VertexId};
use serde::{Deserialize, Serialize};

/// An edge in the graph
///
/// Edges have:
/// - A unique, immutable integer ID
/// - An optional name (not unique)
/// - Two endpoint vertices (may be equal, forming a self-loop)
/// - A directed/undirected flag
/// - A metadata bag (key-value pairs)
/// - A creation timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Optional display name; not unique within a graph
    pub name: Option<String>,

    /// First endpoint (the source when the edge is directed)
    pub source: VertexId,

    /// Second endpoint (the target when the edge is directed)
    pub target: VertexId,

    /// Whether this edge is directed from source to target
    pub directed: bool,

    /// Metadata associated with this edge
    pub metadata: MetadataMap,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

impl Edge {
    /// Create a new edge
    pub fn new(id: EdgeId, source: VertexId, target: VertexId, directed: bool) -> Self {
        Edge {
            id,
            name: None,
            source,
            target,
            directed,
            metadata: MetadataMap::new(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create a new named edge
    pub fn new_named(
        id: EdgeId,
        name: impl Into<String>,
        source: VertexId,
        target: VertexId,
        directed: bool,
    ) -> Self {
        Edge {
            name: Some(name.into()),
            ..Self::new(id, source, target, directed)
        }
    }

    /// Set a metadata value, returning the previous value for the key
    pub fn set_metadata(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Option<MetadataValue> {
        self.metadata.insert(key.into(), value.into())
    }

    /// Get a metadata value
    pub fn metadata(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }

    /// Remove a metadata value
    pub fn remove_metadata(&mut self, key: &str) -> Option<MetadataValue> {
        self.metadata.remove(key)
    }

    /// Check if a metadata key is present (a Null value counts as present)
    pub fn has_metadata(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }

    /// Get number of metadata entries
    pub fn metadata_count(&self) -> usize {
        self.metadata.len()
    }

    /// Check if both endpoints are the same vertex
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Check if this edge connects two specific vertices (in either order)
    pub fn connects(&self, v1: VertexId, v2: VertexId) -> bool {
        (self.source == v1 && self.target == v2) || (self.source == v2 && self.target == v1)
    }

    /// Given one endpoint, return the other one (self for a self-loop)
    pub fn other_endpoint(&self, vertex: VertexId) -> Option<VertexId> {
        if self.source == vertex {
            Some(self.target)
        } else if self.target == vertex {
            Some(self.source)
        } else {
            None
        }
    }

    /// Check whether another edge duplicates this one
    ///
    /// Two directed edges are duplicates when they share the same ordered
    /// endpoint pair; two undirected edges when they share the same
    /// unordered pair. An edge never duplicates one with a different
    /// directedness flag.
    pub fn duplicates(&self, other: &Edge) -> bool {
        if self.directed != other.directed {
            return false;
        }
        if self.directed {
            self.source == other.source && self.target == other.target
        } else {
            self.connects(other.source, other.target)
        }
    }

    /// Endpoint pair normalized for duplicate grouping
    ///
    /// Directed edges keep their ordering; undirected edges sort the pair so
    /// (a, b) and (b, a) group together.
    pub fn grouping_key(&self) -> (VertexId, VertexId, bool) {
        if self.directed || self.source <= self.target {
            (self.source, self.target, self.directed)
        } else {
            (self.target, self.source, self.directed)
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_edge() {
        let edge = Edge::new(EdgeId::new(1), VertexId::new(1), VertexId::new(2), true);

        assert_eq!(edge.id, EdgeId::new(1));
        assert_eq!(edge.source, VertexId::new(1));
        assert_eq!(edge.target, VertexId::new(2));
        assert!(edge.directed);
        assert!(!edge.is_self_loop());
    }

    #[test]
    fn test_self_loop() {
        let edge = Edge::new(EdgeId::new(2), VertexId::new(5), VertexId::new(5), false);
        assert!(edge.is_self_loop());
        assert_eq!(edge.other_endpoint(VertexId::new(5)), Some(VertexId::new(5)));
    }

    #[test]
    fn test_edge_metadata() {
        let mut edge = Edge::new(EdgeId::new(3), VertexId::new(1), VertexId::new(2), false);

        edge.set_metadata("width", 1.5);
        edge.set_metadata("kind", "road");

        assert_eq!(edge.metadata("width").unwrap().as_float(), Some(1.5));
        assert_eq!(edge.metadata("kind").unwrap().as_string(), Some("road"));
        assert_eq!(edge.metadata_count(), 2);

        let removed = edge.remove_metadata("width");
        assert!(removed.is_some());
        assert!(!edge.has_metadata("width"));
    }

    #[test]
    fn test_edge_connects() {
        let edge = Edge::new(EdgeId::new(5), VertexId::new(10), VertexId::new(20), true);

        assert!(edge.connects(VertexId::new(10), VertexId::new(20)));
        assert!(edge.connects(VertexId::new(20), VertexId::new(10)));
        assert!(!edge.connects(VertexId::new(10), VertexId::new(30)));
    }

    #[test]
    fn test_other_endpoint() {
        let edge = Edge::new(EdgeId::new(6), VertexId::new(1), VertexId::new(2), false);
        assert_eq!(edge.other_endpoint(VertexId::new(1)), Some(VertexId::new(2)));
        assert_eq!(edge.other_endpoint(VertexId::new(2)), Some(VertexId::new(1)));
        assert_eq!(edge.other_endpoint(VertexId::new(3)), None);
    }

    #[test]
    fn test_duplicate_convention() {
        let a = VertexId::new(1);
        let b = VertexId::new(2);

        // Undirected: unordered pair
        let u1 = Edge::new(EdgeId::new(1), a, b, false);
        let u2 = Edge::new(EdgeId::new(2), b, a, false);
        assert!(u1.duplicates(&u2));
        assert_eq!(u1.grouping_key(), u2.grouping_key());

        // Directed: ordered pair
        let d1 = Edge::new(EdgeId::new(3), a, b, true);
        let d2 = Edge::new(EdgeId::new(4), b, a, true);
        let d3 = Edge::new(EdgeId::new(5), a, b, true);
        assert!(!d1.duplicates(&d2));
        assert!(d1.duplicates(&d3));
        assert_ne!(d1.grouping_key(), d2.grouping_key());

        // Mixed directedness never duplicates
        assert!(!u1.duplicates(&d1));
    }
}
