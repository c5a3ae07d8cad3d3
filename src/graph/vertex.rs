//! Vertex implementation
//!
//! Vertices are created through [`Graph`](super::Graph) collection calls and
//! owned by the graph; a detached vertex (returned by a remove call) can be
//! re-inserted into a different graph.

use super::metadata::{MetadataMap, MetadataValue};
use super::types::{Location, VertexId};
use serde::{Deserialize, Serialize};

/// A vertex in the graph
///
/// Vertices have:
/// - A unique, immutable integer ID
/// - An optional name (names are not required to be unique)
/// - A 2-D floating-point location assigned by the layout engine
/// - A metadata bag (key-value pairs)
/// - A creation timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    /// Unique identifier for this vertex
    pub id: VertexId,

    /// Optional display name; not unique within a graph
    pub name: Option<String>,

    /// Layout location
    pub location: Location,

    /// Metadata associated with this vertex
    pub metadata: MetadataMap,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

impl Vertex {
    /// Create a new unnamed vertex
    pub fn new(id: VertexId) -> Self {
        Vertex {
            id,
            name: None,
            location: Location::default(),
            metadata: MetadataMap::new(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create a new named vertex
    pub fn new_named(id: VertexId, name: impl Into<String>) -> Self {
        Vertex {
            name: Some(name.into()),
            ..Self::new(id)
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

    /// Set the layout location
    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    /// Name if set, otherwise a stable fallback derived from the id
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("V{}", self.id.as_u64()),
        }
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl std::hash::Hash for Vertex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_vertex() {
        let vertex = Vertex::new(VertexId::new(1));
        assert_eq!(vertex.id, VertexId::new(1));
        assert!(vertex.name.is_none());
        assert_eq!(vertex.location, Location::default());
        assert!(vertex.created_at > 0);
    }

    #[test]
    fn test_named_vertex() {
        let vertex = Vertex::new_named(VertexId::new(2), "hub");
        assert_eq!(vertex.name.as_deref(), Some("hub"));
        assert_eq!(vertex.display_name(), "hub");

        let unnamed = Vertex::new(VertexId::new(3));
        assert_eq!(unnamed.display_name(), "V3");
    }

    #[test]
    fn test_vertex_metadata() {
        let mut vertex = Vertex::new(VertexId::new(4));

        vertex.set_metadata("color", "red");
        vertex.set_metadata("weight", 3i64);
        vertex.set_metadata("flagged", MetadataValue::Null);

        assert_eq!(vertex.metadata("color").unwrap().as_string(), Some("red"));
        assert_eq!(vertex.metadata("weight").unwrap().as_integer(), Some(3));
        assert!(vertex.has_metadata("flagged"));
        assert!(vertex.metadata("flagged").unwrap().is_null());
        assert!(!vertex.has_metadata("missing"));
        assert_eq!(vertex.metadata_count(), 3);

        let removed = vertex.remove_metadata("weight");
        assert!(removed.is_some());
        assert!(!vertex.has_metadata("weight"));
    }

    #[test]
    fn test_set_location() {
        let mut vertex = Vertex::new(VertexId::new(5));
        vertex.set_location(Location::new(10.0, -2.5));
        assert_eq!(vertex.location, Location::new(10.0, -2.5));
    }

    #[test]
    fn test_vertex_equality() {
        let v1 = Vertex::new(VertexId::new(7));
        let v2 = Vertex::new_named(VertexId::new(7), "other");
        let v3 = Vertex::new(VertexId::new(8));

        assert_eq!(v1, v2); // Same ID
        assert_ne!(v1, v3); // Different ID
    }
}
