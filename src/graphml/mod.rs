//! GraphML interchange codec
//!
//! Bidirectional mapping between [`Graph`](crate::graph::Graph) and the
//! GraphML XML subset:
//!
//! ```text
//! <graphml>
//!   <key id="..." for="node|edge" attr.name="..." attr.type="...">
//!     <default>VALUE</default>
//!   </key>*
//!   <graph edgedefault="directed|undirected">
//!     <node id="ID"> <data key="KEYID">VALUE</data>* </node>*
//!     <edge id="ID"? source="NODEID" target="NODEID"> <data .../>* </edge>*
//!   </graph>
//! </graphml>
//! ```
//!
//! Parse errors are fatal and abort the load with no partial graph; the one
//! exception is an edge referencing an unknown node id, which is silently
//! dropped. A graph saved and reloaded through this codec preserves names,
//! directedness, endpoints and all metadata values as strings; type
//! information beyond "string" does not survive a round trip.

mod reader;
mod writer;

pub use reader::{read_graphml, read_graphml_file};
pub use writer::{write_graphml, write_graphml_file};

use thiserror::Error;

/// The GraphML XML namespace
pub const GRAPHML_NAMESPACE: &str = "http://graphml.graphdrawing.org/xmlns";

/// Graph metadata key listing the attribute names applied to any vertex
///
/// Set by the reader after a successful load (an Array of Strings), so a
/// consumer can discover the schema without re-scanning entities.
pub const VERTEX_ATTRIBUTE_NAMES_KEY: &str = "graphml-vertex-attribute-names";

/// Graph metadata key listing the attribute names applied to any edge
pub const EDGE_ATTRIBUTE_NAMES_KEY: &str = "graphml-edge-attribute-names";

/// Errors raised by the GraphML codec
#[derive(Error, Debug)]
pub enum GraphMlError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Graph mutation rejected during load: {0}")]
    Graph(#[from] crate::graph::GraphError),

    #[error("Element <{element}> is missing required attribute \"{attribute}\"")]
    MissingAttribute { element: String, attribute: String },

    #[error("Duplicate key id \"{0}\"")]
    DuplicateKeyId(String),

    #[error("Duplicate node id \"{0}\"")]
    DuplicateNodeId(String),

    #[error("Invalid edgedefault value \"{0}\" (expected \"directed\" or \"undirected\")")]
    InvalidEdgeDefault(String),

    #[error("Key \"{id}\" has invalid for value \"{target}\" (expected \"node\" or \"edge\")")]
    InvalidKeyTarget { id: String, target: String },

    #[error("Data element references undefined key \"{0}\"")]
    UnknownDataKey(String),

    #[error("No <graph> element found")]
    MissingGraphElement,

    #[error("Unexpected end of document")]
    UnexpectedEof,

    #[error("Mixed graphs cannot be written as GraphML")]
    UnsupportedDirectedness,

    #[error("Generated XML was not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type GraphMlResult<T> = Result<T, GraphMlError>;
