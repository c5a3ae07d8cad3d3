//! GraphML parsing

use super::{
    GraphMlError, GraphMlResult, EDGE_ATTRIBUTE_NAMES_KEY, VERTEX_ATTRIBUTE_NAMES_KEY,
};
use crate::graph::{Directedness, Graph, MetadataValue, VertexId};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// Which entity kind a key definition applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyTarget {
    Vertex,
    Edge,
}

/// A parsed `<key>` element
#[derive(Debug, Clone)]
struct AttributeDefinition {
    target: KeyTarget,
    name: String,
    default: Option<String>,
}

/// Parse a GraphML document into a graph
///
/// Attribute values land on vertices and edges as String metadata, defaults
/// first and explicit `<data>` children on top. The full set of attribute
/// names applied to any vertex and any edge is recorded on the graph's
/// metadata under [`VERTEX_ATTRIBUTE_NAMES_KEY`] / [`EDGE_ATTRIBUTE_NAMES_KEY`].
pub fn read_graphml(xml: &str) -> GraphMlResult<Graph> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    // Keyed by definition id; duplicates are fatal.
    let mut definitions: IndexMap<String, AttributeDefinition> = IndexMap::new();
    let mut graph: Option<Graph> = None;
    let mut vertex_ids: FxHashMap<String, VertexId> = FxHashMap::default();
    let mut vertex_attr_names: BTreeSet<String> = BTreeSet::new();
    let mut edge_attr_names: BTreeSet<String> = BTreeSet::new();
    let mut dropped_edges = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(element) => match element.local_name().as_ref() {
                b"key" => {
                    let (id, mut definition) = parse_key(&element)?;
                    definition.default = read_key_default(&mut reader)?;
                    define_key(&mut definitions, id, definition)?;
                }
                b"graph" => {
                    graph = Some(start_graph(&element)?);
                }
                b"node" => {
                    let graph = graph.as_mut().ok_or(GraphMlError::MissingGraphElement)?;
                    let data = read_data_children(&mut reader, b"node")?;
                    add_vertex(
                        graph,
                        &element,
                        data,
                        &definitions,
                        &mut vertex_ids,
                        &mut vertex_attr_names,
                    )?;
                }
                b"edge" => {
                    let graph = graph.as_mut().ok_or(GraphMlError::MissingGraphElement)?;
                    let data = read_data_children(&mut reader, b"edge")?;
                    add_edge(
                        graph,
                        &element,
                        data,
                        &definitions,
                        &vertex_ids,
                        &mut edge_attr_names,
                        &mut dropped_edges,
                    )?;
                }
                _ => {}
            },
            Event::Empty(element) => match element.local_name().as_ref() {
                b"key" => {
                    let (id, definition) = parse_key(&element)?;
                    define_key(&mut definitions, id, definition)?;
                }
                b"graph" => {
                    graph = Some(start_graph(&element)?);
                }
                b"node" => {
                    let graph = graph.as_mut().ok_or(GraphMlError::MissingGraphElement)?;
                    add_vertex(
                        graph,
                        &element,
                        Vec::new(),
                        &definitions,
                        &mut vertex_ids,
                        &mut vertex_attr_names,
                    )?;
                }
                b"edge" => {
                    let graph = graph.as_mut().ok_or(GraphMlError::MissingGraphElement)?;
                    add_edge(
                        graph,
                        &element,
                        Vec::new(),
                        &definitions,
                        &vertex_ids,
                        &mut edge_attr_names,
                        &mut dropped_edges,
                    )?;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let mut graph = graph.ok_or(GraphMlError::MissingGraphElement)?;

    record_attribute_names(&mut graph, VERTEX_ATTRIBUTE_NAMES_KEY, vertex_attr_names);
    record_attribute_names(&mut graph, EDGE_ATTRIBUTE_NAMES_KEY, edge_attr_names);

    debug!(
        "parsed GraphML: {} vertices, {} edges ({} dangling edges dropped)",
        graph.vertex_count(),
        graph.edge_count(),
        dropped_edges
    );
    Ok(graph)
}

/// Read a GraphML file from disk
pub fn read_graphml_file(path: impl AsRef<Path>) -> GraphMlResult<Graph> {
    let xml = std::fs::read_to_string(path)?;
    read_graphml(&xml)
}

fn parse_key(element: &BytesStart) -> GraphMlResult<(String, AttributeDefinition)> {
    let id = required_attr(element, "key", "id")?;
    let target = required_attr(element, "key", "for")?;
    let name = required_attr(element, "key", "attr.name")?;
    // attr.type is part of the subset but carries no information for us:
    // every value is applied as a string.
    let _ = required_attr(element, "key", "attr.type")?;

    let target = match target.as_str() {
        "node" => KeyTarget::Vertex,
        "edge" => KeyTarget::Edge,
        other => {
            return Err(GraphMlError::InvalidKeyTarget {
                id,
                target: other.to_string(),
            })
        }
    };

    Ok((
        id,
        AttributeDefinition {
            target,
            name,
            default: None,
        },
    ))
}

fn define_key(
    definitions: &mut IndexMap<String, AttributeDefinition>,
    id: String,
    definition: AttributeDefinition,
) -> GraphMlResult<()> {
    if definitions.contains_key(&id) {
        return Err(GraphMlError::DuplicateKeyId(id));
    }
    definitions.insert(id, definition);
    Ok(())
}

fn start_graph(element: &BytesStart) -> GraphMlResult<Graph> {
    let edgedefault = required_attr(element, "graph", "edgedefault")?;
    let directedness = match edgedefault.as_str() {
        "directed" => Directedness::Directed,
        "undirected" => Directedness::Undirected,
        other => return Err(GraphMlError::InvalidEdgeDefault(other.to_string())),
    };
    Ok(Graph::new(directedness))
}

fn add_vertex(
    graph: &mut Graph,
    element: &BytesStart,
    data: Vec<(String, String)>,
    definitions: &IndexMap<String, AttributeDefinition>,
    vertex_ids: &mut FxHashMap<String, VertexId>,
    applied_names: &mut BTreeSet<String>,
) -> GraphMlResult<()> {
    let xml_id = required_attr(element, "node", "id")?;
    if vertex_ids.contains_key(&xml_id) {
        return Err(GraphMlError::DuplicateNodeId(xml_id));
    }

    let id = graph.add_vertex_named(xml_id.clone());
    if let Some(vertex) = graph.vertex_mut(id) {
        for definition in definitions.values() {
            if definition.target == KeyTarget::Vertex {
                if let Some(default) = &definition.default {
                    vertex.set_metadata(definition.name.clone(), default.clone());
                    applied_names.insert(definition.name.clone());
                }
            }
        }
        for (key_id, value) in data {
            let definition = definitions
                .get(&key_id)
                .ok_or(GraphMlError::UnknownDataKey(key_id))?;
            vertex.set_metadata(definition.name.clone(), value);
            applied_names.insert(definition.name.clone());
        }
    }

    vertex_ids.insert(xml_id, id);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn add_edge(
    graph: &mut Graph,
    element: &BytesStart,
    data: Vec<(String, String)>,
    definitions: &IndexMap<String, AttributeDefinition>,
    vertex_ids: &FxHashMap<String, VertexId>,
    applied_names: &mut BTreeSet<String>,
    dropped_edges: &mut usize,
) -> GraphMlResult<()> {
    let source_id = required_attr(element, "edge", "source")?;
    let target_id = required_attr(element, "edge", "target")?;
    let name = optional_attr(element, "id")?;

    // An edge referencing an unknown node is dropped, not an error: the
    // GraphML primer's fallback behavior for nested or partial graphs.
    let (Some(&source), Some(&target)) = (vertex_ids.get(&source_id), vertex_ids.get(&target_id))
    else {
        warn!(
            "dropping edge {:?} -> {:?}: unknown endpoint id",
            source_id, target_id
        );
        *dropped_edges += 1;
        return Ok(());
    };

    let directed = graph.directedness().default_edge_directed();
    let edge_id = match name {
        Some(name) => graph.add_edge_named(name, source, target, directed)?,
        None => graph.add_edge(source, target, directed)?,
    };

    if let Some(edge) = graph.edge_mut(edge_id) {
        for definition in definitions.values() {
            if definition.target == KeyTarget::Edge {
                if let Some(default) = &definition.default {
                    edge.set_metadata(definition.name.clone(), default.clone());
                    applied_names.insert(definition.name.clone());
                }
            }
        }
        for (key_id, value) in data {
            let definition = definitions
                .get(&key_id)
                .ok_or(GraphMlError::UnknownDataKey(key_id))?;
            edge.set_metadata(definition.name.clone(), value);
            applied_names.insert(definition.name.clone());
        }
    }

    Ok(())
}

/// Consume events up to `</key>`, capturing an optional `<default>` child
fn read_key_default(reader: &mut Reader<&[u8]>) -> GraphMlResult<Option<String>> {
    let mut default = None;
    let mut in_default = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"default" => {
                in_default = true;
                default = Some(String::new());
            }
            Event::Empty(e) if e.local_name().as_ref() == b"default" => {
                default = Some(String::new());
            }
            Event::Text(text) if in_default => {
                if let Some(value) = default.as_mut() {
                    value.push_str(&text.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"default" => in_default = false,
                b"key" => break,
                _ => {}
            },
            Event::Eof => return Err(GraphMlError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(default)
}

/// Consume events up to the entity's end tag, collecting `(key id, value)`
/// pairs from `<data>` children
fn read_data_children(
    reader: &mut Reader<&[u8]>,
    terminator: &[u8],
) -> GraphMlResult<Vec<(String, String)>> {
    let mut data = Vec::new();
    let mut current_key: Option<String> = None;
    let mut current_value = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"data" => {
                current_key = Some(required_attr(&e, "data", "key")?);
                current_value.clear();
            }
            Event::Empty(e) if e.local_name().as_ref() == b"data" => {
                data.push((required_attr(&e, "data", "key")?, String::new()));
            }
            Event::Text(text) => {
                if current_key.is_some() {
                    current_value.push_str(&text.unescape()?);
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"data" {
                    if let Some(key) = current_key.take() {
                        data.push((key, std::mem::take(&mut current_value)));
                    }
                } else if e.local_name().as_ref() == terminator {
                    break;
                }
            }
            Event::Eof => return Err(GraphMlError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(data)
}

fn record_attribute_names(graph: &mut Graph, key: &str, names: BTreeSet<String>) {
    let values: Vec<MetadataValue> = names.into_iter().map(MetadataValue::String).collect();
    graph.set_metadata(key, MetadataValue::Array(values));
}

fn optional_attr(element: &BytesStart, name: &str) -> GraphMlResult<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute?;
        if attribute.key.local_name().as_ref() == name.as_bytes() {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required_attr(element: &BytesStart, element_name: &str, name: &str) -> GraphMlResult<String> {
    optional_attr(element, name)?.ok_or_else(|| GraphMlError::MissingAttribute {
        element: element_name.to_string(),
        attribute: name.to_string(),
    })
}
