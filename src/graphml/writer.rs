//! GraphML serialization

use super::{
    GraphMlError, GraphMlResult, EDGE_ATTRIBUTE_NAMES_KEY, GRAPHML_NAMESPACE,
    VERTEX_ATTRIBUTE_NAMES_KEY,
};
use crate::graph::{Directedness, Graph, MetadataMap, MetadataValue};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Serialize a graph to a GraphML document
///
/// One `<key>` definition is emitted per attribute name ever applied to a
/// vertex or an edge, with ids prefixed (`V-` / `E-`) so vertex and edge
/// attributes of the same name cannot collide. Each entity gets a `<data>`
/// child for every attribute present with a non-null value, stringified.
pub fn write_graphml(graph: &Graph) -> GraphMlResult<String> {
    let edgedefault = match graph.directedness() {
        Directedness::Directed => "directed",
        Directedness::Undirected => "undirected",
        Directedness::Mixed => return Err(GraphMlError::UnsupportedDirectedness),
    };

    let vertex_attrs = collect_attribute_names(
        graph.metadata(VERTEX_ATTRIBUTE_NAMES_KEY),
        graph.vertices().map(|v| &v.metadata),
    );
    let edge_attrs = collect_attribute_names(
        graph.metadata(EDGE_ATTRIBUTE_NAMES_KEY),
        graph.edges().map(|e| &e.metadata),
    );

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut graphml = BytesStart::new("graphml");
    graphml.push_attribute(("xmlns", GRAPHML_NAMESPACE));
    writer.write_event(Event::Start(graphml))?;

    for name in &vertex_attrs {
        write_key(&mut writer, &format!("V-{}", name), "node", name)?;
    }
    for name in &edge_attrs {
        write_key(&mut writer, &format!("E-{}", name), "edge", name)?;
    }

    let mut graph_element = BytesStart::new("graph");
    graph_element.push_attribute(("edgedefault", edgedefault));
    writer.write_event(Event::Start(graph_element))?;

    for vertex in graph.vertices() {
        let id = vertex.display_name();
        let mut element = BytesStart::new("node");
        element.push_attribute(("id", id.as_str()));

        let data = present_values(&vertex.metadata, &vertex_attrs, "V-");
        if data.is_empty() {
            writer.write_event(Event::Empty(element))?;
        } else {
            writer.write_event(Event::Start(element))?;
            write_data(&mut writer, &data)?;
            writer.write_event(Event::End(BytesEnd::new("node")))?;
        }
    }

    for edge in graph.edges() {
        let (Some(source), Some(target)) = (graph.vertex(edge.source), graph.vertex(edge.target))
        else {
            continue;
        };

        let source_id = source.display_name();
        let target_id = target.display_name();
        let mut element = BytesStart::new("edge");
        if let Some(name) = &edge.name {
            element.push_attribute(("id", name.as_str()));
        }
        element.push_attribute(("source", source_id.as_str()));
        element.push_attribute(("target", target_id.as_str()));

        let data = present_values(&edge.metadata, &edge_attrs, "E-");
        if data.is_empty() {
            writer.write_event(Event::Empty(element))?;
        } else {
            writer.write_event(Event::Start(element))?;
            write_data(&mut writer, &data)?;
            writer.write_event(Event::End(BytesEnd::new("edge")))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("graphml")))?;

    debug!(
        "wrote GraphML: {} vertices, {} edges, {} vertex / {} edge attributes",
        graph.vertex_count(),
        graph.edge_count(),
        vertex_attrs.len(),
        edge_attrs.len()
    );
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Write a graph to a GraphML file on disk
pub fn write_graphml_file(graph: &Graph, path: impl AsRef<Path>) -> GraphMlResult<()> {
    let xml = write_graphml(graph)?;
    std::fs::write(path, xml)?;
    Ok(())
}

/// Attribute names recorded on the graph's metadata by a previous load,
/// merged with whatever is actually present on the entities
fn collect_attribute_names<'a>(
    recorded: Option<&MetadataValue>,
    entities: impl Iterator<Item = &'a MetadataMap>,
) -> Vec<String> {
    let mut names = BTreeSet::new();

    if let Some(MetadataValue::Array(values)) = recorded {
        for value in values {
            if let Some(name) = value.as_string() {
                names.insert(name.to_string());
            }
        }
    }
    for metadata in entities {
        for key in metadata.keys() {
            names.insert(key.clone());
        }
    }

    names.into_iter().collect()
}

/// `(key id, value)` pairs for every attribute present with a non-null,
/// stringifiable value
fn present_values(
    metadata: &MetadataMap,
    names: &[String],
    prefix: &str,
) -> Vec<(String, String)> {
    names
        .iter()
        .filter_map(|name| {
            metadata
                .get(name)
                .and_then(stringify)
                .map(|value| (format!("{}{}", prefix, name), value))
        })
        .collect()
}

fn stringify(value: &MetadataValue) -> Option<String> {
    match value {
        MetadataValue::String(s) => Some(s.clone()),
        MetadataValue::Integer(i) => Some(i.to_string()),
        MetadataValue::Float(f) => Some(f.to_string()),
        MetadataValue::Boolean(b) => Some(b.to_string()),
        // Null and arrays have no attribute representation
        MetadataValue::Array(_) | MetadataValue::Null => None,
    }
}

fn write_key(
    writer: &mut Writer<Vec<u8>>,
    id: &str,
    target: &str,
    name: &str,
) -> GraphMlResult<()> {
    let mut key = BytesStart::new("key");
    key.push_attribute(("id", id));
    key.push_attribute(("for", target));
    key.push_attribute(("attr.name", name));
    key.push_attribute(("attr.type", "string"));
    writer.write_event(Event::Empty(key))?;
    Ok(())
}

fn write_data(writer: &mut Writer<Vec<u8>>, data: &[(String, String)]) -> GraphMlResult<()> {
    for (key_id, value) in data {
        let mut element = BytesStart::new("data");
        element.push_attribute(("key", key_id.as_str()));
        writer.write_event(Event::Start(element))?;
        writer.write_event(Event::Text(BytesText::new(value)))?;
        writer.write_event(Event::End(BytesEnd::new("data")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphml::read_graphml;

    #[test]
    fn test_write_minimal_graph() {
        let mut graph = Graph::new_undirected();
        let a = graph.add_vertex_named("a");
        let b = graph.add_vertex_named("b");
        graph.add_edge(a, b, false).unwrap();

        let xml = write_graphml(&graph).unwrap();
        assert!(xml.contains("edgedefault=\"undirected\""));
        assert!(xml.contains("<node id=\"a\"/>"));
        assert!(xml.contains("source=\"a\""));
        assert!(xml.contains("target=\"b\""));
    }

    #[test]
    fn test_unnamed_vertices_get_stable_ids() {
        let mut graph = Graph::new_directed();
        let v1 = graph.add_vertex();
        let v2 = graph.add_vertex();
        graph.add_edge(v1, v2, true).unwrap();

        let xml = write_graphml(&graph).unwrap();
        let reloaded = read_graphml(&xml).unwrap();
        assert_eq!(reloaded.vertex_count(), 2);
        assert_eq!(reloaded.edge_count(), 1);
    }

    #[test]
    fn test_mixed_graph_rejected() {
        let graph = Graph::new(crate::graph::Directedness::Mixed);
        let err = write_graphml(&graph).unwrap_err();
        assert!(matches!(err, GraphMlError::UnsupportedDirectedness));
    }

    #[test]
    fn test_key_ids_are_prefixed() {
        let mut graph = Graph::new_undirected();
        let a = graph.add_vertex_named("a");
        let b = graph.add_vertex_named("b");
        let e = graph.add_edge(a, b, false).unwrap();
        // The same attribute name on vertices and edges must not collide
        graph.vertex_mut(a).unwrap().set_metadata("weight", "2");
        graph.edge_mut(e).unwrap().set_metadata("weight", "7");

        let xml = write_graphml(&graph).unwrap();
        assert!(xml.contains("id=\"V-weight\""));
        assert!(xml.contains("id=\"E-weight\""));

        let reloaded = read_graphml(&xml).unwrap();
        let a = reloaded.find_vertex_by_name("a").unwrap();
        assert_eq!(a.metadata("weight").unwrap().as_string(), Some("2"));
        let edge = reloaded.edges().next().unwrap();
        assert_eq!(edge.metadata("weight").unwrap().as_string(), Some("7"));
    }

    #[test]
    fn test_null_values_omitted() {
        let mut graph = Graph::new_undirected();
        let a = graph.add_vertex_named("a");
        graph
            .vertex_mut(a)
            .unwrap()
            .set_metadata("ghost", MetadataValue::Null);

        let xml = write_graphml(&graph).unwrap();
        // The key definition exists but no data element is written
        assert!(xml.contains("attr.name=\"ghost\""));
        assert!(!xml.contains("<data"));
    }

    #[test]
    fn test_special_characters_escaped() {
        let mut graph = Graph::new_undirected();
        let a = graph.add_vertex_named("a");
        graph
            .vertex_mut(a)
            .unwrap()
            .set_metadata("title", "fish & <chips>");

        let xml = write_graphml(&graph).unwrap();
        let reloaded = read_graphml(&xml).unwrap();
        let a = reloaded.find_vertex_by_name("a").unwrap();
        assert_eq!(
            a.metadata("title").unwrap().as_string(),
            Some("fish & <chips>")
        );
    }
}
