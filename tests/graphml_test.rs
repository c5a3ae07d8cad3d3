use netgraph::graph::{Directedness, Graph};
use netgraph::graphml::{
    read_graphml, read_graphml_file, write_graphml, write_graphml_file, GraphMlError,
};

/// The 5-vertex / 2-edge sample: vertex colors plus an edge Width with a
/// default of 1.5 and one explicit override.
const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns">
    <key id="VertexColor" for="node" attr.name="Color" attr.type="string"/>
    <key id="EdgeWidth" for="edge" attr.name="Width" attr.type="double">
        <default>1.5</default>
    </key>
    <graph edgedefault="undirected">
        <node id="V1"><data key="VertexColor">red</data></node>
        <node id="V2"><data key="VertexColor">orange</data></node>
        <node id="V3"/>
        <node id="V4"/>
        <node id="V5"/>
        <edge source="V1" target="V2"/>
        <edge source="V3" target="V2"><data key="EdgeWidth">2.5</data></edge>
    </graph>
</graphml>"#;

#[test]
fn sample_end_to_end() {
    let graph = read_graphml(SAMPLE).unwrap();

    assert_eq!(graph.vertex_count(), 5);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.directedness(), Directedness::Undirected);

    // Explicit vertex attribute
    let v1 = graph.find_vertex_by_name("V1").unwrap();
    assert_eq!(v1.metadata("Color").unwrap().as_string(), Some("red"));

    // Vertex without data has no Color (the key has no default)
    let v3 = graph.find_vertex_by_name("V3").unwrap();
    assert!(!v3.has_metadata("Color"));

    // Edge without data gets the Width default
    let v2 = graph.find_vertex_by_name("V2").unwrap();
    let first_edge = graph
        .edges()
        .find(|e| e.connects(v1.id, v2.id))
        .unwrap();
    assert_eq!(first_edge.metadata("Width").unwrap().as_string(), Some("1.5"));

    // Edge with an explicit Width keeps it
    let second_edge = graph
        .edges()
        .find(|e| !e.connects(v1.id, v2.id))
        .unwrap();
    assert_eq!(
        second_edge.metadata("Width").unwrap().as_string(),
        Some("2.5")
    );
}

#[test]
fn round_trip_preserves_structure_and_metadata() {
    let mut graph = Graph::new_directed();
    let hub = graph.add_vertex_named("hub");
    let leaf1 = graph.add_vertex_named("leaf-1");
    let leaf2 = graph.add_vertex_named("leaf-2");
    graph.vertex_mut(hub).unwrap().set_metadata("Color", "blue");
    graph.vertex_mut(hub).unwrap().set_metadata("Shape", "disc");
    graph.vertex_mut(leaf1).unwrap().set_metadata("Color", "green");

    let e1 = graph.add_edge_named("spoke-1", hub, leaf1, true).unwrap();
    let e2 = graph.add_edge_named("spoke-2", hub, leaf2, true).unwrap();
    graph.edge_mut(e1).unwrap().set_metadata("Width", "2");
    graph.edge_mut(e2).unwrap().set_metadata("Width", "4");

    let xml = write_graphml(&graph).unwrap();
    let reloaded = read_graphml(&xml).unwrap();

    assert_eq!(reloaded.vertex_count(), graph.vertex_count());
    assert_eq!(reloaded.edge_count(), graph.edge_count());
    assert_eq!(reloaded.directedness(), graph.directedness());

    for name in ["hub", "leaf-1", "leaf-2"] {
        assert!(reloaded.find_vertex_by_name(name).is_some(), "{}", name);
    }
    let hub = reloaded.find_vertex_by_name("hub").unwrap();
    assert_eq!(hub.metadata("Color").unwrap().as_string(), Some("blue"));
    assert_eq!(hub.metadata("Shape").unwrap().as_string(), Some("disc"));

    let spoke1 = reloaded.find_edge_by_name("spoke-1").unwrap();
    assert_eq!(spoke1.metadata("Width").unwrap().as_string(), Some("2"));
    let source = reloaded.vertex(spoke1.source).unwrap();
    let target = reloaded.vertex(spoke1.target).unwrap();
    assert_eq!(source.name.as_deref(), Some("hub"));
    assert_eq!(target.name.as_deref(), Some("leaf-1"));
    assert!(spoke1.directed);
}

#[test]
fn round_trip_twice_is_stable() {
    let graph = read_graphml(SAMPLE).unwrap();
    let once = write_graphml(&graph).unwrap();
    let twice = write_graphml(&read_graphml(&once).unwrap()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn dangling_edge_dropped_rest_intact() {
    let xml = r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns">
        <graph edgedefault="undirected">
            <node id="a"/>
            <node id="b"/>
            <edge source="a" target="b"/>
            <edge source="a" target="nowhere"/>
            <edge source="nowhere" target="b"/>
        </graph>
    </graphml>"#;

    let graph = read_graphml(xml).unwrap();
    assert_eq!(graph.vertex_count(), 2);
    assert_eq!(graph.edge_count(), 1);

    let a = graph.find_vertex_by_name("a").unwrap();
    let b = graph.find_vertex_by_name("b").unwrap();
    assert!(graph.edges().next().unwrap().connects(a.id, b.id));
}

#[test]
fn duplicate_key_id_rejected_with_id_in_message() {
    let xml = r#"<graphml>
        <key id="dup" for="node" attr.name="a" attr.type="string"/>
        <key id="dup" for="node" attr.name="b" attr.type="string"/>
        <graph edgedefault="undirected"/>
    </graphml>"#;

    let err = read_graphml(xml).unwrap_err();
    assert!(matches!(&err, GraphMlError::DuplicateKeyId(id) if id == "dup"));
    assert!(err.to_string().contains("dup"));
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.graphml");

    let graph = read_graphml(SAMPLE).unwrap();
    write_graphml_file(&graph, &path).unwrap();
    let reloaded = read_graphml_file(&path).unwrap();

    assert_eq!(reloaded.vertex_count(), 5);
    assert_eq!(reloaded.edge_count(), 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_graphml_file("/nonexistent/path/graph.graphml").unwrap_err();
    assert!(matches!(err, GraphMlError::Io(_)));
}

#[test]
fn schema_discovery_after_load() {
    use netgraph::graphml::{EDGE_ATTRIBUTE_NAMES_KEY, VERTEX_ATTRIBUTE_NAMES_KEY};

    let graph = read_graphml(SAMPLE).unwrap();

    let vertex_names = graph
        .metadata(VERTEX_ATTRIBUTE_NAMES_KEY)
        .and_then(|v| v.as_array())
        .unwrap();
    assert_eq!(vertex_names.len(), 1);
    assert_eq!(vertex_names[0].as_string(), Some("Color"));

    let edge_names = graph
        .metadata(EDGE_ATTRIBUTE_NAMES_KEY)
        .and_then(|v| v.as_array())
        .unwrap();
    assert_eq!(edge_names.len(), 1);
    assert_eq!(edge_names[0].as_string(), Some("Width"));
}
