//! DOT serialization for the graph model.
//!
//! The model is serialized depth-first into a [`dot_structures`] AST: every
//! cluster becomes a `subgraph cluster_… { … }` block containing its
//! children's serialized forms in registration order, and after all root
//! members comes the flat edge list, endpoints referenced by identifier
//! regardless of nesting. The AST is printed with the `graphviz-rust`
//! printer; the result is what the external engine consumes.

use dot_generator::{attr, id};
use dot_structures::*;
use graphviz_rust::printer::{DotPrinter, PrinterContext};

use gravure_core::{
    graph::{GraphModel, Member},
    options::Direction,
};

/// Cluster background fill, rotating by nesting depth.
const CLUSTER_BGCOLORS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

/// Serializes the model to DOT source.
pub(crate) fn dot_source(model: &GraphModel, title: &str, direction: Direction) -> String {
    to_graph(model, title, direction).print(&mut PrinterContext::default())
}

fn to_graph(model: &GraphModel, title: &str, direction: Direction) -> Graph {
    let mut stmts = vec![
        Stmt::GAttribute(GraphAttributes::Graph(graph_defaults(title, direction))),
        Stmt::GAttribute(GraphAttributes::Node(node_defaults())),
        Stmt::GAttribute(GraphAttributes::Edge(edge_defaults())),
    ];

    for member in model.root_children() {
        stmts.push(member_stmt(model, *member, 0));
    }
    for edge in model.edges() {
        stmts.push(Stmt::Edge(edge_stmt(edge)));
    }

    Graph::DiGraph {
        id: id!(esc escape(title)),
        strict: false,
        stmts,
    }
}

fn member_stmt(model: &GraphModel, member: Member, depth: usize) -> Stmt {
    match member {
        Member::Node(id) => {
            let node = model
                .node(id)
                .expect("child list references an unregistered node");
            Stmt::Node(node_stmt(node))
        }
        Member::Cluster(id) => {
            let cluster = model
                .cluster(id)
                .expect("child list references an unregistered cluster");
            Stmt::Subgraph(cluster_subgraph(model, cluster, depth))
        }
    }
}

fn cluster_subgraph(
    model: &GraphModel,
    cluster: &gravure_core::graph::Cluster,
    depth: usize,
) -> Subgraph {
    let mut stmts = vec![
        Stmt::Attribute(attr!("label", esc escape(cluster.label()))),
        Stmt::Attribute(attr!("labeljust", "l")),
        Stmt::Attribute(attr!("style", "rounded")),
        Stmt::Attribute(attr!("pencolor", esc "#AEB6BE")),
        Stmt::Attribute(attr!("bgcolor", esc CLUSTER_BGCOLORS[depth % CLUSTER_BGCOLORS.len()])),
        Stmt::Attribute(attr!("fontsize", "12")),
    ];
    for member in cluster.children() {
        stmts.push(member_stmt(model, *member, depth + 1));
    }

    Subgraph {
        id: Id::Plain(cluster.id().to_string()),
        stmts,
    }
}

fn node_stmt(node: &gravure_core::graph::Node) -> Node {
    let mut attributes = vec![
        attr!("label", esc escape(node.label())),
        attr!("class", esc escape(node.kind())),
    ];
    if let Some(icon) = node.icon() {
        attributes.push(attr!("image", esc escape(&icon.display().to_string())));
        attributes.push(attr!("shape", "none"));
        attributes.push(attr!("labelloc", "b"));
        attributes.push(attr!("height", "1.9"));
        attributes.push(attr!("imagescale", "true"));
    }

    Node {
        id: NodeId(Id::Plain(node.id().to_string()), None),
        attributes,
    }
}

fn edge_stmt(edge: &gravure_core::graph::Edge) -> Edge {
    let mut attributes = Vec::new();
    if let Some(label) = edge.style().label() {
        attributes.push(attr!("label", esc escape(label)));
    }
    if let Some(color) = edge.style().color() {
        attributes.push(attr!("color", esc escape(color)));
    }
    if let Some(style) = edge.style().style() {
        attributes.push(attr!("style", esc escape(style)));
    }

    Edge {
        ty: EdgeTy::Pair(
            Vertex::N(NodeId(Id::Plain(edge.from().to_string()), None)),
            Vertex::N(NodeId(Id::Plain(edge.to().to_string()), None)),
        ),
        attributes,
    }
}

fn graph_defaults(title: &str, direction: Direction) -> Vec<Attribute> {
    vec![
        attr!("label", esc escape(title)),
        attr!("labelloc", "t"),
        attr!("rankdir", direction.rankdir()),
        attr!("fontsize", "15"),
        attr!("fontcolor", esc "#2D3436"),
        attr!("pad", "2.0"),
        attr!("splines", "ortho"),
        attr!("nodesep", "0.60"),
        attr!("ranksep", "0.75"),
    ]
}

fn node_defaults() -> Vec<Attribute> {
    vec![
        attr!("shape", "box"),
        attr!("style", "rounded"),
        attr!("fontsize", "13"),
    ]
}

fn edge_defaults() -> Vec<Attribute> {
    vec![attr!("color", esc "#7B8894")]
}

/// Escapes a string for use inside a double-quoted DOT identifier.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use gravure_core::graph::EdgeStyle;

    use super::*;

    /// Collapses whitespace runs so assertions survive printer formatting.
    fn normalized(dot: &str) -> String {
        dot.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("line\nbreak"), "line\\nbreak");
        assert_eq!(escape("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_nodes_serialize_inside_their_cluster_block() {
        let mut model = GraphModel::new();
        let group = model.add_cluster("G", None);
        let b = model.add_node("B", "custom", None, Some(group));
        let c = model.add_node("C", "custom", None, Some(group));
        let a = model.add_node("A", "custom", None, None);
        model.add_edge(a, b, EdgeStyle::new()).unwrap();

        let dot = normalized(&dot_source(&model, "Scenario", Direction::LeftRight));

        let cluster_open = dot.find("subgraph cluster_g {").expect("cluster block");
        let cluster_close = dot[cluster_open..].find('}').expect("block close") + cluster_open;
        let b_pos = dot.find("b[").expect("node b");
        let c_pos = dot.find("c[").expect("node c");

        assert!(cluster_open < b_pos && b_pos < cluster_close);
        assert!(cluster_open < c_pos && c_pos < cluster_close);
        assert!(b_pos < c_pos, "children keep registration order");
        assert!(dot.contains("a -> b"));
        assert!(
            dot.find("a -> b").unwrap() > cluster_close,
            "edges are serialized outside cluster blocks"
        );
    }

    #[test]
    fn test_edges_follow_all_members_in_insertion_order() {
        let mut model = GraphModel::new();
        let a = model.add_node("First", "custom", None, None);
        let b = model.add_node("Second", "custom", None, None);
        let c = model.add_node("Third", "custom", None, None);
        model.add_edge(a, c, EdgeStyle::new()).unwrap();
        model.add_edge(b, c, EdgeStyle::new()).unwrap();

        let dot = normalized(&dot_source(&model, "Order", Direction::LeftRight));

        let first_edge = dot.find("first -> third").expect("first edge");
        let second_edge = dot.find("second -> third").expect("second edge");
        assert!(first_edge < second_edge);
        assert!(dot.find("third[").unwrap() < first_edge);
    }

    #[test]
    fn test_graph_attributes_and_direction() {
        let model = GraphModel::new();
        let dot = normalized(&dot_source(&model, "My Title", Direction::TopBottom));

        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("label=\"My Title\""));
        assert!(dot.contains("rankdir=TB"));
        assert!(dot.contains("labelloc=t"));
    }

    #[test]
    fn test_nested_clusters_rotate_background() {
        let mut model = GraphModel::new();
        let outer = model.add_cluster("Outer", None);
        let inner = model.add_cluster("Inner", Some(outer));
        model.add_node("leaf", "custom", None, Some(inner));

        let dot = normalized(&dot_source(&model, "Nesting", Direction::LeftRight));

        let outer_pos = dot.find("subgraph cluster_outer {").expect("outer block");
        let inner_pos = dot.find("subgraph cluster_inner {").expect("inner block");
        assert!(outer_pos < inner_pos);
        assert!(dot.contains(&format!("bgcolor=\"{}\"", CLUSTER_BGCOLORS[0])));
        assert!(dot.contains(&format!("bgcolor=\"{}\"", CLUSTER_BGCOLORS[1])));
    }

    #[test]
    fn test_icon_nodes_emit_image_attributes() {
        let mut model = GraphModel::new();
        model.add_node("App", "custom", Some("./assets/icon.png".into()), None);

        let dot = normalized(&dot_source(&model, "Icons", Direction::LeftRight));

        assert!(dot.contains("image=\"./assets/icon.png\""));
        assert!(dot.contains("shape=none"));
        assert!(dot.contains("labelloc=b"));
    }

    #[test]
    fn test_edge_style_attributes() {
        let mut model = GraphModel::new();
        let a = model.add_node("a", "custom", None, None);
        let b = model.add_node("b", "custom", None, None);
        model
            .add_edge(
                a,
                b,
                EdgeStyle::new().with_label("collect").with_color("firebrick"),
            )
            .unwrap();

        let dot = normalized(&dot_source(&model, "Styles", Direction::LeftRight));
        assert!(dot.contains("label=\"collect\""));
        assert!(dot.contains("color=\"firebrick\""));
    }

    #[test]
    fn test_multiline_label_is_quoted() {
        let mut model = GraphModel::new();
        model.add_node("Auth Feature\n(Views, Widgets)", "custom", None, None);

        let dot = dot_source(&model, "Quoting", Direction::LeftRight);
        assert!(dot.contains("label=\"Auth Feature\\n(Views, Widgets)\""));
    }
}
