//! Structural and typing validation of a projected subgraph.
//!
//! A colored depth-first traversal enters every node once and checks, per
//! node: key existence and type agreement for each incoming wire, duplicate
//! wires into the same destination port, directed cycles (by recursing into
//! in-edge sources), and edge parity between the endpoints' path lists.
//! Validation performs no mutation.

use graphrun_ir::{Graph, RunConfig};
use graphrun_utils::{Error, Id, RunResult};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    Visiting,
    Visited,
}

/// Validate the projected subgraph for a run.
///
/// The traversal starts from every node named in `root_inputs` and then
/// sweeps any remaining unvisited node, so disconnected components are
/// checked too. Multiple components are not an error here; the engine's
/// component policy is applied after traversal.
pub fn validate(graph: &Graph, config: &RunConfig) -> RunResult<()> {
    let mut validator = Validator {
        graph,
        colors: graph.node_ids().map(|id| (id, Color::Unvisited)).collect(),
    };
    for root in config.roots() {
        if graph.find_node(&root).is_some()
            && validator.color(root) == Color::Unvisited
        {
            validator.check_node(root)?;
        }
    }
    for id in graph.node_ids() {
        if validator.color(id) == Color::Unvisited {
            validator.check_node(id)?;
        }
    }
    Ok(())
}

struct Validator<'a> {
    graph: &'a Graph,
    colors: HashMap<Id, Color>,
}

impl Validator<'_> {
    fn color(&self, id: Id) -> Color {
        self.colors[&id]
    }

    fn check_node(&mut self, id: Id) -> RunResult<()> {
        self.colors.insert(id, Color::Visiting);
        let graph = self.graph;
        let node = graph.node(&id)?;

        // Wires already seen while entering this node, as
        // (src node, src port, dst port) triples.
        let mut seen_wires: HashSet<(Id, Id, Id)> = HashSet::new();
        for &idx in &node.paths_in {
            let Some(edge) = graph.find_edge(idx) else {
                return Err(Error::parity_violation(
                    id,
                    id,
                    format!("`{id}' lists unknown edge `{idx}'"),
                ));
            };
            if edge.dst != id {
                return Err(Error::parity_violation(
                    edge.src,
                    edge.dst,
                    format!("edge `{idx}' is not incoming to `{id}'"),
                ));
            }
            let src = graph.node(&edge.src)?;
            for (src_key, dst_key) in edge.key_map.iter() {
                let Some(out) = src.output(src_key) else {
                    return Err(Error::missing_key(edge.src, *src_key));
                };
                let Some(inp) = node.input(dst_key) else {
                    return Err(Error::missing_key(id, *dst_key));
                };
                if out.ty() != inp.ty() {
                    return Err(Error::type_mismatch(
                        (edge.src, *src_key),
                        (id, *dst_key),
                        out.ty().to_string(),
                        inp.ty().to_string(),
                    ));
                }
                if !seen_wires.insert((edge.src, *src_key, *dst_key)) {
                    return Err(Error::duplicate_edge(edge.src, id, *dst_key));
                }
            }
            match self.color(edge.src) {
                Color::Visiting => return Err(Error::cycle(edge.src)),
                Color::Unvisited => self.check_node(edge.src)?,
                Color::Visited => {}
            }
        }

        for &idx in &node.paths_out {
            let Some(edge) = graph.find_edge(idx) else {
                return Err(Error::parity_violation(
                    id,
                    id,
                    format!("`{id}' lists unknown edge `{idx}'"),
                ));
            };
            if edge.src != id {
                return Err(Error::parity_violation(
                    edge.src,
                    edge.dst,
                    format!("edge `{idx}' is not outgoing from `{id}'"),
                ));
            }
            let dst = graph.node(&edge.dst)?;
            if !dst.paths_in.contains(&idx) {
                return Err(Error::parity_violation(
                    id,
                    edge.dst,
                    format!(
                        "`{}' does not recognise incoming edge `{idx}'",
                        edge.dst
                    ),
                ));
            }
        }

        self.colors.insert(id, Color::Visited);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphrun_ir::{Edge, Node, Value};
    use graphrun_utils::ErrorKind;

    fn wired_pair(src_val: Value, dst_val: Value) -> Graph {
        let mut g = Graph::new();
        g.add_node(Node::new("a").with_output("out", src_val)).unwrap();
        g.add_node(Node::new("b").with_input("in", dst_val)).unwrap();
        g.add_edge(Edge::new("a", "b").with_wire("out", "in")).unwrap();
        g
    }

    #[test]
    fn well_typed_wire_passes() {
        let g = wired_pair(Value::Int(1), Value::Int(0));
        assert!(validate(&g, &RunConfig::default()).is_ok());
    }

    #[test]
    fn missing_source_key_is_reported() {
        let mut g = Graph::new();
        g.add_node(Node::new("a")).unwrap();
        g.add_node(Node::new("b").with_input("in", Value::Int(0)))
            .unwrap();
        g.add_edge(Edge::new("a", "b").with_wire("out", "in")).unwrap();
        let err = validate(&g, &RunConfig::default()).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::MissingKey { node, port }
                if *node == "a" && *port == "out"
        ));
    }

    #[test]
    fn missing_destination_key_is_reported() {
        let mut g = Graph::new();
        g.add_node(Node::new("a").with_output("out", Value::Int(1)))
            .unwrap();
        g.add_node(Node::new("b")).unwrap();
        g.add_edge(Edge::new("a", "b").with_wire("out", "in")).unwrap();
        let err = validate(&g, &RunConfig::default()).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::MissingKey { node, port }
                if *node == "b" && *port == "in"
        ));
    }

    #[test]
    fn type_tags_must_agree() {
        let g = wired_pair(Value::Int(1), Value::Str("x".into()));
        let err = validate(&g, &RunConfig::default()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn duplicate_wire_into_same_port_is_reported() {
        let mut g = wired_pair(Value::Int(1), Value::Int(0));
        g.add_edge(Edge::new("a", "b").with_wire("out", "in")).unwrap();
        let err = validate(&g, &RunConfig::default()).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::DuplicateEdge { src, dst, dst_port }
                if *src == "a" && *dst == "b" && *dst_port == "in"
        ));
    }

    #[test]
    fn distinct_source_ports_into_same_port_are_not_duplicates() {
        let mut g = Graph::new();
        g.add_node(
            Node::new("a")
                .with_output("out1", Value::Int(1))
                .with_output("out2", Value::Int(2)),
        )
        .unwrap();
        g.add_node(Node::new("b").with_input("in", Value::Int(0)))
            .unwrap();
        g.add_edge(Edge::new("a", "b").with_wire("out1", "in")).unwrap();
        g.add_edge(Edge::new("a", "b").with_wire("out2", "in")).unwrap();
        assert!(validate(&g, &RunConfig::default()).is_ok());
    }

    #[test]
    fn cycles_are_reported() {
        let mut g = Graph::new();
        for name in ["n1", "n2", "n3"] {
            g.add_node(Node::new(name)).unwrap();
        }
        g.add_edge(Edge::new("n1", "n2")).unwrap();
        g.add_edge(Edge::new("n2", "n3")).unwrap();
        g.add_edge(Edge::new("n3", "n1")).unwrap();
        let err = validate(&g, &RunConfig::default()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Cycle { .. }));
    }

    #[test]
    fn parity_violation_is_reported() {
        // A graph whose persisted node rows disagree with the edge table:
        // `b` does not list the edge `a` claims to reach it with.
        let json = r#"{
            "nodes": [
                {"name": "a", "data_out": {"out": "1, int"}, "paths_out": [0]},
                {"name": "b", "data_in": {"in": "0, int"}, "paths_in": []}
            ],
            "edges": [
                {"id": 0, "src": "a", "dst": "b", "key_map": {"out": "in"}}
            ]
        }"#;
        let g: Graph = serde_json::from_str(json).unwrap();
        let err = validate(&g, &RunConfig::default()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ParityViolation { .. }));
    }

    #[test]
    fn unknown_edge_in_path_list_is_a_parity_violation() {
        let json = r#"{
            "nodes": [
                {"name": "a", "paths_out": [7]}
            ],
            "edges": []
        }"#;
        let g: Graph = serde_json::from_str(json).unwrap();
        let err = validate(&g, &RunConfig::default()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ParityViolation { .. }));
    }

    #[test]
    fn traversal_covers_components_unreachable_from_roots() {
        // Cycle in a component the root does not reach.
        let mut g = Graph::new();
        for name in ["r", "x", "y"] {
            g.add_node(Node::new(name)).unwrap();
        }
        g.add_edge(Edge::new("x", "y")).unwrap();
        g.add_edge(Edge::new("y", "x")).unwrap();
        let mut config = RunConfig::default();
        config
            .root_inputs
            .insert("r".into(), Default::default());
        let err = validate(&g, &config).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Cycle { .. }));
    }
}
