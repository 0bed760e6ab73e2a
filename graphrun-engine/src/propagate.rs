//! Breadth-first data propagation with depth-ordered write resolution.
//!
//! Several independent paths may deliver values to the same destination
//! node. The scheduler prefers the shallowest provenance (the most direct
//! derivation from a root) and, between writers arriving at the same depth,
//! the lexicographically smallest source-node name. The choice lives in a
//! write-ledger recording, per destination, the arrival depth and writer of
//! the currently installed values.

use graphrun_ir::{Graph, Id, RunConfig, Value};
use graphrun_utils::{Error, RunResult};
use std::collections::{HashMap, VecDeque};

/// Ledger entry: arrival depth and writer of the installed values.
#[derive(Debug, Clone, Copy)]
struct Installed {
    arrival: u32,
    writer: Id,
}

/// Resolve input values across the projected subgraph.
///
/// Roots named by `root_inputs` are seeded first (their `data_in` is
/// replaced wholesale), overrides are merged next, then values flow
/// breadth-first along edges. The graph must already be validated: the
/// traversal relies on acyclicity for termination.
pub fn propagate(graph: &mut Graph, config: &RunConfig) -> RunResult<()> {
    // Step 1: seed roots, replacing data_in wholesale.
    for (root, inputs) in config.root_inputs.iter() {
        let Some(node) = graph.find_node_mut(root) else {
            continue;
        };
        node.data_in.clear();
        for (port, value) in inputs.iter() {
            node.data_in.insert(*port, value.clone());
        }
        node.apply_mapping();
    }

    // Step 2: merge overrides into projected nodes.
    for (name, overrides) in config.data_overwrites.iter() {
        let Some(node) = graph.find_node_mut(name) else {
            continue;
        };
        for (port, value) in overrides.iter() {
            node.data_in.insert(*port, value.clone());
        }
        node.apply_mapping();
    }

    // Step 3: breadth-first propagation.
    let mut ledger: HashMap<Id, Installed> = HashMap::new();
    let mut queue: VecDeque<(Id, u32)> = config
        .roots()
        .filter(|root| graph.find_node(root).is_some())
        .map(|root| (root, 0))
        .collect();

    while let Some((name, depth)) = queue.pop_front() {
        let out_edges: Vec<_> = graph.node(&name)?.paths_out.to_vec();
        for idx in out_edges {
            let edge = graph.edge(idx)?;
            let dst = edge.dst;
            let arrival = depth + 1;

            if edge.is_dependency_only() {
                // Ordering-only edge: drives the frontier, no ledger entry.
                queue.push_back((dst, arrival));
                continue;
            }

            let accept = match ledger.get(&dst) {
                None => true,
                Some(installed) if installed.arrival > arrival => true,
                Some(installed) if installed.arrival == arrival => {
                    // A writer never competes with itself: parallel wires
                    // from one source at one depth must all land.
                    name.as_str() <= installed.writer.as_str()
                }
                Some(_) => false,
            };
            if !accept {
                log::debug!(
                    "rejecting write {name} -> {dst} at depth {arrival}"
                );
                continue;
            }

            let values: Vec<(Id, Value)> = {
                let src = graph.node(&name)?;
                edge.key_map
                    .iter()
                    .map(|(src_key, dst_key)| {
                        src.output(src_key)
                            .cloned()
                            .map(|v| (*dst_key, v))
                            .ok_or_else(|| Error::missing_key(name, *src_key))
                    })
                    .collect::<RunResult<_>>()?
            };
            let node = graph.node_mut(&dst)?;
            for (port, value) in values {
                node.set_input(port, value);
            }
            log::debug!("installing write {name} -> {dst} at depth {arrival}");
            ledger.insert(
                dst,
                Installed {
                    arrival,
                    writer: name,
                },
            );
            queue.push_back((dst, arrival));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphrun_ir::{Edge, Node, PortValues};

    fn relay(name: &str, input: &str, output: &str) -> Node {
        Node::new(name)
            .with_input(input, Value::Int(0))
            .with_output(output, Value::Int(0))
            .with_mapping(input, output)
    }

    fn seed(config: &mut RunConfig, node: &str, port: &str, value: Value) {
        let mut inputs = PortValues::new();
        inputs.insert(port.into(), value);
        config.root_inputs.insert(node.into(), inputs);
    }

    #[test]
    fn chain_carries_the_root_value_to_every_node() {
        let mut g = Graph::new();
        for i in 1..=5 {
            g.add_node(relay(
                &format!("n{i}"),
                &format!("in{i}"),
                &format!("out{i}"),
            ))
            .unwrap();
        }
        for i in 1..5 {
            g.add_edge(
                Edge::new(format!("n{i}"), format!("n{}", i + 1))
                    .with_wire(format!("out{i}"), format!("in{}", i + 1)),
            )
            .unwrap();
        }
        let mut config = RunConfig::default();
        seed(&mut config, "n1", "in1", Value::Int(7));
        propagate(&mut g, &config).unwrap();
        for i in 1..=5 {
            let node = g.node(&format!("n{i}").as_str().into()).unwrap();
            assert_eq!(
                node.output(&format!("out{i}").as_str().into()),
                Some(&Value::Int(7)),
                "n{i} should relay the root value"
            );
        }
    }

    #[test]
    fn shallower_writer_wins() {
        // n1 -> n2 -> n4, n1 -> n3 -> n4, and a direct n1 -> n4.
        let mut g = Graph::new();
        g.add_node(relay("n1", "in1", "out1")).unwrap();
        g.add_node(relay("n2", "in2", "out2")).unwrap();
        g.add_node(relay("n3", "in3", "out3")).unwrap();
        g.add_node(relay("n4", "in4", "out4")).unwrap();
        g.add_edge(Edge::new("n1", "n2").with_wire("out1", "in2"))
            .unwrap();
        g.add_edge(Edge::new("n2", "n4").with_wire("out2", "in4"))
            .unwrap();
        g.add_edge(Edge::new("n1", "n3").with_wire("out1", "in3"))
            .unwrap();
        g.add_edge(Edge::new("n3", "n4").with_wire("out3", "in4"))
            .unwrap();
        g.add_edge(Edge::new("n1", "n4").with_wire("out1", "in4"))
            .unwrap();
        let mut config = RunConfig::default();
        seed(&mut config, "n1", "in1", Value::Int(42));
        propagate(&mut g, &config).unwrap();
        assert_eq!(
            g.node(&"n4".into()).unwrap().input(&"in4".into()),
            Some(&Value::Int(42))
        );
    }

    #[test]
    fn lexicographic_writer_wins_at_equal_depth() {
        let mut g = Graph::new();
        g.add_node(relay("nB", "in_b", "out_b")).unwrap();
        g.add_node(relay("nA", "in_a", "out_a")).unwrap();
        g.add_node(relay("nZ", "in_z", "out_z")).unwrap();
        // Insert the edge from nB first so acceptance order alone cannot
        // explain the winner.
        g.add_edge(Edge::new("nB", "nZ").with_wire("out_b", "in_z"))
            .unwrap();
        g.add_edge(Edge::new("nA", "nZ").with_wire("out_a", "in_z"))
            .unwrap();
        let mut config = RunConfig::default();
        seed(&mut config, "nB", "in_b", Value::Int(2));
        seed(&mut config, "nA", "in_a", Value::Int(1));
        propagate(&mut g, &config).unwrap();
        assert_eq!(
            g.node(&"nZ".into()).unwrap().input(&"in_z".into()),
            Some(&Value::Int(1)),
            "nA sorts before nB and must win the tie"
        );
    }

    #[test]
    fn parallel_wires_from_one_writer_all_deliver() {
        // Two distinct wires a -> b at the same depth. The second must not
        // lose the tie against the first's ledger entry.
        let mut g = Graph::new();
        g.add_node(
            Node::new("a")
                .with_input("x", Value::Int(0))
                .with_output("out1", Value::Int(1))
                .with_output("out2", Value::Int(2)),
        )
        .unwrap();
        g.add_node(
            Node::new("b")
                .with_input("in1", Value::Int(0))
                .with_input("in2", Value::Int(0)),
        )
        .unwrap();
        g.add_edge(Edge::new("a", "b").with_wire("out1", "in1"))
            .unwrap();
        g.add_edge(Edge::new("a", "b").with_wire("out2", "in2"))
            .unwrap();
        let mut config = RunConfig::default();
        seed(&mut config, "a", "x", Value::Int(0));
        propagate(&mut g, &config).unwrap();
        let b = g.node(&"b".into()).unwrap();
        assert_eq!(b.input(&"in1".into()), Some(&Value::Int(1)));
        assert_eq!(b.input(&"in2".into()), Some(&Value::Int(2)));
    }

    #[test]
    fn overrides_merge_after_seeding() {
        let mut g = Graph::new();
        g.add_node(
            Node::new("n1")
                .with_input("a", Value::Int(0))
                .with_input("b", Value::Int(0))
                .with_output("out_a", Value::Int(0))
                .with_output("out_b", Value::Int(0))
                .with_mapping("a", "out_a")
                .with_mapping("b", "out_b"),
        )
        .unwrap();
        let mut config = RunConfig::default();
        let mut inputs = PortValues::new();
        inputs.insert("a".into(), Value::Int(1));
        inputs.insert("b".into(), Value::Int(2));
        config.root_inputs.insert("n1".into(), inputs);
        let mut ow = PortValues::new();
        ow.insert("b".into(), Value::Int(9));
        config.data_overwrites.insert("n1".into(), ow);
        propagate(&mut g, &config).unwrap();
        let n1 = g.node(&"n1".into()).unwrap();
        assert_eq!(n1.input(&"a".into()), Some(&Value::Int(1)));
        assert_eq!(n1.input(&"b".into()), Some(&Value::Int(9)));
        assert_eq!(n1.output(&"out_b".into()), Some(&Value::Int(9)));
    }

    #[test]
    fn overrides_skip_unprojected_nodes() {
        let mut g = Graph::new();
        g.add_node(relay("n1", "in1", "out1")).unwrap();
        let mut config = RunConfig::default();
        let mut ow = PortValues::new();
        ow.insert("in9".into(), Value::Int(9));
        config.data_overwrites.insert("n9".into(), ow);
        propagate(&mut g, &config).unwrap();
        assert!(g.find_node(&"n9".into()).is_none());
    }

    #[test]
    fn dependency_edges_drive_the_frontier_without_data() {
        // n1 --dep--> n2 --wire--> n3: n2's seeded output still flows.
        let mut g = Graph::new();
        g.add_node(relay("n1", "in1", "out1")).unwrap();
        g.add_node(relay("n2", "in2", "out2")).unwrap();
        g.add_node(relay("n3", "in3", "out3")).unwrap();
        g.add_edge(Edge::new("n1", "n2")).unwrap();
        g.add_edge(Edge::new("n2", "n3").with_wire("out2", "in3"))
            .unwrap();
        let mut config = RunConfig::default();
        seed(&mut config, "n1", "in1", Value::Int(5));
        let mut ow = PortValues::new();
        ow.insert("in2".into(), Value::Int(8));
        config.data_overwrites.insert("n2".into(), ow);
        propagate(&mut g, &config).unwrap();
        let n2 = g.node(&"n2".into()).unwrap();
        // The dependency edge moved no data into n2.
        assert_eq!(n2.input(&"in2".into()), Some(&Value::Int(8)));
        assert_eq!(
            g.node(&"n3".into()).unwrap().input(&"in3".into()),
            Some(&Value::Int(8))
        );
    }

    #[test]
    fn propagation_is_deterministic() {
        let build = || {
            let mut g = Graph::new();
            g.add_node(relay("r1", "a", "oa")).unwrap();
            g.add_node(relay("r2", "b", "ob")).unwrap();
            g.add_node(relay("m", "c", "oc")).unwrap();
            g.add_edge(Edge::new("r1", "m").with_wire("oa", "c")).unwrap();
            g.add_edge(Edge::new("r2", "m").with_wire("ob", "c")).unwrap();
            g
        };
        let mut config = RunConfig::default();
        seed(&mut config, "r1", "a", Value::Int(10));
        seed(&mut config, "r2", "b", Value::Int(20));
        let mut first = build();
        propagate(&mut first, &config).unwrap();
        let mut second = build();
        propagate(&mut second, &config).unwrap();
        assert_eq!(first, second);
    }
}
