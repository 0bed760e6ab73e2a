//! Hand-written serde implementations.
//!
//! Values cross the persistence boundary in their stored `"literal, tag"`
//! string form; graphs serialize as a node list plus an edge table keyed by
//! the stable edge index, mirroring the relational layout.

use crate::{Edge, EdgeIdx, Graph, Node, Value};
use graphrun_utils::Id;
use linked_hash_map::LinkedHashMap;
use serde::de::Error as _;
use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for Value {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(de: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(de)?;
        Value::parse(&raw).map_err(D::Error::custom)
    }
}

/// One row of the serialized edge table.
#[derive(serde::Serialize, serde::Deserialize)]
struct EdgeRow {
    id: EdgeIdx,
    src: Id,
    dst: Id,
    #[serde(default)]
    key_map: LinkedHashMap<Id, Id>,
}

struct NodeSeq<'a>(&'a Graph);

impl Serialize for NodeSeq<'_> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = ser.serialize_seq(Some(self.0.len()))?;
        for node in self.0.nodes() {
            seq.serialize_element(node)?;
        }
        seq.end()
    }
}

struct EdgeSeq<'a>(&'a Graph);

impl Serialize for EdgeSeq<'_> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = ser.serialize_seq(Some(self.0.edge_count()))?;
        for (id, edge) in self.0.edges() {
            seq.serialize_element(&EdgeRowRef { id, edge })?;
        }
        seq.end()
    }
}

struct EdgeRowRef<'a> {
    id: EdgeIdx,
    edge: &'a Edge,
}

impl Serialize for EdgeRowRef<'_> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut row = ser.serialize_struct("EdgeRow", 4)?;
        row.serialize_field("id", &self.id)?;
        row.serialize_field("src", &self.edge.src)?;
        row.serialize_field("dst", &self.edge.dst)?;
        row.serialize_field("key_map", &self.edge.key_map)?;
        row.end()
    }
}

impl Serialize for Graph {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut graph = ser.serialize_struct("Graph", 2)?;
        graph.serialize_field("nodes", &NodeSeq(self))?;
        graph.serialize_field("edges", &EdgeSeq(self))?;
        graph.end()
    }
}

#[derive(serde::Deserialize)]
struct GraphRaw {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<EdgeRow>,
}

impl<'de> Deserialize<'de> for Graph {
    fn deserialize<D>(de: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = GraphRaw::deserialize(de)?;
        let mut nodes = LinkedHashMap::new();
        for node in raw.nodes {
            let name = node.name();
            if nodes.insert(name, node).is_some() {
                return Err(D::Error::custom(format!(
                    "node name `{name}' bound twice"
                )));
            }
        }
        let mut edges = LinkedHashMap::new();
        let mut next_edge = 0;
        for row in raw.edges {
            next_edge = next_edge.max(row.id.index() + 1);
            let id = row.id;
            let edge = Edge {
                src: row.src,
                dst: row.dst,
                key_map: row.key_map,
            };
            if edges.insert(id, edge).is_some() {
                return Err(D::Error::custom(format!(
                    "edge id `{id}' bound twice"
                )));
            }
        }
        Ok(Graph {
            nodes,
            edges,
            next_edge,
        })
    }
}
