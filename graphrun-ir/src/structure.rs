//! Representation for structure (nodes and edges) in a graphrun graph.

use crate::Value;
use graphrun_utils::{GetName, Id};
use linked_hash_map::LinkedHashMap;
use smallvec::SmallVec;

/// Index of an edge in the graph's flat edge table. Indices are stable for
/// the lifetime of the graph; deleting an edge never renumbers the others.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct EdgeIdx(pub(crate) u32);

impl std::fmt::Display for EdgeIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl EdgeIdx {
    pub const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub const fn index(&self) -> u32 {
        self.0
    }
}

/// A typed wire between two nodes.
///
/// `key_map` maps output-port names of `src` to input-port names of `dst`.
/// An edge with an empty `key_map` is a pure dependency edge: it constrains
/// ordering but transfers no data.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    /// Name of the node sending data.
    pub src: Id,
    /// Name of the node receiving data.
    pub dst: Id,
    /// Maps `data_out` keys of the source to `data_in` keys of the destination.
    #[serde(default)]
    pub key_map: LinkedHashMap<Id, Id>,
}

impl Edge {
    /// Build a dependency-only edge.
    pub fn new<S: Into<Id>>(src: S, dst: S) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            key_map: LinkedHashMap::new(),
        }
    }

    /// Add a wire from a source output port to a destination input port.
    pub fn with_wire<S: Into<Id>>(mut self, src_key: S, dst_key: S) -> Self {
        self.key_map.insert(src_key.into(), dst_key.into());
        self
    }

    /// True iff this edge carries no data.
    pub fn is_dependency_only(&self) -> bool {
        self.key_map.is_empty()
    }
}

/// A computation unit with typed input and output ports.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Name of this node. Unique within a graph.
    name: Id,
    /// Input ports with their current typed values.
    #[serde(default)]
    pub data_in: LinkedHashMap<Id, Value>,
    /// Output ports with their current typed values.
    #[serde(default)]
    pub data_out: LinkedHashMap<Id, Value>,
    /// Identity rewiring from input-port name to output-port name. Applying
    /// it is the node's sole computation.
    #[serde(default)]
    pub mapping: LinkedHashMap<Id, Id>,
    /// Incoming incident edges.
    #[serde(default)]
    pub paths_in: SmallVec<[EdgeIdx; 4]>,
    /// Outgoing incident edges.
    #[serde(default)]
    pub paths_out: SmallVec<[EdgeIdx; 4]>,
}

impl Node {
    pub fn new<S: Into<Id>>(name: S) -> Self {
        Self {
            name: name.into(),
            data_in: LinkedHashMap::new(),
            data_out: LinkedHashMap::new(),
            mapping: LinkedHashMap::new(),
            paths_in: SmallVec::new(),
            paths_out: SmallVec::new(),
        }
    }

    /// Declare an input port with an initial value.
    pub fn with_input<S: Into<Id>>(mut self, port: S, value: Value) -> Self {
        self.data_in.insert(port.into(), value);
        self
    }

    /// Declare an output port with an initial value.
    pub fn with_output<S: Into<Id>>(mut self, port: S, value: Value) -> Self {
        self.data_out.insert(port.into(), value);
        self
    }

    /// Declare a mapping entry from an input port to an output port.
    pub fn with_mapping<S: Into<Id>>(mut self, from: S, to: S) -> Self {
        self.mapping.insert(from.into(), to.into());
        self
    }

    /// Grants immutable access to the name of this node.
    pub fn name(&self) -> Id {
        self.name
    }

    /// Get the value of the named input port if it exists.
    pub fn input(&self, port: &Id) -> Option<&Value> {
        self.data_in.get(port)
    }

    /// Get the value of the named output port if it exists.
    pub fn output(&self, port: &Id) -> Option<&Value> {
        self.data_out.get(port)
    }

    /// Assign an input port and propagate the value through `mapping` into
    /// the corresponding output port, type tag included.
    pub fn set_input(&mut self, port: Id, value: Value) {
        if let Some(&out) = self.mapping.get(&port) {
            self.data_out.insert(out, value.clone());
        }
        self.data_in.insert(port, value);
    }

    /// Re-run the mapping over every currently assigned input port.
    pub fn apply_mapping(&mut self) {
        for (port, out) in self.mapping.iter() {
            if let Some(value) = self.data_in.get(port) {
                self.data_out.insert(*out, value.clone());
            }
        }
    }
}

impl GetName for Node {
    fn name(&self) -> Id {
        self.name()
    }
}

/// Partial update to a stored node. Sections left as `None` are unchanged.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct NodePatch {
    #[serde(default)]
    pub data_in: Option<LinkedHashMap<Id, Value>>,
    #[serde(default)]
    pub data_out: Option<LinkedHashMap<Id, Value>>,
    #[serde(default)]
    pub mapping: Option<LinkedHashMap<Id, Id>>,
}
