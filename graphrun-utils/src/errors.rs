//! Errors surfaced by the graph engine.
use crate::Id;

/// Convenience wrapper to represent success or a meaningful engine error.
pub type RunResult<T> = std::result::Result<T, Error>;

/// Structured diagnostic carrying the error kind and the offending
/// node/edge identifiers.
#[derive(Clone)]
pub struct Error {
    kind: Box<ErrorKind>,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn missing_key(node: Id, port: Id) -> Self {
        Self {
            kind: Box::new(ErrorKind::MissingKey { node, port }),
        }
    }
    pub fn type_mismatch(
        src: (Id, Id),
        dst: (Id, Id),
        src_ty: String,
        dst_ty: String,
    ) -> Self {
        Self {
            kind: Box::new(ErrorKind::TypeMismatch {
                src,
                dst,
                src_ty,
                dst_ty,
            }),
        }
    }
    pub fn duplicate_edge(src: Id, dst: Id, dst_port: Id) -> Self {
        Self {
            kind: Box::new(ErrorKind::DuplicateEdge { src, dst, dst_port }),
        }
    }
    pub fn cycle(node: Id) -> Self {
        Self {
            kind: Box::new(ErrorKind::Cycle { node }),
        }
    }
    pub fn parity_violation<S: ToString>(src: Id, dst: Id, msg: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::ParityViolation {
                src,
                dst,
                msg: msg.to_string(),
            }),
        }
    }
    pub fn undefined<S: ToString>(name: Id, typ: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::Undefined(name, typ.to_string())),
        }
    }
    pub fn already_bound<S: ToString>(name: Id, typ: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::AlreadyBound(name, typ.to_string())),
        }
    }
    pub fn empty_subgraph() -> Self {
        Self {
            kind: Box::new(ErrorKind::EmptySubgraph),
        }
    }
    pub fn disconnected(components: usize) -> Self {
        Self {
            kind: Box::new(ErrorKind::Disconnected(components)),
        }
    }
    pub fn storage<S: ToString>(msg: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::Storage(msg.to_string())),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Standard error taxonomy for the engine.
#[derive(Clone)]
pub enum ErrorKind {
    /// An edge references a port absent from its endpoint.
    MissingKey { node: Id, port: Id },
    /// Port type tags disagree across a wire.
    TypeMismatch {
        src: (Id, Id),
        dst: (Id, Id),
        src_ty: String,
        dst_ty: String,
    },
    /// The same wire into a destination port occurs twice.
    DuplicateEdge { src: Id, dst: Id, dst_port: Id },
    /// A directed cycle was detected.
    Cycle { node: Id },
    /// One endpoint lists an edge the other does not.
    ParityViolation { src: Id, dst: Id, msg: String },

    /// The name has not been bound.
    Undefined(Id, String),
    /// The name has already been bound.
    AlreadyBound(Id, String),

    /// The projected subgraph has no nodes.
    EmptySubgraph,
    /// The projected subgraph has more than one component and the engine
    /// was configured to refuse such runs.
    Disconnected(usize),

    /// Opaque lower-layer failure.
    Storage(String),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorKind::*;
        match self {
            MissingKey { node, port } => {
                write!(f, "Data key `{port}' missing on node `{node}'")
            }
            TypeMismatch {
                src,
                dst,
                src_ty,
                dst_ty,
            } => {
                write!(
                    f,
                    "Type mismatch on wire {}.{} -> {}.{}: `{src_ty}' vs `{dst_ty}'",
                    src.0, src.1, dst.0, dst.1
                )
            }
            DuplicateEdge { src, dst, dst_port } => {
                write!(
                    f,
                    "Duplicate edge from `{src}' to `{dst}' targeting `{dst_port}'"
                )
            }
            Cycle { node } => {
                write!(f, "Cycle detected through node `{node}'")
            }
            ParityViolation { src, dst, msg } => {
                write!(f, "Edge parity violation between `{src}' and `{dst}': {msg}")
            }
            Undefined(name, typ) => {
                write!(f, "Undefined {typ} name: {name}")
            }
            AlreadyBound(name, bound_by) => {
                write!(f, "Name `{name}' already bound by {bound_by}")
            }
            EmptySubgraph => {
                write!(f, "Projected subgraph contains no nodes")
            }
            Disconnected(n) => {
                write!(f, "Projected subgraph splits into {n} components")
            }
            Storage(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

// Conversions from other error types to our error type so that
// we can use `?` in all the places.
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::storage(format!("IO Error: {}", e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::storage(format!("serde_json Error: {}", e))
    }
}
